// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use graph_model::{
    host_type::{EnumDescriptor, RecordDescriptor},
    scalar::ScalarType,
};
use graph_model_builder::BuildOptions;
use graph_pubsub::PubSub;

use crate::{env::Environment, error::SchemaBuildError};

const GRAPH_CAMELCASE: &str = "GRAPH_CAMELCASE";
const GRAPH_MAX_DEPTH: &str = "GRAPH_MAX_DEPTH";
const GRAPH_MAX_COMPLEXITY: &str = "GRAPH_MAX_COMPLEXITY";
const GRAPH_INTROSPECTION: &str = "GRAPH_INTROSPECTION";

/// Options of [`crate::GraphSchema::build`].
#[derive(Clone)]
pub struct SchemaOptions {
    /// Camel-case field and argument names on the wire
    pub camelcase: bool,
    pub scalars: Vec<ScalarType>,
    pub enums: Vec<EnumDescriptor>,
    pub interfaces: Vec<RecordDescriptor>,
    pub query_types: Vec<RecordDescriptor>,
    pub mutation_types: Vec<RecordDescriptor>,
    /// Channels that subscription fields listen to
    pub pubsub: PubSub,
    pub limit_depth: Option<usize>,
    pub limit_complexity: Option<usize>,
    pub introspection: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            camelcase: true,
            scalars: vec![],
            enums: vec![],
            interfaces: vec![],
            query_types: vec![],
            mutation_types: vec![],
            pubsub: PubSub::new(),
            limit_depth: None,
            limit_complexity: None,
            introspection: true,
        }
    }
}

impl SchemaOptions {
    /// Default options adjusted by `GRAPH_CAMELCASE`, `GRAPH_MAX_DEPTH`, `GRAPH_MAX_COMPLEXITY`
    /// and `GRAPH_INTROSPECTION`.
    pub fn from_env(env: &dyn Environment) -> Result<Self, SchemaBuildError> {
        let defaults = Self::default();

        Ok(Self {
            camelcase: env.switch(GRAPH_CAMELCASE, defaults.camelcase)?,
            limit_depth: env.limit(GRAPH_MAX_DEPTH)?,
            limit_complexity: env.limit(GRAPH_MAX_COMPLEXITY)?,
            introspection: env.switch(GRAPH_INTROSPECTION, defaults.introspection)?,
            ..defaults
        })
    }

    pub fn camelcase(mut self, camelcase: bool) -> Self {
        self.camelcase = camelcase;
        self
    }

    pub fn scalar(mut self, scalar: ScalarType) -> Self {
        self.scalars.push(scalar);
        self
    }

    pub fn enumeration(mut self, descriptor: EnumDescriptor) -> Self {
        self.enums.push(descriptor);
        self
    }

    pub fn interface(mut self, descriptor: RecordDescriptor) -> Self {
        self.interfaces.push(descriptor);
        self
    }

    pub fn query_type(mut self, descriptor: RecordDescriptor) -> Self {
        self.query_types.push(descriptor);
        self
    }

    pub fn mutation_type(mut self, descriptor: RecordDescriptor) -> Self {
        self.mutation_types.push(descriptor);
        self
    }

    pub fn pubsub(mut self, pubsub: PubSub) -> Self {
        self.pubsub = pubsub;
        self
    }

    pub fn limit_depth(mut self, depth: usize) -> Self {
        self.limit_depth = Some(depth);
        self
    }

    pub fn limit_complexity(mut self, complexity: usize) -> Self {
        self.limit_complexity = Some(complexity);
        self
    }

    pub fn introspection(mut self, introspection: bool) -> Self {
        self.introspection = introspection;
        self
    }

    pub(crate) fn build_options(&self) -> BuildOptions {
        BuildOptions {
            camelcase: self.camelcase,
            scalars: self.scalars.clone(),
            enums: self.enums.clone(),
            interfaces: self.interfaces.clone(),
            query_types: self.query_types.clone(),
            mutation_types: self.mutation_types.clone(),
        }
    }
}
