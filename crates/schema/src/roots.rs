// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use graph_model::{
    host_type::{Record, RecordDescriptor},
    value::Val,
};
use graph_model_builder::RootRecords;

/// Produces the value that root fields of an operation are resolved against.
pub type RootFactory = Arc<dyn Fn() -> Val + Send + Sync>;

/// A root record together with its value factory.
#[derive(Clone)]
pub struct RootType {
    pub descriptor: RecordDescriptor,
    pub factory: RootFactory,
}

impl RootType {
    pub fn new(
        descriptor: RecordDescriptor,
        factory: impl Fn() -> Val + Send + Sync + 'static,
    ) -> Self {
        Self {
            descriptor,
            factory: Arc::new(factory),
        }
    }

    pub fn record<R: Record>(factory: impl Fn() -> Val + Send + Sync + 'static) -> Self {
        Self::new(R::describe(), factory)
    }
}

/// The root types of a schema. Only the query type is required.
#[derive(Clone)]
pub struct RootTypes {
    pub query: RootType,
    pub mutation: Option<RootType>,
    pub subscription: Option<RootType>,
}

impl RootTypes {
    pub fn new(query: RootType) -> Self {
        Self {
            query,
            mutation: None,
            subscription: None,
        }
    }

    pub fn mutation(mut self, mutation: RootType) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn subscription(mut self, subscription: RootType) -> Self {
        self.subscription = Some(subscription);
        self
    }

    pub(crate) fn records(&self) -> RootRecords {
        let records = RootRecords::new(self.query.descriptor.clone());
        let records = match &self.mutation {
            Some(mutation) => records.mutation(mutation.descriptor.clone()),
            None => records,
        };
        match &self.subscription {
            Some(subscription) => records.subscription(subscription.descriptor.clone()),
            None => records,
        }
    }
}
