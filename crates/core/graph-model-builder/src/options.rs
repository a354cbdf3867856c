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

/// Inputs of a build beside the root records.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Camel-case field and argument names on the wire
    pub camelcase: bool,
    /// Added to (or replacing, by host name) the default scalars
    pub scalars: Vec<ScalarType>,
    /// Enums registered even when no field refers to them
    pub enums: Vec<EnumDescriptor>,
    /// Interface types. Records implement them by name.
    pub interfaces: Vec<RecordDescriptor>,
    /// Object types registered even when no field refers to them
    pub query_types: Vec<RecordDescriptor>,
    /// Input object types registered even when no argument refers to them
    pub mutation_types: Vec<RecordDescriptor>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            camelcase: true,
            scalars: vec![],
            enums: vec![],
            interfaces: vec![],
            query_types: vec![],
            mutation_types: vec![],
        }
    }
}

impl BuildOptions {
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
}
