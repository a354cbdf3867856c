// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use graph_model::{
    casing::Casing,
    host_type::RecordDescriptor,
    mapped_arena::MappedArena,
    scalar::{ScalarType, default_scalars},
    wire::{WireField, WireType, WireTypeRef},
};

use crate::options::BuildOptions;

/// The state of one build. Every builder function takes it by reference.
#[derive(Debug)]
pub struct ModelBuilding {
    /// Wire types by name. At most one type exists per name.
    pub types: MappedArena<WireType>,
    pub casing: Casing,
    /// Scalars by host name
    scalars: HashMap<String, ScalarType>,
    /// Descriptors that `HostType::Named` may refer to
    interfaces: HashMap<String, RecordDescriptor>,
    records: HashMap<String, RecordDescriptor>,
    /// Extra field names of each connection type, as given by the kind that defined it
    pub(crate) connection_fields: HashMap<String, Vec<String>>,
}

impl ModelBuilding {
    pub fn new(options: &BuildOptions) -> Self {
        let scalars = default_scalars()
            .into_iter()
            .chain(options.scalars.iter().cloned())
            .map(|scalar| (scalar.host_name.clone(), scalar))
            .collect();

        let interfaces = options
            .interfaces
            .iter()
            .map(|i| (i.name.clone(), i.clone()))
            .collect();

        let records = options
            .query_types
            .iter()
            .chain(options.mutation_types.iter())
            .map(|r| (r.name.clone(), r.clone()))
            .collect();

        Self {
            types: MappedArena::default(),
            casing: Casing::from_flag(options.camelcase),
            scalars,
            interfaces,
            records,
            connection_fields: HashMap::new(),
        }
    }

    pub fn scalar(&self, host_name: &str) -> Option<&ScalarType> {
        self.scalars.get(host_name)
    }

    pub fn interface_descriptor(&self, name: &str) -> Option<&RecordDescriptor> {
        self.interfaces.get(name)
    }

    pub fn record_descriptor(&self, name: &str) -> Option<&RecordDescriptor> {
        self.records.get(name)
    }

    /// Wire name of a host field or argument name
    pub fn wire_name(&self, host_name: &str) -> String {
        self.casing.to_wire(host_name)
    }

    /// A field named after `host_name` under the schema's casing
    pub fn field(&self, host_name: &str, ty: WireTypeRef) -> WireField {
        WireField {
            host_name: host_name.to_string(),
            ..WireField::new(self.wire_name(host_name), ty)
        }
    }
}
