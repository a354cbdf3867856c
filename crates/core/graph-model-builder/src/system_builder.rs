// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing::{debug, instrument};

use graph_model::{
    error::ModelBuildingError,
    host_type::RecordDescriptor,
    wire::{MUTATION_TYPE, QUERY_TYPE, SUBSCRIPTION_TYPE, SchemaModel},
};

use crate::{building::ModelBuilding, options::BuildOptions, type_walker};

/// The records whose fields form the Query, Mutation and Subscription root types.
#[derive(Debug, Clone)]
pub struct RootRecords {
    pub query: RecordDescriptor,
    pub mutation: Option<RecordDescriptor>,
    pub subscription: Option<RecordDescriptor>,
}

impl RootRecords {
    pub fn new(query: RecordDescriptor) -> Self {
        Self {
            query,
            mutation: None,
            subscription: None,
        }
    }

    pub fn mutation(mut self, mutation: RecordDescriptor) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn subscription(mut self, subscription: RecordDescriptor) -> Self {
        self.subscription = Some(subscription);
        self
    }
}

#[instrument(skip_all, fields(query = %roots.query.name))]
pub fn build(
    roots: &RootRecords,
    options: &BuildOptions,
) -> Result<SchemaModel, ModelBuildingError> {
    let mut building = ModelBuilding::new(options);

    build_seeded(options, &mut building)?;

    let query = build_root(QUERY_TYPE, &roots.query, &mut building)?;
    let mutation = roots
        .mutation
        .as_ref()
        .map(|root| build_root(MUTATION_TYPE, root, &mut building))
        .transpose()?;
    let subscription = roots
        .subscription
        .as_ref()
        .map(|root| build_root(SUBSCRIPTION_TYPE, root, &mut building))
        .transpose()?;

    debug!(types = building.types.len(), "Built schema model");

    Ok(SchemaModel {
        types: building.types,
        query,
        mutation,
        subscription,
        casing: building.casing,
    })
}

/// Register the types named in the options, whether or not the roots reach them.
fn build_seeded(
    options: &BuildOptions,
    building: &mut ModelBuilding,
) -> Result<(), ModelBuildingError> {
    for descriptor in &options.enums {
        type_walker::register_enum(descriptor, building)?;
    }

    for descriptor in &options.interfaces {
        type_walker::build_interface(descriptor, building)?;
    }

    for descriptor in &options.query_types {
        type_walker::build_object(descriptor, building)?;
    }

    for descriptor in &options.mutation_types {
        type_walker::build_input_object(descriptor, building)?;
    }

    Ok(())
}

fn build_root(
    name: &str,
    descriptor: &RecordDescriptor,
    building: &mut ModelBuilding,
) -> Result<String, ModelBuildingError> {
    let root = RecordDescriptor {
        name: name.to_string(),
        ..descriptor.clone()
    };
    type_walker::build_object(&root, building)?;
    Ok(name.to_string())
}
