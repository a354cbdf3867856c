// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

use graph_model::error::ModelBuildingError;

use crate::env::EnvError;

/// Failure to construct a [`crate::GraphSchema`]. No schema is produced in any of these cases.
#[derive(Error, Debug)]
pub enum SchemaBuildError {
    #[error(transparent)]
    Model(#[from] ModelBuildingError),

    #[error("Invalid schema: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Configuration(#[from] EnvError),
}

impl From<async_graphql::dynamic::SchemaError> for SchemaBuildError {
    fn from(error: async_graphql::dynamic::SchemaError) -> Self {
        SchemaBuildError::Validation(error.0)
    }
}
