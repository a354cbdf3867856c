// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{any::Any, sync::Arc};

use async_graphql_value::{ConstValue, Name};
use async_trait::async_trait;
use indexmap::IndexMap;

use graph_model::{error::FieldError, source::OperationKind, value::Val};

use crate::output::Output;

/// One field to resolve, as seen by the engine.
#[derive(Debug, Clone)]
pub struct FieldRequest<'a> {
    /// Wire name of the object type the field belongs to
    pub parent_type: &'a str,
    pub wire_name: &'a str,
    pub operation: OperationKind,
    /// Argument values after variable substitution, keyed by wire name
    pub arguments: &'a IndexMap<Name, ConstValue>,
    pub context: Option<Arc<dyn Any + Send + Sync>>,
}

#[async_trait]
pub trait FieldResolver: Send + Sync {
    /// The host value of the field
    async fn resolve_field(&self, parent: &Val, request: &FieldRequest<'_>)
    -> Result<Val, FieldError>;

    /// The host value of the field, encoded with its declared wire type
    async fn resolve_output(
        &self,
        parent: &Val,
        request: &FieldRequest<'_>,
    ) -> Result<Output, FieldError>;
}
