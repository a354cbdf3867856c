// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DslError {
    #[error("Invalid introspection result: {0}")]
    Introspection(#[from] serde_json::Error),

    #[error("Type `{0}` does not exist in the schema")]
    UnknownType(String),

    #[error("Field `{field}` does not exist in type `{type_name}`")]
    UnknownField { type_name: String, field: String },

    #[error("Invalid argument `{argument}` for field `{field}`")]
    UnknownArgument { field: String, argument: String },

    #[error("Expected {expected} for `{name}`, received {value}")]
    InvalidValue {
        name: String,
        expected: String,
        value: String,
    },

    #[error("The schema has no mutation type")]
    NoMutationType,
}
