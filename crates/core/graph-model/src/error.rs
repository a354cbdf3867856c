// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// Build-time configuration errors. Any of these aborts schema construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelBuildingError {
    #[error("Cannot map host type `{0}` to a wire type")]
    UnmappableType(String),

    #[error("Type `{0}` must define one or more fields")]
    EmptyType(String),

    #[error("Connection element `{0}` must be a record type with a required `id: ID` field")]
    ConnectionElement(String),

    #[error("Connection type `{0}` cannot be used as an input")]
    ConnectionInput(String),

    #[error(
        "Argument `{argument}` of field `{field}` uses record type `{type_name}` but is not declared as an input argument"
    )]
    ArgumentShape {
        field: String,
        argument: String,
        type_name: String,
    },

    #[error("Type name `{0}` is already registered with a different kind")]
    NameConflict(String),

    #[error("Connection type `{0}` is already defined by a connection kind with other fields")]
    ConnectionKindConflict(String),

    #[error("{0}")]
    Generic(String),
}

/// A scalar or enum value that could not be converted between its host and wire forms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("{scalar} cannot represent value: {value}")]
    Serialize { scalar: String, value: String },

    #[error("{scalar} cannot parse value: {value}")]
    Parse { scalar: String, value: String },

    #[error("{scalar} cannot parse `{input}`: {reason}")]
    Malformed {
        scalar: String,
        input: String,
        reason: String,
    },

    #[error("Enum `{expected}` cannot represent a member of enum `{found}`")]
    EnumMismatch { expected: String, found: String },

    #[error("`{member}` is not a member of enum `{enum_name}`")]
    UnknownMember { enum_name: String, member: String },
}

/// An error attached to a single field of an execution result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error(transparent)]
    Type(#[from] CodecError),

    #[error("{0}")]
    Resolver(String),

    #[error("Expected a list value for `{0}`")]
    ExpectedList(String),

    #[error("Cannot resolve the concrete type of `{0}`")]
    AbstractType(String),

    #[error("Value of `{0}` cannot be represented on the wire")]
    Unrepresentable(String),
}

impl FieldError {
    pub fn new(message: impl std::fmt::Display) -> Self {
        FieldError::Resolver(message.to_string())
    }
}
