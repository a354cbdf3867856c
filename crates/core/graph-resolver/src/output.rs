// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_value::ConstValue;

use graph_model::{
    error::FieldError,
    value::Val,
    wire::{SchemaModel, WireType, WireTypeRef},
};

/// A field value encoded for its declared wire type.
#[derive(Debug, PartialEq)]
pub enum Output {
    Null,
    /// A scalar or enum value
    Value(ConstValue),
    /// A host value that becomes the parent of the selected sub-fields. `type_name` names the
    /// concrete object type when the declared type is an interface.
    Object {
        type_name: Option<String>,
        value: Val,
    },
    List(Vec<Output>),
}

/// Encode `value` with the wire type `ty`. Non-null checks are left to the engine.
pub fn encode(model: &SchemaModel, ty: &WireTypeRef, value: Val) -> Result<Output, FieldError> {
    match (ty, value) {
        (WireTypeRef::NonNull(inner), value) => encode(model, inner, value),
        (_, Val::Null) => Ok(Output::Null),
        (WireTypeRef::List(inner), Val::List(items)) => items
            .into_iter()
            .map(|item| encode(model, inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Output::List),
        (WireTypeRef::List(_), _) => Err(FieldError::ExpectedList(ty.to_string())),
        (WireTypeRef::Named(name), value) => match model.get(name) {
            Some(WireType::Scalar(scalar)) => Ok(Output::Value(scalar.codec.serialize(&value)?)),
            Some(WireType::Enum(descriptor)) => Ok(Output::Value(descriptor.serialize(&value)?)),
            Some(WireType::Object(_)) => Ok(Output::Object {
                type_name: None,
                value,
            }),
            Some(WireType::Interface(interface)) => {
                let type_name = concrete_type(model, &interface.name, &value)?;
                Ok(Output::Object {
                    type_name: Some(type_name),
                    value,
                })
            }
            Some(WireType::InputObject(_)) | None => Err(FieldError::Unrepresentable(name.clone())),
        },
    }
}

/// The object type behind an interface-typed value.
fn concrete_type(model: &SchemaModel, interface: &str, value: &Val) -> Result<String, FieldError> {
    let type_name = value
        .type_name()
        .ok_or_else(|| FieldError::AbstractType(interface.to_string()))?;

    match model.get(type_name) {
        Some(WireType::Object(object)) if object.interfaces.iter().any(|i| i == interface) => {
            Ok(type_name.to_string())
        }
        _ => Err(FieldError::AbstractType(format!(
            "{interface} (found `{type_name}`)"
        ))),
    }
}
