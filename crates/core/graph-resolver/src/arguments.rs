// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Decoding of wire argument values into host values.
//!
//! Scalars go through their codec, enum members become [`EnumVal`]s and input objects become
//! mappings keyed by host names (or whatever the record loader makes of them). Lists are decoded
//! element-wise, so nested input objects are de-cased at any depth.
//!
//! [`EnumVal`]: graph_model::value::EnumVal

use async_graphql_value::{ConstValue, Name};
use indexmap::IndexMap;

use graph_model::{
    error::FieldError,
    source::Arguments,
    value::Val,
    wire::{InputObjectType, SchemaModel, WireField, WireType, WireTypeRef},
};

/// Decode the arguments of `field`. Arguments absent from `raw` are not passed.
pub fn decode_arguments(
    model: &SchemaModel,
    field: &WireField,
    raw: &IndexMap<Name, ConstValue>,
) -> Result<Arguments, FieldError> {
    let mut arguments = Arguments::new();

    for argument in &field.arguments {
        if let Some(value) = raw.get(argument.name.as_str()) {
            arguments.insert(
                argument.host_name.clone(),
                decode_value(model, &argument.ty, value)?,
            );
        }
    }

    Ok(arguments)
}

pub fn decode_value(
    model: &SchemaModel,
    ty: &WireTypeRef,
    value: &ConstValue,
) -> Result<Val, FieldError> {
    match (ty, value) {
        (WireTypeRef::NonNull(inner), _) => decode_value(model, inner, value),
        (_, ConstValue::Null) => Ok(Val::Null),
        (WireTypeRef::List(inner), ConstValue::List(items)) => items
            .iter()
            .map(|item| decode_value(model, inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Val::List),
        // Input coercion: a single value stands for a list of one
        (WireTypeRef::List(inner), _) => Ok(Val::List(vec![decode_value(model, inner, value)?])),
        (WireTypeRef::Named(name), _) => match model.get(name) {
            Some(WireType::Scalar(scalar)) => Ok(scalar.codec.parse(value)?),
            Some(WireType::Enum(descriptor)) => Ok(descriptor.parse(value)?),
            Some(WireType::InputObject(input)) => decode_input_object(model, input, value),
            Some(other) => Err(FieldError::new(format!(
                "Type `{name}` is an {} and cannot be used as an input",
                other.kind()
            ))),
            None => Err(FieldError::new(format!("Unknown type `{name}`"))),
        },
    }
}

fn decode_input_object(
    model: &SchemaModel,
    input: &InputObjectType,
    value: &ConstValue,
) -> Result<Val, FieldError> {
    let ConstValue::Object(entries) = value else {
        return Err(FieldError::new(format!(
            "Expected an object for `{}`, found {value}",
            input.name
        )));
    };

    let mut decoded = IndexMap::new();
    for field in &input.fields {
        let value = match (entries.get(field.name.as_str()), &field.default) {
            (Some(value), _) => decode_value(model, &field.ty, value)?,
            (None, Some(default)) => decode_value(model, &field.ty, default)?,
            (None, None) => continue,
        };
        decoded.insert(field.host_name.clone(), value);
    }

    match &input.loader {
        Some(loader) => loader(decoded),
        None => Ok(Val::Object(decoded)),
    }
}
