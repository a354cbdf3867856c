// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Host argument values to GraphQL literals, guided by the introspected argument types.

use async_graphql_value::{ConstValue, Name};
use indexmap::IndexMap;
use serde_json::Value;

use graph_model::casing::Casing;

use crate::{
    error::DslError,
    introspection::{FullType, IntrospectedSchema, TypeKind, TypeRef},
};

pub(crate) fn serialize(
    schema: &IntrospectedSchema,
    casing: Casing,
    name: &str,
    ty: &TypeRef,
    value: &Value,
) -> Result<ConstValue, DslError> {
    match (ty.kind, value) {
        (TypeKind::NonNull, _) => serialize(schema, casing, name, of_type(name, ty)?, value),
        (_, Value::Null) => Ok(ConstValue::Null),
        (TypeKind::List, Value::Array(items)) => items
            .iter()
            .map(|item| serialize(schema, casing, name, of_type(name, ty)?, item))
            .collect::<Result<Vec<_>, _>>()
            .map(ConstValue::List),
        // A single value stands for a list of one
        (TypeKind::List, _) => Ok(ConstValue::List(vec![serialize(
            schema,
            casing,
            name,
            of_type(name, ty)?,
            value,
        )?])),
        _ => {
            let type_name = ty.name.as_deref().unwrap_or_default();
            let named = schema.get(type_name)?;

            match named.kind {
                TypeKind::Enum => serialize_enum(named, name, value),
                TypeKind::InputObject => serialize_input_object(schema, casing, named, name, value),
                TypeKind::Scalar => ConstValue::from_json(value.clone())
                    .map_err(|_| invalid_value(name, "a scalar value", value)),
                _ => Err(invalid_value(name, "an input type", value)),
            }
        }
    }
}

fn of_type<'a>(name: &str, ty: &'a TypeRef) -> Result<&'a TypeRef, DslError> {
    ty.of_type
        .as_deref()
        .ok_or_else(|| invalid_value(name, "a wrapped type", &Value::Null))
}

fn serialize_enum(named: &FullType, name: &str, value: &Value) -> Result<ConstValue, DslError> {
    let member = value
        .as_str()
        .filter(|member| {
            named
                .enum_values
                .iter()
                .flatten()
                .any(|known| known.name == *member)
        })
        .ok_or_else(|| invalid_value(name, &format!("a member of enum `{}`", named.name), value))?;

    Ok(ConstValue::Enum(Name::new(member)))
}

fn serialize_input_object(
    schema: &IntrospectedSchema,
    casing: Casing,
    named: &FullType,
    name: &str,
    value: &Value,
) -> Result<ConstValue, DslError> {
    let Value::Object(entries) = value else {
        return Err(invalid_value(
            name,
            &format!("an object for `{}`", named.name),
            value,
        ));
    };

    let mut fields = IndexMap::new();
    for (key, value) in entries {
        let wire_name = casing.to_wire(key);
        let field = named
            .input_field(&wire_name)
            .ok_or_else(|| DslError::UnknownArgument {
                field: named.name.clone(),
                argument: key.clone(),
            })?;
        fields.insert(
            Name::new(&wire_name),
            serialize(schema, casing, &wire_name, &field.ty, value)?,
        );
    }

    Ok(ConstValue::Object(fields))
}

fn invalid_value(name: &str, expected: &str, value: &Value) -> DslError {
    DslError::InvalidValue {
        name: name.to_string(),
        expected: expected.to_string(),
        value: value.to_string(),
    }
}
