// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Maps host types to wire types.
//!
//! Named types are registered before their fields are built, so a record that refers back to
//! itself (directly or through other records) finds its own registration instead of being built
//! again.

use async_graphql_value::ConstValue;
use tracing::debug;

use graph_model::{
    error::ModelBuildingError,
    field::{ArgumentDescriptor, FieldDescriptor},
    host_type::{EnumDescriptor, HostType, RecordDescriptor},
    value::Val,
    wire::{
        ConnectionBinding, InputObjectType, InterfaceType, ObjectType, WireArgument, WireField,
        WireInputField, WireType, WireTypeRef,
    },
};

use crate::{building::ModelBuilding, connection_builder};

/// The wire type of a host type used as a field type. Non-null wrapping is left to the field.
pub fn map_output(
    host_type: &HostType,
    building: &mut ModelBuilding,
) -> Result<WireTypeRef, ModelBuildingError> {
    match host_type {
        HostType::Scalar(host_name) => register_scalar(host_name, building),
        HostType::Connection { kind, element } => {
            connection_builder::build_connection(*kind, element, building)
        }
        HostType::Enum(describe) => register_enum(&describe(), building),
        HostType::List(element) => Ok(map_output(element, building)?.list()),
        // Optionality shows as the absence of the non-null wrapper on the field
        HostType::Optional(inner) => map_output(inner, building),
        HostType::Record(describe) => build_object(&describe(), building),
        HostType::Named(name) => map_named_output(name, building),
    }
}

/// The wire type of a host type used as an argument or input field type.
pub fn map_input(
    host_type: &HostType,
    building: &mut ModelBuilding,
) -> Result<WireTypeRef, ModelBuildingError> {
    match host_type {
        HostType::Scalar(host_name) => register_scalar(host_name, building),
        HostType::Connection { .. } => Err(ModelBuildingError::ConnectionInput(host_type.name())),
        HostType::Enum(describe) => register_enum(&describe(), building),
        HostType::List(element) => Ok(map_input(element, building)?.list()),
        HostType::Optional(inner) => map_input(inner, building),
        HostType::Record(describe) => build_input_object(&describe(), building),
        HostType::Named(name) => map_named_input(name, building),
    }
}

pub fn register_scalar(
    host_name: &str,
    building: &mut ModelBuilding,
) -> Result<WireTypeRef, ModelBuildingError> {
    let scalar = building
        .scalar(host_name)
        .cloned()
        .ok_or_else(|| ModelBuildingError::UnmappableType(host_name.to_string()))?;
    let wire_name = scalar.wire_name.clone();

    match building.types.get_by_key(&wire_name) {
        Some(WireType::Scalar(_)) => {}
        Some(_) => return Err(ModelBuildingError::NameConflict(wire_name)),
        None => {
            building.types.add(&wire_name, WireType::Scalar(scalar));
        }
    }

    Ok(WireTypeRef::Named(wire_name))
}

pub fn register_enum(
    descriptor: &EnumDescriptor,
    building: &mut ModelBuilding,
) -> Result<WireTypeRef, ModelBuildingError> {
    match building.types.get_by_key(&descriptor.name) {
        Some(WireType::Enum(_)) => {}
        Some(_) => return Err(ModelBuildingError::NameConflict(descriptor.name.clone())),
        None => {
            if descriptor.members.is_empty() {
                return Err(ModelBuildingError::EmptyType(descriptor.name.clone()));
            }
            building
                .types
                .add(&descriptor.name, WireType::Enum(descriptor.clone()));
        }
    }

    Ok(WireTypeRef::named(&descriptor.name))
}

pub fn build_object(
    descriptor: &RecordDescriptor,
    building: &mut ModelBuilding,
) -> Result<WireTypeRef, ModelBuildingError> {
    build_object_named(
        &descriptor.name,
        descriptor,
        descriptor.interfaces.clone(),
        building,
    )
}

/// Build an object type with the fields of `descriptor` under another name.
pub(crate) fn build_object_named(
    name: &str,
    descriptor: &RecordDescriptor,
    interfaces: Vec<String>,
    building: &mut ModelBuilding,
) -> Result<WireTypeRef, ModelBuildingError> {
    match building.types.get_by_key(name) {
        Some(WireType::Object(_)) => return Ok(WireTypeRef::named(name)),
        Some(_) => return Err(ModelBuildingError::NameConflict(name.to_string())),
        None => {}
    }

    debug!(name, "Building object type");

    let id = building.types.add(
        name,
        WireType::Object(ObjectType {
            name: name.to_string(),
            description: descriptor.description.clone(),
            fields: vec![],
            interfaces: interfaces.clone(),
        }),
    );

    let fields = build_output_fields(name, &descriptor.fields, building)?;
    if fields.is_empty() {
        return Err(ModelBuildingError::EmptyType(name.to_string()));
    }

    for interface in &interfaces {
        ensure_interface(interface, building)?;
    }

    if let WireType::Object(object) = building.types.get_by_id_mut(id) {
        object.fields = fields;
    }

    Ok(WireTypeRef::named(name))
}

pub fn build_interface(
    descriptor: &RecordDescriptor,
    building: &mut ModelBuilding,
) -> Result<WireTypeRef, ModelBuildingError> {
    let name = descriptor.name.as_str();

    match building.types.get_by_key(name) {
        Some(WireType::Interface(_)) => return Ok(WireTypeRef::named(name)),
        Some(_) => return Err(ModelBuildingError::NameConflict(name.to_string())),
        None => {}
    }

    debug!(name, "Building interface type");

    let id = building.types.add(
        name,
        WireType::Interface(InterfaceType {
            name: name.to_string(),
            description: descriptor.description.clone(),
            fields: vec![],
        }),
    );

    let fields = build_output_fields(name, &descriptor.fields, building)?;
    if fields.is_empty() {
        return Err(ModelBuildingError::EmptyType(name.to_string()));
    }

    if let WireType::Interface(interface) = building.types.get_by_id_mut(id) {
        interface.fields = fields;
    }

    Ok(WireTypeRef::named(name))
}

/// Input objects are named `{Name}Input`, so a record can have both an output and an input form.
pub fn build_input_object(
    descriptor: &RecordDescriptor,
    building: &mut ModelBuilding,
) -> Result<WireTypeRef, ModelBuildingError> {
    let name = format!("{}Input", descriptor.name);

    match building.types.get_by_key(&name) {
        Some(WireType::InputObject(_)) => return Ok(WireTypeRef::Named(name)),
        Some(_) => return Err(ModelBuildingError::NameConflict(name)),
        None => {}
    }

    debug!(name, "Building input object type");

    let id = building.types.add(
        &name,
        WireType::InputObject(InputObjectType {
            name: name.clone(),
            description: descriptor.description.clone(),
            fields: vec![],
            loader: descriptor.loader.clone(),
        }),
    );

    let mut fields: Vec<WireInputField> = vec![];
    for field in descriptor
        .fields
        .iter()
        .filter(|f| !f.is_hidden() && !f.readonly)
    {
        let mut ty = map_input(&field.host_type, building)?;
        if field.required() {
            ty = ty.non_null();
        }

        let field_name = building.wire_name(field.source_name());
        if fields.iter().any(|f| f.name == field_name) {
            return Err(duplicate_field(&field_name, &name));
        }

        fields.push(WireInputField {
            name: field_name,
            host_name: field.source_name().to_string(),
            description: field.description.clone(),
            ty,
            default: default_value(field.default.as_ref(), &field.name)?,
        });
    }

    if fields.is_empty() {
        return Err(ModelBuildingError::EmptyType(name));
    }

    if let WireType::InputObject(input) = building.types.get_by_id_mut(id) {
        input.fields = fields;
    }

    Ok(WireTypeRef::Named(name))
}

pub(crate) fn build_output_fields(
    type_name: &str,
    fields: &[FieldDescriptor],
    building: &mut ModelBuilding,
) -> Result<Vec<WireField>, ModelBuildingError> {
    let mut result: Vec<WireField> = vec![];

    for field in fields.iter().filter(|f| !f.is_hidden() && !f.inputonly) {
        let wire_field = build_output_field(field, building)?;
        if result.iter().any(|f| f.name == wire_field.name) {
            return Err(duplicate_field(&wire_field.name, type_name));
        }
        result.push(wire_field);
    }

    Ok(result)
}

fn build_output_field(
    field: &FieldDescriptor,
    building: &mut ModelBuilding,
) -> Result<WireField, ModelBuildingError> {
    let mut ty = map_output(&field.host_type, building)?;
    if field.required() {
        ty = ty.non_null();
    }

    let mut arguments = field
        .arguments
        .iter()
        .map(|argument| build_argument(&field.name, argument, building))
        .collect::<Result<Vec<_>, _>>()?;

    let connection = match unwrap_optional(&field.host_type) {
        HostType::Connection { kind, element } => {
            connection_builder::add_pagination_arguments(&mut arguments, building)?;
            Some(ConnectionBinding {
                element_type: element.name(),
                resolver: kind().resolver,
            })
        }
        _ => None,
    };

    Ok(WireField {
        name: building.wire_name(field.source_name()),
        host_name: field.source_name().to_string(),
        description: field.description.clone(),
        ty,
        arguments,
        connection,
    })
}

fn build_argument(
    field_name: &str,
    argument: &ArgumentDescriptor,
    building: &mut ModelBuilding,
) -> Result<WireArgument, ModelBuildingError> {
    if !argument.is_input {
        if let Some(type_name) = record_name(&argument.host_type, building) {
            return Err(ModelBuildingError::ArgumentShape {
                field: field_name.to_string(),
                argument: argument.name.clone(),
                type_name,
            });
        }
    }

    let mut ty = map_input(&argument.host_type, building)?;
    if argument.required {
        ty = ty.non_null();
    }

    Ok(WireArgument {
        name: building.wire_name(&argument.name),
        host_name: argument.name.clone(),
        description: argument.description.clone(),
        ty,
        default: default_value(argument.default.as_ref(), &argument.name)?,
    })
}

fn map_named_output(
    name: &str,
    building: &mut ModelBuilding,
) -> Result<WireTypeRef, ModelBuildingError> {
    match building.types.get_by_key(name) {
        Some(WireType::InputObject(_)) => Err(ModelBuildingError::NameConflict(name.to_string())),
        Some(_) => Ok(WireTypeRef::named(name)),
        None => {
            if let Some(descriptor) = building.interface_descriptor(name).cloned() {
                build_interface(&descriptor, building)
            } else if let Some(descriptor) = building.record_descriptor(name).cloned() {
                build_object(&descriptor, building)
            } else if connection_builder::is_marker_interface(name) {
                connection_builder::ensure_markers(building)?;
                Ok(WireTypeRef::named(name))
            } else {
                Err(ModelBuildingError::UnmappableType(name.to_string()))
            }
        }
    }
}

fn map_named_input(
    name: &str,
    building: &mut ModelBuilding,
) -> Result<WireTypeRef, ModelBuildingError> {
    match building.types.get_by_key(name) {
        Some(WireType::Scalar(_) | WireType::Enum(_) | WireType::InputObject(_)) => {
            return Ok(WireTypeRef::named(name));
        }
        _ => {}
    }

    let descriptor = building
        .record_descriptor(name)
        .or_else(|| building.interface_descriptor(name))
        .cloned()
        .ok_or_else(|| ModelBuildingError::UnmappableType(name.to_string()))?;

    build_input_object(&descriptor, building)
}

fn ensure_interface(name: &str, building: &mut ModelBuilding) -> Result<(), ModelBuildingError> {
    match building.types.get_by_key(name) {
        Some(WireType::Interface(_)) => Ok(()),
        Some(_) => Err(ModelBuildingError::NameConflict(name.to_string())),
        None => {
            if connection_builder::is_marker_interface(name) {
                connection_builder::ensure_markers(building)
            } else if let Some(descriptor) = building.interface_descriptor(name).cloned() {
                build_interface(&descriptor, building).map(|_| ())
            } else {
                Err(ModelBuildingError::UnmappableType(name.to_string()))
            }
        }
    }
}

/// Name of the record an argument type is made of, looking through lists and optionals
fn record_name(host_type: &HostType, building: &ModelBuilding) -> Option<String> {
    match host_type {
        HostType::Record(describe) => Some(describe().name),
        HostType::List(inner) | HostType::Optional(inner) => record_name(inner, building),
        HostType::Named(name)
            if building.record_descriptor(name).is_some()
                || building.interface_descriptor(name).is_some() =>
        {
            Some(name.clone())
        }
        _ => None,
    }
}

pub(crate) fn unwrap_optional(host_type: &HostType) -> &HostType {
    match host_type {
        HostType::Optional(inner) => unwrap_optional(inner),
        other => other,
    }
}

fn default_value(
    default: Option<&Val>,
    name: &str,
) -> Result<Option<ConstValue>, ModelBuildingError> {
    default
        .map(|value| {
            value.to_const().map_err(|e| {
                ModelBuildingError::Generic(format!("Invalid default value for `{name}`: {e}"))
            })
        })
        .transpose()
}

fn duplicate_field(field_name: &str, type_name: &str) -> ModelBuildingError {
    ModelBuildingError::Generic(format!(
        "Field `{field_name}` is defined more than once on `{type_name}`"
    ))
}
