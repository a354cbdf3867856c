// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Cursor-pagination types.
//!
//! A connection of `Book` produces `BookConnection` (edges, page info and the extra fields of its
//! connection kind), `BookEdge` (a node and a cursor) and `BookNode` (the fields of `Book`). They
//! implement the `Connection`, `Edge` and `Node` interfaces, which are built once per schema, on
//! first use. The interfaces carry only the fields whose type is the same for every element.

use tracing::debug;

use graph_model::{
    error::ModelBuildingError,
    host_type::{ConnectionDescriptor, HostType, RecordDescriptor},
    wire::{InterfaceType, ObjectType, WireArgument, WireField, WireType, WireTypeRef},
};

use crate::{
    building::ModelBuilding,
    type_walker::{self, unwrap_optional},
};

pub const NODE_INTERFACE: &str = "Node";
pub const EDGE_INTERFACE: &str = "Edge";
pub const CONNECTION_INTERFACE: &str = "Connection";
pub const PAGE_INFO_TYPE: &str = "PageInfo";

/// Arguments of every connection field, with the host scalar of each
const PAGINATION_ARGUMENTS: [(&str, &str, &str); 4] = [
    (
        "first",
        "i64",
        "Retrieve only the first `n` nodes of this connection",
    ),
    (
        "last",
        "i64",
        "Retrieve only the last `n` nodes of this connection",
    ),
    (
        "before",
        "String",
        "Retrieve nodes for this connection before this cursor",
    ),
    (
        "after",
        "String",
        "Retrieve nodes for this connection after this cursor",
    ),
];

pub fn is_marker_interface(name: &str) -> bool {
    [NODE_INTERFACE, EDGE_INTERFACE, CONNECTION_INTERFACE].contains(&name)
}

pub fn build_connection(
    kind: fn() -> ConnectionDescriptor,
    element: &HostType,
    building: &mut ModelBuilding,
) -> Result<WireTypeRef, ModelBuildingError> {
    let element_descriptor = element_record(element, building)
        .ok_or_else(|| ModelBuildingError::ConnectionElement(element.name()))?;
    let element_name = element_descriptor.name.clone();
    let connection_name = format!("{element_name}Connection");

    let descriptor = kind();
    let extra_fields: Vec<String> = descriptor.fields.iter().map(|f| f.name.clone()).collect();

    match building.types.get_by_key(&connection_name) {
        Some(WireType::Object(_)) => {
            return match building.connection_fields.get(&connection_name) {
                Some(defined) if *defined != extra_fields => Err(
                    ModelBuildingError::ConnectionKindConflict(connection_name),
                ),
                _ => Ok(WireTypeRef::Named(connection_name)),
            };
        }
        Some(_) => return Err(ModelBuildingError::NameConflict(connection_name)),
        None => {}
    }

    if !has_node_id(&element_descriptor, building) {
        return Err(ModelBuildingError::ConnectionElement(element_name));
    }

    ensure_markers(building)?;

    debug!(name = connection_name.as_str(), "Building connection type");

    building
        .connection_fields
        .insert(connection_name.clone(), extra_fields);
    let id = building.types.add(
        &connection_name,
        WireType::Object(ObjectType {
            name: connection_name.clone(),
            description: descriptor.description.clone(),
            fields: vec![],
            interfaces: vec![CONNECTION_INTERFACE.to_string()],
        }),
    );

    // The node slot of the edge is the element itself, tagged as a node
    let node_name = format!("{element_name}Node");
    type_walker::build_object_named(
        &node_name,
        &element_descriptor,
        vec![NODE_INTERFACE.to_string()],
        building,
    )?;

    let edge_name = format!("{element_name}Edge");
    let cursor = type_walker::register_scalar("String", building)?.non_null();
    add_type(
        WireType::Object(ObjectType {
            name: edge_name.clone(),
            description: None,
            fields: vec![
                WireField::new("node", WireTypeRef::Named(node_name).non_null()),
                WireField::new("cursor", cursor),
            ],
            interfaces: vec![EDGE_INTERFACE.to_string()],
        }),
        building,
    )?;

    let mut fields = vec![
        WireField {
            description: Some("Connection edges".to_string()),
            ..WireField::new(
                "edges",
                WireTypeRef::Named(edge_name).non_null().list().non_null(),
            )
        },
        WireField {
            description: Some("Pagination information".to_string()),
            ..building.field("page_info", WireTypeRef::named(PAGE_INFO_TYPE))
        },
    ];
    fields.extend(type_walker::build_output_fields(
        &connection_name,
        &descriptor.fields,
        building,
    )?);

    if let WireType::Object(object) = building.types.get_by_id_mut(id) {
        object.fields = fields;
    }

    Ok(WireTypeRef::Named(connection_name))
}

/// Add `first`, `last`, `before` and `after`, unless declared explicitly.
pub fn add_pagination_arguments(
    arguments: &mut Vec<WireArgument>,
    building: &mut ModelBuilding,
) -> Result<(), ModelBuildingError> {
    for (name, host_scalar, description) in PAGINATION_ARGUMENTS {
        if arguments.iter().any(|a| a.name == name) {
            continue;
        }

        let ty = type_walker::register_scalar(host_scalar, building)?;
        arguments.push(WireArgument {
            name: name.to_string(),
            host_name: name.to_string(),
            description: Some(description.to_string()),
            ty,
            default: None,
        });
    }

    Ok(())
}

/// Build `Node`, `Edge`, `Connection` and `PageInfo` unless already present.
pub fn ensure_markers(building: &mut ModelBuilding) -> Result<(), ModelBuildingError> {
    if let Some(WireType::Interface(_)) = building.types.get_by_key(CONNECTION_INTERFACE) {
        return Ok(());
    }

    debug!("Building connection interfaces");

    let id = type_walker::register_scalar("ID", building)?;
    let string = type_walker::register_scalar("String", building)?;
    let boolean = type_walker::register_scalar("bool", building)?;

    let described = |field: WireField, description: &str| WireField {
        description: Some(description.to_string()),
        ..field
    };

    let page_info = WireType::Object(ObjectType {
        name: PAGE_INFO_TYPE.to_string(),
        description: None,
        fields: vec![
            described(
                building.field("has_next", boolean.clone().non_null()),
                "When paginating forwards, are there more items?",
            ),
            described(
                building.field("has_previous", boolean.non_null()),
                "When paginating backwards, are there more items?",
            ),
            described(
                building.field("start_cursor", string.clone()),
                "Pagination start cursor",
            ),
            described(
                building.field("end_cursor", string.clone()),
                "Pagination end cursor",
            ),
        ],
        interfaces: vec![],
    });

    let node = interface(NODE_INTERFACE, vec![WireField::new("id", id.non_null())]);

    // `node` and `edges` are typed per element (`BookNode!`, `[BookEdge!]!`), and interface
    // field types must match their implementations exactly, so the interfaces leave them out.
    let edge = interface(
        EDGE_INTERFACE,
        vec![described(
            WireField::new("cursor", string.non_null()),
            "Pagination cursor",
        )],
    );

    let connection = interface(
        CONNECTION_INTERFACE,
        vec![described(
            building.field("page_info", WireTypeRef::named(PAGE_INFO_TYPE)),
            "Pagination information",
        )],
    );

    for typ in [page_info, node, edge, connection] {
        add_type(typ, building)?;
    }

    Ok(())
}

fn interface(name: &str, fields: Vec<WireField>) -> WireType {
    WireType::Interface(InterfaceType {
        name: name.to_string(),
        description: None,
        fields,
    })
}

fn add_type(typ: WireType, building: &mut ModelBuilding) -> Result<(), ModelBuildingError> {
    match building.types.get_by_key(typ.name()) {
        Some(existing) if existing.kind() == typ.kind() => Ok(()),
        Some(_) => Err(ModelBuildingError::NameConflict(typ.name().to_string())),
        None => {
            let name = typ.name().to_string();
            building.types.add(&name, typ);
            Ok(())
        }
    }
}

fn element_record(element: &HostType, building: &ModelBuilding) -> Option<RecordDescriptor> {
    match unwrap_optional(element) {
        HostType::Record(describe) => Some(describe()),
        HostType::Named(name) => building.record_descriptor(name).cloned(),
        _ => None,
    }
}

/// Whether the element can implement `Node`, which requires `id: ID!`
fn has_node_id(descriptor: &RecordDescriptor, building: &ModelBuilding) -> bool {
    descriptor.fields.iter().any(|field| {
        !field.is_hidden()
            && !field.inputonly
            && field.required()
            && building.wire_name(field.source_name()) == "id"
            && matches!(
                &field.host_type,
                HostType::Scalar(host_name)
                    if building.scalar(host_name).is_some_and(|s| s.wire_name == "ID")
            )
    })
}
