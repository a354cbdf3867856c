// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The wire type graph produced by the builder.
//!
//! Types refer to each other by name only, so a registry entry can be created before the types it
//! mentions exist.

use std::fmt::{Display, Formatter};

use async_graphql_value::ConstValue;

use crate::{
    casing::Casing,
    host_type::{ConnectionResolver, EnumDescriptor, Loader},
    mapped_arena::MappedArena,
    scalar::ScalarType,
};

pub const QUERY_TYPE: &str = "Query";
pub const MUTATION_TYPE: &str = "Mutation";
pub const SUBSCRIPTION_TYPE: &str = "Subscription";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireTypeRef {
    Named(String),
    NonNull(Box<WireTypeRef>),
    List(Box<WireTypeRef>),
}

impl WireTypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        WireTypeRef::Named(name.into())
    }

    pub fn non_null(self) -> Self {
        match self {
            WireTypeRef::NonNull(_) => self,
            other => WireTypeRef::NonNull(Box::new(other)),
        }
    }

    pub fn list(self) -> Self {
        WireTypeRef::List(Box::new(self))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, WireTypeRef::NonNull(_))
    }

    /// The named type at the core of any list and non-null wrappers
    pub fn base_name(&self) -> &str {
        match self {
            WireTypeRef::Named(name) => name,
            WireTypeRef::NonNull(inner) | WireTypeRef::List(inner) => inner.base_name(),
        }
    }
}

impl Display for WireTypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WireTypeRef::Named(name) => write!(f, "{name}"),
            WireTypeRef::NonNull(inner) => write!(f, "{inner}!"),
            WireTypeRef::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

/// Marks a field whose type is a connection, and how to resolve it.
#[derive(Clone)]
pub struct ConnectionBinding {
    pub element_type: String,
    pub resolver: Option<ConnectionResolver>,
}

impl std::fmt::Debug for ConnectionBinding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionBinding")
            .field("element_type", &self.element_type)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct WireArgument {
    pub name: String,
    /// Name the resolver receives the argument under
    pub host_name: String,
    pub description: Option<String>,
    pub ty: WireTypeRef,
    pub default: Option<ConstValue>,
}

#[derive(Debug, Clone)]
pub struct WireField {
    pub name: String,
    /// Name of the host field, used for hook and attribute lookup. Casing is not reversible in
    /// general (`point_x_y` and `point_xy` are both `pointXY`), so it is kept from the build.
    pub host_name: String,
    pub description: Option<String>,
    pub ty: WireTypeRef,
    pub arguments: Vec<WireArgument>,
    pub connection: Option<ConnectionBinding>,
}

impl WireField {
    /// A field whose wire and host names are the same
    pub fn new(name: impl Into<String>, ty: WireTypeRef) -> Self {
        let name = name.into();
        Self {
            host_name: name.clone(),
            name,
            description: None,
            ty,
            arguments: vec![],
            connection: None,
        }
    }

    pub fn argument(&self, name: &str) -> Option<&WireArgument> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct WireInputField {
    pub name: String,
    pub host_name: String,
    pub description: Option<String>,
    pub ty: WireTypeRef,
    pub default: Option<ConstValue>,
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<WireField>,
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<WireField>,
}

#[derive(Clone)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<WireInputField>,
    pub loader: Option<Loader>,
}

impl std::fmt::Debug for InputObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputObjectType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("loader", &self.loader.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum WireType {
    Scalar(ScalarType),
    Enum(EnumDescriptor),
    Object(ObjectType),
    Interface(InterfaceType),
    InputObject(InputObjectType),
}

impl WireType {
    pub fn name(&self) -> &str {
        match self {
            WireType::Scalar(scalar) => &scalar.wire_name,
            WireType::Enum(e) => &e.name,
            WireType::Object(o) => &o.name,
            WireType::Interface(i) => &i.name,
            WireType::InputObject(i) => &i.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WireType::Scalar(_) => "scalar",
            WireType::Enum(_) => "enum",
            WireType::Object(_) => "object",
            WireType::Interface(_) => "interface",
            WireType::InputObject(_) => "input object",
        }
    }

    /// Output fields of an object or interface
    pub fn fields(&self) -> Option<&[WireField]> {
        match self {
            WireType::Object(o) => Some(&o.fields),
            WireType::Interface(i) => Some(&i.fields),
            _ => None,
        }
    }
}

/// The complete, immutable result of a schema build.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    pub types: MappedArena<WireType>,
    pub query: String,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
    pub casing: Casing,
}

impl SchemaModel {
    pub fn get(&self, name: &str) -> Option<&WireType> {
        self.types.get_by_key(name)
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&WireField> {
        self.get(type_name)?
            .fields()?
            .iter()
            .find(|f| f.name == field_name)
    }
}
