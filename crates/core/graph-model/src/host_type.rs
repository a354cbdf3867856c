// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Explicit description of host types.
//!
//! Records, enums and connection kinds describe themselves through a `describe` function. Field
//! types refer to these functions instead of to the descriptors themselves, so that records may
//! refer to each other (or to themselves) without building an infinite value.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    error::{CodecError, FieldError},
    field::FieldDescriptor,
    source::{Arguments, HookFuture, ResolveInfo},
    value::{EnumVal, Val},
};

/// Builds the host value of an input record from its decoded (host-named) fields.
pub type Loader = Arc<dyn Fn(IndexMap<String, Val>) -> Result<Val, FieldError> + Send + Sync>;

/// Resolves the field of a connection type for a given parent.
pub type ConnectionResolver = Arc<dyn Fn(ConnectionRequest) -> HookFuture + Send + Sync>;

#[derive(Clone)]
pub enum HostType {
    /// A scalar, named by its host name (`i64`, `String`, `DateTime`...)
    Scalar(String),
    Enum(fn() -> EnumDescriptor),
    List(Box<HostType>),
    Optional(Box<HostType>),
    Record(fn() -> RecordDescriptor),
    Connection {
        kind: fn() -> ConnectionDescriptor,
        element: Box<HostType>,
    },
    /// A reference to a type that is registered separately
    Named(String),
}

impl HostType {
    pub fn int() -> Self {
        HostType::Scalar("i64".to_string())
    }

    pub fn float() -> Self {
        HostType::Scalar("f64".to_string())
    }

    pub fn boolean() -> Self {
        HostType::Scalar("bool".to_string())
    }

    pub fn string() -> Self {
        HostType::Scalar("String".to_string())
    }

    pub fn id() -> Self {
        HostType::Scalar("ID".to_string())
    }

    pub fn date_time() -> Self {
        HostType::Scalar("DateTime".to_string())
    }

    pub fn dictionary() -> Self {
        HostType::Scalar("Dictionary".to_string())
    }

    pub fn decimal() -> Self {
        HostType::Scalar("Decimal".to_string())
    }

    pub fn scalar(host_name: impl Into<String>) -> Self {
        HostType::Scalar(host_name.into())
    }

    pub fn named(name: impl Into<String>) -> Self {
        HostType::Named(name.into())
    }

    pub fn record<R: Record>() -> Self {
        HostType::Record(R::describe)
    }

    pub fn enumeration<E: HostEnum>() -> Self {
        HostType::Enum(E::describe)
    }

    pub fn list(element: HostType) -> Self {
        HostType::List(Box::new(element))
    }

    pub fn optional(inner: HostType) -> Self {
        HostType::Optional(Box::new(inner))
    }

    pub fn connection<C: ConnectionKind>(element: HostType) -> Self {
        HostType::Connection {
            kind: C::describe,
            element: Box::new(element),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, HostType::Optional(_))
    }

    /// Name used in diagnostics and as a key in type caches.
    pub fn name(&self) -> String {
        match self {
            HostType::Scalar(name) | HostType::Named(name) => name.clone(),
            HostType::Enum(describe) => describe().name,
            HostType::Record(describe) => describe().name,
            HostType::Connection { element, .. } => format!("{}Connection", element.name()),
            HostType::List(_) => "List".to_string(),
            HostType::Optional(_) => "Optional".to_string(),
        }
    }
}

impl std::fmt::Debug for HostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostType::List(inner) => write!(f, "List({inner:?})"),
            HostType::Optional(inner) => write!(f, "Optional({inner:?})"),
            other => write!(f, "{}", other.name()),
        }
    }
}

#[derive(Clone)]
pub struct RecordDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    /// Names of interface types this record implements
    pub interfaces: Vec<String>,
    /// When set, input values of this record are built through the loader instead of being left
    /// as mappings.
    pub loader: Option<Loader>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: vec![],
            interfaces: vec![],
            loader: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn loader(
        mut self,
        loader: impl Fn(IndexMap<String, Val>) -> Result<Val, FieldError> + Send + Sync + 'static,
    ) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }
}

impl std::fmt::Debug for RecordDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("interfaces", &self.interfaces)
            .field("loader", &self.loader.is_some())
            .finish()
    }
}

/// A host record type.
pub trait Record {
    fn describe() -> RecordDescriptor;
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

/// A host enumeration. Values cross the wire as their member names.
pub trait HostEnum: Copy + 'static {
    const NAME: &'static str;

    fn members() -> &'static [Self];

    fn member(&self) -> &'static str;

    fn description() -> Option<&'static str> {
        None
    }

    fn from_member(member: &str) -> Option<Self> {
        Self::members().iter().find(|m| m.member() == member).copied()
    }

    fn describe() -> EnumDescriptor {
        EnumDescriptor {
            name: Self::NAME.to_string(),
            description: Self::description().map(str::to_string),
            members: Self::members()
                .iter()
                .map(|m| m.member().to_string())
                .collect(),
        }
    }

    fn to_val(&self) -> Val {
        Val::Enum(EnumVal::new(Self::NAME, self.member()))
    }

    fn from_val(val: &Val) -> Result<Self, CodecError> {
        match val {
            Val::Enum(e) if e.type_name == Self::NAME => {
                Self::from_member(&e.member).ok_or_else(|| CodecError::UnknownMember {
                    enum_name: Self::NAME.to_string(),
                    member: e.member.clone(),
                })
            }
            Val::Enum(e) => Err(CodecError::EnumMismatch {
                expected: Self::NAME.to_string(),
                found: e.type_name.clone(),
            }),
            other => Err(CodecError::Parse {
                scalar: Self::NAME.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// What a connection resolver receives.
pub struct ConnectionRequest {
    /// The parent value the connection field belongs to
    pub source: Val,
    /// Host name of the connection field
    pub field_name: String,
    /// Name of the element record
    pub element_type: String,
    pub info: ResolveInfo,
    pub arguments: Arguments,
}

#[derive(Clone, Default)]
pub struct ConnectionDescriptor {
    pub description: Option<String>,
    /// Fields added to the generated connection type, beside `edges` and `pageInfo`
    pub fields: Vec<FieldDescriptor>,
    pub resolver: Option<ConnectionResolver>,
}

impl ConnectionDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn resolver(
        mut self,
        resolver: impl Fn(ConnectionRequest) -> HookFuture + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }
}

impl std::fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("fields", &self.fields)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

/// A family of connection types sharing extra fields and a resolver. The generated type is named
/// after the element (`BookConnection`) whatever the kind, so every kind used with one element
/// must declare the same extra fields.
pub trait ConnectionKind {
    fn describe() -> ConnectionDescriptor;
}

/// The plain connection kind. It has no resolver, so fields of this type fall back to ordinary
/// resolution.
pub struct Connection;

impl ConnectionKind for Connection {
    fn describe() -> ConnectionDescriptor {
        ConnectionDescriptor::new()
    }
}
