// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{fmt::Display, sync::Arc};

use async_graphql_value::{ConstValue, Name};
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;

use crate::{
    error::FieldError,
    source::{Arguments, HookFuture, HookKind, ResolveInfo, Resolver, Source},
};

#[derive(Clone, Debug, PartialEq)]
pub enum ValNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl ValNumber {
    pub fn as_f64(&self) -> f64 {
        match self {
            ValNumber::I64(n) => *n as f64,
            ValNumber::U64(n) => *n as f64,
            ValNumber::F64(n) => *n,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ValNumber::I64(n) => Some(*n),
            ValNumber::U64(n) => i64::try_from(*n).ok(),
            ValNumber::F64(n) if n.fract() == 0.0 => Some(*n as i64),
            ValNumber::F64(_) => None,
        }
    }
}

impl Display for ValNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValNumber::I64(n) => write!(f, "{n}"),
            ValNumber::U64(n) => write!(f, "{n}"),
            ValNumber::F64(n) => write!(f, "{n}"),
        }
    }
}

impl From<serde_json::Number> for ValNumber {
    fn from(value: serde_json::Number) -> Self {
        if let Some(n) = value.as_i64() {
            ValNumber::I64(n)
        } else if let Some(n) = value.as_u64() {
            ValNumber::U64(n)
        } else {
            ValNumber::F64(value.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl TryFrom<&ValNumber> for serde_json::Number {
    type Error = ();

    fn try_from(value: &ValNumber) -> Result<Self, Self::Error> {
        match value {
            ValNumber::I64(n) => Ok(serde_json::Number::from(*n)),
            ValNumber::U64(n) => Ok(serde_json::Number::from(*n)),
            ValNumber::F64(n) => serde_json::Number::from_f64(*n).ok_or(()),
        }
    }
}

/// A member of a specific enum. Two enums sharing a member name still produce distinct values.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumVal {
    pub type_name: String,
    pub member: String,
}

impl EnumVal {
    pub fn new(type_name: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            member: member.into(),
        }
    }
}

/// A host value, as produced by resolvers and consumed by the dispatcher.
///
/// Mapping-shaped data uses `Object`; object-shaped data (values with resolver hooks) uses
/// `Source`.
#[derive(Clone)]
pub enum Val {
    Null,
    Bool(bool),
    Number(ValNumber),
    String(String),
    List(Vec<Val>),
    Object(IndexMap<String, Val>),
    DateTime(DateTime<FixedOffset>),
    Decimal(BigDecimal),
    Enum(EnumVal),
    Source(Arc<dyn Source>),
    Thunk(Resolver),
}

impl Val {
    pub fn source(source: impl Source) -> Self {
        Val::Source(Arc::new(source))
    }

    pub fn object<K: Into<String>, V: Into<Val>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Val::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn list<V: Into<Val>>(items: impl IntoIterator<Item = V>) -> Self {
        Val::List(items.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, key: &str) -> Option<&Val> {
        match self {
            Val::Object(o) => o.get(key),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Val::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Val::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Val::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Val]> {
        match self {
            Val::List(l) => Some(l),
            _ => None,
        }
    }

    /// Name of the concrete object type, when the value carries one.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Val::Source(s) => Some(s.type_name()),
            Val::Object(o) => o.get("__typename").and_then(Val::as_str),
            _ => None,
        }
    }

    /// Short description of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Val::Null => "null",
            Val::Bool(_) => "boolean",
            Val::Number(_) => "number",
            Val::String(_) => "string",
            Val::List(_) => "list",
            Val::Object(_) => "mapping",
            Val::DateTime(_) => "datetime",
            Val::Decimal(_) => "decimal",
            Val::Enum(_) => "enum",
            Val::Source(_) => "object",
            Val::Thunk(_) => "resolver",
        }
    }

    /// Invoke a resolver hook on an object-shaped value. `None` when the value has no such hook.
    pub fn invoke(
        &self,
        kind: HookKind,
        field_name: &str,
        info: ResolveInfo,
        arguments: Arguments,
    ) -> Option<HookFuture> {
        match self {
            Val::Source(source) => source.clone().invoke(kind, field_name, info, arguments),
            _ => None,
        }
    }

    /// Plain wire value of this host value, without any scalar-specific encoding.
    pub fn to_const(&self) -> Result<ConstValue, FieldError> {
        Ok(match self {
            Val::Null => ConstValue::Null,
            Val::Bool(b) => ConstValue::Boolean(*b),
            Val::Number(n) => ConstValue::Number(
                n.try_into()
                    .map_err(|_| FieldError::Unrepresentable(n.to_string()))?,
            ),
            Val::String(s) => ConstValue::String(s.clone()),
            Val::List(l) => ConstValue::List(l.iter().map(Val::to_const).collect::<Result<_, _>>()?),
            Val::Object(o) => ConstValue::Object(
                o.iter()
                    .map(|(k, v)| Ok((Name::new(k), v.to_const()?)))
                    .collect::<Result<_, FieldError>>()?,
            ),
            Val::DateTime(dt) => ConstValue::String(dt.to_rfc3339()),
            Val::Decimal(d) => d
                .to_f64()
                .map(ConstValue::from)
                .ok_or_else(|| FieldError::Unrepresentable(d.to_string()))?,
            Val::Enum(e) => ConstValue::Enum(Name::new(&e.member)),
            Val::Source(_) | Val::Thunk(_) => {
                return Err(FieldError::Unrepresentable(self.kind().to_string()));
            }
        })
    }
}

impl std::fmt::Debug for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Val::Null => write!(f, "Null"),
            Val::Bool(b) => write!(f, "Bool({b})"),
            Val::Number(n) => write!(f, "Number({n})"),
            Val::String(s) => write!(f, "String({s:?})"),
            Val::List(l) => f.debug_list().entries(l).finish(),
            Val::Object(o) => f.debug_map().entries(o).finish(),
            Val::DateTime(dt) => write!(f, "DateTime({dt})"),
            Val::Decimal(d) => write!(f, "Decimal({d})"),
            Val::Enum(e) => write!(f, "Enum({}.{})", e.type_name, e.member),
            Val::Source(s) => write!(f, "Source({})", s.type_name()),
            Val::Thunk(_) => write!(f, "Thunk"),
        }
    }
}

impl PartialEq for Val {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Val::Null, Val::Null) => true,
            (Val::Bool(l), Val::Bool(r)) => l == r,
            (Val::Number(l), Val::Number(r)) => l.as_f64() == r.as_f64(),
            (Val::String(l), Val::String(r)) => l == r,
            (Val::List(l), Val::List(r)) => l == r,
            (Val::Object(l), Val::Object(r)) => l == r,
            (Val::DateTime(l), Val::DateTime(r)) => l == r,
            (Val::Decimal(l), Val::Decimal(r)) => l == r,
            (Val::Enum(l), Val::Enum(r)) => l == r,
            (Val::Source(l), Val::Source(r)) => Arc::ptr_eq(l, r),
            (Val::Thunk(l), Val::Thunk(r)) => Arc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Val::Null => write!(f, "null"),
            Val::Bool(b) => write!(f, "{b}"),
            Val::Number(n) => write!(f, "{n}"),
            Val::String(s) => write!(f, "\"{s}\""),
            Val::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Val::Object(o) => {
                write!(f, "{{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Val::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Val::Decimal(d) => write!(f, "{d}"),
            Val::Enum(e) => write!(f, "{}", e.member),
            Val::Source(s) => write!(f, "<{}>", s.type_name()),
            Val::Thunk(_) => write!(f, "<resolver>"),
        }
    }
}

impl From<ConstValue> for Val {
    fn from(value: ConstValue) -> Self {
        match value {
            ConstValue::Null => Val::Null,
            ConstValue::Boolean(b) => Val::Bool(b),
            ConstValue::Number(n) => Val::Number(n.into()),
            ConstValue::String(s) => Val::String(s),
            ConstValue::List(l) => Val::List(l.into_iter().map(Val::from).collect()),
            ConstValue::Object(o) => Val::Object(
                o.into_iter()
                    .map(|(k, v)| (k.to_string(), Val::from(v)))
                    .collect(),
            ),
            ConstValue::Binary(b) => Val::List(b.iter().map(|byte| Val::from(*byte as i64)).collect()),
            ConstValue::Enum(e) => Val::String(e.to_string()),
        }
    }
}

impl From<serde_json::Value> for Val {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Val::Null,
            serde_json::Value::Bool(b) => Val::Bool(b),
            serde_json::Value::Number(n) => Val::Number(n.into()),
            serde_json::Value::String(s) => Val::String(s),
            serde_json::Value::Array(l) => Val::List(l.into_iter().map(Val::from).collect()),
            serde_json::Value::Object(o) => {
                Val::Object(o.into_iter().map(|(k, v)| (k, Val::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Val {
    fn from(value: bool) -> Self {
        Val::Bool(value)
    }
}

impl From<i32> for Val {
    fn from(value: i32) -> Self {
        Val::Number(ValNumber::I64(value as i64))
    }
}

impl From<i64> for Val {
    fn from(value: i64) -> Self {
        Val::Number(ValNumber::I64(value))
    }
}

impl From<u64> for Val {
    fn from(value: u64) -> Self {
        Val::Number(ValNumber::U64(value))
    }
}

impl From<usize> for Val {
    fn from(value: usize) -> Self {
        Val::Number(ValNumber::U64(value as u64))
    }
}

impl From<f64> for Val {
    fn from(value: f64) -> Self {
        Val::Number(ValNumber::F64(value))
    }
}

impl From<&str> for Val {
    fn from(value: &str) -> Self {
        Val::String(value.to_string())
    }
}

impl From<String> for Val {
    fn from(value: String) -> Self {
        Val::String(value)
    }
}

impl From<DateTime<FixedOffset>> for Val {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Val::DateTime(value)
    }
}

impl From<BigDecimal> for Val {
    fn from(value: BigDecimal) -> Self {
        Val::Decimal(value)
    }
}

impl From<EnumVal> for Val {
    fn from(value: EnumVal) -> Self {
        Val::Enum(value)
    }
}

impl From<IndexMap<String, Val>> for Val {
    fn from(value: IndexMap<String, Val>) -> Self {
        Val::Object(value)
    }
}

impl<T: Into<Val>> From<Vec<T>> for Val {
    fn from(value: Vec<T>) -> Self {
        Val::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Val>> From<Option<T>> for Val {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Val::Null)
    }
}
