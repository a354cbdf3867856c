// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Scalar and enum codecs.
//!
//! Every conversion between a host value and its wire form goes through a codec and reports
//! failure as a [`CodecError`], which the dispatcher turns into a field error.

use std::{str::FromStr, sync::Arc};

use async_graphql_value::{ConstValue, Name};
use base64::Engine;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDateTime};

use crate::{error::CodecError, host_type::EnumDescriptor, value::Val};

const NAIVE_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub trait ScalarCodec: Send + Sync {
    /// Host value to wire value
    fn serialize(&self, value: &Val) -> Result<ConstValue, CodecError>;

    /// Wire value (literal or variable) to host value
    fn parse(&self, value: &ConstValue) -> Result<Val, CodecError>;

    /// Cheap shape check performed by the engine during input validation. The full parse happens
    /// in the dispatcher.
    fn accepts(&self, _value: &ConstValue) -> bool {
        true
    }
}

/// A scalar known to the registry, keyed by the host name it maps from.
#[derive(Clone)]
pub struct ScalarType {
    pub host_name: String,
    pub wire_name: String,
    pub description: Option<String>,
    /// Provided by the execution engine, so never registered by us
    pub builtin: bool,
    pub codec: Arc<dyn ScalarCodec>,
}

impl ScalarType {
    pub fn new(
        host_name: impl Into<String>,
        wire_name: impl Into<String>,
        codec: impl ScalarCodec + 'static,
    ) -> Self {
        Self {
            host_name: host_name.into(),
            wire_name: wire_name.into(),
            description: None,
            builtin: false,
            codec: Arc::new(codec),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn builtin(mut self) -> Self {
        self.builtin = true;
        self
    }
}

impl std::fmt::Debug for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalarType")
            .field("host_name", &self.host_name)
            .field("wire_name", &self.wire_name)
            .field("builtin", &self.builtin)
            .finish()
    }
}

pub fn default_scalars() -> Vec<ScalarType> {
    vec![
        ScalarType::new("i64", "Int", IntCodec).builtin(),
        ScalarType::new("i32", "Int", IntCodec).builtin(),
        ScalarType::new("f64", "Float", FloatCodec).builtin(),
        ScalarType::new("bool", "Boolean", BooleanCodec).builtin(),
        ScalarType::new("String", "String", StringCodec).builtin(),
        ScalarType::new("ID", "ID", IdCodec).builtin(),
        ScalarType::new("DateTime", "DateTime", DateTimeCodec)
            .description("An ISO-8601 encoded date and time"),
        ScalarType::new("Dictionary", "Dictionary", DictionaryCodec)
            .description("An arbitrary mapping of names to values"),
        ScalarType::new("Decimal", "Decimal", DecimalCodec)
            .description("An arbitrary-precision decimal number"),
    ]
}

fn serialize_error(scalar: &str, value: &Val) -> CodecError {
    CodecError::Serialize {
        scalar: scalar.to_string(),
        value: value.to_string(),
    }
}

fn parse_error(scalar: &str, value: &ConstValue) -> CodecError {
    CodecError::Parse {
        scalar: scalar.to_string(),
        value: value.to_string(),
    }
}

pub struct IntCodec;

impl ScalarCodec for IntCodec {
    fn serialize(&self, value: &Val) -> Result<ConstValue, CodecError> {
        value
            .as_i64()
            .map(ConstValue::from)
            .ok_or_else(|| serialize_error("Int", value))
    }

    fn parse(&self, value: &ConstValue) -> Result<Val, CodecError> {
        match value {
            ConstValue::Number(n) if n.is_i64() => Ok(Val::Number(n.clone().into())),
            _ => Err(parse_error("Int", value)),
        }
    }
}

pub struct FloatCodec;

impl ScalarCodec for FloatCodec {
    fn serialize(&self, value: &Val) -> Result<ConstValue, CodecError> {
        match value {
            Val::Number(n) => Ok(ConstValue::from(n.as_f64())),
            Val::Decimal(d) => d
                .to_f64()
                .map(ConstValue::from)
                .ok_or_else(|| serialize_error("Float", value)),
            _ => Err(serialize_error("Float", value)),
        }
    }

    fn parse(&self, value: &ConstValue) -> Result<Val, CodecError> {
        match value {
            ConstValue::Number(n) => Ok(Val::Number(n.clone().into())),
            _ => Err(parse_error("Float", value)),
        }
    }
}

pub struct BooleanCodec;

impl ScalarCodec for BooleanCodec {
    fn serialize(&self, value: &Val) -> Result<ConstValue, CodecError> {
        match value {
            Val::Bool(b) => Ok(ConstValue::Boolean(*b)),
            _ => Err(serialize_error("Boolean", value)),
        }
    }

    fn parse(&self, value: &ConstValue) -> Result<Val, CodecError> {
        match value {
            ConstValue::Boolean(b) => Ok(Val::Bool(*b)),
            _ => Err(parse_error("Boolean", value)),
        }
    }
}

pub struct StringCodec;

impl ScalarCodec for StringCodec {
    fn serialize(&self, value: &Val) -> Result<ConstValue, CodecError> {
        match value {
            Val::String(s) => Ok(ConstValue::String(s.clone())),
            Val::Bool(b) => Ok(ConstValue::String(b.to_string())),
            Val::Number(n) => Ok(ConstValue::String(n.to_string())),
            _ => Err(serialize_error("String", value)),
        }
    }

    fn parse(&self, value: &ConstValue) -> Result<Val, CodecError> {
        match value {
            ConstValue::String(s) => Ok(Val::String(s.clone())),
            _ => Err(parse_error("String", value)),
        }
    }
}

/// Identifiers cross the wire as the base64 encoding of their string form.
pub struct IdCodec;

impl IdCodec {
    pub fn encode(value: &Val) -> Result<String, CodecError> {
        let plain = match value {
            Val::String(s) => s.clone(),
            Val::Number(n) => n.to_string(),
            Val::Bool(b) => b.to_string(),
            Val::Decimal(d) => d.to_string(),
            _ => return Err(serialize_error("ID", value)),
        };
        Ok(base64::engine::general_purpose::STANDARD.encode(plain))
    }

    pub fn decode(encoded: &str) -> Result<String, CodecError> {
        let malformed = |reason: String| CodecError::Malformed {
            scalar: "ID".to_string(),
            input: encoded.to_string(),
            reason,
        };

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| malformed(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| malformed(e.to_string()))
    }
}

impl ScalarCodec for IdCodec {
    fn serialize(&self, value: &Val) -> Result<ConstValue, CodecError> {
        Self::encode(value).map(ConstValue::String)
    }

    fn parse(&self, value: &ConstValue) -> Result<Val, CodecError> {
        match value {
            ConstValue::String(s) => Self::decode(s).map(Val::String),
            // Integer literals are plain ids, not encoded ones
            ConstValue::Number(n) if n.is_i64() || n.is_u64() => Ok(Val::String(n.to_string())),
            _ => Err(parse_error("ID", value)),
        }
    }
}

pub struct DateTimeCodec;

impl ScalarCodec for DateTimeCodec {
    fn serialize(&self, value: &Val) -> Result<ConstValue, CodecError> {
        match value {
            Val::DateTime(dt) => Ok(ConstValue::String(dt.to_rfc3339())),
            _ => Err(serialize_error("DateTime", value)),
        }
    }

    fn parse(&self, value: &ConstValue) -> Result<Val, CodecError> {
        let ConstValue::String(string) = value else {
            return Err(parse_error("DateTime", value));
        };

        if let Ok(datetime) = DateTime::parse_from_rfc3339(string) {
            return Ok(Val::DateTime(datetime));
        }

        // Without an offset, the value is taken as UTC
        NaiveDateTime::parse_from_str(string, NAIVE_DATE_TIME_FORMAT)
            .map(|naive| Val::DateTime(naive.and_utc().fixed_offset()))
            .map_err(|e| CodecError::Malformed {
                scalar: "DateTime".to_string(),
                input: string.clone(),
                reason: e.to_string(),
            })
    }

    fn accepts(&self, value: &ConstValue) -> bool {
        matches!(value, ConstValue::String(_))
    }
}

/// Arbitrary mappings. Inputs are either object literals or strings holding a JSON object.
pub struct DictionaryCodec;

impl ScalarCodec for DictionaryCodec {
    fn serialize(&self, value: &Val) -> Result<ConstValue, CodecError> {
        match value {
            Val::Object(_) => value
                .to_const()
                .map_err(|_| serialize_error("Dictionary", value)),
            _ => Err(serialize_error("Dictionary", value)),
        }
    }

    fn parse(&self, value: &ConstValue) -> Result<Val, CodecError> {
        match value {
            ConstValue::Object(_) => Ok(Val::from(value.clone())),
            ConstValue::String(string) => {
                let malformed = |reason: String| CodecError::Malformed {
                    scalar: "Dictionary".to_string(),
                    input: string.clone(),
                    reason,
                };

                match serde_json::from_str::<serde_json::Value>(string) {
                    Ok(json @ serde_json::Value::Object(_)) => Ok(Val::from(json)),
                    Ok(other) => Err(malformed(format!("expected a mapping, found {other}"))),
                    Err(e) => Err(malformed(e.to_string())),
                }
            }
            _ => Err(parse_error("Dictionary", value)),
        }
    }

    fn accepts(&self, value: &ConstValue) -> bool {
        matches!(value, ConstValue::Object(_) | ConstValue::String(_))
    }
}

pub struct DecimalCodec;

impl ScalarCodec for DecimalCodec {
    fn serialize(&self, value: &Val) -> Result<ConstValue, CodecError> {
        match value {
            Val::Decimal(d) => d
                .to_f64()
                .map(ConstValue::from)
                .ok_or_else(|| serialize_error("Decimal", value)),
            Val::Number(n) => Ok(ConstValue::from(n.as_f64())),
            _ => Err(serialize_error("Decimal", value)),
        }
    }

    fn parse(&self, value: &ConstValue) -> Result<Val, CodecError> {
        let literal = match value {
            ConstValue::Number(n) => n.to_string(),
            ConstValue::String(s) => s.clone(),
            _ => return Err(parse_error("Decimal", value)),
        };

        BigDecimal::from_str(&literal)
            .map(Val::Decimal)
            .map_err(|e| CodecError::Malformed {
                scalar: "Decimal".to_string(),
                input: literal,
                reason: e.to_string(),
            })
    }

    fn accepts(&self, value: &ConstValue) -> bool {
        matches!(value, ConstValue::Number(_) | ConstValue::String(_))
    }
}

impl EnumDescriptor {
    /// Only members of this exact enum serialize; a member of another enum is rejected even when
    /// the member names coincide.
    pub fn serialize(&self, value: &Val) -> Result<ConstValue, CodecError> {
        match value {
            Val::Enum(e) if e.type_name != self.name => Err(CodecError::EnumMismatch {
                expected: self.name.clone(),
                found: e.type_name.clone(),
            }),
            Val::Enum(e) => {
                self.check_member(&e.member)?;
                Ok(ConstValue::Enum(Name::new(&e.member)))
            }
            _ => Err(serialize_error(&self.name, value)),
        }
    }

    pub fn parse(&self, value: &ConstValue) -> Result<Val, CodecError> {
        let member = match value {
            ConstValue::Enum(name) => name.as_str(),
            ConstValue::String(s) => s.as_str(),
            _ => return Err(parse_error(&self.name, value)),
        };
        self.check_member(member)?;
        Ok(Val::Enum(crate::value::EnumVal::new(&self.name, member)))
    }

    fn check_member(&self, member: &str) -> Result<(), CodecError> {
        if self.members.iter().any(|m| m == member) {
            Ok(())
        } else {
            Err(CodecError::UnknownMember {
                enum_name: self.name.clone(),
                member: member.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};

    use super::*;
    use crate::value::EnumVal;

    #[test]
    fn id_round_trip() {
        for value in [Val::from("books:1"), Val::from(42i64), Val::from("")] {
            let encoded = IdCodec::encode(&value).unwrap();
            let plain = match &value {
                Val::String(s) => s.clone(),
                other => other.to_string(),
            };
            assert_eq!(IdCodec::decode(&encoded).unwrap(), plain);
        }

        assert_eq!(
            IdCodec.serialize(&Val::from(1i64)).unwrap(),
            ConstValue::String("MQ==".to_string())
        );
    }

    #[test]
    fn invalid_id_is_a_type_error() {
        let result = IdCodec.parse(&ConstValue::String("not base64!".to_string()));
        assert!(matches!(result, Err(CodecError::Malformed { .. })));

        let result = IdCodec.parse(&ConstValue::from(1.5));
        assert!(matches!(result, Err(CodecError::Parse { .. })));
    }

    #[test]
    fn integer_ids_are_taken_as_is() {
        assert_eq!(
            IdCodec.parse(&ConstValue::from(42)).unwrap(),
            Val::from("42")
        );
    }

    #[test]
    fn date_time_round_trip() {
        let dt = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 17, 10, 30, 15)
            .unwrap();

        let wire = DateTimeCodec.serialize(&Val::DateTime(dt)).unwrap();
        assert_eq!(DateTimeCodec.parse(&wire).unwrap(), Val::DateTime(dt));
    }

    #[test]
    fn date_time_without_offset_is_utc() {
        let parsed = DateTimeCodec
            .parse(&ConstValue::String("2024-05-17T10:30:15".to_string()))
            .unwrap();
        assert_eq!(
            DateTimeCodec.serialize(&parsed).unwrap(),
            ConstValue::String("2024-05-17T10:30:15+00:00".to_string())
        );

        assert!(DateTimeCodec.serialize(&Val::from("2024-05-17")).is_err());
        assert!(matches!(
            DateTimeCodec.parse(&ConstValue::String("yesterday".to_string())),
            Err(CodecError::Malformed { .. })
        ));
    }

    #[test]
    fn dictionary_from_string() {
        let parsed = DictionaryCodec
            .parse(&ConstValue::String(r#"{"a": 1, "b": [true]}"#.to_string()))
            .unwrap();
        assert_eq!(
            parsed,
            Val::object([("a", Val::from(1i64)), ("b", Val::list([true]))])
        );

        assert!(
            DictionaryCodec
                .parse(&ConstValue::String("[1, 2]".to_string()))
                .is_err()
        );
        assert!(
            DictionaryCodec
                .parse(&ConstValue::String("{a: ".to_string()))
                .is_err()
        );
        assert!(DictionaryCodec.serialize(&Val::from("a")).is_err());
    }

    #[test]
    fn decimal_rejects_strings_on_output() {
        assert!(matches!(
            DecimalCodec.serialize(&Val::from("1.5")),
            Err(CodecError::Serialize { .. })
        ));
        assert_eq!(
            DecimalCodec.serialize(&Val::from(2i64)).unwrap(),
            ConstValue::from(2.0)
        );

        let parsed = DecimalCodec
            .parse(&ConstValue::String("12.340".to_string()))
            .unwrap();
        assert_eq!(parsed, Val::Decimal(BigDecimal::from_str("12.34").unwrap()));
        assert!(
            DecimalCodec
                .parse(&ConstValue::String("twelve".to_string()))
                .is_err()
        );
    }

    #[test]
    fn enum_members_of_another_enum_are_rejected() {
        let gender = EnumDescriptor {
            name: "Gender".to_string(),
            description: None,
            members: vec!["MALE".to_string(), "FEMALE".to_string()],
        };

        assert_eq!(
            gender
                .serialize(&Val::Enum(EnumVal::new("Gender", "MALE")))
                .unwrap(),
            ConstValue::Enum(Name::new("MALE"))
        );
        assert!(matches!(
            gender.serialize(&Val::Enum(EnumVal::new("Title", "MALE"))),
            Err(CodecError::EnumMismatch { .. })
        ));
        assert!(gender.serialize(&Val::from("MALE")).is_err());
        assert_eq!(
            gender
                .parse(&ConstValue::Enum(Name::new("FEMALE")))
                .unwrap(),
            Val::Enum(EnumVal::new("Gender", "FEMALE"))
        );
    }
}
