// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The parts of a standard introspection result that the DSL needs.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::DslError;

/// The standard introspection query. Its result is what [`crate::DslSchema::from_introspection`]
/// reads.
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    pub name: Option<String>,
    pub of_type: Option<Box<TypeRef>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputValue {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub args: Vec<InputValue>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl FieldDefinition {
    pub fn argument(&self, name: &str) -> Option<&InputValue> {
        self.args.iter().find(|argument| argument.name == name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumValue {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullType {
    pub kind: TypeKind,
    pub name: String,
    pub fields: Option<Vec<FieldDefinition>>,
    pub input_fields: Option<Vec<InputValue>>,
    pub enum_values: Option<Vec<EnumValue>>,
}

impl FullType {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.as_ref()?.iter().find(|field| field.name == name)
    }

    pub fn input_field(&self, name: &str) -> Option<&InputValue> {
        self.input_fields
            .as_ref()?
            .iter()
            .find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct NamedType {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionSchema {
    query_type: NamedType,
    mutation_type: Option<NamedType>,
    types: Vec<FullType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaEnvelope {
    #[serde(rename = "__schema")]
    schema: IntrospectionSchema,
}

/// The types of an introspected schema, by name.
#[derive(Debug)]
pub struct IntrospectedSchema {
    pub query_type: String,
    pub mutation_type: Option<String>,
    pub types: HashMap<String, FullType>,
}

impl IntrospectedSchema {
    /// Read an introspection result, either the whole response (`{"data": {"__schema": ..}}`) or
    /// its data (`{"__schema": ..}`).
    pub fn parse(result: serde_json::Value) -> Result<Self, DslError> {
        let data = match result {
            serde_json::Value::Object(mut response) if response.contains_key("data") => {
                response.remove("data").unwrap_or_default()
            }
            data => data,
        };
        let IntrospectionSchema {
            query_type,
            mutation_type,
            types,
        } = serde_json::from_value::<SchemaEnvelope>(data)?.schema;

        Ok(Self {
            query_type: query_type.name,
            mutation_type: mutation_type.map(|t| t.name),
            types: types.into_iter().map(|t| (t.name.clone(), t)).collect(),
        })
    }

    pub fn get(&self, name: &str) -> Result<&FullType, DslError> {
        self.types
            .get(name)
            .ok_or_else(|| DslError::UnknownType(name.to_string()))
    }
}
