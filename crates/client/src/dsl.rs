// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    fmt::{Display, Formatter},
    sync::Arc,
};

use async_graphql_value::{ConstValue, Name};
use indexmap::IndexMap;
use serde_json::Value;

use graph_model::casing::Casing;

use crate::{
    error::DslError,
    introspection::{FieldDefinition, IntrospectedSchema},
    serialize::serialize,
};

/// Builds documents against an introspected schema.
///
/// Field and argument names are given in host casing and converted with the same casing policy
/// the server uses.
#[derive(Debug, Clone)]
pub struct DslSchema {
    schema: Arc<IntrospectedSchema>,
    casing: Casing,
}

impl DslSchema {
    pub fn from_introspection(result: Value) -> Result<Self, DslError> {
        Ok(Self {
            schema: Arc::new(IntrospectedSchema::parse(result)?),
            casing: Casing::Camel,
        })
    }

    pub fn camelcase(mut self, camelcase: bool) -> Self {
        self.casing = Casing::from_flag(camelcase);
        self
    }

    pub fn query_type(&self) -> &str {
        &self.schema.query_type
    }

    /// The field `name` of `type_name`, ready to be selected.
    pub fn field(&self, type_name: &str, name: &str) -> Result<DslField, DslError> {
        let wire_name = self.casing.to_wire(name);
        let definition = self
            .schema
            .get(type_name)?
            .field(&wire_name)
            .ok_or_else(|| DslError::UnknownField {
                type_name: type_name.to_string(),
                field: wire_name.clone(),
            })?;

        Ok(DslField {
            schema: self.schema.clone(),
            casing: self.casing,
            definition: definition.clone(),
            alias: None,
            arguments: IndexMap::new(),
            selections: vec![],
        })
    }

    pub fn query(&self, fields: impl IntoIterator<Item = DslField>) -> DslDocument {
        DslDocument {
            operation: Operation::Query,
            selections: fields.into_iter().collect(),
        }
    }

    pub fn mutation(
        &self,
        fields: impl IntoIterator<Item = DslField>,
    ) -> Result<DslDocument, DslError> {
        if self.schema.mutation_type.is_none() {
            return Err(DslError::NoMutationType);
        }

        Ok(DslDocument {
            operation: Operation::Mutation,
            selections: fields.into_iter().collect(),
        })
    }
}

/// A field selection with its alias, arguments and sub-selections.
#[derive(Debug, Clone)]
pub struct DslField {
    schema: Arc<IntrospectedSchema>,
    casing: Casing,
    definition: FieldDefinition,
    alias: Option<String>,
    arguments: IndexMap<Name, ConstValue>,
    selections: Vec<DslField>,
}

impl DslField {
    /// Wire name of the field
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn select(mut self, fields: impl IntoIterator<Item = DslField>) -> Self {
        self.selections.extend(fields);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set the arguments from a JSON object keyed by host names. Values are serialized with the
    /// declared argument types, so enum members are written bare and a single value given for a
    /// list argument becomes a list of one.
    pub fn args(mut self, arguments: Value) -> Result<Self, DslError> {
        let Value::Object(arguments) = arguments else {
            return Err(DslError::InvalidValue {
                name: self.definition.name.clone(),
                expected: "an object of arguments".to_string(),
                value: arguments.to_string(),
            });
        };

        let mut serialized = IndexMap::new();
        for (name, value) in &arguments {
            let wire_name = self.casing.to_wire(name);
            let argument = self.definition.argument(&wire_name).ok_or_else(|| {
                DslError::UnknownArgument {
                    field: self.definition.name.clone(),
                    argument: wire_name.clone(),
                }
            })?;
            let value = serialize(&self.schema, self.casing, &wire_name, &argument.ty, value)?;
            serialized.insert(Name::new(&wire_name), value);
        }

        self.arguments = serialized;
        Ok(self)
    }
}

impl Display for DslField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(alias) = &self.alias {
            write!(f, "{alias}: ")?;
        }
        f.write_str(&self.definition.name)?;

        if !self.arguments.is_empty() {
            f.write_str("(")?;
            for (index, (name, value)) in self.arguments.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{name}: {value}")?;
            }
            f.write_str(")")?;
        }

        if !self.selections.is_empty() {
            f.write_str(" ")?;
            write_selections(&self.selections, f)?;
        }
        Ok(())
    }
}

fn write_selections(selections: &[DslField], f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str("{")?;
    for selection in selections {
        write!(f, " {selection}")?;
    }
    f.write_str(" }")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Query,
    Mutation,
}

/// An operation built with [`DslSchema::query`] or [`DslSchema::mutation`], printed as GraphQL
/// text by its `Display` implementation.
#[derive(Debug, Clone)]
pub struct DslDocument {
    operation: Operation,
    selections: Vec<DslField>,
}

impl DslDocument {
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl Display for DslDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.operation == Operation::Mutation {
            f.write_str("mutation ")?;
        }
        write_selections(&self.selections, f)
    }
}
