// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{host_type::HostType, value::Val};

/// A field of a host record.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    /// Host name of the field. The wire name derives from it through the schema casing.
    pub name: String,
    pub host_type: HostType,
    /// Replaces `name` as the origin of the wire name. Resolution looks the value up under it.
    pub alias: Option<String>,
    pub description: Option<String>,
    pub default: Option<Val>,
    /// Output only; omitted from the input form of the record
    pub readonly: bool,
    /// Input only; omitted from the output form of the record
    pub inputonly: bool,
    pub skip: bool,
    pub arguments: Vec<ArgumentDescriptor>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, host_type: HostType) -> Self {
        Self {
            name: name.into(),
            host_type,
            alias: None,
            description: None,
            default: None,
            readonly: false,
            inputonly: false,
            skip: false,
            arguments: vec![],
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default(mut self, default: impl Into<Val>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn inputonly(mut self) -> Self {
        self.inputonly = true;
        self
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn argument(mut self, argument: ArgumentDescriptor) -> Self {
        self.arguments.push(argument);
        self
    }

    /// A field without a default whose type is not optional must always be present.
    pub fn required(&self) -> bool {
        self.default.is_none() && !self.host_type.is_optional()
    }

    pub fn is_hidden(&self) -> bool {
        self.skip || self.name.starts_with('_')
    }

    /// Host name the wire name derives from
    pub fn source_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// An argument of a field.
#[derive(Clone, Debug)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub host_type: HostType,
    pub description: Option<String>,
    pub required: bool,
    /// Record-typed arguments must be declared as inputs
    pub is_input: bool,
    pub default: Option<Val>,
}

impl ArgumentDescriptor {
    pub fn new(name: impl Into<String>, host_type: HostType) -> Self {
        Self {
            name: name.into(),
            host_type,
            description: None,
            required: false,
            is_input: false,
            default: None,
        }
    }

    pub fn list(name: impl Into<String>, element: HostType) -> Self {
        Self::new(name, HostType::list(element))
    }

    pub fn required(name: impl Into<String>, host_type: HostType) -> Self {
        Self {
            required: true,
            ..Self::new(name, host_type)
        }
    }

    pub fn required_list(name: impl Into<String>, element: HostType) -> Self {
        Self::required(name, HostType::list(element))
    }

    pub fn input(name: impl Into<String>, host_type: HostType) -> Self {
        Self {
            is_input: true,
            ..Self::new(name, host_type)
        }
    }

    pub fn required_input(name: impl Into<String>, host_type: HostType) -> Self {
        Self {
            is_input: true,
            ..Self::required(name, host_type)
        }
    }

    pub fn list_input(name: impl Into<String>, element: HostType) -> Self {
        Self::input(name, HostType::list(element))
    }

    pub fn required_list_input(name: impl Into<String>, element: HostType) -> Self {
        Self::required_input(name, HostType::list(element))
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default(mut self, default: impl Into<Val>) -> Self {
        self.default = Some(default.into());
        self
    }
}
