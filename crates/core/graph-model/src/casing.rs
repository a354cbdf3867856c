// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Conversion between host identifiers (`books_connection`) and wire names (`booksConnection`).

use heck::ToLowerCamelCase;

/// The casing policy of a schema. Applies to field, argument and input field names, never to
/// type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Casing {
    #[default]
    Camel,
    Verbatim,
}

impl Casing {
    pub fn from_flag(camelcase: bool) -> Self {
        if camelcase {
            Casing::Camel
        } else {
            Casing::Verbatim
        }
    }

    pub fn is_camel(&self) -> bool {
        matches!(self, Casing::Camel)
    }

    /// Host identifier to wire name
    pub fn to_wire(&self, host_name: &str) -> String {
        match self {
            Casing::Camel => snake_to_camel(host_name),
            Casing::Verbatim => host_name.to_string(),
        }
    }

    /// Wire name back to the host identifier
    pub fn to_host(&self, wire_name: &str) -> String {
        match self {
            Casing::Camel => camel_to_snake(wire_name),
            Casing::Verbatim => wire_name.to_string(),
        }
    }
}

pub fn snake_to_camel(name: &str) -> String {
    name.to_lower_camel_case()
}

/// Every uppercase letter starts a new segment, so `pointXY` is `point_x_y`.
pub fn camel_to_snake(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    for (position, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if position > 0 {
                snake.push('_');
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}
