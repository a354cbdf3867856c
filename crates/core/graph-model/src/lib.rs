// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Declarative description of a GraphQL API.
//!
//! Host types (records, enums, scalars, connections) are described explicitly through
//! [`host_type::HostType`] and [`field::FieldDescriptor`]. The builder turns these into wire
//! types kept in a [`mapped_arena::MappedArena`], and the resolver reads host values ([`value::Val`])
//! through the [`source::Source`] capability.

pub mod casing;
pub mod error;
pub mod field;
pub mod host_type;
pub mod mapped_arena;
pub mod scalar;
pub mod source;
pub mod value;
pub mod wire;
