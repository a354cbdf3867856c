// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Field resolution against a built [`graph_model::wire::SchemaModel`].
//!
//! The dispatcher is independent of the execution engine: it receives the parent host value, the
//! wire field being resolved and the raw argument values, and produces an [`output::Output`] that
//! the schema layer hands back to the engine.

pub mod arguments;
pub mod dispatcher;
pub mod field_resolver;
pub mod output;
pub mod subscription;

#[cfg(test)]
mod test_support;

pub use dispatcher::FieldDispatcher;
pub use field_resolver::{FieldRequest, FieldResolver};
pub use output::Output;
