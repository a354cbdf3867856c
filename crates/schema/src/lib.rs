// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Executable GraphQL schemas derived from host type descriptions.
//!
//! [`GraphSchema::build`] walks the root records into a wire type graph, converts it into an
//! `async-graphql` dynamic schema and wires every field to the field dispatcher. Queries and
//! mutations run through [`GraphSchema::run`] or [`GraphSchema::execute`], subscriptions through
//! [`GraphSchema::subscribe`].

mod assembly;
pub mod env;
pub mod error;
pub mod logging;
pub mod options;
pub mod roots;
mod schema;

pub use assembly::RequestContext;
pub use error::SchemaBuildError;
pub use options::SchemaOptions;
pub use roots::{RootFactory, RootType, RootTypes};
pub use schema::{GraphSchema, operation_kind};
