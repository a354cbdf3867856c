// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Builds GraphQL documents against an introspected schema.
//!
//! ```text
//! let dsl = DslSchema::from_introspection(result)?;
//! let connection = dsl
//!     .field("Query", "books_connection")?
//!     .args(json!({ "first": 2 }))?
//!     .select([dsl.field("BookConnection", "total_count")?]);
//! assert_eq!(dsl.query([connection]).as_string(), "{ booksConnection(first: 2) { totalCount } }");
//! ```

mod dsl;
pub mod error;
pub mod introspection;
mod serialize;

pub use dsl::{DslDocument, DslField, DslSchema};
pub use error::DslError;
pub use introspection::INTROSPECTION_QUERY;
