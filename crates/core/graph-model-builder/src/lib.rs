// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Builds the wire type graph ([`graph_model::wire::SchemaModel`]) from host type descriptions.
//!
//! All state of a build lives in a [`building::ModelBuilding`] created for that build, so two
//! builds never share types.

pub mod building;
pub mod connection_builder;
pub mod options;
pub mod system_builder;
pub mod type_walker;

#[cfg(test)]
mod test_records;

pub use options::BuildOptions;
pub use system_builder::{RootRecords, build};
