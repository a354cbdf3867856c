// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Console logging setup.
//!
//! Schema building, field dispatch and subscriptions are instrumented with `tracing`. Calling
//! [`init`] installs a global subscriber filtered by the `GRAPH_LOG` environment variable, which
//! follows the conventions of `RUST_LOG` and defaults to `warn`.

use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, prelude::*, util::TryInitError,
};

const GRAPH_LOG: &str = "GRAPH_LOG";

/// Initialize the tracing subscriber. Fails if a global subscriber is already installed.
pub fn init() -> Result<(), TryInitError> {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(GRAPH_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
}
