// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Schema options read from environment variables.

use std::collections::HashMap;

use thiserror::Error;

/// A source of `GRAPH_*` variables
pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// A boolean switch, or `default_value` when the variable is not set
    fn switch(&self, key: &str, default_value: bool) -> Result<bool, EnvError> {
        let Some(value) = self.get(key) else {
            return Ok(default_value);
        };

        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(EnvError::InvalidSwitch {
                key: key.to_string(),
                value,
            }),
        }
    }

    /// A positive engine limit, or `None` when the variable is not set
    fn limit(&self, key: &str) -> Result<Option<usize>, EnvError> {
        self.get(key)
            .map(|value| match value.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => Ok(limit),
                _ => Err(EnvError::InvalidLimit {
                    key: key.to_string(),
                    value,
                }),
            })
            .transpose()
    }
}

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("`{key}` must be one of true, false, 1, 0, yes, no, on or off, found `{value}`")]
    InvalidSwitch { key: String, value: String },

    #[error("`{key}` must be a positive integer, found `{value}`")]
    InvalidLimit { key: String, value: String },
}

/// The variables of the running process
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed variables, for tests and embedding
#[derive(Clone, Default)]
pub struct MapEnvironment(HashMap<String, String>);

impl Environment for MapEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MapEnvironment {
    fn from(values: [(&str, &str); N]) -> Self {
        Self(
            values
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }
}
