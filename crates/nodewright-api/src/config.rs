// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the wire client.

use std::path::PathBuf;

use crate::error::{ApiError, Result};

/// Configuration for a [`Transport`](crate::Transport).
///
/// Both the endpoint URL and the API key are required opaque strings supplied
/// before any call; their absence is a startup failure, never an
/// operation-level one. There is no ambient or global configuration — the
/// config object is moved into the transport at construction.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the provider endpoint.
    pub endpoint: String,
    /// Provider API key, sent as the `api_key` body field on every request.
    pub api_key: String,
    /// When set, every request/response pair is appended to this file.
    pub request_log: Option<PathBuf>,
}

impl ApiConfig {
    /// Create a configuration with logging disabled.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            request_log: None,
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `NODEWRIGHT_API_URL`: provider endpoint URL (required)
    /// - `NODEWRIGHT_API_KEY`: provider API key (required)
    /// - `NODEWRIGHT_REQUEST_LOG`: request log file path (optional; unset
    ///   disables request logging)
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("NODEWRIGHT_API_URL").map_err(|_| {
            ApiError::Config("NODEWRIGHT_API_URL environment variable is not set".to_string())
        })?;

        let api_key = std::env::var("NODEWRIGHT_API_KEY").map_err(|_| {
            ApiError::Config("NODEWRIGHT_API_KEY environment variable is not set".to_string())
        })?;

        let request_log = std::env::var("NODEWRIGHT_REQUEST_LOG").ok().map(PathBuf::from);

        Ok(Self {
            endpoint,
            api_key,
            request_log,
        })
    }

    /// Enable the append-only request/response log at the given path.
    pub fn with_request_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.request_log = Some(path.into());
        self
    }
}
