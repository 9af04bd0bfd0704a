// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for the wire client.

use crate::response::ApiFault;

/// Result type for wire-client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the wire client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Configuration error (missing or invalid settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// The network call could not complete, the server answered a non-success
    /// HTTP status, or the body was not valid JSON.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered a well-formed envelope with a non-empty error
    /// array; descriptors are carried verbatim.
    #[error("provider error: {}", format_faults(.0))]
    Api(Vec<ApiFault>),
}

fn format_faults(faults: &[ApiFault]) -> String {
    faults
        .iter()
        .map(|fault| fault.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Transport(format!("undecodable response body: {}", err))
    }
}
