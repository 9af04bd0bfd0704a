// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for nodewright-sdk.

use nodewright_api::{ApiError, ApiFault};
use thiserror::Error;

/// Result type using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors that can occur when using the provisioning SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The network call could not complete or the body was not JSON.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with one or more fault descriptors.
    #[error("provider error: {}", format_faults(.0))]
    Api(Vec<ApiFault>),

    /// Datacenter token did not resolve.
    #[error("datacenter not found: {0}")]
    DatacenterNotFound(String),

    /// Distribution token did not resolve.
    #[error("distribution not found: {0}")]
    DistributionNotFound(String),

    /// Kernel token did not resolve.
    #[error("kernel not found: {0}")]
    KernelNotFound(String),

    /// Image token did not resolve.
    #[error("image not found: {0}")]
    ImageNotFound(String),

    /// Node listing came back empty for the given ID.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Caller input rejected before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Success envelope whose payload lacks the documented shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<ApiError> for SdkError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Config(msg) => SdkError::Config(msg),
            ApiError::Transport(msg) => SdkError::Transport(msg),
            ApiError::Api(faults) => SdkError::Api(faults),
        }
    }
}

fn format_faults(faults: &[ApiFault]) -> String {
    faults
        .iter()
        .map(ApiFault::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
