// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Blocking form-encoded transport for the provisioning API.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::Result;

/// One key/value pair destined for the form-encoded request body.
pub type Param = (String, String);

/// Synchronous transport for the provider's form-encoded action protocol.
///
/// Every call is one blocking POST to the configured endpoint carrying the
/// fixed `api_key`/`api_action` base fields plus action-specific parameters.
/// The decoded JSON document is returned as-is; splitting it into payload or
/// faults is [`classify`](crate::classify)'s job. No retries at this layer.
pub struct Transport {
    agent: ureq::Agent,
    config: ApiConfig,
}

impl Transport {
    /// Create a transport over the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            agent: ureq::agent(),
            config,
        }
    }

    /// Access the transport configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Send one action request and decode the JSON response body.
    ///
    /// Base fields are set first; a caller-supplied parameter with the same
    /// key replaces the base value in place (last write wins).
    ///
    /// When the request log is enabled, the request/response pair is appended
    /// after a successful decode; a failed log write is reported at `warn` and
    /// never masks the response.
    pub fn send(&self, action: &str, params: &[Param]) -> Result<Value> {
        let pairs = merge_params(
            &[
                ("api_key".to_string(), self.config.api_key.clone()),
                ("api_action".to_string(), action.to_string()),
            ],
            params,
        );
        let body = encode_form(&pairs);

        debug!(action, params = params.len(), "sending api request");

        let response = self
            .agent
            .post(&self.config.endpoint)
            .set("Content-Type", "application/x-www-form-urlencoded")
            .send_string(&body)?;

        let text = response.into_string()?;
        let decoded: Value = serde_json::from_str(&text)?;

        if let Some(path) = &self.config.request_log {
            if let Err(err) = append_log(path, &self.config.endpoint, &body, &decoded) {
                warn!(error = %err, "failed to append request log");
            }
        }

        Ok(decoded)
    }
}

/// Merge base parameters with caller parameters, last write wins.
///
/// A caller pair whose key is already present replaces the value in place
/// rather than appending a duplicate, so the body never carries a key twice.
fn merge_params(base: &[Param], params: &[Param]) -> Vec<Param> {
    let mut merged: Vec<Param> = base.to_vec();
    for (key, value) in params {
        match merged.iter_mut().find(|(merged_key, _)| merged_key == key) {
            Some(entry) => entry.1 = value.clone(),
            None => merged.push((key.clone(), value.clone())),
        }
    }
    merged
}

/// Percent-encode pairs into an `application/x-www-form-urlencoded` body.
fn encode_form(pairs: &[Param]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append one request/response entry to the log file.
fn append_log(path: &Path, url: &str, body: &str, response: &Value) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let pretty =
        serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string());
    write!(
        file,
        "\n\n----{}\n[REQUEST] {} {}\n[RESPONSE]\n{}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
        url,
        body,
        pretty
    )
}
