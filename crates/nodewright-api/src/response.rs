// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Classification of the provider's `ERRORARRAY`/`DATA` response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One provider error descriptor, carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiFault {
    #[serde(rename = "ERRORCODE", default)]
    pub code: i64,
    #[serde(rename = "ERRORMESSAGE", default)]
    pub message: String,
}

impl std::fmt::Display for ApiFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Split a decoded response into a success payload or provider faults.
///
/// A response is erroneous iff its `ERRORARRAY` field is a non-empty list; an
/// absent or empty array is success, and the payload is the `DATA` field
/// (`Null` when absent). HTTP status is never consulted here — the transport
/// has already turned status failures into errors.
///
/// A fault entry that is not a well-formed descriptor object degrades to a
/// fault whose message is the raw entry text, so the provider's output is
/// never silently dropped.
pub fn classify(mut response: Value) -> Result<Value, Vec<ApiFault>> {
    let faults: Vec<ApiFault> = match response.get("ERRORARRAY") {
        Some(Value::Array(entries)) if !entries.is_empty() => entries
            .iter()
            .map(|entry| {
                serde_json::from_value(entry.clone()).unwrap_or_else(|_| ApiFault {
                    code: 0,
                    message: entry.to_string(),
                })
            })
            .collect(),
        _ => Vec::new(),
    };

    if !faults.is_empty() {
        return Err(faults);
    }

    Ok(response
        .get_mut("DATA")
        .map(Value::take)
        .unwrap_or(Value::Null))
}
