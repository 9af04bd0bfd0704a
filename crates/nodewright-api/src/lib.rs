// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Nodewright wire client
//!
//! Low-level synchronous client for the provider's form-encoded action
//! protocol. Every request is a single blocking POST to one configured
//! endpoint, carrying the fixed `api_key` and `api_action` fields plus
//! action-specific parameters; every response is a JSON envelope with a
//! `DATA` payload field and an `ERRORARRAY` error list.
//!
//! This crate stops at the envelope: [`Transport::send`] returns the decoded
//! document as-is, and [`classify`] splits it into a success payload or the
//! provider's fault descriptors. Typed resource records and resolution live
//! in `nodewright-sdk`.
//!
//! # Example
//!
//! ```no_run
//! use nodewright_api::{ApiConfig, Transport, classify};
//!
//! # fn example() -> nodewright_api::Result<()> {
//! let config = ApiConfig::from_env()?;
//! let transport = Transport::new(config);
//!
//! let response = transport.send("avail.datacenters", &[])?;
//! match classify(response) {
//!     Ok(listing) => println!("{}", listing),
//!     Err(faults) => eprintln!("provider returned {} fault(s)", faults.len()),
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod response;
mod transport;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use response::{ApiFault, classify};
pub use transport::{Param, Transport};
