// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Nodewright SDK
//!
//! High-level client for a form-encoded cloud provisioning API: datacenters,
//! plans, distributions, kernels, nodes, disks, configs, golden images and
//! provider-side jobs.
//!
//! The SDK layers three things on top of the wire transport in
//! `nodewright-api`:
//! - typed records for the provider's uppercase-keyed listings,
//! - a resolver turning human tokens (IDs, names, labels, partial labels)
//!   into canonical `(id, label)` pairs,
//! - operation methods that classify every response envelope into
//!   `Result<T, SdkError>`.
//!
//! All calls are blocking; one network round trip per operation (bulk delete
//! issues one per node).
//!
//! # Example
//!
//! ```no_run
//! use nodewright_sdk::{CreateNodeOptions, ProvisioningSdk};
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let sdk = ProvisioningSdk::from_env()?;
//!
//!     // Resolve a datacenter by abbreviation and create a node there
//!     let datacenter = sdk.resolve_datacenter("newark")?;
//!     println!("Deploying to {} ({})", datacenter.label, datacenter.id);
//!
//!     let node_id = sdk.create_node(CreateNodeOptions::new(2, "newark"))?;
//!     println!("Created node: {}", node_id);
//!
//!     // Boot it and poll the job on demand
//!     let job_id = sdk.boot_node(node_id, None)?;
//!     let status = sdk.job_status(node_id, job_id)?;
//!     println!("Boot job: {:?}", status);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod resolver;
mod types;

pub use client::{ProvisioningSdk, swap_size_for_ram};
pub use error::{Result, SdkError};
pub use types::{
    BulkDeleteFailure, BulkDeleteResult, CreateConfigOptions, CreateNodeOptions, Datacenter, Disk,
    DiskFromDistributionOptions, DiskFromImageOptions, DiskJob, Distribution, Image, ImageJob,
    IpAddress, Job, JobStatus, Kernel, Node, NodeConfig, Plan, ResolvedResource, StackScript,
};

// The wire-layer pieces the CLI and SDK callers need directly.
pub use nodewright_api::{ApiConfig, ApiFault};
