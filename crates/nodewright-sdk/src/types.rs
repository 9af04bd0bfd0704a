// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! High-level types for the provisioning SDK.
//!
//! Listing records deserialize straight from the provider's uppercase wire
//! keys; serializing them reproduces those keys, so pretty-printed output
//! matches what the API sent.

use std::path::PathBuf;

use nodewright_api::ApiFault;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Listing records
// =============================================================================

/// One datacenter offered by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datacenter {
    #[serde(rename = "DATACENTERID")]
    pub id: u32,
    /// Full location, e.g. "Newark, NJ, USA". The canonical label.
    #[serde(rename = "LOCATION")]
    pub location: String,
    /// Short form, e.g. "newark".
    #[serde(rename = "ABBR")]
    pub abbr: String,
}

/// One plan (RAM/disk/price tier).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "PLANID")]
    pub id: u32,
    #[serde(rename = "LABEL", default)]
    pub label: String,
    /// RAM in MiB.
    #[serde(rename = "RAM", default)]
    pub ram: u32,
    /// Disk in GiB.
    #[serde(rename = "DISK", default)]
    pub disk: u32,
    #[serde(rename = "HOURLY", default)]
    pub hourly: f64,
    #[serde(rename = "PRICE", default)]
    pub price: f64,
}

/// One installable distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    #[serde(rename = "DISTRIBUTIONID")]
    pub id: u32,
    #[serde(rename = "LABEL", default)]
    pub label: String,
    #[serde(rename = "IS64BIT", default)]
    pub is_64bit: i32,
}

/// One bootable kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kernel {
    #[serde(rename = "KERNELID")]
    pub id: u32,
    #[serde(rename = "LABEL", default)]
    pub label: String,
    #[serde(rename = "ISKVM", default)]
    pub is_kvm: i32,
    #[serde(rename = "ISXEN", default)]
    pub is_xen: i32,
}

/// One stack script (deployment script) record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackScript {
    #[serde(rename = "STACKSCRIPTID")]
    pub id: u32,
    #[serde(rename = "LABEL", default)]
    pub label: String,
    #[serde(rename = "DESCRIPTION", default)]
    pub description: String,
    #[serde(rename = "ISPUBLIC", default)]
    pub is_public: i32,
}

/// One node as returned by the node listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "LINODEID")]
    pub id: u32,
    #[serde(rename = "LABEL", default)]
    pub label: String,
    #[serde(rename = "STATUS", default)]
    pub status: i32,
    /// RAM in MiB.
    #[serde(rename = "TOTALRAM", default)]
    pub total_ram: u32,
    #[serde(rename = "DATACENTERID", default)]
    pub datacenter_id: u32,
    #[serde(rename = "PLANID", default)]
    pub plan_id: u32,
    #[serde(rename = "LPM_DISPLAYGROUP", default)]
    pub display_group: String,
}

/// One disk attached to a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disk {
    #[serde(rename = "DISKID")]
    pub id: u32,
    #[serde(rename = "LABEL", default)]
    pub label: String,
    #[serde(rename = "TYPE", default)]
    pub disk_type: String,
    /// Size in MiB.
    #[serde(rename = "SIZE", default)]
    pub size: u32,
}

/// One boot configuration profile of a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(rename = "CONFIGID")]
    pub id: u32,
    #[serde(rename = "LABEL", default)]
    pub label: String,
    #[serde(rename = "KERNELID", default)]
    pub kernel_id: u32,
    /// Comma-separated disk IDs, as the provider stores them.
    #[serde(rename = "DISKLIST", default)]
    pub disk_list: String,
}

/// One provider-side job record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "JOBID")]
    pub id: u32,
    #[serde(rename = "LABEL", default)]
    pub label: String,
    #[serde(rename = "ACTION", default)]
    pub action: String,
    /// Raw completion marker: `""`/null while pending, `0` on failure,
    /// anything truthy on success. Kept as the raw wire value.
    #[serde(rename = "HOST_SUCCESS", default)]
    pub host_success: Value,
    #[serde(rename = "HOST_MESSAGE", default)]
    pub host_message: String,
}

impl Job {
    /// Interpret the completion marker.
    pub fn status(&self) -> JobStatus {
        match &self.host_success {
            Value::Null => JobStatus::Pending,
            Value::String(s) if s.is_empty() => JobStatus::Pending,
            Value::Number(n) if n.as_f64() == Some(0.0) => JobStatus::Failed,
            Value::Bool(false) => JobStatus::Failed,
            _ => JobStatus::Succeeded,
        }
    }
}

/// One golden image record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "IMAGEID")]
    pub id: u32,
    #[serde(rename = "LABEL", default)]
    pub label: String,
    #[serde(rename = "STATUS", default)]
    pub status: String,
    /// Minimum deploy size in MiB.
    #[serde(rename = "MINSIZE", default)]
    pub min_size: u32,
}

/// One IP address record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpAddress {
    #[serde(rename = "IPADDRESSID")]
    pub id: u32,
    #[serde(rename = "LINODEID", default)]
    pub node_id: u32,
    #[serde(rename = "IPADDRESS", default)]
    pub address: String,
    #[serde(rename = "ISPUBLIC", default)]
    pub is_public: i32,
}

// =============================================================================
// Derived values
// =============================================================================

/// Status of a provider-side job, polled on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// The completion marker is still unset.
    Pending,
    /// The host reported success.
    Succeeded,
    /// The host reported failure.
    Failed,
    /// No job record exists for the queried (node, job) pair.
    Unknown,
}

/// A human token resolved to its canonical identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedResource {
    pub id: u32,
    /// Canonical label: location for datacenters, label for everything else.
    pub label: String,
}

/// IDs returned by a disk-creating action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskJob {
    pub disk_id: u32,
    pub job_id: u32,
}

/// IDs returned by imagizing a disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageJob {
    pub image_id: u32,
    pub job_id: u32,
}

/// Outcome of deleting every node on the account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkDeleteResult {
    /// IDs deleted, in listing order.
    pub deleted: Vec<u32>,
    /// Nodes the provider refused to delete.
    pub failures: Vec<BulkDeleteFailure>,
}

/// One node the provider refused to delete during a bulk delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteFailure {
    pub node_id: u32,
    pub faults: Vec<ApiFault>,
}

// =============================================================================
// Operation options
// =============================================================================

/// Options for creating a node.
#[derive(Debug, Clone)]
pub struct CreateNodeOptions {
    /// Plan ID to provision.
    pub plan_id: u32,
    /// Datacenter token: ID, location or abbreviation.
    pub datacenter: String,
    /// When false, the token is sent to the wire untouched.
    pub validate: bool,
}

impl CreateNodeOptions {
    /// Create new options with required fields. Validation is on by default.
    pub fn new(plan_id: u32, datacenter: impl Into<String>) -> Self {
        Self {
            plan_id,
            datacenter: datacenter.into(),
            validate: true,
        }
    }

    /// Enable or disable datacenter token resolution.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

/// Options for creating a root disk from a distribution.
#[derive(Debug, Clone)]
pub struct DiskFromDistributionOptions {
    pub node_id: u32,
    /// Distribution token: ID or label.
    pub distribution: String,
    /// Disk size in MiB.
    pub size_mb: u32,
    pub root_pass: String,
    /// Optional SSH public key file; its contents are sent with newlines
    /// stripped.
    pub ssh_key_file: Option<PathBuf>,
}

impl DiskFromDistributionOptions {
    /// Create new options with required fields.
    pub fn new(
        node_id: u32,
        distribution: impl Into<String>,
        size_mb: u32,
        root_pass: impl Into<String>,
    ) -> Self {
        Self {
            node_id,
            distribution: distribution.into(),
            size_mb,
            root_pass: root_pass.into(),
            ssh_key_file: None,
        }
    }

    /// Install the root SSH key from this file.
    pub fn with_ssh_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ssh_key_file = Some(path.into());
        self
    }
}

/// Options for creating a root disk from a golden image.
#[derive(Debug, Clone)]
pub struct DiskFromImageOptions {
    pub node_id: u32,
    pub image_id: u32,
    pub label: String,
    /// Disk size in MiB.
    pub size_mb: u32,
    pub root_pass: String,
    /// Optional SSH public key file; its contents are sent with newlines
    /// stripped.
    pub ssh_key_file: Option<PathBuf>,
}

impl DiskFromImageOptions {
    /// Create new options with required fields.
    pub fn new(
        node_id: u32,
        image_id: u32,
        label: impl Into<String>,
        size_mb: u32,
        root_pass: impl Into<String>,
    ) -> Self {
        Self {
            node_id,
            image_id,
            label: label.into(),
            size_mb,
            root_pass: root_pass.into(),
            ssh_key_file: None,
        }
    }

    /// Install the root SSH key from this file.
    pub fn with_ssh_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ssh_key_file = Some(path.into());
        self
    }
}

/// Options for creating a boot configuration profile.
#[derive(Debug, Clone)]
pub struct CreateConfigOptions {
    pub node_id: u32,
    /// Kernel token: ID or (partial) label.
    pub kernel: String,
    /// Disks the profile boots with, joined comma-separated on the wire.
    pub disk_ids: Vec<u32>,
    pub label: String,
    /// When false, the kernel token is sent to the wire untouched.
    pub validate: bool,
}

impl CreateConfigOptions {
    /// Create new options with required fields. Validation is on by default.
    pub fn new(
        node_id: u32,
        kernel: impl Into<String>,
        disk_ids: Vec<u32>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            node_id,
            kernel: kernel.into(),
            disk_ids,
            label: label.into(),
            validate: true,
        }
    }

    /// Enable or disable kernel token resolution.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}
