// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! ProvisioningSdk client for the form-encoded provisioning API.

use std::path::Path;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use nodewright_api::{ApiConfig, Param, Transport, classify};

use crate::error::{Result, SdkError};
use crate::resolver;
use crate::types::{
    BulkDeleteFailure, BulkDeleteResult, CreateConfigOptions, CreateNodeOptions, Datacenter, Disk,
    DiskFromDistributionOptions, DiskFromImageOptions, DiskJob, Distribution, Image, ImageJob,
    IpAddress, Job, JobStatus, Kernel, Node, NodeConfig, Plan, ResolvedResource, StackScript,
};

/// High-level SDK for provisioning nodes, disks, configs and images.
///
/// Every method issues one blocking request (bulk delete: one per node),
/// classifies the response envelope, and returns a typed result. Resource
/// tokens (datacenter, distribution, kernel, image) are resolved against a
/// freshly fetched listing; nothing is cached between calls.
pub struct ProvisioningSdk {
    transport: Transport,
}

impl ProvisioningSdk {
    /// Create a new SDK over the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            transport: Transport::new(config),
        }
    }

    /// Create an SDK from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ApiConfig::from_env()?))
    }

    /// Get the SDK configuration.
    pub fn config(&self) -> &ApiConfig {
        self.transport.config()
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Send one action and classify the response envelope.
    fn call(&self, action: &str, params: &[Param]) -> Result<Value> {
        let response = self.transport.send(action, params)?;
        classify(response).map_err(SdkError::Api)
    }

    /// Send one action and decode the payload as a listing.
    fn list<T: DeserializeOwned>(&self, action: &str, params: &[Param]) -> Result<Vec<T>> {
        let data = self.call(action, params)?;
        serde_json::from_value(data).map_err(|err| {
            SdkError::UnexpectedResponse(format!("undecodable {} listing: {}", action, err))
        })
    }

    // =========================================================================
    // Catalog listings
    // =========================================================================

    /// List every datacenter the provider offers.
    #[instrument(skip(self))]
    pub fn list_datacenters(&self) -> Result<Vec<Datacenter>> {
        debug!("Listing datacenters");
        self.list("avail.datacenters", &[])
    }

    /// List every plan the provider offers.
    #[instrument(skip(self))]
    pub fn list_plans(&self) -> Result<Vec<Plan>> {
        debug!("Listing plans");
        self.list("avail.linodeplans", &[])
    }

    /// List distributions, optionally narrowed by a case-insensitive substring
    /// of the label. An empty filter lists everything.
    #[instrument(skip(self))]
    pub fn list_distributions(&self, filter: Option<&str>) -> Result<Vec<Distribution>> {
        debug!("Listing distributions");
        let distributions: Vec<Distribution> = self.list("avail.distributions", &[])?;

        Ok(match filter {
            Some(fragment) if !fragment.is_empty() => {
                let needle = fragment.to_lowercase();
                distributions
                    .into_iter()
                    .filter(|distribution| distribution.label.to_lowercase().contains(&needle))
                    .collect()
            }
            _ => distributions,
        })
    }

    /// List kernels, optionally narrowed by a regex searched against the
    /// label. An empty filter lists everything; an invalid pattern is
    /// rejected before any network call.
    #[instrument(skip(self))]
    pub fn list_kernels(&self, filter: Option<&str>) -> Result<Vec<Kernel>> {
        let pattern = match filter {
            Some(raw) if !raw.is_empty() => Some(Regex::new(raw).map_err(|err| {
                SdkError::InvalidInput(format!("invalid kernel filter: {}", err))
            })?),
            _ => None,
        };

        debug!("Listing kernels");
        let kernels: Vec<Kernel> = self.list("avail.kernels", &[])?;

        Ok(match pattern {
            Some(regex) => kernels
                .into_iter()
                .filter(|kernel| regex.is_match(&kernel.label))
                .collect(),
            None => kernels,
        })
    }

    /// List the provider's public stack script library.
    #[instrument(skip(self))]
    pub fn list_stackscripts(&self) -> Result<Vec<StackScript>> {
        debug!("Listing public stack scripts");
        self.list("avail.stackscripts", &[])
    }

    /// List the account's own stack scripts.
    #[instrument(skip(self))]
    pub fn list_my_stackscripts(&self) -> Result<Vec<StackScript>> {
        debug!("Listing account stack scripts");
        self.list("stackscript.list", &[])
    }

    /// Fetch a single stack script by ID. The provider answers a
    /// one-element listing.
    #[instrument(skip(self))]
    pub fn get_stackscript(&self, stackscript_id: u32) -> Result<Vec<StackScript>> {
        debug!("Getting stack script");
        self.list("stackscript.list", &[param("StackScriptID", stackscript_id)])
    }

    // =========================================================================
    // Resource resolution
    // =========================================================================

    /// Resolve a datacenter token (ID, location, or abbreviation).
    ///
    /// The canonical label is the location.
    #[instrument(skip(self))]
    pub fn resolve_datacenter(&self, token: &str) -> Result<ResolvedResource> {
        let datacenters = self.list_datacenters()?;
        resolver::resolve(
            token,
            &datacenters,
            |dc| dc.id,
            |dc| &dc.location,
            |dc, needle| {
                dc.location.to_lowercase() == needle || dc.abbr.to_lowercase() == needle
            },
        )
        .ok_or_else(|| SdkError::DatacenterNotFound(token.to_string()))
    }

    /// Resolve a distribution token (ID or exact label).
    #[instrument(skip(self))]
    pub fn resolve_distribution(&self, token: &str) -> Result<ResolvedResource> {
        let distributions: Vec<Distribution> = self.list("avail.distributions", &[])?;
        resolver::resolve(
            token,
            &distributions,
            |distribution| distribution.id,
            |distribution| &distribution.label,
            |distribution, needle| distribution.label.to_lowercase() == needle,
        )
        .ok_or_else(|| SdkError::DistributionNotFound(token.to_string()))
    }

    /// Resolve a kernel token (ID or partial label).
    ///
    /// Label matching is substring, first match in listing order.
    #[instrument(skip(self))]
    pub fn resolve_kernel(&self, token: &str) -> Result<ResolvedResource> {
        let kernels: Vec<Kernel> = self.list("avail.kernels", &[])?;
        resolver::resolve(
            token,
            &kernels,
            |kernel| kernel.id,
            |kernel| &kernel.label,
            |kernel, needle| kernel.label.to_lowercase().contains(needle),
        )
        .ok_or_else(|| SdkError::KernelNotFound(token.to_string()))
    }

    /// Resolve a golden image token (ID or exact label).
    #[instrument(skip(self))]
    pub fn resolve_image(&self, token: &str) -> Result<ResolvedResource> {
        let images = self.list_images()?;
        resolver::resolve(
            token,
            &images,
            |image| image.id,
            |image| &image.label,
            |image, needle| image.label.to_lowercase() == needle,
        )
        .ok_or_else(|| SdkError::ImageNotFound(token.to_string()))
    }

    // =========================================================================
    // Node management
    // =========================================================================

    /// List nodes: all of them, or the one with the given ID.
    #[instrument(skip(self))]
    pub fn list_nodes(&self, node_id: Option<u32>) -> Result<Vec<Node>> {
        debug!("Listing nodes");
        match node_id {
            Some(id) => self.list("linode.list", &[param("LinodeID", id)]),
            None => self.list("linode.list", &[]),
        }
    }

    /// RAM of a node in MiB, read from its listing record.
    #[instrument(skip(self))]
    pub fn node_memory(&self, node_id: u32) -> Result<u32> {
        let nodes = self.list_nodes(Some(node_id))?;
        nodes
            .first()
            .map(|node| node.total_ram)
            .ok_or_else(|| SdkError::NodeNotFound(node_id.to_string()))
    }

    /// Create a node on the given plan in the given datacenter.
    ///
    /// The datacenter token is resolved first; with validation disabled it is
    /// sent to the wire untouched.
    #[instrument(skip(self, options), fields(plan_id = options.plan_id, datacenter = %options.datacenter))]
    pub fn create_node(&self, options: CreateNodeOptions) -> Result<u32> {
        let datacenter = if options.validate {
            self.resolve_datacenter(&options.datacenter)?.id.to_string()
        } else {
            options.datacenter.clone()
        };

        info!(datacenter = %datacenter, "Creating node");

        let payload = self.call(
            "linode.create",
            &[
                param("PLANID", options.plan_id),
                param("DATACENTERID", datacenter),
            ],
        )?;
        require_u32(&payload, "LinodeID")
    }

    /// Relabel a node and set its display group.
    #[instrument(skip(self))]
    pub fn update_node(&self, node_id: u32, label: &str, display_group: &str) -> Result<u32> {
        info!("Updating node");

        let payload = self.call(
            "linode.update",
            &[
                param("LinodeID", node_id),
                param("Label", label),
                param("lpm_displayGroup", display_group),
            ],
        )?;
        require_u32(&payload, "LinodeID")
    }

    /// Delete a node. `skip_checks` bypasses the provider's safety checks.
    #[instrument(skip(self))]
    pub fn delete_node(&self, node_id: u32, skip_checks: bool) -> Result<u32> {
        info!("Deleting node");

        let payload = self.call(
            "linode.delete",
            &[
                param("LinodeID", node_id),
                param("skipChecks", if skip_checks { 1 } else { 0 }),
            ],
        )?;
        require_u32(&payload, "LinodeID")
    }

    /// Delete every node on the account, in listing order.
    ///
    /// A provider fault on one node is collected and the remaining nodes are
    /// still attempted; a transport failure aborts the loop.
    #[instrument(skip(self))]
    pub fn delete_all_nodes(&self, skip_checks: bool) -> Result<BulkDeleteResult> {
        let nodes = self.list_nodes(None)?;
        info!(count = nodes.len(), "Deleting all nodes");

        let mut result = BulkDeleteResult::default();
        for node in nodes {
            match self.delete_node(node.id, skip_checks) {
                Ok(id) => result.deleted.push(id),
                Err(SdkError::Api(faults)) => result.failures.push(BulkDeleteFailure {
                    node_id: node.id,
                    faults,
                }),
                Err(err) => return Err(err),
            }
        }

        Ok(result)
    }

    // =========================================================================
    // IP addresses
    // =========================================================================

    /// List IP addresses: the whole account's, or one node's.
    #[instrument(skip(self))]
    pub fn list_ips(&self, node_id: Option<u32>) -> Result<Vec<IpAddress>> {
        debug!("Listing addresses");
        match node_id {
            Some(id) => self.list("linode.ip.list", &[param("LinodeID", id)]),
            None => self.list("linode.ip.list", &[]),
        }
    }

    /// First public address of a node, if it has one.
    #[instrument(skip(self))]
    pub fn public_ip(&self, node_id: u32) -> Result<Option<String>> {
        let addresses = self.list_ips(Some(node_id))?;
        Ok(addresses
            .into_iter()
            .find(|address| address.is_public == 1)
            .map(|address| address.address))
    }

    /// Attach a new private address to a node and return it.
    #[instrument(skip(self))]
    pub fn add_private_ip(&self, node_id: u32) -> Result<String> {
        info!("Adding private address");

        let payload = self.call("linode.ip.addprivate", &[param("LinodeID", node_id)])?;
        payload
            .get("IPADDRESS")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                SdkError::UnexpectedResponse(
                    "missing IPADDRESS in response payload".to_string(),
                )
            })
    }

    // =========================================================================
    // Disks & images
    // =========================================================================

    /// List the disks of a node.
    #[instrument(skip(self))]
    pub fn list_disks(&self, node_id: u32) -> Result<Vec<Disk>> {
        debug!("Listing disks");
        self.list("linode.disk.list", &[param("LinodeID", node_id)])
    }

    /// Create a root disk from a distribution.
    ///
    /// The distribution token is resolved first and its canonical label
    /// becomes the disk label.
    #[instrument(skip(self, options), fields(node_id = options.node_id, distribution = %options.distribution))]
    pub fn create_disk_from_distribution(
        &self,
        options: DiskFromDistributionOptions,
    ) -> Result<DiskJob> {
        let distribution = self.resolve_distribution(&options.distribution)?;
        let ssh_key = read_ssh_key(options.ssh_key_file.as_deref())?;

        info!(distribution_id = distribution.id, size_mb = options.size_mb, "Creating disk from distribution");

        let payload = self.call(
            "linode.disk.createfromdistribution",
            &[
                param("LinodeID", options.node_id),
                param("DistributionID", distribution.id),
                param("rootPass", &options.root_pass),
                param("rootSSHKey", ssh_key),
                param("Label", &distribution.label),
                param("Size", options.size_mb),
            ],
        )?;

        Ok(DiskJob {
            disk_id: require_u32(&payload, "DiskID")?,
            job_id: require_u32(&payload, "JobID")?,
        })
    }

    /// Create a swap disk sized from the node's RAM.
    #[instrument(skip(self))]
    pub fn create_swap_disk(&self, node_id: u32) -> Result<DiskJob> {
        let ram_mb = self.node_memory(node_id)?;
        let size_mb = swap_size_for_ram(ram_mb);

        info!(ram_mb, size_mb, "Creating swap disk");

        let payload = self.call(
            "linode.disk.create",
            &[
                param("LinodeID", node_id),
                param("Type", "swap"),
                param("Size", size_mb),
                param("Label", "swapdisk"),
            ],
        )?;

        Ok(DiskJob {
            disk_id: require_u32(&payload, "DiskID")?,
            job_id: require_u32(&payload, "JobID")?,
        })
    }

    /// Create a root disk from a golden image.
    ///
    /// This action answers uppercase `DISKID`/`JOBID` payload keys, unlike
    /// the other disk creates.
    #[instrument(skip(self, options), fields(node_id = options.node_id, image_id = options.image_id))]
    pub fn create_disk_from_image(&self, options: DiskFromImageOptions) -> Result<DiskJob> {
        let ssh_key = read_ssh_key(options.ssh_key_file.as_deref())?;

        info!(size_mb = options.size_mb, "Creating disk from image");

        let payload = self.call(
            "linode.disk.createfromimage",
            &[
                param("ImageID", options.image_id),
                param("LinodeID", options.node_id),
                param("rootPass", &options.root_pass),
                param("rootSSHKey", ssh_key),
                param("Label", &options.label),
                param("Size", options.size_mb),
            ],
        )?;

        Ok(DiskJob {
            disk_id: require_u32(&payload, "DISKID")?,
            job_id: require_u32(&payload, "JOBID")?,
        })
    }

    /// Capture a disk as a golden image.
    #[instrument(skip(self))]
    pub fn imagize_disk(&self, node_id: u32, disk_id: u32, label: &str) -> Result<ImageJob> {
        info!("Imagizing disk");

        let payload = self.call(
            "linode.disk.imagize",
            &[
                param("LinodeID", node_id),
                param("DiskID", disk_id),
                param("Label", label),
            ],
        )?;

        Ok(ImageJob {
            image_id: require_u32(&payload, "ImageID")?,
            job_id: require_u32(&payload, "JobID")?,
        })
    }

    /// List the account's golden images.
    #[instrument(skip(self))]
    pub fn list_images(&self) -> Result<Vec<Image>> {
        debug!("Listing images");
        self.list("image.list", &[])
    }

    /// Delete a golden image and return its ID.
    #[instrument(skip(self))]
    pub fn delete_image(&self, image_id: u32) -> Result<u32> {
        info!("Deleting image");

        self.call("image.delete", &[param("ImageID", image_id)])?;
        Ok(image_id)
    }

    // =========================================================================
    // Configs, boot & jobs
    // =========================================================================

    /// List the boot configuration profiles of a node.
    #[instrument(skip(self))]
    pub fn list_configs(&self, node_id: u32) -> Result<Vec<NodeConfig>> {
        debug!("Listing configs");
        self.list("linode.config.list", &[param("LinodeID", node_id)])
    }

    /// Create a boot configuration profile.
    ///
    /// The kernel token is resolved first; with validation disabled it is
    /// sent to the wire untouched. Disk IDs are joined comma-separated.
    #[instrument(skip(self, options), fields(node_id = options.node_id, kernel = %options.kernel))]
    pub fn create_config(&self, options: CreateConfigOptions) -> Result<u32> {
        let kernel = if options.validate {
            self.resolve_kernel(&options.kernel)?.id.to_string()
        } else {
            options.kernel.clone()
        };

        let disk_list = options
            .disk_ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");

        info!(kernel = %kernel, "Creating config");

        let payload = self.call(
            "linode.config.create",
            &[
                param("LinodeID", options.node_id),
                param("KernelID", kernel),
                param("Label", &options.label),
                param("DiskList", disk_list),
            ],
        )?;
        require_u32(&payload, "ConfigID")
    }

    /// Boot a node, optionally into a specific configuration profile.
    #[instrument(skip(self))]
    pub fn boot_node(&self, node_id: u32, config_id: Option<u32>) -> Result<u32> {
        info!("Booting node");

        let mut params = vec![param("LinodeID", node_id)];
        if let Some(config_id) = config_id {
            params.push(param("ConfigID", config_id));
        }

        let payload = self.call("linode.boot", &params)?;
        require_u32(&payload, "JobID")
    }

    /// Shut a node down.
    #[instrument(skip(self))]
    pub fn shutdown_node(&self, node_id: u32) -> Result<u32> {
        info!("Shutting node down");

        let payload = self.call("linode.shutdown", &[param("LinodeID", node_id)])?;
        require_u32(&payload, "JobID")
    }

    /// List the jobs of a node.
    #[instrument(skip(self))]
    pub fn list_jobs(&self, node_id: u32) -> Result<Vec<Job>> {
        debug!("Listing jobs");
        self.list("linode.job.list", &[param("LinodeID", node_id)])
    }

    /// Poll one job once and interpret its completion marker.
    ///
    /// No record for the (node, job) pair is `Unknown`, not an error: the
    /// caller decides whether that is fatal. No polling loop at this layer.
    #[instrument(skip(self))]
    pub fn job_status(&self, node_id: u32, job_id: u32) -> Result<JobStatus> {
        let jobs: Vec<Job> = self.list(
            "linode.job.list",
            &[param("LinodeID", node_id), param("JobID", job_id)],
        )?;
        Ok(jobs.first().map(Job::status).unwrap_or(JobStatus::Unknown))
    }

    // =========================================================================
    // Raw passthrough
    // =========================================================================

    /// Send an arbitrary action and return the whole response envelope,
    /// unclassified. Escape hatch for actions without a typed method.
    ///
    /// String values are sent bare; other JSON values are sent as their
    /// JSON text.
    #[instrument(skip(self, params))]
    pub fn raw_request(&self, action: &str, params: Option<&Map<String, Value>>) -> Result<Value> {
        debug!("Sending raw request");

        let pairs: Vec<Param> = params
            .map(|map| {
                map.iter()
                    .map(|(key, value)| {
                        let rendered = match value {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (key.clone(), rendered)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(self.transport.send(action, &pairs)?)
    }
}

/// Swap disk size in MiB for a node with the given RAM.
///
/// Bands: 1–2 GiB of RAM doubles, 4–8 GiB matches RAM, 8–32 GiB halves,
/// above 32 GiB caps at 32 GiB, everything else (small nodes and the
/// 2–4 GiB gap) gets 2 GiB.
pub fn swap_size_for_ram(ram_mb: u32) -> u32 {
    if (1024..=2048).contains(&ram_mb) {
        ram_mb * 2
    } else if (4096..=8192).contains(&ram_mb) {
        ram_mb
    } else if (8193..=32768).contains(&ram_mb) {
        ram_mb / 2
    } else if ram_mb > 32768 {
        32768
    } else {
        2048
    }
}

/// Build one wire parameter.
fn param(key: &str, value: impl ToString) -> Param {
    (key.to_string(), value.to_string())
}

/// Pull a required numeric field out of a success payload.
fn require_u32(payload: &Value, key: &str) -> Result<u32> {
    payload
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| {
            SdkError::UnexpectedResponse(format!("missing numeric {} in response payload", key))
        })
}

/// Read an SSH public key file and strip every newline.
///
/// No file means an empty key; an unreadable file is rejected before any
/// network call.
fn read_ssh_key(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(|err| {
                SdkError::InvalidInput(format!(
                    "cannot read ssh key file {}: {}",
                    path.display(),
                    err
                ))
            })?;
            Ok(contents.replace(['\r', '\n'], ""))
        }
        None => Ok(String::new()),
    }
}
