// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Nodewright Control CLI
//!
//! CLI tool for driving the provisioning API.
//!
//! Usage:
//!   nodewright-ctl <command> [arguments]
//!
//! Commands:
//!   datacenters, plans, distributions, kernels, stackscripts (catalog)
//!   datacenter-id, distribution-id, kernel-id, image-id (token resolution)
//!   create-node, update-node, delete-node, delete-all-nodes
//!   create-disk-from-distribution, create-swap-disk, create-disk-from-image
//!   create-image, images, delete-image
//!   create-config, boot, shutdown, job-status
//!   ips, public-ip, add-private-ip
//!   api (raw passthrough)

use std::process::ExitCode;

use nodewright_sdk::{
    ApiConfig, CreateConfigOptions, CreateNodeOptions, Datacenter, DiskFromDistributionOptions,
    DiskFromImageOptions, Distribution, JobStatus, Kernel, Plan, ProvisioningSdk,
};

fn print_usage() {
    eprintln!(
        r#"Usage: nodewright-ctl <command> [arguments]

Drive the provisioning API: datacenters, plans, nodes, disks, configs,
images and boot jobs.

COMMANDS:
    datacenters [table|raw]             List datacenters (default: raw)
    datacenter-id <token>               Resolve a datacenter token to its ID
    plans [table|raw]                   List plans (default: table)
    nodes [node-id]                     List nodes, or one node
    ram <node-id>                       Print a node's RAM in MiB
    distributions [filter [table|raw]]  List distributions, label substring filter
    distribution-id <token>             Resolve a distribution token to <id>,<label>
    kernels [filter [table|raw]]        List kernels, label regex filter
    kernel-id <token>                   Resolve a kernel token to <id>,<label>
    stackscripts                        List the public stack script library
    my-stackscripts                     List the account's stack scripts
    stackscript <id>                    Get one stack script
    jobs <node-id>                      List a node's jobs
    job-status <node-id> <job-id>       Print 0 pending, 1 succeeded, 2 failed
    disks <node-id>                     List a node's disks
    configs <node-id>                   List a node's boot configs
    ips [node-id]                       List addresses, optionally for one node
    public-ip <node-id>                 Print a node's first public address
    add-private-ip <node-id>            Attach a private address to a node
    create-node <plan-id> <datacenter> [validate]
    update-node <node-id> <label> <display-group>
    delete-node <node-id> <skip-checks>
    delete-all-nodes <skip-checks>
    create-disk-from-distribution <node-id> <distribution> <size> <root-pass> [ssh-key-file]
    create-swap-disk <node-id>          Create a swap disk sized from the node's RAM
    create-disk-from-image <node-id> <image-id> <label> <size> <root-pass> [ssh-key-file]
    create-image <node-id> <disk-id> <label>
    images                              List golden images
    image-id <token>                    Resolve an image token to <id>,<label>
    delete-image <image-id>             Delete a golden image
    create-config <node-id> <kernel> <disk-ids> <label> [validate]
    boot <node-id> [config-id]          Boot a node
    shutdown <node-id>                  Shut a node down
    api <action> [json-params]          Send a raw action, print the whole envelope

ARGUMENTS:
    <datacenter>                    Datacenter ID, location, or abbreviation
    <distribution>                  Distribution ID or exact label (case-insensitive)
    <kernel>                        Kernel ID or partial label
    <disk-ids>                      Comma-separated disk IDs
    <size>                          Disk size in MiB
    <skip-checks>                   1 to bypass the provider's delete checks, 0 to keep them
    [validate]                      0 to skip token resolution (default: validate)
    [ssh-key-file]                  Path to an SSH public key for the root account

ENVIRONMENT:
    NODEWRIGHT_API_URL              Provider endpoint URL (required)
    NODEWRIGHT_API_KEY              API key (required)
    NODEWRIGHT_REQUEST_LOG          Append request/response transcripts to this file
    RUST_LOG                        Log filter (default: warn), logs go to stderr

EXAMPLES:
    # Create, provision, and boot a node
    nodewright-ctl create-node 2 newark
    nodewright-ctl create-disk-from-distribution 8098 "Debian 8.1" 24000 hunter2 ~/.ssh/id_rsa.pub
    nodewright-ctl create-swap-disk 8098
    nodewright-ctl create-config 8098 "latest 64 bit" 101,102 "Debian profile"
    nodewright-ctl boot 8098 7001

    # Poll the boot job
    nodewright-ctl job-status 8098 90210

    # Raw escape hatch for actions without a typed command
    nodewright-ctl api linode.reboot '{{"LinodeID": "8098"}}'
"#
    );
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputFormat {
    Table,
    Raw,
}

#[derive(Debug)]
enum Command {
    Datacenters {
        format: OutputFormat,
    },
    DatacenterId {
        token: String,
    },
    Plans {
        format: OutputFormat,
    },
    Nodes {
        node_id: Option<u32>,
    },
    Ram {
        node_id: u32,
    },
    Distributions {
        filter: Option<String>,
        format: OutputFormat,
    },
    DistributionId {
        token: String,
    },
    Kernels {
        filter: Option<String>,
        format: OutputFormat,
    },
    KernelId {
        token: String,
    },
    Stackscripts,
    MyStackscripts,
    Stackscript {
        stackscript_id: u32,
    },
    Jobs {
        node_id: u32,
    },
    JobStatus {
        node_id: u32,
        job_id: u32,
    },
    Disks {
        node_id: u32,
    },
    Configs {
        node_id: u32,
    },
    Ips {
        node_id: Option<u32>,
    },
    PublicIp {
        node_id: u32,
    },
    AddPrivateIp {
        node_id: u32,
    },
    CreateNode {
        plan_id: u32,
        datacenter: String,
        validate: bool,
    },
    UpdateNode {
        node_id: u32,
        label: String,
        display_group: String,
    },
    DeleteNode {
        node_id: u32,
        skip_checks: bool,
    },
    DeleteAllNodes {
        skip_checks: bool,
    },
    CreateDiskFromDistribution {
        node_id: u32,
        distribution: String,
        size_mb: u32,
        root_pass: String,
        ssh_key_file: Option<String>,
    },
    CreateSwapDisk {
        node_id: u32,
    },
    CreateDiskFromImage {
        node_id: u32,
        image_id: u32,
        label: String,
        size_mb: u32,
        root_pass: String,
        ssh_key_file: Option<String>,
    },
    CreateImage {
        node_id: u32,
        disk_id: u32,
        label: String,
    },
    Images,
    ImageId {
        token: String,
    },
    DeleteImage {
        image_id: u32,
    },
    CreateConfig {
        node_id: u32,
        kernel: String,
        disk_ids: Vec<u32>,
        label: String,
        validate: bool,
    },
    Boot {
        node_id: u32,
        config_id: Option<u32>,
    },
    Shutdown {
        node_id: u32,
    },
    Api {
        action: String,
        params: Option<String>,
    },
}

fn require_arg(args: &[String], index: usize, name: &str) -> Result<String, String> {
    args.get(index)
        .cloned()
        .ok_or_else(|| format!("{} required", name))
}

fn parse_id(args: &[String], index: usize, name: &str) -> Result<u32, String> {
    require_arg(args, index, name)?
        .parse()
        .map_err(|_| format!("{} must be a number", name))
}

fn parse_optional_id(args: &[String], index: usize, name: &str) -> Result<Option<u32>, String> {
    match args.get(index) {
        Some(raw) => Ok(Some(
            raw.parse().map_err(|_| format!("{} must be a number", name))?,
        )),
        None => Ok(None),
    }
}

fn parse_format(
    args: &[String],
    index: usize,
    default: OutputFormat,
) -> Result<OutputFormat, String> {
    match args.get(index).map(String::as_str) {
        None => Ok(default),
        Some("table") => Ok(OutputFormat::Table),
        Some("raw") => Ok(OutputFormat::Raw),
        Some(other) => Err(format!("Unknown format: {}", other)),
    }
}

fn parse_switch(args: &[String], index: usize, name: &str) -> Result<bool, String> {
    match args.get(index).map(String::as_str) {
        Some("0") => Ok(false),
        Some("1") => Ok(true),
        Some(other) => Err(format!("{} must be 0 or 1, got {}", name, other)),
        None => Err(format!("{} required", name)),
    }
}

/// `0` disables validation; anything else or nothing keeps it on.
fn parse_validate(args: &[String], index: usize) -> bool {
    args.get(index).map(|raw| raw != "0").unwrap_or(true)
}

fn reject_extra_args(args: &[String], max: usize) -> Result<(), String> {
    match args.get(max) {
        Some(extra) => Err(format!("Unexpected argument: {}", extra)),
        None => Ok(()),
    }
}

fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = std::env::args().collect();
    parse_args_from_vec(&args)
}

fn parse_args_from_vec(args: &[String]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    match args[1].as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            std::process::exit(0);
        }
        "datacenters" => {
            let format = parse_format(args, 2, OutputFormat::Raw)?;
            reject_extra_args(args, 3)?;
            Ok(Command::Datacenters { format })
        }
        "datacenter-id" => {
            let token = require_arg(args, 2, "Datacenter token")?;
            reject_extra_args(args, 3)?;
            Ok(Command::DatacenterId { token })
        }
        "plans" => {
            let format = parse_format(args, 2, OutputFormat::Table)?;
            reject_extra_args(args, 3)?;
            Ok(Command::Plans { format })
        }
        "nodes" => {
            let node_id = parse_optional_id(args, 2, "Node ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::Nodes { node_id })
        }
        "ram" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::Ram { node_id })
        }
        "distributions" => {
            let filter = args.get(2).cloned();
            let format = parse_format(args, 3, OutputFormat::Raw)?;
            reject_extra_args(args, 4)?;
            Ok(Command::Distributions { filter, format })
        }
        "distribution-id" => {
            let token = require_arg(args, 2, "Distribution token")?;
            reject_extra_args(args, 3)?;
            Ok(Command::DistributionId { token })
        }
        "kernels" => {
            let filter = args.get(2).cloned();
            let format = parse_format(args, 3, OutputFormat::Raw)?;
            reject_extra_args(args, 4)?;
            Ok(Command::Kernels { filter, format })
        }
        "kernel-id" => {
            let token = require_arg(args, 2, "Kernel token")?;
            reject_extra_args(args, 3)?;
            Ok(Command::KernelId { token })
        }
        "stackscripts" => {
            reject_extra_args(args, 2)?;
            Ok(Command::Stackscripts)
        }
        "my-stackscripts" => {
            reject_extra_args(args, 2)?;
            Ok(Command::MyStackscripts)
        }
        "stackscript" => {
            let stackscript_id = parse_id(args, 2, "Stack script ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::Stackscript { stackscript_id })
        }
        "jobs" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::Jobs { node_id })
        }
        "job-status" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            let job_id = parse_id(args, 3, "Job ID")?;
            reject_extra_args(args, 4)?;
            Ok(Command::JobStatus { node_id, job_id })
        }
        "disks" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::Disks { node_id })
        }
        "configs" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::Configs { node_id })
        }
        "ips" => {
            let node_id = parse_optional_id(args, 2, "Node ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::Ips { node_id })
        }
        "public-ip" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::PublicIp { node_id })
        }
        "add-private-ip" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::AddPrivateIp { node_id })
        }
        "create-node" => {
            let plan_id = parse_id(args, 2, "Plan ID")?;
            let datacenter = require_arg(args, 3, "Datacenter")?;
            let validate = parse_validate(args, 4);
            reject_extra_args(args, 5)?;
            Ok(Command::CreateNode {
                plan_id,
                datacenter,
                validate,
            })
        }
        "update-node" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            let label = require_arg(args, 3, "Label")?;
            let display_group = require_arg(args, 4, "Display group")?;
            reject_extra_args(args, 5)?;
            Ok(Command::UpdateNode {
                node_id,
                label,
                display_group,
            })
        }
        "delete-node" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            let skip_checks = parse_switch(args, 3, "Skip-checks")?;
            reject_extra_args(args, 4)?;
            Ok(Command::DeleteNode {
                node_id,
                skip_checks,
            })
        }
        "delete-all-nodes" => {
            let skip_checks = parse_switch(args, 2, "Skip-checks")?;
            reject_extra_args(args, 3)?;
            Ok(Command::DeleteAllNodes { skip_checks })
        }
        "create-disk-from-distribution" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            let distribution = require_arg(args, 3, "Distribution")?;
            let size_mb = parse_id(args, 4, "Size")?;
            let root_pass = require_arg(args, 5, "Root password")?;
            let ssh_key_file = args.get(6).filter(|raw| !raw.is_empty()).cloned();
            reject_extra_args(args, 7)?;
            Ok(Command::CreateDiskFromDistribution {
                node_id,
                distribution,
                size_mb,
                root_pass,
                ssh_key_file,
            })
        }
        "create-swap-disk" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::CreateSwapDisk { node_id })
        }
        "create-disk-from-image" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            let image_id = parse_id(args, 3, "Image ID")?;
            let label = require_arg(args, 4, "Label")?;
            let size_mb = parse_id(args, 5, "Size")?;
            let root_pass = require_arg(args, 6, "Root password")?;
            let ssh_key_file = args.get(7).filter(|raw| !raw.is_empty()).cloned();
            reject_extra_args(args, 8)?;
            Ok(Command::CreateDiskFromImage {
                node_id,
                image_id,
                label,
                size_mb,
                root_pass,
                ssh_key_file,
            })
        }
        "create-image" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            let disk_id = parse_id(args, 3, "Disk ID")?;
            let label = require_arg(args, 4, "Label")?;
            reject_extra_args(args, 5)?;
            Ok(Command::CreateImage {
                node_id,
                disk_id,
                label,
            })
        }
        "images" => {
            reject_extra_args(args, 2)?;
            Ok(Command::Images)
        }
        "image-id" => {
            let token = require_arg(args, 2, "Image token")?;
            reject_extra_args(args, 3)?;
            Ok(Command::ImageId { token })
        }
        "delete-image" => {
            let image_id = parse_id(args, 2, "Image ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::DeleteImage { image_id })
        }
        "create-config" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            let kernel = require_arg(args, 3, "Kernel")?;
            let raw_disks = require_arg(args, 4, "Disk IDs")?;
            let disk_ids = raw_disks
                .split(',')
                .map(|part| {
                    part.trim()
                        .parse::<u32>()
                        .map_err(|_| format!("Invalid disk ID: {}", part))
                })
                .collect::<Result<Vec<u32>, String>>()?;
            let label = require_arg(args, 5, "Label")?;
            let validate = parse_validate(args, 6);
            reject_extra_args(args, 7)?;
            Ok(Command::CreateConfig {
                node_id,
                kernel,
                disk_ids,
                label,
                validate,
            })
        }
        "boot" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            let config_id = parse_optional_id(args, 3, "Config ID")?;
            reject_extra_args(args, 4)?;
            Ok(Command::Boot { node_id, config_id })
        }
        "shutdown" => {
            let node_id = parse_id(args, 2, "Node ID")?;
            reject_extra_args(args, 3)?;
            Ok(Command::Shutdown { node_id })
        }
        "api" => {
            let action = require_arg(args, 2, "Action")?;
            let params = args.get(3).cloned();
            reject_extra_args(args, 4)?;
            Ok(Command::Api { action, params })
        }
        cmd => Err(format!("Unknown command: {}", cmd)),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = match parse_args() {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    // Create SDK from environment
    let config = match ApiConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let sdk = ProvisioningSdk::new(config);

    match execute_command(&sdk, cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: serde::Serialize>(records: &T) -> Result<(), String> {
    println!(
        "{}",
        serde_json::to_string_pretty(records).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn print_datacenter_table(mut datacenters: Vec<Datacenter>) {
    datacenters.sort_by_key(|datacenter| datacenter.id);
    println!("{:<5}{:<30}{:<14}", "ID", "Location", "Abbreviation");
    println!("{}", "-".repeat(50));
    for datacenter in datacenters {
        println!(
            "{:<5}{:<30}{:<9}",
            datacenter.id, datacenter.location, datacenter.abbr
        );
    }
}

fn print_plan_table(plans: &[Plan]) {
    for plan in plans {
        println!(
            "{}\t{}\t{} GB RAM\t{} GB HD\t${:.6}/hr\t${}/month",
            plan.id,
            plan.label,
            plan.ram / 1024,
            plan.disk,
            plan.hourly,
            plan.price as i64
        );
    }
}

fn print_distribution_table(mut distributions: Vec<Distribution>) {
    distributions.sort_by(|a, b| a.label.cmp(&b.label));
    println!("{:<5}{:<30}{:<9}", "ID", "LABEL", "64/32-bit");
    println!("{}", "-".repeat(45));
    for distribution in distributions {
        let bits = if distribution.is_64bit == 1 {
            "64-bit"
        } else {
            "32-bit"
        };
        println!("{:<5}{:<30}{:<9}", distribution.id, distribution.label, bits);
    }
}

fn print_kernel_table(mut kernels: Vec<Kernel>) {
    kernels.sort_by(|a, b| a.label.cmp(&b.label));
    println!("{:<5}{:<50}{:<5}{:<5}", "ID", "LABEL", "KVM", "Xen");
    println!("{}", "-".repeat(65));
    for kernel in kernels {
        let kvm = if kernel.is_kvm == 1 { "Y" } else { "N" };
        let xen = if kernel.is_xen == 1 { "Y" } else { "N" };
        println!("{:<5}{:<50}{:<5}{:<5}", kernel.id, kernel.label, kvm, xen);
    }
}

fn execute_command(sdk: &ProvisioningSdk, cmd: Command) -> Result<(), String> {
    match cmd {
        Command::Datacenters { format } => {
            let datacenters = sdk.list_datacenters().map_err(|e| e.to_string())?;
            match format {
                OutputFormat::Table => print_datacenter_table(datacenters),
                OutputFormat::Raw => print_json(&datacenters)?,
            }
        }

        Command::DatacenterId { token } => {
            let found = sdk.resolve_datacenter(&token).map_err(|e| e.to_string())?;
            println!("{}", found.id);
        }

        Command::Plans { format } => {
            let plans = sdk.list_plans().map_err(|e| e.to_string())?;
            match format {
                OutputFormat::Table => print_plan_table(&plans),
                OutputFormat::Raw => print_json(&plans)?,
            }
        }

        Command::Nodes { node_id } => {
            let nodes = sdk.list_nodes(node_id).map_err(|e| e.to_string())?;
            print_json(&nodes)?;
        }

        Command::Ram { node_id } => {
            let ram_mb = sdk.node_memory(node_id).map_err(|e| e.to_string())?;
            println!("{}", ram_mb);
        }

        Command::Distributions { filter, format } => {
            let distributions = sdk
                .list_distributions(filter.as_deref())
                .map_err(|e| e.to_string())?;
            match format {
                OutputFormat::Table => print_distribution_table(distributions),
                OutputFormat::Raw => print_json(&distributions)?,
            }
        }

        Command::DistributionId { token } => {
            let found = sdk
                .resolve_distribution(&token)
                .map_err(|e| e.to_string())?;
            println!("{},{}", found.id, found.label);
        }

        Command::Kernels { filter, format } => {
            let kernels = sdk
                .list_kernels(filter.as_deref())
                .map_err(|e| e.to_string())?;
            match format {
                OutputFormat::Table => print_kernel_table(kernels),
                OutputFormat::Raw => print_json(&kernels)?,
            }
        }

        Command::KernelId { token } => {
            let found = sdk.resolve_kernel(&token).map_err(|e| e.to_string())?;
            println!("{},{}", found.id, found.label);
        }

        Command::Stackscripts => {
            let scripts = sdk.list_stackscripts().map_err(|e| e.to_string())?;
            print_json(&scripts)?;
        }

        Command::MyStackscripts => {
            let scripts = sdk.list_my_stackscripts().map_err(|e| e.to_string())?;
            print_json(&scripts)?;
        }

        Command::Stackscript { stackscript_id } => {
            let scripts = sdk
                .get_stackscript(stackscript_id)
                .map_err(|e| e.to_string())?;
            print_json(&scripts)?;
        }

        Command::Jobs { node_id } => {
            let jobs = sdk.list_jobs(node_id).map_err(|e| e.to_string())?;
            print_json(&jobs)?;
        }

        Command::JobStatus { node_id, job_id } => {
            match sdk.job_status(node_id, job_id).map_err(|e| e.to_string())? {
                JobStatus::Pending => println!("0"),
                JobStatus::Succeeded => println!("1"),
                JobStatus::Failed => println!("2"),
                JobStatus::Unknown => {
                    return Err(format!("No job {} found for node {}", job_id, node_id));
                }
            }
        }

        Command::Disks { node_id } => {
            let disks = sdk.list_disks(node_id).map_err(|e| e.to_string())?;
            print_json(&disks)?;
        }

        Command::Configs { node_id } => {
            let configs = sdk.list_configs(node_id).map_err(|e| e.to_string())?;
            print_json(&configs)?;
        }

        Command::Ips { node_id } => {
            let addresses = sdk.list_ips(node_id).map_err(|e| e.to_string())?;
            print_json(&addresses)?;
        }

        Command::PublicIp { node_id } => {
            match sdk.public_ip(node_id).map_err(|e| e.to_string())? {
                Some(address) => println!("{}", address),
                // No public address: fail without noise so scripts can branch.
                None => std::process::exit(1),
            }
        }

        Command::AddPrivateIp { node_id } => {
            let address = sdk.add_private_ip(node_id).map_err(|e| e.to_string())?;
            println!("{}", address);
        }

        Command::CreateNode {
            plan_id,
            datacenter,
            validate,
        } => {
            let options = CreateNodeOptions::new(plan_id, datacenter).with_validation(validate);
            let node_id = sdk.create_node(options).map_err(|e| e.to_string())?;
            println!("{}", node_id);
        }

        Command::UpdateNode {
            node_id,
            label,
            display_group,
        } => {
            let node_id = sdk
                .update_node(node_id, &label, &display_group)
                .map_err(|e| e.to_string())?;
            println!("{}", node_id);
        }

        Command::DeleteNode {
            node_id,
            skip_checks,
        } => {
            sdk.delete_node(node_id, skip_checks)
                .map_err(|e| e.to_string())?;
        }

        Command::DeleteAllNodes { skip_checks } => {
            let result = sdk.delete_all_nodes(skip_checks).map_err(|e| e.to_string())?;
            println!(
                "{}",
                result
                    .deleted
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(",")
            );
            if !result.failures.is_empty() {
                let summary = result
                    .failures
                    .iter()
                    .map(|failure| {
                        let faults = failure
                            .faults
                            .iter()
                            .map(|fault| fault.to_string())
                            .collect::<Vec<_>>()
                            .join("; ");
                        format!("node {}: {}", failure.node_id, faults)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                return Err(format!("Some nodes could not be deleted:\n{}", summary));
            }
        }

        Command::CreateDiskFromDistribution {
            node_id,
            distribution,
            size_mb,
            root_pass,
            ssh_key_file,
        } => {
            let mut options =
                DiskFromDistributionOptions::new(node_id, distribution, size_mb, root_pass);
            if let Some(path) = ssh_key_file {
                options = options.with_ssh_key_file(path);
            }

            let disk_job = sdk
                .create_disk_from_distribution(options)
                .map_err(|e| e.to_string())?;
            println!("{},{}", disk_job.disk_id, disk_job.job_id);
        }

        Command::CreateSwapDisk { node_id } => {
            let disk_job = sdk.create_swap_disk(node_id).map_err(|e| e.to_string())?;
            println!("{},{}", disk_job.disk_id, disk_job.job_id);
        }

        Command::CreateDiskFromImage {
            node_id,
            image_id,
            label,
            size_mb,
            root_pass,
            ssh_key_file,
        } => {
            let mut options =
                DiskFromImageOptions::new(node_id, image_id, label, size_mb, root_pass);
            if let Some(path) = ssh_key_file {
                options = options.with_ssh_key_file(path);
            }

            let disk_job = sdk
                .create_disk_from_image(options)
                .map_err(|e| e.to_string())?;
            println!("{},{}", disk_job.disk_id, disk_job.job_id);
        }

        Command::CreateImage {
            node_id,
            disk_id,
            label,
        } => {
            let image_job = sdk
                .imagize_disk(node_id, disk_id, &label)
                .map_err(|e| e.to_string())?;
            println!("{},{}", image_job.image_id, image_job.job_id);
        }

        Command::Images => {
            let images = sdk.list_images().map_err(|e| e.to_string())?;
            print_json(&images)?;
        }

        Command::ImageId { token } => {
            let found = sdk.resolve_image(&token).map_err(|e| e.to_string())?;
            println!("{},{}", found.id, found.label);
        }

        Command::DeleteImage { image_id } => {
            sdk.delete_image(image_id).map_err(|e| e.to_string())?;
        }

        Command::CreateConfig {
            node_id,
            kernel,
            disk_ids,
            label,
            validate,
        } => {
            let options = CreateConfigOptions::new(node_id, kernel, disk_ids, label)
                .with_validation(validate);
            let config_id = sdk.create_config(options).map_err(|e| e.to_string())?;
            println!("{}", config_id);
        }

        Command::Boot { node_id, config_id } => {
            let job_id = sdk
                .boot_node(node_id, config_id)
                .map_err(|e| e.to_string())?;
            println!("{}", job_id);
        }

        Command::Shutdown { node_id } => {
            let job_id = sdk.shutdown_node(node_id).map_err(|e| e.to_string())?;
            println!("{}", job_id);
        }

        Command::Api { action, params } => {
            let parsed = match params {
                Some(raw) => {
                    let value: serde_json::Value = serde_json::from_str(&raw)
                        .map_err(|e| format!("Invalid params JSON: {}", e))?;
                    match value {
                        serde_json::Value::Object(map) => Some(map),
                        _ => return Err("Params must be a JSON object".to_string()),
                    }
                }
                None => None,
            };

            let envelope = sdk
                .raw_request(&action, parsed.as_ref())
                .map_err(|e| e.to_string())?;
            println!(
                "{}",
                serde_json::to_string_pretty(&envelope).map_err(|e| e.to_string())?
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to create args vector from string slice
    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    // ==========================================================================
    // Basic commands
    // ==========================================================================

    #[test]
    fn test_parse_no_command() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl"]));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err(), "No command specified");
    }

    #[test]
    fn test_parse_unknown_command() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "reboot-everything"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Unknown command"));
    }

    #[test]
    fn test_parse_images() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "images"]));
        assert!(result.is_ok());
        assert!(matches!(result.unwrap(), Command::Images));
    }

    #[test]
    fn test_parse_images_rejects_extra_args() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "images", "leftover"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Unexpected argument"));
    }

    // ==========================================================================
    // Catalog listings and formats
    // ==========================================================================

    #[test]
    fn test_parse_datacenters_default_format() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "datacenters"]));
        match result.unwrap() {
            Command::Datacenters { format } => assert_eq!(format, OutputFormat::Raw),
            _ => panic!("Expected Datacenters command"),
        }
    }

    #[test]
    fn test_parse_datacenters_table_format() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "datacenters", "table"]));
        match result.unwrap() {
            Command::Datacenters { format } => assert_eq!(format, OutputFormat::Table),
            _ => panic!("Expected Datacenters command"),
        }
    }

    #[test]
    fn test_parse_datacenters_unknown_format() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "datacenters", "csv"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_parse_plans_default_format_is_table() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "plans"]));
        match result.unwrap() {
            Command::Plans { format } => assert_eq!(format, OutputFormat::Table),
            _ => panic!("Expected Plans command"),
        }
    }

    #[test]
    fn test_parse_distributions_filter_then_format() {
        let result =
            parse_args_from_vec(&args(&["nodewright-ctl", "distributions", "debian", "table"]));
        match result.unwrap() {
            Command::Distributions { filter, format } => {
                assert_eq!(filter, Some("debian".to_string()));
                assert_eq!(format, OutputFormat::Table);
            }
            _ => panic!("Expected Distributions command"),
        }
    }

    #[test]
    fn test_parse_distributions_bare() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "distributions"]));
        match result.unwrap() {
            Command::Distributions { filter, format } => {
                assert!(filter.is_none());
                assert_eq!(format, OutputFormat::Raw);
            }
            _ => panic!("Expected Distributions command"),
        }
    }

    #[test]
    fn test_parse_kernels_first_positional_is_the_filter() {
        // Document order: a lone "table" is a filter, not a format.
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "kernels", "table"]));
        match result.unwrap() {
            Command::Kernels { filter, format } => {
                assert_eq!(filter, Some("table".to_string()));
                assert_eq!(format, OutputFormat::Raw);
            }
            _ => panic!("Expected Kernels command"),
        }
    }

    // ==========================================================================
    // Token resolution commands
    // ==========================================================================

    #[test]
    fn test_parse_datacenter_id() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "datacenter-id", "newark"]));
        match result.unwrap() {
            Command::DatacenterId { token } => assert_eq!(token, "newark"),
            _ => panic!("Expected DatacenterId command"),
        }
    }

    #[test]
    fn test_parse_datacenter_id_missing_token() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "datacenter-id"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Datacenter token required"));
    }

    #[test]
    fn test_parse_kernel_id() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "kernel-id", "linode59"]));
        match result.unwrap() {
            Command::KernelId { token } => assert_eq!(token, "linode59"),
            _ => panic!("Expected KernelId command"),
        }
    }

    // ==========================================================================
    // Node commands
    // ==========================================================================

    #[test]
    fn test_parse_nodes_bare_and_with_id() {
        match parse_args_from_vec(&args(&["nodewright-ctl", "nodes"])).unwrap() {
            Command::Nodes { node_id } => assert!(node_id.is_none()),
            _ => panic!("Expected Nodes command"),
        }
        match parse_args_from_vec(&args(&["nodewright-ctl", "nodes", "8098"])).unwrap() {
            Command::Nodes { node_id } => assert_eq!(node_id, Some(8098)),
            _ => panic!("Expected Nodes command"),
        }
    }

    #[test]
    fn test_parse_nodes_invalid_id() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "nodes", "fleet"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Node ID must be a number"));
    }

    #[test]
    fn test_parse_ram_missing_id() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "ram"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Node ID required"));
    }

    #[test]
    fn test_parse_create_node_minimal() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "create-node", "2", "newark"]));
        match result.unwrap() {
            Command::CreateNode {
                plan_id,
                datacenter,
                validate,
            } => {
                assert_eq!(plan_id, 2);
                assert_eq!(datacenter, "newark");
                assert!(validate);
            }
            _ => panic!("Expected CreateNode command"),
        }
    }

    #[test]
    fn test_parse_create_node_validate_zero_disables() {
        let result =
            parse_args_from_vec(&args(&["nodewright-ctl", "create-node", "2", "6", "0"]));
        match result.unwrap() {
            Command::CreateNode { validate, .. } => assert!(!validate),
            _ => panic!("Expected CreateNode command"),
        }
    }

    #[test]
    fn test_parse_create_node_validate_other_values_keep_it_on() {
        let result =
            parse_args_from_vec(&args(&["nodewright-ctl", "create-node", "2", "6", "yes"]));
        match result.unwrap() {
            Command::CreateNode { validate, .. } => assert!(validate),
            _ => panic!("Expected CreateNode command"),
        }
    }

    #[test]
    fn test_parse_create_node_missing_datacenter() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "create-node", "2"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Datacenter required"));
    }

    #[test]
    fn test_parse_update_node() {
        let result = parse_args_from_vec(&args(&[
            "nodewright-ctl",
            "update-node",
            "8098",
            "runner-3",
            "build-fleet",
        ]));
        match result.unwrap() {
            Command::UpdateNode {
                node_id,
                label,
                display_group,
            } => {
                assert_eq!(node_id, 8098);
                assert_eq!(label, "runner-3");
                assert_eq!(display_group, "build-fleet");
            }
            _ => panic!("Expected UpdateNode command"),
        }
    }

    #[test]
    fn test_parse_delete_node() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "delete-node", "8098", "1"]));
        match result.unwrap() {
            Command::DeleteNode {
                node_id,
                skip_checks,
            } => {
                assert_eq!(node_id, 8098);
                assert!(skip_checks);
            }
            _ => panic!("Expected DeleteNode command"),
        }
    }

    #[test]
    fn test_parse_delete_node_rejects_non_binary_switch() {
        let result =
            parse_args_from_vec(&args(&["nodewright-ctl", "delete-node", "8098", "yes"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("must be 0 or 1"));
    }

    #[test]
    fn test_parse_delete_all_nodes_requires_switch() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "delete-all-nodes"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Skip-checks required"));
    }

    // ==========================================================================
    // Disk and image commands
    // ==========================================================================

    #[test]
    fn test_parse_create_disk_from_distribution_minimal() {
        let result = parse_args_from_vec(&args(&[
            "nodewright-ctl",
            "create-disk-from-distribution",
            "8098",
            "Debian 8.1",
            "24000",
            "hunter2",
        ]));
        match result.unwrap() {
            Command::CreateDiskFromDistribution {
                node_id,
                distribution,
                size_mb,
                root_pass,
                ssh_key_file,
            } => {
                assert_eq!(node_id, 8098);
                assert_eq!(distribution, "Debian 8.1");
                assert_eq!(size_mb, 24000);
                assert_eq!(root_pass, "hunter2");
                assert!(ssh_key_file.is_none());
            }
            _ => panic!("Expected CreateDiskFromDistribution command"),
        }
    }

    #[test]
    fn test_parse_create_disk_from_distribution_with_key_file() {
        let result = parse_args_from_vec(&args(&[
            "nodewright-ctl",
            "create-disk-from-distribution",
            "8098",
            "130",
            "24000",
            "hunter2",
            "/home/ops/.ssh/id_rsa.pub",
        ]));
        match result.unwrap() {
            Command::CreateDiskFromDistribution { ssh_key_file, .. } => {
                assert_eq!(ssh_key_file, Some("/home/ops/.ssh/id_rsa.pub".to_string()));
            }
            _ => panic!("Expected CreateDiskFromDistribution command"),
        }
    }

    #[test]
    fn test_parse_create_disk_from_distribution_empty_key_file_means_none() {
        let result = parse_args_from_vec(&args(&[
            "nodewright-ctl",
            "create-disk-from-distribution",
            "8098",
            "130",
            "24000",
            "hunter2",
            "",
        ]));
        match result.unwrap() {
            Command::CreateDiskFromDistribution { ssh_key_file, .. } => {
                assert!(ssh_key_file.is_none());
            }
            _ => panic!("Expected CreateDiskFromDistribution command"),
        }
    }

    #[test]
    fn test_parse_create_disk_from_distribution_missing_pass() {
        let result = parse_args_from_vec(&args(&[
            "nodewright-ctl",
            "create-disk-from-distribution",
            "8098",
            "130",
            "24000",
        ]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Root password required"));
    }

    #[test]
    fn test_parse_create_disk_from_image() {
        let result = parse_args_from_vec(&args(&[
            "nodewright-ctl",
            "create-disk-from-image",
            "8098",
            "42",
            "golden-root",
            "24000",
            "hunter2",
        ]));
        match result.unwrap() {
            Command::CreateDiskFromImage {
                node_id,
                image_id,
                label,
                size_mb,
                root_pass,
                ssh_key_file,
            } => {
                assert_eq!(node_id, 8098);
                assert_eq!(image_id, 42);
                assert_eq!(label, "golden-root");
                assert_eq!(size_mb, 24000);
                assert_eq!(root_pass, "hunter2");
                assert!(ssh_key_file.is_none());
            }
            _ => panic!("Expected CreateDiskFromImage command"),
        }
    }

    #[test]
    fn test_parse_create_swap_disk() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "create-swap-disk", "8098"]));
        match result.unwrap() {
            Command::CreateSwapDisk { node_id } => assert_eq!(node_id, 8098),
            _ => panic!("Expected CreateSwapDisk command"),
        }
    }

    #[test]
    fn test_parse_create_image() {
        let result = parse_args_from_vec(&args(&[
            "nodewright-ctl",
            "create-image",
            "8098",
            "101",
            "golden",
        ]));
        match result.unwrap() {
            Command::CreateImage {
                node_id,
                disk_id,
                label,
            } => {
                assert_eq!(node_id, 8098);
                assert_eq!(disk_id, 101);
                assert_eq!(label, "golden");
            }
            _ => panic!("Expected CreateImage command"),
        }
    }

    #[test]
    fn test_parse_delete_image_needs_numeric_id() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "delete-image", "golden"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Image ID must be a number"));
    }

    // ==========================================================================
    // Config, boot and job commands
    // ==========================================================================

    #[test]
    fn test_parse_create_config() {
        let result = parse_args_from_vec(&args(&[
            "nodewright-ctl",
            "create-config",
            "8098",
            "latest 64 bit",
            "101,102",
            "Debian profile",
        ]));
        match result.unwrap() {
            Command::CreateConfig {
                node_id,
                kernel,
                disk_ids,
                label,
                validate,
            } => {
                assert_eq!(node_id, 8098);
                assert_eq!(kernel, "latest 64 bit");
                assert_eq!(disk_ids, vec![101, 102]);
                assert_eq!(label, "Debian profile");
                assert!(validate);
            }
            _ => panic!("Expected CreateConfig command"),
        }
    }

    #[test]
    fn test_parse_create_config_single_disk() {
        let result = parse_args_from_vec(&args(&[
            "nodewright-ctl",
            "create-config",
            "8098",
            "138",
            "101",
            "profile",
            "0",
        ]));
        match result.unwrap() {
            Command::CreateConfig {
                disk_ids, validate, ..
            } => {
                assert_eq!(disk_ids, vec![101]);
                assert!(!validate);
            }
            _ => panic!("Expected CreateConfig command"),
        }
    }

    #[test]
    fn test_parse_create_config_bad_disk_list() {
        let result = parse_args_from_vec(&args(&[
            "nodewright-ctl",
            "create-config",
            "8098",
            "138",
            "101,sda",
            "profile",
        ]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid disk ID"));
    }

    #[test]
    fn test_parse_boot_with_and_without_config() {
        match parse_args_from_vec(&args(&["nodewright-ctl", "boot", "8098"])).unwrap() {
            Command::Boot { node_id, config_id } => {
                assert_eq!(node_id, 8098);
                assert!(config_id.is_none());
            }
            _ => panic!("Expected Boot command"),
        }
        match parse_args_from_vec(&args(&["nodewright-ctl", "boot", "8098", "7001"])).unwrap() {
            Command::Boot { config_id, .. } => assert_eq!(config_id, Some(7001)),
            _ => panic!("Expected Boot command"),
        }
    }

    #[test]
    fn test_parse_job_status() {
        let result =
            parse_args_from_vec(&args(&["nodewright-ctl", "job-status", "8098", "90210"]));
        match result.unwrap() {
            Command::JobStatus { node_id, job_id } => {
                assert_eq!(node_id, 8098);
                assert_eq!(job_id, 90210);
            }
            _ => panic!("Expected JobStatus command"),
        }
    }

    #[test]
    fn test_parse_job_status_missing_job() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "job-status", "8098"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Job ID required"));
    }

    #[test]
    fn test_parse_shutdown() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "shutdown", "8098"]));
        match result.unwrap() {
            Command::Shutdown { node_id } => assert_eq!(node_id, 8098),
            _ => panic!("Expected Shutdown command"),
        }
    }

    // ==========================================================================
    // Address commands
    // ==========================================================================

    #[test]
    fn test_parse_ips_bare_and_scoped() {
        match parse_args_from_vec(&args(&["nodewright-ctl", "ips"])).unwrap() {
            Command::Ips { node_id } => assert!(node_id.is_none()),
            _ => panic!("Expected Ips command"),
        }
        match parse_args_from_vec(&args(&["nodewright-ctl", "ips", "8098"])).unwrap() {
            Command::Ips { node_id } => assert_eq!(node_id, Some(8098)),
            _ => panic!("Expected Ips command"),
        }
    }

    #[test]
    fn test_parse_public_ip() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "public-ip", "8098"]));
        match result.unwrap() {
            Command::PublicIp { node_id } => assert_eq!(node_id, 8098),
            _ => panic!("Expected PublicIp command"),
        }
    }

    #[test]
    fn test_parse_add_private_ip_missing_id() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "add-private-ip"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Node ID required"));
    }

    // ==========================================================================
    // Stack script commands
    // ==========================================================================

    #[test]
    fn test_parse_stackscript_commands() {
        assert!(matches!(
            parse_args_from_vec(&args(&["nodewright-ctl", "stackscripts"])).unwrap(),
            Command::Stackscripts
        ));
        assert!(matches!(
            parse_args_from_vec(&args(&["nodewright-ctl", "my-stackscripts"])).unwrap(),
            Command::MyStackscripts
        ));
        match parse_args_from_vec(&args(&["nodewright-ctl", "stackscript", "10079"])).unwrap() {
            Command::Stackscript { stackscript_id } => assert_eq!(stackscript_id, 10079),
            _ => panic!("Expected Stackscript command"),
        }
    }

    // ==========================================================================
    // Raw passthrough
    // ==========================================================================

    #[test]
    fn test_parse_api_without_params() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "api", "avail.datacenters"]));
        match result.unwrap() {
            Command::Api { action, params } => {
                assert_eq!(action, "avail.datacenters");
                assert!(params.is_none());
            }
            _ => panic!("Expected Api command"),
        }
    }

    #[test]
    fn test_parse_api_with_params() {
        let result = parse_args_from_vec(&args(&[
            "nodewright-ctl",
            "api",
            "linode.reboot",
            r#"{"LinodeID": "8098"}"#,
        ]));
        match result.unwrap() {
            Command::Api { action, params } => {
                assert_eq!(action, "linode.reboot");
                assert_eq!(params, Some(r#"{"LinodeID": "8098"}"#.to_string()));
            }
            _ => panic!("Expected Api command"),
        }
    }

    #[test]
    fn test_parse_api_missing_action() {
        let result = parse_args_from_vec(&args(&["nodewright-ctl", "api"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Action required"));
    }
}
