// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Topogrep
//!
//! Reads a workflow-scheduler cluster summary document on stdin and prints
//! one selected field per topology, one per line, in document order. Meant
//! for piping a dashboard's summary endpoint into shell scripts.
//!
//! Usage:
//!   curl -s http://scheduler:8080/api/v1/topology/summary | topogrep topology-ids

use std::io::{self, Read, Write};
use std::process::ExitCode;

use serde::Deserialize;

fn print_usage() {
    eprintln!(
        r#"Usage: topogrep <command>

Read a scheduler cluster summary document on stdin and print one field
per topology, in document order.

COMMANDS:
    topology-names    Print each topology's name
    topology-ids      Print each topology's ID

EXAMPLES:
    curl -s http://scheduler:8080/api/v1/topology/summary | topogrep topology-ids
"#
    );
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Name,
    Id,
}

impl Field {
    fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Id => "id",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Summary {
    topologies: Vec<Topology>,
}

#[derive(Debug, Deserialize)]
struct Topology {
    name: Option<String>,
    id: Option<String>,
}

fn parse_field(args: &[String]) -> Result<Field, String> {
    match args.get(1).map(String::as_str) {
        Some("topology-names") => Ok(Field::Name),
        Some("topology-ids") => Ok(Field::Id),
        Some("help" | "--help" | "-h") => {
            print_usage();
            std::process::exit(0);
        }
        Some(other) => Err(format!("Unknown command: {}", other)),
        None => Err("No command specified".to_string()),
    }
}

fn run(field: Field, input: &str, out: &mut impl Write) -> Result<(), String> {
    let summary: Summary = serde_json::from_str(input)
        .map_err(|err| format!("Malformed summary document: {}", err))?;

    for topology in &summary.topologies {
        let value = match field {
            Field::Name => topology.name.as_deref(),
            Field::Id => topology.id.as_deref(),
        };
        let value =
            value.ok_or_else(|| format!("Topology record missing {}", field.key()))?;
        writeln!(out, "{}", value).map_err(|err| err.to_string())?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let field = match parse_field(&args) {
        Ok(field) => field,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        eprintln!("Error: cannot read stdin: {}", e);
        return ExitCode::FAILURE;
    }

    match run(field, &input, &mut io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
