// CLI commands for working with the shared contracts
use anyhow::{bail, Context, Result};
use learnforge_contracts::config::ExecutionLimits;
use learnforge_contracts::constants::ConstantBundle;
use learnforge_contracts::guards::Schema;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::generator;

/// Read a JSON payload from a file, or stdin for `None` / "-"
fn read_payload(input: Option<&Path>) -> Result<Value> {
    let content = match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read payload from stdin")?;
            buf
        }
    };

    serde_json::from_str(&content).context("Payload is not valid JSON")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", rendered);
    Ok(())
}

/// Check a payload. Returns whether it matched.
///
/// With a schema: prints `<schema>: ok` or `<schema>: no match`.
/// Without: prints the JSON array of matching schema names.
pub fn check(schema: Option<Schema>, input: Option<&Path>) -> Result<bool> {
    let payload = read_payload(input)?;

    match schema {
        Some(schema) => {
            let matched = schema.check(&payload);
            debug!(schema = %schema, matched, "Checked payload");
            if matched {
                println!("{}: ok", schema);
            } else {
                warn!(schema = %schema, "Payload does not match");
                println!("{}: no match", schema);
            }
            Ok(matched)
        }
        None => {
            let matching = Schema::matching(&payload);
            info!(count = matching.len(), "Checked payload against all schemas");
            print_json(&matching)?;
            Ok(!matching.is_empty())
        }
    }
}

pub fn print_constants() -> Result<()> {
    print_json(&ConstantBundle::new())
}

/// Defaults, then the optional file, then LEARNFORGE_* environment overrides
pub fn print_limits(config: Option<&Path>) -> Result<()> {
    let base = match config {
        Some(path) => ExecutionLimits::load(path)
            .with_context(|| format!("Failed to load limits from {}", path.display()))?,
        None => ExecutionLimits::default(),
    };

    let limits = base
        .with_env_overrides()
        .context("Invalid LEARNFORGE_* environment override")?;

    info!(
        timeout_ms = limits.timeout_ms,
        max_memory_mb = limits.max_memory_mb,
        "Resolved execution limits"
    );
    print_json(&limits)
}

/// Print schema documents, or write them to `out` as `<name>.schema.json`
pub fn export_schemas(name: Option<&str>, out: Option<&Path>) -> Result<()> {
    let Some(documents) = generator::documents(name) else {
        bail!(
            "Unknown record '{}'. Known records: {}",
            name.unwrap_or_default(),
            generator::RECORDS.join(", ")
        );
    };

    let Some(out_dir) = out else {
        if let [(_, schema)] = documents.as_slice() {
            return print_json(schema);
        }
        let bundle: serde_json::Map<String, Value> = documents
            .into_iter()
            .map(|(record, schema)| serde_json::to_value(schema).map(|v| (record.to_string(), v)))
            .collect::<Result<_, serde_json::Error>>()
            .context("Failed to serialize schemas")?;
        return print_json(&bundle);
    };

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    for (record, schema) in &documents {
        let path = out_dir.join(format!("{}.schema.json", record));
        let rendered = serde_json::to_string_pretty(schema)
            .with_context(|| format!("Failed to serialize schema for {}", record))?;
        fs::write(&path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("✅ {}", path.display());
    }

    info!(count = documents.len(), dir = %out_dir.display(), "Schemas written");
    Ok(())
}
