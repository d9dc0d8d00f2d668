//! Resolve command implementation.
//!
//! Loads a descriptor file, registers every descriptor against the dump and
//! prints one line per descriptor:
//!
//! ```text
//! Game.Instance                 0x1431B08A0   absolute        AA BB CC DD ?? ?? ?? ??
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use sigaddr::{Outcome, ResolutionDump, load_descriptors};
use tracing::info;

use super::hex_utils::format_hex_address;
use crate::config::DumpSettings;

/// Run the resolve command
pub fn run(settings: &DumpSettings, descriptors: &Path, json: Option<&Path>) -> Result<()> {
    let set = load_descriptors(descriptors)
        .with_context(|| format!("Failed to load descriptors from {}", descriptors.display()))?;
    info!(
        "Loaded {} descriptors (version: {})",
        set.descriptors.len(),
        if set.version.is_empty() { "unknown" } else { &set.version }
    );

    let mut registry = settings.registry();
    registry.register_all(set.descriptors)?;

    let report = registry.resolve_all();
    if report.faulted() > 0 {
        bail!(
            "Could not read module '{}' from {}",
            settings.registry.module,
            settings.dump.display()
        );
    }

    let width = report
        .entries
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(0);
    for entry in &report.entries {
        let status = match &entry.outcome {
            Outcome::Resolved(resolution) => format!(
                "{:<14} {:<15}",
                format_hex_address(resolution.address).green(),
                resolution.kind
            ),
            Outcome::NotFound => format!("{:<30}", "not found".red()),
            Outcome::Unresolved { match_address } => format!(
                "{:<30}",
                format!("unreadable @ {}", format_hex_address(*match_address)).yellow()
            ),
            Outcome::Faulted { message } => format!("{:<30}", message.red()),
        };
        println!("{:<width$}  {} {}", entry.name, status, entry.signature, width = width);
    }

    println!();
    println!(
        "Resolved {}/{} descriptors",
        report.resolved(),
        report.entries.len()
    );

    if let Some(path) = json {
        let region = settings.load_region()?;
        ResolutionDump::from_registry(&registry, &region).save(path)?;
        println!("Wrote resolution dump to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigaddr::RegistryConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_writes_json_dump() {
        let dir = TempDir::new().unwrap();
        let dump = dir.path().join("game.bin");
        let mut bytes = vec![0u8; 0x40];
        bytes[0] = 0xE8;
        bytes[1..5].copy_from_slice(&0x20i32.to_le_bytes());
        fs::write(&dump, &bytes).unwrap();

        let descriptors = dir.path().join("descriptors.json");
        fs::write(
            &descriptors,
            r#"{
                "version": "test",
                "descriptors": [
                    { "name": "Game.Update", "signature": "E8 ?? ?? ?? ??", "field_offset": 1 },
                    { "name": "Game.Missing", "signature": "DE AD BE EF" }
                ]
            }"#,
        )
        .unwrap();

        let settings = DumpSettings {
            dump,
            base: 0x400000,
            registry: RegistryConfig::default(),
        };
        let json = dir.path().join("resolved.json");
        run(&settings, &descriptors, Some(&json)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(written["base_address"], "0x400000");
        assert_eq!(written["entries"][0]["address"], "0x400025");
        assert_eq!(written["entries"][1]["outcome"]["status"], "not_found");
    }

    #[test]
    fn test_missing_descriptor_file_fails() {
        let dir = TempDir::new().unwrap();
        let descriptors = dir.path().join("descriptors.json");
        fs::write(&descriptors, r#"{ "descriptors": [] }"#).unwrap();
        let settings = DumpSettings {
            dump: dir.path().join("missing.bin"),
            base: 0,
            registry: RegistryConfig::default(),
        };
        // An empty list never asks the provider for the dump
        assert!(run(&settings, &descriptors, None).is_ok());
        assert!(run(&settings, &dir.path().join("nope.json"), None).is_err());
    }
}
