//! Scan command implementation.

use anyhow::Result;
use sigaddr::{CompiledPattern, PatternScanner};
use tracing::warn;

use super::hex_utils::format_hex_address;
use crate::config::DumpSettings;

/// Run the scan command
pub fn run(settings: &DumpSettings, signature: &str, max: usize) -> Result<()> {
    let pattern = CompiledPattern::compile(signature)?;
    let region = settings.load_region()?;

    let matches = PatternScanner::new(&pattern)
        .with_limit(settings.registry.scan_limit)
        .scan_all(&region);

    println!("Signature: {}", pattern);
    println!(
        "Region:    {}..{} ({} bytes)",
        format_hex_address(region.base_address()),
        format_hex_address(region.end_address()),
        region.len()
    );
    println!();

    if matches.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    for address in matches.iter().take(max) {
        println!(
            "  {}  (+0x{:X})",
            format_hex_address(*address),
            address - region.base_address()
        );
    }
    if matches.len() > max {
        println!("  ... {} more", matches.len() - max);
    }

    println!();
    println!("Total matches: {}", matches.len());
    if matches.len() > 1 {
        warn!("Signature is not unique; resolution uses the first match");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigaddr::RegistryConfig;
    use std::fs;
    use tempfile::TempDir;

    fn settings(dir: &TempDir, bytes: &[u8]) -> DumpSettings {
        let dump = dir.path().join("game.bin");
        fs::write(&dump, bytes).unwrap();
        DumpSettings {
            dump,
            base: 0x140000000,
            registry: RegistryConfig::default(),
        }
    }

    #[test]
    fn test_scan_lists_matches() {
        let dir = TempDir::new().unwrap();
        let mut bytes = vec![0u8; 0x40];
        bytes[0x08..0x0B].copy_from_slice(&[0x48, 0x8B, 0x05]);
        bytes[0x20..0x23].copy_from_slice(&[0x48, 0x8B, 0x05]);
        let settings = settings(&dir, &bytes);

        assert!(run(&settings, "48 8B 05", 1).is_ok());
        assert!(run(&settings, "DE AD BE EF", 32).is_ok());
    }

    #[test]
    fn test_scan_fails_on_missing_dump_or_bad_signature() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir, &[0u8; 0x10]);
        assert!(run(&settings, "48 8B XX", 32).is_err());

        let missing = DumpSettings {
            dump: dir.path().join("missing.bin"),
            ..settings
        };
        assert!(run(&missing, "48 8B 05", 32).is_err());
    }
}
