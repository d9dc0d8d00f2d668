use crate::error::Result;
use crate::memory::ReadMemory;
use crate::offset::{Outcome, Registry, ResolvedAddress};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Resolution dump for diagnostic purposes
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionDump {
    pub module: String,
    pub base_address: String,
    pub entries: Vec<DumpEntry>,
}

/// One descriptor's state in hex string format
#[derive(Debug, Clone, Serialize)]
pub struct DumpEntry {
    pub name: String,
    pub signature: String,
    pub padded_signature: String,
    pub field_offset: i64,
    pub double_pointer: bool,
    pub outcome: Outcome,
    pub address: Option<String>,
    /// Signed distance from the region base, in bytes; absent when it does
    /// not fit in an `i64`
    pub offset_from_base: Option<i64>,
    pub memory_sample_32bytes: String,
}

impl ResolutionDump {
    /// Resolve every descriptor in `registry` and record what was found.
    ///
    /// `reader` supplies the memory samples; pass the same region the
    /// registry's provider serves.
    pub fn from_registry<R: ReadMemory>(registry: &Registry, reader: &R) -> Self {
        let base = reader.base_address();
        let entries = registry
            .iter()
            .map(|address| Self::entry(address, base, reader))
            .collect();

        Self {
            module: registry.config().module.clone(),
            base_address: format!("0x{:X}", base),
            entries,
        }
    }

    fn entry<R: ReadMemory>(address: &ResolvedAddress, base: u64, reader: &R) -> DumpEntry {
        let outcome = address.outcome().clone();
        let value = outcome.address();
        let descriptor = address.descriptor();

        DumpEntry {
            name: descriptor.name.clone(),
            signature: descriptor.signature.clone(),
            padded_signature: address.pattern().padded_text(),
            field_offset: descriptor.field_offset,
            double_pointer: descriptor.double_pointer,
            address: value.map(|v| format!("0x{:X}", v)),
            offset_from_base: value.and_then(|v| i64::try_from(v as i128 - base as i128).ok()),
            memory_sample_32bytes: value
                .map(|v| Self::read_memory_hex(reader, v, 32))
                .unwrap_or_else(|| "(unresolved)".to_string()),
            outcome,
        }
    }

    fn read_memory_hex<R: ReadMemory>(reader: &R, address: u64, size: usize) -> String {
        match reader.read_bytes(address, size) {
            Ok(bytes) => bytes
                .iter()
                .map(|b| format!("{:02X}", b))
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => "(read failed)".to_string(),
        }
    }

    /// Save dump to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
