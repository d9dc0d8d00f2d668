//! CLI configuration.
//!
//! Values come from an optional TOML file and are overridden by flags:
//!
//! ```toml
//! dump = "game.bin"
//! base = "0x140000000"
//! module = "game.exe"
//! scan_limit = 104857600
//! warn_on_ambiguous = true
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use sigaddr::{FileRegionProvider, MemoryRegion, Registry, RegistryConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::commands::hex_utils::parse_hex_address;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub dump: Option<PathBuf>,
    pub base: Option<String>,
    pub module: Option<String>,
    pub scan_limit: Option<usize>,
    pub warn_on_ambiguous: bool,
}

impl CliConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults if it is missing or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }
}

/// Flags shared by every command that reads a dump
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DumpArgs {
    /// Raw memory dump of the module
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Address the first byte of the dump was mapped at (hex)
    #[arg(long)]
    pub base: Option<String>,

    /// Module name reported to the region provider
    #[arg(long)]
    pub module: Option<String>,

    /// Only scan the first N bytes
    #[arg(long)]
    pub scan_limit: Option<usize>,
}

/// Fully merged dump settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSettings {
    pub dump: PathBuf,
    pub base: u64,
    pub registry: RegistryConfig,
}

impl DumpArgs {
    pub fn settings(&self, config: &CliConfig) -> Result<DumpSettings> {
        let Some(dump) = self.dump.clone().or_else(|| config.dump.clone()) else {
            bail!("No dump file given (use --dump or set `dump` in the config file)");
        };
        let base = match self.base.as_deref().or(config.base.as_deref()) {
            Some(base) => parse_hex_address(base)?,
            None => 0,
        };

        let mut builder = RegistryConfig::builder().warn_on_ambiguous(config.warn_on_ambiguous);
        if let Some(module) = self.module.clone().or_else(|| config.module.clone()) {
            builder = builder.module(module);
        }
        if let Some(limit) = self.scan_limit.or(config.scan_limit) {
            builder = builder.scan_limit(limit);
        }

        Ok(DumpSettings {
            dump,
            base,
            registry: builder.build(),
        })
    }
}

impl DumpSettings {
    pub fn load_region(&self) -> Result<MemoryRegion> {
        MemoryRegion::from_file(&self.dump, self.base)
            .with_context(|| format!("Failed to load dump {}", self.dump.display()))
    }

    pub fn registry(&self) -> Registry {
        let provider = FileRegionProvider::new().with_module(
            self.registry.module.clone(),
            self.dump.clone(),
            self.base,
        );
        Registry::new(provider, self.registry.clone())
    }
}
