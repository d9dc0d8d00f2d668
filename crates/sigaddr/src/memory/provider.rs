//! Region providers.
//!
//! The engine never maps or attaches to memory itself. A [`RegionProvider`]
//! hands out a [`MemoryRegion`] for a module name, and any failure to do so is
//! reported as [`Error::RegionUnreadable`].

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::MemoryRegion;
use crate::error::{Error, Result};

/// Supplies readable memory regions by module name.
pub trait RegionProvider: Send + Sync {
    fn region(&self, module: &str) -> Result<MemoryRegion>;
}

/// Serves the same region for every module name.
#[derive(Debug, Clone)]
pub struct StaticRegionProvider {
    region: MemoryRegion,
}

impl StaticRegionProvider {
    pub fn new(region: MemoryRegion) -> Self {
        Self { region }
    }
}

impl RegionProvider for StaticRegionProvider {
    fn region(&self, module: &str) -> Result<MemoryRegion> {
        debug!("Serving static region {:?} for module '{}'", self.region, module);
        Ok(self.region.clone())
    }
}

/// Loads raw memory dumps from disk, one file per module.
///
/// Files are read on every request; wrap the result in a registry so each
/// descriptor only asks once.
#[derive(Debug, Clone, Default)]
pub struct FileRegionProvider {
    modules: HashMap<String, (PathBuf, u64)>,
}

impl FileRegionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `module` to the dump at `path`, whose first byte lives at `base_address`
    pub fn with_module<S: Into<String>, P: Into<PathBuf>>(
        mut self,
        module: S,
        path: P,
        base_address: u64,
    ) -> Self {
        self.modules
            .insert(module.into(), (path.into(), base_address));
        self
    }
}

impl RegionProvider for FileRegionProvider {
    fn region(&self, module: &str) -> Result<MemoryRegion> {
        let (path, base) = self
            .modules
            .get(module)
            .ok_or_else(|| Error::RegionUnreadable {
                module: module.to_string(),
                message: "no dump file configured".to_string(),
            })?;

        MemoryRegion::from_file(path, *base).map_err(|e| {
            warn!("Failed to load dump {} for '{}': {}", path.display(), module, e);
            Error::RegionUnreadable {
                module: module.to_string(),
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_static_provider_ignores_module_name() {
        let provider = StaticRegionProvider::new(MemoryRegion::new(0x400000, vec![0x90; 16]));
        let a = provider.region("game.exe").unwrap();
        let b = provider.region("other.dll").unwrap();
        assert_eq!(a.base_address(), b.base_address());
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn test_file_provider_loads_configured_module() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xE8, 0x00, 0x00, 0x00, 0x00]).unwrap();

        let provider = FileRegionProvider::new().with_module("game.exe", file.path(), 0x1000);
        let region = provider.region("game.exe").unwrap();
        assert_eq!(region.base_address(), 0x1000);
        assert_eq!(region.bytes()[0], 0xE8);
    }

    #[test]
    fn test_file_provider_unknown_module_is_unreadable() {
        let provider = FileRegionProvider::new();
        let err = provider.region("missing.dll").unwrap_err();
        assert!(matches!(err, Error::RegionUnreadable { ref module, .. } if module == "missing.dll"));
    }

    #[test]
    fn test_file_provider_missing_file_is_unreadable() {
        let provider =
            FileRegionProvider::new().with_module("game.exe", "/nonexistent/dump.bin", 0x1000);
        let err = provider.region("game.exe").unwrap_err();
        assert!(matches!(err, Error::RegionUnreadable { .. }));
    }
}
