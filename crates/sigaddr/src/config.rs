//! Registry configuration.

/// Module name requested from the region provider when none is configured
pub const DEFAULT_MODULE: &str = "main";

/// Configuration shared by every descriptor in a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Module whose region is scanned
    pub module: String,
    /// Only scan the first `scan_limit` bytes of the region
    pub scan_limit: Option<usize>,
    /// Resolve each descriptor as soon as it is registered
    pub resolve_on_register: bool,
    /// Count all matches and warn when a signature is not unique.
    /// Costs a full second pass over the region per descriptor.
    pub warn_on_ambiguous: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            module: DEFAULT_MODULE.to_string(),
            scan_limit: None,
            resolve_on_register: false,
            warn_on_ambiguous: false,
        }
    }
}

impl RegistryConfig {
    /// Create a new configuration builder
    pub fn builder() -> RegistryConfigBuilder {
        RegistryConfigBuilder::default()
    }
}

/// Builder for RegistryConfig
#[derive(Debug, Clone, Default)]
pub struct RegistryConfigBuilder {
    module: Option<String>,
    scan_limit: Option<usize>,
    resolve_on_register: Option<bool>,
    warn_on_ambiguous: Option<bool>,
}

impl RegistryConfigBuilder {
    /// Set the module to scan
    pub fn module<S: Into<String>>(mut self, module: S) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Cap the number of region bytes scanned
    pub fn scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = Some(limit);
        self
    }

    pub fn resolve_on_register(mut self, enabled: bool) -> Self {
        self.resolve_on_register = Some(enabled);
        self
    }

    pub fn warn_on_ambiguous(mut self, enabled: bool) -> Self {
        self.warn_on_ambiguous = Some(enabled);
        self
    }

    /// Build the configuration
    pub fn build(self) -> RegistryConfig {
        let default = RegistryConfig::default();
        RegistryConfig {
            module: self.module.unwrap_or(default.module),
            scan_limit: self.scan_limit.or(default.scan_limit),
            resolve_on_register: self
                .resolve_on_register
                .unwrap_or(default.resolve_on_register),
            warn_on_ambiguous: self.warn_on_ambiguous.unwrap_or(default.warn_on_ambiguous),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        assert_eq!(RegistryConfig::builder().build(), RegistryConfig::default());
    }

    #[test]
    fn test_builder_overrides() {
        let config = RegistryConfig::builder()
            .module("game.exe")
            .scan_limit(0x1000)
            .resolve_on_register(true)
            .build();
        assert_eq!(config.module, "game.exe");
        assert_eq!(config.scan_limit, Some(0x1000));
        assert!(config.resolve_on_register);
        assert!(!config.warn_on_ambiguous);
    }
}
