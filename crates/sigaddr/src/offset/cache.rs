//! Per-descriptor resolution cache
//!
//! A [`ResolvedAddress`] scans for its signature at most once. The first
//! caller of [`value`](ResolvedAddress::value) runs provider, scanner and
//! resolver; callers racing with it block until that single attempt finishes
//! and then read the same outcome. Every outcome, including "not found", is
//! kept for the lifetime of the value.

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::memory::RegionProvider;
use crate::offset::{AddressResolver, CompiledPattern, Descriptor, PatternScanner, Resolution};

/// Region provider and settings shared by the descriptors of one registry
pub struct ScanContext {
    provider: Arc<dyn RegionProvider>,
    config: RegistryConfig,
}

impl ScanContext {
    pub fn new(provider: Arc<dyn RegionProvider>, config: RegistryConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl fmt::Debug for ScanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Cached result of resolving one descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Resolved(Resolution),
    /// The signature does not occur in the region
    NotFound,
    /// The signature matched but the field could not be read or was null
    Unresolved { match_address: u64 },
    /// The region provider failed
    Faulted { message: String },
}

impl Outcome {
    pub fn address(&self) -> Option<u64> {
        match self {
            Outcome::Resolved(resolution) => Some(resolution.address),
            _ => None,
        }
    }

    pub fn is_faulted(&self) -> bool {
        matches!(self, Outcome::Faulted { .. })
    }
}

pub struct ResolvedAddress {
    descriptor: Descriptor,
    pattern: CompiledPattern,
    context: Arc<ScanContext>,
    outcome: OnceLock<Outcome>,
}

impl ResolvedAddress {
    /// Compile the descriptor's signature. Fails with
    /// [`Error::InvalidSignature`] before any scanning happens.
    pub fn new(descriptor: Descriptor, context: Arc<ScanContext>) -> Result<Self> {
        let pattern = CompiledPattern::compile(&descriptor.signature)?;
        Ok(Self {
            descriptor,
            pattern,
            context,
            outcome: OnceLock::new(),
        })
    }

    /// Qualified name
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Signature text as registered
    pub fn signature(&self) -> &str {
        &self.descriptor.signature
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Resolved address, or `None` if the signature did not resolve
    pub fn value(&self) -> Option<u64> {
        self.outcome().address()
    }

    /// Like [`value`](Self::value), but reports a region fault as an error
    pub fn try_value(&self) -> Result<Option<u64>> {
        match self.outcome() {
            Outcome::Faulted { message } => Err(Error::RegionUnreadable {
                module: self.context.config.module.clone(),
                message: message.clone(),
            }),
            outcome => Ok(outcome.address()),
        }
    }

    /// Resolved address, failing with [`Error::NullAddress`] when absent
    pub fn require(&self) -> Result<u64> {
        self.try_value()?.ok_or_else(|| Error::NullAddress {
            name: self.descriptor.display_name().to_string(),
            signature: self.descriptor.signature.clone(),
        })
    }

    /// Like [`require`](Self::require), but a signature that matched nothing
    /// fails with [`Error::NoMatch`] carrying the qualified name.
    pub fn require_found(&self) -> Result<u64> {
        match self.outcome() {
            Outcome::NotFound => Err(Error::NoMatch {
                name: self.descriptor.name.clone(),
                signature: self.descriptor.signature.clone(),
            }),
            _ => self.require(),
        }
    }

    /// Outcome, resolving on first call
    pub fn outcome(&self) -> &Outcome {
        self.outcome.get_or_init(|| self.resolve())
    }

    /// Outcome if resolution already happened
    pub fn cached(&self) -> Option<&Outcome> {
        self.outcome.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.get().is_some()
    }

    fn resolve(&self) -> Outcome {
        let config = &self.context.config;
        debug!("Resolving {} ({})", self.name(), self.signature());

        let region = match self.context.provider.region(&config.module) {
            Ok(region) => region,
            Err(e) => {
                error!("Region for {} unavailable: {}", self.name(), e);
                return Outcome::Faulted {
                    message: e.to_string(),
                };
            }
        };

        let scanner = PatternScanner::new(&self.pattern).with_limit(config.scan_limit);
        let Some(match_address) = scanner.scan(&region) else {
            warn!("{}: signature not found: {}", self.name(), self.signature());
            return Outcome::NotFound;
        };

        if config.warn_on_ambiguous {
            let count = scanner.scan_all(&region).len();
            if count > 1 {
                warn!(
                    "{}: signature matches {} locations, using first at 0x{:X}",
                    self.name(),
                    count,
                    match_address
                );
            }
        }

        match AddressResolver::new(&region).resolve(
            match_address,
            self.descriptor.field_offset,
            self.descriptor.double_pointer,
        ) {
            Some(resolution) => {
                info!("{}: 0x{:X}", self.name(), resolution.address);
                Outcome::Resolved(resolution)
            }
            None => {
                warn!(
                    "{}: matched at 0x{:X} but could not be resolved",
                    self.name(),
                    match_address
                );
                Outcome::Unresolved { match_address }
            }
        }
    }
}

impl fmt::Debug for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedAddress")
            .field("name", &self.descriptor.name)
            .field("signature", &self.descriptor.signature)
            .field("outcome", &self.outcome.get())
            .finish()
    }
}
