//! Explicit registry of resolvable addresses
//!
//! Built once at startup from a list of [`Descriptor`]s and passed to whoever
//! needs addresses. Dropping the registry drops every cached outcome, so a
//! fresh registry is how a reloaded module gets rescanned.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::memory::RegionProvider;
use crate::offset::{Descriptor, Outcome, ResolvedAddress, ScanContext};

pub struct Registry {
    context: Arc<ScanContext>,
    entries: HashMap<String, Arc<ResolvedAddress>>,
    order: Vec<String>,
    types: BTreeMap<String, Vec<String>>,
}

impl Registry {
    pub fn new<P: RegionProvider + 'static>(provider: P, config: RegistryConfig) -> Self {
        Self::with_shared_provider(Arc::new(provider), config)
    }

    pub fn with_shared_provider(provider: Arc<dyn RegionProvider>, config: RegistryConfig) -> Self {
        Self {
            context: Arc::new(ScanContext::new(provider, config)),
            entries: HashMap::new(),
            order: Vec::new(),
            types: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        self.context.config()
    }

    /// Register a descriptor, compiling its signature immediately
    pub fn register(&mut self, descriptor: Descriptor) -> Result<Arc<ResolvedAddress>> {
        if self.entries.contains_key(&descriptor.name) {
            return Err(Error::DuplicateDescriptor(descriptor.name));
        }

        let name = descriptor.name.clone();
        let address = Arc::new(ResolvedAddress::new(descriptor, Arc::clone(&self.context))?);
        debug!(
            "Registered {} ({} chunks)",
            name,
            address.pattern().chunks().len()
        );

        if self.config().resolve_on_register {
            address.outcome();
        }

        self.entries.insert(name.clone(), Arc::clone(&address));
        self.order.push(name);
        Ok(address)
    }

    /// Register several descriptors, stopping at the first failure
    pub fn register_all<I>(&mut self, descriptors: I) -> Result<()>
    where
        I: IntoIterator<Item = Descriptor>,
    {
        for descriptor in descriptors {
            self.register(descriptor)?;
        }
        Ok(())
    }

    /// Record the members declared on `type_name`.
    ///
    /// Bookkeeping only; see [`missing_members`](Self::missing_members).
    pub fn register_type<S: AsRef<str>>(&mut self, type_name: &str, members: &[S]) {
        let list = self.types.entry(type_name.to_string()).or_default();
        for member in members {
            let member = member.as_ref();
            if !list.iter().any(|m| m == member) {
                list.push(member.to_string());
            }
        }
    }

    /// Members declared on `type_name`
    pub fn members(&self, type_name: &str) -> &[String] {
        self.types.get(type_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Declared members (`Type.Member`) with no registered descriptor
    pub fn missing_members(&self) -> Vec<String> {
        self.types
            .iter()
            .flat_map(|(type_name, members)| {
                members
                    .iter()
                    .map(move |member| format!("{}.{}", type_name, member))
            })
            .filter(|name| !self.entries.contains_key(name))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ResolvedAddress>> {
        self.entries.get(name)
    }

    pub fn value(&self, name: &str) -> Result<Option<u64>> {
        Ok(self.lookup(name)?.value())
    }

    pub fn require(&self, name: &str) -> Result<u64> {
        self.lookup(name)?.require()
    }

    fn lookup(&self, name: &str) -> Result<&Arc<ResolvedAddress>> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::UnknownDescriptor(name.to_string()))
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ResolvedAddress>> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every registered descriptor and summarize the outcomes
    pub fn resolve_all(&self) -> ResolutionReport {
        let entries: Vec<ReportEntry> = self
            .iter()
            .map(|address| ReportEntry {
                name: address.name().to_string(),
                signature: address.signature().to_string(),
                outcome: address.outcome().clone(),
            })
            .collect();

        let report = ResolutionReport { entries };
        info!(
            "Resolved {}/{} descriptors ({} not found, {} faulted)",
            report.resolved(),
            report.entries.len(),
            report.unresolved(),
            report.faulted()
        );
        report
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub signature: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    pub entries: Vec<ReportEntry>,
}

impl ResolutionReport {
    pub fn resolved(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Resolved(_)))
            .count()
    }

    /// Entries that matched nothing or could not be read
    pub fn unresolved(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::NotFound | Outcome::Unresolved { .. }))
            .count()
    }

    pub fn faulted(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_faulted()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.resolved() == self.entries.len()
    }
}
