use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// One resolvable address: a named signature plus how to read the match.
///
/// `name` is the qualified name (see [`qualified_name`]) and is the
/// descriptor's identity inside a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub name: String,
    pub signature: String,
    #[serde(default)]
    pub field_offset: i64,
    #[serde(default)]
    pub double_pointer: bool,
}

impl Descriptor {
    pub fn new<N: Into<String>, S: Into<String>>(name: N, signature: S, field_offset: i64) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            field_offset,
            double_pointer: false,
        }
    }

    /// Apply one extra pointer dereference after resolution
    pub fn double_pointer(mut self, enabled: bool) -> Self {
        self.double_pointer = enabled;
        self
    }

    /// Innermost type and member, e.g. `InnerStruct.Instance` for
    /// `Ns.TestStruct+InnerStruct.Instance`
    pub fn display_name(&self) -> &str {
        let Some((types, _member)) = self.name.rsplit_once('.') else {
            return &self.name;
        };
        let start = types.rfind(['.', '+']).map(|i| i + 1).unwrap_or(0);
        &self.name[start..]
    }
}

/// Compose a qualified name: namespace segments joined by `.`, nested types
/// joined by `+`, then `.member`.
pub fn qualified_name(namespace: &str, type_chain: &[&str], member: &str) -> String {
    let mut name = String::new();
    if !namespace.is_empty() {
        name.push_str(namespace);
        name.push('.');
    }
    name.push_str(&type_chain.join("+"));
    name.push('.');
    name.push_str(member);
    name
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorSet {
    #[serde(default)]
    pub version: String,
    pub descriptors: Vec<Descriptor>,
}

impl DescriptorSet {
    pub fn entry(&self, name: &str) -> Option<&Descriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }
}

pub fn load_descriptors<P: AsRef<Path>>(path: P) -> Result<DescriptorSet> {
    let content = fs::read_to_string(&path)?;
    let data = serde_json::from_str(&content)?;
    Ok(data)
}

pub fn save_descriptors<P: AsRef<Path>>(path: P, descriptors: &DescriptorSet) -> Result<()> {
    let content = serde_json::to_string_pretty(descriptors)?;
    fs::write(path, content)?;
    Ok(())
}
