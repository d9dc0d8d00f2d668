//! Prelude module for convenient imports
//!
//! ```ignore
//! use sigaddr::prelude::*;
//! ```
//!
//! This brings the registration and lookup surface into scope:
//!
//! - Registration: `Registry`, `RegistryConfig`, `Descriptor`, `qualified_name`
//! - Memory: `MemoryRegion`, `RegionProvider`, `StaticRegionProvider`
//! - Error handling: `Error`, `Result`

pub use crate::config::RegistryConfig;
pub use crate::error::{Error, Result};
pub use crate::memory::{MemoryRegion, RegionProvider, StaticRegionProvider};
pub use crate::offset::{Descriptor, Registry, ResolvedAddress, qualified_name};
