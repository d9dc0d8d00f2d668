//! Memory access primitives.
//!
//! - [`ReadMemory`]: byte/word reads at absolute addresses
//! - [`MemoryRegion`]: an immutable snapshot of one mapped module
//! - [`RegionProvider`]: the collaborator that hands out regions by module name

pub mod layout;
mod provider;
mod reader;
mod region;

#[cfg(test)]
pub mod mock;

pub use provider::*;
pub use reader::ReadMemory;
pub use region::MemoryRegion;

#[cfg(test)]
pub use mock::{CountingProvider, MockMemoryBuilder};
