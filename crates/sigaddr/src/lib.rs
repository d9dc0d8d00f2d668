//! # sigaddr
//!
//! Locates functions and data in a native process by byte signature.
//!
//! This crate provides:
//! - Signature compilation into chunked `(value, mask)` words
//! - Masked scanning of memory regions
//! - Resolution of matches through embedded pointers and `CALL`/`JMP rel32`
//! - A registry that resolves each descriptor exactly once, even under
//!   concurrent first access
//!
//! Regions come from a [`RegionProvider`]; the crate never attaches to a
//! process or maps memory itself.

pub mod config;
pub mod error;
pub mod memory;
pub mod offset;
pub mod prelude;

pub use config::{RegistryConfig, RegistryConfigBuilder};
pub use error::{Error, Result};
pub use memory::{
    FileRegionProvider, MemoryRegion, ReadMemory, RegionProvider, StaticRegionProvider,
};
pub use offset::{
    AddressResolver, Chunk, CompiledPattern, Descriptor, DescriptorSet, DumpEntry, Outcome,
    PatternScanner, Registry, ReportEntry, Resolution, ResolutionDump, ResolutionKind,
    ResolutionReport, ResolvedAddress, ScanContext, format_pattern, load_descriptors,
    parse_pattern, qualified_name, save_descriptors,
};
