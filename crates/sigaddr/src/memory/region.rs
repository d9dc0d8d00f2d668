use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::ReadMemory;
use crate::error::{Error, Result};

/// Immutable snapshot of a mapped memory range.
///
/// Cloning is cheap: the bytes are shared.
#[derive(Clone)]
pub struct MemoryRegion {
    base_address: u64,
    bytes: Arc<[u8]>,
}

impl MemoryRegion {
    pub fn new(base_address: u64, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            base_address,
            bytes: bytes.into(),
        }
    }

    /// Load a raw memory dump whose first byte was mapped at `base_address`
    pub fn from_file<P: AsRef<Path>>(path: P, base_address: u64) -> Result<Self> {
        let bytes = fs::read(&path)?;
        debug!(
            "Loaded {} bytes from {} at base 0x{:X}",
            bytes.len(),
            path.as_ref().display(),
            base_address
        );
        Ok(Self::new(base_address, bytes))
    }

    pub fn base_address(&self) -> u64 {
        self.base_address
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// One past the last mapped address
    pub fn end_address(&self) -> u64 {
        self.base_address.saturating_add(self.bytes.len() as u64)
    }

    pub fn contains(&self, address: u64) -> bool {
        address >= self.base_address && address < self.end_address()
    }

    /// Offset of `address` from the region start, if it is mapped
    pub fn offset_of(&self, address: u64) -> Option<usize> {
        if self.contains(address) {
            Some((address - self.base_address) as usize)
        } else {
            None
        }
    }

    /// Absolute address of the byte at `offset`
    pub fn address_at(&self, offset: usize) -> u64 {
        self.base_address.wrapping_add(offset as u64)
    }

    /// Borrow `size` bytes at `address` without copying
    pub fn slice(&self, address: u64, size: usize) -> Option<&[u8]> {
        let start = self.offset_of(address)?;
        let end = start.checked_add(size)?;
        self.bytes.get(start..end)
    }
}

impl ReadMemory for MemoryRegion {
    fn base_address(&self) -> u64 {
        self.base_address
    }

    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.slice(address, size)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::MemoryReadFailed {
                address,
                message: format!(
                    "{} bytes not within region 0x{:X}..0x{:X}",
                    size,
                    self.base_address,
                    self.end_address()
                ),
            })
    }
}

impl fmt::Debug for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRegion")
            .field("base_address", &format_args!("0x{:X}", self.base_address))
            .field("len", &self.bytes.len())
            .finish()
    }
}
