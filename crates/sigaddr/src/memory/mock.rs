//! Test doubles for memory access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use super::{MemoryRegion, RegionProvider};
use crate::error::{Error, Result};

/// Builds a [`MemoryRegion`] by writing values at offsets into a zeroed buffer.
#[derive(Debug, Clone)]
pub struct MockMemoryBuilder {
    base: u64,
    bytes: Vec<u8>,
}

impl Default for MockMemoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self {
            base: 0x1000,
            bytes: Vec::new(),
        }
    }

    pub fn base(mut self, base: u64) -> Self {
        self.base = base;
        self
    }

    /// Grow the buffer to at least `size` bytes
    pub fn size(mut self, size: usize) -> Self {
        if self.bytes.len() < size {
            self.bytes.resize(size, 0);
        }
        self
    }

    pub fn write(mut self, offset: usize, data: &[u8]) -> Self {
        let end = offset + data.len();
        if self.bytes.len() < end {
            self.bytes.resize(end, 0);
        }
        self.bytes[offset..end].copy_from_slice(data);
        self
    }

    pub fn write_i32(self, offset: usize, value: i32) -> Self {
        self.write(offset, &value.to_le_bytes())
    }

    pub fn write_u64(self, offset: usize, value: u64) -> Self {
        self.write(offset, &value.to_le_bytes())
    }

    pub fn build(self) -> MemoryRegion {
        MemoryRegion::new(self.base, self.bytes)
    }
}

/// Region provider that counts how often it is asked for memory.
pub struct CountingProvider {
    region: Option<MemoryRegion>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl CountingProvider {
    pub fn new(region: MemoryRegion) -> Self {
        Self {
            region: Some(region),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider whose every request fails
    pub fn failing() -> Self {
        Self {
            region: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering, widening the window for racing callers
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RegionProvider for CountingProvider {
    fn region(&self, module: &str) -> Result<MemoryRegion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.region.clone().ok_or_else(|| Error::RegionUnreadable {
            module: module.to_string(),
            message: "mock provider failure".to_string(),
        })
    }
}
