use crate::error::{Error, Result};
use crate::memory::layout::pointer;

/// Read access to memory at absolute addresses.
///
/// Implementors only provide [`read_bytes`](ReadMemory::read_bytes); the typed
/// readers decode little-endian values on top of it.
pub trait ReadMemory {
    /// Address the readable memory starts at
    fn base_address(&self) -> u64;

    /// Read `size` bytes starting at `address`
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    fn read_u8(&self, address: u64) -> Result<u8> {
        let bytes = self.read_bytes(address, 1)?;
        bytes.first().copied().ok_or_else(|| short_read(address, 1, 0))
    }

    fn read_i32(&self, address: u64) -> Result<i32> {
        let bytes = self.read_bytes(address, pointer::DISPLACEMENT_SIZE)?;
        let array: [u8; 4] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| short_read(address, pointer::DISPLACEMENT_SIZE, bytes.len()))?;
        Ok(i32::from_le_bytes(array))
    }

    fn read_u64(&self, address: u64) -> Result<u64> {
        let bytes = self.read_bytes(address, pointer::SIZE)?;
        let array: [u8; pointer::SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| short_read(address, pointer::SIZE, bytes.len()))?;
        Ok(u64::from_le_bytes(array))
    }
}

fn short_read(address: u64, expected: usize, actual: usize) -> Error {
    Error::MemoryReadFailed {
        address,
        message: format!("expected {} bytes, got {}", expected, actual),
    }
}
