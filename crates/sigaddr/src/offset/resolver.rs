//! Turns a signature match into the address it refers to.
//!
//! ```text
//!  match ──► E8/E9 xx xx xx xx        target = field + 4 + rel32
//!  match ──► .. .. [ptr64]            target = *field
//!                    ▲
//!                    field = match + field_offset
//! ```
//!
//! With `double_pointer` set, one more pointer-sized read is taken at the
//! target.

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tracing::{debug, warn};

use crate::memory::ReadMemory;
use crate::memory::layout::{opcode, pointer};

/// How the field at the match was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
    /// Field holds an absolute pointer
    Absolute,
    /// `CALL rel32`
    RelativeCall,
    /// `JMP rel32`
    RelativeJump,
}

impl ResolutionKind {
    pub fn from_opcode(first_byte: u8) -> Self {
        match first_byte {
            opcode::NEAR_CALL => ResolutionKind::RelativeCall,
            opcode::NEAR_JUMP => ResolutionKind::RelativeJump,
            _ => ResolutionKind::Absolute,
        }
    }

    pub fn is_relative(self) -> bool {
        !matches!(self, ResolutionKind::Absolute)
    }
}

/// A successfully resolved match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub match_address: u64,
    pub field_address: u64,
    pub kind: ResolutionKind,
    pub double_pointer: bool,
    pub address: u64,
}

pub struct AddressResolver<'a, R: ReadMemory + ?Sized> {
    reader: &'a R,
}

impl<'a, R: ReadMemory + ?Sized> AddressResolver<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Resolve the match at `match_address`.
    ///
    /// Returns `None` when a required read fails or a pointer is null; the
    /// failure is logged, not raised.
    pub fn resolve(
        &self,
        match_address: u64,
        field_offset: i64,
        double_pointer: bool,
    ) -> Option<Resolution> {
        let field_address = match_address.wrapping_add_signed(field_offset);

        let first_byte = match self.reader.read_u8(match_address) {
            Ok(b) => b,
            Err(e) => {
                warn!("Cannot read opcode at 0x{:X}: {}", match_address, e);
                return None;
            }
        };
        let kind = ResolutionKind::from_opcode(first_byte);

        let mut address = if kind.is_relative() {
            self.relative_target(field_address)?
        } else {
            self.read_pointer(field_address)?
        };
        debug!(
            "  {} at 0x{:X}: field 0x{:X} -> 0x{:X}",
            kind, match_address, field_address, address
        );

        if double_pointer {
            address = self.read_pointer(address)?;
            debug!("  dereferenced -> 0x{:X}", address);
        }

        Some(Resolution {
            match_address,
            field_address,
            kind,
            double_pointer,
            address,
        })
    }

    /// Target of a rel32 displacement stored at `field_address`
    fn relative_target(&self, field_address: u64) -> Option<u64> {
        match self.reader.read_i32(field_address) {
            Ok(disp) => {
                let next_ip = field_address.wrapping_add(pointer::DISPLACEMENT_SIZE as u64);
                Some(next_ip.wrapping_add_signed(disp as i64))
            }
            Err(e) => {
                warn!("Cannot read displacement at 0x{:X}: {}", field_address, e);
                None
            }
        }
    }

    fn read_pointer(&self, address: u64) -> Option<u64> {
        match self.reader.read_u64(address) {
            Ok(0) => {
                debug!("  Null pointer at 0x{:X}", address);
                None
            }
            Ok(ptr) => Some(ptr),
            Err(e) => {
                warn!("Cannot read pointer at 0x{:X}: {}", address, e);
                None
            }
        }
    }
}
