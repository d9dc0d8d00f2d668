//! Layout constants for compiled signatures and x86-64 instruction decoding
//!
//! This module centralizes the widths and opcodes the scanner and resolver
//! depend on.

/// Compiled pattern layout
pub mod chunk {
    /// Width of one comparison window in bytes
    pub const SIZE: usize = 8;

    /// Mask byte marking a literal position
    pub const LITERAL_MASK: u8 = 0xFF;

    /// Number of chunks needed to cover `len` literal bytes
    pub const fn count_for(len: usize) -> usize {
        len.div_ceil(SIZE)
    }
}

/// Target machine widths
pub mod pointer {
    /// Size of an absolute pointer (x86-64)
    pub const SIZE: usize = 8;

    /// Size of a rel32 displacement
    pub const DISPLACEMENT_SIZE: usize = 4;
}

/// Single-byte x86 opcodes recognized by the resolver
pub mod opcode {
    /// CALL rel32
    pub const NEAR_CALL: u8 = 0xE8;

    /// JMP rel32
    pub const NEAR_JUMP: u8 = 0xE9;
}
