//! Signature parsing and compilation.
//!
//! A signature such as `"48 8B 05 ?? ?? ?? ??"` is parsed into literal and
//! wildcard bytes, padded with wildcards to a multiple of
//! [`chunk::SIZE`](crate::memory::layout::chunk::SIZE), and folded into
//! little-endian `(value, mask)` words so the scanner can compare eight bytes
//! per AND/compare.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::memory::layout::chunk;

/// Parse a whitespace-separated signature into literal (`Some`) and wildcard
/// (`None`) bytes.
///
/// Literal tokens are exactly two hex digits; `??` and `?` are wildcards.
pub fn parse_pattern(pattern: &str) -> Result<Vec<Option<u8>>> {
    let mut bytes = Vec::new();
    for token in pattern.split_whitespace() {
        if token == "??" || token == "?" {
            bytes.push(None);
            continue;
        }

        if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::invalid_signature(
                pattern,
                format!("invalid token '{}'", token),
            ));
        }

        let value = u8::from_str_radix(token, 16).map_err(|e| {
            Error::invalid_signature(pattern, format!("invalid token '{}': {}", token, e))
        })?;
        bytes.push(Some(value));
    }

    if bytes.is_empty() {
        return Err(Error::invalid_signature(pattern, "signature is empty"));
    }

    Ok(bytes)
}

pub fn format_pattern(bytes: &[Option<u8>]) -> String {
    bytes
        .iter()
        .map(|b| match b {
            Some(value) => format!("{:02X}", value),
            None => "??".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One 8-byte comparison window.
///
/// `value` never has bits set outside `mask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub value: u64,
    pub mask: u64,
}

impl Chunk {
    fn from_window(window: &[Option<u8>]) -> Self {
        let mut value = 0u64;
        let mut mask = 0u64;
        for (i, byte) in window.iter().enumerate() {
            if let Some(b) = byte {
                value |= (*b as u64) << (i * 8);
                mask |= (chunk::LITERAL_MASK as u64) << (i * 8);
            }
        }
        Self { value, mask }
    }

    #[inline]
    pub fn matches(&self, word: u64) -> bool {
        word & self.mask == self.value
    }
}

/// A signature compiled into chunked masked-compare form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    bytes: Vec<Option<u8>>,
    chunks: Vec<Chunk>,
}

impl CompiledPattern {
    pub fn compile(signature: &str) -> Result<Self> {
        let bytes = parse_pattern(signature)?;
        Ok(Self::from_bytes(bytes))
    }

    /// Compile already-parsed bytes. `bytes` must not be empty.
    fn from_bytes(mut bytes: Vec<Option<u8>>) -> Self {
        let literal_len = bytes.len();
        bytes.resize(chunk::count_for(literal_len) * chunk::SIZE, None);

        let chunks = bytes.chunks(chunk::SIZE).map(Chunk::from_window).collect();
        bytes.truncate(literal_len);

        Self { bytes, chunks }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn values(&self) -> Vec<u64> {
        self.chunks.iter().map(|c| c.value).collect()
    }

    pub fn masks(&self) -> Vec<u64> {
        self.chunks.iter().map(|c| c.mask).collect()
    }

    /// Unpadded signature length in bytes
    pub fn literal_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn padded_len(&self) -> usize {
        self.chunks.len() * chunk::SIZE
    }

    /// Parsed bytes before padding
    pub fn bytes(&self) -> &[Option<u8>] {
        &self.bytes
    }

    /// First non-wildcard byte and its position
    pub fn first_literal(&self) -> Option<(usize, u8)> {
        self.bytes
            .iter()
            .enumerate()
            .find_map(|(i, b)| b.map(|value| (i, value)))
    }

    /// Canonical text including the trailing padding wildcards
    pub fn padded_text(&self) -> String {
        let mut text = format_pattern(&self.bytes);
        for _ in self.literal_len()..self.padded_len() {
            text.push_str(" ??");
        }
        text
    }
}

impl FromStr for CompiledPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_pattern(&self.bytes))
    }
}
