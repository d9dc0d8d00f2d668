//! Masked signature scanner
//!
//! Candidate starts are compared chunk by chunk: the word at
//! `start + 8 * i` must satisfy `word & mask[i] == value[i]` for every chunk.
//! When the signature has a literal byte, `memchr` jumps straight to the
//! starts where that byte lines up, so most positions are never compared.

mod utils;

use tracing::{debug, trace};

use crate::memory::MemoryRegion;
use crate::memory::layout::chunk;
use crate::offset::CompiledPattern;

use utils::{last_candidate, read_word};

pub struct PatternScanner<'a> {
    pattern: &'a CompiledPattern,
    limit: Option<usize>,
}

impl<'a> PatternScanner<'a> {
    pub fn new(pattern: &'a CompiledPattern) -> Self {
        Self {
            pattern,
            limit: None,
        }
    }

    /// Only consider the first `limit` bytes of any haystack
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Offset of the first match in `haystack`
    pub fn find_first(&self, haystack: &[u8]) -> Option<usize> {
        let haystack = self.bounded(haystack);
        self.candidates(haystack)
            .find(|&start| self.matches_at(haystack, start))
    }

    /// Offsets of every match in `haystack`, in ascending order
    pub fn find_all(&self, haystack: &[u8]) -> Vec<usize> {
        let haystack = self.bounded(haystack);
        self.candidates(haystack)
            .filter(|&start| self.matches_at(haystack, start))
            .collect()
    }

    /// Absolute address of the first match in `region`
    pub fn scan(&self, region: &MemoryRegion) -> Option<u64> {
        debug!(
            "Scanning {:?} for {} ({} chunks)",
            region,
            self.pattern,
            self.pattern.chunks().len()
        );
        let offset = self.find_first(region.bytes())?;
        let address = region.address_at(offset);
        trace!("Match at offset 0x{:X} (0x{:X})", offset, address);
        Some(address)
    }

    /// Absolute addresses of every match in `region`
    pub fn scan_all(&self, region: &MemoryRegion) -> Vec<u64> {
        self.find_all(region.bytes())
            .into_iter()
            .map(|offset| region.address_at(offset))
            .collect()
    }

    fn bounded<'h>(&self, haystack: &'h [u8]) -> &'h [u8] {
        match self.limit {
            Some(limit) if limit < haystack.len() => &haystack[..limit],
            _ => haystack,
        }
    }

    /// Whether every chunk matches at `start`.
    ///
    /// A padded window that would run past the end of the haystack is a
    /// mismatch, never a fault.
    #[inline]
    fn matches_at(&self, haystack: &[u8], start: usize) -> bool {
        self.pattern.chunks().iter().enumerate().all(|(i, expected)| {
            read_word(haystack, start + i * chunk::SIZE)
                .is_some_and(|word| expected.matches(word))
        })
    }

    fn candidates<'h>(&self, haystack: &'h [u8]) -> Box<dyn Iterator<Item = usize> + 'h> {
        let Some(last) = last_candidate(haystack.len(), self.pattern.literal_len()) else {
            return Box::new(std::iter::empty());
        };

        match self.pattern.first_literal() {
            Some((position, byte)) => Box::new(
                memchr::memchr_iter(byte, &haystack[position..])
                    .take_while(move |&start| start <= last),
            ),
            None => Box::new(0..=last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;

    const SAMPLE: &str = "AA BB CC DD ?? ?? ?? ?? AA BB ?? DD";
    const SAMPLE_RUN: [u8; 12] = [
        0xAA, 0xBB, 0xCC, 0xDD, 0x11, 0x22, 0x33, 0x44, 0xAA, 0xBB, 0x55, 0xDD,
    ];

    fn sample() -> CompiledPattern {
        CompiledPattern::compile(SAMPLE).unwrap()
    }

    #[test]
    fn test_finds_run_at_offset() {
        let pattern = sample();
        let scanner = PatternScanner::new(&pattern);

        for k in [0usize, 1, 7, 100] {
            let region = MockMemoryBuilder::new()
                .size(k + 64)
                .write(k, &SAMPLE_RUN)
                .build();
            assert_eq!(scanner.find_first(region.bytes()), Some(k), "offset {}", k);
            assert_eq!(scanner.scan(&region), Some(region.address_at(k)));
        }
    }

    #[test]
    fn test_no_match_without_run() {
        let pattern = sample();
        let mut run = SAMPLE_RUN;
        run[9] = 0xBC;
        let region = MockMemoryBuilder::new().size(64).write(8, &run).build();
        assert_eq!(PatternScanner::new(&pattern).scan(&region), None);
    }

    #[test]
    fn test_returns_first_of_several_matches() {
        let pattern = sample();
        let region = MockMemoryBuilder::new()
            .size(128)
            .write(40, &SAMPLE_RUN)
            .write(3, &SAMPLE_RUN)
            .build();
        let scanner = PatternScanner::new(&pattern);
        assert_eq!(scanner.find_first(region.bytes()), Some(3));
        assert_eq!(scanner.find_all(region.bytes()), vec![3, 40]);
    }

    #[test]
    fn test_padded_window_past_end_is_no_match() {
        let pattern = sample();
        // Literal bytes fit exactly, but the 16-byte padded window does not.
        let region = MockMemoryBuilder::new().write(0, &SAMPLE_RUN).build();
        assert_eq!(region.len(), 12);
        assert_eq!(PatternScanner::new(&pattern).find_first(region.bytes()), None);

        let region = MockMemoryBuilder::new().size(16).write(0, &SAMPLE_RUN).build();
        assert_eq!(PatternScanner::new(&pattern).find_first(region.bytes()), Some(0));

        let region = MockMemoryBuilder::new().size(16).write(4, &SAMPLE_RUN).build();
        assert_eq!(PatternScanner::new(&pattern).find_first(region.bytes()), None);
    }

    #[test]
    fn test_haystack_shorter_than_signature() {
        let pattern = sample();
        assert_eq!(PatternScanner::new(&pattern).find_first(&[0xAA, 0xBB]), None);
        assert!(PatternScanner::new(&pattern).find_all(&[]).is_empty());
    }

    #[test]
    fn test_leading_wildcards_use_first_literal() {
        let pattern = CompiledPattern::compile("?? ?? 8B 05").unwrap();
        let mut haystack = vec![0u8; 32];
        haystack[0] = 0x8B; // too early to be at position 2 of a match
        haystack[10..12].copy_from_slice(&[0x8B, 0x05]);
        assert_eq!(PatternScanner::new(&pattern).find_first(&haystack), Some(8));
    }

    #[test]
    fn test_all_wildcard_signature_matches_start() {
        let pattern = CompiledPattern::compile("?? ??").unwrap();
        assert_eq!(PatternScanner::new(&pattern).find_first(&[0u8; 8]), Some(0));
        assert_eq!(PatternScanner::new(&pattern).find_first(&[0u8; 7]), None);
    }

    #[test]
    fn test_limit_hides_later_matches() {
        let pattern = sample();
        let region = MockMemoryBuilder::new()
            .size(256)
            .write(200, &SAMPLE_RUN)
            .build();

        let limited = PatternScanner::new(&pattern).with_limit(Some(128));
        assert_eq!(limited.find_first(region.bytes()), None);

        let unlimited = PatternScanner::new(&pattern).with_limit(None);
        assert_eq!(unlimited.find_first(region.bytes()), Some(200));
    }

    #[test]
    fn test_scan_all_returns_absolute_addresses() {
        let pattern = CompiledPattern::compile("E8 ?? ?? ?? ??").unwrap();
        let region = MockMemoryBuilder::new()
            .base(0x140001000)
            .size(64)
            .write(0, &[0xE8, 1, 2, 3, 4])
            .write(16, &[0xE8, 5, 6, 7, 8])
            .build();
        assert_eq!(
            PatternScanner::new(&pattern).scan_all(&region),
            vec![0x140001000, 0x140001010]
        );
    }
}
