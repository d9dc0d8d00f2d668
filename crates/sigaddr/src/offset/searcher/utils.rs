//! Utility functions for pattern scanning

use crate::memory::layout::chunk;

/// Load the little-endian word starting at `offset`, or `None` if the
/// window does not fit in `haystack`
#[inline]
pub fn read_word(haystack: &[u8], offset: usize) -> Option<u64> {
    let end = offset.checked_add(chunk::SIZE)?;
    let window: [u8; chunk::SIZE] = haystack.get(offset..end)?.try_into().ok()?;
    Some(u64::from_le_bytes(window))
}

/// Last start offset at which `needle_len` bytes still fit in `haystack_len`
#[inline]
pub fn last_candidate(haystack_len: usize, needle_len: usize) -> Option<usize> {
    haystack_len.checked_sub(needle_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_word() {
        let bytes = [1, 0, 0, 0, 0, 0, 0, 0, 2];
        assert_eq!(read_word(&bytes, 0), Some(1));
        assert_eq!(read_word(&bytes, 1), Some(0x0200000000000000));
        assert_eq!(read_word(&bytes, 2), None);
        assert_eq!(read_word(&bytes, usize::MAX), None);
    }

    #[test]
    fn test_last_candidate() {
        assert_eq!(last_candidate(16, 12), Some(4));
        assert_eq!(last_candidate(12, 12), Some(0));
        assert_eq!(last_candidate(11, 12), None);
    }
}
