//! Hash functions for the associative store.
//!
//! Each key kind gets its own hashing strategy, fixed at store creation:
//! Knuth's multiplicative bit-mix for integer and address keys, and a
//! DJB2 rolling hash over raw bytes for string keys.

use super::Key;

/// Knuth's multiplicative constant (2654435761).
const HASH_KNUTH: u64 = 0x9E37_79B1;

/// DJB2 rolling hash over a byte string.
#[inline]
pub fn djb2(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &c in bytes {
        // hash * 33 + c
        hash = (hash << 5).wrapping_add(hash).wrapping_add(c as u64);
    }
    hash
}

/// Hash origin for a key, before probing.
#[inline]
pub fn origin(key: &Key) -> u64 {
    match key {
        Key::Int(k) => (*k as u64).wrapping_mul(HASH_KNUTH),
        Key::Addr(a) => (*a as u64).wrapping_mul(HASH_KNUTH),
        Key::Str(s) => djb2(s.as_bytes()),
    }
}

/// Candidate bucket for probe step `i`: `(hash(key) + i) % capacity`.
#[inline]
pub fn bucket(key: &Key, capacity: usize, step: usize) -> usize {
    debug_assert!(capacity > 0);
    ((origin(key).wrapping_add(step as u64)) % capacity as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_djb2_known_values() {
        // djb2("") is the seed
        assert_eq!(djb2(b""), 5381);
        // hand-computed: 5381 * 33 + 'a'
        assert_eq!(djb2(b"a"), 5381 * 33 + b'a' as u64);
    }

    #[test]
    fn test_probe_sequence_wraps() {
        let key = Key::str("cat");
        let first = bucket(&key, 8, 0);
        let next = bucket(&key, 8, 1);
        assert_eq!((first + 1) % 8, next);
    }

    #[test]
    fn test_int_and_addr_hashes_differ_from_raw() {
        // The bit-mix must actually scramble small integers
        assert_ne!(origin(&Key::int(1)), 1);
        assert_ne!(origin(&Key::addr(1)), 1);
    }
}
