//! Content digest used to derive object ids.
//!
//! minigit deliberately does not reach for a cryptographic hash: the data
//! model only needs a short, stable, collision-tolerant fingerprint (see
//! `Non-goals: ... cryptographic-strength hashing` in the object model).
//! Two independent multiplicative rolling hashes are combined into a
//! 128-bit fingerprint to keep accidental collisions unlikely in practice
//! without pulling in a hashing crate.

const PRIME_A: u64 = 1_099_511_628_211; // FNV prime
const SEED_A: u64 = 0xcbf29ce484222325; // FNV offset basis
const PRIME_B: u64 = 1_000_000_007;
const SEED_B: u64 = 0x9e3779b97f4a7c15; // golden ratio constant

fn rolling(bytes: &[u8], seed: u64, prime: u64) -> u64 {
    let mut h = seed;
    for &b in bytes {
        h = h.wrapping_mul(prime) ^ (b as u64).wrapping_add(1);
    }
    h
}

/// Computes the digest of `bytes` as a lowercase hex string.
///
/// Same input always yields the same digest; the output matches `[0-9a-f]+`
/// and is never empty.
pub fn digest(bytes: &[u8]) -> String {
    let a = rolling(bytes, SEED_A, PRIME_A);
    let b = rolling(bytes, SEED_B, PRIME_B);
    format!("{:016x}{:016x}", a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(digest(b"hello\n"), digest(b"hello\n"));
    }

    #[test]
    fn sensitive_to_content() {
        assert_ne!(digest(b"hello\n"), digest(b"world\n"));
    }

    #[test]
    fn hex_shape() {
        let d = digest(b"anything at all");
        assert!(!d.is_empty());
        assert!(d.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    #[test]
    fn empty_input_is_stable() {
        assert_eq!(digest(b""), digest(b""));
        assert!(!digest(b"").is_empty());
    }
}
