//! Constant-time comparison of secret material.
//!
//! Both sides are reduced to a SHA-256 digest first, so the final `ct_eq`
//! always runs over 32 bytes regardless of what the client sent. Neither the
//! position of the first differing byte nor a length difference changes the
//! amount of work done in the comparison itself.

use sha2::{Digest, Sha256};
use subtle::{Choice, ConstantTimeEq};

fn digest(bytes: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(bytes));
    out
}

/// Compare two byte strings without early exit.
///
/// Returns a `Choice` so callers can combine several comparisons (e.g. the
/// Basic username *and* password) without branching on the first result.
pub fn ct_eq(presented: &[u8], expected: &[u8]) -> Choice {
    digest(presented)[..].ct_eq(&digest(expected)[..])
}
