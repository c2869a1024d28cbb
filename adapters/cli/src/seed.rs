//! Derivation of generator seeds from free-form seed phrases.

use sha2::{Digest, Sha256};

/// Hashes `phrase` into the 64-bit seed fed to the spawn generator.
///
/// Phrases that parse as an unsigned integer are used verbatim so that seeds
/// printed by earlier runs can be replayed.
pub(crate) fn seed_from_phrase(phrase: &str) -> u64 {
    if let Ok(seed) = phrase.trim().parse::<u64>() {
        return seed;
    }

    let mut hasher = Sha256::new();
    hasher.update(phrase.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
