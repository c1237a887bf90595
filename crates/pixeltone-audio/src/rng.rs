//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! Effects that add noise (hiss, quantisation dither) draw from streams
//! seeded here so identical input always yields identical output.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Base seed for engine-internal noise streams.
pub const ENGINE_SEED: u32 = 0x5049_5854;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The seed is duplicated into both halves of the 64-bit PCG state.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derives an independent seed for a named component and channel.
///
/// Hashes the base seed, the channel index and the key with BLAKE3 and keeps
/// the first four bytes.
pub fn derive_seed(base_seed: u32, key: &str, channel: usize) -> u32 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&base_seed.to_le_bytes());
    hasher.update(&(channel as u64).to_le_bytes());
    hasher.update(key.as_bytes());
    let hash = hasher.finalize();
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
