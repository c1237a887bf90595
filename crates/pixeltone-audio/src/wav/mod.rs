//! Canonical 16-bit PCM WAV encoder.
//!
//! Output carries no timestamps or variable metadata, so encoding the same
//! buffer twice yields byte-identical files. The BLAKE3 hash of the `data`
//! chunk is kept alongside the bytes for golden comparisons.

mod blob;
mod format;
mod pcm;
mod writer;

#[cfg(test)]
mod tests;

pub use blob::{encode_wav, WavBlob};
pub use format::WavFormat;
pub use pcm::{compute_pcm_hash, extract_pcm_data};
pub use writer::{interleave_pcm16, sample_to_pcm16, write_wav, HEADER_LEN};
