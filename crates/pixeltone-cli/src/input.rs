//! File decoding and encoding at the edge of the core crates.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use hound::SampleFormat;
use pixeltone_audio::{encode_wav, EffectParameters, PcmBuffer, WavBlob};
use pixeltone_image::PixelBuffer;
use tracing::debug;

/// Decodes a WAV stream (integer 8-32 bit or float) into a buffer.
///
/// Integer samples are scaled by `1 / 2^(bits - 1)`.
pub fn decode_wav<R: Read>(source: R) -> Result<PcmBuffer> {
    let mut reader = hound::WavReader::new(source).context("Not a readable WAV stream")?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .context("Failed to decode float samples")?,
        SampleFormat::Int => {
            if !(8..=32).contains(&spec.bits_per_sample) {
                bail!("Unsupported WAV bit depth: {}", spec.bits_per_sample);
            }
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|v| (v as f64 * scale) as f32))
                .collect::<Result<_, _>>()
                .context("Failed to decode integer samples")?
        }
    };

    debug!(
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        samples = interleaved.len(),
        "decoded WAV"
    );
    Ok(PcmBuffer::from_interleaved(
        spec.sample_rate,
        spec.channels as usize,
        &interleaved,
    )?)
}

/// Reads and decodes a WAV file.
pub fn read_wav(path: &Path) -> Result<PcmBuffer> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    decode_wav(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to decode WAV file: {}", path.display()))
}

/// Encodes a buffer and writes it as a 16-bit WAV file.
pub fn write_wav(path: &Path, buffer: &PcmBuffer) -> Result<WavBlob> {
    let blob = encode_wav(buffer).context("Failed to encode WAV")?;
    fs::write(path, blob.bytes())
        .with_context(|| format!("Failed to write WAV file: {}", path.display()))?;
    Ok(blob)
}

/// Decodes image bytes (PNG) into an RGBA buffer.
pub fn decode_image(data: &[u8]) -> Result<PixelBuffer> {
    let decoded = image::load_from_memory(data).context("Not a decodable image")?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!(width, height, "decoded image");
    Ok(PixelBuffer::new(width, height, rgba.into_raw())?)
}

/// Reads and decodes an image file.
pub fn read_image(path: &Path) -> Result<PixelBuffer> {
    let data =
        fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))?;
    decode_image(&data).with_context(|| format!("Failed to decode image: {}", path.display()))
}

/// Parses a `key=value` effect parameter.
pub fn parse_param(raw: &str) -> Result<(String, f64)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("Expected key=value, got '{}'", raw);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Parameter name is empty in '{}'", raw);
    }
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("Parameter '{}' is not a number", key))?;
    Ok((key.to_string(), value))
}

/// Loads a JSON object of numeric effect parameters.
pub fn read_params(path: &Path) -> Result<EffectParameters> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid parameter file: {}", path.display()))
}
