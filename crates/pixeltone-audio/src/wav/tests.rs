//! Tests for the WAV encoder module.

use pretty_assertions::assert_eq;

use super::*;
use crate::buffer::PcmBuffer;
use crate::error::AudioError;

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

// =========================================================================
// Format tests
// =========================================================================

#[test]
fn test_format_mono_and_stereo() {
    let mono = WavFormat::mono(44100);
    assert_eq!(mono.channels, 1);
    assert_eq!(mono.block_align(), 2);
    assert_eq!(mono.byte_rate(), 88200);

    let stereo = WavFormat::stereo(48000);
    assert_eq!(stereo.block_align(), 4);
    assert_eq!(stereo.byte_rate(), 192000);
}

#[test]
fn test_format_many_channels() {
    let format = WavFormat::new(6, 48000);
    assert_eq!(format.block_align(), 12);
    assert_eq!(format.byte_rate(), 576000);
}

// =========================================================================
// Sample conversion tests
// =========================================================================

#[test]
fn test_sample_to_pcm16_asymmetric_scaling() {
    assert_eq!(sample_to_pcm16(0.0), 0);
    assert_eq!(sample_to_pcm16(1.0), 32767);
    assert_eq!(sample_to_pcm16(-1.0), -32768);
    assert_eq!(sample_to_pcm16(0.5), 16384); // 16383.5 rounds away from zero
    assert_eq!(sample_to_pcm16(-0.5), -16384);
}

#[test]
fn test_sample_to_pcm16_clips() {
    assert_eq!(sample_to_pcm16(3.0), 32767);
    assert_eq!(sample_to_pcm16(-3.0), -32768);
    assert_eq!(sample_to_pcm16(f32::NAN), 0);
}

#[test]
fn test_interleave_orders_frames() {
    let buffer = PcmBuffer::new(8000, vec![vec![1.0, 0.0], vec![-1.0, 0.5]]).unwrap();
    let pcm = interleave_pcm16(&buffer);
    let values: Vec<i16> = pcm
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect();
    assert_eq!(values, vec![32767, -32768, 0, 16384]);
}

// =========================================================================
// Header tests
// =========================================================================

#[test]
fn test_header_layout() {
    let buffer = PcmBuffer::new(22050, vec![vec![0.0; 100], vec![0.0; 100]]).unwrap();
    let blob = encode_wav(&buffer).unwrap();
    let bytes = blob.bytes();

    assert_eq!(bytes.len(), HEADER_LEN + 400);
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(read_u32(bytes, 4), 36 + 400);
    assert_eq!(&bytes[8..12], b"WAVE");
    assert_eq!(&bytes[12..16], b"fmt ");
    assert_eq!(read_u32(bytes, 16), 16);
    assert_eq!(read_u16(bytes, 20), 1);
    assert_eq!(read_u16(bytes, 22), 2);
    assert_eq!(read_u32(bytes, 24), 22050);
    assert_eq!(read_u32(bytes, 28), 22050 * 4);
    assert_eq!(read_u16(bytes, 32), 4);
    assert_eq!(read_u16(bytes, 34), 16);
    assert_eq!(&bytes[36..40], b"data");
    assert_eq!(read_u32(bytes, 40), 400);
}

#[test]
fn test_blob_metadata() {
    let buffer = PcmBuffer::mono(44100, vec![0.25; 44100]).unwrap();
    let blob = encode_wav(&buffer).unwrap();
    assert_eq!(blob.channels(), 1);
    assert_eq!(blob.sample_rate(), 44100);
    assert_eq!(blob.num_frames(), 44100);
    assert!((blob.duration_seconds() - 1.0).abs() < 1e-12);
    assert_eq!(blob.pcm_hash().len(), 64);
}

#[test]
fn test_empty_buffer_is_rejected() {
    let buffer = PcmBuffer::mono(44100, vec![]).unwrap();
    assert_eq!(encode_wav(&buffer), Err(AudioError::EmptyBuffer));
}

// =========================================================================
// PCM extraction and hashing
// =========================================================================

#[test]
fn test_extract_pcm_data_matches_payload() {
    let buffer = PcmBuffer::mono(8000, vec![0.1, -0.2, 0.3]).unwrap();
    let blob = encode_wav(&buffer).unwrap();
    let pcm = extract_pcm_data(blob.bytes()).unwrap();
    assert_eq!(pcm, interleave_pcm16(&buffer).as_slice());
    assert_eq!(compute_pcm_hash(blob.bytes()).unwrap(), blob.pcm_hash());
}

#[test]
fn test_extract_pcm_data_skips_unknown_chunks() {
    let format = WavFormat::mono(8000);
    let mut plain = Vec::new();
    write_wav(&mut plain, &format, &[1, 0, 2, 0]).unwrap();

    // Splice an odd-sized LIST chunk between fmt and data
    let mut spliced = plain[..36].to_vec();
    spliced.extend_from_slice(b"LIST");
    spliced.extend_from_slice(&3u32.to_le_bytes());
    spliced.extend_from_slice(&[9, 9, 9, 0]);
    spliced.extend_from_slice(&plain[36..]);

    assert_eq!(extract_pcm_data(&spliced).unwrap(), &[1, 0, 2, 0]);
}

#[test]
fn test_extract_pcm_data_rejects_garbage() {
    assert!(extract_pcm_data(b"not a wav file at all").is_none());
    assert!(extract_pcm_data(&[]).is_none());
}

#[test]
fn test_encoding_is_deterministic() {
    let samples: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.05).sin() * 0.7).collect();
    let buffer = PcmBuffer::mono(44100, samples).unwrap();
    let a = encode_wav(&buffer).unwrap();
    let b = encode_wav(&buffer).unwrap();
    assert_eq!(a, b);
}
