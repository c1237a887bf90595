//! Integration tests for the `pixeltone` binary.
//!
//! Each test writes its inputs into a temporary directory, runs the binary
//! and checks the files and stdout it produces.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pixeltone_audio::{encode_wav, PcmBuffer};
use pixeltone_cli::input::read_wav;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn pixeltone(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pixeltone"))
        .args(args)
        .output()
        .expect("Failed to execute pixeltone")
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn write_sine(dir: &Path, freq: f32, seconds: f32) -> PathBuf {
    let rate = 44100;
    let len = (seconds * rate as f32) as usize;
    let samples = (0..len)
        .map(|i| (std::f32::consts::TAU * freq * i as f32 / rate as f32).sin() * 0.5)
        .collect();
    let buffer = PcmBuffer::mono(rate, samples).unwrap();
    let path = dir.join("sine.wav");
    fs::write(&path, encode_wav(&buffer).unwrap().bytes()).unwrap();
    path
}

fn write_png(dir: &Path) -> PathBuf {
    let image = image::RgbaImage::from_fn(32, 16, |x, y| {
        image::Rgba([(x * 8) as u8, (y * 16) as u8, 200, 255])
    });
    let path = dir.join("card.png");
    image.save(&path).unwrap();
    path
}

#[test]
fn test_crush_writes_same_length() {
    let tmp = tempdir().unwrap();
    let input = write_sine(tmp.path(), 440.0, 0.25);
    let output = tmp.path().join("crushed.wav");

    let result = pixeltone(&[
        "crush",
        "-i",
        path_str(&input),
        "-o",
        path_str(&output),
        "--bits",
        "4",
        "--rate",
        "11025",
    ]);
    assert!(result.status.success(), "{:?}", result);

    let original = read_wav(&input).unwrap();
    let crushed = read_wav(&output).unwrap();
    assert_eq!(crushed.len(), original.len());
    assert_eq!(crushed.sample_rate(), 44100);
}

#[test]
fn test_effect_with_params_file_and_override() {
    let tmp = tempdir().unwrap();
    let input = write_sine(tmp.path(), 220.0, 0.25);
    let output = tmp.path().join("echo.wav");
    let params = tmp.path().join("params.json");
    fs::write(&params, r#"{"delayTime": 0.05, "feedback": 0.3}"#).unwrap();

    let result = pixeltone(&[
        "effect",
        "-i",
        path_str(&input),
        "-o",
        path_str(&output),
        "--effect",
        "echo",
        "--params",
        path_str(&params),
        "--param",
        "feedback=0.6",
    ]);
    assert!(result.status.success(), "{:?}", result);
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("0.6"), "{}", stdout);
    assert!(output.exists());
}

#[test]
fn test_unknown_effect_fails() {
    let tmp = tempdir().unwrap();
    let input = write_sine(tmp.path(), 220.0, 0.1);
    let output = tmp.path().join("out.wav");

    let result = pixeltone(&[
        "effect",
        "-i",
        path_str(&input),
        "-o",
        path_str(&output),
        "--effect",
        "kazoo",
    ]);
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("kazoo"), "{}", stderr);
    assert!(!output.exists());
}

#[test]
fn test_transcribe_json() {
    let tmp = tempdir().unwrap();
    let input = write_sine(tmp.path(), 440.0, 1.0);

    let result = pixeltone(&["transcribe", "-i", path_str(&input), "--json"]);
    assert!(result.status.success(), "{:?}", result);
    let notes: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    let notes = notes.as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["pitch"], 69);
    assert!(notes[0].get("startTime").is_some());
}

#[test]
fn test_analyze_writes_report() {
    let tmp = tempdir().unwrap();
    let input = write_sine(tmp.path(), 440.0, 0.5);
    let report = tmp.path().join("report.json");

    let result = pixeltone(&["analyze", "-i", path_str(&input), "-o", path_str(&report)]);
    assert!(result.status.success(), "{:?}", result);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["estimatedPitch"], "A4");
    assert!(json["peakLoudness"].as_f64().unwrap() < -5.0);
}

#[test]
fn test_missing_input_fails() {
    let result = pixeltone(&["analyze", "-i", "/definitely/not/here.wav"]);
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("error"));
}

#[test]
fn test_image_commands() {
    let tmp = tempdir().unwrap();
    let png = write_png(tmp.path());
    let sound = tmp.path().join("sound.wav");
    let song = tmp.path().join("song.wav");

    let result = pixeltone(&[
        "image-sound",
        "-i",
        path_str(&png),
        "-o",
        path_str(&sound),
        "--json",
    ]);
    assert!(result.status.success(), "{:?}", result);
    let params: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert!(params["type"].is_string());
    assert!(!read_wav(&sound).unwrap().is_empty());

    let result = pixeltone(&[
        "image-song",
        "-i",
        path_str(&png),
        "--steps",
        "8",
        "-o",
        path_str(&song),
    ]);
    assert!(result.status.success(), "{:?}", result);
    assert!(song.exists());

    let result = pixeltone(&["image-song", "-i", path_str(&png), "--steps", "0"]);
    assert_eq!(result.status.code(), Some(1));
}

#[test]
fn test_art_commands() {
    let tmp = tempdir().unwrap();
    let png = write_png(tmp.path());

    let result = pixeltone(&["glyph-art", "-i", path_str(&png), "--width", "16"]);
    assert!(result.status.success(), "{:?}", result);
    let stdout = String::from_utf8_lossy(&result.stdout);
    // 32x16 at 16 columns with half-height glyph cells
    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.lines().all(|l| l.chars().count() == 16));

    let result = pixeltone(&["emoji-art", "-i", path_str(&png), "--width", "8"]);
    assert!(result.status.success(), "{:?}", result);
    assert_eq!(String::from_utf8_lossy(&result.stdout).lines().count(), 4);

    let result = pixeltone(&["palette", "-i", path_str(&png), "--max-colors", "3", "--json"]);
    assert!(result.status.success(), "{:?}", result);
    let palette: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(palette.as_array().unwrap().len(), 3);
}
