//! Crush command implementation

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use pixeltone_audio::apply_bitcrusher;

use super::output::{print_input, print_written};
use crate::input::{read_wav, write_wav};

/// Run the crush command
///
/// # Arguments
/// * `input` - WAV file to read
/// * `output` - WAV file to write
/// * `bits` - Target bit depth (1-16)
/// * `rate` - Emulated sample rate in Hz
pub fn run(input: &Path, output: &Path, bits: u8, rate: u32) -> Result<ExitCode> {
    let buffer = read_wav(input)?;
    print_input(input, &buffer);

    let crushed = apply_bitcrusher(&buffer, bits, rate).context("Bitcrush failed")?;
    let blob = write_wav(output, &crushed)?;
    print_written(output, &blob);

    Ok(ExitCode::SUCCESS)
}
