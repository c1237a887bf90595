//! Effect command implementation

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use pixeltone_audio::{apply_voice_effect_by_id, EffectParameters};

use super::output::{print_input, print_written};
use crate::input::{read_params, read_wav, write_wav};

/// Builds the parameter map: file values first, then `--param` overrides.
pub fn collect_params(
    params_file: Option<&Path>,
    overrides: &[(String, f64)],
) -> Result<EffectParameters> {
    let mut params = match params_file {
        Some(path) => read_params(path)?,
        None => EffectParameters::new(),
    };
    for (name, value) in overrides {
        params.set(name.clone(), *value);
    }
    Ok(params)
}

/// Run the effect command
///
/// # Arguments
/// * `input` - WAV file to read
/// * `output` - WAV file to write
/// * `effect` - Effect id, e.g. `echo`
/// * `overrides` - `--param` values
/// * `params_file` - Optional JSON object of parameters
pub fn run(
    input: &Path,
    output: &Path,
    effect: &str,
    overrides: &[(String, f64)],
    params_file: Option<&Path>,
) -> Result<ExitCode> {
    let params = collect_params(params_file, overrides)?;
    let buffer = read_wav(input)?;
    print_input(input, &buffer);
    println!("{} {}", "Effect:".cyan().bold(), effect);
    for (name, value) in params.iter() {
        println!("  {} = {}", name.dimmed(), value);
    }

    let processed = apply_voice_effect_by_id(&buffer, effect, &params)
        .with_context(|| format!("Effect '{}' failed", effect))?;
    let blob = write_wav(output, &processed)?;
    print_written(output, &blob);

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{"delayTime": 0.5, "feedback": 0.2}"#).unwrap();

        let params =
            collect_params(Some(&path), &[("feedback".to_string(), 0.6)]).unwrap();
        assert_eq!(params.get("delayTime"), Some(0.5));
        assert_eq!(params.get("feedback"), Some(0.6));
    }

    #[test]
    fn test_bad_params_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{"delayTime": "long"}"#).unwrap();
        assert!(collect_params(Some(&path), &[]).is_err());
    }
}
