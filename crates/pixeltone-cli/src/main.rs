//! Pixeltone CLI - offline audio effects, transcription and image sonification
//!
//! Decodes WAV and PNG files, runs them through the Pixeltone engine and
//! writes WAV, JSON or text.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use pixeltone_cli::{commands, input, logging};

/// Pixeltone - pixels and samples, crushed and transformed
#[derive(Parser)]
#[command(name = "pixeltone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log debug diagnostics to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce bit depth and sample rate of a WAV file
    Crush {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Target bit depth (1-16)
        #[arg(long, default_value_t = 8)]
        bits: u8,

        /// Emulated sample rate in Hz
        #[arg(long, default_value_t = 8000)]
        rate: u32,
    },

    /// Apply a voice effect to a WAV file
    Effect {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Effect id (pitch-shift, echo, reverb, chorus, vibrato, bass-boost, robot,
        /// monster, telephone, underwater, old-radio, old-computer, clarity, ai-voice)
        #[arg(short, long)]
        effect: String,

        /// Effect parameter as key=value (repeatable, overrides --params)
        #[arg(long = "param", value_parser = parse_param_arg)]
        params: Vec<(String, f64)>,

        /// JSON file with effect parameters
        #[arg(long = "params")]
        params_file: Option<PathBuf>,
    },

    /// Transcribe a monophonic WAV file into MIDI notes
    Transcribe {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze a WAV file and report loudness, pitch and tempo
    Analyze {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the JSON report instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Derive a sound effect from an image
    ImageSound {
        /// Input image (PNG)
        #[arg(short, long)]
        input: PathBuf,

        /// Render the sound to this WAV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the parameters as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compose a song from an image
    ImageSong {
        /// Input image (PNG)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of steps (1-256)
        #[arg(long, default_value_t = 16)]
        steps: u32,

        /// Render the song to this WAV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the song as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render an image as text glyphs
    GlyphArt {
        /// Input image (PNG)
        #[arg(short, long)]
        input: PathBuf,

        /// Glyphs per row (1-1000)
        #[arg(long, default_value_t = 60)]
        width: u32,
    },

    /// Render an image as square emoji
    EmojiArt {
        /// Input image (PNG)
        #[arg(short, long)]
        input: PathBuf,

        /// Emoji per row (1-1000)
        #[arg(long, default_value_t = 24)]
        width: u32,
    },

    /// List the most common colours of an image
    Palette {
        /// Input image (PNG)
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum number of colours
        #[arg(long, default_value_t = 8)]
        max_colors: usize,

        /// Print the palette as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_param_arg(raw: &str) -> Result<(String, f64), String> {
    input::parse_param(raw).map_err(|e| format!("{:#}", e))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Crush {
            input,
            output,
            bits,
            rate,
        } => commands::crush::run(&input, &output, bits, rate),
        Commands::Effect {
            input,
            output,
            effect,
            params,
            params_file,
        } => commands::effect::run(&input, &output, &effect, &params, params_file.as_deref()),
        Commands::Transcribe { input, json } => commands::transcribe::run(&input, json),
        Commands::Analyze {
            input,
            output,
            json,
        } => commands::analyze::run(&input, output.as_deref(), json),
        Commands::ImageSound {
            input,
            output,
            json,
        } => commands::image::run_sound(&input, output.as_deref(), json),
        Commands::ImageSong {
            input,
            steps,
            output,
            json,
        } => commands::image::run_song(&input, steps, output.as_deref(), json),
        Commands::GlyphArt { input, width } => commands::art::run_glyph(&input, width),
        Commands::EmojiArt { input, width } => commands::art::run_emoji(&input, width),
        Commands::Palette {
            input,
            max_colors,
            json,
        } => commands::art::run_palette(&input, max_colors, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red(), e);
            ExitCode::from(1)
        }
    }
}
