// hevcify-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use hevcify_core::EncoderId;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Hevcify: batch HEVC converter",
    long_about = "Converts every video in a directory to HEVC (H.265) using the best \
                  available hardware encoder, replacing the originals in place."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl Cli {
    /// The subcommand to run; a bare `hevcify` behaves like `hevcify convert`.
    #[must_use]
    pub fn command_or_default(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Convert(ConvertArgs::default()))
    }
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// ffmpeg executable to use
    #[arg(long, global = true, value_name = "PATH", env = "HEVCIFY_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// ffprobe executable to use
    #[arg(long, global = true, value_name = "PATH", env = "HEVCIFY_FFPROBE", default_value = "ffprobe")]
    pub ffprobe: PathBuf,

    /// Enable debug output, including ffmpeg diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Optional: Directory for a run log file
    #[arg(long, global = true, value_name = "LOG_DIR", env = "HEVCIFY_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Converts the videos in a directory to HEVC, replacing the originals
    Convert(ConvertArgs),
    /// Lists the HEVC encoders ffmpeg offers and the one that would be used
    Encoders,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConvertArgs {
    /// Directory containing the videos (prompted for when omitted)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Use this encoder instead of automatic selection (e.g. hevc_nvenc, libx265)
    #[arg(long, value_name = "ENCODER", env = "HEVCIFY_ENCODER", value_parser = parse_encoder)]
    pub encoder: Option<EncoderId>,
}

fn parse_encoder(token: &str) -> Result<EncoderId, String> {
    EncoderId::from_token(token).ok_or_else(|| {
        let known: Vec<&str> = EncoderId::ALL.iter().map(|id| id.token()).collect();
        format!("unknown encoder '{token}' (expected one of: {})", known.join(", "))
    })
}
