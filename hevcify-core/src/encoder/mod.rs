// ============================================================================
// hevcify-core/src/encoder/mod.rs
// ============================================================================
//
// ENCODERS: Identification, detection, selection, and parameter profiles
//
// KEY COMPONENTS:
// - EncoderId: closed set of HEVC encoders hevcify knows how to drive
// - capabilities: asks ffmpeg which of them are compiled in
// - selector: picks one by fixed priority
// - profiles: static ffmpeg argument table per encoder
//
// AI-ASSISTANT-INFO: Encoder identity, availability probing, and parameter tables

use std::fmt;

pub mod capabilities;
pub mod profiles;
pub mod selector;

pub use capabilities::{EncoderAvailability, parse_encoder_listing, probe_available_encoders};
pub use profiles::{EncoderProfile, profile, profile_for_token};
pub use selector::{ENCODER_PRIORITY, select_encoder};

/// An HEVC encoder exposed by ffmpeg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EncoderId {
    /// Apple VideoToolbox (macOS)
    VideoToolbox,
    /// NVIDIA NVENC
    Nvenc,
    /// Intel Quick Sync Video
    QuickSync,
    /// AMD Advanced Media Framework
    Amf,
    /// libx265 software encoder, always the fallback
    Libx265,
}

impl EncoderId {
    /// Every known encoder, in declaration order.
    pub const ALL: [EncoderId; 5] = [
        EncoderId::VideoToolbox,
        EncoderId::Nvenc,
        EncoderId::QuickSync,
        EncoderId::Amf,
        EncoderId::Libx265,
    ];

    /// The ffmpeg encoder name, as listed by `ffmpeg -encoders`.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            EncoderId::VideoToolbox => "hevc_videotoolbox",
            EncoderId::Nvenc => "hevc_nvenc",
            EncoderId::QuickSync => "hevc_qsv",
            EncoderId::Amf => "hevc_amf",
            EncoderId::Libx265 => "libx265",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            EncoderId::VideoToolbox => "Apple VideoToolbox",
            EncoderId::Nvenc => "NVIDIA NVENC",
            EncoderId::QuickSync => "Intel Quick Sync",
            EncoderId::Amf => "AMD AMF",
            EncoderId::Libx265 => "Software (CPU)",
        }
    }

    #[must_use]
    pub const fn is_hardware(self) -> bool {
        !matches!(self, EncoderId::Libx265)
    }

    /// Parses an ffmpeg encoder name (case-insensitive).
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.token().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for EncoderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
