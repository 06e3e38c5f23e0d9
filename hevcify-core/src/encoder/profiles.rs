//! Static ffmpeg parameter profiles, one per encoder.
//!
//! Hardware paths encode audio to AAC at 128 kbit/s; the software path
//! uses Opus, which holds quality at a lower bitrate.

use super::EncoderId;

/// The ffmpeg arguments used to drive one encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderProfile {
    pub id: EncoderId,
    pub display_name: &'static str,
    pub video_args: &'static [&'static str],
    pub audio_args: &'static [&'static str],
}

impl EncoderProfile {
    /// Video arguments followed by audio arguments.
    pub fn codec_args(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.video_args.iter().chain(self.audio_args).copied()
    }
}

const AAC_128K: &[&str] = &["-c:a", "aac", "-b:a", "128k"];

#[rustfmt::skip]
static NVENC: EncoderProfile = EncoderProfile {
    id: EncoderId::Nvenc,
    display_name: EncoderId::Nvenc.display_name(),
    video_args: &[
        "-c:v", "hevc_nvenc",
        "-preset", "p7",
        "-rc", "vbr",
        "-cq", "22",
        "-b:v", "0",
        "-spatial_aq", "1",
        "-temporal_aq", "1",
    ],
    audio_args: AAC_128K,
};

#[rustfmt::skip]
static QUICK_SYNC: EncoderProfile = EncoderProfile {
    id: EncoderId::QuickSync,
    display_name: EncoderId::QuickSync.display_name(),
    video_args: &[
        "-c:v", "hevc_qsv",
        "-preset", "slow",
        "-global_quality", "22",
        "-look_ahead", "1",
    ],
    audio_args: AAC_128K,
};

#[rustfmt::skip]
static AMF: EncoderProfile = EncoderProfile {
    id: EncoderId::Amf,
    display_name: EncoderId::Amf.display_name(),
    video_args: &[
        "-c:v", "hevc_amf",
        "-quality", "quality",
        "-rc", "cqp",
        "-qp_i", "22",
        "-qp_p", "22",
    ],
    audio_args: AAC_128K,
};

// hvc1 tag keeps the output playable in QuickTime.
static VIDEOTOOLBOX: EncoderProfile = EncoderProfile {
    id: EncoderId::VideoToolbox,
    display_name: EncoderId::VideoToolbox.display_name(),
    video_args: &["-c:v", "hevc_videotoolbox", "-q:v", "60", "-tag:v", "hvc1"],
    audio_args: &["-c:a", "aac", "-b:a", "128k", "-ac", "2"],
};

#[rustfmt::skip]
static LIBX265: EncoderProfile = EncoderProfile {
    id: EncoderId::Libx265,
    display_name: EncoderId::Libx265.display_name(),
    video_args: &["-c:v", "libx265", "-crf", "22", "-preset", "slow"],
    audio_args: &[
        "-c:a", "libopus",
        "-b:a", "96k",
        "-vbr", "on",
        "-compression_level", "10",
    ],
};

/// Looks up the profile for an encoder. Total over [`EncoderId`].
#[must_use]
pub fn profile(id: EncoderId) -> &'static EncoderProfile {
    match id {
        EncoderId::VideoToolbox => &VIDEOTOOLBOX,
        EncoderId::Nvenc => &NVENC,
        EncoderId::QuickSync => &QUICK_SYNC,
        EncoderId::Amf => &AMF,
        EncoderId::Libx265 => &LIBX265,
    }
}

/// Looks up a profile by ffmpeg encoder name. `None` for unknown names.
#[must_use]
pub fn profile_for_token(token: &str) -> Option<&'static EncoderProfile> {
    EncoderId::from_token(token).map(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{EncoderAvailability, select_encoder};

    #[test]
    fn test_profile_lookup_is_total_and_consistent() {
        for id in EncoderId::ALL {
            let p = profile(id);
            assert_eq!(p.id, id);
            assert_eq!(p.display_name, id.display_name());
            // The video codec argument names the encoder itself.
            let codec_pos = p.video_args.iter().position(|&a| a == "-c:v").unwrap();
            assert_eq!(p.video_args[codec_pos + 1], id.token());
            assert!(p.audio_args.contains(&"-c:a"));
        }
    }

    #[test]
    fn test_every_selectable_encoder_has_profile() {
        for id in EncoderId::ALL {
            let availability: EncoderAvailability = [(id, true)].into_iter().collect();
            let (selected, _) = select_encoder(&availability);
            assert_eq!(profile(selected).id, selected);
        }
    }

    #[test]
    fn test_audio_codec_per_path() {
        for id in EncoderId::ALL {
            let audio = profile(id).audio_args;
            if id.is_hardware() {
                assert_eq!(&audio[..4], &["-c:a", "aac", "-b:a", "128k"]);
            } else {
                assert_eq!(&audio[..2], &["-c:a", "libopus"]);
            }
        }
    }

    #[test]
    fn test_profile_for_token() {
        assert_eq!(profile_for_token("hevc_qsv").map(|p| p.id), Some(EncoderId::QuickSync));
        assert!(profile_for_token("mpeg4").is_none());
    }

    #[test]
    fn test_codec_args_orders_video_before_audio() {
        let args: Vec<_> = profile(EncoderId::Libx265).codec_args().collect();
        assert_eq!(args.first(), Some(&"-c:v"));
        let audio_start = args.iter().position(|&a| a == "-c:a").unwrap();
        assert_eq!(audio_start, profile(EncoderId::Libx265).video_args.len());
    }
}
