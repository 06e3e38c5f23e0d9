//! Utility functions for formatting and path handling.
//!
//! General-purpose helpers used throughout hevcify-core: duration and byte
//! formatting, ffmpeg timestamp parsing, and compression arithmetic.

use std::path::Path;

use crate::config::SUPPORTED_EXTENSIONS;

/// Whether `path` has one of the supported video extensions (case-insensitive).
/// Does not touch the filesystem.
#[must_use]
pub fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Parses an ffmpeg time string (HH:MM:SS.micro, optionally negative) to seconds.
#[must_use]
pub fn parse_ffmpeg_time(time: &str) -> Option<f64> {
    let (sign, time) = match time.trim().strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, time.trim()),
    };
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() == 3 {
        let hours = parts[0].parse::<f64>().ok()?;
        let minutes = parts[1].parse::<f64>().ok()?;
        let seconds = parts[2].parse::<f64>().ok()?;
        Some(sign * (hours * 3600.0 + minutes * 60.0 + seconds))
    } else {
        None
    }
}

/// Percentage saved going from `original` to `converted` bytes.
///
/// A zero-byte original yields 0.0 rather than dividing by zero. The result
/// is negative when the output grew.
#[must_use]
pub fn compression_percent(original: u64, converted: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - converted as f64) / original as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_video_extension() {
        for name in [
            "a.mp4", "a.MKV", "a.Avi", "a.mov", "a.flv", "a.wmv", "a.webm", "a.m4v", "a.mpg",
            "a.MPEG",
        ] {
            assert!(has_video_extension(Path::new(name)), "{name} should be a video");
        }
        for name in ["a.txt", "a.mp3", "a", "mp4", ".mp4.part", ""] {
            assert!(!has_video_extension(Path::new(name)), "{name} should not be a video");
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.9), "00:00:59");
        assert_eq!(format_duration(3661.0), "01:01:01");
        assert_eq!(format_duration(90061.0), "25:01:01");
        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MiB");
        assert_eq!(format_bytes(1024 * 1024 * 1024 * 2), "2.00 GiB");
    }

    #[test]
    fn test_parse_ffmpeg_time() {
        assert_eq!(parse_ffmpeg_time("00:00:00.000000"), Some(0.0));
        assert_eq!(parse_ffmpeg_time("01:30:45.750000"), Some(5445.75));
        assert_eq!(parse_ffmpeg_time("-00:00:00.500000"), Some(-0.5));
        assert_eq!(parse_ffmpeg_time("N/A"), None);
        assert_eq!(parse_ffmpeg_time("00:00"), None);
        assert_eq!(parse_ffmpeg_time("aa:bb:cc"), None);
    }

    #[test]
    fn test_compression_percent() {
        assert!((compression_percent(1_000_000, 600_000) - 40.0).abs() < 1e-9);
        assert_eq!(compression_percent(100, 100), 0.0);
        assert_eq!(compression_percent(0, 0), 0.0);
        assert_eq!(compression_percent(0, 500), 0.0);
        assert!((compression_percent(100, 150) + 50.0).abs() < 1e-9);
    }
}
