//! Hardware encoder detection.
//!
//! Runs `ffmpeg -hide_banner -encoders` and checks its listing for the
//! encoder names in [`EncoderId::ALL`]. Detection never fails: when ffmpeg
//! cannot be run or reports an error, only the software encoder is
//! considered available so the batch can still proceed.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, warn};

use super::EncoderId;

/// Which encoders ffmpeg reports as compiled in.
///
/// Encoders missing from the map are treated as unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderAvailability {
    entries: BTreeMap<EncoderId, bool>,
}

impl EncoderAvailability {
    /// Availability asserting only the software encoder.
    #[must_use]
    pub fn software_only() -> Self {
        let mut availability = Self::default();
        availability.set(EncoderId::Libx265, true);
        availability
    }

    pub fn set(&mut self, id: EncoderId, available: bool) {
        self.entries.insert(id, available);
    }

    #[must_use]
    pub fn is_available(&self, id: EncoderId) -> bool {
        self.entries.get(&id).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn has_hardware(&self) -> bool {
        self.entries
            .iter()
            .any(|(id, &available)| available && id.is_hardware())
    }

    /// Entries in `EncoderId` order.
    pub fn iter(&self) -> impl Iterator<Item = (EncoderId, bool)> + '_ {
        self.entries.iter().map(|(&id, &available)| (id, available))
    }
}

impl FromIterator<(EncoderId, bool)> for EncoderAvailability {
    fn from_iter<I: IntoIterator<Item = (EncoderId, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Scans an `ffmpeg -encoders` listing for the known encoder names.
#[must_use]
pub fn parse_encoder_listing(listing: &str) -> EncoderAvailability {
    EncoderId::ALL
        .into_iter()
        .map(|id| (id, listing.contains(id.token())))
        .collect()
}

/// Queries ffmpeg for available HEVC encoders, falling back to software-only.
pub fn probe_available_encoders(ffmpeg: &Path) -> EncoderAvailability {
    debug!("Probing encoders with: {} -hide_banner -encoders", ffmpeg.display());

    let output = match Command::new(ffmpeg)
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            warn!("Encoder detection failed ({}): {e}", ffmpeg.display());
            return EncoderAvailability::software_only();
        }
    };

    if !output.status.success() {
        warn!(
            "Encoder detection failed: {} exited with {}",
            ffmpeg.display(),
            output.status
        );
        return EncoderAvailability::software_only();
    }

    match String::from_utf8(output.stdout) {
        Ok(listing) => {
            let availability = parse_encoder_listing(&listing);
            for (id, available) in availability.iter() {
                debug!("Encoder {id}: {}", if available { "available" } else { "absent" });
            }
            availability
        }
        Err(e) => {
            warn!("Encoder detection failed: unreadable ffmpeg output: {e}");
            EncoderAvailability::software_only()
        }
    }
}
