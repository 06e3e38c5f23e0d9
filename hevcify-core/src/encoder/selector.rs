//! Encoder selection by fixed priority.

use super::{EncoderAvailability, EncoderId};

/// Hardware encoders in order of preference. The platform encoder comes
/// first, then the discrete GPU vendors.
pub const ENCODER_PRIORITY: &[EncoderId] = &[
    EncoderId::VideoToolbox,
    EncoderId::Nvenc,
    EncoderId::QuickSync,
    EncoderId::Amf,
];

/// Picks the preferred available encoder, or libx265 when no hardware
/// encoder is present.
///
/// Returns the identifier and its display name. When the result is the
/// software encoder, callers should warn the user that encoding will be
/// slower.
///
/// # Examples
///
/// ```rust
/// use hevcify_core::encoder::{EncoderAvailability, EncoderId, select_encoder};
///
/// let mut availability = EncoderAvailability::software_only();
/// availability.set(EncoderId::QuickSync, true);
/// availability.set(EncoderId::Amf, true);
///
/// assert_eq!(select_encoder(&availability), (EncoderId::QuickSync, "Intel Quick Sync"));
/// ```
#[must_use]
pub fn select_encoder(availability: &EncoderAvailability) -> (EncoderId, &'static str) {
    let id = ENCODER_PRIORITY
        .iter()
        .copied()
        .find(|&id| availability.is_available(id))
        .unwrap_or(EncoderId::Libx265);
    (id, id.display_name())
}
