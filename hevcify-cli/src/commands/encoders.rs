//! Implementation of the 'encoders' subcommand.
//!
//! Shows which HEVC encoders the configured ffmpeg provides and which one a
//! conversion would pick.

use crate::EXIT_OK;
use crate::cli::GlobalArgs;

use anyhow::Result;
use hevcify_core::encoder::{ENCODER_PRIORITY, EncoderId, profile};
use hevcify_core::terminal_output::{print_section, print_status, print_sub_item, print_warning};
use hevcify_core::{EncoderAvailability, probe_available_encoders, select_encoder};

/// One status line per encoder, hardware in priority order then software.
#[must_use]
pub fn availability_rows(availability: &EncoderAvailability) -> Vec<(EncoderId, bool)> {
    ENCODER_PRIORITY
        .iter()
        .copied()
        .chain(std::iter::once(EncoderId::Libx265))
        .map(|id| (id, availability.is_available(id)))
        .collect()
}

pub fn run_encoders(global: &GlobalArgs) -> Result<i32> {
    let availability = probe_available_encoders(&global.ffmpeg);

    print_section("Encoders");
    for (id, available) in availability_rows(&availability) {
        let state = if available { "available" } else { "not available" };
        print_status(id.display_name(), &format!("{state} ({id})"), available);
    }

    let (selected, name) = select_encoder(&availability);
    print_section("Selection");
    print_status("Selected", name, true);
    print_sub_item(&profile(selected).codec_args().collect::<Vec<_>>().join(" "));
    if !selected.is_hardware() {
        print_warning("No hardware HEVC encoder available; conversions will be slower");
    }

    Ok(EXIT_OK)
}
