//! Simple terminal output functions for hevcify-core.
//!
//! This module provides the formatting helpers that keep console output in a
//! consistent hierarchy (sections, status lines, success/warning/error
//! markers) plus the per-file encode progress display. Text goes through the
//! `log` facade so it lands in the log file as well; the progress bar draws
//! directly to stderr.

use std::io::IsTerminal;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{error, info, warn};
use owo_colors::OwoColorize;

use crate::batch::BatchSummary;
use crate::progress::ProgressState;
use crate::utils::{format_bytes, format_duration};

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a section header (Level 1 - Main sections with cyan color)
pub fn print_section(title: &str) {
    info!("");
    if should_use_color() {
        info!("===== {} =====", title.to_uppercase().cyan().bold());
    } else {
        info!("===== {} =====", title.to_uppercase());
    }
    info!("");
}

/// Print a processing step (Level 2 - Subsections with 2 spaces indentation and bold)
pub fn print_processing(message: &str) {
    info!("");
    if should_use_color() {
        info!("  » {}", style(message).bold());
    } else {
        info!("  » {message}");
    }
}

/// Spaces after `label:` so values line up in a 15-character column.
fn label_padding(label: &str) -> usize {
    let label_width: usize = 15;
    label_width.saturating_sub(label.len()).max(1)
}

/// Print a status line (Level 4 - Primary info with 6 spaces indentation)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let padding = label_padding(label);

    if should_use_color() && highlight {
        info!("      {}:{} {}", label, " ".repeat(padding), style(value).bold());
    } else {
        info!("      {}:{} {}", label, " ".repeat(padding), value);
    }
}

/// Print a success message (Level 2 - Success with 2 spaces indentation and green color)
pub fn print_success(message: &str) {
    info!("");
    if should_use_color() {
        info!("  ✓ {}", message.green());
    } else {
        info!("  ✓ {message}");
    }
}

/// Print a warning (Level 2, yellow)
pub fn print_warning(message: &str) {
    if should_use_color() {
        warn!("  ⚠ {}", message.yellow());
    } else {
        warn!("  ⚠ {message}");
    }
}

/// Print an error (Level 2, red)
pub fn print_error(message: &str) {
    if should_use_color() {
        error!("  ✗ {}", message.red().bold());
    } else {
        error!("  ✗ {message}");
    }
}

/// Print a sub-item (Level 3 - Operations with 4 spaces indentation)
pub fn print_sub_item(message: &str) {
    info!("    {message}");
}

/// Prints the end-of-batch summary block.
///
/// The compression line appears only when at least one file succeeded.
pub fn print_summary(summary: &BatchSummary) {
    print_section("Summary");
    print_status("Encoder", summary.encoder.display_name(), false);
    print_status("Succeeded", &summary.succeeded.to_string(), summary.succeeded > 0);
    print_status("Failed", &summary.failed.to_string(), false);
    if summary.replace_failed > 0 {
        print_status("Replace failed", &summary.replace_failed.to_string(), true);
    }
    print_status("Elapsed", &format_duration(summary.elapsed.as_secs_f64()), false);

    if let Some(percent) = summary.compression_percent() {
        print_status("Original", &format_bytes(summary.total_original_bytes), false);
        print_status("Converted", &format_bytes(summary.total_converted_bytes), false);
        print_status("Reduction", &format!("{percent:.1}%"), true);
    }

    if summary.aborted {
        print_warning("Batch was interrupted; remaining files were not processed");
    }
}

// ============================================================================
// ENCODE PROGRESS DISPLAY
// ============================================================================

const BAR_TEMPLATE: &str =
    "Encoding: {percent:>3}% [{bar:30}] ({elapsed_precise} / {eta_precise}) {msg}";

/// Live progress display for a single encode.
///
/// A percentage bar when the source duration is known, otherwise a spinner
/// showing the encoded time. Hidden when stderr is not a terminal.
pub struct EncodeProgress {
    bar: ProgressBar,
    has_total: bool,
}

impl EncodeProgress {
    #[must_use]
    pub fn new(total_secs: Option<f64>) -> Self {
        let (bar, has_total) = match total_secs {
            Some(total) => (Self::init_progress_bar(total), true),
            None => (Self::init_spinner(), false),
        };

        if !std::io::stderr().is_terminal() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar, has_total }
    }

    fn init_progress_bar(total_secs: f64) -> ProgressBar {
        let pb = ProgressBar::new((total_secs * 1000.0) as u64);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##.");
        pb.set_style(style);
        pb
    }

    fn init_spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner} Encoding: {msg} ({elapsed_precise})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb
    }

    /// Redraws from the current progress state.
    pub fn update(&self, state: &ProgressState, speed: Option<f64>) {
        let speed_text = speed.map(|s| format!("{s:.2}x")).unwrap_or_default();
        if self.has_total {
            self.bar.set_position((state.elapsed() * 1000.0) as u64);
            self.bar.set_message(speed_text);
        } else {
            self.bar.set_message(format!(
                "{} encoded {speed_text}",
                format_duration(state.elapsed())
            ));
        }
    }

    /// Removes the display from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for EncodeProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_padding() {
        assert_eq!(label_padding("Encoder"), 8);
        assert_eq!(label_padding("Replace failed"), 1);
        assert_eq!(label_padding("A label longer than the column"), 1);
    }

    #[test]
    fn test_bar_template_is_valid() {
        assert!(ProgressStyle::default_bar().template(BAR_TEMPLATE).is_ok());
        assert!(BAR_TEMPLATE.contains("{percent:>3}%"));
    }

    #[test]
    fn test_progress_display_without_terminal() {
        let mut state = ProgressState::new(Some(10.0));
        state.update(5.0);
        let display = EncodeProgress::new(Some(10.0));
        display.update(&state, Some(1.5));
        display.finish();

        let spinner = EncodeProgress::new(None);
        spinner.update(&state, None);
    }
}
