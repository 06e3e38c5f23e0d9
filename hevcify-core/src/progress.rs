//! ffmpeg progress channel parsing and per-file progress state.
//!
//! With `-progress pipe:1` ffmpeg writes `key=value` lines to stdout in
//! blocks terminated by `progress=continue` or `progress=end`. Only the
//! encoded output timestamp and speed are of interest here.

use crate::utils::parse_ffmpeg_time;

/// A parsed line from ffmpeg's progress channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressEvent {
    /// Encoded output time in seconds.
    OutTime(f64),
    /// Encoding speed relative to realtime.
    Speed(f64),
    /// ffmpeg finished writing the output.
    End,
}

/// Parses one progress line. Returns `None` for keys that are not tracked
/// and for values ffmpeg reports as `N/A`.
#[must_use]
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let (key, value) = line.trim().split_once('=')?;
    let value = value.trim();

    match key.trim() {
        // out_time_ms is in microseconds as well (long-standing ffmpeg quirk).
        "out_time_us" | "out_time_ms" => value
            .parse::<i64>()
            .ok()
            .map(|us| ProgressEvent::OutTime(us as f64 / 1_000_000.0)),
        "out_time" => parse_ffmpeg_time(value).map(ProgressEvent::OutTime),
        "speed" => value
            .trim_end_matches('x')
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite())
            .map(ProgressEvent::Speed),
        "progress" if value == "end" => Some(ProgressEvent::End),
        _ => None,
    }
}

/// Progress of one in-flight conversion.
///
/// The elapsed value never decreases and never exceeds the known total.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    total: Option<f64>,
    elapsed: f64,
}

impl ProgressState {
    /// `total` is the source duration in seconds, if it could be probed.
    #[must_use]
    pub fn new(total: Option<f64>) -> Self {
        Self {
            total: total.filter(|t| t.is_finite() && *t > 0.0),
            elapsed: 0.0,
        }
    }

    /// Records an output-time sample and returns the reported elapsed time.
    pub fn update(&mut self, sample_secs: f64) -> f64 {
        if sample_secs.is_finite() && sample_secs > self.elapsed {
            self.elapsed = match self.total {
                Some(total) => sample_secs.min(total),
                None => sample_secs,
            };
        }
        self.elapsed
    }

    /// Jumps to the total (if known) once ffmpeg reports the end.
    pub fn finish(&mut self) {
        if let Some(total) = self.total {
            self.elapsed = total;
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[must_use]
    pub fn total(&self) -> Option<f64> {
        self.total
    }

    /// Percent complete, or `None` without a known total.
    #[must_use]
    pub fn percent(&self) -> Option<f64> {
        self.total.map(|total| self.elapsed / total * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_line_time_keys() {
        assert_eq!(
            parse_progress_line("out_time_us=1500000"),
            Some(ProgressEvent::OutTime(1.5))
        );
        assert_eq!(
            parse_progress_line("out_time_ms=2000000\n"),
            Some(ProgressEvent::OutTime(2.0))
        );
        assert_eq!(
            parse_progress_line("out_time=00:01:00.500000"),
            Some(ProgressEvent::OutTime(60.5))
        );
        assert_eq!(parse_progress_line("out_time_us=N/A"), None);
        assert_eq!(parse_progress_line("out_time=N/A"), None);
    }

    #[test]
    fn test_parse_progress_line_other_keys() {
        assert_eq!(parse_progress_line("speed=1.53x"), Some(ProgressEvent::Speed(1.53)));
        assert_eq!(parse_progress_line("speed=N/A"), None);
        assert_eq!(parse_progress_line("progress=end"), Some(ProgressEvent::End));
        assert_eq!(parse_progress_line("progress=continue"), None);
        assert_eq!(parse_progress_line("frame=120"), None);
        assert_eq!(parse_progress_line("garbage without equals"), None);
        assert_eq!(parse_progress_line(""), None);
    }

    #[test]
    fn test_progress_state_monotonic_and_bounded() {
        let total = 100.0;
        let mut state = ProgressState::new(Some(total));
        let samples = [-0.02, 0.0, 5.0, 3.0, 42.5, 42.5, 99.9, 150.0, 80.0, f64::NAN];

        let mut previous = 0.0;
        for sample in samples {
            let reported = state.update(sample);
            assert!(reported >= previous, "{reported} < {previous}");
            assert!(reported <= total);
            previous = reported;
        }
        assert_eq!(state.elapsed(), total);
        assert_eq!(state.percent(), Some(100.0));
    }

    #[test]
    fn test_progress_state_without_total() {
        let mut state = ProgressState::new(None);
        assert_eq!(state.update(12.0), 12.0);
        assert_eq!(state.update(11.0), 12.0);
        assert_eq!(state.update(5000.0), 5000.0);
        assert_eq!(state.percent(), None);
        state.finish();
        assert_eq!(state.elapsed(), 5000.0);
    }

    #[test]
    fn test_progress_state_rejects_unusable_total() {
        assert_eq!(ProgressState::new(Some(0.0)).total(), None);
        assert_eq!(ProgressState::new(Some(f64::INFINITY)).total(), None);
    }

    #[test]
    fn test_progress_state_finish_with_total() {
        let mut state = ProgressState::new(Some(60.0));
        state.update(59.2);
        state.finish();
        assert_eq!(state.percent(), Some(100.0));
    }
}
