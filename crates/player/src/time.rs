use vitrine_host::Rect;

/// A playback position as shown on the player's labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub minutes: u64,
    pub seconds: u8,
}

impl ClockTime {
    /// Negative and non-finite inputs read as zero; fractions are floored.
    pub fn from_seconds(value: f64) -> Self {
        let value = if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        };
        Self {
            minutes: (value / 60.0).floor() as u64,
            seconds: (value % 60.0).floor() as u8,
        }
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

/// `M:SS` label for a position in seconds.
pub fn format_time(seconds: f64) -> String {
    ClockTime::from_seconds(seconds).to_string()
}

/// Fraction of the track already played, always within `0..=1`.
pub fn elapsed_fraction(current: f64, duration: f64) -> f64 {
    if !(duration.is_finite() && duration > 0.0) || !current.is_finite() {
        return 0.0;
    }
    (current / duration).clamp(0.0, 1.0)
}

/// Map a click's x coordinate onto the scrubber, clamped to `0..=1`.
///
/// Returns `None` for a scrubber with no width.
pub fn scrub_fraction(client_x: f64, bounds: Rect) -> Option<f64> {
    if !(bounds.width.is_finite() && bounds.width > 0.0) || !client_x.is_finite() {
        return None;
    }
    Some(((client_x - bounds.left) / bounds.width).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(59.99), "0:59");
        assert_eq!(format_time(125.0), "2:05");
        assert_eq!(format_time(3600.0), "60:00");
    }

    #[test]
    fn test_format_time_invalid_input() {
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
        assert_eq!(format_time(f64::NEG_INFINITY), "0:00");
    }

    #[test]
    fn test_elapsed_fraction_bounds() {
        assert_eq!(elapsed_fraction(10.0, 0.0), 0.0);
        assert_eq!(elapsed_fraction(10.0, f64::NAN), 0.0);
        assert_eq!(elapsed_fraction(25.0, 100.0), 0.25);
        assert_eq!(elapsed_fraction(120.0, 100.0), 1.0);

        for duration in [0.0, 0.5, 1.0, 7.0, 125.0, 3600.0] {
            for step in 0..=20 {
                let current = duration * step as f64 / 20.0;
                let fraction = elapsed_fraction(current, duration);
                assert!((0.0..=1.0).contains(&fraction));
                if duration > 0.0 {
                    assert!((fraction - current / duration).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_scrub_fraction() {
        let bounds = Rect::new(100.0, 0.0, 200.0, 10.0);
        assert_eq!(scrub_fraction(200.0, bounds), Some(0.5));
        assert_eq!(scrub_fraction(50.0, bounds), Some(0.0));
        assert_eq!(scrub_fraction(400.0, bounds), Some(1.0));
        assert_eq!(scrub_fraction(200.0, Rect::new(0.0, 0.0, 0.0, 10.0)), None);
    }

    #[test]
    fn test_clock_time_display() {
        let time = ClockTime::from_seconds(61.7);
        assert_eq!(time, ClockTime { minutes: 1, seconds: 1 });
        assert_eq!(time.to_string(), "1:01");
    }
}
