// SPDX-License-Identifier: MPL-2.0
//! Time formatting for the transport readout and the seek indicator.

/// Formats seconds as `m:ss`. Minutes are not wrapped into hours.
///
/// Negative and non-finite inputs format as `0:00`.
///
/// # Examples
///
/// ```
/// use stream_lens::player::time_units::format_time;
///
/// assert_eq!(format_time(0.0), "0:00");
/// assert_eq!(format_time(65.9), "1:05");
/// assert_eq!(format_time(3725.0), "62:05");
/// ```
#[must_use]
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".to_string();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Formats a relative seek as shown by the seek indicator (`+5s`, `-10s`).
///
/// # Examples
///
/// ```
/// use stream_lens::player::time_units::format_seek_delta;
///
/// assert_eq!(format_seek_delta(5.0), "+5s");
/// assert_eq!(format_seek_delta(-10.0), "-10s");
/// assert_eq!(format_seek_delta(2.5), "+2.5s");
/// ```
#[must_use]
pub fn format_seek_delta(delta_secs: f64) -> String {
    let sign = if delta_secs < 0.0 { '-' } else { '+' };
    let magnitude = delta_secs.abs();
    if magnitude.fract() == 0.0 {
        format!("{sign}{magnitude:.0}s")
    } else {
        format!("{sign}{magnitude}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(9.0), "0:09");
        assert_eq!(format_time(60.0), "1:00");
        assert_eq!(format_time(599.99), "9:59");
    }

    #[test]
    fn format_time_handles_garbage() {
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn seek_delta_zero_is_positive() {
        assert_eq!(format_seek_delta(0.0), "+0s");
    }
}
