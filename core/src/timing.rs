//! Conversions between configured second values and chrono deltas.

use chrono::{NaiveDateTime, TimeDelta};

/// Longest delay a configured timer may have.
pub const MAX_DELAY_SECS: f32 = 86_400.0;

/// Convert a configured delay in seconds to a `TimeDelta` (millisecond precision).
///
/// Negative and non-finite values clamp to zero; anything above
/// [`MAX_DELAY_SECS`] clamps to one day.
pub fn secs_to_delta(secs: f32) -> TimeDelta {
    if !secs.is_finite() || secs <= 0.0 {
        return TimeDelta::zero();
    }
    let secs = secs.min(MAX_DELAY_SECS);
    TimeDelta::milliseconds((secs as f64 * 1000.0).round() as i64)
}

/// `now + delay`, saturating at the latest representable time.
pub fn deadline_after(now: NaiveDateTime, delay: TimeDelta) -> NaiveDateTime {
    now.checked_add_signed(delay).unwrap_or_else(|| {
        tracing::warn!(%now, ?delay, "Timer deadline out of range, saturating");
        NaiveDateTime::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::t0;

    #[test]
    fn test_secs_to_delta() {
        assert_eq!(secs_to_delta(3.0), TimeDelta::seconds(3));
        assert_eq!(secs_to_delta(7.5), TimeDelta::milliseconds(7500));
        assert_eq!(secs_to_delta(-1.0), TimeDelta::zero());
        assert_eq!(secs_to_delta(f32::NAN), TimeDelta::zero());
    }

    #[test]
    fn test_secs_to_delta_caps_huge_values() {
        assert_eq!(secs_to_delta(1.0e30), TimeDelta::days(1));
        assert_eq!(secs_to_delta(f32::MAX), TimeDelta::days(1));
        assert_eq!(secs_to_delta(f32::INFINITY), TimeDelta::zero());
    }

    #[test]
    fn test_deadline_after_saturates() {
        assert_eq!(deadline_after(t0(), TimeDelta::seconds(5)), t0() + TimeDelta::seconds(5));
        assert_eq!(deadline_after(t0(), TimeDelta::MAX), NaiveDateTime::MAX);
        assert_eq!(
            deadline_after(NaiveDateTime::MAX, TimeDelta::milliseconds(1)),
            NaiveDateTime::MAX
        );
    }
}
