//! Volume unit conversions
//!
//! Volume sliders show a linear percentage ("LV100", 0..=100). Some volumes
//! are stored in decibels, others as a linear gain (0.0..=1.0).

/// Stand-in for negative infinity when storing silence in decibels.
///
/// The config file cannot hold `-inf`, so `lv100_to_db(0.0)` clamps here.
/// `db_to_lv100(DB_FLOOR)` is not exactly recoverable: it underflows to 0.0.
pub const DB_FLOOR: f32 = -10_000_000.0;

/// Decibels to linear percent: `10^(db / 10) * 100`.
#[inline]
pub fn db_to_lv100(db: f32) -> f32 {
    10f32.powf(db / 10.0) * 100.0
}

/// Linear percent to decibels, clamped to [`DB_FLOOR`].
#[inline]
pub fn lv100_to_db(lv100: f32) -> f32 {
    // log10(0) is -inf; NaN (negative input) also falls to the floor via max
    DB_FLOOR.max((lv100 / 100.0).log10() * 10.0)
}

/// Linear gain (0.0..=1.0) to percent.
#[inline]
pub fn linear_to_percent(gain: f32) -> f32 {
    gain * 100.0
}

/// Percent to linear gain.
#[inline]
pub fn percent_to_linear(percent: f32) -> f32 {
    percent / 100.0
}

/// Label text for a volume slider, e.g. `75%`.
pub fn format_volume_percent(lv100: f32) -> String {
    format!("{:.0}%", lv100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_away_from_floor() {
        for lv100 in [0.001, 0.5, 1.0, 10.0, 33.3, 50.0, 75.0, 99.99, 100.0] {
            let back = db_to_lv100(lv100_to_db(lv100));
            assert!((back - lv100).abs() < 1e-3, "{lv100} -> {back}");
        }
    }

    #[test]
    fn test_fixed_points() {
        assert_eq!(lv100_to_db(0.0), DB_FLOOR);
        assert_eq!(lv100_to_db(0.0), -10_000_000.0);
        assert_eq!(db_to_lv100(0.0), 100.0);
        assert_eq!(lv100_to_db(100.0), 0.0);
    }

    #[test]
    fn test_db_to_lv100_strictly_increasing() {
        let mut prev = db_to_lv100(-60.0);
        let mut db = -60.0;
        while db < 10.0 {
            db += 0.5;
            let next = db_to_lv100(db);
            assert!(next > prev, "not increasing at {db} dB");
            prev = next;
        }
    }

    #[test]
    fn test_floor_is_near_silence() {
        let lv = db_to_lv100(DB_FLOOR);
        assert!(lv >= 0.0 && lv < 1e-6);
    }

    #[test]
    fn test_negative_percent_clamps() {
        assert_eq!(lv100_to_db(-5.0), DB_FLOOR);
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(format_volume_percent(75.0), "75%");
        assert_eq!(format_volume_percent(49.6), "50%");
        assert_eq!(linear_to_percent(0.5), 50.0);
        assert_eq!(percent_to_linear(75.0), 0.75);
    }
}
