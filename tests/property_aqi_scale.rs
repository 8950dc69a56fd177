use proptest::prelude::*;
use vayu_tui::domain::aqi::{aqi_from_pm25, clamp_aqi, level_of};

proptest! {
    #[test]
    fn every_aqi_lands_in_exactly_one_bucket(aqi in 0u16..=1000) {
        let level = level_of(aqi);
        let (lo, hi) = match level.severity_rank {
            0 => (0, 50),
            1 => (51, 100),
            2 => (101, 150),
            3 => (151, 200),
            4 => (201, 300),
            5 => (301, u16::MAX),
            rank => panic!("unexpected severity rank {rank}"),
        };
        prop_assert!(aqi >= lo && aqi <= hi, "aqi={aqi} outside [{lo}, {hi}]");
    }

    #[test]
    fn pm25_scale_is_monotone(a in 0.0f64..500.0, b in 0.0f64..500.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(aqi_from_pm25(lo) <= aqi_from_pm25(hi));
    }

    #[test]
    fn pm25_scale_has_no_jump_at_breakpoints(eps in 1e-9f64..1e-3) {
        for breakpoint in [12.0f64, 35.4, 55.4, 150.4] {
            let below = aqi_from_pm25(breakpoint - eps);
            let above = aqi_from_pm25(breakpoint + eps);
            // Flooring may split one unit across the seam, never more.
            prop_assert!(above - below <= 1, "jump at {breakpoint}: {below} -> {above}");
        }
    }

    #[test]
    fn clamp_never_produces_negative_or_overflowing_values(value in -1e9f64..1e9) {
        let clamped = clamp_aqi(value);
        if value <= -0.5 {
            prop_assert_eq!(clamped, 0);
        }
        prop_assert!(f64::from(clamped) <= f64::from(u16::MAX));
    }
}
