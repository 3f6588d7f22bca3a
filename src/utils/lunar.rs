//! Lunar phase from a calendar date.
//!
//! The phase is the position inside the mean synodic month measured from a
//! reference new moon: `0.0` is new moon, `0.5` is full moon. It ignores the
//! real orbital perturbations, which is enough to orient a light source.

use chrono::{DateTime, TimeZone, Utc};

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_587_705_76;

/// Mean synodic month in seconds.
pub const SYNODIC_MONTH_SECS: f64 = SYNODIC_MONTH_DAYS * 86_400.0;

/// Phase reported when no event is selected (first quarter).
pub const NEUTRAL_PHASE: f64 = 0.25;

/// Reference new moon, 2000-01-06 18:14 UTC.
pub fn reference_new_moon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Phase fraction in `[0, 1)` for `date`.
pub fn phase_of(date: DateTime<Utc>) -> f64 {
    let elapsed = date.signed_duration_since(reference_new_moon());
    let elapsed_secs = elapsed.num_milliseconds() as f64 / 1000.0;
    phase_from_elapsed_secs(elapsed_secs)
}

/// Phase fraction in `[0, 1)` for a number of seconds since the reference
/// new moon. Negative offsets wrap into the previous cycle.
pub fn phase_from_elapsed_secs(elapsed_secs: f64) -> f64 {
    let fraction = elapsed_secs.rem_euclid(SYNODIC_MONTH_SECS) / SYNODIC_MONTH_SECS;
    // rem_euclid may round up to the period itself for tiny negative inputs.
    if fraction >= 1.0 { 0.0 } else { fraction }
}

/// Age of the moon in days for a phase fraction.
pub fn age_days(phase: f64) -> f64 {
    phase * SYNODIC_MONTH_DAYS
}

/// Short human readable name of the phase, used by the HUD.
pub fn phase_name(phase: f64) -> &'static str {
    let eighth = (phase.rem_euclid(1.0) * 8.0 + 0.5).floor() as u8 % 8;
    match eighth {
        0 => "New moon",
        1 => "Waxing crescent",
        2 => "First quarter",
        3 => "Waxing gibbous",
        4 => "Full moon",
        5 => "Waning gibbous",
        6 => "Last quarter",
        _ => "Waning crescent",
    }
}
