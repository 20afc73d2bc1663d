//! Compiled-in scoring and validation constants.
//!
//! None of these are read from files or the environment, so every engine
//! scores on the same 1-9 scale. Rule weights live with the rules themselves
//! (see [`crate::scoring::topics`]).

/// Score before any factor is applied
pub const BASELINE_SCORE: f64 = 5.0;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 9;

/// Lowest score categorized as "usually appropriate"
pub const APPROPRIATE_MIN: u8 = 7;

/// Highest score categorized as "usually not appropriate"
pub const INAPPROPRIATE_MAX: u8 = 3;

/// Number of fired factors at which confidence becomes high
pub const HIGH_CONFIDENCE_FACTORS: usize = 3;

/// A single factor at least this large also makes confidence high
pub const DECISIVE_CONTRIBUTION: f64 = 4.0;

/// Scores at or below this get a conservative-management alternative
pub const CONSERVATIVE_ALTERNATIVE_MAX: u8 = 4;

/// X-ray alternative is offered this many points below the requested study
pub const XRAY_SCORE_PENALTY: u8 = 2;

pub const MIN_AGE: u32 = 0;
pub const MAX_AGE: u32 = 150;

/// Ages at or above this (but within range) produce a "verify age" warning
pub const AGE_WARNING_THRESHOLD: u32 = 110;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_is_mid_scale() {
        assert_eq!(BASELINE_SCORE, 5.0);
        assert!(BASELINE_SCORE >= f64::from(MIN_SCORE));
        assert!(BASELINE_SCORE <= f64::from(MAX_SCORE));
    }

    #[test]
    fn test_category_bands_partition_scale() {
        assert_eq!((MIN_SCORE, MAX_SCORE), (1, 9));
        assert_eq!(INAPPROPRIATE_MAX, 3);
        assert_eq!(APPROPRIATE_MIN, 7);
        assert!(MIN_SCORE <= INAPPROPRIATE_MAX);
        assert!(INAPPROPRIATE_MAX < APPROPRIATE_MIN);
        assert!(APPROPRIATE_MIN <= MAX_SCORE);
    }

    #[test]
    fn test_age_band() {
        assert!(MIN_AGE < AGE_WARNING_THRESHOLD);
        assert!(AGE_WARNING_THRESHOLD <= MAX_AGE);
    }
}
