//! Maps the trivia service's raw point values onto discrete difficulty bands.

/// Lowest difficulty band.
pub const MIN_BAND: i64 = 1;
/// Highest difficulty band.
pub const MAX_BAND: i64 = 5;
/// Point-value width of one band.
pub const BAND_WIDTH: i64 = 200;

/// Outcome of classifying a raw point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Value maps to a band in `MIN_BAND..=MAX_BAND`.
    Band(i64),
    /// Missing or non-positive value; the record carries no usable signal.
    Ineligible,
    /// Value maps above `MAX_BAND`. Rejected, never clamped down to the top
    /// band, so the difficulty distribution stays honest.
    OutOfRange(i64),
}

/// `difficulty = ceil(value / BAND_WIDTH)`.
pub fn classify(value: Option<i64>) -> Classification {
    let value = match value {
        Some(v) if v > 0 => v,
        _ => return Classification::Ineligible,
    };

    let band = (value + BAND_WIDTH - 1) / BAND_WIDTH;
    if band > MAX_BAND {
        Classification::OutOfRange(band)
    } else {
        Classification::Band(band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_the_ceiling_rule() {
        assert_eq!(classify(Some(1)), Classification::Band(1));
        assert_eq!(classify(Some(200)), Classification::Band(1));
        assert_eq!(classify(Some(201)), Classification::Band(2));
        assert_eq!(classify(Some(400)), Classification::Band(2));
        assert_eq!(classify(Some(901)), Classification::Band(5));
        assert_eq!(classify(Some(1000)), Classification::Band(5));
    }

    #[test]
    fn missing_or_zero_values_are_ineligible() {
        assert_eq!(classify(None), Classification::Ineligible);
        assert_eq!(classify(Some(0)), Classification::Ineligible);
        assert_eq!(classify(Some(-200)), Classification::Ineligible);
    }

    #[test]
    fn values_above_the_top_band_are_rejected_not_clamped() {
        assert_eq!(classify(Some(1001)), Classification::OutOfRange(6));
        assert_eq!(classify(Some(2000)), Classification::OutOfRange(10));
    }
}
