use std::str::FromStr;

use super::parse_positive;

/// Values at or above this are taken as already spelled out in full.
const MILLION_SUFFIX_CEILING: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    Million,
    Billion,
}

impl FromStr for Magnitude {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "million" => Ok(Magnitude::Million),
            "billion" => Ok(Magnitude::Billion),
            other => Err(format!("Unknown magnitude: {}", other)),
        }
    }
}

/// Applies a "million"/"billion" suffix to a stated dollar numeral.
///
/// A "million" suffix on a numeral that is already at least one million is
/// a transcription slip ("$8,635,571 million" means $8,635,571) and is
/// ignored. "billion" is always applied.
pub fn apply_magnitude(numeral: &str, magnitude: Option<Magnitude>) -> Option<f64> {
    let value = parse_positive(numeral)?;
    let scaled = match magnitude {
        None => value,
        Some(Magnitude::Billion) => value * 1e9,
        Some(Magnitude::Million) if value >= MILLION_SUFFIX_CEILING => {
            log::debug!("Ignoring million suffix on {}", numeral);
            value
        }
        Some(Magnitude::Million) => value * 1e6,
    };
    scaled.is_finite().then_some(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_million_suffix_on_full_figure_is_ignored() {
        assert_eq!(
            apply_magnitude("8,635,571", Some(Magnitude::Million)),
            Some(8_635_571.0)
        );
    }

    #[test]
    fn test_no_suffix() {
        assert_eq!(apply_magnitude("2,258,226", None), Some(2_258_226.0));
    }

    #[test]
    fn test_small_million() {
        assert_eq!(apply_magnitude("12", Some(Magnitude::Million)), Some(12_000_000.0));
    }

    #[test]
    fn test_billion_always_applies() {
        assert_eq!(apply_magnitude("1.2", Some(Magnitude::Billion)), Some(1_200_000_000.0));
        assert_eq!(
            apply_magnitude("2,000,000", Some(Magnitude::Billion)),
            Some(2_000_000_000_000_000.0)
        );
    }

    #[test]
    fn test_magnitude_parse() {
        assert_eq!("Million".parse::<Magnitude>(), Ok(Magnitude::Million));
        assert_eq!("BILLION".parse::<Magnitude>(), Ok(Magnitude::Billion));
        assert!("thousand".parse::<Magnitude>().is_err());
    }
}
