//! Measurement interpretation.

use std::fmt;

use jozsa_hal::Counts;
use serde::{Deserialize, Serialize};

/// Outcome of a Deutsch-Jozsa run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Every shot read the all-zero string.
    Constant,
    /// At least one shot read a nonzero string.
    Balanced,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Constant => f.write_str("constant"),
            Classification::Balanced => f.write_str("balanced"),
        }
    }
}

/// Whether `bitstring` is non-empty and made only of `0`.
pub fn is_all_zero(bitstring: &str) -> bool {
    !bitstring.is_empty() && bitstring.bytes().all(|b| b == b'0')
}

/// Classify a histogram.
///
/// Constant iff every recorded shot is the all-zero string. A single
/// nonzero reading makes the result balanced; there is no noise threshold.
/// An empty histogram is balanced, since it never shows the all-zero
/// string accounting for all shots.
pub fn classify(counts: &Counts) -> Classification {
    let total = counts.total_shots();
    let zeros: u64 = counts
        .iter()
        .filter(|(bitstring, _)| is_all_zero(bitstring))
        .map(|(_, n)| n)
        .sum();

    if total > 0 && zeros == total {
        Classification::Constant
    } else {
        Classification::Balanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> Counts {
        entries.iter().map(|&(b, n)| (b, n)).collect()
    }

    #[test]
    fn test_all_zero_is_constant() {
        assert_eq!(classify(&counts(&[("000", 1024)])), Classification::Constant);
    }

    #[test]
    fn test_all_ones_is_balanced() {
        assert_eq!(classify(&counts(&[("111", 1024)])), Classification::Balanced);
    }

    #[test]
    fn test_single_stray_reading_flips_to_balanced() {
        let noisy = counts(&[("000", 1023), ("010", 1)]);
        assert_eq!(classify(&noisy), Classification::Balanced);
    }

    #[test]
    fn test_empty_histogram_is_balanced() {
        assert_eq!(classify(&Counts::new()), Classification::Balanced);
    }

    #[test]
    fn test_zero_count_entries_are_not_observations() {
        let mut c = counts(&[("000", 10)]);
        c.insert("101", 0);
        assert_eq!(classify(&c), Classification::Constant);
    }

    #[test]
    fn test_is_all_zero() {
        assert!(is_all_zero("0"));
        assert!(is_all_zero("0000"));
        assert!(!is_all_zero("0100"));
        assert!(!is_all_zero(""));
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(Classification::Constant.to_string(), "constant");
        assert_eq!(
            serde_json::to_value(Classification::Balanced).unwrap(),
            serde_json::json!("balanced")
        );
    }
}
