//! Lossy scaling of wide numeric fields.
//!
//! Wei-denominated values, difficulties and balances routinely exceed the 53-bit
//! integer precision of the index store. They are divided by a fixed quotient and
//! stored as floating point numbers. Precision below `1 / quotient` of a unit, and
//! above the 53-bit mantissa of the scaled result, is lost on purpose.
//!
//! The quotient has changed between revisions of the stored data, so it travels
//! with an explicit revision number that is persisted alongside every scaled
//! document.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// The revision of the default scaling quotient.
pub const DEFAULT_SCALE_REVISION: u16 = 1;

/// The default scaling quotient (micro-units).
pub const DEFAULT_SCALE_QUOTIENT: u64 = 1_000_000;

/// A versioned scaling quotient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// The revision persisted with scaled documents.
    pub revision: u16,
    /// The quotient wide values are divided by. Zero is treated as one.
    pub quotient: u64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self { revision: DEFAULT_SCALE_REVISION, quotient: DEFAULT_SCALE_QUOTIENT }
    }
}

impl ScaleConfig {
    /// Creates a new [`ScaleConfig`].
    pub const fn new(revision: u16, quotient: u64) -> Self {
        Self { revision, quotient }
    }

    /// Scales `value` down by the quotient.
    pub fn scale(&self, value: U256) -> f64 {
        let quotient = self.quotient.max(1);
        let (whole, remainder) = value.div_rem(U256::from(quotient));
        u256_to_f64(whole) + remainder.to::<u64>() as f64 / quotient as f64
    }
}

fn u256_to_f64(value: U256) -> f64 {
    value.as_limbs().iter().rev().fold(0.0, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_default_quotient() {
        let scale = ScaleConfig::default();
        // 1 ether in wei
        let one_ether = U256::from(1_000_000_000_000_000_000u64);
        assert_eq!(scale.scale(one_ether), 1_000_000_000_000.0);
        assert_eq!(scale.scale(U256::from(1_500_000u64)), 1.5);
        assert_eq!(scale.scale(U256::ZERO), 0.0);
    }

    #[test]
    fn test_scale_is_lossy_below_resolution() {
        let scale = ScaleConfig::new(2, 1_000_000_000_000_000_000);
        let value = U256::from(1_000_000_000_000_000_001u64);
        assert_eq!(scale.scale(value), 1.0);
    }

    #[test]
    fn test_scale_zero_quotient_is_identity() {
        let scale = ScaleConfig::new(9, 0);
        assert_eq!(scale.scale(U256::from(42u64)), 42.0);
    }

    #[test]
    fn test_scale_beyond_u128() {
        let scale = ScaleConfig::new(1, 1);
        let value = U256::from(1u64) << 200;
        assert_eq!(scale.scale(value), 2f64.powi(200));
    }
}
