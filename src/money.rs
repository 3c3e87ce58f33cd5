// src/money.rs
//! Fixed-point money arithmetic for the single implied currency.
//!
//! All amounts inside the engine are `i64` minor units (e.g. paise). Floats
//! exist only at the display edge, the same way the teacher converts between
//! internal and display amounts per asset.

use serde::{Deserialize, Serialize};

/// Minor units per display unit (two decimal places).
pub const MINOR_UNITS: i64 = 100;

/// Convert a display amount (e.g. rupees) to minor units.
pub fn to_internal(display_amount: f64) -> i64 {
    (display_amount * MINOR_UNITS as f64).round() as i64
}

/// Convert minor units back to a display amount.
pub fn to_display(internal_amount: i64) -> f64 {
    internal_amount as f64 / MINOR_UNITS as f64
}

/// Split `total` into `parts` shares differing by at most one minor unit,
/// summing exactly to `total`. Earlier shares absorb the remainder.
///
/// This is what keeps conservation an equality: a 1000/3 split yields
/// [334, 333, 333] instead of three drifting thirds.
pub fn split_equal(total: i64, parts: usize) -> Vec<i64> {
    let n = parts as i64;
    let base = total.div_euclid(n);
    let remainder = total.rem_euclid(n) as usize;

    (0..parts)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// An interest rate in basis points. `Rate::from_percent(2.0)` is 2% = 200 bps.
///
/// Rate math stays in integers: `rate.of(amount)` is `amount * bps / 10_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    bps: u32,
}

impl Rate {
    pub const ZERO: Rate = Rate { bps: 0 };

    pub fn from_bps(bps: u32) -> Self {
        Self { bps }
    }

    pub fn from_percent(percent: f64) -> Self {
        Self {
            bps: (percent * 100.0).round() as u32,
        }
    }

    pub fn bps(&self) -> u32 {
        self.bps
    }

    pub fn as_percent(&self) -> f64 {
        self.bps as f64 / 100.0
    }

    /// Apply this rate to an amount, truncating toward zero.
    pub fn of(&self, amount: i64) -> i64 {
        (amount as i128 * self.bps as i128 / 10_000) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_exact() {
        assert_eq!(split_equal(3000_00, 3), vec![1000_00, 1000_00, 1000_00]);
    }

    #[test]
    fn test_split_with_remainder() {
        let shares = split_equal(1000_00, 3);
        assert_eq!(shares.iter().sum::<i64>(), 1000_00);
        assert_eq!(shares, vec![333_34, 333_33, 333_33]);
    }

    #[test]
    fn test_split_sums_to_total() {
        for parts in 1..=17 {
            let shares = split_equal(99_999, parts);
            assert_eq!(shares.len(), parts);
            assert_eq!(shares.iter().sum::<i64>(), 99_999);
            let max = shares.iter().max().unwrap();
            let min = shares.iter().min().unwrap();
            assert!(max - min <= 1);
        }
    }

    #[test]
    fn test_rate_of() {
        let rate = Rate::from_percent(2.0);
        assert_eq!(rate.bps(), 200);
        assert_eq!(rate.of(100_000_00), 2_000_00);
        assert_eq!(Rate::ZERO.of(100_000_00), 0);
    }

    #[test]
    fn test_display_conversion() {
        assert_eq!(to_internal(100.50), 100_50);
        assert_eq!(to_display(100_50), 100.50);
    }
}
