//! Unsigned fixed-point decimal arithmetic for the reward index.
//!
//! The reward index accumulates reward-per-unit-staked across funding events,
//! so it must carry enough fractional precision that repeated small fundings
//! do not systematically lose dust. Values are scaled integers (`u128` raw
//! units, 18 fractional digits) — never floating point, which would break the
//! monotonicity and no-double-counting invariants under accumulated rounding.
//!
//! Products of two 128-bit operands need a 256-bit intermediate; the helpers
//! at the bottom implement the full-width multiply and the shift-subtract
//! divide over 64-bit limbs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scaling factor between raw units and whole units: 10^18.
const SCALE: u128 = 1_000_000_000_000_000_000;

/// An unsigned fixed-point decimal with 18 fractional digits.
///
/// All operations are checked: `None` signals overflow (or a zero divisor),
/// never a silently wrapped value.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(u128);

impl Decimal {
    pub const ZERO: Self = Self(0);

    /// Construct from raw scaled units (value × 10^18).
    pub fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Construct from a whole number of units.
    pub fn from_int(n: u128) -> Option<Self> {
        n.checked_mul(SCALE).map(Self)
    }

    /// The raw scaled representation.
    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Exact fixed-point division: ⌊numerator × 10^18 / denominator⌋.
    ///
    /// `None` when the denominator is zero or the result exceeds the
    /// representable range.
    pub fn from_ratio(numerator: u128, denominator: u128) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        mul_div_floor(numerator, SCALE, denominator).map(Self)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Multiply by an integer and truncate toward zero: ⌊self × n⌋.
    ///
    /// This is the settlement rounding contract — accrued reward units are
    /// floored so depositors never receive units the pool cannot cover.
    pub fn floor_mul_int(self, n: u128) -> Option<u128> {
        mul_div_floor(self.0, n, SCALE)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / SCALE;
        let frac = self.0 % SCALE;
        if frac == 0 {
            write!(f, "{int}")
        } else {
            let digits = format!("{frac:018}");
            write!(f, "{}.{}", int, digits.trim_end_matches('0'))
        }
    }
}

/// ⌊a × b / d⌋ with a full 256-bit intermediate product.
///
/// `None` when `d == 0` or the quotient exceeds `u128::MAX`.
fn mul_div_floor(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    let (hi, lo) = mul_wide(a, b);
    if hi == 0 {
        return Some(lo / d);
    }
    if hi >= d {
        // quotient would need more than 128 bits
        return None;
    }
    Some(div_wide(hi, lo, d))
}

/// Full 128×128 → 256-bit product as (high, low) halves, via 64-bit limbs.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = (1u128 << 64) - 1;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    // carry column: bits 64..128 of the partial sums
    let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);

    let lo = (mid << 64) | (ll & MASK);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}

/// 256-bit ÷ 128-bit shift-subtract division. Requires `hi < d`, which
/// guarantees the quotient fits in 128 bits.
fn div_wide(hi: u128, lo: u128, d: u128) -> u128 {
    debug_assert!(hi < d);
    let mut rem = hi;
    let mut quot = 0u128;
    for i in (0..128).rev() {
        // The shifted remainder can exceed 128 bits by exactly one bit;
        // that carry bit alone already makes it >= d.
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> i) & 1);
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quot |= 1 << i;
        }
    }
    quot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_ratio_exact_division() {
        let d = Decimal::from_ratio(1, 2).unwrap();
        assert_eq!(d.raw(), SCALE / 2);
        assert_eq!(d.to_string(), "0.5");
    }

    #[test]
    fn from_ratio_truncates_repeating_fraction() {
        let third = Decimal::from_ratio(1, 3).unwrap();
        assert_eq!(third.raw(), 333_333_333_333_333_333);
    }

    #[test]
    fn from_ratio_zero_denominator_is_none() {
        assert!(Decimal::from_ratio(1, 0).is_none());
    }

    #[test]
    fn from_ratio_survives_wide_intermediate() {
        // numerator × 10^18 overflows u128 on its own, but the quotient fits
        let num = 10u128.pow(30);
        let d = Decimal::from_ratio(num, 10u128.pow(12)).unwrap();
        assert_eq!(d, Decimal::from_int(10u128.pow(18)).unwrap());
    }

    #[test]
    fn from_ratio_overflowing_quotient_is_none() {
        assert!(Decimal::from_ratio(u128::MAX, 1).is_none());
    }

    #[test]
    fn floor_mul_int_truncates_toward_zero() {
        let third = Decimal::from_ratio(1, 3).unwrap();
        assert_eq!(third.floor_mul_int(1).unwrap(), 0);
        assert_eq!(third.floor_mul_int(3).unwrap(), 0); // 0.999... floors to 0
        assert_eq!(third.floor_mul_int(4).unwrap(), 1);
    }

    #[test]
    fn floor_mul_int_round_trips_exact_ratio() {
        // 100 rewards over 1_000_000 staked, accrued back over the full stake
        let idx = Decimal::from_ratio(100, 1_000_000).unwrap();
        assert_eq!(idx.floor_mul_int(1_000_000).unwrap(), 100);
    }

    #[test]
    fn floor_mul_int_handles_large_stakes() {
        let idx = Decimal::from_ratio(1, 10u128.pow(12)).unwrap();
        // 10^24 staked units at 10^-12 reward per unit
        assert_eq!(idx.floor_mul_int(10u128.pow(24)).unwrap(), 10u128.pow(12));
    }

    #[test]
    fn checked_add_and_sub() {
        let a = Decimal::from_int(2).unwrap();
        let b = Decimal::from_int(1).unwrap();
        assert_eq!(a.checked_add(b).unwrap(), Decimal::from_int(3).unwrap());
        assert_eq!(a.checked_sub(b).unwrap(), Decimal::from_int(1).unwrap());
        assert!(b.checked_sub(a).is_none());
        assert!(Decimal::from_raw(u128::MAX).checked_add(Decimal::from_raw(1)).is_none());
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Decimal::from_int(7).unwrap().to_string(), "7");
        assert_eq!(Decimal::from_ratio(1, 4).unwrap().to_string(), "0.25");
        assert_eq!(
            Decimal::from_ratio(1, 3).unwrap().to_string(),
            "0.333333333333333333"
        );
    }

    #[test]
    fn smallest_raw_unit_carries_full_precision() {
        assert_eq!(Decimal::from_raw(1).to_string(), "0.000000000000000001");
    }

    #[test]
    fn mul_wide_known_values() {
        assert_eq!(mul_wide(0, u128::MAX), (0, 0));
        assert_eq!(mul_wide(1, u128::MAX), (0, u128::MAX));
        // (2^128 - 1)^2 = 2^256 - 2^129 + 1
        assert_eq!(mul_wide(u128::MAX, u128::MAX), (u128::MAX - 1, 1));
        // 2^64 * 2^64 = 2^128
        assert_eq!(mul_wide(1 << 64, 1 << 64), (1, 0));
    }

    #[test]
    fn div_wide_inverts_mul_wide() {
        let cases: &[(u128, u128)] = &[
            (u128::MAX, 3),
            (10u128.pow(30), SCALE),
            (1 << 127, (1 << 96) + 17),
            (123_456_789_012_345_678_901_234_567_890, 997),
        ];
        for &(a, d) in cases {
            // (a * d) / d == a, exactly
            assert_eq!(mul_div_floor(a, d, d).unwrap(), a, "a={a} d={d}");
        }
    }

    #[test]
    fn mul_div_floor_agrees_with_narrow_path() {
        // small operands take the hi == 0 fast path; cross-check a wide case
        // against the same quotient computed with reduced operands
        assert_eq!(mul_div_floor(1_000_000, SCALE, 4).unwrap(), 250_000 * SCALE);
        assert_eq!(
            mul_div_floor(10u128.pow(25), SCALE, 10u128.pow(25)).unwrap(),
            SCALE
        );
    }
}
