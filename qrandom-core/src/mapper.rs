// SPDX-License-Identifier: MIT
//
// Quantum Random SDK: Client for Quantum Randomness Services
// Copyright (c) 2025 Valer Bocan, PhD, CSSLP
// Email: valer.bocan@upt.ro
//
// Department of Computer and Information Technology
// Politehnica University of Timisoara
//
// https://github.com/vbocan/qrandom-sdk

//! Conversion of raw service integers into derived values
//!
//! Everything here is pure: no I/O, no state. The facade fetches raw integers
//! and hands them to these functions.
//!
//! # Known bias
//!
//! [`to_range_value`] folds `|raw|` into the range with a modulo. When the
//! range size does not divide the input domain evenly, low values come up
//! slightly more often than high ones. The formula is kept as-is so results
//! match other clients of the same service; use
//! [`to_range_value_unbiased`] (`RangeMapping::Rejection`) where uniformity
//! matters more than parity.

use crate::{Error, Result, MAX_COUNT};
use serde::{Deserialize, Serialize};

/// Strategy for folding raw integers into an inclusive range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMapping {
    /// `min + |raw| mod range`; biased, matches the service's reference clients
    #[default]
    Modulo,
    /// Rejection sampling over the unsigned 32-bit domain; uniform.
    ///
    /// Over-fetches raw integers (at least `REJECTION_BATCH` per value) and
    /// may spend up to `MAX_REJECTION_ROUNDS` round trips on one call, so it
    /// does not keep the one-request-per-call guarantee of `Modulo`.
    Rejection,
}

/// Ensure a batch size is within `1..=MAX_COUNT`
pub fn validate_count(count: u32) -> Result<()> {
    if count == 0 || count > MAX_COUNT {
        return Err(Error::InvalidArgument(format!(
            "count must be between 1 and {}, got {}",
            MAX_COUNT, count
        )));
    }
    Ok(())
}

/// Ensure `min < max`; equal bounds are rejected too
pub fn validate_range(min: i32, max: i32) -> Result<()> {
    if min >= max {
        return Err(Error::InvalidArgument(format!(
            "min must be less than max, got min={} max={}",
            min, max
        )));
    }
    Ok(())
}

/// Size of the inclusive range `[min, max]`; up to 2^32
fn range_size(min: i32, max: i32) -> u64 {
    (i64::from(max) - i64::from(min) + 1) as u64
}

/// Map a raw integer into `[min, max]` as `min + (|raw| mod (max - min + 1))`.
///
/// Arithmetic is done in 64 bits, so `raw = i32::MIN` and the full `i32`
/// range are handled without overflow. Returns `InvalidArgument` unless
/// `min < max`.
pub fn to_range_value(raw: i32, min: i32, max: i32) -> Result<i32> {
    validate_range(min, max)?;
    let range = i64::from(max) - i64::from(min) + 1;
    let offset = i64::from(raw).abs() % range;
    Ok((i64::from(min) + offset) as i32)
}

/// Map every acceptable raw integer into `[min, max]` without modulo bias,
/// preserving order.
///
/// Each raw value is reinterpreted as `u32`; values at or above the largest
/// multiple of the range size that fits in 2^32 are skipped, so the result
/// may be shorter than `raws`. Returns `InvalidArgument` unless `min < max`.
pub fn accept_unbiased(raws: &[i32], min: i32, max: i32) -> Result<Vec<i32>> {
    validate_range(min, max)?;
    let range = range_size(min, max);
    let domain = u64::from(u32::MAX) + 1;
    let zone = domain - domain % range;

    Ok(raws
        .iter()
        .map(|&raw| u64::from(raw as u32))
        .filter(|&value| value < zone)
        .map(|value| (i64::from(min) + (value % range) as i64) as i32)
        .collect())
}

/// First value [`accept_unbiased`] would produce; `Ok(None)` when every
/// candidate is rejected.
pub fn to_range_value_unbiased(raws: &[i32], min: i32, max: i32) -> Result<Option<i32>> {
    Ok(accept_unbiased(raws, min, max)?.first().copied())
}

/// Map a raw integer to `[0.0, 1.0]` by reading its bits as `u32`
/// and dividing by `u32::MAX`.
pub fn to_unit_float(raw: i32) -> f64 {
    f64::from(raw as u32) / f64::from(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_example() {
        assert_eq!(to_range_value(2_147_483_647, 1, 100).unwrap(), 48);
    }

    #[test]
    fn test_negative_raw_uses_absolute_value() {
        assert_eq!(to_range_value(-7, 0, 4).unwrap(), 2);
        assert_eq!(to_range_value(7, 0, 4).unwrap(), 2);
    }

    #[test]
    fn test_min_raw_does_not_overflow() {
        // |i32::MIN| = 2^31
        assert_eq!(to_range_value(i32::MIN, 0, 9).unwrap(), 8);
        assert_eq!(to_range_value(i32::MIN, i32::MIN, i32::MAX).unwrap(), 0);
    }

    #[test]
    fn test_full_domain_range() {
        assert_eq!(to_range_value(0, i32::MIN, i32::MAX).unwrap(), i32::MIN);
        assert_eq!(to_range_value(i32::MAX, i32::MIN, i32::MAX).unwrap(), -1);
    }

    #[test]
    fn test_unit_float_bounds() {
        assert_eq!(to_unit_float(0), 0.0);
        assert_eq!(to_unit_float(-1), 1.0);
        assert!(to_unit_float(-2) < 1.0);
        assert!((to_unit_float(i32::MIN) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count(1).is_ok());
        assert!(validate_count(1000).is_ok());
        assert!(matches!(validate_count(0), Err(Error::InvalidArgument(_))));
        assert!(matches!(validate_count(1001), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(1, 2).is_ok());
        assert!(matches!(validate_range(5, 5), Err(Error::InvalidArgument(_))));
        assert!(matches!(validate_range(6, 5), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_unbiased_skips_values_in_tail() {
        // range 3: zone = 2^32 - 1, so u32::MAX (-1) is the only rejected value
        assert_eq!(to_range_value_unbiased(&[-1, 4], 0, 2).unwrap(), Some(1));
        assert_eq!(to_range_value_unbiased(&[-1, -1], 0, 2).unwrap(), None);
        assert_eq!(to_range_value_unbiased(&[], 0, 2).unwrap(), None);
    }

    #[test]
    fn test_unbiased_full_domain_accepts_everything() {
        assert_eq!(to_range_value_unbiased(&[-1], i32::MIN, i32::MAX).unwrap(), Some(i32::MAX));
        assert_eq!(to_range_value_unbiased(&[0], i32::MIN, i32::MAX).unwrap(), Some(i32::MIN));
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        // max + 1 == min would make the range size zero
        assert!(matches!(to_range_value(5, 10, 9), Err(Error::InvalidArgument(_))));
        assert!(matches!(to_range_value(5, 3, 3), Err(Error::InvalidArgument(_))));
        assert!(matches!(to_range_value(5, 100, -100), Err(Error::InvalidArgument(_))));
        assert!(matches!(accept_unbiased(&[1, 2], 10, 9), Err(Error::InvalidArgument(_))));
        assert!(matches!(to_range_value_unbiased(&[1], 4, 4), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_accept_unbiased_keeps_order_and_drops_tail() {
        assert_eq!(accept_unbiased(&[4, -1, 5, 6], 0, 2).unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn test_range_mapping_default() {
        assert_eq!(RangeMapping::default(), RangeMapping::Modulo);
    }

    proptest! {
        #[test]
        fn prop_range_value_within_bounds(raw in any::<i32>(), a in any::<i32>(), b in any::<i32>()) {
            prop_assume!(a != b);
            let (min, max) = if a < b { (a, b) } else { (b, a) };
            let value = to_range_value(raw, min, max).unwrap();
            prop_assert!(value >= min && value <= max);
        }

        #[test]
        fn prop_unbiased_value_within_bounds(raws in proptest::collection::vec(any::<i32>(), 1..8), min in -1000i32..1000, span in 1i32..5000) {
            let max = min + span;
            for value in accept_unbiased(&raws, min, max).unwrap() {
                prop_assert!(value >= min && value <= max);
            }
        }

        #[test]
        fn prop_unit_float_within_bounds(raw in any::<i32>()) {
            let value = to_unit_float(raw);
            prop_assert!((0.0..=1.0).contains(&value));
        }
    }
}
