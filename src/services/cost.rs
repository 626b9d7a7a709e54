// src/services/cost.rs
use crate::models::Tariff;
use rust_decimal::Decimal;
use tracing::warn;

/// Characters covered by one billing unit.
pub const UNIT_CHARS: usize = 160;

/// Number of billing units for a text of `text_len` characters.
///
/// Every started block of 160 characters is one unit, and an empty text
/// still costs one: 0..=160 -> 1, 161..=320 -> 2.
pub fn billing_units(text_len: usize) -> u64 {
    (text_len / UNIT_CHARS) as u64 + 1
}

/// Units times the tariff price. A product outside the `Decimal` range
/// saturates at `Decimal::MAX` (or `Decimal::MIN` for a negative price).
pub fn calculate_cost(text_len: usize, tariff: &Tariff) -> Decimal {
    let units = billing_units(text_len);

    Decimal::from(units)
        .checked_mul(tariff.cost)
        .unwrap_or_else(|| {
            warn!(
                tariff_id = %tariff.id,
                units,
                unit_cost = %tariff.cost,
                "Cost overflowed, saturating"
            );
            if tariff.cost.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unit_boundaries() {
        assert_eq!(billing_units(0), 1);
        assert_eq!(billing_units(1), 1);
        assert_eq!(billing_units(159), 1);
        assert_eq!(billing_units(160), 1);
        assert_eq!(billing_units(161), 2);
        assert_eq!(billing_units(320), 2);
        assert_eq!(billing_units(321), 3);
    }

    #[test]
    fn test_cost_multiplies_unit_price() {
        let tariff = Tariff::new("beeline", "Beeline", dec!(3.5));
        assert_eq!(calculate_cost(200, &tariff), dec!(7.0));
        assert_eq!(calculate_cost(0, &tariff), dec!(3.5));
    }

    #[test]
    fn test_zero_priced_tariff() {
        let tariff = Tariff::new("promo", "Promo", Decimal::ZERO);
        assert_eq!(calculate_cost(1000, &tariff), Decimal::ZERO);
    }

    #[test]
    fn test_overflow_saturates() {
        let tariff = Tariff::new("big", "Big", Decimal::MAX);
        assert_eq!(calculate_cost(200, &tariff), Decimal::MAX);
        assert_eq!(calculate_cost(0, &tariff), Decimal::MAX);

        let refund = Tariff::new("refund", "Refund", Decimal::MIN);
        assert_eq!(calculate_cost(500, &refund), Decimal::MIN);
    }

    proptest! {
        #[test]
        fn prop_units_follow_floor_rule(len in 0usize..100_000) {
            prop_assert_eq!(billing_units(len), (len / 160) as u64 + 1);
        }

        #[test]
        fn prop_units_never_decrease(len in 0usize..100_000) {
            prop_assert!(billing_units(len + 1) >= billing_units(len));
        }

        #[test]
        fn prop_cost_is_units_times_price(len in 0usize..10_000, cents in 0i64..100_000) {
            let tariff = Tariff::new("op", "Operator", Decimal::new(cents, 2));
            let expected = Decimal::from(billing_units(len)) * Decimal::new(cents, 2);
            prop_assert_eq!(calculate_cost(len, &tariff), expected);
        }
    }
}
