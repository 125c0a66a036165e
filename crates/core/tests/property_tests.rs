//! Property-based tests for the money and invoice arithmetic.
//!
//! Run with: cargo test -p ledgerdesk-core --test `property_tests`

use ledgerdesk_core::{calculate_totals, round2, DiscountSpec, LineItem};
use proptest::prelude::*;

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_amount() -> impl Strategy<Value = f64> {
    (-100_000_000i64..100_000_000i64).prop_map(|n| n as f64 / 1000.0)
}

fn arb_line_item() -> impl Strategy<Value = LineItem> {
    (0u32..50u32, 0i64..1_000_000i64)
        .prop_map(|(qty, price)| LineItem::new(f64::from(qty), price as f64 / 1000.0))
}

fn arb_signed_line_item() -> impl Strategy<Value = LineItem> {
    (0u32..50u32, -1_000_000i64..1_000_000i64)
        .prop_map(|(qty, price)| LineItem::new(f64::from(qty), price as f64 / 1000.0))
}

fn arb_discount() -> impl Strategy<Value = DiscountSpec> {
    prop_oneof![
        (0u32..=100u32).prop_map(|p| DiscountSpec::percentage(f64::from(p))),
        (0i64..2_000_000i64).prop_map(|c| DiscountSpec::fixed(c as f64 / 100.0)),
    ]
}

fn arb_tax_rate() -> impl Strategy<Value = f64> {
    (0u32..=300u32).prop_map(|r| f64::from(r) / 10.0)
}

// ============================================================================
// Rounding
// ============================================================================

proptest! {
    #[test]
    fn round2_is_idempotent(x in arb_amount()) {
        let once = round2(x);
        prop_assert_eq!(round2(once), once);
    }

    #[test]
    fn round2_moves_at_most_half_a_cent(x in arb_amount()) {
        prop_assert!((round2(x) - x).abs() <= 0.005 + 1e-9);
    }
}

// ============================================================================
// Invoice totals
// ============================================================================

proptest! {
    #[test]
    fn totals_are_internally_consistent(
        items in prop::collection::vec(arb_line_item(), 0..12),
        discount in arb_discount(),
        tax_rate in arb_tax_rate(),
    ) {
        let t = calculate_totals(&items, discount, tax_rate);
        let subtotal = t.subtotal.value();
        let discount_amount = t.discount_amount.value();
        let taxable = t.taxable_amount.value();
        let tax = t.tax_amount.value();
        let total = t.total_amount.value();

        prop_assert!(discount_amount <= subtotal);
        prop_assert_eq!(taxable, round2(subtotal - discount_amount));
        prop_assert_eq!(total, round2(taxable + tax));
    }

    #[test]
    fn every_total_is_already_rounded(
        items in prop::collection::vec(arb_line_item(), 0..12),
        discount in arb_discount(),
        tax_rate in arb_tax_rate(),
    ) {
        let t = calculate_totals(&items, discount, tax_rate);
        for v in [
            t.subtotal.value(),
            t.discount_amount.value(),
            t.taxable_amount.value(),
            t.tax_amount.value(),
            t.total_amount.value(),
        ] {
            prop_assert_eq!(round2(v), v);
        }
    }

    #[test]
    fn signed_totals_follow_the_subtotal(
        items in prop::collection::vec(arb_signed_line_item(), 0..12),
        tax_rate in arb_tax_rate(),
    ) {
        let t = calculate_totals(&items, DiscountSpec::none(), tax_rate);
        let subtotal = t.subtotal.value();

        prop_assert_eq!(t.discount_amount.value(), 0.0);
        prop_assert_eq!(t.taxable_amount.value(), subtotal);
        prop_assert_eq!(t.total_amount.value(), round2(subtotal + t.tax_amount.value()));
        if subtotal < 0.0 {
            prop_assert!(t.tax_amount.value() <= 0.0);
            prop_assert!(t.total_amount.value() <= subtotal);
        }
    }

    #[test]
    fn subtotal_rounds_after_each_line(items in prop::collection::vec(arb_line_item(), 0..12)) {
        let expected = items
            .iter()
            .fold(0.0, |acc, item| round2(acc + round2(item.quantity * item.unit_price)));
        let t = calculate_totals(&items, DiscountSpec::none(), 0.0);
        prop_assert_eq!(t.subtotal.value(), expected);
    }
}
