use serde::{Deserialize, Serialize};

use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(quantity: f64, unit_price: f64) -> Self {
        LineItem { quantity, unit_price }
    }

    pub fn line_total(&self) -> Money {
        Money::new(self.quantity * self.unit_price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    #[default]
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscountSpec {
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: DiscountKind,
}

impl DiscountSpec {
    pub fn none() -> Self {
        DiscountSpec::default()
    }

    pub fn percentage(value: f64) -> Self {
        DiscountSpec { value, kind: DiscountKind::Percentage }
    }

    pub fn fixed(value: f64) -> Self {
        DiscountSpec { value, kind: DiscountKind::Fixed }
    }

    /// Discount owed on `subtotal`. On a non-negative subtotal it never
    /// exceeds the subtotal; a negative subtotal (a credit) is left unclamped.
    pub fn amount_on(&self, subtotal: Money) -> Money {
        let raw = match self.kind {
            DiscountKind::Percentage => subtotal.percent(self.value),
            DiscountKind::Fixed => Money::new(self.value),
        };
        if subtotal.value() >= 0.0 {
            raw.min(subtotal)
        } else {
            raw
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub taxable_amount: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
}

/// Computes invoice totals. `tax_rate` is a percentage (`13.0` = 13%) and is
/// charged on the amount left after the discount.
///
/// The subtotal is rounded after every line is added rather than once at the
/// end, so it matches what the server stores to the cent.
pub fn calculate_totals(items: &[LineItem], discount: DiscountSpec, tax_rate: f64) -> InvoiceTotals {
    let subtotal = items
        .iter()
        .map(LineItem::line_total)
        .fold(Money::zero(), |acc, line| acc + line);

    let discount_amount = discount.amount_on(subtotal);
    let taxable_amount = subtotal - discount_amount;
    let tax_amount = taxable_amount.percent(tax_rate);
    let total_amount = taxable_amount + tax_amount;

    InvoiceTotals {
        subtotal,
        discount_amount,
        taxable_amount,
        tax_amount,
        total_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(t: &InvoiceTotals) -> [f64; 5] {
        [
            t.subtotal.value(),
            t.discount_amount.value(),
            t.taxable_amount.value(),
            t.tax_amount.value(),
            t.total_amount.value(),
        ]
    }

    #[test]
    fn cascade_rounding_example() {
        let items = [LineItem::new(3.0, 10.333), LineItem::new(1.0, 0.004)];
        let totals = calculate_totals(&items, DiscountSpec::percentage(10.0), 13.0);
        assert_eq!(values(&totals), [31.0, 3.1, 27.9, 3.63, 31.53]);
    }

    #[test]
    fn no_items_is_all_zero() {
        let totals = calculate_totals(&[], DiscountSpec::none(), 13.0);
        assert_eq!(values(&totals), [0.0; 5]);
    }

    #[test]
    fn fixed_discount() {
        let items = [LineItem::new(2.0, 50.0)];
        let totals = calculate_totals(&items, DiscountSpec::fixed(15.0), 10.0);
        assert_eq!(values(&totals), [100.0, 15.0, 85.0, 8.5, 93.5]);
    }

    #[test]
    fn fixed_discount_clamped_to_subtotal() {
        let items = [LineItem::new(1.0, 40.0)];
        let totals = calculate_totals(&items, DiscountSpec::fixed(60.0), 13.0);
        assert_eq!(totals.discount_amount.value(), 40.0);
        assert_eq!(totals.taxable_amount.value(), 0.0);
        assert_eq!(totals.tax_amount.value(), 0.0);
        assert_eq!(totals.total_amount.value(), 0.0);
    }

    #[test]
    fn percentage_over_hundred_clamped() {
        let items = [LineItem::new(1.0, 20.0)];
        let totals = calculate_totals(&items, DiscountSpec::percentage(150.0), 0.0);
        assert_eq!(totals.discount_amount.value(), 20.0);
        assert_eq!(totals.total_amount.value(), 0.0);
    }

    #[test]
    fn tax_is_charged_after_discount() {
        let items = [LineItem::new(1.0, 200.0)];
        let totals = calculate_totals(&items, DiscountSpec::percentage(50.0), 10.0);
        assert_eq!(totals.tax_amount.value(), 10.0); // not 20.0
    }

    #[test]
    fn line_totals_round_individually() {
        // 3 × 0.335 = 1.005 → 1.01 per line; two lines → 2.02
        let items = [LineItem::new(3.0, 0.335), LineItem::new(3.0, 0.335)];
        let totals = calculate_totals(&items, DiscountSpec::none(), 0.0);
        assert_eq!(items[0].line_total().value(), 1.01);
        assert_eq!(totals.subtotal.value(), 2.02);
    }

    #[test]
    fn negative_inputs_pass_through() {
        let items = [LineItem::new(1.0, -10.0)];
        let totals = calculate_totals(&items, DiscountSpec::none(), 10.0);
        assert_eq!(totals.subtotal.value(), -10.0);
        assert_eq!(totals.tax_amount.value(), -1.0);
        assert_eq!(totals.total_amount.value(), -11.0);
    }

    #[test]
    fn credit_lines_keep_their_tax() {
        let items = [LineItem::new(1.0, -10.25)];
        let totals = calculate_totals(&items, DiscountSpec::none(), 50.0);
        assert_eq!(values(&totals), [-10.25, 0.0, -10.25, -5.12, -15.37]);
    }

    #[test]
    fn percentage_discount_on_credit_is_signed() {
        let items = [LineItem::new(2.0, -50.0)];
        let totals = calculate_totals(&items, DiscountSpec::percentage(10.0), 10.0);
        assert_eq!(values(&totals), [-100.0, -10.0, -90.0, -9.0, -99.0]);
    }

    #[test]
    fn discount_spec_deserializes_with_type_key() {
        let spec: DiscountSpec = serde_json::from_str(r#"{"value":5,"type":"fixed"}"#).unwrap();
        assert_eq!(spec, DiscountSpec::fixed(5.0));
    }

    #[test]
    fn totals_serialize_camel_case() {
        let totals = calculate_totals(&[LineItem::new(1.0, 10.0)], DiscountSpec::none(), 13.0);
        let value = serde_json::to_value(totals).unwrap();
        assert_eq!(value["taxAmount"], 1.3);
        assert_eq!(value["totalAmount"], 11.3);
    }
}
