use rust_decimal::Decimal;
use sensora_catalog::ProductRef;
use serde::{Deserialize, Serialize};

use crate::{CartError, CartResult};

/// One line of a cart: a generic product reference plus quantity and the
/// line total cached at the last explicit (re)pricing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    pub id: i64,
    pub customer_id: i64,
    pub cart_id: i64,
    pub product: ProductRef,
    pub qty: i32,
    pub total_price: Decimal,
}

impl CartLine {
    /// A valid line's total is unit price times quantity. Nothing recomputes
    /// this implicitly; callers reprice on their own schedule.
    pub fn line_total(unit_price: Decimal, qty: i32) -> Decimal {
        unit_price * Decimal::from(qty)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCartLine {
    pub product: ProductRef,
    #[serde(default = "default_qty")]
    pub qty: i32,
}

fn default_qty() -> i32 {
    1
}

/// A customer's cart. `total_products` and `total_price` are denormalized
/// caches over the line set, refreshed only by [`Cart::recompute_totals`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    pub id: i64,
    pub owner_id: i64,
    pub lines: Vec<CartLine>,
    pub total_products: i32,
    pub total_price: Decimal,
}

impl Cart {
    pub fn empty(id: i64, owner_id: i64) -> Self {
        Self {
            id,
            owner_id,
            lines: Vec::new(),
            total_products: 0,
            total_price: Decimal::ZERO,
        }
    }

    /// Refresh the denormalized totals from the current line set.
    pub fn recompute_totals(&mut self) {
        self.total_products = self.lines.iter().map(|line| line.qty).sum();
        self.total_price = self.lines.iter().map(|line| line.total_price).sum();
    }
}

pub fn validate_qty(qty: i32) -> CartResult<()> {
    if qty < 1 {
        return Err(CartError::InvalidQuantity(qty));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensora_catalog::ProductKind;

    fn line(id: i64, qty: i32, total: Decimal) -> CartLine {
        CartLine {
            id,
            customer_id: 1,
            cart_id: 1,
            product: ProductRef {
                kind: ProductKind::TemperatureSensor,
                id,
            },
            qty,
            total_price: total,
        }
    }

    #[test]
    fn test_line_total() {
        let unit = Decimal::new(125_050, 2); // 1250.50
        assert_eq!(CartLine::line_total(unit, 1), Decimal::new(125_050, 2));
        assert_eq!(CartLine::line_total(unit, 3), Decimal::new(375_150, 2));
    }

    #[test]
    fn test_recompute_totals() {
        let mut cart = Cart::empty(1, 1);
        cart.lines.push(line(1, 2, Decimal::new(20_000, 2)));
        cart.lines.push(line(2, 1, Decimal::new(5_000, 2)));

        assert_eq!(cart.total_products, 0);
        cart.recompute_totals();
        assert_eq!(cart.total_products, 3);
        assert_eq!(cart.total_price, Decimal::new(25_000, 2));
    }

    #[test]
    fn test_qty_change_does_not_touch_totals() {
        let mut cart = Cart::empty(1, 1);
        cart.lines.push(line(1, 1, Decimal::new(10_000, 2)));
        cart.recompute_totals();

        // Mutating a line leaves the caches stale until the next explicit
        // recompute; no trigger exists anywhere.
        cart.lines[0].qty = 3;
        assert_eq!(cart.total_products, 1);
        assert_eq!(cart.total_price, Decimal::new(10_000, 2));

        cart.lines[0].total_price = CartLine::line_total(Decimal::new(10_000, 2), 3);
        cart.recompute_totals();
        assert_eq!(cart.total_products, 3);
        assert_eq!(cart.total_price, Decimal::new(30_000, 2));
    }

    #[test]
    fn test_qty_validation() {
        assert!(validate_qty(1).is_ok());
        assert!(validate_qty(7).is_ok());
        assert!(matches!(validate_qty(0), Err(CartError::InvalidQuantity(0))));
        assert!(validate_qty(-2).is_err());
    }
}
