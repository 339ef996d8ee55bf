use super::account::Amount;
use super::product::{Product, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One cart line: how many units at the price seen when the line was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub quantity: u32,
    pub unit_price: Amount,
}

/// The ephemeral, per-customer cart: a pure in-memory reducer keyed by
/// product id. No store access, replayable, and serializable so a
/// collaborator can rehydrate it from persisted client state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: HashMap<ProductId, CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to the quantity of the product's line, creating the line
    /// (with the product's current price) when absent. Quantities clamp at
    /// zero and a line reaching zero is removed entirely, so decrementing an
    /// absent line is a no-op.
    pub fn adjust_quantity(&mut self, product: &Product, delta: i64) {
        let current = self
            .lines
            .get(&product.id)
            .map_or(0, |line| i64::from(line.quantity));
        let next = (current + delta).max(0);
        if next == 0 {
            self.lines.remove(&product.id);
        } else {
            let line = self.lines.entry(product.id).or_insert(CartLine {
                quantity: 0,
                unit_price: product.price,
            });
            line.quantity = next as u32;
        }
    }

    /// The running total, always recomputed from the lines.
    pub fn amount(&self) -> u64 {
        self.lines
            .values()
            .map(|line| line.unit_price.value() * u64::from(line.quantity))
            .sum()
    }

    pub fn lines(&self) -> impl Iterator<Item = (&ProductId, &CartLine)> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: u64) -> Product {
        Product::new("Widget", Amount::new(price).unwrap(), "A widget", "widget.png")
    }

    #[test]
    fn test_amount_tracks_lines() {
        let a = product(500);
        let b = product(1000);
        let mut cart = Cart::new();

        cart.adjust_quantity(&a, 2);
        cart.adjust_quantity(&b, 1);
        assert_eq!(cart.amount(), 2000);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_zero_quantity_removes_line() {
        let a = product(500);
        let mut cart = Cart::new();

        cart.adjust_quantity(&a, 3);
        cart.adjust_quantity(&a, -3);
        assert!(cart.is_empty());
        assert_eq!(cart.amount(), 0);
    }

    #[test]
    fn test_quantity_never_negative() {
        let a = product(500);
        let mut cart = Cart::new();

        cart.adjust_quantity(&a, 1);
        cart.adjust_quantity(&a, -5);
        assert!(cart.is_empty());

        // Decrementing an absent line is a no-op.
        cart.adjust_quantity(&a, -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_line_keeps_price_snapshot() {
        let mut a = product(500);
        let mut cart = Cart::new();

        cart.adjust_quantity(&a, 1);
        // A later price change does not touch the existing line.
        a.price = Amount::new(900).unwrap();
        cart.adjust_quantity(&a, 1);
        assert_eq!(cart.amount(), 1000);
    }
}
