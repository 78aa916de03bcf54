use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::catalog::{serialize_amount, Product, PRICE_SCALE};
use super::errors::DomainError;

/// Quantity map of one shopper's cart, in insertion order.
///
/// Every stored quantity is strictly positive. Entries leave the map only by
/// removal, never by dropping their quantity to zero. Products are referenced
/// by id and re-resolved against the catalog on every read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartEntry {
    pub product_id: i32,
    pub quantity: i32,
}

/// A priced line, derived from the catalog at read time.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartLine {
    pub product_id: i32,
    pub name: String,
    #[schema(value_type = String, example = "9.99")]
    #[serde(serialize_with = "serialize_amount")]
    pub price: BigDecimal,
    pub quantity: i32,
    #[schema(value_type = String, example = "19.98")]
    #[serde(serialize_with = "serialize_amount")]
    pub subtotal: BigDecimal,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartSummary {
    pub items: Vec<CartLine>,
    #[schema(value_type = String, example = "19.98")]
    #[serde(serialize_with = "serialize_amount")]
    pub total: BigDecimal,
    /// Number of distinct products in the cart, regardless of their quantities.
    pub items_count: usize,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RemoveItemRequest {
    pub product_id: i32,
}

fn check_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::invalid("quantity", "must be greater than 0"));
    }
    Ok(())
}

impl CartLine {
    pub fn new(product: &Product, quantity: i32) -> Self {
        let subtotal = (&product.price * &BigDecimal::from(quantity)).with_scale(PRICE_SCALE);
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price.with_scale(PRICE_SCALE),
            quantity,
            subtotal,
            image_url: product.image_url.clone(),
        }
    }
}

impl CartSummary {
    pub fn from_lines(items: Vec<CartLine>) -> Self {
        let total = items
            .iter()
            .fold(BigDecimal::zero(), |acc, line| acc + &line.subtotal)
            .with_scale(PRICE_SCALE);
        Self {
            items_count: items.len(),
            items,
            total,
        }
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn quantity_of(&self, product_id: i32) -> Option<i32> {
        self.position(product_id).map(|i| self.entries[i].quantity)
    }

    fn position(&self, product_id: i32) -> Option<usize> {
        self.entries.iter().position(|e| e.product_id == product_id)
    }

    /// Adds `quantity` units. An existing entry has the units summed onto it,
    /// a new entry is appended. Returns the resulting quantity.
    pub fn add(&mut self, product_id: i32, quantity: i32) -> Result<i32, DomainError> {
        check_quantity(quantity)?;
        match self.position(product_id) {
            Some(i) => {
                let entry = &mut self.entries[i];
                entry.quantity = entry
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| DomainError::invalid("quantity", "exceeds the maximum"))?;
                Ok(entry.quantity)
            }
            None => {
                self.entries.push(CartEntry {
                    product_id,
                    quantity,
                });
                Ok(quantity)
            }
        }
    }

    /// Replaces the quantity of an existing entry.
    pub fn set(&mut self, product_id: i32, quantity: i32) -> Result<(), DomainError> {
        check_quantity(quantity)?;
        let i = self
            .position(product_id)
            .ok_or_else(|| DomainError::product_not_found(product_id))?;
        self.entries[i].quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, product_id: i32) -> Result<(), DomainError> {
        let i = self
            .position(product_id)
            .ok_or_else(|| DomainError::product_not_found(product_id))?;
        self.entries.remove(i);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops entries for the given products, keeping the order of the rest.
    pub fn prune(&mut self, stale: &[i32]) {
        self.entries.retain(|e| !stale.contains(&e.product_id));
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;

    use super::*;
    use crate::domain::catalog::format_amount;

    fn product(id: i32, price: &str) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: None,
            price: BigDecimal::from_str(price).expect("valid decimal"),
            category_id: 1,
            image_url: Some(format!("/static/images/{id}.png")),
            created_at: Utc::now(),
        }
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[test]
    fn add_appends_new_entries_in_order() {
        let mut cart = Cart::new();
        cart.add(3, 1).expect("add");
        cart.add(1, 2).expect("add");
        let ids: Vec<i32> = cart.entries().iter().map(|e| e.product_id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn add_sums_quantities_for_existing_entry() {
        let mut cart = Cart::new();
        cart.add(1, 2).expect("add");
        assert_eq!(cart.add(1, 3).expect("add"), 5);
        assert_eq!(cart.quantity_of(1), Some(5));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(cart.add(1, 0), Err(DomainError::Validation(_))));
        assert!(matches!(cart.add(1, -4), Err(DomainError::Validation(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_rejects_overflowing_sum_and_keeps_quantity() {
        let mut cart = Cart::new();
        cart.add(1, i32::MAX).expect("add");
        assert!(matches!(cart.add(1, 1), Err(DomainError::Validation(_))));
        assert_eq!(cart.quantity_of(1), Some(i32::MAX));
    }

    #[test]
    fn set_replaces_quantity() {
        let mut cart = Cart::new();
        cart.add(1, 2).expect("add");
        cart.set(1, 5).expect("set");
        assert_eq!(cart.quantity_of(1), Some(5));
    }

    #[test]
    fn set_requires_existing_entry() {
        let mut cart = Cart::new();
        assert!(matches!(cart.set(9, 1), Err(DomainError::NotFound { id: 9, .. })));
    }

    #[test]
    fn set_rejects_zero_instead_of_removing() {
        let mut cart = Cart::new();
        cart.add(1, 2).expect("add");
        assert!(matches!(cart.set(1, 0), Err(DomainError::Validation(_))));
        assert_eq!(cart.quantity_of(1), Some(2));
    }

    #[test]
    fn remove_missing_entry_is_not_found() {
        let mut cart = Cart::new();
        cart.add(1, 1).expect("add");
        cart.remove(1).expect("remove");
        assert!(matches!(cart.remove(1), Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn prune_keeps_remaining_order() {
        let mut cart = Cart::new();
        for id in [4, 2, 7, 1] {
            cart.add(id, 1).expect("add");
        }
        cart.prune(&[2, 1]);
        let ids: Vec<i32> = cart.entries().iter().map(|e| e.product_id).collect();
        assert_eq!(ids, vec![4, 7]);
    }

    #[test]
    fn line_subtotal_is_price_times_quantity() {
        let line = CartLine::new(&product(1, "19.99"), 3);
        assert_eq!(line.subtotal, dec("59.97"));
        assert_eq!(format_amount(&line.price), "19.99");
        assert_eq!(format_amount(&line.subtotal), "59.97");
    }

    #[test]
    fn summary_totals_and_counts_distinct_lines() {
        let lines = vec![
            CartLine::new(&product(1, "2.50"), 1),
            CartLine::new(&product(2, "1.25"), 10),
        ];
        let summary = CartSummary::from_lines(lines);
        assert_eq!(summary.items_count, 2);
        assert_eq!(summary.total, dec("15.00"));
        assert_eq!(format_amount(&summary.total), "15.00");
    }

    #[test]
    fn empty_summary_has_zero_total() {
        let summary = CartSummary::from_lines(Vec::new());
        assert!(summary.items.is_empty());
        assert_eq!(summary.items_count, 0);
        assert!(summary.total.is_zero());

        let json = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(json["total"], "0.00");
        assert_eq!(json["items_count"], 0);
    }

    #[test]
    fn line_amounts_serialize_with_two_decimals() {
        let json = serde_json::to_value(CartLine::new(&product(1, "3"), 2)).expect("serialize");
        assert_eq!(json["price"], "3.00");
        assert_eq!(json["subtotal"], "6.00");
    }
}
