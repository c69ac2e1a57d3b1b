//! Point-of-sale cart. Purely local until checkout.

use shelfline_core::{DomainError, DomainResult, StoreItemId, position};
use shelfline_inventory::{CartItem, Sale, StoreItem};

use crate::caches::store::StoreCache;

/// Outcome of [`Cart::checkout`].
#[derive(Debug, Default)]
pub struct CheckoutReport {
    pub sales: Vec<Sale>,
    /// Lines the backend refused, with the message to show. These stay in the cart.
    pub failed: Vec<(StoreItemId, String)>,
}

impl CheckoutReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Cart {
    lines: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add units of `item`, capped at what is on the shelf. Returns the line's
    /// resulting quantity.
    pub fn add(&mut self, item: &StoreItem, quantity: i64) -> DomainResult<i64> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if item.quantity <= 0 {
            return Err(DomainError::InsufficientQuantity {
                requested: quantity,
                available: item.quantity,
            });
        }

        match position(&self.lines, &item.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = (line.quantity + quantity).min(item.quantity);
                Ok(line.quantity)
            }
            None => {
                let line = CartItem::from_store_item(item, quantity.min(item.quantity));
                let qty = line.quantity;
                self.lines.push(line);
                Ok(qty)
            }
        }
    }

    /// Set the line for `item` to `quantity`, capped at what is on the shelf.
    /// Zero or less drops the line. Returns the line's resulting quantity.
    pub fn set_quantity(&mut self, item: &StoreItem, quantity: i64) -> DomainResult<i64> {
        let idx = position(&self.lines, &item.id).ok_or_else(DomainError::not_found)?;
        let capped = quantity.min(item.quantity);
        if capped <= 0 {
            self.lines.remove(idx);
            return Ok(0);
        }
        self.lines[idx].quantity = capped;
        Ok(capped)
    }

    pub fn remove(&mut self, id: StoreItemId) -> Option<CartItem> {
        position(&self.lines, &id).map(|idx| self.lines.remove(idx))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Display-only total. The backend's sale records are authoritative.
    pub fn total(&self) -> f64 {
        let raw: f64 = self.lines.iter().map(CartItem::line_total).sum();
        (raw * 100.0).round() / 100.0
    }

    /// Record one sale per line. Successful lines leave the cart; refused
    /// lines stay so the cashier can adjust them.
    pub async fn checkout(&mut self, store: &StoreCache) -> CheckoutReport {
        let mut report = CheckoutReport::default();
        let mut kept = Vec::new();

        for line in self.lines.drain(..) {
            match store
                .record_sale(line.store_item_id, line.quantity, line.charged_price())
                .await
            {
                Ok(sale) => report.sales.push(sale),
                Err(err) => {
                    report.failed.push((line.store_item_id, err.user_message()));
                    kept.push(line);
                }
            }
        }

        self.lines = kept;
        tracing::info!(
            sold = report.sales.len(),
            failed = report.failed.len(),
            "checkout finished"
        );
        report
    }
}
