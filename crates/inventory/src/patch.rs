//! Local transformations applied to cached collections after the backend has
//! accepted a mutation, so views update before the next refetch lands.
//!
//! Each function only touches the record it names; it never invents records the
//! server did not return.

use shelfline_core::{DomainError, DomainResult, Entity, StoreItemId, WarehouseItemId, find_mut, position};

use crate::model::{Discount, StoreItem, StoreItemStatus, WarehouseItem};

/// What a quantity decrement did to the cached record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityOutcome {
    /// The record stays, holding this many units.
    Remaining(i64),
    /// Nothing left; the record was dropped from the collection.
    Depleted,
}

pub type SaleOutcome = QuantityOutcome;
pub type MoveOutcome = QuantityOutcome;

trait Stocked: Entity {
    fn quantity_mut(&mut self) -> &mut i64;
}

impl Stocked for StoreItem {
    fn quantity_mut(&mut self) -> &mut i64 {
        &mut self.quantity
    }
}

impl Stocked for WarehouseItem {
    fn quantity_mut(&mut self) -> &mut i64 {
        &mut self.quantity
    }
}

fn decrement<E: Stocked>(items: &mut Vec<E>, id: &E::Id, qty: i64) -> DomainResult<QuantityOutcome> {
    let idx = position(items, id).ok_or_else(DomainError::not_found)?;
    let quantity = items[idx].quantity_mut();
    *quantity = quantity.saturating_sub(qty);

    if *quantity <= 0 {
        items.remove(idx);
        Ok(QuantityOutcome::Depleted)
    } else {
        Ok(QuantityOutcome::Remaining(*quantity))
    }
}

/// Reflect a recorded sale in the active store items.
pub fn apply_sale(items: &mut Vec<StoreItem>, id: StoreItemId, qty: i64) -> DomainResult<SaleOutcome> {
    decrement(items, &id, qty)
}

/// Reflect a warehouse → store move in the warehouse collection.
pub fn apply_move(
    items: &mut Vec<WarehouseItem>,
    id: WarehouseItemId,
    qty: i64,
) -> DomainResult<MoveOutcome> {
    decrement(items, &id, qty)
}

/// Attach a discount the backend created. A discount with the same id replaces
/// the older copy.
pub fn apply_discount(items: &mut [StoreItem], discount: Discount) -> DomainResult<()> {
    let item = find_mut(items, &discount.store_item_id).ok_or_else(DomainError::not_found)?;
    match position(&item.discounts, &discount.id) {
        Some(idx) => item.discounts[idx] = discount,
        None => item.discounts.push(discount),
    }
    Ok(())
}

fn take_out(
    items: &mut Vec<StoreItem>,
    id: StoreItemId,
    status: StoreItemStatus,
) -> DomainResult<StoreItem> {
    let idx = position(items, &id).ok_or_else(DomainError::not_found)?;
    let mut item = items.remove(idx);
    item.status = status;
    Ok(item)
}

/// Drop a written-off item from the active collection, returning it.
pub fn apply_removal(items: &mut Vec<StoreItem>, id: StoreItemId) -> DomainResult<StoreItem> {
    take_out(items, id, StoreItemStatus::Removed)
}

/// Drop an expired item from the active collection, returning it.
pub fn apply_expiry(items: &mut Vec<StoreItem>, id: StoreItemId) -> DomainResult<StoreItem> {
    take_out(items, id, StoreItemStatus::Expired)
}

/// Remove every record whose id is listed. Returns how many were dropped.
pub fn retain_except<E: Entity>(items: &mut Vec<E>, ids: &[E::Id]) -> usize {
    let before = items.len();
    items.retain(|item| !ids.contains(item.id()));
    before - items.len()
}
