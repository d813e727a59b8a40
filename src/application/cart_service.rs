use std::sync::Arc;

use log::{debug, error, info};
use serde_json::Value;

use crate::domain::cart::{
    AddToCartOutcome, AddedLine, CartCheck, CartId, CartSnapshot, CartSummary, ClearedCart,
    FailedSyncItem, ProductId, RemovedLine, SyncOutcome, SyncResults, SyncedItem, UpdateOutcome,
    UserId,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::{
    CartRepository, ProductLookup, CART_ITEM_NOT_FOUND, QUANTITY_TOO_LARGE,
};

const INVALID_SYNC_ITEM: &str = "Invalid productId or quantity";
const SYNC_ITEM_FAILED: &str = "Item could not be added";

#[derive(Clone)]
pub struct CartService {
    repo: Arc<dyn CartRepository>,
    products: Arc<dyn ProductLookup>,
}

impl CartService {
    pub fn new(repo: Arc<dyn CartRepository>, products: Arc<dyn ProductLookup>) -> Self {
        Self { repo, products }
    }

    pub fn get_cart(&self, user_id: UserId) -> Result<CartSnapshot, DomainError> {
        let items = self.repo.lines_for_user(user_id)?;
        let summary = self.repo.summary(user_id)?;
        Ok(CartSnapshot { items, summary })
    }

    pub fn get_summary(&self, user_id: UserId) -> Result<CartSummary, DomainError> {
        self.repo.summary(user_id)
    }

    /// `quantity` defaults to 1 when omitted. The product is looked up
    /// before the quantity is checked, so an unknown product is always a
    /// `NotFound`.
    pub fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Option<i64>,
    ) -> Result<AddToCartOutcome, DomainError> {
        self.products.get_by_id(product_id)?;

        let quantity = quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(DomainError::invalid("Quantity must be at least 1"));
        }
        let quantity = to_quantity(quantity)?;

        let added = self.repo.add_line(user_id, product_id, quantity)?;
        debug!(
            "user {user_id} product {product_id}: quantity now {} (updated: {})",
            added.quantity, added.updated
        );

        let cart_item = self
            .repo
            .line_view(user_id, product_id)?
            .ok_or_else(|| DomainError::not_found(CART_ITEM_NOT_FOUND))?;

        Ok(AddToCartOutcome {
            cart_item,
            updated: added.updated,
        })
    }

    pub fn update_cart_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Option<i64>,
    ) -> Result<UpdateOutcome, DomainError> {
        let quantity = quantity.ok_or_else(|| DomainError::invalid("Quantity is required"))?;
        if quantity < 0 {
            return Err(DomainError::invalid("Quantity cannot be negative"));
        }
        let quantity = to_quantity(quantity)?;

        if quantity == 0 {
            let removed = self.repo.remove_line(user_id, product_id)?;
            return Ok(UpdateOutcome::Removed(removed));
        }

        self.repo.set_line_quantity(user_id, product_id, quantity)?;
        self.repo
            .line_view(user_id, product_id)?
            .map(UpdateOutcome::Updated)
            .ok_or_else(|| DomainError::not_found(CART_ITEM_NOT_FOUND))
    }

    pub fn remove_from_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<RemovedLine, DomainError> {
        self.repo.remove_line(user_id, product_id)
    }

    pub fn remove_from_cart_by_id(
        &self,
        user_id: UserId,
        cart_id: CartId,
    ) -> Result<RemovedLine, DomainError> {
        self.repo.remove_line_by_id(cart_id, user_id)
    }

    pub fn clear_cart(&self, user_id: UserId) -> Result<ClearedCart, DomainError> {
        let items_removed = self.repo.clear_all_for_user(user_id)?;
        Ok(ClearedCart {
            user_id,
            cleared: true,
            items_removed,
        })
    }

    pub fn is_in_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<CartCheck, DomainError> {
        let cart_item = self.repo.find_line(user_id, product_id)?;
        Ok(CartCheck {
            in_cart: cart_item.is_some(),
            cart_item,
        })
    }

    /// Replaces the user's cart with `items`.
    ///
    /// The cart is cleared first and each item is then added on its own, so
    /// a failure partway through leaves whatever was added before it. Bad
    /// items are reported in `failed` and do not stop the rest.
    pub fn sync_cart(&self, user_id: UserId, items: &Value) -> Result<SyncOutcome, DomainError> {
        let items = items
            .as_array()
            .ok_or_else(|| DomainError::invalid("Items must be an array"))?;

        let cleared = self.repo.clear_all_for_user(user_id)?;

        let mut results = SyncResults::default();
        for item in items {
            match self.sync_item(user_id, item) {
                Ok(added) => {
                    let synced = SyncedItem {
                        product_id: added.product_id,
                        quantity: added.quantity,
                    };
                    if added.updated {
                        results.updated.push(synced);
                    } else {
                        results.added.push(synced);
                    }
                }
                Err(reason) => results.failed.push(FailedSyncItem {
                    item: item.clone(),
                    reason,
                }),
            }
        }

        info!(
            "synced cart for user {user_id}: cleared {cleared}, added {}, updated {}, failed {}",
            results.added.len(),
            results.updated.len(),
            results.failed.len()
        );

        Ok(SyncOutcome {
            sync_results: results,
            cart: self.get_cart(user_id)?,
        })
    }

    /// `quantity` in the returned line is the requested amount, not the
    /// stored total.
    fn sync_item(&self, user_id: UserId, item: &Value) -> Result<AddedLine, String> {
        let (product_id, quantity) =
            parse_sync_item(item).ok_or_else(|| INVALID_SYNC_ITEM.to_string())?;
        let added = self
            .products
            .get_by_id(product_id)
            .and_then(|_| self.repo.add_line(user_id, product_id, quantity))
            .map_err(|e| sync_failure_reason(user_id, product_id, e))?;
        Ok(AddedLine { quantity, ..added })
    }
}

fn sync_failure_reason(user_id: UserId, product_id: ProductId, e: DomainError) -> String {
    if e.is_internal() {
        error!("sync for user {user_id} failed on product {product_id}: {e}");
        return SYNC_ITEM_FAILED.to_string();
    }
    e.to_string()
}

fn to_quantity(quantity: i64) -> Result<i32, DomainError> {
    i32::try_from(quantity).map_err(|_| DomainError::invalid(QUANTITY_TOO_LARGE))
}

fn parse_sync_item(item: &Value) -> Option<(ProductId, i32)> {
    let positive = |key: &str| {
        item.get(key)
            .and_then(Value::as_i64)
            .filter(|v| *v > 0)
            .and_then(|v| i32::try_from(v).ok())
    };
    Some((positive("productId")?, positive("quantity")?))
}
