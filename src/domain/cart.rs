use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::product::Product;

pub type UserId = i32;
pub type ProductId = i32;
pub type CartId = i32;

/// A stored cart line: one (user, product) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub cart_id: CartId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

/// A cart line joined with the product it points at.
///
/// `total_price` is computed from the product price at read time, so a price
/// change shows up on the next read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub cart_id: CartId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
    pub name: String,
    pub short_title: Option<String>,
    pub price: i32,
    pub image_address: Option<String>,
    pub description: Option<String>,
    pub total_price: i64,
}

impl CartLineView {
    pub fn new(line: CartLine, product: &Product) -> Self {
        Self {
            total_price: line_total(line.quantity, product.price),
            cart_id: line.cart_id,
            user_id: line.user_id,
            product_id: line.product_id,
            quantity: line.quantity,
            added_at: line.added_at,
            name: product.name.clone(),
            short_title: product.short_title.clone(),
            price: product.price,
            image_address: product.image_address.clone(),
            description: product.description.clone(),
        }
    }
}

pub fn line_total(quantity: i32, price: i32) -> i64 {
    i64::from(quantity) * i64::from(price)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Number of distinct lines, not the sum of quantities.
    pub total_items: i64,
    pub total_amount: i64,
}

impl CartSummary {
    pub fn from_lines(lines: &[CartLineView]) -> Self {
        Self {
            total_items: lines.len() as i64,
            total_amount: lines.iter().map(|l| l.total_price).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddedLine {
    pub cart_id: CartId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    /// `true` when an existing line was incremented rather than inserted.
    pub updated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemovedLine {
    pub cart_id: CartId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub removed: bool,
}

impl From<CartLine> for RemovedLine {
    fn from(line: CartLine) -> Self {
        Self {
            cart_id: line.cart_id,
            user_id: line.user_id,
            product_id: line.product_id,
            removed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearedCart {
    pub user_id: UserId,
    pub cleared: bool,
    pub items_removed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartSnapshot {
    pub items: Vec<CartLineView>,
    pub summary: CartSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartCheck {
    pub in_cart: bool,
    pub cart_item: Option<CartLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartOutcome {
    pub cart_item: CartLineView,
    pub updated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum UpdateOutcome {
    Updated(CartLineView),
    Removed(RemovedLine),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncedItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FailedSyncItem {
    /// The item exactly as the client sent it.
    #[schema(value_type = Object)]
    pub item: Value,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SyncResults {
    pub added: Vec<SyncedItem>,
    pub updated: Vec<SyncedItem>,
    /// Always empty: sync clears the cart and re-inserts, it never diffs.
    pub removed: Vec<SyncedItem>,
    pub failed: Vec<FailedSyncItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub sync_results: SyncResults,
    pub cart: CartSnapshot,
}
