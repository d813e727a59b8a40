use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::cart::ProductId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub image_address: Option<String>,
    pub name: String,
    pub short_title: Option<String>,
    pub price: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default)]
    pub image_address: Option<String>,
    pub name: String,
    #[serde(default)]
    pub short_title: Option<String>,
    pub price: i32,
    #[serde(default)]
    pub description: Option<String>,
}

/// A partial product update.
///
/// `None` means the field was omitted and keeps its stored value. Any
/// provided value is applied, including an empty string, which clears a
/// nullable text field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    #[serde(default)]
    pub image_address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_title: Option<String>,
    #[serde(default)]
    pub price: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// The full set of writable product fields after a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub image_address: Option<String>,
    pub name: String,
    pub short_title: Option<String>,
    pub price: i32,
    pub description: Option<String>,
}

impl ProductFields {
    pub fn of(product: &Product) -> Self {
        Self {
            image_address: product.image_address.clone(),
            name: product.name.clone(),
            short_title: product.short_title.clone(),
            price: product.price,
            description: product.description.clone(),
        }
    }

    pub fn merge(&self, changes: ProductChanges) -> Self {
        Self {
            image_address: changes
                .image_address
                .map_or_else(|| self.image_address.clone(), non_empty),
            name: changes.name.unwrap_or_else(|| self.name.clone()),
            short_title: changes
                .short_title
                .map_or_else(|| self.short_title.clone(), non_empty),
            price: changes.price.unwrap_or(self.price),
            description: changes
                .description
                .map_or_else(|| self.description.clone(), non_empty),
        }
    }
}

impl From<NewProduct> for ProductFields {
    fn from(p: NewProduct) -> Self {
        Self {
            image_address: p.image_address.and_then(non_empty),
            name: p.name,
            short_title: p.short_title.and_then(non_empty),
            price: p.price,
            description: p.description.and_then(non_empty),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
