use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use crate::domain::cart::{CartLine, CartLineView, CartSummary};
use crate::domain::errors::DomainError;
use crate::domain::product::{Product, ProductFields};
use crate::domain::user::{NewUser, Role, StoredCredentials, User};
use crate::schema::{cart, product, users};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = cart)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartRow {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

impl From<CartRow> for CartLine {
    fn from(row: CartRow) -> Self {
        CartLine {
            cart_id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            quantity: row.quantity,
            added_at: row.added_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart)]
pub struct NewCartRow {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = product)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub image_address: Option<String>,
    pub name: String,
    pub short_title: Option<String>,
    pub price: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            image_address: row.image_address,
            name: row.name,
            short_title: row.short_title,
            price: row.price,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert and full-overwrite shape for `product`. `None` writes `NULL`.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = product)]
#[diesel(treat_none_as_null = true)]
pub struct ProductWriteRow {
    pub image_address: Option<String>,
    pub name: String,
    pub short_title: Option<String>,
    pub price: i32,
    pub description: Option<String>,
}

impl From<ProductFields> for ProductWriteRow {
    fn from(f: ProductFields) -> Self {
        Self {
            image_address: f.image_address,
            name: f.name,
            short_title: f.short_title,
            price: f.price,
            description: f.description,
        }
    }
}

pub fn line_view(line: CartRow, product: ProductRow) -> CartLineView {
    CartLineView::new(line.into(), &product.into())
}

#[derive(Debug, QueryableByName)]
pub struct SummaryRow {
    #[diesel(sql_type = BigInt)]
    pub total_items: i64,
    #[diesel(sql_type = BigInt)]
    pub total_amount: i64,
}

impl From<SummaryRow> for CartSummary {
    fn from(row: SummaryRow) -> Self {
        CartSummary {
            total_items: row.total_items,
            total_amount: row.total_amount,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub permission: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    fn role(&self) -> Result<Role, DomainError> {
        Role::parse(&self.permission).ok_or_else(|| {
            DomainError::Storage(format!(
                "user {} has unknown permission {:?}",
                self.id, self.permission
            ))
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            permission: row.role()?,
            id: row.id,
            user_name: row.user_name,
            email: row.email,
            full_name: row.full_name,
            phone_number: row.phone_number,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<UserRow> for StoredCredentials {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(StoredCredentials {
            permission: row.role()?,
            id: row.id,
            password_hash: row.password,
        })
    }
}

/// `password` holds the hash.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub permission: String,
}

impl From<NewUser> for NewUserRow {
    fn from(u: NewUser) -> Self {
        Self {
            user_name: u.user_name,
            password: u.password_hash,
            email: u.email,
            full_name: u.full_name,
            phone_number: u.phone_number,
            permission: u.permission.as_str().to_string(),
        }
    }
}
