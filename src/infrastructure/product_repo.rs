use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::cart::ProductId;
use crate::domain::errors::DomainError;
use crate::domain::ports::{ProductLookup, ProductRepository, PRODUCT_NOT_FOUND};
use crate::domain::product::{Product, ProductFields};
use crate::schema::product;

use super::models::{ProductRow, ProductWriteRow};

#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductLookup for DieselProductRepository {
    fn get_by_id(&self, id: ProductId) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        product::table
            .filter(product::id.eq(id))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Product::from)
            .ok_or_else(|| DomainError::not_found(PRODUCT_NOT_FOUND))
    }
}

impl ProductRepository for DieselProductRepository {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = product::table
            .select(ProductRow::as_select())
            .order(product::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn create(&self, fields: ProductFields) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(product::table)
            .values(&ProductWriteRow::from(fields))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn update(&self, id: ProductId, fields: ProductFields) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(product::table.filter(product::id.eq(id)))
            .set((
                &ProductWriteRow::from(fields),
                product::updated_at.eq(Utc::now()),
            ))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(Product::from)
            .ok_or_else(|| DomainError::not_found(PRODUCT_NOT_FOUND))
    }

    fn delete(&self, id: ProductId) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let deleted =
            diesel::delete(product::table.filter(product::id.eq(id))).execute(&mut conn)?;

        if deleted == 0 {
            return Err(DomainError::not_found(PRODUCT_NOT_FOUND));
        }

        Ok(())
    }
}
