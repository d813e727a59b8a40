use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::db::DbPool;
use crate::domain::cart::{CartId, CartLine, CartLineView, CartSummary, ProductId, UserId};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart, product};

use super::models::{line_view, CartRow, NewCartRow, ProductRow, SummaryRow};

const SUMMARY_SQL: &str = "\
    SELECT COUNT(*) AS total_items, \
           COALESCE(SUM(c.quantity::BIGINT * p.price), 0)::BIGINT AS total_amount \
    FROM cart c \
    JOIN product p ON p.id = c.product_id \
    WHERE c.user_id = $1";

#[derive(Clone)]
pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CartRepository for DieselCartRepository {
    fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLineView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = cart::table
            .inner_join(product::table)
            .filter(cart::user_id.eq(user_id))
            .order((cart::added_at.desc(), cart::id.desc()))
            .select((CartRow::as_select(), ProductRow::as_select()))
            .load::<(CartRow, ProductRow)>(&mut conn)?;

        Ok(rows.into_iter().map(|(l, p)| line_view(l, p)).collect())
    }

    fn line_view(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartLineView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = cart::table
            .inner_join(product::table)
            .filter(cart::user_id.eq(user_id))
            .filter(cart::product_id.eq(product_id))
            .select((CartRow::as_select(), ProductRow::as_select()))
            .first::<(CartRow, ProductRow)>(&mut conn)
            .optional()?;

        Ok(row.map(|(l, p)| line_view(l, p)))
    }

    fn summary(&self, user_id: UserId) -> Result<CartSummary, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::sql_query(SUMMARY_SQL)
            .bind::<Integer, _>(user_id)
            .get_result::<SummaryRow>(&mut conn)?;

        Ok(row.into())
    }

    fn find_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartLine>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = cart::table
            .filter(cart::user_id.eq(user_id))
            .filter(cart::product_id.eq(product_id))
            .select(CartRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(CartLine::from))
    }

    fn insert_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, DomainError> {
        let mut conn = self.pool.get()?;

        // A unique violation on (user_id, product_id) converts to Conflict.
        let row = diesel::insert_into(cart::table)
            .values(&NewCartRow {
                user_id,
                product_id,
                quantity,
            })
            .returning(CartRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn increment_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        by: i32,
    ) -> Result<Option<CartLine>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(
            cart::table
                .filter(cart::user_id.eq(user_id))
                .filter(cart::product_id.eq(product_id)),
        )
        .set(cart::quantity.eq(cart::quantity + by))
        .returning(CartRow::as_returning())
        .get_result(&mut conn)
        .optional()?;

        Ok(row.map(CartLine::from))
    }

    fn update_line_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Option<CartLine>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(
            cart::table
                .filter(cart::user_id.eq(user_id))
                .filter(cart::product_id.eq(product_id)),
        )
        .set(cart::quantity.eq(quantity))
        .returning(CartRow::as_returning())
        .get_result(&mut conn)
        .optional()?;

        Ok(row.map(CartLine::from))
    }

    fn delete_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartLine>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::delete(
            cart::table
                .filter(cart::user_id.eq(user_id))
                .filter(cart::product_id.eq(product_id)),
        )
        .returning(CartRow::as_returning())
        .get_result(&mut conn)
        .optional()?;

        Ok(row.map(CartLine::from))
    }

    fn delete_line_by_id(
        &self,
        cart_id: CartId,
        user_id: UserId,
    ) -> Result<Option<CartLine>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::delete(
            cart::table
                .filter(cart::id.eq(cart_id))
                .filter(cart::user_id.eq(user_id)),
        )
        .returning(CartRow::as_returning())
        .get_result(&mut conn)
        .optional()?;

        Ok(row.map(CartLine::from))
    }

    fn clear_all_for_user(&self, user_id: UserId) -> Result<u64, DomainError> {
        let mut conn = self.pool.get()?;

        let removed = diesel::delete(cart::table.filter(cart::user_id.eq(user_id)))
            .execute(&mut conn)?;

        Ok(removed as u64)
    }
}
