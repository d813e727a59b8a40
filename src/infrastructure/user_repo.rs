use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::cart::UserId;
use crate::domain::errors::DomainError;
use crate::domain::ports::{UserRepository, USER_NOT_FOUND};
use crate::domain::user::{NewUser, StoredCredentials, User};
use crate::schema::users;

use super::models::{NewUserRow, UserRow};

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for DieselUserRepository {
    fn create_user(&self, user: NewUser) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        // Unique violations on user_name or email convert to Conflict.
        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)?;

        row.try_into()
    }

    fn find_credentials(
        &self,
        user_name_or_email: &str,
    ) -> Result<Option<StoredCredentials>, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .filter(
                users::user_name
                    .eq(user_name_or_email)
                    .or(users::email.eq(user_name_or_email)),
            )
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .optional()?
            .map(StoredCredentials::try_from)
            .transpose()
    }

    fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load::<UserRow>(&mut conn)?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    fn user_by_id(&self, id: UserId) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .filter(users::id.eq(id))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .optional()?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?
            .try_into()
    }

    fn delete_user(&self, id: UserId) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(users::table.filter(users::id.eq(id))).execute(&mut conn)?;

        if deleted == 0 {
            return Err(DomainError::not_found(USER_NOT_FOUND));
        }

        Ok(())
    }
}
