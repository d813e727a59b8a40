use log::warn;

use super::cart::{
    AddedLine, CartId, CartLine, CartLineView, CartSummary, ProductId, RemovedLine, UserId,
};
use super::errors::DomainError;
use super::product::{Product, ProductFields};
use super::user::{NewUser, StoredCredentials, User};

pub const CART_ITEM_NOT_FOUND: &str = "Cart item not found";
pub const PRODUCT_NOT_FOUND: &str = "Product not found.";
pub const USER_NOT_FOUND: &str = "User not found.";
pub const QUANTITY_TOO_LARGE: &str = "Quantity is too large";

/// Persistence for cart lines. Every method is scoped by `user_id`.
///
/// Implementors supply the single-statement primitives; `add_line` and
/// `set_line_quantity` are built on top of them.
pub trait CartRepository: Send + Sync + 'static {
    /// Lines joined with their products, newest first.
    fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLineView>, DomainError>;

    fn line_view(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartLineView>, DomainError>;

    fn summary(&self, user_id: UserId) -> Result<CartSummary, DomainError>;

    fn find_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartLine>, DomainError>;

    /// Must fail with `DomainError::Conflict` when the pair already exists.
    fn insert_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, DomainError>;

    /// Adds `by` to the stored quantity. `None` when no line exists.
    /// Fails with `DomainError::InvalidInput` if the sum overflows.
    fn increment_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        by: i32,
    ) -> Result<Option<CartLine>, DomainError>;

    /// Overwrites the stored quantity. `None` when no line exists.
    fn update_line_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Option<CartLine>, DomainError>;

    fn delete_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartLine>, DomainError>;

    fn delete_line_by_id(
        &self,
        cart_id: CartId,
        user_id: UserId,
    ) -> Result<Option<CartLine>, DomainError>;

    /// Returns the number of lines removed.
    fn clear_all_for_user(&self, user_id: UserId) -> Result<u64, DomainError>;

    /// Insert-or-increment keyed by `(user_id, product_id)`.
    ///
    /// No lock is held between the lookup and the insert. A concurrent
    /// request that wins the insert surfaces here as a `Conflict`, which is
    /// retried once as an increment.
    ///
    /// A sum that would not fit the quantity column is refused as invalid
    /// input before anything is written.
    fn add_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<AddedLine, DomainError> {
        if let Some(current) = self.find_line(user_id, product_id)? {
            if current.quantity.checked_add(quantity).is_none() {
                return Err(DomainError::invalid(QUANTITY_TOO_LARGE));
            }
            if let Some(line) = self.increment_line(user_id, product_id, quantity)? {
                return Ok(added(line, true));
            }
            // Deleted between the lookup and the increment; insert afresh.
        }

        match self.insert_line(user_id, product_id, quantity) {
            Ok(line) => Ok(added(line, false)),
            Err(DomainError::Conflict(reason)) => {
                warn!(
                    "cart insert for user {user_id} product {product_id} lost a race ({reason}), retrying as increment"
                );
                self.increment_line(user_id, product_id, quantity)?
                    .map(|line| added(line, true))
                    .ok_or_else(|| DomainError::Storage(reason))
            }
            Err(e) => Err(e),
        }
    }

    /// A quantity of zero or below removes the line and yields `None`.
    fn set_line_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Option<CartLine>, DomainError> {
        if quantity <= 0 {
            self.remove_line(user_id, product_id)?;
            return Ok(None);
        }

        self.update_line_quantity(user_id, product_id, quantity)?
            .map(Some)
            .ok_or_else(|| DomainError::not_found(CART_ITEM_NOT_FOUND))
    }

    fn remove_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<RemovedLine, DomainError> {
        self.delete_line(user_id, product_id)?
            .map(RemovedLine::from)
            .ok_or_else(|| DomainError::not_found(CART_ITEM_NOT_FOUND))
    }

    fn remove_line_by_id(
        &self,
        cart_id: CartId,
        user_id: UserId,
    ) -> Result<RemovedLine, DomainError> {
        self.delete_line_by_id(cart_id, user_id)?
            .map(RemovedLine::from)
            .ok_or_else(|| DomainError::not_found(CART_ITEM_NOT_FOUND))
    }
}

fn added(line: CartLine, updated: bool) -> AddedLine {
    AddedLine {
        cart_id: line.cart_id,
        user_id: line.user_id,
        product_id: line.product_id,
        quantity: line.quantity,
        updated,
    }
}

/// The read side of the product catalog, as seen by the cart.
pub trait ProductLookup: Send + Sync + 'static {
    /// Fails with `DomainError::NotFound` when the product does not exist.
    fn get_by_id(&self, id: ProductId) -> Result<Product, DomainError>;
}

pub trait ProductRepository: ProductLookup {
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    /// Fails with `DomainError::Conflict` on a duplicate name.
    fn create(&self, fields: ProductFields) -> Result<Product, DomainError>;
    fn update(&self, id: ProductId, fields: ProductFields) -> Result<Product, DomainError>;
    fn delete(&self, id: ProductId) -> Result<(), DomainError>;
}

/// Account storage. Method names are distinct from the product ports so
/// one store can implement both.
pub trait UserRepository: Send + Sync + 'static {
    /// Fails with `DomainError::Conflict` on a taken user name or email.
    fn create_user(&self, user: NewUser) -> Result<User, DomainError>;

    /// Matches either the user name or the email.
    fn find_credentials(
        &self,
        user_name_or_email: &str,
    ) -> Result<Option<StoredCredentials>, DomainError>;

    fn list_users(&self) -> Result<Vec<User>, DomainError>;

    /// Fails with `DomainError::NotFound` when the account does not exist.
    fn user_by_id(&self, id: UserId) -> Result<User, DomainError>;

    /// Removes the account and, through the foreign key, its cart.
    fn delete_user(&self, id: UserId) -> Result<(), DomainError>;
}
