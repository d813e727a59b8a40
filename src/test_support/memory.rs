use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};

use crate::domain::cart::{CartId, CartLine, CartLineView, CartSummary, ProductId, UserId};
use crate::domain::errors::DomainError;
use crate::domain::ports::{
    CartRepository, ProductLookup, ProductRepository, UserRepository, PRODUCT_NOT_FOUND,
    USER_NOT_FOUND,
};
use crate::domain::product::{Product, ProductFields};
use crate::domain::user::{NewUser, StoredCredentials, User};

#[derive(Default)]
struct State {
    next_cart_id: CartId,
    next_product_id: ProductId,
    next_user_id: UserId,
    ticks: i64,
    products: BTreeMap<ProductId, Product>,
    /// Accounts with their password hashes.
    users: BTreeMap<UserId, (User, String)>,
    lines: Vec<CartLine>,
}

impl State {
    fn now(&mut self, epoch: DateTime<Utc>) -> DateTime<Utc> {
        self.ticks += 1;
        epoch + Duration::seconds(self.ticks)
    }

    fn position(&self, user_id: UserId, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|l| l.user_id == user_id && l.product_id == product_id)
    }

    fn view(&self, line: &CartLine) -> Option<CartLineView> {
        self.products
            .get(&line.product_id)
            .map(|p| CartLineView::new(line.clone(), p))
    }
}

/// In-memory stand-in for the relational store, with hooks for injecting
/// races and failures.
pub struct InMemoryStore {
    epoch: DateTime<Utc>,
    state: Mutex<State>,
    calls: Mutex<Vec<&'static str>>,
    race_next_insert: Mutex<bool>,
    failing_inserts: Mutex<HashSet<ProductId>>,
    vanishing_products: Mutex<HashSet<ProductId>>,
    fail_clear: Mutex<bool>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            epoch: Utc::now(),
            state: Mutex::default(),
            calls: Mutex::default(),
            race_next_insert: Mutex::default(),
            failing_inserts: Mutex::default(),
            vanishing_products: Mutex::default(),
            fail_clear: Mutex::default(),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(&self, name: &str, price: i32) -> ProductId {
        self.create(ProductFields {
            image_address: None,
            name: name.to_string(),
            short_title: None,
            price,
            description: None,
        })
        .expect("seeding product failed")
        .id
    }

    pub fn set_price(&self, id: ProductId, price: i32) {
        let mut state = self.state();
        if let Some(p) = state.products.get_mut(&id) {
            p.price = price;
        }
    }

    /// The next `insert_line` behaves as if a concurrent request inserted
    /// the same pair (quantity 1) first.
    pub fn race_next_insert(&self) {
        *self.race_next_insert.lock().expect("lock poisoned") = true;
    }

    pub fn fail_inserts_for(&self, product_id: ProductId) {
        self.failing_inserts
            .lock()
            .expect("lock poisoned")
            .insert(product_id);
    }

    /// The product is deleted right before the next `insert_line` for it,
    /// as if another request removed it after the lookup.
    pub fn vanish_before_insert(&self, product_id: ProductId) {
        self.vanishing_products
            .lock()
            .expect("lock poisoned")
            .insert(product_id);
    }

    pub fn fail_clear(&self) {
        *self.fail_clear.lock().expect("lock poisoned") = true;
    }

    /// Names of the store primitives called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("lock poisoned")
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().expect("lock poisoned").push(call);
    }

    fn push_line(
        &self,
        state: &mut State,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> CartLine {
        state.next_cart_id += 1;
        let line = CartLine {
            cart_id: state.next_cart_id,
            user_id,
            product_id,
            quantity,
            added_at: state.now(self.epoch),
        };
        state.lines.push(line.clone());
        line
    }
}

impl CartRepository for InMemoryStore {
    fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLineView>, DomainError> {
        self.record("lines_for_user");
        let state = self.state();
        let mut views: Vec<_> = state
            .lines
            .iter()
            .filter(|l| l.user_id == user_id)
            .filter_map(|l| state.view(l))
            .collect();
        views.sort_by(|a, b| {
            b.added_at
                .cmp(&a.added_at)
                .then_with(|| b.cart_id.cmp(&a.cart_id))
        });
        Ok(views)
    }

    fn line_view(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartLineView>, DomainError> {
        self.record("line_view");
        let state = self.state();
        Ok(state
            .position(user_id, product_id)
            .and_then(|i| state.view(&state.lines[i])))
    }

    fn summary(&self, user_id: UserId) -> Result<CartSummary, DomainError> {
        self.record("summary");
        let state = self.state();
        let views: Vec<_> = state
            .lines
            .iter()
            .filter(|l| l.user_id == user_id)
            .filter_map(|l| state.view(l))
            .collect();
        Ok(CartSummary::from_lines(&views))
    }

    fn find_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartLine>, DomainError> {
        self.record("find_line");
        let state = self.state();
        Ok(state
            .position(user_id, product_id)
            .map(|i| state.lines[i].clone()))
    }

    fn insert_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, DomainError> {
        self.record("insert_line");
        if self
            .failing_inserts
            .lock()
            .expect("lock poisoned")
            .contains(&product_id)
        {
            return Err(DomainError::Storage("simulated insert failure".to_string()));
        }

        let mut state = self.state();
        if self
            .vanishing_products
            .lock()
            .expect("lock poisoned")
            .remove(&product_id)
        {
            state.products.remove(&product_id);
        }
        if !state.products.contains_key(&product_id) {
            return Err(DomainError::not_found(PRODUCT_NOT_FOUND));
        }

        let raced = std::mem::take(&mut *self.race_next_insert.lock().expect("lock poisoned"));
        if raced && state.position(user_id, product_id).is_none() {
            self.push_line(&mut state, user_id, product_id, 1);
        }

        if state.position(user_id, product_id).is_some() {
            return Err(DomainError::conflict("Product is already in the cart"));
        }

        Ok(self.push_line(&mut state, user_id, product_id, quantity))
    }

    fn increment_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        by: i32,
    ) -> Result<Option<CartLine>, DomainError> {
        self.record("increment_line");
        let mut state = self.state();
        let Some(i) = state.position(user_id, product_id) else {
            return Ok(None);
        };
        let quantity = state.lines[i]
            .quantity
            .checked_add(by)
            .ok_or_else(|| DomainError::invalid("Value is out of range"))?;
        state.lines[i].quantity = quantity;
        Ok(Some(state.lines[i].clone()))
    }

    fn update_line_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Option<CartLine>, DomainError> {
        self.record("update_line_quantity");
        let mut state = self.state();
        Ok(state.position(user_id, product_id).map(|i| {
            state.lines[i].quantity = quantity;
            state.lines[i].clone()
        }))
    }

    fn delete_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartLine>, DomainError> {
        self.record("delete_line");
        let mut state = self.state();
        Ok(state
            .position(user_id, product_id)
            .map(|i| state.lines.remove(i)))
    }

    fn delete_line_by_id(
        &self,
        cart_id: CartId,
        user_id: UserId,
    ) -> Result<Option<CartLine>, DomainError> {
        self.record("delete_line_by_id");
        let mut state = self.state();
        Ok(state
            .lines
            .iter()
            .position(|l| l.cart_id == cart_id && l.user_id == user_id)
            .map(|i| state.lines.remove(i)))
    }

    fn clear_all_for_user(&self, user_id: UserId) -> Result<u64, DomainError> {
        self.record("clear_all_for_user");
        if *self.fail_clear.lock().expect("lock poisoned") {
            return Err(DomainError::Storage("simulated clear failure".to_string()));
        }
        let mut state = self.state();
        let before = state.lines.len();
        state.lines.retain(|l| l.user_id != user_id);
        Ok((before - state.lines.len()) as u64)
    }
}

impl ProductLookup for InMemoryStore {
    fn get_by_id(&self, id: ProductId) -> Result<Product, DomainError> {
        self.record("get_product");
        self.state()
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(PRODUCT_NOT_FOUND))
    }
}

impl ProductRepository for InMemoryStore {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.state().products.values().cloned().collect())
    }

    fn create(&self, fields: ProductFields) -> Result<Product, DomainError> {
        let mut state = self.state();
        if state.products.values().any(|p| p.name == fields.name) {
            return Err(DomainError::conflict(
                "A product with this name already exists",
            ));
        }
        state.next_product_id += 1;
        let now = state.now(self.epoch);
        let product = Product {
            id: state.next_product_id,
            image_address: fields.image_address,
            name: fields.name,
            short_title: fields.short_title,
            price: fields.price,
            description: fields.description,
            created_at: now,
            updated_at: now,
        };
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    fn update(&self, id: ProductId, fields: ProductFields) -> Result<Product, DomainError> {
        let mut state = self.state();
        let now = state.now(self.epoch);
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(PRODUCT_NOT_FOUND))?;
        product.image_address = fields.image_address;
        product.name = fields.name;
        product.short_title = fields.short_title;
        product.price = fields.price;
        product.description = fields.description;
        product.updated_at = now;
        Ok(product.clone())
    }

    fn delete(&self, id: ProductId) -> Result<(), DomainError> {
        let mut state = self.state();
        state
            .products
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(PRODUCT_NOT_FOUND))?;
        state.lines.retain(|l| l.product_id != id);
        Ok(())
    }
}

impl UserRepository for InMemoryStore {
    fn create_user(&self, user: NewUser) -> Result<User, DomainError> {
        let mut state = self.state();
        for (existing, _) in state.users.values() {
            if existing.user_name == user.user_name {
                return Err(DomainError::conflict("This username is already registered"));
            }
            if existing.email == user.email {
                return Err(DomainError::conflict("This email is already registered"));
            }
        }
        state.next_user_id += 1;
        let created = User {
            id: state.next_user_id,
            user_name: user.user_name,
            email: user.email,
            full_name: user.full_name,
            phone_number: user.phone_number,
            permission: user.permission,
            created_at: state.now(self.epoch),
        };
        state
            .users
            .insert(created.id, (created.clone(), user.password_hash));
        Ok(created)
    }

    fn find_credentials(
        &self,
        user_name_or_email: &str,
    ) -> Result<Option<StoredCredentials>, DomainError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|(u, _)| u.user_name == user_name_or_email || u.email == user_name_or_email)
            .map(|(u, hash)| StoredCredentials {
                id: u.id,
                password_hash: hash.clone(),
                permission: u.permission,
            }))
    }

    fn list_users(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.state().users.values().map(|(u, _)| u.clone()).collect())
    }

    fn user_by_id(&self, id: UserId) -> Result<User, DomainError> {
        self.state()
            .users
            .get(&id)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))
    }

    fn delete_user(&self, id: UserId) -> Result<(), DomainError> {
        let mut state = self.state();
        state
            .users
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;
        state.lines.retain(|l| l.user_id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn racing_insert_is_absorbed_as_increment() {
        let store = InMemoryStore::new();
        let latte = store.with_product("Latte", 45_000);
        store.race_next_insert();

        let added = store.add_line(7, latte, 2).expect("add failed");

        assert!(added.updated, "lost race must report an update");
        assert_eq!(added.quantity, 3, "racer's 1 plus our 2");
        assert_eq!(
            store.calls(),
            vec!["find_line", "insert_line", "increment_line"]
        );
    }

    #[test]
    fn add_then_add_is_additive() {
        let store = InMemoryStore::new();
        let latte = store.with_product("Latte", 45_000);

        store.add_line(1, latte, 2).expect("add failed");
        let second = store.add_line(1, latte, 5).expect("add failed");

        assert_eq!(second.quantity, 7);
        assert_eq!(store.lines_for_user(1).expect("list failed").len(), 1);
    }

    #[test]
    fn set_quantity_zero_matches_remove() {
        let store = InMemoryStore::new();
        let latte = store.with_product("Latte", 45_000);
        store.add_line(1, latte, 2).expect("add failed");

        assert_eq!(store.set_line_quantity(1, latte, 0), Ok(None));
        assert!(store.find_line(1, latte).expect("find failed").is_none());
        assert!(matches!(
            store.set_line_quantity(1, latte, 0),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn increment_past_i32_is_invalid_input() {
        let store = InMemoryStore::new();
        let latte = store.with_product("Latte", 45_000);
        store.add_line(1, latte, i32::MAX).expect("add failed");

        assert_eq!(
            store.increment_line(1, latte, 1),
            Err(DomainError::invalid("Value is out of range"))
        );
        assert_eq!(
            store.find_line(1, latte).expect("find failed").map(|l| l.quantity),
            Some(i32::MAX)
        );
    }

    #[test]
    fn deleting_product_cascades_to_lines() {
        let store = InMemoryStore::new();
        let latte = store.with_product("Latte", 45_000);
        store.add_line(1, latte, 2).expect("add failed");

        store.delete(latte).expect("delete failed");

        assert!(store.lines_for_user(1).expect("list failed").is_empty());
    }
}
