use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, warn};

use stockroom_core::{Entity, ProductId};
use stockroom_products::Product;

/// Lock-protected warehouse state.
#[derive(Debug)]
struct State {
    products: Vec<Product>,
    next_id: ProductId,
}

impl State {
    fn empty() -> Self {
        Self {
            products: Vec::new(),
            next_id: ProductId::FIRST,
        }
    }

    /// Keep the generator clear of an id that entered the collection.
    /// The counter stops at [`ProductId::MAX`].
    fn observe_id(&mut self, id: ProductId) {
        if id >= self.next_id {
            self.next_id = id.next().unwrap_or(ProductId::MAX);
        }
    }
}

/// The process-wide product collection plus its id generator.
///
/// Every method takes the same mutex for its whole duration, so each call is
/// atomic with respect to every other call, from any thread. Queries return
/// owned snapshots; nothing handed out borrows the internal `Vec`.
///
/// Share it with `Arc<Warehouse>`; there is no global instance.
#[derive(Debug)]
pub struct Warehouse {
    inner: Mutex<State>,
}

impl Warehouse {
    /// Create an empty warehouse whose first generated id is `1`.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(State::empty()),
        }
    }

    /// Every mutation is a single `Vec` operation followed by a counter bump,
    /// so state left behind by a panicking holder is still consistent.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand out the next id and advance the counter.
    pub fn generate_id(&self) -> ProductId {
        let mut state = self.lock();
        let id = state.next_id;
        match id.next() {
            Some(next) => state.next_id = next,
            None => warn!(product_id = %id, "product id space exhausted"),
        }
        id
    }

    /// The id the next call to [`Warehouse::generate_id`] would return.
    pub fn peek_next_id(&self) -> ProductId {
        self.lock().next_id
    }

    /// Append a product.
    ///
    /// The product's id is honored as-is; if it is at or beyond the counter the
    /// counter moves past it, so later generated ids cannot collide with it.
    pub fn add(&self, product: Product) {
        let mut state = self.lock();
        let id = product.id();
        state.observe_id(id);
        state.products.push(product);
        debug!(product_id = %id, next_id = %state.next_id, "product added");
    }

    /// Remove every product carrying `id`. Returns how many were removed;
    /// removing an unknown id is not an error.
    pub fn remove_by_id(&self, id: ProductId) -> usize {
        let mut state = self.lock();
        let before = state.products.len();
        state.products.retain(|p| p.id() != id);
        let removed = before - state.products.len();
        debug!(product_id = %id, removed, "remove by id");
        removed
    }

    /// First product with `id`, if any.
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.lock().products.iter().find(|p| p.id() == id).cloned()
    }

    /// Snapshot of all products in insertion order.
    pub fn list_all(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    /// Snapshot of the food products whose expiration date is strictly before
    /// `as_of`, in insertion order. Electronics are never included.
    pub fn list_expired_food(&self, as_of: NaiveDate) -> Vec<Product> {
        self.lock()
            .products
            .iter()
            .filter(|p| p.is_expired(as_of))
            .cloned()
            .collect()
    }

    /// Atomically swap the whole collection (used when loading from disk).
    ///
    /// The counter is reset, then moved past every loaded id and finally to at
    /// least `next_id`.
    pub fn replace_all(&self, products: Vec<Product>, next_id: ProductId) {
        let mut state = self.lock();
        *state = State::empty();
        for product in &products {
            state.observe_id(product.id());
        }
        if next_id > state.next_id {
            state.next_id = next_id;
        }
        state.products = products;
        debug!(count = state.products.len(), next_id = %state.next_id, "warehouse replaced");
    }

    pub fn len(&self) -> usize {
        self.lock().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().products.is_empty()
    }
}

impl Default for Warehouse {
    fn default() -> Self {
        Self::new()
    }
}
