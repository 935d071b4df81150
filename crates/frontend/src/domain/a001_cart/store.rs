use contracts::domain::a001_cart::aggregate::{CartItem, ProductId};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::storage::{PersistTarget, CART_STORAGE_KEY};

/// Cart lines, unique by product id, in the order they were first added
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    #[serde(default)]
    pub carts: Vec<CartItem>,
}

impl CartState {
    /// Re-adding a product overwrites its quantity. Quantity 0 counts as unspecified (1).
    pub fn add_to_cart(&mut self, mut item: CartItem) {
        if item.quantity == 0 {
            item.quantity = 1;
        }
        match self.carts.iter_mut().find(|c| c.id == item.id) {
            Some(existing) => existing.quantity = item.quantity,
            None => self.carts.push(item),
        }
    }

    /// Zero is kept; removing is a separate action
    pub fn update_cart(&mut self, id: ProductId, quantity: u32) {
        if let Some(existing) = self.carts.iter_mut().find(|c| c.id == id) {
            existing.quantity = quantity;
        }
    }

    pub fn remove_cart(&mut self, id: ProductId) {
        self.carts.retain(|c| c.id != id);
    }

    pub fn clear_cart(&mut self) {
        self.carts.clear();
    }

    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.carts.iter().find(|c| c.id == id)
    }

    pub fn total_items(&self) -> u64 {
        self.carts.iter().map(|c| u64::from(c.quantity)).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.carts.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }
}

/// Reactive cart shared through context; every change is written to session storage
#[derive(Clone, Copy)]
pub struct CartStore {
    state: RwSignal<CartState>,
    persist: StoredValue<PersistTarget, LocalStorage>,
}

impl CartStore {
    pub fn new(persist: PersistTarget) -> Self {
        let initial = persist.load::<CartState>().unwrap_or_default();
        log::debug!("cart: restored {} lines", initial.carts.len());
        Self {
            state: RwSignal::new(initial),
            persist: StoredValue::new_local(persist),
        }
    }

    pub fn from_session() -> Self {
        Self::new(PersistTarget::session(CART_STORAGE_KEY))
    }

    fn mutate(&self, f: impl FnOnce(&mut CartState)) {
        self.state.update(f);
        self.state
            .with_untracked(|state| self.persist.with_value(|p| p.save(state)));
    }

    pub fn add_to_cart(&self, item: CartItem) {
        self.mutate(|s| s.add_to_cart(item));
    }

    pub fn update_cart(&self, id: ProductId, quantity: u32) {
        self.mutate(|s| s.update_cart(id, quantity));
    }

    pub fn remove_cart(&self, id: ProductId) {
        self.mutate(|s| s.remove_cart(id));
    }

    pub fn clear_cart(&self) {
        self.mutate(CartState::clear_cart);
    }

    pub fn carts(&self) -> Vec<CartItem> {
        self.state.with(|s| s.carts.clone())
    }

    pub fn quantity_of(&self, id: ProductId) -> Option<u32> {
        self.state.with(|s| s.get(id).map(|c| c.quantity))
    }

    pub fn total_items(&self) -> u64 {
        self.state.with(CartState::total_items)
    }

    pub fn total_price(&self) -> f64 {
        self.state.with(CartState::total_price)
    }
}

pub fn provide_cart_store() -> CartStore {
    let store = CartStore::from_session();
    provide_context(store);
    store
}

pub fn use_cart_store() -> CartStore {
    use_context::<CartStore>().expect("CartStore not provided")
}
