use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;

pub type CartHandle = Arc<Mutex<Cart>>;

/// Shopper carts keyed by an opaque session id.
///
/// The map lock is held only to look up or insert a handle; each cart has its
/// own lock so one shopper never waits on another.
///
/// Carts have no expiry. A cart stays in memory until it is discarded or the
/// process restarts, so abandoned carts accumulate for the life of the server.
#[derive(Debug, Default)]
pub struct CartStore {
    carts: Mutex<HashMap<Uuid, CartHandle>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn carts(&self) -> Result<MutexGuard<'_, HashMap<Uuid, CartHandle>>, DomainError> {
        self.carts
            .lock()
            .map_err(|_| DomainError::Internal("cart store lock poisoned".to_string()))
    }

    pub fn create(&self) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        let mut carts = self.carts()?;
        carts.insert(id, Arc::new(Mutex::new(Cart::new())));
        log::debug!("opened cart {id}, {} open", carts.len());
        Ok(id)
    }

    /// Number of carts currently held, abandoned ones included.
    pub fn open_count(&self) -> Result<usize, DomainError> {
        Ok(self.carts()?.len())
    }

    pub fn get(&self, id: Uuid) -> Result<Option<CartHandle>, DomainError> {
        Ok(self.carts()?.get(&id).cloned())
    }

    /// Returns `false` when no cart had this id.
    pub fn discard(&self, id: Uuid) -> Result<bool, DomainError> {
        let removed = self.carts()?.remove(&id).is_some();
        if removed {
            log::debug!("discarded cart {id}");
        }
        Ok(removed)
    }

    /// Runs `f` with exclusive access to one cart.
    pub fn with_cart<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Cart) -> Result<T, DomainError>,
    ) -> Result<Option<T>, DomainError> {
        let Some(handle) = self.get(id)? else {
            return Ok(None);
        };
        let mut cart = handle
            .lock()
            .map_err(|_| DomainError::Internal(format!("cart {id} lock poisoned")))?;
        f(&mut cart).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carts_are_isolated() {
        let store = CartStore::new();
        let a = store.create().expect("create");
        let b = store.create().expect("create");

        store
            .with_cart(a, |cart| cart.add(1, 2))
            .expect("with_cart")
            .expect("cart exists");

        let b_len = store
            .with_cart(b, |cart| Ok(cart.len()))
            .expect("with_cart")
            .expect("cart exists");
        assert_eq!(b_len, 0);
    }

    #[test]
    fn unknown_cart_yields_none() {
        let store = CartStore::new();
        let result = store
            .with_cart(Uuid::new_v4(), |cart| Ok(cart.len()))
            .expect("with_cart");
        assert!(result.is_none());
    }

    #[test]
    fn carts_stay_open_until_discarded() {
        let store = CartStore::new();
        let kept = store.create().expect("create");
        let abandoned = store.create().expect("create");
        assert_eq!(store.open_count().expect("count"), 2);

        store.discard(kept).expect("discard");
        assert_eq!(store.open_count().expect("count"), 1);
        assert!(store.get(abandoned).expect("get").is_some());
    }

    #[test]
    fn discard_removes_cart() {
        let store = CartStore::new();
        let id = store.create().expect("create");
        assert!(store.discard(id).expect("discard"));
        assert!(!store.discard(id).expect("discard"));
        assert!(store.get(id).expect("get").is_none());
    }
}
