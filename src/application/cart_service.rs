use crate::domain::cart::{
    AddItemRequest, Cart, CartLine, CartSummary, RemoveItemRequest, UpdateItemRequest,
};
use crate::domain::catalog::Product;
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;

/// Cart operations that need the catalog: existence checks on write and
/// live pricing on read. The cart itself is passed in by its owner.
pub struct CartService<R> {
    catalog: R,
}

impl<R: CatalogRepository> CartService<R> {
    pub fn new(catalog: R) -> Self {
        Self { catalog }
    }

    fn resolve(&self, product_id: i32) -> Result<Product, DomainError> {
        self.catalog
            .get_product(product_id)?
            .ok_or_else(|| DomainError::product_not_found(product_id))
    }

    /// Adds units of a product, summing onto any quantity already in the cart.
    pub fn add_item(&self, cart: &mut Cart, req: &AddItemRequest) -> Result<CartLine, DomainError> {
        let product = self.resolve(req.product_id)?;
        let quantity = cart.add(product.id, req.quantity)?;
        log::debug!("cart: product {} now at quantity {quantity}", product.id);
        Ok(CartLine::new(&product, quantity))
    }

    /// Sets the absolute quantity of a product already in the cart.
    pub fn update_item(
        &self,
        cart: &mut Cart,
        req: &UpdateItemRequest,
    ) -> Result<CartLine, DomainError> {
        if cart.quantity_of(req.product_id).is_none() {
            return Err(DomainError::product_not_found(req.product_id));
        }
        let product = match self.resolve(req.product_id) {
            Ok(product) => product,
            Err(err @ DomainError::NotFound { .. }) => {
                log::warn!("cart: pruning stale product {}", req.product_id);
                cart.prune(&[req.product_id]);
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        cart.set(product.id, req.quantity)?;
        log::debug!("cart: product {} set to quantity {}", product.id, req.quantity);
        Ok(CartLine::new(&product, req.quantity))
    }

    pub fn remove_item(&self, cart: &mut Cart, req: &RemoveItemRequest) -> Result<(), DomainError> {
        cart.remove(req.product_id)?;
        log::debug!("cart: removed product {}", req.product_id);
        Ok(())
    }

    pub fn clear(&self, cart: &mut Cart) {
        cart.clear();
    }

    /// Prices every entry at the current catalog price.
    ///
    /// Entries whose product no longer exists are left out and pruned from
    /// the cart. Storage failures still fail the whole view.
    pub fn view(&self, cart: &mut Cart) -> Result<CartSummary, DomainError> {
        let mut lines = Vec::with_capacity(cart.len());
        let mut stale = Vec::new();

        for entry in cart.entries() {
            match self.catalog.get_product(entry.product_id)? {
                Some(product) => lines.push(CartLine::new(&product, entry.quantity)),
                None => stale.push(entry.product_id),
            }
        }

        if !stale.is_empty() {
            log::warn!("cart: pruning stale products {stale:?}");
            cart.prune(&stale);
        }

        Ok(CartSummary::from_lines(lines))
    }
}
