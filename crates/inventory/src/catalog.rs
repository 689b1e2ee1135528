//! Product catalog: current product records in insertion order.

use stockbook_core::entity::position_of;
use stockbook_core::ProductId;

use crate::product::Product;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        position_of(&self.products, id).map(|idx| &self.products[idx])
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        position_of(&self.products, id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn as_slice(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Replace the record with the same id in place, or append it.
    ///
    /// Returns the replaced record, if any.
    pub(crate) fn upsert(&mut self, product: Product) -> Option<Product> {
        match position_of(&self.products, product.id_typed()) {
            Some(idx) => Some(core::mem::replace(&mut self.products[idx], product)),
            None => {
                self.products.push(product);
                None
            }
        }
    }

    pub(crate) fn remove(&mut self, id: &ProductId) -> Option<Product> {
        position_of(&self.products, id).map(|idx| self.products.remove(idx))
    }

    pub(crate) fn find_mut(&mut self, id: &ProductId) -> Option<&mut Product> {
        position_of(&self.products, id).map(move |idx| &mut self.products[idx])
    }
}
