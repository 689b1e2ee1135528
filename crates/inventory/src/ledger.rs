//! Movement ledger: append-only log of applied stock movements.

use stockbook_core::ProductId;

use crate::movement::Movement;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    movements: Vec<Movement>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_movements(movements: Vec<Movement>) -> Self {
        Self { movements }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movement> {
        self.movements.iter()
    }

    pub fn as_slice(&self) -> &[Movement] {
        &self.movements
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// Movements of one product, in append order.
    pub fn for_product<'a>(&'a self, product_id: &'a ProductId) -> impl Iterator<Item = &'a Movement> {
        self.movements
            .iter()
            .filter(move |m| m.product_id() == product_id)
    }

    pub(crate) fn append(&mut self, movement: Movement) {
        self.movements.push(movement);
    }
}
