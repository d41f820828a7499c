//! Client-side cart arithmetic.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s keyed by drug id. Every
//! constructor and mutation maintains two invariants:
//!
//! - at most one line per [`DrugId`]
//! - every quantity is at least 1
//!
//! The serialized form is a JSON array of drug objects with a `quantity`
//! field alongside the drug's own fields, which is the shape stored under
//! the `cart` key. Stored data that breaks the invariants (duplicate ids,
//! zero or missing quantities) is repaired on load rather than rejected.

use serde::{Deserialize, Serialize};

use crate::types::{Drug, DrugId, Price};

const fn default_quantity() -> u32 {
    1
}

/// A drug paired with a purchase quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub drug: Drug,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartLine {
    /// A new line with quantity 1.
    #[must_use]
    pub const fn new(drug: Drug) -> Self {
        Self { drug, quantity: 1 }
    }

    /// The line's drug id (its identity in the cart).
    #[must_use]
    pub const fn id(&self) -> DrugId {
        self.drug.id
    }

    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.drug.price.times(self.quantity)
    }
}

/// Ordered collection of cart lines, unique by drug id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up the line for a drug.
    #[must_use]
    pub fn get(&self, id: DrugId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct drugs in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add one unit of `drug`.
    ///
    /// Increments the existing line for the drug's id, or appends a new line
    /// with quantity 1. An existing line keeps the drug details it was first
    /// added with.
    pub fn add_or_increment(&mut self, drug: &Drug) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id() == drug.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine::new(drug.clone()));
        }
    }

    /// Adjust a line's quantity by `delta`, never going below 1.
    ///
    /// Unknown ids are ignored. Returns `true` if a line was found.
    pub fn change_quantity(&mut self, id: DrugId, delta: i64) -> bool {
        let Some(line) = self.lines.iter_mut().find(|line| line.id() == id) else {
            return false;
        };

        let updated = i64::from(line.quantity).saturating_add(delta).max(1);
        line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        true
    }

    /// Remove the line for `id`. Returns `true` if a line was removed.
    pub fn remove(&mut self, id: DrugId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id() != id);
        self.lines.len() != before
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
    }
}

impl From<Vec<CartLine>> for Cart {
    /// Build a cart from raw lines, merging duplicate ids and clamping
    /// quantities to at least 1.
    fn from(raw: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for mut line in raw {
            line.quantity = line.quantity.max(1);
            if let Some(existing) = cart.lines.iter_mut().find(|l| l.id() == line.id()) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else {
                cart.lines.push(line);
            }
        }
        cart
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
