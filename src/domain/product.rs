use super::account::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A catalog entry. Order lines snapshot the price at order time, so editing
/// or re-creating a product never alters a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Amount,
    pub description: String,
    pub image_ref: String,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        price: Amount,
        description: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId::generate(),
            name: name.into(),
            price,
            description: description.into(),
            image_ref: image_ref.into(),
        }
    }
}
