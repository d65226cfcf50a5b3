//! Records exchanged with the market back office API.
//!
//! Field names follow the English camelCase schema on the wire
//! (`productId`, `price`, `stock`, ...). Money is a [`Decimal`] carried as a
//! JSON number.

use derive_more::Display;
use jiff::civil::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProductId(pub i64);

#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CategoryId(pub i64);

#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PurchaseId(pub i64);

/// Clients are keyed by their document number, which is not numeric.
#[derive(
    Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ClientId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: CategoryId,
    pub category: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    pub active: bool,
    /// Expanded category, when the server joins it in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// A product as submitted for saving. Without an id the server creates a new
/// product; with one it updates the existing product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    pub active: bool,
}

impl ProductDraft {
    /// A draft for a new product with no category or barcode.
    pub fn new(name: impl Into<String>, price: Decimal, stock: i32) -> Self {
        Self {
            product_id: None,
            name: name.into(),
            category_id: None,
            barcode: None,
            price,
            stock,
            active: true,
        }
    }
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self {
            product_id: Some(product.product_id),
            name: product.name,
            category_id: product.category_id,
            barcode: product.barcode,
            price: product.price,
            stock: product.stock,
            active: product.active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub client_id: ClientId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl PurchaseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub purchase_id: PurchaseId,
    pub client_id: ClientId,
    pub date: DateTime,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub status: PurchaseStatus,
    #[serde(default)]
    pub items: Vec<PurchaseItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
}

impl Purchase {
    /// Sum of the line totals.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.total).sum()
    }

    /// Client name when the server expanded it, the client id otherwise.
    pub fn client_label(&self) -> String {
        match &self.client {
            Some(client) => client.full_name(),
            None => self.client_id.to_string(),
        }
    }
}

/// A purchase as submitted for creation. The server assigns the date when
/// none is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_id: Option<PurchaseId>,
    pub client_id: ClientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime>,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub status: PurchaseStatus,
    pub items: Vec<PurchaseItemDraft>,
}

/// Payment methods offered at the counter.
pub const PAYMENT_METHODS: [&str; 3] = ["CASH", "CARD", "TRANSFER"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseDraftError {
    #[error("Please select a client")]
    NoClient,
    #[error("Please add at least one product")]
    NoItems,
}

impl PurchaseDraft {
    /// An empty cart. The server dates it on creation.
    pub fn new(client_id: ClientId, payment_method: impl Into<String>) -> Self {
        Self {
            purchase_id: None,
            client_id,
            date: None,
            payment_method: payment_method.into(),
            comment: None,
            status: PurchaseStatus::default(),
            items: Vec::new(),
        }
    }

    /// Add `quantity` units of `product`. Adding a product already in the
    /// cart grows its line instead of adding a second one.
    pub fn add_product(&mut self, product: &Product, quantity: i32) {
        if quantity <= 0 {
            return;
        }
        let index = match self
            .items
            .iter()
            .position(|item| item.product_id == product.product_id)
        {
            Some(index) => {
                self.items[index].quantity += quantity;
                index
            }
            None => {
                self.items.push(PurchaseItemDraft {
                    product_id: product.product_id,
                    quantity,
                    total: Decimal::ZERO,
                });
                self.items.len() - 1
            }
        };
        let item = &mut self.items[index];
        item.total = product.price * Decimal::from(item.quantity);
    }

    pub fn remove_product(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.product_id != product_id);
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.total).sum()
    }

    /// Whether the draft can be submitted.
    pub fn check(&self) -> Result<(), PurchaseDraftError> {
        if self.client_id.0.trim().is_empty() {
            return Err(PurchaseDraftError::NoClient);
        }
        if self.items.is_empty() {
            return Err(PurchaseDraftError::NoItems);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItemDraft {
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

fn default_true() -> bool {
    true
}
