//! In-memory records behind the mock API.

use std::collections::BTreeMap;

use jiff::Zoned;
use payloads::{
    Category, CategoryId, Client, ClientId, Product, ProductDraft, ProductId,
    Purchase, PurchaseDraft, PurchaseId, PurchaseItem,
};
use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),
    #[error("Purchase {0} not found")]
    PurchaseNotFound(PurchaseId),
    #[error("Category {0} not found")]
    CategoryNotFound(CategoryId),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Default)]
pub struct MarketStore {
    categories: BTreeMap<CategoryId, Category>,
    clients: BTreeMap<ClientId, Client>,
    products: BTreeMap<ProductId, Product>,
    purchases: BTreeMap<PurchaseId, Purchase>,
    last_product_id: i64,
    last_purchase_id: i64,
}

impl MarketStore {
    pub fn add_category(&mut self, category: Category) {
        self.categories.insert(category.category_id, category);
    }

    pub fn add_client(&mut self, client: Client) {
        self.clients.insert(client.client_id.clone(), client);
    }

    pub fn list_clients(&self) -> Vec<Client> {
        self.clients.values().cloned().collect()
    }

    pub fn list_products(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    pub fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        self.products
            .get(&id)
            .cloned()
            .ok_or(StoreError::ProductNotFound(id))
    }

    pub fn products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError> {
        if !self.categories.contains_key(&category_id) {
            return Err(StoreError::CategoryNotFound(category_id));
        }
        Ok(self
            .products
            .values()
            .filter(|product| product.category_id == Some(category_id))
            .cloned()
            .collect())
    }

    /// Insert a new product or replace an existing one.
    pub fn save_product(
        &mut self,
        draft: ProductDraft,
    ) -> Result<Product, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Invalid("Product name is required".into()));
        }
        if draft.price < Decimal::ZERO {
            return Err(StoreError::Invalid("Price cannot be negative".into()));
        }
        if draft.stock < 0 {
            return Err(StoreError::Invalid("Stock cannot be negative".into()));
        }
        let category = match draft.category_id {
            Some(id) => Some(
                self.categories
                    .get(&id)
                    .cloned()
                    .ok_or(StoreError::CategoryNotFound(id))?,
            ),
            None => None,
        };

        let product_id = match draft.product_id {
            Some(id) if self.products.contains_key(&id) => id,
            Some(id) => return Err(StoreError::ProductNotFound(id)),
            None => {
                self.last_product_id += 1;
                ProductId(self.last_product_id)
            }
        };

        let product = Product {
            product_id,
            name: draft.name,
            category_id: draft.category_id,
            barcode: draft.barcode,
            price: draft.price,
            stock: draft.stock,
            active: draft.active,
            category,
        };
        self.products.insert(product_id, product.clone());
        Ok(product)
    }

    pub fn delete_product(&mut self, id: ProductId) -> Result<(), StoreError> {
        self.products
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::ProductNotFound(id))
    }

    pub fn list_purchases(&self) -> Vec<Purchase> {
        self.purchases.values().cloned().collect()
    }

    pub fn get_purchase(&self, id: PurchaseId) -> Result<Purchase, StoreError> {
        self.purchases
            .get(&id)
            .cloned()
            .ok_or(StoreError::PurchaseNotFound(id))
    }

    pub fn purchases_by_client(&self, client_id: &ClientId) -> Vec<Purchase> {
        self.purchases
            .values()
            .filter(|purchase| &purchase.client_id == client_id)
            .cloned()
            .collect()
    }

    pub fn create_purchase(
        &mut self,
        draft: PurchaseDraft,
    ) -> Result<Purchase, StoreError> {
        if draft.items.is_empty() {
            return Err(StoreError::Invalid(
                "A purchase needs at least one item".into(),
            ));
        }
        if draft.payment_method.trim().is_empty() {
            return Err(StoreError::Invalid("Payment method is required".into()));
        }

        let mut items = Vec::with_capacity(draft.items.len());
        for item in draft.items {
            if item.quantity <= 0 {
                return Err(StoreError::Invalid(
                    "Quantities must be positive".into(),
                ));
            }
            let product = self.get_product(item.product_id)?;
            items.push(PurchaseItem {
                product_id: item.product_id,
                quantity: item.quantity,
                total: item.total,
                active: true,
                product: Some(product),
            });
        }

        self.last_purchase_id += 1;
        let purchase = Purchase {
            purchase_id: PurchaseId(self.last_purchase_id),
            client: self.clients.get(&draft.client_id).cloned(),
            client_id: draft.client_id,
            date: draft.date.unwrap_or_else(|| Zoned::now().datetime()),
            payment_method: draft.payment_method,
            comment: draft.comment,
            status: draft.status,
            items,
        };
        self.purchases.insert(purchase.purchase_id, purchase.clone());
        Ok(purchase)
    }

    pub fn delete_purchase(&mut self, id: PurchaseId) -> Result<(), StoreError> {
        self.purchases
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::PurchaseNotFound(id))
    }
}
