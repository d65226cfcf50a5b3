//! Development dataset for the market back office.
//!
//! Seeds the mock API with a small but realistic catalog so the UI has
//! something to show: a few categories, clients, a shelf of products (one
//! of them inactive) and purchases in each status.

use anyhow::Result;
use jiff::civil::DateTime;
use payloads::{
    Category, CategoryId, Client, ClientId, Product, ProductDraft, Purchase,
    PurchaseDraft, PurchaseItemDraft, PurchaseStatus,
};
use rust_decimal::{Decimal, dec};

use crate::TestApp;

pub struct DevDataset {
    pub categories: Vec<Category>,
    pub clients: Vec<Client>,
    pub products: Vec<Product>,
    pub purchases: Vec<Purchase>,
}

impl DevDataset {
    pub async fn create(app: &TestApp) -> Result<Self> {
        tracing::info!("🗂️ Creating categories and clients");
        let categories = categories();
        let clients = clients();
        {
            let mut store = app.backend.store();
            for category in &categories {
                store.add_category(category.clone());
            }
            for client in &clients {
                store.add_client(client.clone());
            }
        }

        tracing::info!("🛒 Creating products");
        let mut products = Vec::new();
        for draft in product_drafts() {
            products.push(app.client.save_product(&draft).await?);
        }

        tracing::info!("🧾 Creating purchases");
        let mut purchases = Vec::new();
        for draft in purchase_drafts(&clients, &products) {
            purchases.push(app.client.create_purchase(&draft).await?);
        }

        Ok(Self {
            categories,
            clients,
            products,
            purchases,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Development dataset:");
        tracing::info!("   {} categories", self.categories.len());
        for client in &self.clients {
            tracing::info!("   client {} ({})", client.full_name(), client.client_id);
        }
        for product in &self.products {
            tracing::info!(
                "   product #{} {} at {} ({} in stock{})",
                product.product_id,
                product.name,
                product.price,
                product.stock,
                if product.active { "" } else { ", inactive" }
            );
        }
        for purchase in &self.purchases {
            tracing::info!(
                "   purchase #{} by {}: {} ({})",
                purchase.purchase_id,
                purchase.client_label(),
                purchase.total(),
                purchase.status.label()
            );
        }
    }
}

fn categories() -> Vec<Category> {
    [(1, "Dairy"), (2, "Bakery"), (3, "Produce"), (4, "Pantry")]
        .into_iter()
        .map(|(id, name)| Category {
            category_id: CategoryId(id),
            category: name.into(),
            active: true,
        })
        .collect()
}

fn clients() -> Vec<Client> {
    vec![
        Client {
            client_id: ClientId("4546221".into()),
            first_name: "Sam".into(),
            last_name: "Rivera".into(),
            phone: Some("3001234567".into()),
            address: Some("Calle 10 #4-21".into()),
            email: Some("sam@example.com".into()),
        },
        Client {
            client_id: ClientId("8812004".into()),
            first_name: "Noor".into(),
            last_name: "Haddad".into(),
            phone: None,
            address: None,
            email: Some("noor@example.com".into()),
        },
    ]
}

fn product_drafts() -> Vec<ProductDraft> {
    let shelf = [
        ("Whole milk 1L", 1, "7701234000011", dec!(2.50), 40),
        ("Cheddar 250g", 1, "7701234000028", dec!(4.75), 12),
        ("Sourdough loaf", 2, "7701234000035", dec!(3.20), 8),
        ("Bananas 1kg", 3, "7701234000042", dec!(1.10), 60),
        ("Rice 5kg", 4, "7701234000059", dec!(9.90), 20),
    ];
    let mut drafts: Vec<ProductDraft> = shelf
        .into_iter()
        .map(|(name, category, barcode, price, stock)| ProductDraft {
            category_id: Some(CategoryId(category)),
            barcode: Some(barcode.into()),
            ..ProductDraft::new(name, price, stock)
        })
        .collect();

    // discontinued, kept for old purchases
    drafts.push(ProductDraft {
        active: false,
        ..ProductDraft::new("Rye crackers", dec!(2.00), 0)
    });
    drafts
}

fn purchase_drafts(clients: &[Client], products: &[Product]) -> Vec<PurchaseDraft> {
    let line = |index: usize, quantity: i32| {
        let product = &products[index % products.len()];
        PurchaseItemDraft {
            product_id: product.product_id,
            quantity,
            total: product.price * Decimal::from(quantity),
        }
    };
    let client = |index: usize| clients[index % clients.len()].client_id.clone();

    vec![
        PurchaseDraft {
            purchase_id: None,
            client_id: client(0),
            date: Some(DateTime::constant(2025, 3, 1, 9, 15, 0, 0)),
            payment_method: "CASH".into(),
            comment: None,
            status: PurchaseStatus::Completed,
            items: vec![line(0, 2), line(2, 1)],
        },
        PurchaseDraft {
            purchase_id: None,
            client_id: client(1),
            date: Some(DateTime::constant(2025, 3, 2, 17, 40, 0, 0)),
            payment_method: "CARD".into(),
            comment: Some("Deliver after 6pm".into()),
            status: PurchaseStatus::Pending,
            items: vec![line(3, 3), line(4, 1), line(1, 1)],
        },
        PurchaseDraft {
            purchase_id: None,
            client_id: client(0),
            date: Some(DateTime::constant(2025, 3, 4, 11, 5, 0, 0)),
            payment_method: "CASH".into(),
            comment: Some("Customer changed their mind".into()),
            status: PurchaseStatus::Cancelled,
            items: vec![line(5, 4)],
        },
    ]
}
