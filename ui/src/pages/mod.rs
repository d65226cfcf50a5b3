pub mod dashboard;
pub mod not_found;
pub mod product_detail;
pub mod products;
pub mod purchase_detail;
pub mod purchase_new;
pub mod purchases;

pub use dashboard::DashboardPage;
pub use not_found::NotFoundPage;
pub use product_detail::ProductDetailPage;
pub use products::ProductsPage;
pub use purchase_detail::PurchaseDetailPage;
pub use purchase_new::PurchaseNewPage;
pub use purchases::PurchasesPage;
