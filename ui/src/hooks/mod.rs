pub mod use_dashboard;
pub mod use_fetch;
pub mod use_resource;
pub mod use_title;

pub use use_dashboard::use_dashboard;
pub use use_fetch::{FetchHookReturn, use_fetch};
pub use use_resource::{
    ResourceActions, ResourceHookReturn, use_products, use_purchases,
};
pub use use_title::use_title;
