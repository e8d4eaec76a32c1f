// storefront/src/lib.rs

//! Server-rendered storefront over the `kasse` cart engine: product
//! listings, product pages, the editable cart and the checkout summary.

pub mod config;
pub mod errors;
pub mod pages;
pub mod session;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::AppError;
pub use state::AppState;
