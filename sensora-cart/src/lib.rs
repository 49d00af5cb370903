pub mod cart;
pub mod customer;
pub mod repository;

pub use cart::{validate_qty, Cart, CartLine, NewCartLine};
pub use customer::{Customer, NewCustomer};
pub use repository::{CartRepository, CustomerRepository};

use sensora_catalog::ProductRef;

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    #[error("cart not found: {0}")]
    CartNotFound(i64),

    #[error("cart line not found: {0}")]
    LineNotFound(i64),

    #[error("customer not found: {0}")]
    CustomerNotFound(i64),

    #[error("no {} with id {}", .0.kind, .0.id)]
    UnknownProduct(ProductRef),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type CartResult<T> = Result<T, CartError>;
