pub mod latest;
pub mod product;
pub mod reference;
pub mod repository;

pub use latest::LatestProducts;
pub use product::{
    CatalogProduct, FrequencyConverter, NewFrequencyConverter, NewProduct, NewTemperatureSensor,
    ProductCore, ProductKind, ProductRef, TemperatureSensor,
};
pub use reference::{Category, Manufacturer, NewCategory, NewManufacturer, NewSeries, Series};
pub use repository::{ProductRepository, ReferenceRepository};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate slug: {0}")]
    DuplicateSlug(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
