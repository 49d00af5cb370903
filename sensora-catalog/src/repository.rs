use async_trait::async_trait;

use crate::product::{
    CatalogProduct, FrequencyConverter, NewFrequencyConverter, NewTemperatureSensor, ProductKind,
    ProductRef, TemperatureSensor,
};
use crate::reference::{Category, Manufacturer, NewCategory, NewManufacturer, NewSeries, Series};
use crate::CatalogResult;

/// Data access for the flat lookup entities products reference.
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn create_category(&self, input: NewCategory) -> CatalogResult<Category>;
    async fn list_categories(&self) -> CatalogResult<Vec<Category>>;
    async fn get_category(&self, id: i64) -> CatalogResult<Option<Category>>;
    async fn get_category_by_slug(&self, slug: &str) -> CatalogResult<Option<Category>>;
    async fn update_category(&self, id: i64, input: NewCategory) -> CatalogResult<Category>;
    async fn delete_category(&self, id: i64) -> CatalogResult<()>;

    async fn create_manufacturer(&self, input: NewManufacturer) -> CatalogResult<Manufacturer>;
    async fn list_manufacturers(&self) -> CatalogResult<Vec<Manufacturer>>;
    async fn get_manufacturer(&self, id: i64) -> CatalogResult<Option<Manufacturer>>;
    async fn update_manufacturer(
        &self,
        id: i64,
        input: NewManufacturer,
    ) -> CatalogResult<Manufacturer>;
    async fn delete_manufacturer(&self, id: i64) -> CatalogResult<()>;

    async fn create_series(&self, input: NewSeries) -> CatalogResult<Series>;
    async fn list_series(&self) -> CatalogResult<Vec<Series>>;
    async fn get_series(&self, id: i64) -> CatalogResult<Option<Series>>;
    async fn update_series(&self, id: i64, input: NewSeries) -> CatalogResult<Series>;
    async fn delete_series(&self, id: i64) -> CatalogResult<()>;
}

/// Data access for the concrete product kinds, plus the two cross-kind
/// operations: generic (kind, id) lookup and the per-kind newest slice.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_sensor(&self, input: NewTemperatureSensor) -> CatalogResult<TemperatureSensor>;
    async fn list_sensors(&self) -> CatalogResult<Vec<TemperatureSensor>>;
    async fn get_sensor(&self, id: i64) -> CatalogResult<Option<TemperatureSensor>>;
    async fn update_sensor(
        &self,
        id: i64,
        input: NewTemperatureSensor,
    ) -> CatalogResult<TemperatureSensor>;
    async fn delete_sensor(&self, id: i64) -> CatalogResult<()>;

    async fn create_converter(
        &self,
        input: NewFrequencyConverter,
    ) -> CatalogResult<FrequencyConverter>;
    async fn list_converters(&self) -> CatalogResult<Vec<FrequencyConverter>>;
    async fn get_converter(&self, id: i64) -> CatalogResult<Option<FrequencyConverter>>;
    async fn update_converter(
        &self,
        id: i64,
        input: NewFrequencyConverter,
    ) -> CatalogResult<FrequencyConverter>;
    async fn delete_converter(&self, id: i64) -> CatalogResult<()>;

    /// Resolve a generic (kind, id) reference to the product it names.
    async fn get_product(&self, product: ProductRef) -> CatalogResult<Option<CatalogProduct>>;

    /// The `limit` newest products of one kind, newest first.
    async fn latest_products(
        &self,
        kind: ProductKind,
        limit: i64,
    ) -> CatalogResult<Vec<CatalogProduct>>;
}
