use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use sensora_catalog::product::{
    CatalogProduct, FrequencyConverter, NewFrequencyConverter, NewTemperatureSensor, ProductCore,
    ProductKind, ProductRef, TemperatureSensor,
};
use sensora_catalog::reference::{
    Category, Manufacturer, NewCategory, NewManufacturer, NewSeries, Series,
};
use sensora_catalog::repository::{ProductRepository, ReferenceRepository};
use sensora_catalog::{CatalogError, CatalogResult};

pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage(err: sqlx::Error) -> CatalogError {
    CatalogError::Storage(Box::new(err))
}

/// Write-path mapping: a unique violation on the slug index surfaces as a
/// validation failure instead of an opaque storage error.
fn write_error(err: sqlx::Error, slug: &str) -> CatalogError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            return CatalogError::DuplicateSlug(slug.to_string());
        }
    }
    storage(err)
}

// Internal structs for type-safe querying

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    slug: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ManufacturerRow {
    id: i64,
    name: String,
    slug: String,
}

impl From<ManufacturerRow> for Manufacturer {
    fn from(row: ManufacturerRow) -> Self {
        Manufacturer {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SeriesRow {
    id: i64,
    name: String,
    slug: String,
    manufacturer_id: i64,
}

impl From<SeriesRow> for Series {
    fn from(row: SeriesRow) -> Self {
        Series {
            id: row.id,
            name: row.name,
            slug: row.slug,
            manufacturer_id: row.manufacturer_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SensorRow {
    id: i64,
    category_id: i64,
    manufacturer_id: i64,
    series_id: i64,
    title: String,
    slug: String,
    image: Option<String>,
    description: Option<String>,
    manual_doc: Option<String>,
    price: Decimal,
    created_at: DateTime<Utc>,
    temp_range: Option<String>,
    operating_temp: Option<String>,
    measure_error: Option<String>,
    ip_connect: Option<String>,
    ip_sensor: Option<String>,
    probe_material: Option<String>,
    sensor: Option<String>,
    sensor_length: Option<String>,
}

impl From<SensorRow> for TemperatureSensor {
    fn from(row: SensorRow) -> Self {
        TemperatureSensor {
            core: ProductCore {
                id: row.id,
                category_id: row.category_id,
                manufacturer_id: row.manufacturer_id,
                series_id: row.series_id,
                title: row.title,
                slug: row.slug,
                image: row.image,
                description: row.description,
                manual_doc: row.manual_doc,
                price: row.price,
                created_at: row.created_at,
            },
            temp_range: row.temp_range,
            operating_temp: row.operating_temp,
            measure_error: row.measure_error,
            ip_connect: row.ip_connect,
            ip_sensor: row.ip_sensor,
            probe_material: row.probe_material,
            sensor: row.sensor,
            sensor_length: row.sensor_length,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ConverterRow {
    id: i64,
    category_id: i64,
    manufacturer_id: i64,
    series_id: i64,
    title: String,
    slug: String,
    image: Option<String>,
    description: Option<String>,
    manual_doc: Option<String>,
    price: Decimal,
    created_at: DateTime<Utc>,
    power: String,
    current: String,
    voltage: String,
    ip_case: String,
}

impl From<ConverterRow> for FrequencyConverter {
    fn from(row: ConverterRow) -> Self {
        FrequencyConverter {
            core: ProductCore {
                id: row.id,
                category_id: row.category_id,
                manufacturer_id: row.manufacturer_id,
                series_id: row.series_id,
                title: row.title,
                slug: row.slug,
                image: row.image,
                description: row.description,
                manual_doc: row.manual_doc,
                price: row.price,
                created_at: row.created_at,
            },
            power: row.power,
            current: row.current,
            voltage: row.voltage,
            ip_case: row.ip_case,
        }
    }
}

const SENSOR_COLS: &str = "id, category_id, manufacturer_id, series_id, title, slug, image, \
     description, manual_doc, price, created_at, temp_range, operating_temp, measure_error, \
     ip_connect, ip_sensor, probe_material, sensor, sensor_length";

const CONVERTER_COLS: &str = "id, category_id, manufacturer_id, series_id, title, slug, image, \
     description, manual_doc, price, created_at, power, current, voltage, ip_case";

#[async_trait]
impl ReferenceRepository for PgCatalogStore {
    async fn create_category(&self, input: NewCategory) -> CatalogResult<Category> {
        input.validate()?;
        let row: CategoryRow =
            sqlx::query_as("INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id, name, slug")
                .bind(&input.name)
                .bind(&input.slug)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| write_error(e, &input.slug))?;
        Ok(row.into())
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, name, slug FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(storage)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_category(&self, id: i64) -> CatalogResult<Option<Category>> {
        let row: Option<CategoryRow> =
            sqlx::query_as("SELECT id, name, slug FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage)?;
        Ok(row.map(Into::into))
    }

    async fn get_category_by_slug(&self, slug: &str) -> CatalogResult<Option<Category>> {
        let row: Option<CategoryRow> =
            sqlx::query_as("SELECT id, name, slug FROM categories WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage)?;
        Ok(row.map(Into::into))
    }

    async fn update_category(&self, id: i64, input: NewCategory) -> CatalogResult<Category> {
        input.validate()?;
        let row: Option<CategoryRow> = sqlx::query_as(
            "UPDATE categories SET name = $1, slug = $2 WHERE id = $3 RETURNING id, name, slug",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, &input.slug))?;
        row.map(Into::into).ok_or(CatalogError::NotFound {
            entity: "category",
            id,
        })
    }

    async fn delete_category(&self, id: i64) -> CatalogResult<()> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn create_manufacturer(&self, input: NewManufacturer) -> CatalogResult<Manufacturer> {
        input.validate()?;
        let row: ManufacturerRow = sqlx::query_as(
            "INSERT INTO manufacturers (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &input.slug))?;
        Ok(row.into())
    }

    async fn list_manufacturers(&self) -> CatalogResult<Vec<Manufacturer>> {
        let rows: Vec<ManufacturerRow> =
            sqlx::query_as("SELECT id, name, slug FROM manufacturers ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(storage)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_manufacturer(&self, id: i64) -> CatalogResult<Option<Manufacturer>> {
        let row: Option<ManufacturerRow> =
            sqlx::query_as("SELECT id, name, slug FROM manufacturers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage)?;
        Ok(row.map(Into::into))
    }

    async fn update_manufacturer(
        &self,
        id: i64,
        input: NewManufacturer,
    ) -> CatalogResult<Manufacturer> {
        input.validate()?;
        let row: Option<ManufacturerRow> = sqlx::query_as(
            "UPDATE manufacturers SET name = $1, slug = $2 WHERE id = $3 RETURNING id, name, slug",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, &input.slug))?;
        row.map(Into::into).ok_or(CatalogError::NotFound {
            entity: "manufacturer",
            id,
        })
    }

    async fn delete_manufacturer(&self, id: i64) -> CatalogResult<()> {
        sqlx::query("DELETE FROM manufacturers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn create_series(&self, input: NewSeries) -> CatalogResult<Series> {
        input.validate()?;
        let row: SeriesRow = sqlx::query_as(
            "INSERT INTO series (name, slug, manufacturer_id) VALUES ($1, $2, $3) \
             RETURNING id, name, slug, manufacturer_id",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(input.manufacturer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &input.slug))?;
        Ok(row.into())
    }

    async fn list_series(&self) -> CatalogResult<Vec<Series>> {
        let rows: Vec<SeriesRow> =
            sqlx::query_as("SELECT id, name, slug, manufacturer_id FROM series ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(storage)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_series(&self, id: i64) -> CatalogResult<Option<Series>> {
        let row: Option<SeriesRow> =
            sqlx::query_as("SELECT id, name, slug, manufacturer_id FROM series WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage)?;
        Ok(row.map(Into::into))
    }

    async fn update_series(&self, id: i64, input: NewSeries) -> CatalogResult<Series> {
        input.validate()?;
        let row: Option<SeriesRow> = sqlx::query_as(
            "UPDATE series SET name = $1, slug = $2, manufacturer_id = $3 WHERE id = $4 \
             RETURNING id, name, slug, manufacturer_id",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(input.manufacturer_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, &input.slug))?;
        row.map(Into::into).ok_or(CatalogError::NotFound {
            entity: "series",
            id,
        })
    }

    async fn delete_series(&self, id: i64) -> CatalogResult<()> {
        sqlx::query("DELETE FROM series WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PgCatalogStore {
    async fn create_sensor(&self, input: NewTemperatureSensor) -> CatalogResult<TemperatureSensor> {
        input.product.validate()?;
        let sql = format!(
            "INSERT INTO temperature_sensors \
             (category_id, manufacturer_id, series_id, title, slug, image, description, \
              manual_doc, price, temp_range, operating_temp, measure_error, ip_connect, \
              ip_sensor, probe_material, sensor, sensor_length) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING {SENSOR_COLS}"
        );
        let row: SensorRow = sqlx::query_as(&sql)
            .bind(input.product.category_id)
            .bind(input.product.manufacturer_id)
            .bind(input.product.series_id)
            .bind(&input.product.title)
            .bind(&input.product.slug)
            .bind(&input.product.image)
            .bind(&input.product.description)
            .bind(&input.product.manual_doc)
            .bind(input.product.price)
            .bind(&input.temp_range)
            .bind(&input.operating_temp)
            .bind(&input.measure_error)
            .bind(&input.ip_connect)
            .bind(&input.ip_sensor)
            .bind(&input.probe_material)
            .bind(&input.sensor)
            .bind(&input.sensor_length)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, &input.product.slug))?;
        Ok(row.into())
    }

    async fn list_sensors(&self) -> CatalogResult<Vec<TemperatureSensor>> {
        let sql = format!("SELECT {SENSOR_COLS} FROM temperature_sensors ORDER BY id DESC");
        let rows: Vec<SensorRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_sensor(&self, id: i64) -> CatalogResult<Option<TemperatureSensor>> {
        let sql = format!("SELECT {SENSOR_COLS} FROM temperature_sensors WHERE id = $1");
        let row: Option<SensorRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        Ok(row.map(Into::into))
    }

    async fn update_sensor(
        &self,
        id: i64,
        input: NewTemperatureSensor,
    ) -> CatalogResult<TemperatureSensor> {
        input.product.validate()?;
        let sql = format!(
            "UPDATE temperature_sensors SET \
             category_id = $1, manufacturer_id = $2, series_id = $3, title = $4, slug = $5, \
             image = $6, description = $7, manual_doc = $8, price = $9, temp_range = $10, \
             operating_temp = $11, measure_error = $12, ip_connect = $13, ip_sensor = $14, \
             probe_material = $15, sensor = $16, sensor_length = $17 \
             WHERE id = $18 RETURNING {SENSOR_COLS}"
        );
        let row: Option<SensorRow> = sqlx::query_as(&sql)
            .bind(input.product.category_id)
            .bind(input.product.manufacturer_id)
            .bind(input.product.series_id)
            .bind(&input.product.title)
            .bind(&input.product.slug)
            .bind(&input.product.image)
            .bind(&input.product.description)
            .bind(&input.product.manual_doc)
            .bind(input.product.price)
            .bind(&input.temp_range)
            .bind(&input.operating_temp)
            .bind(&input.measure_error)
            .bind(&input.ip_connect)
            .bind(&input.ip_sensor)
            .bind(&input.probe_material)
            .bind(&input.sensor)
            .bind(&input.sensor_length)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, &input.product.slug))?;
        row.map(Into::into).ok_or(CatalogError::NotFound {
            entity: "temperature_sensor",
            id,
        })
    }

    async fn delete_sensor(&self, id: i64) -> CatalogResult<()> {
        sqlx::query("DELETE FROM temperature_sensors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn create_converter(
        &self,
        input: NewFrequencyConverter,
    ) -> CatalogResult<FrequencyConverter> {
        input.product.validate()?;
        let sql = format!(
            "INSERT INTO frequency_converters \
             (category_id, manufacturer_id, series_id, title, slug, image, description, \
              manual_doc, price, power, current, voltage, ip_case) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {CONVERTER_COLS}"
        );
        let row: ConverterRow = sqlx::query_as(&sql)
            .bind(input.product.category_id)
            .bind(input.product.manufacturer_id)
            .bind(input.product.series_id)
            .bind(&input.product.title)
            .bind(&input.product.slug)
            .bind(&input.product.image)
            .bind(&input.product.description)
            .bind(&input.product.manual_doc)
            .bind(input.product.price)
            .bind(&input.power)
            .bind(&input.current)
            .bind(&input.voltage)
            .bind(&input.ip_case)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, &input.product.slug))?;
        Ok(row.into())
    }

    async fn list_converters(&self) -> CatalogResult<Vec<FrequencyConverter>> {
        let sql = format!("SELECT {CONVERTER_COLS} FROM frequency_converters ORDER BY id DESC");
        let rows: Vec<ConverterRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_converter(&self, id: i64) -> CatalogResult<Option<FrequencyConverter>> {
        let sql = format!("SELECT {CONVERTER_COLS} FROM frequency_converters WHERE id = $1");
        let row: Option<ConverterRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        Ok(row.map(Into::into))
    }

    async fn update_converter(
        &self,
        id: i64,
        input: NewFrequencyConverter,
    ) -> CatalogResult<FrequencyConverter> {
        input.product.validate()?;
        let sql = format!(
            "UPDATE frequency_converters SET \
             category_id = $1, manufacturer_id = $2, series_id = $3, title = $4, slug = $5, \
             image = $6, description = $7, manual_doc = $8, price = $9, power = $10, \
             current = $11, voltage = $12, ip_case = $13 \
             WHERE id = $14 RETURNING {CONVERTER_COLS}"
        );
        let row: Option<ConverterRow> = sqlx::query_as(&sql)
            .bind(input.product.category_id)
            .bind(input.product.manufacturer_id)
            .bind(input.product.series_id)
            .bind(&input.product.title)
            .bind(&input.product.slug)
            .bind(&input.product.image)
            .bind(&input.product.description)
            .bind(&input.product.manual_doc)
            .bind(input.product.price)
            .bind(&input.power)
            .bind(&input.current)
            .bind(&input.voltage)
            .bind(&input.ip_case)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, &input.product.slug))?;
        row.map(Into::into).ok_or(CatalogError::NotFound {
            entity: "frequency_converter",
            id,
        })
    }

    async fn delete_converter(&self, id: i64) -> CatalogResult<()> {
        sqlx::query("DELETE FROM frequency_converters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn get_product(&self, product: ProductRef) -> CatalogResult<Option<CatalogProduct>> {
        match product.kind {
            ProductKind::TemperatureSensor => Ok(self
                .get_sensor(product.id)
                .await?
                .map(CatalogProduct::TemperatureSensor)),
            ProductKind::FrequencyConverter => Ok(self
                .get_converter(product.id)
                .await?
                .map(CatalogProduct::FrequencyConverter)),
        }
    }

    async fn latest_products(
        &self,
        kind: ProductKind,
        limit: i64,
    ) -> CatalogResult<Vec<CatalogProduct>> {
        match kind {
            ProductKind::TemperatureSensor => {
                let sql = format!(
                    "SELECT {SENSOR_COLS} FROM temperature_sensors ORDER BY id DESC LIMIT $1"
                );
                let rows: Vec<SensorRow> = sqlx::query_as(&sql)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(storage)?;
                Ok(rows
                    .into_iter()
                    .map(|row| CatalogProduct::TemperatureSensor(row.into()))
                    .collect())
            }
            ProductKind::FrequencyConverter => {
                let sql = format!(
                    "SELECT {CONVERTER_COLS} FROM frequency_converters ORDER BY id DESC LIMIT $1"
                );
                let rows: Vec<ConverterRow> = sqlx::query_as(&sql)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(storage)?;
                Ok(rows
                    .into_iter()
                    .map(|row| CatalogProduct::FrequencyConverter(row.into()))
                    .collect())
            }
        }
    }
}
