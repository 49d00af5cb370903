//! In-memory twin of the Postgres store. Mirrors the schema's unique-slug
//! and cascade-delete behavior so router tests and local runs exercise the
//! same contract without a database.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use sensora_cart::cart::{Cart, CartLine};
use sensora_cart::customer::{Customer, NewCustomer};
use sensora_cart::repository::{CartRepository, CustomerRepository};
use sensora_cart::{CartError, CartResult};
use sensora_catalog::product::{
    CatalogProduct, FrequencyConverter, NewFrequencyConverter, NewTemperatureSensor, ProductCore,
    ProductKind, ProductRef, TemperatureSensor,
};
use sensora_catalog::reference::{
    Category, Manufacturer, NewCategory, NewManufacturer, NewSeries, Series,
};
use sensora_catalog::repository::{ProductRepository, ReferenceRepository};
use sensora_catalog::{CatalogError, CatalogResult};

#[derive(Debug, Clone)]
struct CartHead {
    id: i64,
    owner_id: i64,
    total_products: i32,
    total_price: Decimal,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    categories: Vec<Category>,
    manufacturers: Vec<Manufacturer>,
    series: Vec<Series>,
    sensors: Vec<TemperatureSensor>,
    converters: Vec<FrequencyConverter>,
    customers: Vec<Customer>,
    carts: Vec<CartHead>,
    lines: Vec<CartLine>,
}

impl Tables {
    fn alloc(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn cascade_product_refs(&mut self, category: Option<i64>, manufacturer: Option<i64>, series: &[i64]) {
        self.sensors.retain(|s| {
            Some(s.core.category_id) != category
                && Some(s.core.manufacturer_id) != manufacturer
                && !series.contains(&s.core.series_id)
        });
        self.converters.retain(|c| {
            Some(c.core.category_id) != category
                && Some(c.core.manufacturer_id) != manufacturer
                && !series.contains(&c.core.series_id)
        });
    }
}

pub struct MemStore {
    inner: Mutex<Tables>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Tables::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

fn unique_slug<'a, I>(rows: I, slug: &str, skip_id: Option<i64>) -> CatalogResult<()>
where
    I: Iterator<Item = (i64, &'a str)>,
{
    for (id, existing) in rows {
        if Some(id) != skip_id && existing == slug {
            return Err(CatalogError::DuplicateSlug(slug.to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl ReferenceRepository for MemStore {
    async fn create_category(&self, input: NewCategory) -> CatalogResult<Category> {
        input.validate()?;
        let mut tables = self.lock();
        unique_slug(
            tables.categories.iter().map(|c| (c.id, c.slug.as_str())),
            &input.slug,
            None,
        )?;
        let category = Category {
            id: tables.alloc(),
            name: input.name,
            slug: input.slug,
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let mut categories = self.lock().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: i64) -> CatalogResult<Option<Category>> {
        Ok(self.lock().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn get_category_by_slug(&self, slug: &str) -> CatalogResult<Option<Category>> {
        Ok(self.lock().categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn update_category(&self, id: i64, input: NewCategory) -> CatalogResult<Category> {
        input.validate()?;
        let mut tables = self.lock();
        unique_slug(
            tables.categories.iter().map(|c| (c.id, c.slug.as_str())),
            &input.slug,
            Some(id),
        )?;
        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CatalogError::NotFound {
                entity: "category",
                id,
            })?;
        category.name = input.name;
        category.slug = input.slug;
        Ok(category.clone())
    }

    async fn delete_category(&self, id: i64) -> CatalogResult<()> {
        let mut tables = self.lock();
        tables.categories.retain(|c| c.id != id);
        tables.cascade_product_refs(Some(id), None, &[]);
        Ok(())
    }

    async fn create_manufacturer(&self, input: NewManufacturer) -> CatalogResult<Manufacturer> {
        input.validate()?;
        let mut tables = self.lock();
        unique_slug(
            tables.manufacturers.iter().map(|m| (m.id, m.slug.as_str())),
            &input.slug,
            None,
        )?;
        let manufacturer = Manufacturer {
            id: tables.alloc(),
            name: input.name,
            slug: input.slug,
        };
        tables.manufacturers.push(manufacturer.clone());
        Ok(manufacturer)
    }

    async fn list_manufacturers(&self) -> CatalogResult<Vec<Manufacturer>> {
        let mut manufacturers = self.lock().manufacturers.clone();
        manufacturers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(manufacturers)
    }

    async fn get_manufacturer(&self, id: i64) -> CatalogResult<Option<Manufacturer>> {
        Ok(self.lock().manufacturers.iter().find(|m| m.id == id).cloned())
    }

    async fn update_manufacturer(
        &self,
        id: i64,
        input: NewManufacturer,
    ) -> CatalogResult<Manufacturer> {
        input.validate()?;
        let mut tables = self.lock();
        unique_slug(
            tables.manufacturers.iter().map(|m| (m.id, m.slug.as_str())),
            &input.slug,
            Some(id),
        )?;
        let manufacturer = tables
            .manufacturers
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(CatalogError::NotFound {
                entity: "manufacturer",
                id,
            })?;
        manufacturer.name = input.name;
        manufacturer.slug = input.slug;
        Ok(manufacturer.clone())
    }

    async fn delete_manufacturer(&self, id: i64) -> CatalogResult<()> {
        let mut tables = self.lock();
        tables.manufacturers.retain(|m| m.id != id);
        let dead_series: Vec<i64> = tables
            .series
            .iter()
            .filter(|s| s.manufacturer_id == id)
            .map(|s| s.id)
            .collect();
        tables.series.retain(|s| s.manufacturer_id != id);
        tables.cascade_product_refs(None, Some(id), &dead_series);
        Ok(())
    }

    async fn create_series(&self, input: NewSeries) -> CatalogResult<Series> {
        input.validate()?;
        let mut tables = self.lock();
        unique_slug(
            tables.series.iter().map(|s| (s.id, s.slug.as_str())),
            &input.slug,
            None,
        )?;
        let series = Series {
            id: tables.alloc(),
            name: input.name,
            slug: input.slug,
            manufacturer_id: input.manufacturer_id,
        };
        tables.series.push(series.clone());
        Ok(series)
    }

    async fn list_series(&self) -> CatalogResult<Vec<Series>> {
        let mut series = self.lock().series.clone();
        series.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(series)
    }

    async fn get_series(&self, id: i64) -> CatalogResult<Option<Series>> {
        Ok(self.lock().series.iter().find(|s| s.id == id).cloned())
    }

    async fn update_series(&self, id: i64, input: NewSeries) -> CatalogResult<Series> {
        input.validate()?;
        let mut tables = self.lock();
        unique_slug(
            tables.series.iter().map(|s| (s.id, s.slug.as_str())),
            &input.slug,
            Some(id),
        )?;
        let series = tables
            .series
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CatalogError::NotFound {
                entity: "series",
                id,
            })?;
        series.name = input.name;
        series.slug = input.slug;
        series.manufacturer_id = input.manufacturer_id;
        Ok(series.clone())
    }

    async fn delete_series(&self, id: i64) -> CatalogResult<()> {
        let mut tables = self.lock();
        tables.series.retain(|s| s.id != id);
        tables.cascade_product_refs(None, None, &[id]);
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemStore {
    async fn create_sensor(&self, input: NewTemperatureSensor) -> CatalogResult<TemperatureSensor> {
        input.product.validate()?;
        let mut tables = self.lock();
        unique_slug(
            tables.sensors.iter().map(|s| (s.core.id, s.core.slug.as_str())),
            &input.product.slug,
            None,
        )?;
        let sensor = TemperatureSensor {
            core: ProductCore {
                id: tables.alloc(),
                category_id: input.product.category_id,
                manufacturer_id: input.product.manufacturer_id,
                series_id: input.product.series_id,
                title: input.product.title,
                slug: input.product.slug,
                image: input.product.image,
                description: input.product.description,
                manual_doc: input.product.manual_doc,
                price: input.product.price,
                created_at: Utc::now(),
            },
            temp_range: input.temp_range,
            operating_temp: input.operating_temp,
            measure_error: input.measure_error,
            ip_connect: input.ip_connect,
            ip_sensor: input.ip_sensor,
            probe_material: input.probe_material,
            sensor: input.sensor,
            sensor_length: input.sensor_length,
        };
        tables.sensors.push(sensor.clone());
        Ok(sensor)
    }

    async fn list_sensors(&self) -> CatalogResult<Vec<TemperatureSensor>> {
        let mut sensors = self.lock().sensors.clone();
        sensors.sort_by(|a, b| b.core.id.cmp(&a.core.id));
        Ok(sensors)
    }

    async fn get_sensor(&self, id: i64) -> CatalogResult<Option<TemperatureSensor>> {
        Ok(self.lock().sensors.iter().find(|s| s.core.id == id).cloned())
    }

    async fn update_sensor(
        &self,
        id: i64,
        input: NewTemperatureSensor,
    ) -> CatalogResult<TemperatureSensor> {
        input.product.validate()?;
        let mut tables = self.lock();
        unique_slug(
            tables.sensors.iter().map(|s| (s.core.id, s.core.slug.as_str())),
            &input.product.slug,
            Some(id),
        )?;
        let sensor = tables
            .sensors
            .iter_mut()
            .find(|s| s.core.id == id)
            .ok_or(CatalogError::NotFound {
                entity: "temperature_sensor",
                id,
            })?;
        sensor.core.category_id = input.product.category_id;
        sensor.core.manufacturer_id = input.product.manufacturer_id;
        sensor.core.series_id = input.product.series_id;
        sensor.core.title = input.product.title;
        sensor.core.slug = input.product.slug;
        sensor.core.image = input.product.image;
        sensor.core.description = input.product.description;
        sensor.core.manual_doc = input.product.manual_doc;
        sensor.core.price = input.product.price;
        sensor.temp_range = input.temp_range;
        sensor.operating_temp = input.operating_temp;
        sensor.measure_error = input.measure_error;
        sensor.ip_connect = input.ip_connect;
        sensor.ip_sensor = input.ip_sensor;
        sensor.probe_material = input.probe_material;
        sensor.sensor = input.sensor;
        sensor.sensor_length = input.sensor_length;
        Ok(sensor.clone())
    }

    async fn delete_sensor(&self, id: i64) -> CatalogResult<()> {
        self.lock().sensors.retain(|s| s.core.id != id);
        Ok(())
    }

    async fn create_converter(
        &self,
        input: NewFrequencyConverter,
    ) -> CatalogResult<FrequencyConverter> {
        input.product.validate()?;
        let mut tables = self.lock();
        unique_slug(
            tables
                .converters
                .iter()
                .map(|c| (c.core.id, c.core.slug.as_str())),
            &input.product.slug,
            None,
        )?;
        let converter = FrequencyConverter {
            core: ProductCore {
                id: tables.alloc(),
                category_id: input.product.category_id,
                manufacturer_id: input.product.manufacturer_id,
                series_id: input.product.series_id,
                title: input.product.title,
                slug: input.product.slug,
                image: input.product.image,
                description: input.product.description,
                manual_doc: input.product.manual_doc,
                price: input.product.price,
                created_at: Utc::now(),
            },
            power: input.power,
            current: input.current,
            voltage: input.voltage,
            ip_case: input.ip_case,
        };
        tables.converters.push(converter.clone());
        Ok(converter)
    }

    async fn list_converters(&self) -> CatalogResult<Vec<FrequencyConverter>> {
        let mut converters = self.lock().converters.clone();
        converters.sort_by(|a, b| b.core.id.cmp(&a.core.id));
        Ok(converters)
    }

    async fn get_converter(&self, id: i64) -> CatalogResult<Option<FrequencyConverter>> {
        Ok(self
            .lock()
            .converters
            .iter()
            .find(|c| c.core.id == id)
            .cloned())
    }

    async fn update_converter(
        &self,
        id: i64,
        input: NewFrequencyConverter,
    ) -> CatalogResult<FrequencyConverter> {
        input.product.validate()?;
        let mut tables = self.lock();
        unique_slug(
            tables
                .converters
                .iter()
                .map(|c| (c.core.id, c.core.slug.as_str())),
            &input.product.slug,
            Some(id),
        )?;
        let converter = tables
            .converters
            .iter_mut()
            .find(|c| c.core.id == id)
            .ok_or(CatalogError::NotFound {
                entity: "frequency_converter",
                id,
            })?;
        converter.core.category_id = input.product.category_id;
        converter.core.manufacturer_id = input.product.manufacturer_id;
        converter.core.series_id = input.product.series_id;
        converter.core.title = input.product.title;
        converter.core.slug = input.product.slug;
        converter.core.image = input.product.image;
        converter.core.description = input.product.description;
        converter.core.manual_doc = input.product.manual_doc;
        converter.core.price = input.product.price;
        converter.power = input.power;
        converter.current = input.current;
        converter.voltage = input.voltage;
        converter.ip_case = input.ip_case;
        Ok(converter.clone())
    }

    async fn delete_converter(&self, id: i64) -> CatalogResult<()> {
        self.lock().converters.retain(|c| c.core.id != id);
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
        let mut block: Vec<CatalogProduct> = match kind {
            ProductKind::TemperatureSensor => self
                .list_sensors()
                .await?
                .into_iter()
                .map(CatalogProduct::TemperatureSensor)
                .collect(),
            ProductKind::FrequencyConverter => self
                .list_converters()
                .await?
                .into_iter()
                .map(CatalogProduct::FrequencyConverter)
                .collect(),
        };
        block.truncate(limit.max(0) as usize);
        Ok(block)
    }
}

#[async_trait]
impl CustomerRepository for MemStore {
    async fn create_customer(&self, input: NewCustomer) -> CartResult<Customer> {
        let mut tables = self.lock();
        let customer = Customer {
            id: tables.alloc(),
            user_id: input.user_id,
            phone: input.phone,
            company: input.company,
            legal_address: input.legal_address,
            actual_address: input.actual_address,
        };
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, id: i64) -> CartResult<Option<Customer>> {
        Ok(self.lock().customers.iter().find(|c| c.id == id).cloned())
    }

    async fn list_customers(&self) -> CartResult<Vec<Customer>> {
        Ok(self.lock().customers.clone())
    }
}

#[async_trait]
impl CartRepository for MemStore {
    async fn create_cart(&self, owner_id: i64) -> CartResult<Cart> {
        let mut tables = self.lock();
        if !tables.customers.iter().any(|c| c.id == owner_id) {
            return Err(CartError::CustomerNotFound(owner_id));
        }
        let head = CartHead {
            id: tables.alloc(),
            owner_id,
            total_products: 0,
            total_price: Decimal::ZERO,
        };
        tables.carts.push(head.clone());
        Ok(Cart::empty(head.id, head.owner_id))
    }

    async fn get_cart(&self, id: i64) -> CartResult<Option<Cart>> {
        let tables = self.lock();
        let Some(head) = tables.carts.iter().find(|c| c.id == id) else {
            return Ok(None);
        };
        let lines: Vec<CartLine> = tables
            .lines
            .iter()
            .filter(|l| l.cart_id == id)
            .cloned()
            .collect();
        Ok(Some(Cart {
            id: head.id,
            owner_id: head.owner_id,
            lines,
            total_products: head.total_products,
            total_price: head.total_price,
        }))
    }

    async fn list_carts(&self) -> CartResult<Vec<Cart>> {
        let ids: Vec<i64> = self.lock().carts.iter().map(|c| c.id).collect();
        let mut carts = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(cart) = self.get_cart(id).await? {
                carts.push(cart);
            }
        }
        Ok(carts)
    }

    async fn add_line(
        &self,
        cart_id: i64,
        customer_id: i64,
        product: ProductRef,
        qty: i32,
        total_price: Decimal,
    ) -> CartResult<CartLine> {
        let mut tables = self.lock();
        if !tables.carts.iter().any(|c| c.id == cart_id) {
            return Err(CartError::CartNotFound(cart_id));
        }
        let line = CartLine {
            id: tables.alloc(),
            customer_id,
            cart_id,
            product,
            qty,
            total_price,
        };
        tables.lines.push(line.clone());
        Ok(line)
    }

    async fn list_lines(&self) -> CartResult<Vec<CartLine>> {
        Ok(self.lock().lines.clone())
    }

    async fn get_line(&self, line_id: i64) -> CartResult<Option<CartLine>> {
        Ok(self.lock().lines.iter().find(|l| l.id == line_id).cloned())
    }

    async fn set_line_qty(&self, line_id: i64, qty: i32) -> CartResult<()> {
        let mut tables = self.lock();
        let line = tables
            .lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(CartError::LineNotFound(line_id))?;
        line.qty = qty;
        Ok(())
    }

    async fn set_line_total(&self, line_id: i64, total_price: Decimal) -> CartResult<()> {
        let mut tables = self.lock();
        let line = tables
            .lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(CartError::LineNotFound(line_id))?;
        line.total_price = total_price;
        Ok(())
    }

    async fn remove_line(&self, line_id: i64) -> CartResult<()> {
        self.lock().lines.retain(|l| l.id != line_id);
        Ok(())
    }

    async fn save_totals(
        &self,
        cart_id: i64,
        total_products: i32,
        total_price: Decimal,
    ) -> CartResult<()> {
        let mut tables = self.lock();
        let head = tables
            .carts
            .iter_mut()
            .find(|c| c.id == cart_id)
            .ok_or(CartError::CartNotFound(cart_id))?;
        head.total_products = total_products;
        head.total_price = total_price;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensora_catalog::product::NewProduct;
    use sensora_catalog::LatestProducts;

    fn new_product(slug: &str, refs: (i64, i64, i64)) -> NewProduct {
        NewProduct {
            category_id: refs.0,
            manufacturer_id: refs.1,
            series_id: refs.2,
            title: format!("Product {slug}"),
            slug: slug.to_string(),
            image: None,
            description: None,
            manual_doc: None,
            price: Decimal::new(99_900, 2),
        }
    }

    fn new_sensor(slug: &str, refs: (i64, i64, i64)) -> NewTemperatureSensor {
        NewTemperatureSensor {
            product: new_product(slug, refs),
            temp_range: Some("-50..+150".to_string()),
            operating_temp: None,
            measure_error: None,
            ip_connect: None,
            ip_sensor: None,
            probe_material: None,
            sensor: None,
            sensor_length: None,
        }
    }

    fn new_converter(slug: &str, refs: (i64, i64, i64)) -> NewFrequencyConverter {
        NewFrequencyConverter {
            product: new_product(slug, refs),
            power: "2.2kW".to_string(),
            current: "5.6A".to_string(),
            voltage: "380V".to_string(),
            ip_case: "IP20".to_string(),
        }
    }

    async fn seed_refs(store: &MemStore) -> (i64, i64, i64) {
        let category = store
            .create_category(NewCategory {
                name: "Duct temperature sensors".to_string(),
                slug: "duct-temp-sensor".to_string(),
            })
            .await
            .unwrap();
        let manufacturer = store
            .create_manufacturer(NewManufacturer {
                name: "Adis".to_string(),
                slug: "adis".to_string(),
            })
            .await
            .unwrap();
        let series = store
            .create_series(NewSeries {
                name: "TS series".to_string(),
                slug: "ts-series".to_string(),
                manufacturer_id: manufacturer.id,
            })
            .await
            .unwrap();
        (category.id, manufacturer.id, series.id)
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let store = MemStore::new();
        store
            .create_category(NewCategory {
                name: "First".to_string(),
                slug: "dup".to_string(),
            })
            .await
            .unwrap();
        let err = store
            .create_category(NewCategory {
                name: "Second".to_string(),
                slug: "dup".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSlug(s) if s == "dup"));
    }

    #[tokio::test]
    async fn test_manufacturer_delete_cascades() {
        let store = MemStore::new();
        let (category_id, manufacturer_id, series_id) = seed_refs(&store).await;
        let sensor = store
            .create_sensor(new_sensor("ts-01", (category_id, manufacturer_id, series_id)))
            .await
            .unwrap();

        store.delete_manufacturer(manufacturer_id).await.unwrap();

        assert!(store.list_series().await.unwrap().is_empty());
        assert!(store.get_sensor(sensor.core.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_main_page_blocks() {
        let store = MemStore::new();
        let refs = seed_refs(&store).await;
        for i in 1..=7 {
            store
                .create_sensor(new_sensor(&format!("ts-{i}"), refs))
                .await
                .unwrap();
        }
        for i in 1..=2 {
            store
                .create_converter(new_converter(&format!("fc-{i}"), refs))
                .await
                .unwrap();
        }

        let feed = LatestProducts::get_products_for_main_page(
            &store,
            &["temperature_sensor", "frequency_converter", "no_such_kind"],
        )
        .await
        .unwrap();

        // Sensor block is capped at 5, newest first, then the converter block.
        assert_eq!(feed.len(), 7);
        let sensor_ids: Vec<i64> = feed[..5].iter().map(|p| p.id()).collect();
        assert!(sensor_ids.windows(2).all(|w| w[0] > w[1]));
        assert!(feed[..5]
            .iter()
            .all(|p| p.kind() == ProductKind::TemperatureSensor));
        assert!(feed[5..]
            .iter()
            .all(|p| p.kind() == ProductKind::FrequencyConverter));
    }

    #[tokio::test]
    async fn test_qty_update_leaves_line_total_stale() {
        let store = MemStore::new();
        let refs = seed_refs(&store).await;
        let sensor = store.create_sensor(new_sensor("ts-cart", refs)).await.unwrap();

        let customer = store
            .create_customer(NewCustomer {
                user_id: uuid::Uuid::new_v4(),
                phone: "+70000000000".to_string(),
                company: "OOO Test".to_string(),
                legal_address: "Moscow".to_string(),
                actual_address: "Moscow".to_string(),
            })
            .await
            .unwrap();
        let cart = store.create_cart(customer.id).await.unwrap();

        let unit = sensor.core.price;
        let line = store
            .add_line(
                cart.id,
                customer.id,
                ProductRef {
                    kind: ProductKind::TemperatureSensor,
                    id: sensor.core.id,
                },
                1,
                unit,
            )
            .await
            .unwrap();

        store.set_line_qty(line.id, 3).await.unwrap();
        let stale = store.get_line(line.id).await.unwrap().unwrap();
        assert_eq!(stale.qty, 3);
        // No implicit recompute anywhere in the storage layer.
        assert_eq!(stale.total_price, unit);

        store
            .set_line_total(line.id, CartLine::line_total(unit, 3))
            .await
            .unwrap();
        let repriced = store.get_line(line.id).await.unwrap().unwrap();
        assert_eq!(repriced.total_price, unit * Decimal::from(3));
    }
}
