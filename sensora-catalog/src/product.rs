use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The closed set of concrete product kinds. This enum is the one kind
/// registry: the aggregator, the cart's generic product reference, and the
/// admin registry all resolve kind names through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    TemperatureSensor,
    FrequencyConverter,
}

impl ProductKind {
    pub const ALL: [ProductKind; 2] = [
        ProductKind::TemperatureSensor,
        ProductKind::FrequencyConverter,
    ];

    /// Stable wire identifier for this kind.
    pub fn name(self) -> &'static str {
        match self {
            ProductKind::TemperatureSensor => "temperature_sensor",
            ProductKind::FrequencyConverter => "frequency_converter",
        }
    }

    /// Resolve a wire identifier; unknown names are `None`, never an error.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "temperature_sensor" => Some(ProductKind::TemperatureSensor),
            "frequency_converter" => Some(ProductKind::FrequencyConverter),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Generic reference to a product of any kind. Used by cart lines in place
/// of a single-table foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductRef {
    pub kind: ProductKind,
    pub id: i64,
}

/// Base attribute set shared by every concrete product kind. Never persisted
/// on its own; each kind's table embeds these columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCore {
    pub id: i64,
    pub category_id: i64,
    pub manufacturer_id: i64,
    pub series_id: i64,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub manual_doc: Option<String>,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Resistance-thermometer temperature sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureSensor {
    #[serde(flatten)]
    pub core: ProductCore,
    pub temp_range: Option<String>,
    pub operating_temp: Option<String>,
    pub measure_error: Option<String>,
    pub ip_connect: Option<String>,
    pub ip_sensor: Option<String>,
    pub probe_material: Option<String>,
    pub sensor: Option<String>,
    pub sensor_length: Option<String>,
}

/// Variable-frequency drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyConverter {
    #[serde(flatten)]
    pub core: ProductCore,
    pub power: String,
    pub current: String,
    pub voltage: String,
    pub ip_case: String,
}

/// A product of any concrete kind, tagged with its kind name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogProduct {
    TemperatureSensor(TemperatureSensor),
    FrequencyConverter(FrequencyConverter),
}

impl CatalogProduct {
    pub fn kind(&self) -> ProductKind {
        match self {
            CatalogProduct::TemperatureSensor(_) => ProductKind::TemperatureSensor,
            CatalogProduct::FrequencyConverter(_) => ProductKind::FrequencyConverter,
        }
    }

    pub fn core(&self) -> &ProductCore {
        match self {
            CatalogProduct::TemperatureSensor(p) => &p.core,
            CatalogProduct::FrequencyConverter(p) => &p.core,
        }
    }

    pub fn id(&self) -> i64 {
        self.core().id
    }

    pub fn price(&self) -> Decimal {
        self.core().price
    }

    pub fn product_ref(&self) -> ProductRef {
        ProductRef {
            kind: self.kind(),
            id: self.id(),
        }
    }
}

/// Creation payload for the shared base fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub category_id: i64,
    pub manufacturer_id: i64,
    pub series_id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub manual_doc: Option<String>,
    pub price: Decimal,
}

impl NewProduct {
    pub fn validate(&self) -> crate::CatalogResult<()> {
        crate::reference::validate_name(&self.title)?;
        crate::reference::validate_slug(&self.slug)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTemperatureSensor {
    #[serde(flatten)]
    pub product: NewProduct,
    #[serde(default)]
    pub temp_range: Option<String>,
    #[serde(default)]
    pub operating_temp: Option<String>,
    #[serde(default)]
    pub measure_error: Option<String>,
    #[serde(default)]
    pub ip_connect: Option<String>,
    #[serde(default)]
    pub ip_sensor: Option<String>,
    #[serde(default)]
    pub probe_material: Option<String>,
    #[serde(default)]
    pub sensor: Option<String>,
    #[serde(default)]
    pub sensor_length: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFrequencyConverter {
    #[serde(flatten)]
    pub product: NewProduct,
    pub power: String,
    pub current: String,
    pub voltage: String,
    pub ip_case: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ProductKind::ALL {
            assert_eq!(ProductKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_kind_is_none() {
        assert_eq!(ProductKind::from_name("pressure_sensor"), None);
        assert_eq!(ProductKind::from_name(""), None);
        assert_eq!(ProductKind::from_name("TemperatureSensor"), None);
    }

    #[test]
    fn test_product_ref_accessor() {
        let sensor = TemperatureSensor {
            core: ProductCore {
                id: 42,
                category_id: 1,
                manufacturer_id: 1,
                series_id: 1,
                title: "TS-01".to_string(),
                slug: "ts-01".to_string(),
                image: None,
                description: None,
                manual_doc: None,
                price: Decimal::new(125_000, 2),
                created_at: Utc::now(),
            },
            temp_range: Some("-50..+150".to_string()),
            operating_temp: None,
            measure_error: None,
            ip_connect: None,
            ip_sensor: None,
            probe_material: None,
            sensor: None,
            sensor_length: None,
        };
        let product = CatalogProduct::TemperatureSensor(sensor);
        assert_eq!(
            product.product_ref(),
            ProductRef {
                kind: ProductKind::TemperatureSensor,
                id: 42
            }
        );
        assert_eq!(product.price(), Decimal::new(125_000, 2));
    }
}
