use sensora_catalog::ProductKind;
use serde::Serialize;

/// Category slug a temperature sensor may be filed under in the admin form.
pub const DUCT_TEMP_SENSOR_SLUG: &str = "duct-temp-sensor";
/// Category slug a frequency converter may be filed under in the admin form.
pub const FR_CONVERTER_SLUG: &str = "fr-converter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminKind {
    Category,
    Manufacturer,
    Series,
    TemperatureSensor,
    FrequencyConverter,
    Customer,
    Cart,
    CartProduct,
}

/// One managed entity: where its management endpoints live and, for product
/// kinds with a pinned category, which category slug the choice list is
/// restricted to. `None` means the unrestricted default.
#[derive(Debug, Clone, Serialize)]
pub struct AdminEntry {
    pub kind: AdminKind,
    pub path: &'static str,
    pub category_slug_filter: Option<&'static str>,
}

/// The registration table for the administrative projection. Built once at
/// startup and handed to the router; nothing registers itself through
/// ambient global state.
#[derive(Debug, Clone)]
pub struct AdminRegistry {
    entries: Vec<AdminEntry>,
}

impl AdminRegistry {
    /// Every entity of the catalog, registered with the stock configuration.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                AdminEntry {
                    kind: AdminKind::Category,
                    path: "categories",
                    category_slug_filter: None,
                },
                AdminEntry {
                    kind: AdminKind::Manufacturer,
                    path: "manufacturers",
                    category_slug_filter: None,
                },
                AdminEntry {
                    kind: AdminKind::Series,
                    path: "series",
                    category_slug_filter: None,
                },
                AdminEntry {
                    kind: AdminKind::TemperatureSensor,
                    path: "temperature-sensors",
                    category_slug_filter: Some(DUCT_TEMP_SENSOR_SLUG),
                },
                AdminEntry {
                    kind: AdminKind::FrequencyConverter,
                    path: "frequency-converters",
                    category_slug_filter: Some(FR_CONVERTER_SLUG),
                },
                AdminEntry {
                    kind: AdminKind::Customer,
                    path: "customers",
                    category_slug_filter: None,
                },
                AdminEntry {
                    kind: AdminKind::Cart,
                    path: "carts",
                    category_slug_filter: None,
                },
                AdminEntry {
                    kind: AdminKind::CartProduct,
                    path: "cart-products",
                    category_slug_filter: None,
                },
            ],
        }
    }

    pub fn entries(&self) -> &[AdminEntry] {
        &self.entries
    }

    pub fn entry_for_path(&self, path: &str) -> Option<&AdminEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn category_filter(&self, kind: ProductKind) -> Option<&'static str> {
        let admin_kind = match kind {
            ProductKind::TemperatureSensor => AdminKind::TemperatureSensor,
            ProductKind::FrequencyConverter => AdminKind::FrequencyConverter,
        };
        self.entries
            .iter()
            .find(|e| e.kind == admin_kind)
            .and_then(|e| e.category_slug_filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entity_registered() {
        let registry = AdminRegistry::standard();
        assert_eq!(registry.entries().len(), 8);
    }

    #[test]
    fn test_product_kinds_have_pinned_categories() {
        let registry = AdminRegistry::standard();
        assert_eq!(
            registry.category_filter(ProductKind::TemperatureSensor),
            Some(DUCT_TEMP_SENSOR_SLUG)
        );
        assert_eq!(
            registry.category_filter(ProductKind::FrequencyConverter),
            Some(FR_CONVERTER_SLUG)
        );
    }

    #[test]
    fn test_other_entities_are_unrestricted() {
        let registry = AdminRegistry::standard();
        for entry in registry.entries() {
            match entry.kind {
                AdminKind::TemperatureSensor | AdminKind::FrequencyConverter => {
                    assert!(entry.category_slug_filter.is_some())
                }
                _ => assert!(entry.category_slug_filter.is_none()),
            }
        }
    }
}
