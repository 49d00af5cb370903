use serde::{Deserialize, Serialize};

use crate::{CatalogError, CatalogResult};

/// Upper bound shared by all reference-data display names.
pub const NAME_MAX_LEN: usize = 150;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A product line belonging to one manufacturer. Deleting the manufacturer
/// cascades to its series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Series {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub manufacturer_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewManufacturer {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSeries {
    pub name: String,
    pub slug: String,
    pub manufacturer_id: i64,
}

/// Slugs are URL-safe stable keys: lowercase alphanumerics, `-` and `_`.
pub fn validate_slug(slug: &str) -> CatalogResult<()> {
    if slug.is_empty() || slug.len() > NAME_MAX_LEN {
        return Err(CatalogError::Validation(format!(
            "slug must be 1..={NAME_MAX_LEN} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CatalogError::Validation(format!("invalid slug: {slug:?}")));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> CatalogResult<()> {
    if name.is_empty() || name.len() > NAME_MAX_LEN {
        return Err(CatalogError::Validation(format!(
            "name must be 1..={NAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}

impl NewCategory {
    pub fn validate(&self) -> CatalogResult<()> {
        validate_name(&self.name)?;
        validate_slug(&self.slug)
    }
}

impl NewManufacturer {
    pub fn validate(&self) -> CatalogResult<()> {
        validate_name(&self.name)?;
        validate_slug(&self.slug)
    }
}

impl NewSeries {
    pub fn validate(&self) -> CatalogResult<()> {
        validate_name(&self.name)?;
        validate_slug(&self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(validate_slug("duct-temp-sensor").is_ok());
        assert!(validate_slug("fr-converter").is_ok());
        assert!(validate_slug("abc_123").is_ok());

        assert!(validate_slug("").is_err());
        assert!(validate_slug("no spaces").is_err());
        assert!(validate_slug("ümlaut").is_err());
        assert!(validate_slug(&"x".repeat(NAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn test_payload_validation() {
        let ok = NewCategory {
            name: "Duct temperature sensors".to_string(),
            slug: "duct-temp-sensor".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = NewCategory {
            name: String::new(),
            slug: "duct-temp-sensor".to_string(),
        };
        assert!(bad.validate().is_err());
    }
}
