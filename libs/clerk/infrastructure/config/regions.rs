//! Region and model catalogue
//!
//! The table ships inside the binary and is parsed and validated once at
//! startup. Lookups are case-insensitive on the region code.

use super::{ConfigError, Result};
use crate::domain::MonitorTarget;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

const EMBEDDED_REGIONS: &str = include_str!("../../config/regions.yaml");

/// Model name that resolves to a region's test SKU, when it has one
pub const TEST_MODEL: &str = "test";

#[derive(Debug, Clone, Deserialize)]
pub struct RegionEntry {
    pub code: String,
    pub locale: String,
    pub store_locale: String,
    pub currency: String,
    /// Always-available product used to exercise the checkout path
    #[serde(default)]
    pub test_sku: Option<String>,
    /// Model name -> SKU
    pub skus: BTreeMap<String, String>,
}

impl RegionEntry {
    fn target(&self, model: &str, sku: &str) -> MonitorTarget {
        MonitorTarget {
            region: self.code.clone(),
            model: model.to_string(),
            sku: sku.to_string(),
            locale: self.locale.clone(),
            store_locale: self.store_locale.clone(),
            currency: self.currency.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    regions: Vec<RegionEntry>,
}

#[derive(Debug, Clone)]
pub struct RegionCatalog {
    regions: Vec<RegionEntry>,
}

impl RegionCatalog {
    /// Parse the catalogue compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_yaml(EMBEDDED_REGIONS)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        let catalog = Self {
            regions: file.regions,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        if self.regions.is_empty() {
            return Err(ConfigError::ValidationError(
                "region catalogue is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            let code = &region.code;
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(ConfigError::ValidationError(format!(
                    "region code '{}' must be three uppercase letters",
                    code
                )));
            }
            if !seen.insert(code.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "region {} listed twice",
                    code
                )));
            }
            if region.locale.is_empty() || region.store_locale.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "region {} has an empty locale",
                    code
                )));
            }
            if region.currency.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "region {} has no currency",
                    code
                )));
            }
            if region.skus.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "region {} has no models",
                    code
                )));
            }
            let skus = region.skus.values().chain(region.test_sku.iter());
            for sku in skus {
                if sku.is_empty() || !sku.chars().all(|c| c.is_ascii_digit()) {
                    return Err(ConfigError::ValidationError(format!(
                        "region {} has malformed sku '{}'",
                        code, sku
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn regions(&self) -> &[RegionEntry] {
        &self.regions
    }

    pub fn region(&self, code: &str) -> Result<&RegionEntry> {
        self.regions
            .iter()
            .find(|r| r.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| ConfigError::UnsupportedRegion(code.to_string()))
    }

    /// Resolve a region/model pair into a monitor target
    pub fn target(&self, region: &str, model: &str) -> Result<MonitorTarget> {
        let entry = self.region(region)?;

        if model.eq_ignore_ascii_case(TEST_MODEL) {
            if let Some(sku) = &entry.test_sku {
                return Ok(entry.target(TEST_MODEL, sku));
            }
        }

        let model_key = model.to_ascii_lowercase();
        entry
            .skus
            .get(&model_key)
            .map(|sku| entry.target(&model_key, sku))
            .ok_or_else(|| ConfigError::UnsupportedModel {
                region: entry.code.clone(),
                model: model.to_string(),
            })
    }

    /// Every catalogued region and model, in catalogue order
    pub fn all_targets(&self) -> Vec<MonitorTarget> {
        self.regions
            .iter()
            .flat_map(|entry| {
                entry
                    .skus
                    .iter()
                    .map(move |(model, sku)| entry.target(model, sku))
            })
            .collect()
    }
}

/// Public product page for a model, under the region's store locale
pub fn product_page_url(store_locale: &str, model: &str) -> String {
    let model = model.to_ascii_lowercase();
    let base = format!("https://www.nvidia.com/{}/geforce/graphics-cards", store_locale);

    match model.as_str() {
        "2060" | "2070" | "2080" => format!("{}/rtx-{}-super/", base, model),
        "2080ti" => format!("{}/rtx-2080-ti/", base),
        "3080" | "3090" => format!("{}/30-series/rtx-{}/", base, model),
        _ => "https://www.nvidia.com/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_parses() {
        let catalog = RegionCatalog::embedded().unwrap();
        assert_eq!(catalog.regions().len(), 19);
        assert_eq!(catalog.all_targets().len(), 19);
    }

    #[test]
    fn test_usa_3080() {
        let catalog = RegionCatalog::embedded().unwrap();
        let target = catalog.target("usa", "3080").unwrap();
        assert_eq!(target.region, "USA");
        assert_eq!(target.sku, "5438481700");
        assert_eq!(target.locale, "en_us");
        assert_eq!(target.currency, "USD");
    }

    #[test]
    fn test_canada_uses_us_api_locale() {
        let catalog = RegionCatalog::embedded().unwrap();
        let target = catalog.target("CAN", "3080").unwrap();
        assert_eq!(target.locale, "en_us");
        assert_eq!(target.store_locale, "en_ca");
    }

    #[test]
    fn test_test_sku() {
        let catalog = RegionCatalog::embedded().unwrap();
        let target = catalog.target("USA", "TEST").unwrap();
        assert_eq!(target.sku, "5379432500");
        assert!(catalog.target("GBR", "test").is_err());
    }

    #[test]
    fn test_unsupported_lookups() {
        let catalog = RegionCatalog::embedded().unwrap();
        assert!(matches!(
            catalog.target("ATL", "3080"),
            Err(ConfigError::UnsupportedRegion(_))
        ));
        assert!(matches!(
            catalog.target("USA", "3090"),
            Err(ConfigError::UnsupportedModel { .. })
        ));
    }

    #[test]
    fn test_duplicate_region_rejected() {
        let yaml = r#"
regions:
  - { code: USA, locale: en_us, store_locale: en_us, currency: USD, skus: { "3080": "1" } }
  - { code: USA, locale: en_us, store_locale: en_us, currency: USD, skus: { "3080": "2" } }
"#;
        assert!(RegionCatalog::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_malformed_sku_rejected() {
        let yaml = r#"
regions:
  - { code: USA, locale: en_us, store_locale: en_us, currency: USD, skus: { "3080": "abc" } }
"#;
        assert!(RegionCatalog::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_product_page_urls() {
        assert_eq!(
            product_page_url("en_us", "3080"),
            "https://www.nvidia.com/en_us/geforce/graphics-cards/30-series/rtx-3080/"
        );
        assert_eq!(
            product_page_url("de_de", "2070"),
            "https://www.nvidia.com/de_de/geforce/graphics-cards/rtx-2070-super/"
        );
        assert_eq!(
            product_page_url("en_gb", "2080TI"),
            "https://www.nvidia.com/en_gb/geforce/graphics-cards/rtx-2080-ti/"
        );
        assert_eq!(product_page_url("en_us", "1650"), "https://www.nvidia.com/");
    }
}
