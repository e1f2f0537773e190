//! JSON export of crawl records

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::domain::{CategoryRecord, ProductRecord};
use crate::infrastructure::config::ExportConfig;

/// Writes record lists as pretty-printed JSON arrays
#[derive(Debug, Clone)]
pub struct JsonExporter {
    categories_path: PathBuf,
    products_path: PathBuf,
}

impl JsonExporter {
    pub fn new(categories_path: impl Into<PathBuf>, products_path: impl Into<PathBuf>) -> Self {
        Self {
            categories_path: categories_path.into(),
            products_path: products_path.into(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.categories_path(), config.products_path())
    }

    pub async fn export_categories(&self, categories: &[CategoryRecord]) -> Result<&Path> {
        write_json(&self.categories_path, categories).await?;
        info!("💾 Wrote {} categories to {:?}", categories.len(), self.categories_path);
        Ok(&self.categories_path)
    }

    pub async fn export_products(&self, products: &[ProductRecord]) -> Result<&Path> {
        write_json(&self.products_path, products).await?;
        info!("💾 Wrote {} products to {:?}", products.len(), self.products_path);
        Ok(&self.products_path)
    }
}

/// Serialize `value` to `path`, creating parent directories
async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output directory {parent:?}"))?;
    }

    let content = serde_json::to_string_pretty(value).context("Failed to serialize records")?;
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Thumbnail;
    use serde_json::{Map, Value};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_exports_into_new_directory() -> Result<()> {
        let temp_dir = tempdir()?;
        let config = ExportConfig {
            output_dir: temp_dir.path().join("nested").join("output"),
            ..ExportConfig::default()
        };
        let exporter = JsonExporter::from_config(&config);

        let mut category = CategoryRecord::new("Mobile Antennas");
        category.children.push("Dual Band".into());
        let path = exporter.export_categories(&[category]).await?;

        let written: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        assert_eq!(
            written,
            serde_json::json!([{ "name": "Mobile Antennas", "children": ["Dual Band"] }])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_product_keys_keep_declaration_order() -> Result<()> {
        let temp_dir = tempdir()?;
        let exporter = JsonExporter::new(temp_dir.path().join("c.json"), temp_dir.path().join("p.json"));

        let mut metadata = Map::new();
        metadata.insert("Gain".into(), Value::String("3.0 dBi".into()));
        metadata.insert("Band".into(), Value::Null);
        let product = ProductRecord {
            model: "NR770HB".into(),
            title: "NR770HB Dual Band Mobile Antenna".into(),
            tagline: None,
            category: "Dual Band".into(),
            metadata,
            thumbnail: Some(Thumbnail {
                alt: "NR770HB".into(),
                url: "https://diamondantenna.net/picts/nr770hb.jpg".into(),
            }),
        };

        let path = exporter.export_products(&[product]).await?;
        let text = std::fs::read_to_string(path)?;

        let positions: Vec<usize> = ["\"model\"", "\"title\"", "\"tagline\"", "\"category\"", "\"metadata\"", "\"Gain\"", "\"Band\"", "\"thumbnail\""]
            .iter()
            .map(|key| text.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_lists_write_empty_arrays() -> Result<()> {
        let temp_dir = tempdir()?;
        let exporter = JsonExporter::new(temp_dir.path().join("c.json"), temp_dir.path().join("p.json"));

        let path = exporter.export_products(&[]).await?;
        assert_eq!(std::fs::read_to_string(path)?, "[]");
        Ok(())
    }
}
