use serde::Deserialize;
use tracing::debug;

use stockroom_base::{FilePath, PalHandle, StockroomResult};

use crate::item::Item;

/// Configuration for a stockroom instance.
///
/// Every field has a default, so the application runs without any
/// configuration file at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title shown in the navbar and page header.
    pub title: String,
    /// Host address to bind the HTTP server to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Path of the JSON store file, relative to the working directory.
    pub store_path: String,
    /// Directory holding the gallery images, relative to the working directory.
    pub images_dir: String,
    /// Records written to the store file on first run.
    pub seed: Vec<SeedItem>,
}

/// A seed record for first-run population of the store file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedItem {
    pub name: String,
    pub stock: u32,
    pub price: f64,
}

impl From<SeedItem> for Item {
    fn from(seed: SeedItem) -> Self {
        Item::new(seed.name, seed.stock, seed.price)
    }
}

impl Config {
    /// The seed records as items, in configured order.
    pub fn seed_items(&self) -> Vec<Item> {
        self.seed.iter().cloned().map(Item::from).collect()
    }
}

/// The built-in seed records, as items.
pub fn default_seed() -> Vec<Item> {
    default_seed_records().into_iter().map(Item::from).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Item Stock Checker".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            store_path: "items.json".to_string(),
            images_dir: "images".to_string(),
            seed: default_seed_records(),
        }
    }
}

/// Default seed: something to show on first run.
fn default_seed_records() -> Vec<SeedItem> {
    let presets = [
        ("Laptop", 15, 1200.00),
        ("Mouse", 42, 25.50),
        ("Keyboard", 30, 75.00),
        ("Monitor", 12, 320.00),
        ("Headphones", 25, 99.90),
    ];
    presets
        .into_iter()
        .map(|(name, stock, price)| SeedItem {
            name: name.to_string(),
            stock,
            price,
        })
        .collect()
}

/// Load configuration from a TOML file through the PAL.
///
/// A missing file yields the defaults; a file that exists but fails to parse
/// is an error (a half-read configuration is worse than none).
pub fn load_config(pal: &PalHandle, path: &FilePath) -> StockroomResult<Config> {
    if !pal.file_exists(path)? {
        debug!(path = %path, "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = pal.read_file_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| stockroom_base::err!("Failed to parse config {}: {}", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_base::MockPal;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store_path, "items.json");
        assert_eq!(config.images_dir, "images");
        assert_eq!(config.seed.len(), 5);
        assert_eq!(config.seed_items()[0], Item::new("Laptop", 15, 1200.0));
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let pal = PalHandle::new(MockPal::new());
        let config = load_config(&pal, &FilePath::from("stockroom.toml")).unwrap();
        assert_eq!(config.title, "Item Stock Checker");
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_load_config_partial_file() {
        let pal_impl = MockPal::new();
        pal_impl.add_file(
            FilePath::from("stockroom.toml"),
            b"title = \"My Shop\"\nport = 9000\n".to_vec(),
        );
        let pal = PalHandle::new(pal_impl);

        let config = load_config(&pal, &FilePath::from("stockroom.toml")).unwrap();
        assert_eq!(config.title, "My Shop");
        assert_eq!(config.port, 9000);
        // Unspecified fields fall back to defaults
        assert_eq!(config.store_path, "items.json");
        assert_eq!(config.seed.len(), 5);
    }

    #[test]
    fn test_load_config_with_seed() {
        let pal_impl = MockPal::new();
        pal_impl.add_file(
            FilePath::from("stockroom.toml"),
            br#"
title = "Seeded"

[[seed]]
name = "Widget"
stock = 3
price = 1.25
"#
            .to_vec(),
        );
        let pal = PalHandle::new(pal_impl);

        let config = load_config(&pal, &FilePath::from("stockroom.toml")).unwrap();
        assert_eq!(config.seed_items(), vec![Item::new("Widget", 3, 1.25)]);
    }

    #[test]
    fn test_load_config_invalid_toml_is_error() {
        let pal_impl = MockPal::new();
        pal_impl.add_file(
            FilePath::from("stockroom.toml"),
            b"title = [not toml".to_vec(),
        );
        let pal = PalHandle::new(pal_impl);

        let result = load_config(&pal, &FilePath::from("stockroom.toml"));
        assert!(result.is_err());
    }
}
