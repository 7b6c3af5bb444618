//! Settings: CLI flags / env vars over `tally.toml` over built-in defaults.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tallylib::{
    catalog::Catalog,
    error::{Result, TallyError},
    store::{StoreOptions, DEFAULT_MAX_FAVORITES},
};
use tracing::debug;

pub const CONFIG_FILE: &str = "tally.toml";
pub const DEFAULT_DATA_DIR: &str = "tally-data";
pub const DEFAULT_CURRENCY: &str = "NGN";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub currency: Option<String>,
    pub max_favorites: Option<usize>,
    pub seed_inventory: Option<bool>,
    /// Replaces the built-in catalog when present.
    pub catalog: Option<BTreeMap<String, Decimal>>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| TallyError::Config(e.to_string()))
    }

    /// `required` makes a missing file an error; otherwise it means defaults.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "config loaded");
                Self::parse(&text)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(e) => Err(TallyError::Config(format!("{}: {e}", path.display()))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub currency: String,
    pub store: StoreOptions,
}

impl Settings {
    pub fn resolve(
        data_dir: Option<PathBuf>,
        config: Option<PathBuf>,
        currency: Option<String>,
    ) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let file = match config {
            Some(path) => FileConfig::load(&path, true)?,
            None => FileConfig::load(&data_dir.join(CONFIG_FILE), false)?,
        };
        Ok(Self::merge(data_dir, currency, file))
    }

    pub fn merge(data_dir: PathBuf, currency: Option<String>, file: FileConfig) -> Self {
        let catalog = match file.catalog {
            Some(prices) => prices.into_iter().collect(),
            None => Catalog::builtin(),
        };
        Self {
            data_dir,
            currency: currency
                .or(file.currency)
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            store: StoreOptions {
                catalog,
                seed_inventory: file.seed_inventory.unwrap_or(true),
                max_favorites: file.max_favorites.unwrap_or(DEFAULT_MAX_FAVORITES),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_fill_gaps() {
        let file = FileConfig::parse(
            r#"
currency = "USD"
max_favorites = 3
seed_inventory = false

[catalog]
"Widget" = 12
"Gadget" = "4.50"
"#,
        )
        .unwrap();
        let s = Settings::merge(PathBuf::from("d"), None, file);
        assert_eq!(s.currency, "USD");
        assert_eq!(s.store.max_favorites, 3);
        assert!(!s.store.seed_inventory);
        assert_eq!(s.store.catalog.len(), 2);
        assert_eq!(s.store.catalog.price("Gadget"), Some(Decimal::new(450, 2)));
    }

    #[test]
    fn flag_beats_file() {
        let file = FileConfig::parse("currency = \"USD\"").unwrap();
        let s = Settings::merge(PathBuf::from("d"), Some("EUR".into()), file);
        assert_eq!(s.currency, "EUR");
        assert_eq!(s.store.catalog, Catalog::builtin());
    }

    #[test]
    fn unknown_key_is_config_error() {
        let err = FileConfig::parse("colour = 1").unwrap_err();
        assert!(matches!(err, TallyError::Config(_)));
    }

    #[test]
    fn missing_default_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::resolve(Some(dir.path().to_path_buf()), None, None).unwrap();
        assert_eq!(s.currency, DEFAULT_CURRENCY);
        assert!(Settings::resolve(None, Some(dir.path().join("nope.toml")), None).is_err());
    }
}
