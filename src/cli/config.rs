//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "./dw",
//!   "orders_file": "orders.csv",
//!   "products_file": "products.csv",
//!   "sales_file": null,
//!   "log_format": "json",
//!   "log_level": "info"
//! }
//! ```
//!
//! Relative source paths are resolved against `data_dir`. When `sales_file`
//! is set it takes precedence over the orders/products pair.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::{parse_filter, LogFormat};

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Orders file (optional, default "orders.csv")
    #[serde(default = "default_orders_file")]
    pub orders_file: String,

    /// Products file (optional, default "products.csv")
    #[serde(default = "default_products_file")]
    pub products_file: String,

    /// Flat sales file carrying order and product columns (optional)
    #[serde(default)]
    pub sales_file: Option<String>,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Level or filter directive (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_orders_file() -> String {
    "orders.csv".to_string()
}
fn default_products_file() -> String {
    "products.csv".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Where the loader reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFiles {
    Flat(PathBuf),
    Split { orders: PathBuf, products: PathBuf },
}

impl Config {
    /// A config with defaults for everything but the data directory
    pub fn new(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            orders_file: default_orders_file(),
            products_file: default_products_file(),
            sales_file: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.sales_file.is_none() {
            if self.orders_file.trim().is_empty() {
                return Err(CliError::config_error("orders_file must not be empty"));
            }
            if self.products_file.trim().is_empty() {
                return Err(CliError::config_error("products_file must not be empty"));
            }
        } else if self.sales_file.as_deref().map_or(false, |f| f.trim().is_empty()) {
            return Err(CliError::config_error("sales_file must not be empty when set"));
        }

        parse_filter(&self.log_level)?;

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn source(&self) -> SourceFiles {
        match &self.sales_file {
            Some(sales) => SourceFiles::Flat(self.resolve(sales)),
            None => SourceFiles::Split {
                orders: self.resolve(&self.orders_file),
                products: self.resolve(&self.products_file),
            },
        }
    }

    fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_path().join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("salesdw.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, r#"{"data_dir": "/var/dw"}"#);
        let config = Config::load(&path).unwrap();

        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "info");
        assert_eq!(
            config.source(),
            SourceFiles::Split {
                orders: PathBuf::from("/var/dw/orders.csv"),
                products: PathBuf::from("/var/dw/products.csv"),
            }
        );
    }

    #[test]
    fn test_sales_file_takes_precedence() {
        let config = Config {
            sales_file: Some("/data/sales.csv".into()),
            ..Config::new("/var/dw")
        };
        assert_eq!(config.source(), SourceFiles::Flat(PathBuf::from("/data/sales.csv")));
    }

    #[test]
    fn test_missing_data_dir_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, r#"{"log_level": "info"}"#);
        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "DW_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let tmp = TempDir::new().unwrap();

        let path = write_config(&tmp, r#"{"data_dir": "/d", "log_format": "xml"}"#);
        assert!(Config::load(&path).is_err());

        let path = write_config(&tmp, r#"{"data_dir": "/d", "log_level": "x=notalevel"}"#);
        assert!(Config::load(&path).is_err());

        let path = write_config(&tmp, r#"{"data_dir": "  "}"#);
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(Config::load(&tmp.path().join("absent.json")).is_err());
    }
}
