//! Configuration infrastructure
//!
//! Contains configuration loading and management for catalog crawling.
//!
//! Configuration is organized into sections:
//! 1. Crawl settings (root page, endpoint filters, politeness delay)
//! 2. Parsing settings (site markup patterns, see `parsing::config`)
//! 3. HTTP client, export and logging settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::infrastructure::parsing::ParsingConfig;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawl: CrawlConfig,
    pub parsing: ParsingConfig,
    pub http: HttpConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Crawl loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Catalog page listing every category endpoint
    pub root_url: String,

    /// Regex selecting which root-page links are catalog endpoints
    pub endpoint_pattern: String,

    /// Endpoint suffixes that are never crawled
    pub ignored_endpoints: Vec<String>,

    /// Fetch product pages linked from table rows
    pub follow_product_links: bool,

    /// Pause after every fetch in milliseconds (0 disables)
    pub request_delay_ms: u64,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,

    /// Request timeout; `None` keeps the client library default
    pub timeout_seconds: Option<u64>,

    pub follow_redirects: bool,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub categories_file: String,
    pub products_file: String,

    /// SQLite connection string for the table upload; `None` skips the upload
    pub database_url: Option<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs in the log file
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log directory; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,

    /// Module-specific log level filters (e.g., "sqlx": "warn", "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            root_url: diamond::ROOT_URL.to_string(),
            endpoint_pattern: diamond::ENDPOINT_PATTERN.to_string(),
            ignored_endpoints: diamond::IGNORED_ENDPOINTS.iter().map(ToString::to_string).collect(),
            follow_product_links: true,
            request_delay_ms: defaults::REQUEST_DELAY_MS,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: None,
            follow_redirects: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            categories_file: defaults::CATEGORIES_FILE.to_string(),
            products_file: defaults::PRODUCTS_FILE.to_string(),
            database_url: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            max_files: defaults::LOG_MAX_FILES,
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("sqlx".to_string(), "warn".to_string());
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

impl ExportConfig {
    pub fn categories_path(&self) -> PathBuf {
        self.output_dir.join(&self.categories_file)
    }

    pub fn products_path(&self) -> PathBuf {
        self.output_dir.join(&self.products_file)
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the default config file in the working directory
    pub fn new() -> Self {
        Self::with_path(defaults::CONFIG_FILE)
    }

    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Load configuration from file, writing the defaults if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            if let Err(e) = self.save_config(&default_config).await {
                warn!("Could not write default configuration: {e:#}");
            }
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .with_context(|| format!("Failed to read configuration file {:?}", self.config_path))?;

        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration file {:?}", self.config_path))?;

        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Diamond Antenna website URLs and markup conventions
pub mod diamond {
    /// Site root used to resolve catalog-relative links
    pub const BASE_URL: &str = "https://diamondantenna.net/";

    /// Product index listing every category endpoint
    pub const ROOT_URL: &str = "https://www.diamondantenna.net/products.html";

    /// Root-page links that count as catalog endpoints
    pub const ENDPOINT_PATTERN: &str = r"Product_Catalog/.*\.html";

    /// Technical info, accessories and discontinued pages carry no product tables
    pub const IGNORED_ENDPOINTS: &[&str] = &["techno.html", "accessories.html", "discontinued.html"];

    /// Product links inside catalog tables
    pub const PRODUCT_LINK_PATTERN: &str = r"\.\./([\w\d-]+\.html)";

    /// Product photos on product pages
    pub const THUMBNAIL_PATTERN: &str = r"picts/.*\.jpg";

    /// Class marking content rows in catalog tables
    pub const DATA_ROW_CLASS: &str = "tabs";

    /// Columns that feed the product tagline, by priority
    pub const DESCRIPTION_COLUMN: &str = "Description";
    pub const TAGLINE_FALLBACK_COLUMNS: &[&str] =
        &["Stacked ElementPhasing/Wavelength", "ElementPhasing/Wavelength"];
}

/// Default configuration values
pub mod defaults {
    /// Config file looked up in the working directory
    pub const CONFIG_FILE: &str = "antenna_catalog.json";

    /// Default delay between requests in milliseconds
    pub const REQUEST_DELAY_MS: u64 = 0;

    pub const USER_AGENT: &str = "antenna-catalog/0.2 (catalog indexing)";

    pub const OUTPUT_DIR: &str = "output";
    pub const CATEGORIES_FILE: &str = "categories.json";
    pub const PRODUCTS_FILE: &str = "products.json";

    // Log configuration defaults
    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default JSON format setting
    pub const LOG_JSON_FORMAT: bool = false;

    /// Default console output setting
    pub const LOG_CONSOLE_OUTPUT: bool = true;

    /// Default file output setting
    pub const LOG_FILE_OUTPUT: bool = false;

    /// Default maximum log files to keep
    pub const LOG_MAX_FILES: u32 = 5;
}
