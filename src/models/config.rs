//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlConnectOptions;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Category;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// MySQL connection settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Static catalog values: company, prices, categories
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply overrides from the process environment (and `.env`, if present).
    pub fn apply_env(&mut self) {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("Loaded environment from {}", path.display()),
            Err(e) => log::debug!(".env not loaded: {}", e),
        }
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Variable names match the deployment environment of the feed service:
    /// `DB_*`, `PORT`, `YANDEX_PATH`, `*_PRICE`, `*_LINK`, `*_PICTURE`, `LOGO_URL`, `COMPANY_URL`.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, target: &mut String| {
            if let Some(value) = lookup(key) {
                *target = value;
            }
        };

        string("DB_HOST", &mut self.database.host);
        string("DB_USER", &mut self.database.user);
        string("DB_PASSWORD", &mut self.database.password);
        string("DB_NAME", &mut self.database.name);
        string("YANDEX_PATH", &mut self.server.feed_path);
        // Shared defaults first so the per-category variables win.
        if let Some(logo) = lookup("LOGO_URL") {
            self.catalog.class_category.picture = logo.clone();
            self.catalog.pass_category.picture = logo;
        }
        if let Some(site) = lookup("COMPANY_URL") {
            self.catalog.class_category.url = site.clone();
            self.catalog.pass_category.url = site;
        }
        string("CLASS_LINK", &mut self.catalog.class_category.url);
        string("PASS_LINK", &mut self.catalog.pass_category.url);
        string("CLASS_PICTURE", &mut self.catalog.class_category.picture);
        string("PASS_PICTURE", &mut self.catalog.pass_category.picture);

        parse_into(&lookup, "DB_PORT", &mut self.database.port);
        parse_into(&lookup, "PORT", &mut self.server.port);
        parse_into(&lookup, "FIRST_VISIT_PRICE", &mut self.catalog.first_visit_price);
        parse_into(&lookup, "VISIT_PRICE", &mut self.catalog.visit_price);
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let catalog = &self.catalog;
        if catalog.company_name.trim().is_empty() {
            return Err(AppError::validation("catalog.company_name is empty"));
        }
        if catalog.shop_name.trim().is_empty() {
            return Err(AppError::validation("catalog.shop_name is empty"));
        }
        if catalog.currency.len() != 3 || !catalog.currency.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(AppError::validation(format!(
                "catalog.currency must be a 3-letter code, got {:?}",
                catalog.currency
            )));
        }
        if catalog.max_text_len < 3 {
            return Err(AppError::validation("catalog.max_text_len must be >= 3"));
        }
        if catalog.class_category.id == catalog.pass_category.id {
            return Err(AppError::validation(
                "catalog.class_category and catalog.pass_category share an id",
            ));
        }
        if !self.server.feed_path.starts_with('/') {
            return Err(AppError::validation("server.feed_path must start with '/'"));
        }
        if self.server.port == 0 {
            return Err(AppError::validation("server.port must be > 0"));
        }
        for (field, value) in [
            ("catalog.class_category.picture", &catalog.class_category.picture),
            ("catalog.class_category.url", &catalog.class_category.url),
            ("catalog.pass_category.picture", &catalog.pass_category.picture),
            ("catalog.pass_category.url", &catalog.pass_category.url),
        ] {
            Url::parse(value)
                .map_err(|e| AppError::validation(format!("{field} is not a URL: {e}")))?;
        }
        Ok(())
    }
}

fn parse_into<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => log::warn!("Ignoring {}={:?}: not a valid number", key, raw),
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Path the feed is served under
    #[serde(default = "defaults::feed_path")]
    pub feed_path: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            feed_path: defaults::feed_path(),
        }
    }
}

/// MySQL connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "defaults::db_host")]
    pub host: String,

    #[serde(default = "defaults::db_port")]
    pub port: u16,

    #[serde(default = "defaults::db_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "defaults::db_name")]
    pub name: String,

    /// Pool size
    #[serde(default = "defaults::max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Connect options for the MySQL pool.
    ///
    /// Built field by field so credentials never pass through a URL.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name);
        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: defaults::db_host(),
            port: defaults::db_port(),
            user: defaults::db_user(),
            password: String::new(),
            name: defaults::db_name(),
            max_connections: defaults::max_connections(),
        }
    }
}

/// Static catalog values, read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// `<name>` of the feed
    #[serde(default = "defaults::company_name")]
    pub shop_name: String,

    /// `<company>` of the feed and `vendor` of every offer
    #[serde(default = "defaults::company_name")]
    pub company_name: String,

    #[serde(default = "defaults::currency")]
    pub currency: String,

    /// Price of the trial-visit pass
    #[serde(default = "defaults::first_visit_price")]
    pub first_visit_price: i64,

    /// Price of a single visit; also the fallback for classes without a price
    #[serde(default = "defaults::visit_price")]
    pub visit_price: i64,

    /// Byte bound for names and short descriptions
    #[serde(default = "defaults::max_text_len")]
    pub max_text_len: usize,

    #[serde(default = "defaults::class_category")]
    pub class_category: CategoryConfig,

    #[serde(default = "defaults::pass_category")]
    pub pass_category: CategoryConfig,
}

impl CatalogConfig {
    /// The static category list, classes first.
    pub fn categories(&self) -> Vec<Category> {
        vec![
            self.class_category.to_category(),
            self.pass_category.to_category(),
        ]
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            shop_name: defaults::company_name(),
            company_name: defaults::company_name(),
            currency: defaults::currency(),
            first_visit_price: defaults::first_visit_price(),
            visit_price: defaults::visit_price(),
            max_text_len: defaults::max_text_len(),
            class_category: defaults::class_category(),
            pass_category: defaults::pass_category(),
        }
    }
}

/// One feed category with the defaults its offers inherit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryConfig {
    pub id: u32,
    pub name: String,

    /// Default `<picture>` for offers in this category
    pub picture: String,

    /// Default `<url>` for offers in this category
    pub url: String,
}

impl CategoryConfig {
    fn to_category(&self) -> Category {
        Category {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use super::CategoryConfig;

    // Server defaults
    pub fn host() -> String {
        "0.0.0.0".into()
    }
    pub fn port() -> u16 {
        9999
    }
    pub fn feed_path() -> String {
        "/yandex.yml".into()
    }

    // Database defaults
    pub fn db_host() -> String {
        "localhost".into()
    }
    pub fn db_port() -> u16 {
        3306
    }
    pub fn db_user() -> String {
        "root".into()
    }
    pub fn db_name() -> String {
        "root".into()
    }
    pub fn max_connections() -> u32 {
        5
    }

    // Catalog defaults
    pub fn company_name() -> String {
        "Школа танцев «Без правил»".into()
    }
    pub fn currency() -> String {
        "RUR".into()
    }
    pub fn first_visit_price() -> i64 {
        300
    }
    pub fn visit_price() -> i64 {
        700
    }
    pub fn max_text_len() -> usize {
        250
    }
    fn logo_url() -> String {
        "https://bezpravil.net/img/logo.png".into()
    }
    fn company_url() -> String {
        "https://bezpravil.net".into()
    }
    pub fn class_category() -> CategoryConfig {
        CategoryConfig {
            id: 1,
            name: "Танцевальные классы (разовое посещение)".into(),
            picture: logo_url(),
            url: company_url(),
        }
    }
    pub fn pass_category() -> CategoryConfig {
        CategoryConfig {
            id: 2,
            name: "Абонементы".into(),
            picture: logo_url(),
            url: company_url(),
        }
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
