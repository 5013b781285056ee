//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and `TALLY__`-prefixed environment variables.
//!
//! See `settings.example.toml` for every key.
use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

/// Where exchange rates to CAD come from.
#[derive(Debug, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum Exchange {
    Frankfurter {
        base_url: Option<String>,
        timeout_secs: Option<u64>,
    },
    Fixed {
        #[serde(default)]
        rates: HashMap<String, Decimal>,
    },
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub exchange: Exchange,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 3000)?
            .set_default("server.database.sqlite", migration::DEFAULT_DATABASE_FILE)?
            .set_default("exchange.provider", "frankfurter")?
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
