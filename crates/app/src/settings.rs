//! Settings for the application, read from `settings.toml` and
//! `FINANCE_TIPS__*` environment variables, with a few command line
//! overrides.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use engine::CalculatorConfig;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            database: Database::Memory,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub calculators: CalculatorConfig,
}

#[derive(Debug, Parser)]
#[command(name = "finance_tips")]
struct Args {
    /// Optional config file path (TOML), without or with extension.
    #[arg(long)]
    config: Option<String>,
    /// Override the listening port.
    #[arg(long)]
    port: Option<u16>,
    /// Override the log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings = Self::load(config_path)?;

        if let Some(port) = args.port {
            settings.server.port = port;
        }
        if let Some(level) = args.level {
            settings.app.level = level;
        }

        Ok(settings)
    }

    fn load(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("FINANCE_TIPS").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Currency, Money};

    #[test]
    fn missing_file_gives_defaults() {
        let settings = Settings::load("does/not/exist").unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.database, Database::Memory);
        assert_eq!(settings.calculators.max_loan_duration_months, 360);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("finance_tips_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(
            &path,
            r#"
[app]
level = "debug"

[server]
port = 8080
database = { sqlite = "history.db" }

[calculators]
min_loan_amount = 500

[calculators.zakat]
default_nisab = 2500
nisab_by_currency = { USD = 3400 }
"#,
        )
        .unwrap();

        let settings = Settings::load(path.to_str().unwrap()).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(
            settings.server.database,
            Database::Sqlite("history.db".to_string())
        );
        assert_eq!(settings.calculators.min_loan_amount, Money::from_major(500));
        assert_eq!(settings.calculators.zakat.default_nisab, Money::from_major(2500));
        assert_eq!(
            settings.calculators.zakat.nisab_for(Currency::Usd),
            Money::from_major(3400)
        );
    }
}
