//! Settings of the application, read in order from:
//!
//! 1. `config/monthly_expenses.toml` (or `--config`), optional;
//! 2. `MONTHLY_EXPENSES__<SECTION>__<KEY>` environment variables;
//! 3. command line flags.
use backend::{BudgetSettings, DEFAULT_BASE_URL};
use clap::Parser;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use engine::Payees;
use serde::Deserialize;
use tui::UiConfig;

const DEFAULT_CONFIG_PATH: &str = "config/monthly_expenses";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    /// The terminal belongs to the UI, so logs go to a file.
    pub log_file: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: "monthly_expenses.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Ynab {
    pub token: String,
    pub base_url: String,
}

impl Default for Ynab {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub ynab: Ynab,
    pub budgets: BudgetSettings,
    pub payees: Payees,
    pub ui: UiConfig,
}

#[derive(Debug, Parser)]
#[command(name = "monthly_expenses", version)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// YNAB personal access token.
    #[arg(long, env = "YNAB_TOKEN", hide_env_values = true)]
    ynab_token: Option<String>,
    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    level: Option<String>,
    /// Log file path.
    #[arg(long)]
    log_file: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let builder = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("MONTHLY_EXPENSES")
                    .separator("__")
                    .try_parsing(true),
            );
        let mut settings = Self::from_builder(builder)?;

        if let Some(token) = args.ynab_token {
            settings.ynab.token = token;
        }
        if let Some(level) = args.level {
            settings.app.level = level;
        }
        if let Some(log_file) = args.log_file {
            settings.app.log_file = log_file;
        }

        Ok(settings)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
            .unwrap()
    }

    #[test]
    fn empty_file_gives_defaults() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.ynab.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.budgets, BudgetSettings::default());
        assert_eq!(settings.payees, Payees::default());
        assert_eq!(settings.ui, UiConfig::default());
    }

    #[test]
    fn sections_override_defaults_field_by_field() {
        let settings = parse(
            r#"
            [ynab]
            token = "secret"

            [budgets]
            shared = "Household"

            [payees]
            water = "Aguas"
            partner = "Alex"

            [ui]
            import_delay_ms = 0
            "#,
        );

        assert_eq!(settings.ynab.token, "secret");
        assert_eq!(settings.budgets.shared, "Household");
        assert_eq!(settings.budgets.individual_account, "CGD");
        assert_eq!(settings.payees.water, "Aguas");
        assert_eq!(settings.payees.partner, "Alex");
        assert_eq!(settings.payees.electricity, "EDP");
        assert_eq!(settings.ui.import_delay_ms, 0);
        assert_eq!(settings.ui.readiness_delay_ms, 1_000);
    }
}
