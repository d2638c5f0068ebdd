use home_finance_core::calculator::{CalculationMode, CalculatorConfig};

use super::file;

/// Environment variable that overrides `remote.base_url`.
pub const API_URL_ENV: &str = "HOMECALC_API_URL";

/// Load the calculator configuration.
///
/// Sources, later wins: built-in defaults, the TOML file at `path`, the
/// `HOMECALC_API_URL` environment variable, then `--remote`.
pub fn load_calculator_config(
    path: Option<&str>,
    force_remote: bool,
) -> Result<CalculatorConfig, Box<dyn std::error::Error>> {
    let base = match path {
        Some(p) => file::read_toml(p)?,
        None => CalculatorConfig::default(),
    };
    let config = apply_overrides(base, std::env::var(API_URL_ENV).ok(), force_remote);
    tracing::debug!(?config, "calculator configuration");
    Ok(config)
}

fn apply_overrides(
    mut config: CalculatorConfig,
    env_url: Option<String>,
    force_remote: bool,
) -> CalculatorConfig {
    if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
        config.remote.base_url = Some(url);
    }
    if force_remote {
        config.mode = CalculationMode::Remote;
    }
    config
}
