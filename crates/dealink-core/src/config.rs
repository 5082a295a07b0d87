use crate::app_config::{AppConfig, OutputMode};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the parsing/validation logic decoupled from the process environment,
/// so tests can drive it with a plain `HashMap`.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let public_base_url = require("DEALINK_PUBLIC_BASE_URL")?
        .trim()
        .trim_end_matches('/')
        .to_string();

    let bind_addr = or_default("DEALINK_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "DEALINK_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;
    let log_level = or_default("DEALINK_LOG_LEVEL", "info");

    let catalog_url = or_default(
        "DEALINK_CATALOG_URL",
        &format!("{public_base_url}/products.json"),
    );
    let catalog_timeout_secs = parse_u64("DEALINK_CATALOG_TIMEOUT_SECS", "5")?;
    if catalog_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "DEALINK_CATALOG_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }
    let user_agent = or_default("DEALINK_USER_AGENT", "dealink/0.1 (deal-preview)");

    let output_mode = parse_output_mode(&or_default("DEALINK_OUTPUT_MODE", "interactive"))?;

    let default_image_url = or_default(
        "DEALINK_DEFAULT_IMAGE_URL",
        &format!("{public_base_url}/images/og-default.png"),
    );
    let deep_link_base = or_default("DEALINK_DEEP_LINK_BASE", "gymrat://deal/");
    let app_store_url = or_default("DEALINK_APP_STORE_URL", "https://apps.apple.com/");
    let preview_redirect_url = or_default("DEALINK_PREVIEW_REDIRECT_URL", &app_store_url);
    let beta_url = lookup("DEALINK_BETA_URL")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let fallback_delay_ms = parse_u64("DEALINK_FALLBACK_DELAY_MS", "1200")?;

    let brand_title = or_default("DEALINK_BRAND_TITLE", "GymRat Deal \u{1f525}");
    let fallback_description = or_default(
        "DEALINK_FALLBACK_DESCRIPTION",
        "Protein-Deals & Angebote",
    );

    Ok(AppConfig {
        bind_addr,
        log_level,
        public_base_url,
        catalog_url,
        catalog_timeout_secs,
        user_agent,
        output_mode,
        default_image_url,
        preview_redirect_url,
        deep_link_base,
        app_store_url,
        beta_url,
        fallback_delay_ms,
        brand_title,
        fallback_description,
    })
}

/// Parse a string into an `OutputMode` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than `preview` or
/// `interactive` (case-insensitive).
fn parse_output_mode(s: &str) -> Result<OutputMode, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "preview" => Ok(OutputMode::Preview),
        "interactive" => Ok(OutputMode::Interactive),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DEALINK_OUTPUT_MODE".to_string(),
            reason: format!("unknown output mode \"{other}\"; expected preview or interactive"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
