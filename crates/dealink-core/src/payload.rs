//! Response selection: decide the output mode and build the preview content.

use serde::Serialize;

use crate::app_config::{AppConfig, OutputMode};
use crate::links::canonical_url;
use crate::matcher::MatchResult;
use crate::normalize::{format_price, normalize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    Debug,
    Preview,
    Interactive,
}

impl From<OutputMode> for ResponseMode {
    fn from(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Preview => ResponseMode::Preview,
            OutputMode::Interactive => ResponseMode::Interactive,
        }
    }
}

/// Body of a `debug=1` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    pub key_raw: String,
    pub normalized_key: String,
    pub found: bool,
    pub found_name: Option<String>,
    pub found_image: Option<String>,
}

/// Everything the renderer needs for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub mode: ResponseMode,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub canonical_url: String,
    pub report: DebugReport,
}

/// Builds the payload for a resolved (or unresolved) request.
///
/// `debug_requested` forces [`ResponseMode::Debug`]; otherwise the configured
/// [`OutputMode`] applies. A missing match produces the generic brand title,
/// fallback description, and default image.
#[must_use]
pub fn select(
    raw_key: &str,
    outcome: MatchResult<'_>,
    debug_requested: bool,
    config: &AppConfig,
) -> ResponsePayload {
    let mode = if debug_requested {
        ResponseMode::Debug
    } else {
        config.output_mode.into()
    };

    let product = outcome.product();

    let report = DebugReport {
        key_raw: raw_key.to_owned(),
        normalized_key: normalize(raw_key),
        found: product.is_some(),
        found_name: product
            .map(|p| p.name.clone())
            .filter(|name| !name.is_empty()),
        // Verbatim catalog value; only the page image is trimmed.
        found_image: product
            .and_then(|p| p.image_url.clone())
            .filter(|url| !url.is_empty()),
    };

    let (title, description) = match product {
        Some(p) => {
            let price = format_price(p.price);
            let title = format!("{} {} \u{b7} {price} \u{20ac}", config.brand_title, p.name);
            let mut description = format!("{} \u{b7} {price} \u{20ac}", p.supermarket);
            if let Some(old_price) = p.old_price {
                description.push_str(&format!(" statt {} \u{20ac}", format_price(old_price)));
            }
            description.push_str(&format!(" \u{b7} {}", p.category));
            (title, description)
        }
        None => (
            config.brand_title.clone(),
            config.fallback_description.clone(),
        ),
    };

    let image_url = product
        .and_then(|p| p.image())
        .map_or_else(|| config.default_image_url.clone(), str::to_owned);

    ResponsePayload {
        mode,
        title,
        description,
        image_url,
        canonical_url: canonical_url(&config.public_base_url, raw_key),
        report,
    }
}

#[cfg(test)]
#[path = "payload_test.rs"]
mod tests;
