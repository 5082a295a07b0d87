//! HTTP client for the static `products.json` catalog.

use std::time::Duration;

use dealink_core::{AppConfig, ProductRecord};
use reqwest::Client;
use serde_json::Value;

use crate::error::CatalogError;

/// Fetches the product catalog once per call. No caching, no retries; the
/// configured timeout bounds the whole exchange.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    catalog_url: String,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with the given overall timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ClientBuild`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        catalog_url: impl Into<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CatalogError> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(CatalogError::ClientBuild)?;
        Ok(Self {
            client,
            catalog_url: catalog_url.into(),
        })
    }

    /// Creates a client from the catalog settings in `config`.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        Self::new(
            config.catalog_url.clone(),
            config.catalog_timeout_secs,
            &config.user_agent,
        )
    }

    #[must_use]
    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    /// Fetches and decodes the catalog, preserving upstream order.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Http`]: network, TLS, or timeout failure.
    /// - [`CatalogError::UnexpectedStatus`]: any non-2xx status.
    /// - [`CatalogError::InvalidJson`]: body is not JSON.
    /// - [`CatalogError::NotAnArray`]: body is JSON but not an array.
    pub async fn fetch(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        let url = &self.catalog_url;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|source| CatalogError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                url: url.clone(),
            });
        }

        let body = response.text().await.map_err(|source| CatalogError::Http {
            url: url.clone(),
            source,
        })?;

        let products = decode_catalog(url, &body)?;
        tracing::debug!(url = %url, count = products.len(), "catalog fetched");
        Ok(products)
    }
}

/// Decodes a catalog body. `url` is only used for error context.
///
/// Array elements that are not product objects are skipped with a warning;
/// only a body that is not a JSON array fails.
///
/// # Errors
///
/// See [`CatalogClient::fetch`] for the decode-related variants.
pub fn decode_catalog(url: &str, body: &str) -> Result<Vec<ProductRecord>, CatalogError> {
    let value = serde_json::from_str::<Value>(body).map_err(|source| CatalogError::InvalidJson {
        url: url.to_owned(),
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(CatalogError::NotAnArray {
            url: url.to_owned(),
            observed: json_type_name(&value),
        });
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                tracing::warn!(
                    url,
                    index,
                    observed = json_type_name(&item),
                    "skipping non-object catalog entry"
                );
                return None;
            }
            serde_json::from_value::<ProductRecord>(item)
                .inspect_err(|e| {
                    tracing::warn!(url, index, error = %e, "skipping unreadable catalog entry");
                })
                .ok()
        })
        .collect())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
