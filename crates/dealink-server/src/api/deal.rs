use axum::{
    extract::{rejection::PathRejection, Path, RawQuery, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use dealink_core::{normalize, render, resolve, select, ResponseMode};

use super::error::DealFailure;
use super::AppState;

#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct DealQuery {
    key: Option<String>,
    debug: Option<String>,
}

impl DealQuery {
    /// Reads `key` and `debug` from a raw query string. Repeated parameters
    /// keep their first value; unknown parameters are ignored.
    pub(super) fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        for (name, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match name.as_ref() {
                "key" => &mut query.key,
                "debug" => &mut query.debug,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }

    fn debug_requested(&self) -> bool {
        self.debug.as_deref() == Some("1")
    }
}

/// `GET /deal?key=…` and `GET /d?key=…`.
pub(super) async fn deal_by_query(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, DealFailure> {
    let query = DealQuery::parse(raw_query.as_deref());
    let debug = query.debug_requested();
    let raw_key = extract_raw_key(query.key, None);
    serve_deal(&state, &raw_key, debug).await
}

/// `GET /deal/{*key}` and `GET /d/{*key}`. A non-empty `key` query parameter
/// still takes precedence over the path.
pub(super) async fn deal_by_path(
    State(state): State<AppState>,
    path_key: Result<Path<String>, PathRejection>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, DealFailure> {
    let query = DealQuery::parse(raw_query.as_deref());
    let debug = query.debug_requested();
    let Path(path_key) = path_key.map_err(|rejection| {
        tracing::warn!(error = %rejection, "undecodable deal path");
        DealFailure::unhandled(&rejection, state.catalog.catalog_url(), debug)
    })?;
    let raw_key = extract_raw_key(query.key, Some(path_key));
    serve_deal(&state, &raw_key, debug).await
}

/// Picks the raw key: the query value unless it is missing or empty, then the
/// (already percent-decoded) path remainder, then the empty string.
pub(super) fn extract_raw_key(query_key: Option<String>, path_key: Option<String>) -> String {
    query_key
        .filter(|k| !k.is_empty())
        .or(path_key)
        .unwrap_or_default()
}

async fn serve_deal(state: &AppState, raw_key: &str, debug: bool) -> Result<Response, DealFailure> {
    let catalog_url = state.catalog.catalog_url();

    let catalog = state.catalog.fetch().await.map_err(|e| {
        tracing::warn!(error = %e, url = %catalog_url, "catalog fetch failed");
        DealFailure::from_catalog(&e, catalog_url, debug)
    })?;

    let normalized_key = normalize(raw_key);
    let outcome = resolve(&normalized_key, &catalog);
    tracing::info!(
        key = %normalized_key,
        found = outcome.is_found(),
        pass = ?outcome.pass(),
        catalog_size = catalog.len(),
        "deal request resolved"
    );

    let payload = select(raw_key, outcome, debug, &state.config);
    let rendered = render(&payload, &state.config).map_err(|e| {
        tracing::error!(error = %e, "failed to render deal response");
        DealFailure::unhandled(&e, catalog_url, debug)
    })?;

    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, rendered.content_type)],
        rendered.body,
    )
        .into_response();
    if payload.mode != ResponseMode::Debug {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }
    Ok(response)
}

#[cfg(test)]
#[path = "deal_test.rs"]
mod tests;
