//! Conversion of request failures into diagnostic 500 responses.
//!
//! Every failure is caught here; nothing reaches the client as an empty 200.
//! Details name the catalog URL and the upstream status or message only.

use std::any::Any;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use dealink_catalog::{CatalogError, CatalogErrorKind};
use dealink_core::render::{error_page, HTML_CONTENT_TYPE};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    CatalogFetchFailed,
    CatalogMalformed,
    UnhandledFault,
}

impl FailureKind {
    fn title(self) -> &'static str {
        match self {
            FailureKind::CatalogFetchFailed => "Fetch products.json failed",
            FailureKind::CatalogMalformed => "products.json is not an array",
            FailureKind::UnhandledFault => "Request handling crashed",
        }
    }
}

#[derive(Debug)]
pub struct DealFailure {
    pub kind: FailureKind,
    pub detail: serde_json::Value,
    /// Render as JSON instead of HTML (set for `debug=1` requests).
    pub as_json: bool,
}

#[derive(Debug, Serialize)]
struct FailureBody<'a> {
    error: ErrorBody<'a>,
    detail: &'a serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: FailureKind,
    message: &'a str,
}

impl DealFailure {
    pub fn from_catalog(error: &CatalogError, catalog_url: &str, as_json: bool) -> Self {
        let kind = match error.kind() {
            CatalogErrorKind::FetchFailed => FailureKind::CatalogFetchFailed,
            CatalogErrorKind::Malformed => FailureKind::CatalogMalformed,
        };

        let detail = match error {
            CatalogError::UnexpectedStatus {
                status,
                status_text,
                ..
            } => json!({
                "status": status,
                "statusText": status_text,
                "productsUrl": catalog_url,
            }),
            CatalogError::Http { .. } | CatalogError::ClientBuild(_) => json!({
                "message": error.to_string(),
                "timeout": error.is_timeout(),
                "productsUrl": catalog_url,
            }),
            CatalogError::InvalidJson { .. } | CatalogError::NotAnArray { .. } => json!({
                "productsUrl": catalog_url,
                "type": error.observed_type(),
                "message": error.to_string(),
            }),
        };

        Self {
            kind,
            detail,
            as_json,
        }
    }

    pub fn unhandled(
        error: &(dyn std::error::Error + 'static),
        catalog_url: &str,
        as_json: bool,
    ) -> Self {
        Self {
            kind: FailureKind::UnhandledFault,
            detail: json!({
                "message": error.to_string(),
                "trace": error_chain(error),
                "productsUrl": catalog_url,
            }),
            as_json,
        }
    }
}

impl IntoResponse for DealFailure {
    fn into_response(self) -> Response {
        let title = self.kind.title();
        let mut response = if self.as_json {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FailureBody {
                    error: ErrorBody {
                        code: self.kind,
                        message: title,
                    },
                    detail: &self.detail,
                }),
            )
                .into_response()
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)],
                error_page(title, &self.detail),
            )
                .into_response()
        };
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }
}

/// Renders `error` and its `source()` chain, outermost first.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut lines = vec![error.to_string()];
    let mut current = error.source();
    while let Some(cause) = current {
        lines.push(format!("caused by: {cause}"));
        current = cause.source();
    }
    lines.join("\n")
}

/// Builds the `CatchPanicLayer` handler that turns a handler panic into an
/// `UnhandledFault` page.
pub fn panic_handler(
    catalog_url: String,
) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone + Send + Sync + 'static {
    move |panic: Box<dyn Any + Send + 'static>| {
        let message = if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = panic.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "unknown panic payload".to_string()
        };
        tracing::error!(panic = %message, "request handler panicked");

        DealFailure {
            kind: FailureKind::UnhandledFault,
            detail: json!({
                "message": message,
                "trace": "panic in request handler",
                "productsUrl": catalog_url,
            }),
            as_json: false,
        }
        .into_response()
    }
}
