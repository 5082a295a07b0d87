use thiserror::Error;

/// Errors returned while fetching or decoding the product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The HTTP client could not be constructed (e.g. invalid TLS config).
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Network, TLS, or timeout failure.
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        status: u16,
        status_text: String,
        url: String,
    },

    #[error("catalog at {url} is not valid JSON: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog at {url} is not a JSON array (found {observed})")]
    NotAnArray { url: String, observed: &'static str },
}

/// Coarse classification used by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorKind {
    /// The catalog could not be retrieved.
    FetchFailed,
    /// The catalog was retrieved but has the wrong shape.
    Malformed,
}

impl CatalogError {
    #[must_use]
    pub fn kind(&self) -> CatalogErrorKind {
        match self {
            CatalogError::ClientBuild(_)
            | CatalogError::Http { .. }
            | CatalogError::UnexpectedStatus { .. } => CatalogErrorKind::FetchFailed,
            CatalogError::InvalidJson { .. }
            | CatalogError::NotAnArray { .. } => CatalogErrorKind::Malformed,
        }
    }

    /// JSON type name of what was found instead of an array, for diagnostics.
    #[must_use]
    pub fn observed_type(&self) -> Option<&'static str> {
        match self {
            CatalogError::NotAnArray { observed, .. } => Some(*observed),
            CatalogError::InvalidJson { .. } => Some("invalid json"),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, CatalogError::Http { source, .. } if source.is_timeout())
    }
}
