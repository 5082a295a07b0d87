//! Two-pass resolution of a normalized deal key against the catalog.

use serde::Serialize;

use crate::normalize::build_key;
use crate::products::ProductRecord;

/// Which pass produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPass {
    /// The product key equals the request key.
    Exact,
    /// The product key starts with the request key minus its price suffix.
    Prefix,
}

impl std::fmt::Display for MatchPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPass::Exact => write!(f, "exact"),
            MatchPass::Prefix => write!(f, "prefix"),
        }
    }
}

/// Outcome of [`resolve`]. "No match" is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'a> {
    Found {
        product: &'a ProductRecord,
        pass: MatchPass,
    },
    NotFound,
}

impl<'a> MatchResult<'a> {
    #[must_use]
    pub fn product(&self) -> Option<&'a ProductRecord> {
        match self {
            MatchResult::Found { product, .. } => Some(*product),
            MatchResult::NotFound => None,
        }
    }

    #[must_use]
    pub fn pass(&self) -> Option<MatchPass> {
        match self {
            MatchResult::Found { pass, .. } => Some(*pass),
            MatchResult::NotFound => None,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found { .. })
    }
}

/// Resolves `request_key` (already normalized) against `catalog`.
///
/// 1. Exact pass: the first product whose [`build_key`] equals the request key.
/// 2. Prefix pass: strip a trailing `-<digits>-<digits>` price fragment from
///    the request key and take the first product whose key starts with the
///    remainder. Old links keep resolving after a price change this way.
///
/// Catalog order is the only tie-break in both passes. Products sharing a
/// long common prefix can shadow each other in the prefix pass; the first one
/// listed wins.
#[must_use]
pub fn resolve<'a>(request_key: &str, catalog: &'a [ProductRecord]) -> MatchResult<'a> {
    if let Some(product) = catalog.iter().find(|p| build_key(p) == request_key) {
        tracing::debug!(key = request_key, pass = %MatchPass::Exact, "deal key resolved");
        return MatchResult::Found {
            product,
            pass: MatchPass::Exact,
        };
    }

    let key_no_price = strip_price_suffix(request_key);
    if let Some(product) = catalog
        .iter()
        .find(|p| build_key(p).starts_with(key_no_price))
    {
        tracing::debug!(
            key = request_key,
            prefix = key_no_price,
            pass = %MatchPass::Prefix,
            "deal key resolved"
        );
        return MatchResult::Found {
            product,
            pass: MatchPass::Prefix,
        };
    }

    tracing::debug!(
        key = request_key,
        catalog_size = catalog.len(),
        "deal key not found"
    );
    MatchResult::NotFound
}

/// Removes a trailing `-<digits>-<digits>` fragment, if present.
///
/// `rewe-whey-19-99` → `rewe-whey`; `rewe-whey` and `19-99` are returned
/// unchanged (the fragment must be preceded by `-`).
#[must_use]
pub fn strip_price_suffix(key: &str) -> &str {
    let Some((head, cents)) = key.rsplit_once('-') else {
        return key;
    };
    if !is_ascii_digits(cents) {
        return key;
    }
    let Some((stem, units)) = head.rsplit_once('-') else {
        return key;
    };
    if !is_ascii_digits(units) {
        return key;
    }
    stem
}

fn is_ascii_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
