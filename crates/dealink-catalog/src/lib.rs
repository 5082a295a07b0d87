pub mod client;
pub mod error;

pub use client::{decode_catalog, CatalogClient};
pub use error::{CatalogError, CatalogErrorKind};
