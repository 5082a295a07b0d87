//! Deal-key resolution and link-preview rendering.
//!
//! Everything in this crate is pure: the catalog arrives as an already-fetched
//! slice of [`ProductRecord`]s and every function returns owned output. The
//! HTTP fetch lives in `dealink-catalog`; routing lives in `dealink-server`.

pub mod app_config;
pub mod config;
pub mod error;
pub mod links;
pub mod matcher;
pub mod normalize;
pub mod payload;
pub mod products;
pub mod redirect;
pub mod render;

pub use app_config::{AppConfig, OutputMode};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use error::{ConfigError, RenderError};
pub use matcher::{resolve, MatchPass, MatchResult};
pub use normalize::{build_key, format_price, normalize};
pub use payload::{select, DebugReport, ResponseMode, ResponsePayload};
pub use products::ProductRecord;
pub use redirect::{Orchestrator, RedirectPlan, RedirectState};
pub use render::{render, Rendered};

#[cfg(test)]
pub(crate) mod test_support;
