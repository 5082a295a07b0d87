use std::net::SocketAddr;

/// Which document a non-debug request receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Open Graph tags plus a `<meta http-equiv="refresh">` redirect.
    Preview,
    /// Open Graph tags plus the client-side app hand-off script.
    Interactive,
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::Preview => write!(f, "preview"),
            OutputMode::Interactive => write!(f, "interactive"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Public origin without trailing slash, e.g. `https://deals.example.com`.
    pub public_base_url: String,
    pub catalog_url: String,
    pub catalog_timeout_secs: u64,
    pub user_agent: String,
    pub output_mode: OutputMode,
    pub default_image_url: String,
    pub preview_redirect_url: String,
    /// Prefix the encoded raw key is appended to, e.g. `gymrat://deal/`.
    pub deep_link_base: String,
    pub app_store_url: String,
    pub beta_url: Option<String>,
    pub fallback_delay_ms: u64,
    pub brand_title: String,
    pub fallback_description: String,
}
