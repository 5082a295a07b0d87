//! HTML and JSON documents.
//!
//! Product text comes from a hand-edited upstream catalog, so every dynamic
//! value goes through [`escape_html`] before it lands in markup. The only
//! unescaped region is the fixed orchestrator script.

use serde::Serialize;

use crate::app_config::AppConfig;
use crate::error::RenderError;
use crate::payload::{ResponseMode, ResponsePayload};
use crate::redirect::{client_script, RedirectPlan};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A finished response body and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: String,
}

/// Escapes `&`, `<`, `>`, `"` and `'` for use in element text and attribute
/// values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders `payload` according to its mode.
///
/// # Errors
///
/// Returns [`RenderError::Json`] if the debug report cannot be serialized.
pub fn render(payload: &ResponsePayload, config: &AppConfig) -> Result<Rendered, RenderError> {
    match payload.mode {
        ResponseMode::Debug => Ok(Rendered {
            content_type: JSON_CONTENT_TYPE,
            body: pretty_json(&payload.report)?,
        }),
        ResponseMode::Preview => {
            let head = format!(
                r#"  <meta http-equiv="refresh" content="0; url={}" />"#,
                escape_html(&config.preview_redirect_url)
            );
            Ok(Rendered {
                content_type: HTML_CONTENT_TYPE,
                body: page(payload, &head, ""),
            })
        }
        ResponseMode::Interactive => {
            let plan = RedirectPlan::from_config(config, &payload.report.key_raw);
            let body = format!(
                "  <noscript><a href=\"{store}\">Zum App Store</a></noscript>\n  <script>\n{script}\n  </script>",
                store = escape_html(&config.app_store_url),
                script = client_script(&plan),
            );
            Ok(Rendered {
                content_type: HTML_CONTENT_TYPE,
                body: page(payload, "", &body),
            })
        }
    }
}

fn page(payload: &ResponsePayload, extra_head: &str, body: &str) -> String {
    let title = escape_html(&payload.title);
    let description = escape_html(&payload.description);
    let image = escape_html(&payload.image_url);
    let url = escape_html(&payload.canonical_url);

    format!(
        r#"<!doctype html>
<html lang="de">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />

  <meta property="og:type" content="website" />
  <meta property="og:title" content="{title}" />
  <meta property="og:description" content="{description}" />
  <meta property="og:image" content="{image}" />
  <meta property="og:url" content="{url}" />

  <meta name="twitter:card" content="summary_large_image" />
  <title>{title}</title>
{extra_head}
</head>
<body>
{body}
</body>
</html>
"#
    )
}

/// Serializes `value` with two-space indentation.
///
/// # Errors
///
/// Returns [`RenderError::Json`] if serialization fails.
pub fn pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Operator-facing diagnostic page: a heading plus the pretty-printed detail.
#[must_use]
pub fn error_page(title: &str, detail: &serde_json::Value) -> String {
    let detail = serde_json::to_string_pretty(detail).unwrap_or_else(|_| detail.to_string());
    format!(
        r#"<!doctype html>
<html><head><meta charset="utf-8"><title>{title}</title></head>
<body style="font-family: -apple-system, system-ui; padding: 20px;">
  <h2>{title}</h2>
  <pre>{detail}</pre>
</body></html>
"#,
        title = escape_html(title),
        detail = escape_html(&detail),
    )
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
