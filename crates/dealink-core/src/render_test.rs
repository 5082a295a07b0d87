use super::*;
use crate::app_config::OutputMode;
use crate::matcher::{resolve, MatchResult};
use crate::payload::select;
use crate::test_support::{config, whey};

fn script_block(body: &str) -> (usize, usize) {
    let start = body.find("<script>").expect("script start");
    let end = body.rfind("</script>").expect("script end") + "</script>".len();
    (start, end)
}

#[test]
fn escape_html_replaces_all_five_characters() {
    assert_eq!(
        escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
    );
}

#[test]
fn escape_html_leaves_plain_text_alone() {
    assert_eq!(escape_html("Whey \u{b7} 19.99 \u{20ac}"), "Whey \u{b7} 19.99 \u{20ac}");
}

#[test]
fn debug_mode_renders_pretty_json() {
    let catalog = vec![whey()];
    let cfg = config(OutputMode::Interactive);
    let payload = select(
        "rewe-optimum-whey-19-99",
        resolve("rewe-optimum-whey-19-99", &catalog),
        true,
        &cfg,
    );
    let rendered = render(&payload, &cfg).expect("render");
    assert_eq!(rendered.content_type, JSON_CONTENT_TYPE);
    assert!(rendered.body.starts_with("{\n  \"keyRaw\""));
    let json: serde_json::Value = serde_json::from_str(&rendered.body).expect("json");
    assert_eq!(json["found"], true);
    assert_eq!(json["foundName"], "Whey");
}

#[test]
fn preview_mode_has_open_graph_tags_and_refresh() {
    let catalog = vec![whey()];
    let cfg = config(OutputMode::Preview);
    let payload = select("rewe-optimum-whey", resolve("rewe-optimum-whey", &catalog), false, &cfg);
    let rendered = render(&payload, &cfg).expect("render");
    let body = rendered.body;

    assert_eq!(rendered.content_type, HTML_CONTENT_TYPE);
    assert!(body.contains(r#"<meta property="og:type" content="website" />"#));
    assert!(body.contains(r#"<meta property="og:title" content="GymRat Deal "#));
    assert!(body.contains(r#"<meta property="og:description" content="Rewe "#));
    assert!(body.contains(
        r#"<meta property="og:image" content="https://deals.example.com/images/og-default.png" />"#
    ));
    assert!(body.contains(
        r#"<meta property="og:url" content="https://deals.example.com/deal/rewe-optimum-whey" />"#
    ));
    assert!(body.contains(r#"<meta name="twitter:card" content="summary_large_image" />"#));
    assert!(body.contains(&format!("<title>{}</title>", escape_html(&payload.title))));
    assert!(body.contains(
        r#"<meta http-equiv="refresh" content="0; url=https://apps.apple.com/app/id42" />"#
    ));
    assert!(!body.contains("<script>"));
}

#[test]
fn interactive_mode_embeds_script_and_noscript_link() {
    let cfg = config(OutputMode::Interactive);
    let payload = select("abc", MatchResult::NotFound, false, &cfg);
    let body = render(&payload, &cfg).expect("render").body;

    assert!(body.contains(r#"<noscript><a href="https://apps.apple.com/app/id42">"#));
    assert!(body.contains(r#"var DEEP_LINK = "gymrat://deal/abc";"#));
    assert!(!body.contains("http-equiv=\"refresh\""));
    assert_eq!(body.matches("<script>").count(), 1);
}

#[test]
fn hostile_product_name_is_escaped_everywhere() {
    let mut product = whey();
    product.name = "<script>alert('x')</script>".to_owned();
    product.category = "\"><img src=x>".to_owned();
    let catalog = vec![product];
    let cfg = config(OutputMode::Interactive);

    let key = "<script>alert(1)</script>";
    let payload = select(key, resolve("rewe-optimum-whey", &catalog), false, &cfg);
    let body = render(&payload, &cfg).expect("render").body;

    let (start, end) = script_block(&body);
    let outside = format!("{}{}", &body[..start], &body[end..]);
    assert!(!outside.contains("<script>"));
    assert!(!outside.contains("<img"));
    assert!(body.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"));

    let inside = &body[start + "<script>".len()..end - "</script>".len()];
    assert!(!inside.contains("<script>"));
    assert!(!inside.contains("</script>"));
}

#[test]
fn hostile_key_is_escaped_in_preview_mode() {
    let cfg = config(OutputMode::Preview);
    let payload = select("\"><script>x</script>", MatchResult::NotFound, false, &cfg);
    let body = render(&payload, &cfg).expect("render").body;
    assert!(!body.contains("<script>"));
}

#[test]
fn error_page_escapes_title_and_detail() {
    let page = error_page(
        "Catalog <fetch> failed",
        &serde_json::json!({ "productsUrl": "https://x.example.com/p.json?a=1&b=2" }),
    );
    assert!(page.contains("<h2>Catalog &lt;fetch&gt; failed</h2>"));
    assert!(page.contains("https://x.example.com/p.json?a=1&amp;b=2"));
    assert!(page.contains("&quot;productsUrl&quot;"));
}
