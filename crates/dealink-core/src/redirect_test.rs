use super::*;
use crate::app_config::OutputMode;
use crate::test_support::config;

#[derive(Default)]
struct RecordingNavigator {
    visited: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, url: &str) {
        self.visited.push(url.to_owned());
    }
}

#[derive(Default)]
struct FakeTimer {
    armed: Vec<Duration>,
}

impl Timer for FakeTimer {
    fn arm(&mut self, delay: Duration) {
        self.armed.push(delay);
    }
}

fn plan() -> RedirectPlan {
    RedirectPlan::from_config(&config(OutputMode::Interactive), "rewe-optimum-whey-19-99")
}

const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";

// -----------------------------------------------------------------------
// is_bot / choose_fallback
// -----------------------------------------------------------------------

#[test]
fn is_bot_matches_case_insensitively() {
    assert!(is_bot("WhatsApp/2.23.20.0 A"));
    assert!(is_bot("facebookexternalhit/1.1"));
    assert!(is_bot("TelegramBot (like TwitterBot)"));
    assert!(is_bot("Mozilla/5.0 (compatible; SomeRandomBot/1.0)"));
}

#[test]
fn is_bot_passes_regular_browsers() {
    assert!(!is_bot(IPHONE_SAFARI));
    assert!(!is_bot(""));
}

#[test]
fn choose_fallback_prefers_recognized_beta_url() {
    assert_eq!(
        choose_fallback("https://apps.apple.com/app/id42", Some("https://TestFlight.apple.com/join/abc")),
        "https://TestFlight.apple.com/join/abc"
    );
}

#[test]
fn choose_fallback_ignores_unrecognized_beta_url() {
    assert_eq!(
        choose_fallback("https://apps.apple.com/app/id42", Some("https://beta.example.com/join")),
        "https://apps.apple.com/app/id42"
    );
}

#[test]
fn choose_fallback_without_beta_uses_store() {
    assert_eq!(
        choose_fallback("https://apps.apple.com/app/id42", None),
        "https://apps.apple.com/app/id42"
    );
}

#[test]
fn plan_from_config_uses_configured_values() {
    let plan = plan();
    assert_eq!(plan.deep_link, "gymrat://deal/rewe-optimum-whey-19-99");
    assert_eq!(plan.fallback_url, "https://apps.apple.com/app/id42");
    assert_eq!(plan.delay, Duration::from_millis(1200));
}

#[test]
fn plan_from_config_picks_beta_url() {
    let mut cfg = config(OutputMode::Interactive);
    cfg.beta_url = Some("https://testflight.apple.com/join/xyz".to_owned());
    let plan = RedirectPlan::from_config(&cfg, "k");
    assert_eq!(plan.fallback_url, "https://testflight.apple.com/join/xyz");
}

// -----------------------------------------------------------------------
// Orchestrator
// -----------------------------------------------------------------------

#[test]
fn bot_user_agent_never_navigates() {
    let plan = plan();
    let mut orchestrator = Orchestrator::new(&plan);
    let mut navigator = RecordingNavigator::default();
    let mut timer = FakeTimer::default();

    let state = orchestrator.on_load("Mozilla/5.0 WHATSAPP/2.0", &mut navigator, &mut timer);
    assert_eq!(state, RedirectState::BotExcluded);

    let state = orchestrator.on_timer_elapsed(&mut navigator);
    assert_eq!(state, RedirectState::BotExcluded);
    assert!(navigator.visited.is_empty());
    assert!(timer.armed.is_empty());
}

#[test]
fn browser_gets_deep_link_then_fallback() {
    let plan = plan();
    let mut orchestrator = Orchestrator::new(&plan);
    let mut navigator = RecordingNavigator::default();
    let mut timer = FakeTimer::default();

    let state = orchestrator.on_load(IPHONE_SAFARI, &mut navigator, &mut timer);
    assert_eq!(state, RedirectState::DeepLinkAttempted);
    assert_eq!(navigator.visited, vec![plan.deep_link.clone()]);
    assert_eq!(timer.armed, vec![Duration::from_millis(1200)]);

    let state = orchestrator.on_timer_elapsed(&mut navigator);
    assert_eq!(state, RedirectState::FallbackRedirected);
    assert_eq!(
        navigator.visited,
        vec![plan.deep_link.clone(), plan.fallback_url.clone()]
    );
}

#[test]
fn timer_is_armed_once_per_load() {
    let plan = plan();
    let mut orchestrator = Orchestrator::new(&plan);
    let mut navigator = RecordingNavigator::default();
    let mut timer = FakeTimer::default();

    orchestrator.on_load(IPHONE_SAFARI, &mut navigator, &mut timer);
    orchestrator.on_load(IPHONE_SAFARI, &mut navigator, &mut timer);
    assert_eq!(timer.armed.len(), 1);
    assert_eq!(navigator.visited.len(), 1);
}

#[test]
fn timer_before_load_does_nothing() {
    let plan = plan();
    let mut orchestrator = Orchestrator::new(&plan);
    let mut navigator = RecordingNavigator::default();

    assert_eq!(orchestrator.on_timer_elapsed(&mut navigator), RedirectState::Start);
    assert!(navigator.visited.is_empty());
}

#[test]
fn fallback_fires_only_once() {
    let plan = plan();
    let mut orchestrator = Orchestrator::new(&plan);
    let mut navigator = RecordingNavigator::default();
    let mut timer = FakeTimer::default();

    orchestrator.on_load(IPHONE_SAFARI, &mut navigator, &mut timer);
    orchestrator.on_timer_elapsed(&mut navigator);
    orchestrator.on_timer_elapsed(&mut navigator);
    assert_eq!(navigator.visited.len(), 2);
}

// -----------------------------------------------------------------------
// client_script
// -----------------------------------------------------------------------

#[test]
fn js_string_literal_escapes_markup() {
    assert_eq!(
        js_string_literal("</script><b>&"),
        r#""\u003c/script\u003e\u003cb\u003e\u0026""#
    );
}

#[test]
fn client_script_embeds_plan() {
    let plan = plan();
    let script = client_script(&plan);
    assert!(script.contains(r#"var DEEP_LINK = "gymrat://deal/rewe-optimum-whey-19-99";"#));
    assert!(script.contains(r#"var FALLBACK_URL = "https://apps.apple.com/app/id42";"#));
    assert!(script.contains("var DELAY_MS = 1200;"));
}

#[test]
fn client_script_lists_every_bot_marker() {
    let script = client_script(&plan());
    for marker in BOT_MARKERS {
        assert!(script.contains(&format!("\"{marker}\"")), "missing {marker}");
    }
}

#[test]
fn client_script_cannot_close_its_element() {
    let mut plan = plan();
    plan.fallback_url = "https://x.example.com/</script><script>alert(1)</script>".to_owned();
    let script = client_script(&plan);
    assert!(!script.contains("</script>"));
    assert!(!script.contains("<script>"));
}
