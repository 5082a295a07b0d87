//! The app hand-off that runs in the visitor's browser.
//!
//! The interactive document tries the deep link first and falls back to a
//! store URL after a fixed delay. Nothing tells a web page whether the OS
//! actually switched to the app, so the delay is a heuristic: a slow app
//! launch can still see the fallback fire, and a declined prompt leaves the
//! visitor waiting for the full delay.
//!
//! [`Orchestrator`] is the reference state machine. [`client_script`] emits
//! the browser version from the same [`RedirectPlan`], so the bot list, URLs
//! and delay cannot drift between the two.

use std::time::Duration;

use crate::app_config::AppConfig;
use crate::links::deep_link_url;

/// Lowercase user-agent fragments of link-unfurling crawlers. The trailing
/// `bot` entry catches the long tail.
pub const BOT_MARKERS: &[&str] = &[
    "facebookexternalhit",
    "facebot",
    "whatsapp",
    "telegrambot",
    "twitterbot",
    "slackbot",
    "slack-imgproxy",
    "discordbot",
    "linkedinbot",
    "skypeuripreview",
    "pinterest",
    "embedly",
    "vkshare",
    "applebot",
    "googlebot",
    "bingbot",
    "redditbot",
    "iframely",
    "bot",
];

/// Host that identifies a beta-distribution link.
pub const BETA_DOMAIN: &str = "testflight.apple.com";

/// Returns `true` when `user_agent` belongs to a known preview crawler.
#[must_use]
pub fn is_bot(user_agent: &str) -> bool {
    let ua = user_agent.to_lowercase();
    BOT_MARKERS.iter().any(|marker| ua.contains(marker))
}

/// Picks the beta URL when it is configured and recognizable, else the
/// store URL.
#[must_use]
pub fn choose_fallback<'a>(app_store_url: &'a str, beta_url: Option<&'a str>) -> &'a str {
    beta_url
        .filter(|url| url.to_lowercase().contains(BETA_DOMAIN))
        .unwrap_or(app_store_url)
}

/// Concrete targets for one page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPlan {
    pub deep_link: String,
    pub fallback_url: String,
    pub delay: Duration,
}

impl RedirectPlan {
    #[must_use]
    pub fn from_config(config: &AppConfig, raw_key: &str) -> Self {
        Self {
            deep_link: deep_link_url(&config.deep_link_base, raw_key),
            fallback_url: choose_fallback(&config.app_store_url, config.beta_url.as_deref())
                .to_owned(),
            delay: Duration::from_millis(config.fallback_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectState {
    Start,
    /// Terminal: a crawler is reading the page, nothing navigates.
    BotExcluded,
    /// Deep link issued, fallback timer armed.
    DeepLinkAttempted,
    /// Terminal: the timer fired while the page was still shown.
    FallbackRedirected,
}

/// Where navigation requests go.
pub trait Navigator {
    fn navigate(&mut self, url: &str);
}

/// Arms the single fallback timer.
pub trait Timer {
    fn arm(&mut self, delay: Duration);
}

/// State machine for one page load.
///
/// ```text
/// Start --bot UA--> BotExcluded
/// Start --other---> DeepLinkAttempted --timer--> FallbackRedirected
/// ```
///
/// If the app opens, the page goes away and the timer never reports back.
#[derive(Debug)]
pub struct Orchestrator<'a> {
    plan: &'a RedirectPlan,
    state: RedirectState,
}

impl<'a> Orchestrator<'a> {
    #[must_use]
    pub fn new(plan: &'a RedirectPlan) -> Self {
        Self {
            plan,
            state: RedirectState::Start,
        }
    }

    #[must_use]
    pub fn state(&self) -> RedirectState {
        self.state
    }

    /// Handles page load. Only acts from [`RedirectState::Start`].
    pub fn on_load<N, T>(&mut self, user_agent: &str, navigator: &mut N, timer: &mut T) -> RedirectState
    where
        N: Navigator,
        T: Timer,
    {
        if self.state != RedirectState::Start {
            return self.state;
        }

        if is_bot(user_agent) {
            self.state = RedirectState::BotExcluded;
            return self.state;
        }

        navigator.navigate(&self.plan.deep_link);
        timer.arm(self.plan.delay);
        self.state = RedirectState::DeepLinkAttempted;
        self.state
    }

    /// Handles timer expiry. Only acts from [`RedirectState::DeepLinkAttempted`].
    pub fn on_timer_elapsed<N: Navigator>(&mut self, navigator: &mut N) -> RedirectState {
        if self.state == RedirectState::DeepLinkAttempted {
            navigator.navigate(&self.plan.fallback_url);
            self.state = RedirectState::FallbackRedirected;
        }
        self.state
    }
}

/// Encodes `s` as a JavaScript string literal that is safe inside a
/// `<script>` element.
#[must_use]
pub fn js_string_literal(s: &str) -> String {
    // serde_json never fails on a plain &str.
    serde_json::to_string(s)
        .unwrap_or_else(|_| String::from("\"\""))
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Browser implementation of [`Orchestrator`] for `plan`.
#[must_use]
pub fn client_script(plan: &RedirectPlan) -> String {
    let bots = BOT_MARKERS
        .iter()
        .map(|m| js_string_literal(m))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"(function () {{
  var BOTS = [{bots}];
  var DEEP_LINK = {deep_link};
  var FALLBACK_URL = {fallback};
  var DELAY_MS = {delay};
  var ua = (navigator.userAgent || "").toLowerCase();
  for (var i = 0; i < BOTS.length; i++) {{
    if (ua.indexOf(BOTS[i]) !== -1) {{
      return;
    }}
  }}
  window.location.href = DEEP_LINK;
  setTimeout(function () {{
    window.location.href = FALLBACK_URL;
  }}, DELAY_MS);
}})();"#,
        deep_link = js_string_literal(&plan.deep_link),
        fallback = js_string_literal(&plan.fallback_url),
        delay = plan.delay.as_millis(),
    )
}

#[cfg(test)]
#[path = "redirect_test.rs"]
mod tests;
