//! Share-link and deep-link construction.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes `raw` the way `encodeURIComponent` does, so links built
/// here match links generated by the mobile app.
#[must_use]
pub fn encode_uri_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

/// `{public_base_url}/deal/{encoded raw key}`.
#[must_use]
pub fn canonical_url(public_base_url: &str, raw_key: &str) -> String {
    format!(
        "{}/deal/{}",
        public_base_url.trim_end_matches('/'),
        encode_uri_component(raw_key)
    )
}

/// `{deep_link_base}{encoded raw key}`, e.g. `gymrat://deal/rewe-whey-19-99`.
#[must_use]
pub fn deep_link_url(deep_link_base: &str, raw_key: &str) -> String {
    format!("{deep_link_base}{}", encode_uri_component(raw_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_uri_component_keeps_unreserved_marks() {
        assert_eq!(encode_uri_component("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
    }

    #[test]
    fn encode_uri_component_escapes_reserved_and_spaces() {
        assert_eq!(encode_uri_component("a b/c?d&e=f#g"), "a%20b%2Fc%3Fd%26e%3Df%23g");
    }

    #[test]
    fn encode_uri_component_escapes_utf8_bytes() {
        assert_eq!(encode_uri_component("Müsli"), "M%C3%BCsli");
    }

    #[test]
    fn canonical_url_joins_base_and_encoded_key() {
        assert_eq!(
            canonical_url("https://deals.example.com/", "Rewe Whey"),
            "https://deals.example.com/deal/Rewe%20Whey"
        );
    }

    #[test]
    fn deep_link_url_appends_encoded_key() {
        assert_eq!(
            deep_link_url("gymrat://deal/", "<x>"),
            "gymrat://deal/%3Cx%3E"
        );
    }
}
