//! Meta-tag extraction from post preview pages.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A `<meta ...>` tag, tolerating `>` inside quoted attribute values.
static META_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("valid meta tag regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attribute regex")
});

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z]+);").expect("valid entity regex")
});

/// Returns the decoded `content` of the `og:description` meta tag.
///
/// `None` means the tag is absent. A tag without a `content` attribute yields
/// `Some("")`.
#[must_use]
pub fn extract_og_description(html: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|tag| {
        let attrs = parse_attributes(tag.as_str());
        let is_description = attrs
            .iter()
            .any(|(name, value)| name == "property" && value == "og:description");
        if !is_description {
            return None;
        }
        let content = attrs
            .into_iter()
            .find(|(name, _)| name == "content")
            .map(|(_, value)| value)
            .unwrap_or_default();
        Some(decode_entities(&content))
    })
}

fn parse_attributes(tag: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(tag)
        .map(|cap| {
            let name = cap[1].to_ascii_lowercase();
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map_or("", |m| m.as_str())
                .to_string();
            (name, value)
        })
        .collect()
}

/// Decode the character references that appear in preview text.
///
/// Unknown named entities are left untouched.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    ENTITY_RE
        .replace_all(input, |cap: &Captures<'_>| {
            let body = &cap[1];
            let decoded = if let Some(hex) = body
                .strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| cap[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}
