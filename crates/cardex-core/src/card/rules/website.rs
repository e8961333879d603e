//! Website extraction, normalization and URL validation.

use regex::{Regex, RegexBuilder};
use url::Url;

use super::patterns::{EMAIL, WEBSITE};
use super::FieldExtractor;
use crate::models::card::{FieldCandidate, FieldKind};

/// Build the website pattern for a TLD allow-list.
///
/// Matches `http(s)://...`, `www.name.tld...` and bare `name.tld...` where `tld`
/// is in the allow-list. An empty allow-list disables the bare form.
pub fn website_pattern<S: AsRef<str>>(tlds: &[S]) -> Result<Regex, regex::Error> {
    let tlds: Vec<String> = tlds
        .iter()
        .map(|t| t.as_ref().trim().trim_start_matches('.'))
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();

    let mut pattern = String::from(r"https?://[^\s,;]+|\bwww\.[a-z0-9\-]+\.[a-z]{2,}[^\s,;]*");
    if !tlds.is_empty() {
        pattern.push_str(&format!(r"|\b[a-z0-9\-]+\.(?:{})\b[^\s,;]*", tlds.join("|")));
    }

    RegexBuilder::new(&pattern).case_insensitive(true).build()
}

/// Website field extractor.
#[derive(Debug, Clone)]
pub struct WebsiteExtractor {
    pattern: Regex,
}

impl WebsiteExtractor {
    /// Create an extractor with the default TLD allow-list.
    pub fn new() -> Self {
        Self {
            pattern: WEBSITE.clone(),
        }
    }

    /// Create an extractor with a custom TLD allow-list.
    pub fn with_tlds<S: AsRef<str>>(tlds: &[S]) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: website_pattern(tlds)?,
        })
    }

    pub(crate) fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl Default for WebsiteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for WebsiteExtractor {
    fn kind(&self) -> FieldKind {
        FieldKind::Url
    }

    fn extract(&self, text: &str) -> Option<FieldCandidate> {
        // Only the first candidate is considered; if it does not survive
        // validation the website stays absent.
        let candidate = self.extract_all(text).into_iter().next()?;
        let normalized = normalize_website(&candidate.value)?;
        Some(candidate.with_value(normalized))
    }

    fn extract_all(&self, text: &str) -> Vec<FieldCandidate> {
        let emails: Vec<(usize, usize)> = EMAIL
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();

        self.pattern
            .find_iter(text)
            .filter(|m| {
                !emails
                    .iter()
                    .any(|&(start, end)| m.start() < end && start < m.end())
            })
            .map(|m| FieldCandidate::from_span(self.kind(), m.as_str(), m.start(), m.end()))
            .collect()
    }
}

/// Extract the first website from text, normalized.
pub fn extract_website(text: &str) -> Option<String> {
    WebsiteExtractor::new().extract(text).map(|c| c.value)
}

/// Normalize a raw website match into an absolute, lowercase URL.
///
/// Trailing punctuation is removed, `https://` is added when no scheme is
/// present and the result must parse as an http(s) URL with a host.
pub fn normalize_website(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches(|c: char| {
        c.is_whitespace() || matches!(c, ',' | ';' | '.' | ':' | '!' | '?' | ')' | ']' | '"' | '\'')
    });
    if trimmed.is_empty() {
        return None;
    }

    let lowered = trimmed.to_lowercase();
    let candidate = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        lowered
    } else {
        format!("https://{}", lowered)
    };

    let parsed = Url::parse(&candidate).ok()?;
    let has_host = parsed.host_str().is_some_and(|h| !h.is_empty());
    if !matches!(parsed.scheme(), "http" | "https") || !has_host {
        return None;
    }

    Some(candidate)
}
