//! Keyword sets for company and location lines.

use regex::{Regex, RegexBuilder};

/// Company indicator tokens.
pub const DEFAULT_COMPANY_KEYWORDS: &[&str] = &[
    "ltd",
    "limited",
    "inc",
    "corp",
    "corporation",
    "company",
    "co.",
    "group",
    "enterprise",
    "trading",
    "international",
    "holdings",
    "tech",
    "technology",
    "solutions",
    "services",
    "industries",
];

/// Location indicator tokens (district, city, province, state).
pub const DEFAULT_LOCATION_KEYWORDS: &[&str] = &[
    "city", "province", "state", "district", "county", "区", "市", "省", "州",
];

/// Top-level domains accepted for bare `name.tld` websites.
pub const DEFAULT_WEBSITE_TLDS: &[&str] = &[
    "com", "net", "org", "io", "co", "cn", "edu", "gov", "biz", "info", "ai",
];

/// A case-insensitive set of tokens compiled into one pattern.
///
/// Keyword edges made of ASCII letters or digits must sit on a word boundary,
/// so `inc` does not match `Lincoln` and `co.` still matches at the end of a
/// line. Other edges (CJK characters, punctuation) match anywhere.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
    pattern: Option<Regex>,
}

impl KeywordSet {
    /// Compile a keyword set. Blank entries are ignored; an empty set never matches.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        let mut keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        // Longest first so alternation prefers the most specific token
        keywords.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        keywords.dedup();

        let pattern = if keywords.is_empty() {
            None
        } else {
            let alternation = keywords
                .iter()
                .map(|k| keyword_pattern(k))
                .collect::<Vec<_>>()
                .join("|");
            Some(RegexBuilder::new(&alternation).case_insensitive(true).build()?)
        };

        Ok(Self { keywords, pattern })
    }

    /// Keywords in match-priority order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether the text contains any keyword.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(text))
    }

    /// Remove every keyword occurrence and trim the remainder.
    pub fn strip(&self, text: &str) -> String {
        match &self.pattern {
            Some(p) => p.replace_all(text, "").trim().to_string(),
            None => text.trim().to_string(),
        }
    }
}

fn keyword_pattern(keyword: &str) -> String {
    let escaped = regex::escape(keyword);
    let leading = keyword.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    let trailing = keyword.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());

    format!(
        "{}{}{}",
        if leading { r"\b" } else { "" },
        escaped,
        if trailing { r"\b" } else { "" }
    )
}
