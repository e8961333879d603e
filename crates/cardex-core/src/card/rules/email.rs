//! Email address extraction and validation.

use super::patterns::EMAIL;
use super::FieldExtractor;
use crate::models::card::{FieldCandidate, FieldKind};

/// Email field extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailExtractor;

impl EmailExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for EmailExtractor {
    fn kind(&self) -> FieldKind {
        FieldKind::Email
    }

    fn extract(&self, text: &str) -> Option<FieldCandidate> {
        self.extract_all(text)
            .into_iter()
            .find(|c| has_dotted_domain(&c.value))
            .map(|c| {
                let normalized = c.value.to_lowercase();
                c.with_value(normalized)
            })
    }

    fn extract_all(&self, text: &str) -> Vec<FieldCandidate> {
        EMAIL
            .find_iter(text)
            .map(|m| FieldCandidate::from_span(self.kind(), m.as_str(), m.start(), m.end()))
            .collect()
    }
}

/// Extract the first valid email from text, lowercased.
pub fn extract_email(text: &str) -> Option<String> {
    EmailExtractor::new().extract(text).map(|c| c.value)
}

/// True if the address has exactly one `@` and a dot in the domain.
pub fn has_dotted_domain(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && domain.contains('.'),
        _ => false,
    }
}
