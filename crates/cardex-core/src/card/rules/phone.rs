//! Phone number extraction.
//!
//! Values keep the separators printed on the card; only surrounding whitespace
//! is trimmed. A candidate is accepted when it holds between
//! [`MIN_PHONE_DIGITS`] and [`MAX_PHONE_DIGITS`] digits.

use super::patterns::PHONE;
use super::FieldExtractor;
use crate::models::card::{FieldCandidate, FieldKind};

pub const MIN_PHONE_DIGITS: usize = 7;
pub const MAX_PHONE_DIGITS: usize = 15;

/// Phone field extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneExtractor;

impl PhoneExtractor {
    pub fn new() -> Self {
        Self
    }

    /// All valid, distinct phone values in order of appearance.
    pub fn extract_valid(&self, text: &str) -> Vec<String> {
        let mut phones: Vec<String> = Vec::new();
        for candidate in self.extract_all(text) {
            let value = candidate.value.trim();
            if is_valid_phone(value) && !phones.iter().any(|p| p == value) {
                phones.push(value.to_string());
            }
        }
        phones
    }
}

impl FieldExtractor for PhoneExtractor {
    fn kind(&self) -> FieldKind {
        FieldKind::Phone
    }

    fn extract(&self, text: &str) -> Option<FieldCandidate> {
        self.extract_all(text)
            .into_iter()
            .find(|c| is_valid_phone(&c.value))
            .map(|c| {
                let trimmed = c.value.trim().to_string();
                c.with_value(trimmed)
            })
    }

    fn extract_all(&self, text: &str) -> Vec<FieldCandidate> {
        PHONE
            .find_iter(text)
            .map(|m| FieldCandidate::from_span(self.kind(), m.as_str(), m.start(), m.end()))
            .collect()
    }
}

/// Extract the first valid phone number from text.
pub fn extract_phone(text: &str) -> Option<String> {
    PhoneExtractor::new().extract(text).map(|c| c.value)
}

/// Number of ASCII digits in a value.
pub fn count_digits(value: &str) -> usize {
    value.chars().filter(|c| c.is_ascii_digit()).count()
}

/// True if the digit count is within the accepted range.
pub fn is_valid_phone(value: &str) -> bool {
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&count_digits(value))
}
