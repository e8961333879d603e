//! Rule-based field extractors for business-card text.

pub mod classifier;
pub mod email;
pub mod extras;
pub mod keywords;
pub mod lines;
pub mod patterns;
pub mod phone;
pub mod website;

pub use classifier::{LineClassifier, LineRoles};
pub use email::{extract_email, has_dotted_domain, EmailExtractor};
pub use extras::extract_extras;
pub use keywords::KeywordSet;
pub use lines::{split_lines, Line};
pub use phone::{count_digits, extract_phone, is_valid_phone, PhoneExtractor};
pub use website::{extract_website, normalize_website, WebsiteExtractor};

use crate::models::card::{FieldCandidate, FieldKind};

/// Trait for whole-text field extractors.
///
/// `extract_all` returns raw pattern matches; `extract` applies the field's
/// validation and normalization and returns the single chosen value, if any.
pub trait FieldExtractor {
    /// Field this extractor produces.
    fn kind(&self) -> FieldKind;

    /// Extract the resolved field from text.
    fn extract(&self, text: &str) -> Option<FieldCandidate>;

    /// Extract all raw candidates, in order of appearance.
    fn extract_all(&self, text: &str) -> Vec<FieldCandidate>;
}
