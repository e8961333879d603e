//! Extraction output models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of contact field found on a business card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Name,
    Company,
    City,
    Phone,
    Email,
    /// Website; stored in [`ExtractedCard::website`].
    #[serde(rename = "website")]
    Url,
}

impl FieldKind {
    /// All field kinds in output order.
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Name,
        FieldKind::Company,
        FieldKind::City,
        FieldKind::Phone,
        FieldKind::Email,
        FieldKind::Url,
    ];

    /// Field name as used in serialized cards.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::Company => "company",
            FieldKind::City => "city",
            FieldKind::Phone => "phone",
            FieldKind::Email => "email",
            FieldKind::Url => "website",
        }
    }

    /// Whether the field is assigned by the line classifier (one line per field).
    pub fn is_line_exclusive(&self) -> bool {
        matches!(self, FieldKind::Name | FieldKind::Company | FieldKind::City)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum CandidateSource {
    /// Index of the (non-empty, trimmed) line the candidate was taken from.
    Line { index: usize },
    /// Byte span in the whole raw text.
    Text { start: usize, end: usize },
}

/// A tentative field match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCandidate {
    /// Field this candidate is for.
    pub kind: FieldKind,
    /// Matched text; normalized once the candidate has been resolved.
    pub value: String,
    /// Source of the match.
    pub source: CandidateSource,
}

impl FieldCandidate {
    pub fn from_line(kind: FieldKind, value: impl Into<String>, index: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            source: CandidateSource::Line { index },
        }
    }

    pub fn from_span(kind: FieldKind, value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            source: CandidateSource::Text { start, end },
        }
    }

    /// Line index for line-classified candidates.
    pub fn line_index(&self) -> Option<usize> {
        match self.source {
            CandidateSource::Line { index } => Some(index),
            CandidateSource::Text { .. } => None,
        }
    }

    /// Replace the value, keeping kind and source.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Structured contact details extracted from one card.
///
/// `None` means "not detected" and is distinct from an empty string; callers
/// must never let an absent field overwrite an existing value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ExtractedCard {
    /// Value of a field, if detected.
    pub fn get(&self, kind: FieldKind) -> Option<&str> {
        match kind {
            FieldKind::Name => self.name.as_deref(),
            FieldKind::Company => self.company.as_deref(),
            FieldKind::City => self.city.as_deref(),
            FieldKind::Phone => self.phone.as_deref(),
            FieldKind::Email => self.email.as_deref(),
            FieldKind::Url => self.website.as_deref(),
        }
    }

    pub(crate) fn set(&mut self, kind: FieldKind, value: Option<String>) {
        let slot = match kind {
            FieldKind::Name => &mut self.name,
            FieldKind::Company => &mut self.company,
            FieldKind::City => &mut self.city,
            FieldKind::Phone => &mut self.phone,
            FieldKind::Email => &mut self.email,
            FieldKind::Url => &mut self.website,
        };
        *slot = value;
    }

    /// Detected fields in output order.
    pub fn populated_fields(&self) -> Vec<FieldKind> {
        FieldKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_some())
            .collect()
    }

    /// Number of detected fields.
    pub fn populated_count(&self) -> usize {
        FieldKind::ALL
            .iter()
            .filter(|kind| self.get(**kind).is_some())
            .count()
    }

    /// True when nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.populated_count() == 0
    }
}

/// Messaging handles and extra numbers printed on a card.
///
/// These do not count towards the populated-field total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactExtras {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wechat_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,

    /// Further valid phone numbers after the primary one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_phones: Vec<String>,

    /// Job title: the name-shaped line after the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,

    /// Long lines without contact details, joined with ", ".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ContactExtras {
    pub fn is_empty(&self) -> bool {
        self.wechat_id.is_none()
            && self.whatsapp.is_none()
            && self.alternate_phones.is_empty()
            && self.designation.is_none()
            && self.address.is_none()
    }
}

/// OCR summary stored alongside a capture record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardOcrMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl From<&ExtractedCard> for CardOcrMetadata {
    fn from(card: &ExtractedCard) -> Self {
        Self {
            company_name: card.company.clone(),
            contact_name: card.name.clone(),
            email: card.email.clone(),
            phone: card.phone.clone(),
            address: card.city.clone(),
        }
    }
}

/// What the user should be told after an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "fields")]
pub enum Feedback {
    /// Some fields were filled; the user should review them.
    Extracted(usize),
    /// Nothing usable was found; the user should fill the form manually.
    NothingDetected,
}

impl Feedback {
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            Feedback::NothingDetected
        } else {
            Feedback::Extracted(count)
        }
    }

    /// Soft warning rather than success.
    pub fn is_warning(&self) -> bool {
        matches!(self, Feedback::NothingDetected)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Extracted(1) => {
                write!(f, "Extracted 1 field! Please review and edit as needed.")
            }
            Feedback::Extracted(n) => {
                write!(f, "Extracted {} fields! Please review and edit as needed.", n)
            }
            Feedback::NothingDetected => {
                write!(f, "Could not detect card details clearly. Please fill manually.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_populated_count() {
        let card = ExtractedCard {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(card.populated_count(), 2);
        assert_eq!(card.populated_fields(), vec![FieldKind::Name, FieldKind::Email]);
        assert!(ExtractedCard::default().is_empty());
    }

    #[test]
    fn test_absent_fields_not_serialized() {
        let card = ExtractedCard {
            website: Some("https://example.com".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, r#"{"website":"https://example.com"}"#);
    }

    #[test]
    fn test_metadata_from_card() {
        let card = ExtractedCard {
            name: Some("Li Wei".to_string()),
            company: Some("Acme Group".to_string()),
            city: Some("Shenzhen".to_string()),
            ..Default::default()
        };
        let meta = CardOcrMetadata::from(&card);
        assert_eq!(meta.contact_name.as_deref(), Some("Li Wei"));
        assert_eq!(meta.address.as_deref(), Some("Shenzhen"));

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["companyName"], "Acme Group");
    }

    #[test]
    fn test_feedback_messages() {
        assert_eq!(
            Feedback::from_count(0).to_string(),
            "Could not detect card details clearly. Please fill manually."
        );
        assert_eq!(
            Feedback::from_count(1).to_string(),
            "Extracted 1 field! Please review and edit as needed."
        );
        assert_eq!(
            Feedback::from_count(4).to_string(),
            "Extracted 4 fields! Please review and edit as needed."
        );
        assert!(Feedback::from_count(0).is_warning());
    }
}
