//! Contact fields of a capture record and the fill-empty merge policy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::card::{ExtractedCard, FieldKind};

/// Point-of-contact fields of a capture record.
///
/// Serialized with the capture record's field names (`pocName`, `pocCompany`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PocDetails {
    #[serde(rename = "pocName", alias = "name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "pocCompany", alias = "company", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(rename = "pocCity", alias = "city", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(rename = "pocPhone", alias = "phone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "pocEmail", alias = "email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(rename = "pocLink", alias = "website", skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Outcome of merging an extracted card into a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Fields that were empty and have been filled.
    pub filled: Vec<FieldKind>,
    /// Fields the card had but the record already held a value for.
    pub kept: Vec<FieldKind>,
}

impl MergeReport {
    pub fn filled_count(&self) -> usize {
        self.filled.len()
    }
}

impl PocDetails {
    fn slot_mut(&mut self, kind: FieldKind) -> &mut Option<String> {
        match kind {
            FieldKind::Name => &mut self.name,
            FieldKind::Company => &mut self.company,
            FieldKind::City => &mut self.city,
            FieldKind::Phone => &mut self.phone,
            FieldKind::Email => &mut self.email,
            FieldKind::Url => &mut self.link,
        }
    }

    /// Value of a field, treating blank strings as empty.
    pub fn get(&self, kind: FieldKind) -> Option<&str> {
        let value = match kind {
            FieldKind::Name => &self.name,
            FieldKind::Company => &self.company,
            FieldKind::City => &self.city,
            FieldKind::Phone => &self.phone,
            FieldKind::Email => &self.email,
            FieldKind::Url => &self.link,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Fill empty fields from `card`.
    ///
    /// A field is only written when the record has no value (or a blank one) and
    /// the card has one. Existing values are never replaced and absent card
    /// fields never clear anything.
    pub fn fill_empty(&mut self, card: &ExtractedCard) -> MergeReport {
        let mut report = MergeReport::default();

        for kind in FieldKind::ALL {
            let Some(value) = card.get(kind) else {
                continue;
            };

            if self.get(kind).is_some() {
                report.kept.push(kind);
                continue;
            }

            *self.slot_mut(kind) = Some(value.to_string());
            report.filled.push(kind);
        }

        debug!(
            "Merged card into record: {} filled, {} kept",
            report.filled.len(),
            report.kept.len()
        );

        report
    }
}
