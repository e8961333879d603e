//! Line classifier assigning Name, Company and City roles.
//!
//! Roles are assigned in that order, each by a first-match scan over the
//! lines. A line claimed by one role is skipped by the later ones.

use regex::Regex;
use tracing::trace;

use super::keywords::KeywordSet;
use super::lines::Line;
use super::patterns::{
    CAPITALIZED_WORD, COMPANY_KEYWORDS, DIGITS_ONLY, EMAIL, LOCATION_KEYWORDS, PHONE, WEBSITE,
    WECHAT, WHATSAPP,
};
use super::website::website_pattern;
use crate::models::card::{FieldCandidate, FieldKind};
use crate::models::config::ExtractionConfig;

/// Inclusive character bounds for a name line.
pub const NAME_LENGTH: (usize, usize) = (2, 50);

/// Exclusive character bounds for a place-name shaped line.
pub const PLACE_LENGTH: (usize, usize) = (2, 40);

/// Stripped city values with this many characters or fewer are rejected.
pub const MIN_CITY_CHARS: usize = 2;

/// Address lines are longer than this many characters.
pub const ADDRESS_MIN_CHARS: usize = 15;

/// Lines chosen for each role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineRoles {
    pub name: Option<FieldCandidate>,
    pub company: Option<FieldCandidate>,
    pub city: Option<FieldCandidate>,
}

impl LineRoles {
    /// Chosen candidates in assignment order.
    pub fn into_candidates(self) -> impl Iterator<Item = FieldCandidate> {
        [self.name, self.company, self.city].into_iter().flatten()
    }
}

/// Keyword and shape based line classifier.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    company: KeywordSet,
    location: KeywordSet,
    website: Regex,
}

impl LineClassifier {
    /// Create a classifier with the default keyword lists.
    pub fn new() -> Self {
        Self {
            company: COMPANY_KEYWORDS.clone(),
            location: LOCATION_KEYWORDS.clone(),
            website: WEBSITE.clone(),
        }
    }

    /// Create a classifier from configured keyword lists.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            company: KeywordSet::new(config.company_keywords.as_slice())?,
            location: KeywordSet::new(config.location_keywords.as_slice())?,
            website: website_pattern(config.website_tlds.as_slice())?,
        })
    }

    /// Replace the pattern used to recognize website lines.
    pub fn with_website_pattern(mut self, pattern: Regex) -> Self {
        self.website = pattern;
        self
    }

    /// Assign Name, then Company, then City.
    pub fn classify(&self, lines: &[Line<'_>]) -> LineRoles {
        let name = self.find_name(lines);

        let mut claimed: Vec<usize> = name.iter().filter_map(|c| c.line_index()).collect();
        let company = self.find_company(lines, &claimed);
        claimed.extend(company.iter().filter_map(|c| c.line_index()));

        let city = self.find_city(lines, &claimed);

        LineRoles { name, company, city }
    }

    /// First line of 2-50 characters that is not contact info and not just digits.
    pub fn find_name(&self, lines: &[Line<'_>]) -> Option<FieldCandidate> {
        lines
            .iter()
            .find(|line| self.is_name_shaped(line))
            .map(|line| FieldCandidate::from_line(FieldKind::Name, line.text, line.index))
    }

    /// First unclaimed line containing a company keyword.
    pub fn find_company(&self, lines: &[Line<'_>], claimed: &[usize]) -> Option<FieldCandidate> {
        lines
            .iter()
            .filter(|line| !claimed.contains(&line.index))
            .find(|line| self.company.is_match(line.text) && !self.is_contact_line(line.text))
            .map(|line| FieldCandidate::from_line(FieldKind::Company, line.text, line.index))
    }

    /// First unclaimed line with a location keyword or a place-name shape whose
    /// keyword-stripped remainder is long enough.
    pub fn find_city(&self, lines: &[Line<'_>], claimed: &[usize]) -> Option<FieldCandidate> {
        for line in lines {
            if claimed.contains(&line.index) || self.is_contact_line(line.text) {
                continue;
            }

            if !self.location.is_match(line.text) && !is_place_shaped(line) {
                continue;
            }

            let city = self.location.strip(line.text);
            if city.chars().count() > MIN_CITY_CHARS {
                return Some(FieldCandidate::from_line(FieldKind::City, city, line.index));
            }

            trace!("Rejected city line {}: remainder too short", line.index);
        }

        None
    }

    /// Next unclaimed name-shaped line, read as the job title.
    ///
    /// Lines with a location keyword or a messaging handle are skipped.
    pub fn find_designation<'a>(&self, lines: &[Line<'a>], claimed: &[usize]) -> Option<Line<'a>> {
        lines
            .iter()
            .filter(|line| !claimed.contains(&line.index))
            .find(|line| {
                self.is_name_shaped(line)
                    && !self.location.is_match(line.text)
                    && !is_handle_line(line.text)
            })
            .copied()
    }

    /// Unclaimed long lines that hold no contact details, joined with ", ".
    pub fn find_address(&self, lines: &[Line<'_>], claimed: &[usize]) -> Option<String> {
        let parts: Vec<&str> = lines
            .iter()
            .filter(|line| {
                !claimed.contains(&line.index)
                    && line.char_len() > ADDRESS_MIN_CHARS
                    && !self.is_contact_line(line.text)
                    && !is_handle_line(line.text)
            })
            .map(|line| line.text)
            .collect();

        (!parts.is_empty()).then(|| parts.join(", "))
    }

    fn is_name_shaped(&self, line: &Line<'_>) -> bool {
        (NAME_LENGTH.0..=NAME_LENGTH.1).contains(&line.char_len())
            && !self.is_contact_line(line.text)
            && !DIGITS_ONLY.is_match(line.text)
    }

    fn is_contact_line(&self, text: &str) -> bool {
        EMAIL.is_match(text) || PHONE.is_match(text) || self.website.is_match(text)
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn is_handle_line(text: &str) -> bool {
    WECHAT.is_match(text) || WHATSAPP.is_match(text)
}

fn is_place_shaped(line: &Line<'_>) -> bool {
    let len = line.char_len();
    len > PLACE_LENGTH.0 && len < PLACE_LENGTH.1 && CAPITALIZED_WORD.is_match(line.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::rules::lines::split_lines;
    use pretty_assertions::assert_eq;

    fn values(roles: &LineRoles) -> (Option<&str>, Option<&str>, Option<&str>) {
        (
            roles.name.as_ref().map(|c| c.value.as_str()),
            roles.company.as_ref().map(|c| c.value.as_str()),
            roles.city.as_ref().map(|c| c.value.as_str()),
        )
    }

    #[test]
    fn test_classify_basic_card() {
        let lines = split_lines("John Smith\nAcme Trading Co.\nShanghai City\njohn@acme.com");
        let roles = LineClassifier::new().classify(&lines);
        assert_eq!(
            values(&roles),
            (Some("John Smith"), Some("Acme Trading Co."), Some("Shanghai"))
        );
    }

    #[test]
    fn test_name_skips_long_and_contact_lines() {
        let long = "Room 1203, Building 5, 88 Century Avenue, Pudong New Area";
        let text = format!("{}\nsales@acme.com\n12345\nMaria Garcia", long);
        let lines = split_lines(&text);
        let name = LineClassifier::new().find_name(&lines).unwrap();
        assert_eq!(name.value, "Maria Garcia");
        assert_eq!(name.line_index(), Some(3));
    }

    #[test]
    fn test_company_excludes_name_line() {
        // The only company-looking line is also the first name candidate
        let lines = split_lines("Acme Group\n+1 415 555 0100");
        let roles = LineClassifier::new().classify(&lines);
        assert_eq!(roles.name.as_ref().unwrap().value, "Acme Group");
        assert_eq!(roles.company, None);
    }

    #[test]
    fn test_city_remainder_too_short_keeps_scanning() {
        let lines = split_lines("Wang Fang\n上海市\nNanjing");
        let roles = LineClassifier::new().classify(&lines);
        assert_eq!(roles.city.as_ref().unwrap().value, "Nanjing");
    }

    #[test]
    fn test_city_from_cjk_keywords() {
        let lines = split_lines("Wang Fang\n深圳市南山区");
        let roles = LineClassifier::new().classify(&lines);
        assert_eq!(roles.city.as_ref().unwrap().value, "深圳南山");
    }

    #[test]
    fn test_city_skips_contact_lines() {
        let lines = split_lines("Anna Berg\nPh: +46 8 555 1234\nwww.berg.se");
        let roles = LineClassifier::new().classify(&lines);
        assert_eq!(roles.city, None);
    }

    #[test]
    fn test_no_city_for_lowercase_lines() {
        let lines = split_lines("Anna Berg\nsome notes here");
        assert_eq!(LineClassifier::new().classify(&lines).city, None);
    }

    #[test]
    fn test_roles_use_distinct_lines() {
        let lines = split_lines("Global Tech Solutions\nBeijing Tech Ltd\nTianjin City");
        let roles = LineClassifier::new().classify(&lines);
        assert_eq!(roles.name.as_ref().unwrap().line_index(), Some(0));
        assert_eq!(roles.company.as_ref().unwrap().line_index(), Some(1));
        assert_eq!(roles.city.as_ref().unwrap().line_index(), Some(2));
    }

    #[test]
    fn test_configured_keywords() {
        let config = ExtractionConfig {
            company_keywords: vec!["gmbh".to_string()],
            location_keywords: vec!["stadt".to_string()],
            ..Default::default()
        };
        let classifier = LineClassifier::from_config(&config).unwrap();
        let lines = split_lines("Jonas Weber\nWeber Maschinenbau GmbH\nStadt Bremen");
        let roles = classifier.classify(&lines);
        assert_eq!(
            values(&roles),
            (Some("Jonas Weber"), Some("Weber Maschinenbau GmbH"), Some("Bremen"))
        );
    }

    #[test]
    fn test_company_skips_website_lines() {
        let lines = split_lines("Ravi Kumar
www.acme-tech.com
Acme Tech Pvt Ltd");
        let roles = LineClassifier::new().classify(&lines);
        assert_eq!(roles.company.as_ref().unwrap().value, "Acme Tech Pvt Ltd");
        assert_eq!(roles.company.as_ref().unwrap().line_index(), Some(2));
    }

    #[test]
    fn test_designation_is_next_name_shaped_line() {
        let lines = split_lines("John Smith\nAcme Ltd\nShanghai City\nSales Director");
        let classifier = LineClassifier::new();
        let designation = classifier.find_designation(&lines, &[0, 1]).unwrap();
        assert_eq!(designation.text, "Sales Director");
        assert_eq!(designation.index, 3);
    }

    #[test]
    fn test_designation_skips_handles() {
        let lines = split_lines("Li Wei\nWeChat: liwei_sh88");
        assert_eq!(LineClassifier::new().find_designation(&lines, &[0]), None);
    }

    #[test]
    fn test_address_joins_long_lines() {
        let text = "Lisa Chen\nRoom 1203, 88 Century Avenue\nPudong New Area, Shanghai\nTel 021-5555-1234\nShort";
        let lines = split_lines(text);
        assert_eq!(
            LineClassifier::new().find_address(&lines, &[0]).as_deref(),
            Some("Room 1203, 88 Century Avenue, Pudong New Area, Shanghai")
        );
        assert_eq!(LineClassifier::new().find_address(&lines, &[0, 1, 2]), None);
    }
}
