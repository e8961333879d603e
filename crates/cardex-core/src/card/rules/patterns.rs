//! Common regex patterns for business-card extraction.

use lazy_static::lazy_static;
use regex::Regex;

use super::keywords::{
    KeywordSet, DEFAULT_COMPANY_KEYWORDS, DEFAULT_LOCATION_KEYWORDS, DEFAULT_WEBSITE_TLDS,
};
use super::website::website_pattern;

lazy_static! {
    // Loose email shape; the domain-dot rule is applied afterwards
    pub static ref EMAIL: Regex = Regex::new(
        r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*"
    ).unwrap();

    // Dense mainland mobile numbers first, then generic digit groups.
    // Separators never include line breaks. The generic form needs eight digits.
    pub static ref PHONE: Regex = Regex::new(
        r"(?:\+?86[\-. ]?)?1[3-9][0-9]{9}|\+?\(?[0-9]{1,4}\)?[\-. ]?\(?[0-9]{1,4}\)?[\-. ]?[0-9]{3,4}[\-. ]?[0-9]{3,4}"
    ).unwrap();

    pub static ref DIGITS_ONLY: Regex = Regex::new(r"^[0-9]+$").unwrap();

    // Capitalized word, used for the place-name fallback
    pub static ref CAPITALIZED_WORD: Regex = Regex::new(r"[A-Z][a-z]+").unwrap();

    // Messaging handles
    pub static ref WECHAT: Regex = Regex::new(
        r"(?i)(?:wechat|weixin|微信)[:：\s]*([A-Za-z][A-Za-z0-9_\-]{5,19})"
    ).unwrap();

    pub static ref WHATSAPP: Regex = Regex::new(
        r"(?i)\b(?:whatsapp|wa)\b[:： \t]*(\+?[0-9][0-9 \-]*[0-9])"
    ).unwrap();

    // Defaults for the configurable patterns
    pub static ref WEBSITE: Regex = website_pattern(DEFAULT_WEBSITE_TLDS).unwrap();

    pub static ref COMPANY_KEYWORDS: KeywordSet =
        KeywordSet::new(DEFAULT_COMPANY_KEYWORDS).unwrap();

    pub static ref LOCATION_KEYWORDS: KeywordSet =
        KeywordSet::new(DEFAULT_LOCATION_KEYWORDS).unwrap();
}
