//! Data models for extracted cards, capture contact fields and configuration.

pub mod capture;
pub mod card;
pub mod config;
