//! Transliterate Cyrillic titles into ASCII slugs and keep them unique across
//! stored records.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;

pub use domain::slug::{get_value, resolve_unique};
pub use domain::transliterate::transliterate;
