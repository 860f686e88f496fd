//! Domain layer: transliteration, slug resolution and the record value type.

pub mod entities;
pub mod error;
pub mod slug;
pub mod transliterate;
