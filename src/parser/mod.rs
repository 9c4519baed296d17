// src/parser/mod.rs
pub mod blocks;
pub mod document;
pub mod enclosures;
pub mod fingerprint;
pub mod models;
pub mod naming;
pub mod physical;

// Re-export the parse entry points and the record shape consumed by the
// renderers.
pub use document::{parse_document, parse_kara_document, parse_kara_section};
pub use models::{EnclosureRow, Group, ParsedDocument, RowSchema, SourceRecord};
