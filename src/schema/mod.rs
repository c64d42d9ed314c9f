//! Schema layer: semantic fields and header resolution.
//!
//! Kept apart from loading and rendering. It owns:
//! - SemanticField (what the panel needs, and how headers are recognised)
//! - ColumnMapping (which raw header serves each field, if any)

pub mod field;
pub mod resolve;

pub use field::SemanticField;
pub use resolve::ColumnMapping;
