//! Header resolution: map loosely named spreadsheet columns onto semantic fields.
//!
//! Matching is case-insensitive and runs in two phases:
//! 1) exact: candidates in priority order, first header equal to one wins;
//! 2) containment: headers in table order, first header that contains a
//!    candidate (or is contained in one) wins.
//!
//! Short candidates such as "UF" can match inside unrelated longer headers in
//! phase 2. That is a known weakness of the heuristic and is left as is.

use crate::schema::SemanticField;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Resolve a single field against the given header names.
pub fn resolve<S: AsRef<str>>(columns: &[S], field: SemanticField) -> Option<String> {
    resolve_candidates(columns, field.candidates())
}

/// Two-phase matcher over an explicit candidate list.
pub fn resolve_candidates<S: AsRef<str>>(columns: &[S], candidates: &[&str]) -> Option<String> {
    let lowered: Vec<String> = columns.iter().map(|c| c.as_ref().to_lowercase()).collect();

    for cand in candidates {
        let cand = cand.to_lowercase();
        if let Some(idx) = lowered.iter().position(|low| *low == cand) {
            return Some(columns[idx].as_ref().to_string());
        }
    }

    for (idx, low) in lowered.iter().enumerate() {
        for cand in candidates {
            let cand = cand.to_lowercase();
            if low.contains(&cand) || cand.contains(low.as_str()) {
                return Some(columns[idx].as_ref().to_string());
            }
        }
    }

    None
}

/// Resolution outcome for every semantic field. Immutable once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnMapping {
    fields: BTreeMap<SemanticField, Option<String>>,
}

impl ColumnMapping {
    /// Resolve every field and emit one event per field for operators.
    pub fn build<S: AsRef<str>>(columns: &[S]) -> Self {
        let mut fields = BTreeMap::new();
        for field in SemanticField::ALL {
            let resolved = resolve(columns, field);
            match &resolved {
                Some(col) => info!(field = %field, column = %col, "column detected"),
                None => warn!(field = %field, column = "NOT FOUND", "column not found"),
            }
            fields.insert(field, resolved);
        }
        Self { fields }
    }

    pub fn get(&self, field: SemanticField) -> Option<&str> {
        self.fields.get(&field).and_then(|c| c.as_deref())
    }

    /// (field key, column or None) in field order, for display.
    pub fn entries(&self) -> Vec<(&'static str, Option<&str>)> {
        SemanticField::ALL
            .iter()
            .map(|f| (f.key(), self.get(*f)))
            .collect()
    }
}
