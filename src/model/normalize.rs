//! Derive fixed, always-present columns from a raw table and its mapping.

use crate::schema::{ColumnMapping, SemanticField};
use crate::table::{Cell, Column, RawTable};

/// Sentinel for categorical values that are unavailable.
pub const NOT_AVAILABLE: &str = "N/D";

/// Names under which the derived columns are shown next to the raw ones.
pub const DERIVED_COLUMNS: [&str; 6] = [
    "UF_app",
    "Ano_app",
    "Pop_app",
    "Regime_app",
    "Sexo_app",
    "Unidade_app",
];

/// Raw table plus one derived column per semantic field.
///
/// Every derived column has exactly `raw.row_count()` entries. Only `year`
/// may hold `Cell::Missing`, which aggregations treat as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub raw: RawTable,
    pub uf: Vec<String>,
    pub year: Vec<Cell>,
    pub population: Vec<f64>,
    pub regime: Vec<String>,
    pub sex: Vec<String>,
    pub facility: Vec<String>,
}

impl NormalizedTable {
    pub fn row_count(&self) -> usize {
        self.raw.row_count()
    }

    /// Derived values of one row, rendered for display.
    pub fn derived_row(&self, idx: usize) -> [String; 6] {
        [
            self.uf[idx].clone(),
            self.year[idx].to_string(),
            Cell::Number(self.population[idx]).to_string(),
            self.regime[idx].clone(),
            self.sex[idx].clone(),
            self.facility[idx].clone(),
        ]
    }
}

/// Build the derived columns. Never fails: unresolved fields are filled with
/// sentinels, zeros or missing markers.
pub fn normalize(raw: RawTable, mapping: &ColumnMapping) -> NormalizedTable {
    let rows = raw.row_count();
    let mapped = |field: SemanticField| mapping.get(field).and_then(|name| raw.column(name));

    let uf = categorical(mapped(SemanticField::Uf), rows);

    let year = match mapped(SemanticField::Year) {
        Some(col) => col.cells.clone(),
        None => vec![Cell::Missing; rows],
    };

    // Population is the headline metric: without a resolved column, fall back
    // to the first purely numeric column before giving up with zeros.
    let population = match mapped(SemanticField::Population)
        .or_else(|| raw.columns().iter().find(|c| c.is_numeric()))
    {
        Some(col) => col
            .cells
            .iter()
            .map(|c| c.to_number().unwrap_or(0.0))
            .collect(),
        None => vec![0.0; rows],
    };

    let regime = categorical(mapped(SemanticField::Regime), rows);
    let sex = categorical(mapped(SemanticField::Sex), rows);
    let facility = categorical(mapped(SemanticField::Facility), rows);

    NormalizedTable {
        uf,
        year,
        population,
        regime,
        sex,
        facility,
        raw,
    }
}

fn categorical(column: Option<&Column>, rows: usize) -> Vec<String> {
    match column {
        Some(col) => col
            .cells
            .iter()
            .map(|c| match c {
                Cell::Missing => NOT_AVAILABLE.to_string(),
                other => other.to_string(),
            })
            .collect(),
        None => vec![NOT_AVAILABLE.to_string(); rows],
    }
}
