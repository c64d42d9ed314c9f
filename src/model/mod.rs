//! Panel model: normalized dataset plus the report the renderer consumes.

pub mod normalize;
pub mod view;

use crate::Result;
use crate::schema::ColumnMapping;
use crate::table::{LoadError, load_table};
use normalize::{DERIVED_COLUMNS, NOT_AVAILABLE, NormalizedTable};
use serde::Serialize;
use std::path::Path;
use tracing::warn;
use view::{Filter, TableView};

pub use normalize::normalize;

/// Everything produced by one load: the normalized table and how its
/// columns were resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub table: NormalizedTable,
    pub mapping: ColumnMapping,
}

impl Dataset {
    /// Load, resolve and normalize in one pass. Only loading can fail.
    pub fn load(path: &Path) -> std::result::Result<Self, LoadError> {
        let raw = load_table(path)?;
        let mapping = ColumnMapping::build(&raw.column_names());
        let table = normalize(raw, &mapping);
        Ok(Self { table, mapping })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MappingView {
    pub field: String,
    pub column: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FiltersView {
    pub uf_options: Vec<String>,
    pub year_options: Vec<String>,
    pub selected_uf: String,
    pub selected_year: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub rows: usize,
    pub filtered_rows: usize,
    /// Whole-number population of the filtered view, thousands separated.
    pub population: String,
    pub facilities: usize,
    /// Latest year over the whole dataset, or "N/D".
    pub last_year: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartsView {
    pub population_by_uf: Vec<SeriesPoint>,
    pub regime: Vec<SeriesPoint>,
    pub sex: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub source: String,
    pub mapping: Vec<MappingView>,
    pub filters: FiltersView,
    pub totals: TotalsView,
    pub charts: ChartsView,
    pub sample: SampleView,
}

/// Build report data for one filter selection. Performs:
/// - warn when a selected UF/year is not among the available options
/// - totals and charts over the filtered view, last year over the whole table
/// - the first `sample_rows` filtered rows, raw columns then derived ones
pub fn build_report_data(
    source: &str,
    dataset: &Dataset,
    filter: &Filter,
    sample_rows: usize,
) -> Result<ReportData> {
    let table = &dataset.table;

    let uf_options = view::uf_options(table);
    let year_options = view::year_options(table);
    if let Some(uf) = &filter.uf
        && !uf_options.contains(uf)
    {
        warn!(uf = %uf, "selected UF not present in data");
    }
    if let Some(year) = &filter.year
        && !year_options.contains(year)
    {
        warn!(year = %year, "selected year not present in data");
    }

    let filtered = TableView::filtered(table, filter);
    if filtered.is_empty() {
        warn!("no rows match the selected filters");
    }

    let last_year = view::last_year(table)?
        .map(|y| y.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let totals = TotalsView {
        rows: table.row_count(),
        filtered_rows: filtered.len(),
        population: fmt_thousands(filtered.total_population().trunc() as i64),
        facilities: filtered.distinct_facilities(),
        last_year,
    };

    let counts = |pairs: Vec<(String, usize)>| -> Vec<SeriesPoint> {
        pairs
            .into_iter()
            .map(|(label, n)| SeriesPoint {
                label,
                value: n as f64,
            })
            .collect()
    };

    let charts = ChartsView {
        population_by_uf: filtered
            .population_by_uf()
            .into_iter()
            .map(|(label, value)| SeriesPoint { label, value })
            .collect(),
        regime: counts(filtered.regime_counts()),
        sex: counts(filtered.sex_counts()),
    };

    Ok(ReportData {
        source: source.to_string(),
        mapping: dataset
            .mapping
            .entries()
            .into_iter()
            .map(|(field, column)| MappingView {
                field: field.to_string(),
                column: column.map(str::to_string),
            })
            .collect(),
        filters: FiltersView {
            uf_options,
            year_options,
            selected_uf: filter.uf.clone().unwrap_or_else(|| view::ALL_OPTION.to_string()),
            selected_year: filter
                .year
                .clone()
                .unwrap_or_else(|| view::ALL_OPTION.to_string()),
        },
        totals,
        charts,
        sample: build_sample(&filtered, sample_rows),
    })
}

fn build_sample(filtered: &TableView<'_>, limit: usize) -> SampleView {
    let table = filtered.table();
    let headers: Vec<String> = table
        .raw
        .column_names()
        .into_iter()
        .map(str::to_string)
        .chain(DERIVED_COLUMNS.iter().map(|c| c.to_string()))
        .collect();

    let rows: Vec<Vec<String>> = filtered
        .rows()
        .iter()
        .take(limit)
        .map(|&idx| {
            table
                .raw
                .columns()
                .iter()
                .map(|col| col.cells[idx].to_string())
                .chain(table.derived_row(idx))
                .collect()
        })
        .collect();

    SampleView { headers, rows }
}

/// 1234567 -> "1,234,567".
fn fmt_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
