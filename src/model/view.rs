//! Filtered views and the aggregates the panel shows.
//!
//! A view never copies or mutates the normalized table; it only holds the
//! indices of the rows that passed the filter.

use crate::Result;
use crate::model::normalize::NormalizedTable;
use crate::table::Cell;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Option meaning "no filter" in the state/year selectors.
pub const ALL_OPTION: &str = "Todos";

/// Equality filter on the rendered UF and year values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub uf: Option<String>,
    pub year: Option<String>,
}

impl Filter {
    /// Blank values and the "Todos" option both mean unfiltered.
    pub fn new(uf: Option<String>, year: Option<String>) -> Self {
        let keep = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty() && s != ALL_OPTION)
        };
        Self {
            uf: keep(uf),
            year: keep(year),
        }
    }

    fn matches(&self, table: &NormalizedTable, idx: usize) -> bool {
        let uf_ok = self.uf.as_ref().is_none_or(|uf| table.uf[idx] == *uf);
        let year_ok = self
            .year
            .as_ref()
            .is_none_or(|y| !table.year[idx].is_missing() && table.year[idx].to_string() == *y);
        uf_ok && year_ok
    }
}

#[derive(Debug, Clone)]
pub struct TableView<'a> {
    table: &'a NormalizedTable,
    rows: Vec<usize>,
}

impl<'a> TableView<'a> {
    pub fn filtered(table: &'a NormalizedTable, filter: &Filter) -> Self {
        let rows = (0..table.row_count())
            .filter(|&idx| filter.matches(table, idx))
            .collect();
        Self { table, rows }
    }

    pub fn table(&self) -> &'a NormalizedTable {
        self.table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn total_population(&self) -> f64 {
        self.rows.iter().map(|&i| self.table.population[i]).sum()
    }

    /// Distinct facility names in the view; "N/D" counts as one name.
    pub fn distinct_facilities(&self) -> usize {
        self.rows
            .iter()
            .map(|&i| self.table.facility[i].as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Population summed per UF, largest first.
    pub fn population_by_uf(&self) -> Vec<(String, f64)> {
        let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
        for &i in &self.rows {
            *sums.entry(self.table.uf[i].as_str()).or_default() += self.table.population[i];
        }
        let mut out: Vec<(String, f64)> = sums
            .into_iter()
            .map(|(uf, pop)| (uf.to_string(), pop))
            .collect();
        out.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        out
    }

    pub fn regime_counts(&self) -> Vec<(String, usize)> {
        value_counts(self.rows.iter().map(|&i| self.table.regime[i].as_str()))
    }

    pub fn sex_counts(&self) -> Vec<(String, usize)> {
        value_counts(self.rows.iter().map(|&i| self.table.sex[i].as_str()))
    }
}

/// Occurrences per value, most frequent first, ties by value.
fn value_counts<'v>(values: impl Iterator<Item = &'v str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(v, n)| (v.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// "Todos" followed by the sorted distinct UF values.
pub fn uf_options(table: &NormalizedTable) -> Vec<String> {
    let distinct: BTreeSet<&str> = table.uf.iter().map(String::as_str).collect();
    std::iter::once(ALL_OPTION.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}

/// "Todos" followed by the sorted distinct non-missing years, as text.
pub fn year_options(table: &NormalizedTable) -> Vec<String> {
    let distinct: BTreeSet<String> = table
        .year
        .iter()
        .filter(|c| !c.is_missing())
        .map(Cell::to_string)
        .collect();
    std::iter::once(ALL_OPTION.to_string())
        .chain(distinct)
        .collect()
}

/// Latest integral year over the whole table. Missing and unparseable year
/// cells are skipped; None when no year is usable.
pub fn last_year(table: &NormalizedTable) -> Result<Option<i64>> {
    // Accept "2023" and spreadsheet-float renderings such as "2023.0".
    let re = Regex::new(r"^\s*(-?\d+)(?:\.0*)?\s*$")?;

    let latest = table
        .year
        .iter()
        .filter_map(|cell| match cell {
            Cell::Number(n) => Some(n.trunc() as i64),
            Cell::Text(s) => re
                .captures(s)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<i64>().ok()),
            Cell::Missing => None,
        })
        .max();
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize::{NOT_AVAILABLE, normalize};
    use crate::schema::ColumnMapping;
    use crate::table::RawTable;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sample() -> NormalizedTable {
        let headers = ["UF", "Ano", "População", "Regime", "Sexo", "Unidade Prisional"];
        let rows = vec![
            vec![text("SP"), Cell::Number(2022.0), Cell::Number(100.0), text("Fechado"), text("Masculino"), text("CDP I")],
            vec![text("SP"), Cell::Number(2023.0), Cell::Number(150.0), text("Fechado"), text("Feminino"), text("CDP II")],
            vec![text("RJ"), Cell::Number(2023.0), Cell::Number(300.0), text("Aberto"), text("Masculino"), text("Bangu")],
            vec![text("MG"), text("2023"), Cell::Missing, text("Semiaberto"), text("Masculino"), text("CDP I")],
        ];
        let raw = RawTable::from_rows(headers.iter().map(|h| h.to_string()).collect(), rows);
        let mapping = ColumnMapping::build(&raw.column_names());
        normalize(raw, &mapping)
    }

    #[test]
    fn filter_treats_todos_as_unfiltered() {
        assert_eq!(
            Filter::new(Some("Todos".into()), Some(" ".into())),
            Filter::default()
        );
        assert_eq!(
            Filter::new(Some("SP".into()), None).uf.as_deref(),
            Some("SP")
        );
    }

    #[test]
    fn filters_by_uf_and_year() {
        let t = sample();
        let all = TableView::filtered(&t, &Filter::default());
        assert_eq!(all.len(), 4);

        let sp = TableView::filtered(&t, &Filter::new(Some("SP".into()), None));
        assert_eq!(sp.rows(), &[0, 1]);

        // Numeric and text years render alike.
        let y2023 = TableView::filtered(&t, &Filter::new(None, Some("2023".into())));
        assert_eq!(y2023.rows(), &[1, 2, 3]);

        let both = TableView::filtered(&t, &Filter::new(Some("SP".into()), Some("2023".into())));
        assert_eq!(both.rows(), &[1]);

        let none = TableView::filtered(&t, &Filter::new(Some("AC".into()), None));
        assert!(none.is_empty());
        assert_eq!(none.total_population(), 0.0);
        assert!(none.population_by_uf().is_empty());
    }

    #[test]
    fn summary_aggregates() {
        let t = sample();
        let all = TableView::filtered(&t, &Filter::default());
        assert_eq!(all.total_population(), 550.0);
        assert_eq!(all.distinct_facilities(), 3);
    }

    #[test]
    fn chart_series() {
        let t = sample();
        let all = TableView::filtered(&t, &Filter::default());
        assert_eq!(
            all.population_by_uf(),
            vec![
                ("RJ".to_string(), 300.0),
                ("SP".to_string(), 250.0),
                ("MG".to_string(), 0.0)
            ]
        );
        assert_eq!(
            all.regime_counts(),
            vec![
                ("Fechado".to_string(), 2),
                ("Aberto".to_string(), 1),
                ("Semiaberto".to_string(), 1)
            ]
        );
        assert_eq!(
            all.sex_counts(),
            vec![("Masculino".to_string(), 3), ("Feminino".to_string(), 1)]
        );
    }

    #[test]
    fn options_are_sorted_and_prefixed() {
        let t = sample();
        assert_eq!(uf_options(&t), vec!["Todos", "MG", "RJ", "SP"]);
        assert_eq!(year_options(&t), vec!["Todos", "2022", "2023"]);
    }

    #[test]
    fn last_year_spans_numbers_and_text() {
        let t = sample();
        assert_eq!(last_year(&t).unwrap(), Some(2023));

        let raw = RawTable::from_rows(
            vec!["Ano".into()],
            vec![vec![text("2024.0")], vec![text("desconhecido")], vec![Cell::Number(2019.0)]],
        );
        let mapping = ColumnMapping::build(&raw.column_names());
        assert_eq!(last_year(&normalize(raw, &mapping)).unwrap(), Some(2024));
    }

    #[test]
    fn unmapped_year_is_never_a_last_year() {
        let raw = RawTable::from_rows(
            vec!["UF".into(), "Total".into()],
            vec![vec![text("SP"), Cell::Number(9999.0)]],
        );
        let mapping = ColumnMapping::build(&raw.column_names());
        let t = normalize(raw, &mapping);

        assert_eq!(last_year(&t).unwrap(), None);
        assert_eq!(year_options(&t), vec![ALL_OPTION]);
        assert_eq!(uf_options(&t), vec![ALL_OPTION, "SP"]);
        assert_eq!(t.regime, vec![NOT_AVAILABLE]);
    }
}
