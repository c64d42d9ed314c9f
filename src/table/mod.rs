//! Raw tabular data as read from the input spreadsheet.

pub mod cell;
pub mod load;

pub use cell::Cell;
pub use load::{LoadError, load_table};

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    /// True when the column holds no text at all, i.e. every cell is a
    /// number or blank. An all-blank column counts as numeric, matching how
    /// spreadsheet readers type empty float columns.
    pub fn is_numeric(&self) -> bool {
        self.cells.iter().all(|c| !matches!(c, Cell::Text(_)))
    }
}

/// Ordered named columns of equal length. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    columns: Vec<Column>,
    rows: usize,
}

impl RawTable {
    /// Build a table from header names and row-major records.
    ///
    /// Headers are stripped of surrounding whitespace; blank headers become
    /// `Unnamed: <index>`. Short rows are padded with missing cells and
    /// cells beyond the header width are dropped.
    pub fn from_rows(headers: Vec<String>, records: Vec<Vec<Cell>>) -> Self {
        let rows = records.len();
        let mut columns: Vec<Column> = headers
            .into_iter()
            .enumerate()
            .map(|(idx, h)| {
                let name = h.trim();
                let name = if name.is_empty() {
                    format!("Unnamed: {}", idx)
                } else {
                    name.to_string()
                };
                Column {
                    name,
                    cells: Vec::with_capacity(rows),
                }
            })
            .collect();

        for record in records {
            let mut cells = record.into_iter();
            for col in columns.iter_mut() {
                col.cells.push(cells.next().unwrap_or(Cell::Missing));
            }
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// First column with exactly this name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn headers_are_stripped_and_named() {
        let t = RawTable::from_rows(
            vec![" UF ".into(), "".into(), "Ano".into()],
            vec![vec![Cell::Text("SP".into())]],
        );
        assert_eq!(t.column_names(), vec!["UF", "Unnamed: 1", "Ano"]);
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.column("Ano").unwrap().cells, vec![Cell::Missing]);
    }

    #[test]
    fn numeric_column_detection() {
        let t = RawTable::from_rows(
            vec!["Total".into(), "Nome".into()],
            vec![
                vec![Cell::Number(3.0), Cell::Text("a".into())],
                vec![Cell::Missing, Cell::Number(1.0)],
            ],
        );
        assert!(t.column("Total").unwrap().is_numeric());
        assert!(!t.column("Nome").unwrap().is_numeric());
    }
}
