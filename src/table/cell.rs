use std::fmt;

/// A single spreadsheet value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    /// Classify a raw text cell the way a CSV reader would: blank is missing,
    /// anything that parses as a float is a number.
    pub fn from_text(raw: &str) -> Self {
        let v = raw.trim();
        if v.is_empty() {
            return Cell::Missing;
        }
        match v.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(v.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric coercion; text that does not parse and blanks yield None.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Cell::Missing => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            // Spreadsheet integers arrive as floats; 2023.0 renders as 2023.
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Missing => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_text_cells() {
        assert_eq!(Cell::from_text("  "), Cell::Missing);
        assert_eq!(Cell::from_text(" 42 "), Cell::Number(42.0));
        assert_eq!(Cell::from_text("SP"), Cell::Text("SP".to_string()));
        assert_eq!(Cell::from_text("NaN"), Cell::Text("NaN".to_string()));
    }

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(Cell::Number(2023.0).to_string(), "2023");
        assert_eq!(Cell::Number(12.5).to_string(), "12.5");
        assert_eq!(Cell::Missing.to_string(), "");
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(Cell::Text(" 17 ".into()).to_number(), Some(17.0));
        assert_eq!(Cell::Text("dezessete".into()).to_number(), None);
        assert_eq!(Cell::Missing.to_number(), None);
    }
}
