use serde::{Deserialize, Serialize};

/// Materialized result table: raw header names plus row-major text fields (`None` = null).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { header, rows }
    }

    /// Convenience for literal fixtures: every field is non-null.
    pub fn from_strings<S: AsRef<str>>(header: &[S], rows: &[Vec<S>]) -> Self {
        Self {
            header: header.iter().map(|h| h.as_ref().to_owned()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|f| Some(f.as_ref().to_owned())).collect())
                .collect(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn field(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }
}

/// Finite values parsed from one column, in row order. Rows that do not parse are dropped, never substituted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<f64>,
    pub dropped: usize,
}

impl NumericColumn {
    pub fn extract(table: &Table, index: usize) -> Self {
        let name = table.header.get(index).cloned().unwrap_or_default();
        let mut values = Vec::with_capacity(table.rows.len());
        let mut dropped = 0;
        for row in &table.rows {
            match row.get(index).and_then(|f| f.as_deref()).and_then(parse_numeric) {
                Some(v) => values.push(v),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::debug!(column = %name, dropped, kept = values.len(), "dropped non-numeric rows");
        }
        Self { name, values, dropped }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse a text field as a finite number; NaN and infinities count as invalid.
pub fn parse_numeric(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn parses_plain_numbers() { assert_eq!(parse_numeric(" 4.5 "), Some(4.5)); assert_eq!(parse_numeric("-1e3"), Some(-1000.0)); }
    #[test] fn rejects_garbage() { assert_eq!(parse_numeric("abc"), None); assert_eq!(parse_numeric(""), None); assert_eq!(parse_numeric("12abc"), None); }
    #[test] fn rejects_non_finite() { assert_eq!(parse_numeric("NaN"), None); assert_eq!(parse_numeric("inf"), None); }

    #[test]
    fn extract_drops_invalid_rows() {
        let mut t = Table::from_strings(&["a", "b"], &[vec!["1", "x"], vec!["oops", "2"], vec!["3", "4"]]);
        t.rows.push(vec![None, Some("5".into())]);
        t.rows.push(vec![]); // short row
        let a = NumericColumn::extract(&t, 0);
        assert_eq!(a.values, vec![1.0, 3.0]);
        assert_eq!(a.dropped, 3);
        let b = NumericColumn::extract(&t, 1);
        assert_eq!(b.values, vec![2.0, 4.0, 5.0]);
        assert_eq!(b.name, "b");
    }

    #[test]
    fn table_lookups() {
        let t = Table::from_strings(&["x__cm", "y"], &[vec!["1", "2"]]);
        assert_eq!(t.column_index("y"), Some(1));
        assert_eq!(t.column_index("z"), None);
        assert_eq!(t.field(0, 0), Some("1"));
        assert_eq!(t.field(3, 0), None);
        assert_eq!((t.row_count(), t.column_count()), (1, 2));
    }
}
