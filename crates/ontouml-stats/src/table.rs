//! Tabular results.
//!
//! Every analysis the engine exposes is converted to a [`Table`] before it is
//! written out. Missing and NaN cells render as `N/A`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering of a missing or not-a-number cell.
pub const NOT_AVAILABLE: &str = "N/A";

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Missing,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) if v.is_nan() => f.write_str(NOT_AVAILABLE),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Missing => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Float).unwrap_or(Cell::Missing)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Int(value as i64)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Int(value as i64)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Int(value as i64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding short rows with [`Cell::Missing`].
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        if cells.len() < self.headers.len() {
            cells.resize(self.headers.len(), Cell::Missing);
        }
        self.rows.push(cells);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// All cells of one column, by header name.
    pub fn column(&self, header: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(header)?;
        Some(self.rows.iter().filter_map(|row| row.get(idx)).collect())
    }

    /// Rows rendered as strings, `N/A` for missing cells.
    pub fn rendered_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }
}

/// Build a table from flat `(name, value)` rows, one row per key.
///
/// The header is `key_header` followed by the union of metric names in
/// first-seen order; absent values become [`Cell::Missing`].
pub fn union_table<'a, I>(key_header: &str, rows: I) -> Table
where
    I: IntoIterator<Item = (String, &'a [(String, f64)])>,
{
    let rows: Vec<(String, &[(String, f64)])> = rows.into_iter().collect();

    let mut metric_names: Vec<&str> = Vec::new();
    for (_, entries) in &rows {
        for (name, _) in entries.iter() {
            if !metric_names.contains(&name.as_str()) {
                metric_names.push(name);
            }
        }
    }

    let mut headers = vec![key_header.to_string()];
    headers.extend(metric_names.iter().map(|s| s.to_string()));
    let mut table = Table::new(headers);

    for (key, entries) in &rows {
        let mut cells = vec![Cell::from(key.as_str())];
        for name in &metric_names {
            let value = entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v);
            cells.push(Cell::from(value));
        }
        table.push_row(cells);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nan_and_missing_render_as_not_available() {
        assert_eq!(Cell::Float(f64::NAN).to_string(), "N/A");
        assert_eq!(Cell::Missing.to_string(), "N/A");
        assert_eq!(Cell::Float(0.5).to_string(), "0.5");
        assert_eq!(Cell::Int(13).to_string(), "13");
        assert!(Cell::Float(f64::NAN).is_missing());
        assert_eq!(Cell::Float(f64::NAN).as_f64(), None);
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut table = Table::new(["a", "b", "c"]);
        table.push_row(vec![Cell::from("x")]);

        assert_eq!(table.rendered_rows(), vec![vec!["x", "N/A", "N/A"]]);
    }

    #[test]
    fn test_union_table_keeps_first_seen_order() {
        let first = vec![("total".to_string(), 1.0), ("ratio".to_string(), 0.5)];
        let second = vec![("extra".to_string(), 2.0), ("total".to_string(), 3.0)];

        let table = union_table(
            "model",
            vec![
                ("m1".to_string(), first.as_slice()),
                ("m2".to_string(), second.as_slice()),
            ],
        );

        assert_eq!(table.headers, vec!["model", "total", "ratio", "extra"]);
        assert_eq!(
            table.rendered_rows(),
            vec![vec!["m1", "1", "0.5", "N/A"], vec!["m2", "3", "N/A", "2"]]
        );
    }

    #[test]
    fn test_column_lookup() {
        let mut table = Table::new(["Stereotype", "Frequency"]);
        table.push_row(vec![Cell::from("kind"), Cell::from(3u64)]);

        let freq = table.column("Frequency").unwrap();
        assert_eq!(freq[0].as_f64(), Some(3.0));
        assert!(table.column("Rank").is_none());
    }
}
