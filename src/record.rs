//! Columns and records of a catalog.

use crate::text::{textify, Cell, CellInput, Text};
use std::fmt;
use thiserror::Error;

/// Identity of a column. Display text is not identity: two columns can share a
/// heading label and still be distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey(String);

impl ColumnKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// A table column: its key and the heading rendered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: ColumnKey,
    pub heading: Text,
}

impl Column {
    pub fn new(key: impl Into<ColumnKey>, heading: Text) -> Self {
        Self {
            key: key.into(),
            heading,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("duplicate column key '{0}'")]
    DuplicateColumn(ColumnKey),

    #[error("unknown column '{0}'")]
    UnknownColumn(ColumnKey),

    #[error("column '{0}' declared more than once in a record")]
    RepeatedCell(ColumnKey),
}

/// The shared, ordered column list every record is laid out against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Columns(Vec<Column>);

impl Columns {
    pub fn new(columns: Vec<Column>) -> Result<Self, RecordError> {
        for (idx, column) in columns.iter().enumerate() {
            if columns[..idx].iter().any(|c| c.key == column.key) {
                return Err(RecordError::DuplicateColumn(column.key.clone()));
            }
        }
        Ok(Self(columns))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Column> {
        self.0.first()
    }

    pub fn position(&self, key: &ColumnKey) -> Option<usize> {
        self.0.iter().position(|c| &c.key == key)
    }

    pub fn headings(&self) -> impl Iterator<Item = &Text> {
        self.0.iter().map(|c| &c.heading)
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One catalog row. Holds a normalized cell for every column, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    cells: Vec<(ColumnKey, Cell)>,
}

impl Record {
    /// Lay out keyword-style cells against `columns`.
    ///
    /// The order of `entries` is irrelevant; missing columns become empty cells.
    pub fn new<K, V>(
        columns: &Columns,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, RecordError>
    where
        K: Into<ColumnKey>,
        V: Into<CellInput>,
    {
        let mut slots: Vec<Option<Cell>> = vec![None; columns.len()];

        for (key, value) in entries {
            let key = key.into();
            let idx = columns
                .position(&key)
                .ok_or_else(|| RecordError::UnknownColumn(key.clone()))?;
            if slots[idx].is_some() {
                return Err(RecordError::RepeatedCell(key));
            }
            slots[idx] = Some(textify(value));
        }

        let cells = columns
            .iter()
            .zip(slots)
            .map(|(column, cell)| (column.key.clone(), cell.unwrap_or_default()))
            .collect();

        Ok(Self { cells })
    }

    /// The cell stored under `key`; empty for keys this record was not laid out with.
    pub fn get(&self, key: &ColumnKey) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map_or(EMPTY, |(_, cell)| cell)
    }

    /// Cells in column-declaration order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().map(|(_, cell)| cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Columns {
        Columns::new(vec![
            Column::new("algorithm", Text::plain("Algorithm")),
            Column::new("features", Text::plain("NF").with_details("Node features")),
            Column::new("nc", Text::index_link("NC", "node-classification")),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Columns::new(vec![
            Column::new("a", Text::plain("A")),
            Column::new("a", Text::plain("B")),
        ]);
        assert_eq!(result, Err(RecordError::DuplicateColumn("a".into())));
    }

    #[test]
    fn test_same_label_distinct_columns() {
        let columns = Columns::new(vec![
            Column::new("lp", Text::plain("yes")),
            Column::new("nc", Text::plain("yes")),
        ])
        .unwrap();
        let record = Record::new(&columns, [("nc", "x")]).unwrap();
        assert!(record.get(&"lp".into()).is_empty());
        assert_eq!(record.get(&"nc".into()).texts()[0].text(), "x");
    }

    #[test]
    fn test_record_cells_follow_column_order() {
        let columns = columns();
        let record = Record::new(
            &columns,
            [
                ("nc", CellInput::from(true)),
                ("algorithm", CellInput::from("GCN")),
            ],
        )
        .unwrap();

        let labels: Vec<_> = record
            .cells()
            .map(|c| c.texts().first().map(|t| t.text().to_string()))
            .collect();
        assert_eq!(
            labels,
            [Some("GCN".to_string()), None, Some("yes".to_string())]
        );
    }

    #[test]
    fn test_unknown_column_rejected() {
        let result = Record::new(&columns(), [("bogus", true)]);
        assert_eq!(result, Err(RecordError::UnknownColumn("bogus".into())));
    }

    #[test]
    fn test_repeated_cell_rejected() {
        let result = Record::new(&columns(), [("nc", true), ("nc", false)]);
        assert_eq!(result, Err(RecordError::RepeatedCell("nc".into())));
    }
}
