//! Records and the output table
//!
//! A [`Record`] is one row of extracted values. Records only exist inside an
//! [`OutputTable`], which owns the column names and guarantees that every row
//! carries exactly one value per column, in column order.

use crate::domain::errors::RelayError;
use crate::domain::Result;

/// One extracted row
///
/// Values are positional; their meaning comes from the owning table's columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    /// Creates a record from values in column order
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Values in column order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value at a column position
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Header plus rows, ready for serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl OutputTable {
    /// Creates an empty table with a fixed column list
    ///
    /// # Errors
    ///
    /// Returns an error if the column list is empty or contains duplicates.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(RelayError::Configuration(
                "output table needs at least one column".to_string(),
            ));
        }
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(RelayError::Configuration(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }
        Ok(Self {
            columns,
            records: Vec::new(),
        })
    }

    /// Appends a record
    ///
    /// # Errors
    ///
    /// Returns an error if the record's width doesn't match the column count.
    pub fn push(&mut self, record: Record) -> Result<()> {
        if record.len() != self.columns.len() {
            return Err(RelayError::Other(format!(
                "record has {} values but the table has {} columns",
                record.len(),
                self.columns.len()
            )));
        }
        self.records.push(record);
        Ok(())
    }

    /// Column names in output order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in document order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of data rows (the header is not counted)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of a named column in a given row
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.records.get(row)?.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_push_and_lookup() {
        let mut table = OutputTable::new(columns(&["id", "amount"])).unwrap();
        table
            .push(Record::new(vec!["1".to_string(), "10,50".to_string()]))
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, "amount"), Some("10,50"));
        assert_eq!(table.value(0, "missing"), None);
        assert_eq!(table.value(1, "id"), None);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let mut table = OutputTable::new(columns(&["id", "amount"])).unwrap();
        let result = table.push(Record::new(vec!["1".to_string()]));
        assert!(result.is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_and_duplicate_columns_rejected() {
        assert!(OutputTable::new(vec![]).is_err());
        assert!(OutputTable::new(columns(&["id", "id"])).is_err());
    }
}
