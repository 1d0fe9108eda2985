use crate::types::Cell;

/// Represents a complete row destined for a warehouse table.
///
/// [`Row`] contains a vector of [`Cell`] values ordered to match the destination
/// table's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Column values in table column order.
    values: Vec<Cell>,
}

impl Row {
    /// Creates a new row with the given cell values.
    ///
    /// The values must be ordered to match the target table's column schema.
    pub fn new(values: Vec<Cell>) -> Self {
        Self { values }
    }

    /// Returns the row values in table column order.
    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    /// Consumes the row and returns its values in table column order.
    pub fn into_values(self) -> Vec<Cell> {
        self.values
    }

    /// Returns the text rendering of the cells at the given column indices.
    ///
    /// Used to project a row onto its primary-key columns for staged-key matching.
    pub fn key_text(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .map(|&index| self.values[index].to_key_text())
            .collect()
    }
}
