//! FILENAME: rowtypes/src/row.rs
//! An ordered cell sequence matching a report's materialised column layout
//! (`extra_columns ++ columns`, see the `report-engine` crate).

use crate::cell::Cell;
use crate::error::RowError;
use crate::field::FieldSpec;

/// A single materialised row: one `Cell` per column, in layout order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(pub Vec<Cell>);

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Row(cells)
    }

    /// Allocates a zero-valued row matching a resolved column layout,
    /// failing if a named column can't be found among `layout` — mirroring
    /// the original system's one-time "unable to scan column" check at row
    /// construction, rather than failing silently on every access.
    pub fn from_layout(layout: &[FieldSpec], wanted: &[&str]) -> Result<Row, RowError> {
        let mut cells = Vec::with_capacity(wanted.len());
        for name in wanted {
            let field = layout
                .iter()
                .find(|f| f.fld_name == *name)
                .ok_or_else(|| RowError::UnknownColumn(name.to_string()))?;
            cells.push(Cell::new(field.fld_type));
        }
        Ok(Row(cells))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the text form of the cell at `fld_idx`, or `""` for a
    /// negative index (the grand-total level has no backing column).
    pub fn value_at_index(&self, fld_idx: i32) -> String {
        if fld_idx < 0 {
            return String::new();
        }
        self.0
            .get(fld_idx as usize)
            .map(|c| c.to_display_string())
            .unwrap_or_default()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(Cell::to_display_string).collect()
    }

    /// Adds `other`'s cells into `self` position-wise. Returns `true` only if
    /// every accumulation attempt that could have succeeded did — i.e. no
    /// numeric cell silently failed to add. Non-numeric cells are skipped
    /// without affecting the result.
    pub fn accumulate(&mut self, other: &Row) -> bool {
        let mut all_ok = true;
        for (mine, theirs) in self.0.iter_mut().zip(other.0.iter()) {
            if matches!(
                mine.typ,
                crate::cell::CellType::Int | crate::cell::CellType::Float | crate::cell::CellType::Currency
            ) {
                if !mine.accumulate(theirs) {
                    all_ok = false;
                }
            }
        }
        all_ok
    }

    pub fn reset_all(&mut self) {
        for c in self.0.iter_mut() {
            c.reset_all();
        }
    }

    pub fn reset_numerics(&mut self) {
        for c in self.0.iter_mut() {
            c.reset_numerics();
        }
    }
}
