// src/table.rs

use indexmap::IndexSet;

use crate::types::{Record, Scalar};

/// Rectangular view of one item's records.
#[derive(Debug, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    /// Same width as `columns`. `None` where the record lacks the field
    /// or holds `null`.
    pub rows: Vec<Vec<Option<Scalar>>>,
}

impl Table {
    /// Columns are the union of keys across `records`, in the order each
    /// key is first seen.
    pub fn from_records(records: &[Record]) -> Self {
        let columns: IndexSet<&str> = records.iter().flat_map(Record::fields).collect();

        let rows = records
            .iter()
            .map(|rec| {
                columns
                    .iter()
                    .map(|col| rec.get(col).cloned())
                    .collect::<Vec<_>>()
            })
            .collect();

        Table {
            columns: columns.into_iter().map(str::to_string).collect(),
            rows,
        }
    }

    /// No columns and no rows. Records without any fields still count
    /// as rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}
