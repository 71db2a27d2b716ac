//! FILENAME: rowtypes/src/field.rs
//! Static column/dataset metadata: the shape a report's underlying view
//! exposes, independent of any particular report spec.

use serde::{Deserialize, Serialize};

use crate::cell::CellType;

/// Describes one column a dataset makes available for projection, grouping,
/// filtering, or calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldSpec {
    pub fld_name: String,
    pub fld_type: CellType,
    pub col_name: String,
    #[serde(default)]
    pub can_group: bool,
    #[serde(default)]
    pub can_calc: bool,
    #[serde(default)]
    pub can_filter: bool,
    #[serde(default)]
    pub default_hidden: bool,
    #[serde(default)]
    pub col_type: String,
    #[serde(default)]
    pub description: String,
}

impl FieldSpec {
    pub fn new(fld_name: impl Into<String>, fld_type: CellType, col_name: impl Into<String>) -> Self {
        FieldSpec {
            fld_name: fld_name.into(),
            fld_type,
            col_name: col_name.into(),
            can_group: false,
            can_calc: false,
            can_filter: false,
            default_hidden: false,
            col_type: String::new(),
            description: String::new(),
        }
    }
}

/// A named, static set of fields backing a reportable view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatasetSpec {
    pub dataset_name: String,
    #[serde(default)]
    pub dataset_desc: String,
    pub view_name: String,
    pub fields: Vec<FieldSpec>,
}

impl DatasetSpec {
    pub fn new(dataset_name: impl Into<String>, view_name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        DatasetSpec {
            dataset_name: dataset_name.into(),
            dataset_desc: String::new(),
            view_name: view_name.into(),
            fields,
        }
    }

    /// Linear lookup by logical field name, matching the original dataset's
    /// `FieldNamed` search — datasets are small and this runs at spec-load
    /// time, not on the row hot path.
    pub fn field_named(&self, name: &str) -> Option<(usize, &FieldSpec)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.fld_name == name)
    }
}
