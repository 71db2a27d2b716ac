//! FILENAME: report-engine/src/spec.rs
//! The declarative report specification: a dataset, a column projection,
//! grouping keys, and filters. `extra_columns` (grouping keys not already
//! present in `columns`) is always derived, never read from input — both
//! the file-loading path and the programmatic-construction path funnel
//! through `derive_extra_columns` so they can never disagree.

use std::path::Path;

use rowtypes::{DatasetSpec, FieldSpec};
use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use querybuilder::FilterSpec;

/// One projected column and its display/aggregation tag. Aggregation itself
/// is type-driven (every numeric cell sums) — `calc_type` is surfaced to
/// callers for display purposes only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnSpec {
    pub fld_name: String,
    #[serde(default)]
    pub calc_type: String,
}

impl ColumnSpec {
    pub fn new(fld_name: impl Into<String>) -> Self {
        ColumnSpec {
            fld_name: fld_name.into(),
            calc_type: String::new(),
        }
    }
}

/// On-disk/over-the-wire shape. Any `ExtraColumns` key present in the input
/// JSON is silently ignored by virtue of this struct not declaring that
/// field — `serde_json` drops unrecognized object keys by default.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawReportSpec {
    dataset: DatasetSpec,
    columns: Vec<ColumnSpec>,
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    filters: Vec<FilterSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSpec {
    pub dataset: DatasetSpec,
    pub columns: Vec<ColumnSpec>,
    pub extra_columns: Vec<FieldSpec>,
    pub groups: Vec<String>,
    pub filters: Vec<FilterSpec>,
}

/// The single place `extra_columns` is computed: for each group name not
/// already present among `columns`, resolve it against the dataset and
/// append it. Called from every `ReportSpec` construction path.
pub fn derive_extra_columns(
    dataset: &DatasetSpec,
    columns: &[ColumnSpec],
    groups: &[String],
) -> Result<Vec<FieldSpec>, SpecError> {
    let mut extras = Vec::new();
    for group in groups {
        if columns.iter().any(|c| &c.fld_name == group) {
            continue;
        }
        let (_, field) = dataset
            .field_named(group)
            .ok_or_else(|| SpecError::Validation(format!("group field not found in dataset: {:?}", group)))?;
        extras.push(field.clone());
    }
    Ok(extras)
}

impl ReportSpec {
    /// Constructs and validates a spec from in-memory parts (no filesystem
    /// access), for specs built programmatically or received over another
    /// transport.
    pub fn new(
        dataset: DatasetSpec,
        columns: Vec<ColumnSpec>,
        groups: Vec<String>,
        filters: Vec<FilterSpec>,
    ) -> Result<ReportSpec, SpecError> {
        let extra_columns = derive_extra_columns(&dataset, &columns, &groups)?;
        let spec = ReportSpec {
            dataset,
            columns,
            extra_columns,
            groups,
            filters,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Reads a report spec file, deserializes it, derives `extra_columns`,
    /// and validates every field-name reference against the dataset.
    pub fn load(path: &Path) -> Result<ReportSpec, SpecError> {
        let text = std::fs::read_to_string(path).map_err(|source| SpecError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let raw: RawReportSpec = serde_json::from_str(&text)?;
        let extra_columns = derive_extra_columns(&raw.dataset, &raw.columns, &raw.groups)?;
        log::debug!(
            "loaded report spec for dataset {:?}: groups={:?}, extra_columns={:?}, filters={}",
            raw.dataset.dataset_name,
            raw.groups,
            extra_columns.iter().map(|f| &f.fld_name).collect::<Vec<_>>(),
            raw.filters.len()
        );
        let spec = ReportSpec {
            dataset: raw.dataset,
            columns: raw.columns,
            extra_columns,
            groups: raw.groups,
            filters: raw.filters,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Checks that every `group`, `column`, and `filter` field name resolves
    /// against the dataset.
    pub fn validate(&self) -> Result<(), SpecError> {
        for group in &self.groups {
            if self.dataset.field_named(group).is_none() {
                return Err(SpecError::Validation(format!("unknown group field: {:?}", group)));
            }
        }
        for col in &self.columns {
            if self.dataset.field_named(&col.fld_name).is_none() {
                return Err(SpecError::Validation(format!("unknown column field: {:?}", col.fld_name)));
            }
        }
        for filter in &self.filters {
            if self.dataset.field_named(&filter.fld_name).is_none() {
                return Err(SpecError::Validation(format!(
                    "unknown filter field: {:?}",
                    filter.fld_name
                )));
            }
        }
        Ok(())
    }

    /// The materialised column layout, `extra_columns ++ columns`, resolved
    /// to their backing `FieldSpec`s. Every row and every level's totals row
    /// shares this exact shape and ordering.
    pub fn column_layout(&self) -> Vec<&FieldSpec> {
        let mut layout: Vec<&FieldSpec> = self.extra_columns.iter().collect();
        for col in &self.columns {
            if let Some((_, field)) = self.dataset.field_named(&col.fld_name) {
                layout.push(field);
            }
        }
        layout
    }

    /// Column index (in `column_layout()` order) of a given field name, or
    /// `None` if it isn't part of the layout.
    pub fn column_index(&self, fld_name: &str) -> Option<usize> {
        self.column_layout().iter().position(|f| f.fld_name == fld_name)
    }

    /// Display names for the innermost header band's column-title row: the
    /// field's `col_name`, matching the original system's `ColumnDisplayNames`
    /// (which reads `ColName`, not `Description` — `description` is metadata
    /// surfaced to clients listing available fields, not a display label).
    pub fn column_display_names(&self) -> Vec<String> {
        self.column_layout().iter().map(|f| f.col_name.clone()).collect()
    }

    pub fn build_query(&self, page: i64, max_recs: i64) -> String {
        let cols: Vec<String> = self.column_layout().iter().map(|f| f.col_name.clone()).collect();
        querybuilder::build_query(&self.dataset, &cols, &self.groups, &self.filters, page, max_recs)
    }
}
