//! FILENAME: report-engine/src/event.rs
//! The single emitted-event type. Every header, detail, subtotal, or grand
//! total line the writer produces is one `ReportRow`, regardless of output
//! format — the three encoders (text, JSON, MessagePack) all serialize the
//! same struct.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowType {
    Hdr,
    Det,
    Sum,
    Tot,
}

impl RowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowType::Hdr => "HDR",
            RowType::Det => "DET",
            RowType::Sum => "SUM",
            RowType::Tot => "TOT",
        }
    }
}

/// Field names are stable across encodings: `typ`, `lvl`, `nam`, `qty`,
/// `val`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "typ")]
    pub row_type: RowType,
    #[serde(rename = "lvl")]
    pub row_level: i32,
    #[serde(rename = "nam")]
    pub level_name: String,
    #[serde(rename = "qty")]
    pub level_count: i64,
    #[serde(rename = "val")]
    pub values: Vec<String>,
}

impl ReportRow {
    pub fn new(row_type: RowType, row_level: i32, level_name: impl Into<String>, level_count: i64, values: Vec<String>) -> Self {
        ReportRow {
            row_type,
            row_level,
            level_name: level_name.into(),
            level_count,
            values,
        }
    }

    /// A blank spacer row, used between footer bands in dashed text output.
    pub fn blank(row_type: RowType, row_level: i32) -> Self {
        ReportRow::new(row_type, row_level, "", 0, vec![])
    }

    /// A dash-separator row of the given column width, emitted above a
    /// subtotal/grand-total band.
    pub fn dashes(row_type: RowType, row_level: i32, width: usize) -> Self {
        ReportRow::new(row_type, row_level, "", 0, vec!["-".repeat(12); width])
    }

    /// A double-dash ('=') separator row, emitted below a subtotal/grand
    /// -total band — distinct from the single-dash row above it.
    pub fn double_dashes(row_type: RowType, row_level: i32, width: usize) -> Self {
        ReportRow::new(row_type, row_level, "", 0, vec!["=".repeat(12); width])
    }
}
