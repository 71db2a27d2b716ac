//! FILENAME: report-engine/src/encode.rs
//! The three output encodings a `ReportRow` can be serialized to: a fixed
//! -width, right-aligned text table; newline-delimited JSON; and
//! concatenated MessagePack.

use crate::error::WriterError;
use crate::event::ReportRow;

/// Column width used by the text encoder's right-aligning formatter,
/// approximating the original `tabwriter`'s minwidth.
const MINWIDTH: usize = 23;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    MsgPack,
}

pub fn encode(format: OutputFormat, row: &ReportRow) -> Result<Vec<u8>, WriterError> {
    match format {
        OutputFormat::Text => Ok(encode_text(row).into_bytes()),
        OutputFormat::Json => encode_json(row),
        OutputFormat::MsgPack => encode_msgpack(row),
    }
}

/// Renders `{TYPE}-{level}`, the level label (with a bracketed count when
/// non-zero), and each value, tab-separated with a trailing tab before the
/// newline — the shape `tabwriter` produces once its elastic tab stops
/// settle. Each field is still right-aligned to `MINWIDTH` as a column-width
/// approximation, since nothing here replays `tabwriter`'s column-wide
/// alignment pass across sibling rows.
fn encode_text(row: &ReportRow) -> String {
    let level_field = if row.level_count > 0 {
        format!("{} [{}]", row.level_name, row.level_count)
    } else {
        row.level_name.clone()
    };

    let mut fields = vec![format!("{}-{}", row.row_type.as_str(), row.row_level), level_field];
    fields.extend(row.values.iter().cloned());

    let mut line = String::new();
    for field in fields {
        line.push_str(&format!("{:>width$}", field, width = MINWIDTH));
        line.push('\t');
    }
    line.push('\n');
    line
}

fn encode_json(row: &ReportRow) -> Result<Vec<u8>, WriterError> {
    let mut bytes = serde_json::to_vec(row).map_err(|e| WriterError::Encode(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn encode_msgpack(row: &ReportRow) -> Result<Vec<u8>, WriterError> {
    rmp_serde::to_vec_named(row).map_err(|e| WriterError::Encode(e.to_string()))
}
