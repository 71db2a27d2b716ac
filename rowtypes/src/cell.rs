//! FILENAME: rowtypes/src/cell.rs
//! Typed, polymorphic report cell: a type tag plus value storage that
//! supports deterministic text formatting, in-place arithmetic accumulation,
//! and the two reset modes the control-break engine needs between groups.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The logical type a cell carries. Distinct from the cell's *value slot*
/// so that a freshly typed, unset cell can still format/reset correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    None,
    Text,
    Int,
    Float,
    Currency,
    Boolean,
    Date,
}

/// The value stored behind a [`Cell`]. `Currency` and `Int` share an `i64`
/// representation but are distinct variants — there is no code path that can
/// build a `Currency`-tagged cell holding an `Int` value or vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    None,
    Text(Option<String>),
    Int(i64),
    Float(f64),
    Currency(i64),
    Boolean(bool),
    Date(Option<NaiveDate>),
}

/// A single typed report cell: type tag plus value.
///
/// One allocation is expected to survive an entire column across every row
/// of a report (bound fresh from the driver each row, accumulated into a
/// level's totals row, then reset). See `bind_from` for how driver output is
/// copied in without unsafe code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub typ: CellType,
    pub value: CellValue,
}

impl Cell {
    pub fn new(typ: CellType) -> Self {
        Cell {
            typ,
            value: Self::zero_value(typ),
        }
    }

    pub fn new_none() -> Self {
        Cell {
            typ: CellType::None,
            value: CellValue::None,
        }
    }

    pub fn new_text(value: Option<String>) -> Self {
        Cell {
            typ: CellType::Text,
            value: CellValue::Text(value),
        }
    }

    pub fn new_int(value: i64) -> Self {
        Cell {
            typ: CellType::Int,
            value: CellValue::Int(value),
        }
    }

    pub fn new_float(value: f64) -> Self {
        Cell {
            typ: CellType::Float,
            value: CellValue::Float(value),
        }
    }

    /// `value` is a count of cents, e.g. `150` renders as `"1.50"`.
    pub fn new_currency(value: i64) -> Self {
        Cell {
            typ: CellType::Currency,
            value: CellValue::Currency(value),
        }
    }

    pub fn new_boolean(value: bool) -> Self {
        Cell {
            typ: CellType::Boolean,
            value: CellValue::Boolean(value),
        }
    }

    pub fn new_date(value: Option<NaiveDate>) -> Self {
        Cell {
            typ: CellType::Date,
            value: CellValue::Date(value),
        }
    }

    fn zero_value(typ: CellType) -> CellValue {
        match typ {
            CellType::None => CellValue::None,
            CellType::Text => CellValue::Text(None),
            CellType::Int => CellValue::Int(0),
            CellType::Float => CellValue::Float(0.0),
            CellType::Currency => CellValue::Currency(0),
            CellType::Boolean => CellValue::Boolean(false),
            CellType::Date => CellValue::Date(None),
        }
    }

    /// Coerces to `typ`, discarding any prior value. Idempotent.
    pub fn set_type(&mut self, typ: CellType) {
        self.typ = typ;
        self.value = Self::zero_value(typ);
    }

    /// Copies a driver-decoded value into this cell without changing its
    /// type, mirroring the "one allocation, reused every row" binding the
    /// original system achieved with a raw pointer. Returns `false` (and
    /// leaves `self` untouched) if `other`'s type doesn't match.
    pub fn bind_from(&mut self, other: &Cell) -> bool {
        if self.typ != other.typ {
            return false;
        }
        self.value = other.value.clone();
        true
    }

    /// Adds `other` into `self` in place when both share a summable numeric
    /// type (`int`, `float`, `currency`). Returns whether the accumulation
    /// happened; any other type pairing is a silent no-op.
    pub fn accumulate(&mut self, other: &Cell) -> bool {
        if self.typ != other.typ {
            return false;
        }
        match (&mut self.value, &other.value) {
            (CellValue::Int(a), CellValue::Int(b)) => {
                *a += b;
                true
            }
            (CellValue::Float(a), CellValue::Float(b)) => {
                *a += b;
                true
            }
            (CellValue::Currency(a), CellValue::Currency(b)) => {
                *a += b;
                true
            }
            _ => false,
        }
    }

    /// Zeroes every cell, including text/date.
    pub fn reset_all(&mut self) {
        self.value = Self::zero_value(self.typ);
    }

    /// Zeroes numeric/boolean cells; leaves text and date untouched so the
    /// most recently seen group-key label survives into the footer emitter.
    pub fn reset_numerics(&mut self) {
        match self.typ {
            CellType::Int | CellType::Float | CellType::Currency | CellType::Boolean => {
                self.value = Self::zero_value(self.typ)
            }
            CellType::None | CellType::Text | CellType::Date => {}
        }
    }

    /// Deterministic text form, per the formatting table in the report
    /// specification's typed-value section.
    pub fn to_display_string(&self) -> String {
        match &self.value {
            CellValue::None => String::new(),
            CellValue::Text(s) => s.clone().unwrap_or_default(),
            CellValue::Int(n) => n.to_string(),
            CellValue::Float(f) => format!("{:.2}", f),
            CellValue::Currency(pennies) => {
                let dollars = pennies / 100;
                let cents = (pennies % 100).abs();
                format!("{}.{:02}", dollars, cents)
            }
            CellValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            CellValue::Date(d) => d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        }
    }

    /// Relabels an `Int`- or `Currency`-valued cell as `Currency`, carrying
    /// the raw integer (cents) across. The only other way to produce a
    /// `Currency`-tagged cell is `new_currency` — there is no path that can
    /// leave a currency-shaped value tagged `Int`.
    pub fn to_currency(&self) -> Cell {
        let cents = match &self.value {
            CellValue::Int(v) => *v,
            CellValue::Currency(v) => *v,
            _ => 0,
        };
        Cell::new_currency(cents)
    }

    /// Builds a cell of the given type from a textual literal. Used by the
    /// spec loader's self-check and by tests, not the streaming hot path.
    pub fn parse_into(typ: CellType, raw: &str) -> Cell {
        match typ {
            CellType::None => Cell::new_none(),
            CellType::Text => Cell::new_text(if raw.is_empty() { None } else { Some(raw.to_string()) }),
            CellType::Int => Cell::new_int(raw.parse().unwrap_or(0)),
            CellType::Float => Cell::new_float(raw.parse().unwrap_or(0.0)),
            CellType::Currency => Cell::new_currency(raw.parse().unwrap_or(0)),
            CellType::Boolean => Cell::new_boolean(raw.eq_ignore_ascii_case("true")),
            CellType::Date => Cell::new_date(NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new_none()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_formats_currency_with_cent_padding() {
        let c = Cell::new_currency(150);
        assert_eq!(c.to_display_string(), "1.50");
        let c = Cell::new_currency(5);
        assert_eq!(c.to_display_string(), "0.05");
    }

    #[test]
    fn it_formats_float_with_two_decimals() {
        assert_eq!(Cell::new_float(3.0).to_display_string(), "3.00");
        assert_eq!(Cell::new_float(3.14159).to_display_string(), "3.14");
    }

    #[test]
    fn it_formats_date_as_iso() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(Cell::new_date(Some(d)).to_display_string(), "2026-01-02");
        assert_eq!(Cell::new_date(None).to_display_string(), "");
    }

    #[test]
    fn it_accumulates_matching_numeric_types() {
        let mut a = Cell::new_int(2);
        let b = Cell::new_int(3);
        assert!(a.accumulate(&b));
        assert_eq!(a.to_display_string(), "5");
    }

    #[test]
    fn it_refuses_to_accumulate_mismatched_types() {
        let mut a = Cell::new_int(2);
        let b = Cell::new_float(3.0);
        assert!(!a.accumulate(&b));
        assert_eq!(a.to_display_string(), "2");
    }

    #[test]
    fn currency_and_int_cannot_be_conflated() {
        let currency = Cell::new_currency(100);
        assert_eq!(currency.typ, CellType::Currency);
        assert_ne!(currency.typ, CellType::Int);
    }

    #[test]
    fn reset_numerics_spares_text_and_date() {
        let mut text = Cell::new_text(Some("hello".into()));
        text.reset_numerics();
        assert_eq!(text.to_display_string(), "hello");

        let mut num = Cell::new_int(42);
        num.reset_numerics();
        assert_eq!(num.to_display_string(), "0");
    }

    #[test]
    fn reset_all_clears_text_too() {
        let mut text = Cell::new_text(Some("hello".into()));
        text.reset_all();
        assert_eq!(text.to_display_string(), "");
    }

    #[test]
    fn format_parse_round_trips() {
        for c in [
            Cell::new_int(42),
            Cell::new_float(3.14),
            Cell::new_currency(150),
            Cell::new_boolean(true),
        ] {
            let s = c.to_display_string();
            let parsed = Cell::parse_into(c.typ, &s);
            assert_eq!(parsed.to_display_string(), s);
        }
    }

    #[test]
    fn bind_from_copies_value_when_types_match() {
        let mut target = Cell::new_int(0);
        let source = Cell::new_int(99);
        assert!(target.bind_from(&source));
        assert_eq!(target.to_display_string(), "99");
    }

    #[test]
    fn bind_from_refuses_mismatched_types() {
        let mut target = Cell::new_int(0);
        let source = Cell::new_text(Some("x".into()));
        assert!(!target.bind_from(&source));
        assert_eq!(target.to_display_string(), "0");
    }

    #[test]
    fn cell_type_serializes_to_lowercase_logical_tags() {
        assert_eq!(serde_json::to_string(&CellType::Currency).unwrap(), "\"currency\"");
        assert_eq!(serde_json::to_string(&CellType::Int).unwrap(), "\"int\"");
        let parsed: CellType = serde_json::from_str("\"date\"").unwrap();
        assert_eq!(parsed, CellType::Date);
    }

    #[test]
    fn to_currency_relabels_an_int_cell_carrying_cents() {
        let cents = Cell::new_int(150);
        let currency = cents.to_currency();
        assert_eq!(currency.typ, CellType::Currency);
        assert_eq!(currency.to_display_string(), "1.50");
    }
}
