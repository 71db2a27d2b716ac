//! FILENAME: querybuilder/src/filter.rs
//! Filter-to-SQL predicate compiler: translates an abstract `FilterSpec`
//! into a single SQL fragment, given the dataset it runs against.

use rowtypes::{CellType, DatasetSpec};
use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// One filter term: a field, an operator, the operator's operand values,
/// and free-form options (currently only the `"not"` negation flag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilterSpec {
    pub fld_name: String,
    pub op: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

impl FilterSpec {
    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.eq_ignore_ascii_case(name))
    }

    fn negated(&self) -> bool {
        self.has_option("not")
    }
}

/// Backslash-escapes embedded single quotes and wraps the result in single
/// quotes, matching the original system's escaping discipline.
pub fn single_quote(s: &str) -> String {
    let escaped = s.replace('\'', "\\'");
    format!("'{}'", escaped)
}

fn format_value(v: &str, needs_quotes: bool) -> String {
    if needs_quotes {
        single_quote(v)
    } else {
        v.to_string()
    }
}

/// The base/negated SQL operator token and (if any) the `%s`-style value
/// pattern for each recognized opcode, matching spec.md's operator table
/// exactly.
fn op_code_sql(op: &str, negate: bool) -> Option<(&'static str, Option<&'static str>)> {
    Some(match op {
        "lt" => (if negate { ">=" } else { "<" }, None),
        "le" => (if negate { ">" } else { "<=" }, None),
        "gt" => (if negate { "<=" } else { ">" }, None),
        "ge" => (if negate { "<" } else { ">=" }, None),
        "eq" => (if negate { "<>" } else { "=" }, None),
        "ne" => (if negate { "=" } else { "<>" }, None),
        "prefix" => (if negate { "not ilike" } else { "ilike" }, Some("{}%")),
        "suffix" => (if negate { "not ilike" } else { "ilike" }, Some("%{}")),
        "contains" => (if negate { "not ilike" } else { "ilike" }, Some("%{}%")),
        "exists" => (if negate { "is not null" } else { "is null" }, None),
        "range" => (if negate { "not between" } else { "between" }, Some("{} and {}")),
        "in" => (if negate { "not in" } else { "in" }, None),
        _ => return None,
    })
}

/// Renders the operand portion of a compiled term (everything after the
/// operator token), dispatching on opcode. Returns `None` for `exists`,
/// which takes no value.
fn comparison_val(
    op: &str,
    values: &[String],
    fld_type: CellType,
    term: &str,
) -> Result<Option<String>, FilterError> {
    let needs_quotes = matches!(fld_type, CellType::Text | CellType::Date);
    match op {
        "exists" => {
            if !values.is_empty() {
                return Err(FilterError::ArityMismatch {
                    op: term.to_string(),
                    expected: false,
                    provided: true,
                });
            }
            Ok(None)
        }
        "prefix" | "suffix" | "contains" => {
            if values.len() != 1 {
                return Err(FilterError::WrongValueCount {
                    op: term.to_string(),
                    required: 1,
                    got: values.len(),
                });
            }
            let pattern = match op {
                "prefix" => format!("{}%", values[0]),
                "suffix" => format!("%{}", values[0]),
                _ => format!("%{}%", values[0]),
            };
            Ok(Some(format_value(&pattern, true)))
        }
        "range" => {
            if values.len() != 2 {
                return Err(FilterError::WrongValueCount {
                    op: term.to_string(),
                    required: 2,
                    got: values.len(),
                });
            }
            Ok(Some(format!(
                "{} and {}",
                format_value(&values[0], needs_quotes),
                format_value(&values[1], needs_quotes)
            )))
        }
        "in" => {
            if values.is_empty() {
                return Err(FilterError::WrongValueCount {
                    op: term.to_string(),
                    required: 1,
                    got: 0,
                });
            }
            let rendered: Vec<String> = values.iter().map(|v| format_value(v, needs_quotes)).collect();
            Ok(Some(format!("({})", rendered.join(", "))))
        }
        _ => {
            if values.len() != 1 {
                return Err(FilterError::WrongValueCount {
                    op: term.to_string(),
                    required: 1,
                    got: values.len(),
                });
            }
            Ok(Some(format_value(&values[0], needs_quotes)))
        }
    }
}

/// Compiles one filter into a SQL predicate fragment (no `where` prefix, no
/// surrounding parens — assembly of multiple terms is `query::format_where`'s
/// job).
pub fn compile(filter: &FilterSpec, dataset: &DatasetSpec) -> Result<String, FilterError> {
    let (_, field) = dataset
        .field_named(&filter.fld_name)
        .ok_or_else(|| FilterError::UnknownField(filter.fld_name.clone()))?;

    let (sql_op, _val_pattern) =
        op_code_sql(&filter.op, filter.negated()).ok_or_else(|| FilterError::UnknownOp(filter.op.clone()))?;

    let value = comparison_val(&filter.op, &filter.values, field.fld_type, &filter.op)?;

    Ok(match value {
        Some(v) => format!("{} {} {}", field.col_name, sql_op, v),
        None => format!("{} {}", field.col_name, sql_op),
    })
}

/// The operand values a parameterized compile would bind, in placeholder
/// order, with the pattern-matching ops (`prefix`/`suffix`/`contains`)
/// pre-rendered into the `%`-wrapped literal the placeholder stands in for —
/// the driver binds the wildcard as part of the bound value, not the SQL text.
fn bound_values(op: &str, values: &[String]) -> Vec<String> {
    match op {
        "prefix" => vec![format!("{}%", values[0])],
        "suffix" => vec![format!("%{}", values[0])],
        "contains" => vec![format!("%{}%", values[0])],
        _ => values.to_vec(),
    }
}

/// Compiles one filter to a fragment using `$N`-style placeholders instead of
/// inlined, escaped literals, alongside the values a driver should bind to
/// those placeholders in order. `next_param` is the next placeholder number
/// to allocate and is advanced by however many this term consumes, so
/// callers can fold several filters into one placeholder sequence (see
/// `query::to_parameterized`). Arity validation is identical to `compile`.
pub fn compile_parameterized(
    filter: &FilterSpec,
    dataset: &DatasetSpec,
    next_param: &mut u32,
) -> Result<(String, Vec<String>), FilterError> {
    let (_, field) = dataset
        .field_named(&filter.fld_name)
        .ok_or_else(|| FilterError::UnknownField(filter.fld_name.clone()))?;

    let (sql_op, _) =
        op_code_sql(&filter.op, filter.negated()).ok_or_else(|| FilterError::UnknownOp(filter.op.clone()))?;

    // Reuses comparison_val purely for its arity validation; the rendered
    // string it returns is discarded in favor of placeholders.
    comparison_val(&filter.op, &filter.values, field.fld_type, &filter.op)?;

    if filter.op == "exists" {
        return Ok((format!("{} {}", field.col_name, sql_op), Vec::new()));
    }

    let values = bound_values(&filter.op, &filter.values);
    let placeholders: Vec<String> = values
        .iter()
        .map(|_| {
            let p = format!("${}", next_param);
            *next_param += 1;
            p
        })
        .collect();

    let operand = match filter.op.as_str() {
        "range" => format!("{} and {}", placeholders[0], placeholders[1]),
        "in" => format!("({})", placeholders.join(", ")),
        _ => placeholders[0].clone(),
    };

    Ok((format!("{} {} {}", field.col_name, sql_op, operand), values))
}
