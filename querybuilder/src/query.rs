//! FILENAME: querybuilder/src/query.rs
//! Assembles a `select ... from ... where ... order by ... offset/limit`
//! query from a dataset, its column projection, groups, and filters.
//!
//! Filter terms that fail to compile are warned and dropped rather than
//! aborting the whole query — a malformed single filter shouldn't prevent
//! the rest of the report from running.

use rowtypes::DatasetSpec;

use crate::filter::{compile, compile_parameterized, FilterSpec};

/// Builds the `where` clause from a list of filters, skipping (and logging)
/// any that fail to compile. `n=0` yields `""`; `n=1` yields the bare term
/// prefixed with `where `; `n>1` parenthesizes each term and joins with
/// `and`.
pub fn format_where(dataset: &DatasetSpec, filters: &[FilterSpec]) -> String {
    let terms: Vec<String> = filters
        .iter()
        .filter_map(|f| match compile(f, dataset) {
            Ok(term) => Some(term),
            Err(e) => {
                log::warn!("dropping filter on {:?}: {}", f.fld_name, e);
                None
            }
        })
        .collect();

    match terms.len() {
        0 => String::new(),
        1 => format!("where {}", terms[0]),
        _ => format!(
            "where {}",
            terms
                .iter()
                .map(|t| format!("({})", t))
                .collect::<Vec<_>>()
                .join(" and ")
        ),
    }
}

/// The parameterized counterpart of `format_where`: folds every filter's
/// placeholders into one running `$N` sequence (so a second filter's first
/// placeholder continues where the first filter's last one left off) and
/// returns the bound values in the same order the placeholders appear in the
/// clause. Filters that fail to compile are dropped exactly as in
/// `format_where`, and do not consume placeholder numbers.
pub fn to_parameterized(dataset: &DatasetSpec, filters: &[FilterSpec]) -> (String, Vec<String>) {
    let mut next_param = 1u32;
    let mut bound = Vec::new();
    let terms: Vec<String> = filters
        .iter()
        .filter_map(|f| match compile_parameterized(f, dataset, &mut next_param) {
            Ok((term, mut values)) => {
                bound.append(&mut values);
                Some(term)
            }
            Err(e) => {
                log::warn!("dropping filter on {:?}: {}", f.fld_name, e);
                None
            }
        })
        .collect();

    let clause = match terms.len() {
        0 => String::new(),
        1 => format!("where {}", terms[0]),
        _ => format!(
            "where {}",
            terms
                .iter()
                .map(|t| format!("({})", t))
                .collect::<Vec<_>>()
                .join(" and ")
        ),
    };
    (clause, bound)
}

/// `""` if there are no groups, else `order by g1, g2, ...`, with each group
/// name resolved to its `col_name` — the same projection the `select` clause
/// uses — so a group whose `fld_name` differs from its `col_name` still
/// orders by the column actually selected. Unresolvable group names (which
/// `ReportSpec::validate` should already reject) fall back to the raw name.
pub fn format_order(dataset: &DatasetSpec, groups: &[String]) -> String {
    if groups.is_empty() {
        String::new()
    } else {
        let cols: Vec<String> = groups
            .iter()
            .map(|g| {
                dataset
                    .field_named(g)
                    .map(|(_, f)| f.col_name.clone())
                    .unwrap_or_else(|| g.clone())
            })
            .collect();
        format!("order by {}", cols.join(", "))
    }
}

/// `""` if `max_recs < 0` (paging disabled); else `offset <page*max_recs>
/// limit <max_recs>`.
pub fn format_offset(page: i64, max_recs: i64) -> String {
    if max_recs < 0 {
        String::new()
    } else {
        format!("offset {} limit {}", page * max_recs, max_recs)
    }
}

/// Assembles the full query. `cols` is expected to already be in
/// `extra_columns ++ columns` order (the same order the materialised `Row`
/// layout uses), so callers in `report-engine` share one source of truth
/// for column ordering.
pub fn build_query(
    dataset: &DatasetSpec,
    cols: &[String],
    groups: &[String],
    filters: &[FilterSpec],
    page: i64,
    max_recs: i64,
) -> String {
    let clauses: Vec<String> = [
        format_where(dataset, filters),
        format_order(dataset, groups),
        format_offset(page, max_recs),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();

    let base = format!("select {} from {}", cols.join(", "), dataset.view_name);
    if clauses.is_empty() {
        base
    } else {
        format!("{} {}", base, clauses.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowtypes::{CellType, FieldSpec};

    fn dataset() -> DatasetSpec {
        DatasetSpec::new(
            "orders",
            "v_orders",
            vec![
                FieldSpec::new("region", CellType::Text, "region"),
                FieldSpec::new("amount", CellType::Currency, "amount_cents"),
            ],
        )
    }

    #[test]
    fn bare_query_has_no_clauses() {
        let q = build_query(&dataset(), &["region".into(), "amount".into()], &[], &[], -1, -1);
        assert_eq!(q, "select region, amount from v_orders");
    }

    #[test]
    fn query_with_groups_and_paging() {
        let q = build_query(
            &dataset(),
            &["region".into(), "amount".into()],
            &["region".into()],
            &[],
            2,
            50,
        );
        assert_eq!(
            q,
            "select region, amount from v_orders order by region offset 100 limit 50"
        );
    }

    #[test]
    fn order_by_maps_group_names_through_col_name() {
        let ds = DatasetSpec::new(
            "orders",
            "v_orders",
            vec![FieldSpec::new("region", CellType::Text, "region_code")],
        );
        let q = build_query(&ds, &["region_code".into()], &["region".into()], &[], -1, -1);
        assert_eq!(q, "select region_code from v_orders order by region_code");
    }

    #[test]
    fn negative_max_recs_omits_paging_clause() {
        assert_eq!(format_offset(3, -1), "");
    }

    #[test]
    fn invalid_filter_is_dropped_not_fatal() {
        let bad = FilterSpec {
            fld_name: "nonexistent".into(),
            op: "eq".into(),
            values: vec!["1".into()],
            options: vec![],
        };
        assert_eq!(format_where(&dataset(), &[bad]), "");
    }

    #[test]
    fn parameterized_where_continues_placeholder_numbering_across_filters() {
        let region = FilterSpec {
            fld_name: "region".into(),
            op: "eq".into(),
            values: vec!["east".into()],
            options: vec![],
        };
        let amount = FilterSpec {
            fld_name: "amount".into(),
            op: "range".into(),
            values: vec!["100".into(), "500".into()],
            options: vec![],
        };
        let (clause, bound) = to_parameterized(&dataset(), &[region, amount]);
        assert_eq!(clause, "where (region = $1) and (amount_cents between $2 and $3)");
        assert_eq!(bound, vec!["east".to_string(), "100".to_string(), "500".to_string()]);
    }

    #[test]
    fn multiple_filters_are_parenthesized_and_joined() {
        let a = FilterSpec {
            fld_name: "region".into(),
            op: "eq".into(),
            values: vec!["east".into()],
            options: vec![],
        };
        let b = FilterSpec {
            fld_name: "amount".into(),
            op: "gt".into(),
            values: vec!["100".into()],
            options: vec![],
        };
        assert_eq!(
            format_where(&dataset(), &[a, b]),
            "where (region = 'east') and (amount_cents > 100)"
        );
    }
}
