//! Predicate evaluation: a conjunction of `(column, operator, value)` tests
//! over a table's rows (§4.3).
//!
//! A predicate whose value doesn't match its column's type doesn't error —
//! it simply excludes the row, the same way a `WHERE` clause comparing a
//! string to an integer filters everything out rather than faulting.

use crate::Result;
use coleman_core::{Operator, Predicate, Table, Value};

/// Row indices (in table order) of every row satisfying every predicate.
/// An empty predicate list selects every row.
pub fn filter_table(table: &Table, predicates: &[Predicate]) -> Result<Vec<usize>> {
    if predicates.is_empty() {
        return Ok((0..table.row_count()).collect());
    }

    let mut resolved = Vec::with_capacity(predicates.len());
    for predicate in predicates {
        let column_index = table
            .schema()
            .find(&predicate.column_name)
            .ok_or_else(|| coleman_core::Error::ColumnNotFound(predicate.column_name.clone()))?;
        resolved.push((column_index, predicate.operator, &predicate.value));
    }

    let mut selected = Vec::new();
    for row in 0..table.row_count() {
        let mut matched = true;
        for &(column_index, operator, expected) in &resolved {
            let actual = table.get_value(row, column_index)?;
            if !evaluate(&actual, operator, expected) {
                matched = false;
                break;
            }
        }
        if matched {
            selected.push(row);
        }
    }
    Ok(selected)
}

/// Compare one value against one predicate value under one operator.
/// Mismatched types are not equal under any operator — including `!=`,
/// which would otherwise trivially hold for every type mismatch.
fn evaluate(actual: &Value, operator: Operator, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Int64(a), Value::Int64(b)) => compare(*a, *b, operator),
        (Value::Float64(a), Value::Float64(b)) => compare(*a, *b, operator),
        (Value::String(a), Value::String(b)) => compare(a.as_bytes(), b.as_bytes(), operator),
        (Value::Bool(a), Value::Bool(b)) => compare(*a, *b, operator),
        _ => false,
    }
}

fn compare<T: PartialOrd + PartialEq>(a: T, b: T, operator: Operator) -> bool {
    match operator {
        Operator::Eq => a == b,
        Operator::Ne => a != b,
        Operator::Lt => a < b,
        Operator::Le => a <= b,
        Operator::Gt => a > b,
        Operator::Ge => a >= b,
    }
}
