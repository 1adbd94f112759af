//! COUNT and SUM over a (optionally filtered) column (§4.4). AVG, MIN, MAX,
//! and GROUP BY are explicitly out of scope for this engine.

use crate::evaluator::filter_table;
use crate::Result;
use coleman_core::{ColumnType, Predicate, Table, Value};

/// Supported aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
}

/// Aggregate `column_name` over the rows of `table` matching `predicates`.
///
/// COUNT is valid over any column type — it only checks the column exists
/// and counts selected rows. SUM is valid over `Int64` and `Float64` only;
/// `String`/`Bool` columns fail with `InvalidColumnType`.
pub fn aggregate(
    table: &Table,
    column_name: &str,
    function: AggregateFunction,
    predicates: &[Predicate],
) -> Result<Value> {
    let column_index = table
        .schema()
        .find(column_name)
        .ok_or_else(|| coleman_core::Error::ColumnNotFound(column_name.to_string()))?;
    let selected = filter_table(table, predicates)?;

    match function {
        AggregateFunction::Count => Ok(Value::Int64(selected.len() as i64)),
        AggregateFunction::Sum => {
            let column_type = table.schema().column_type(column_index)?;
            match column_type {
                ColumnType::Int64 => {
                    let mut total: i64 = 0;
                    for row in selected {
                        let value = table.get_value(row, column_index)?;
                        total = total.wrapping_add(
                            value
                                .as_i64()
                                .expect("schema guarantees this column holds Int64 values"),
                        );
                    }
                    Ok(Value::Int64(total))
                }
                ColumnType::Float64 => {
                    let mut total: f64 = 0.0;
                    for row in selected {
                        let value = table.get_value(row, column_index)?;
                        total += value
                            .as_f64()
                            .expect("schema guarantees this column holds Float64 values");
                    }
                    Ok(Value::Float64(total))
                }
                ColumnType::String | ColumnType::Bool => {
                    Err(coleman_core::Error::InvalidColumnType(column_type).into())
                }
            }
        }
    }
}
