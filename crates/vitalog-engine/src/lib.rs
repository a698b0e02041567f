//! Query engine for the in-memory record collection.
//!
//! Evaluates the journal's constrained query language (`WHERE` /
//! `ORDER BY` / `LIMIT`, in that order, each optional) and projects result
//! sets to delimited text. Pure functions over record slices; no state.

pub mod error;
pub mod export;
pub mod query;

pub use error::{Error, Result};
pub use export::{to_csv_string, write_csv};
pub use query::{CmpOp, Condition, Direction, OrderBy, Query};

use vitalog_types::HealthRecord;

/// Parse and evaluate a query in one step.
///
/// Any input that does not match the grammar is a syntax error; there are
/// no partial results.
pub fn run_query(records: &[HealthRecord], input: &str) -> Result<Vec<HealthRecord>> {
    let query: Query = input.parse()?;
    Ok(query.evaluate(records))
}
