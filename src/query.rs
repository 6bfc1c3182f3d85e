//! Query construction and result aggregation for rich queries.

use crate::error::{OperationError, StorageError};
use crate::types::KeyValue;
use serde::{Deserialize, Serialize};
use serde_json::{json, Number, Value};

/// Query-plan hint naming a pre-declared index.
///
/// The store falls back to an unindexed scan when the index does not exist, so the
/// hint is always safe to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexHint {
    /// Design document holding the index
    #[serde(default = "default_design_doc")]
    pub design_doc: String,

    /// Index name within the design document
    #[serde(default = "default_index_name")]
    pub index_name: String,
}

fn default_design_doc() -> String {
    "_design/indexSalaryDoc".to_string()
}

fn default_index_name() -> String {
    "indexSalary".to_string()
}

impl Default for IndexHint {
    fn default() -> Self {
        Self {
            design_doc: default_design_doc(),
            index_name: default_index_name(),
        }
    }
}

/// Filter document handed to [`LedgerStore::query_by_filter`](crate::store::LedgerStore::query_by_filter).
#[derive(Debug, Clone, PartialEq)]
pub enum FilterDocument {
    Structured(Value),
    /// Caller-supplied text, passed through unchanged.
    Raw(String),
}

impl FilterDocument {
    pub fn to_text(&self) -> String {
        match self {
            FilterDocument::Structured(value) => value.to_string(),
            FilterDocument::Raw(text) => text.clone(),
        }
    }
}

/// Builds filter documents for the ledger's parameterized queries.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    salary_index: IndexHint,
}

impl QueryBuilder {
    pub fn new(salary_index: IndexHint) -> Self {
        Self { salary_index }
    }

    /// Records whose `salary` strictly exceeds `amount`.
    ///
    /// The bound is written with the shortest text that round-trips to the same f64.
    /// NaN and infinities have no JSON form and are refused.
    pub fn by_salary_greater_than(&self, amount: f64) -> Result<FilterDocument, OperationError> {
        let bound = Number::from_f64(amount).ok_or_else(|| OperationError::Parse {
            operation: "readBySalaryFloor".to_string(),
            input: amount.to_string(),
            reason: "salary bound must be a finite number".to_string(),
        })?;
        Ok(FilterDocument::Structured(json!({
            "selector": { "salary": { "$gt": bound } },
            "use_index": [self.salary_index.design_doc, self.salary_index.index_name],
        })))
    }

    /// Ad hoc query. No syntax checking; the store rejects malformed input on execution.
    pub fn raw(&self, query_text: &str) -> FilterDocument {
        FilterDocument::Raw(query_text.to_string())
    }
}

/// Drain a query result sequence into JSON-array text.
///
/// Blank entries are skipped without leaving a separator behind. Values are
/// concatenated verbatim and not re-parsed.
pub fn aggregate<I>(rows: I) -> Result<String, StorageError>
where
    I: IntoIterator<Item = Result<KeyValue, StorageError>>,
{
    let mut out = String::from("[");
    let mut first = true;
    for row in rows {
        let row = row?;
        let value = match row.value.as_deref() {
            Some(v) if !v.trim().is_empty() => v,
            _ => continue,
        };
        if !first {
            out.push(',');
        }
        out.push_str(value);
        first = false;
    }
    out.push(']');
    Ok(out)
}
