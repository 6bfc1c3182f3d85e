//! Selector evaluation for rich queries.
//!
//! Parses a filter document of the form
//! `{"selector": {...}, "use_index": ..., "limit": n, "skip": n}` and tests stored
//! values against it. Index hints are accepted and ignored: every backend answers with
//! an ordered scan.

use crate::error::StorageError;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// A parsed filter document.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    pub selector: Condition,
    pub skip: usize,
    pub limit: Option<usize>,
}

/// Boolean condition over a JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
    Field { path: Vec<String>, op: FieldOp },
}

/// Comparison applied to a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
}

fn invalid(msg: impl Into<String>) -> StorageError {
    StorageError::InvalidQuery(msg.into())
}

impl FilterQuery {
    /// Parse filter document text.
    pub fn parse(document: &str) -> Result<Self, StorageError> {
        let value: Value = serde_json::from_str(document)
            .map_err(|e| invalid(format!("filter document is not valid JSON: {}", e)))?;
        let object = value
            .as_object()
            .ok_or_else(|| invalid("filter document must be a JSON object"))?;

        let mut selector = None;
        let mut skip = 0;
        let mut limit = None;
        for (key, value) in object {
            match key.as_str() {
                "selector" => {
                    let fields = value
                        .as_object()
                        .ok_or_else(|| invalid("selector must be a JSON object"))?;
                    selector = Some(parse_selector(fields)?);
                }
                "use_index" => match value {
                    Value::String(_) => {}
                    Value::Array(items) if items.iter().all(Value::is_string) => {}
                    _ => return Err(invalid("use_index must be a string or array of strings")),
                },
                "skip" => skip = parse_count("skip", value)?,
                "limit" => limit = Some(parse_count("limit", value)?),
                other => return Err(invalid(format!("unsupported query field: {}", other))),
            }
        }

        Ok(FilterQuery {
            selector: selector.ok_or_else(|| invalid("filter document has no selector"))?,
            skip,
            limit,
        })
    }

    /// Test raw stored text. Values that are not JSON objects never match.
    pub fn matches_text(&self, text: &str) -> bool {
        match serde_json::from_str::<Value>(text) {
            Ok(value @ Value::Object(_)) => self.selector.matches(&value),
            _ => false,
        }
    }
}

fn parse_count(name: &str, value: &Value) -> Result<usize, StorageError> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| invalid(format!("{} must be a non-negative integer", name)))
}

fn parse_selector(fields: &Map<String, Value>) -> Result<Condition, StorageError> {
    let mut conditions = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        match key.as_str() {
            "$and" => conditions.push(Condition::And(parse_branches(key, value)?)),
            "$or" => conditions.push(Condition::Or(parse_branches(key, value)?)),
            "$not" => {
                let inner = value
                    .as_object()
                    .ok_or_else(|| invalid("$not takes a selector object"))?;
                conditions.push(Condition::Not(Box::new(parse_selector(inner)?)));
            }
            op if op.starts_with('$') => {
                return Err(invalid(format!("unknown combination operator: {}", op)))
            }
            field => {
                let path: Vec<String> = field.split('.').map(str::to_string).collect();
                for op in parse_field_ops(field, value)? {
                    conditions.push(Condition::Field {
                        path: path.clone(),
                        op,
                    });
                }
            }
        }
    }
    if conditions.len() == 1 {
        if let Some(only) = conditions.pop() {
            return Ok(only);
        }
    }
    Ok(Condition::And(conditions))
}

fn parse_branches(op: &str, value: &Value) -> Result<Vec<Condition>, StorageError> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid(format!("{} takes an array of selectors", op)))?;
    items
        .iter()
        .map(|item| {
            item.as_object()
                .ok_or_else(|| invalid(format!("{} entries must be selector objects", op)))
                .and_then(parse_selector)
        })
        .collect()
}

fn parse_field_ops(field: &str, value: &Value) -> Result<Vec<FieldOp>, StorageError> {
    let operators = match value {
        Value::Object(map) if map.keys().any(|k| k.starts_with('$')) => {
            if !map.keys().all(|k| k.starts_with('$')) {
                return Err(invalid(format!(
                    "condition on '{}' mixes operators with plain fields",
                    field
                )));
            }
            map
        }
        other => return Ok(vec![FieldOp::Eq(other.clone())]),
    };

    let mut ops = Vec::with_capacity(operators.len());
    for (op, operand) in operators {
        let parsed = match op.as_str() {
            "$eq" => FieldOp::Eq(operand.clone()),
            "$ne" => FieldOp::Ne(operand.clone()),
            "$gt" => FieldOp::Gt(operand.clone()),
            "$gte" => FieldOp::Gte(operand.clone()),
            "$lt" => FieldOp::Lt(operand.clone()),
            "$lte" => FieldOp::Lte(operand.clone()),
            "$in" | "$nin" => {
                let items = operand
                    .as_array()
                    .ok_or_else(|| invalid(format!("{} on '{}' takes an array", op, field)))?
                    .clone();
                if op == "$in" {
                    FieldOp::In(items)
                } else {
                    FieldOp::Nin(items)
                }
            }
            "$exists" => FieldOp::Exists(
                operand
                    .as_bool()
                    .ok_or_else(|| invalid(format!("$exists on '{}' takes a boolean", field)))?,
            ),
            other => {
                return Err(invalid(format!(
                    "unknown condition operator {} on '{}'",
                    other, field
                )))
            }
        };
        ops.push(parsed);
    }
    Ok(ops)
}

impl Condition {
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Condition::And(items) => items.iter().all(|c| c.matches(document)),
            Condition::Or(items) => items.iter().any(|c| c.matches(document)),
            Condition::Not(inner) => !inner.matches(document),
            Condition::Field { path, op } => op.matches(lookup(document, path)),
        }
    }
}

fn lookup<'a>(document: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter()
        .try_fold(document, |current, segment| current.as_object()?.get(segment))
}

impl FieldOp {
    /// Missing fields only satisfy `$exists: false`.
    fn matches(&self, field: Option<&Value>) -> bool {
        let value = match field {
            Some(value) => value,
            None => return matches!(self, FieldOp::Exists(false)),
        };
        match self {
            FieldOp::Eq(operand) => json_eq(value, operand),
            FieldOp::Ne(operand) => !json_eq(value, operand),
            FieldOp::Gt(operand) => compare(value, operand) == Some(Ordering::Greater),
            FieldOp::Gte(operand) => matches!(
                compare(value, operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FieldOp::Lt(operand) => compare(value, operand) == Some(Ordering::Less),
            FieldOp::Lte(operand) => matches!(
                compare(value, operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FieldOp::In(items) => items.iter().any(|item| json_eq(value, item)),
            FieldOp::Nin(items) => !items.iter().any(|item| json_eq(value, item)),
            FieldOp::Exists(expected) => *expected,
        }
    }
}

/// Numbers compare by value so `50000` equals `50000.0`.
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Ordering between like-typed scalars. Mixed types are incomparable.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
