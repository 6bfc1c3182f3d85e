//! Operation Dispatcher
//!
//! Maps an operation name to its handler, checks arity, and turns every handler
//! outcome into exactly one rendered envelope. Unknown names are rejected without
//! running any handler.

use crate::envelope::ResponseEnvelope;
use crate::error::OperationError;
use crate::query::{aggregate, FilterDocument, QueryBuilder};
use crate::store::{LedgerStore, RecordAccessor};
use crate::types::Employee;
use crate::validate::{parse_amount, validate_arg_count};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub const OP_CREATE: &str = "create";
pub const OP_READ_BY_KEY: &str = "readByKey";
pub const OP_READ_BY_SALARY_FLOOR: &str = "readBySalaryFloor";
pub const OP_READ_BY_FILTER: &str = "readByFilter";
pub const OP_INIT: &str = "init";

/// Binary outcome reported alongside the envelope text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

/// What the caller receives for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    /// Rendered envelope text
    pub payload: String,
}

impl Response {
    /// Status follows the `OK` flag actually rendered.
    fn from_envelope(envelope: &ResponseEnvelope) -> Self {
        let (payload, ok) = envelope.render();
        Self {
            status: if ok { Status::Success } else { Status::Failure },
            payload,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// Everything a handler may touch during one invocation.
struct Invocation<'a> {
    store: &'a dyn LedgerStore,
    queries: &'a QueryBuilder,
}

type Handler = fn(&Invocation<'_>, &[String]) -> Result<ResponseEnvelope, OperationError>;

#[derive(Clone, Copy)]
struct Operation {
    arity: usize,
    handler: Handler,
}

/// Name-keyed operation table.
pub struct Dispatcher {
    operations: BTreeMap<&'static str, Operation>,
    queries: QueryBuilder,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(QueryBuilder::default())
    }
}

impl Dispatcher {
    pub fn new(queries: QueryBuilder) -> Self {
        let mut operations = BTreeMap::new();
        operations.insert(
            OP_CREATE,
            Operation {
                arity: 5,
                handler: create,
            },
        );
        operations.insert(
            OP_READ_BY_KEY,
            Operation {
                arity: 1,
                handler: read_by_key,
            },
        );
        operations.insert(
            OP_READ_BY_SALARY_FLOOR,
            Operation {
                arity: 1,
                handler: read_by_salary_floor,
            },
        );
        operations.insert(
            OP_READ_BY_FILTER,
            Operation {
                arity: 1,
                handler: read_by_filter,
            },
        );
        Self {
            operations,
            queries,
        }
    }

    /// Operation names and arities, sorted by name.
    pub fn catalog(&self) -> Vec<(&'static str, usize)> {
        self.operations
            .iter()
            .map(|(name, op)| (*name, op.arity))
            .collect()
    }

    /// Run one named operation against `store`.
    pub fn invoke(&self, store: &dyn LedgerStore, operation: &str, args: &[String]) -> Response {
        debug!(operation, args = args.len(), "routing operation");
        let envelope = match self.operations.get(operation) {
            Some(op) => self.execute(store, operation, *op, args),
            None => {
                warn!(operation, "rejected unsupported operation");
                let err = OperationError::UnsupportedOperation(operation.to_string());
                ResponseEnvelope::from(&err)
            }
        };
        Response::from_envelope(&envelope)
    }

    /// Seed path run once before any operation is dispatched.
    ///
    /// Same argument shape, validation and failure semantics as `create`.
    pub fn init(&self, store: &dyn LedgerStore, args: &[String]) -> Response {
        let op = Operation {
            arity: 5,
            handler: create,
        };
        Response::from_envelope(&self.execute(store, OP_INIT, op, args))
    }

    fn execute(
        &self,
        store: &dyn LedgerStore,
        name: &str,
        op: Operation,
        args: &[String],
    ) -> ResponseEnvelope {
        let invocation = Invocation {
            store,
            queries: &self.queries,
        };
        let outcome = validate_arg_count(name, args, op.arity)
            .and_then(|()| (op.handler)(&invocation, args));
        match outcome {
            Ok(envelope) => envelope,
            Err(err) => {
                debug!(operation = name, code = err.code(), error = %err, "operation failed");
                ResponseEnvelope::error(qualified_message(name, &err), err.code())
            }
        }
    }
}

/// Error text prefixed with the operation name unless the error already carries it.
fn qualified_message(name: &str, err: &OperationError) -> String {
    match err {
        OperationError::Arity { .. } | OperationError::Parse { .. } => err.to_string(),
        other => format!("{}: {}", name, other),
    }
}

fn create(inv: &Invocation<'_>, args: &[String]) -> Result<ResponseEnvelope, OperationError> {
    let key = &args[0];
    let salary = parse_amount(OP_CREATE, &args[3])?;
    let employee = Employee::new(
        args[0].clone(),
        args[1].clone(),
        args[2].clone(),
        salary,
        args[4].clone(),
    );
    RecordAccessor::new(inv.store).create(key, &employee)?;
    info!(key = %key, "employee added");
    Ok(ResponseEnvelope::success(format!(
        "Employee added with employee ID: {}",
        key
    )))
}

fn read_by_key(inv: &Invocation<'_>, args: &[String]) -> Result<ResponseEnvelope, OperationError> {
    let employee = RecordAccessor::new(inv.store).read_one(&args[0])?;
    let payload = serde_json::to_string(&employee)?;
    Ok(ResponseEnvelope::success_with_payload(payload))
}

fn read_by_salary_floor(
    inv: &Invocation<'_>,
    args: &[String],
) -> Result<ResponseEnvelope, OperationError> {
    let amount = parse_amount(OP_READ_BY_SALARY_FLOOR, &args[0])?;
    let document = inv.queries.by_salary_greater_than(amount)?;
    run_query(inv, &document)
}

fn read_by_filter(
    inv: &Invocation<'_>,
    args: &[String],
) -> Result<ResponseEnvelope, OperationError> {
    let document = inv.queries.raw(&args[0]);
    run_query(inv, &document)
}

fn run_query(
    inv: &Invocation<'_>,
    document: &FilterDocument,
) -> Result<ResponseEnvelope, OperationError> {
    let text = document.to_text();
    debug!(query = %text, "executing rich query");
    let rows = inv.store.query_by_filter(&text)?;
    let array = aggregate(rows)?;
    Ok(ResponseEnvelope::success_with_payload(array))
}
