//! Empledger: Deterministic Employee Record Ledger
//!
//! A small transaction engine over an external key-value/document store. Callers
//! invoke named operations; each either creates one employee record or reads records
//! back by key or by rich query, and every outcome is returned as a uniform response
//! envelope.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod query;
pub mod store;
pub mod types;
pub mod validate;

pub use dispatch::{Dispatcher, Response, Status};
pub use envelope::ResponseEnvelope;
pub use store::{LedgerStore, MemoryLedger, RecordAccessor, SledLedger};
pub use types::Employee;
