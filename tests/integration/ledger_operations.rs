//! End-to-end operation tests against the in-memory ledger

use super::test_utils::{args, body, ids, seed};
use empledger::{Dispatcher, Employee, LedgerStore, MemoryLedger, Status};

const STAFF: &[[&str; 5]] = &[
    ["E1", "Ann", "Eng", "50000", "NY"],
    ["E2", "Bob", "Ops", "70000.5", "LA"],
    ["E3", "Cy", "Eng", "-250", "SF"],
    ["E4", "Di", "Eng", "0.25", "NY"],
];

#[test]
fn test_create_then_read_by_key() {
    let store = MemoryLedger::new();
    let dispatcher = Dispatcher::default();

    let created = dispatcher.invoke(&store, "create", &args(&["E1", "Ann", "Eng", "50000", "NY"]));
    assert_eq!(created.status, Status::Success);
    let created_body = body(&created);
    assert_eq!(created_body["OK"], true);
    assert_eq!(created_body["code"], "");

    let read = dispatcher.invoke(&store, "readByKey", &args(&["E1"]));
    assert_eq!(read.status, Status::Success);
    let read_body = body(&read);
    assert_eq!(read_body["OK"], true);
    let employee: Employee = serde_json::from_value(read_body["message"].clone()).unwrap();
    assert_eq!(employee, Employee::new("E1", "Ann", "Eng", 50000.0, "NY"));
}

#[test]
fn test_duplicate_create_fails_and_keeps_value() {
    let store = MemoryLedger::new();
    let dispatcher = Dispatcher::default();
    seed(&dispatcher, &store, &[["E1", "Ann", "Eng", "50000", "NY"]]);
    let before = store.get_state("E1").unwrap();

    let again = dispatcher.invoke(&store, "create", &args(&["E1", "Zed", "Ops", "1", "LA"]));
    assert_eq!(again.status, Status::Failure);
    let again_body = body(&again);
    assert_eq!(again_body["OK"], false);
    assert_eq!(again_body["code"], "ALREADY_EXISTS");
    assert!(again_body["message"].as_str().unwrap().contains("already exists"));

    assert_eq!(store.get_state("E1").unwrap(), before);
}

#[test]
fn test_read_missing_and_empty_keys() {
    let store = MemoryLedger::new();
    let dispatcher = Dispatcher::default();
    store.put_state("EMPTY", b"").unwrap();

    for key in ["NOPE", "EMPTY"] {
        let response = dispatcher.invoke(&store, "readByKey", &args(&[key]));
        assert_eq!(response.status, Status::Failure);
        assert_eq!(body(&response)["code"], "NOT_FOUND");
    }
}

#[test]
fn test_salary_floor_is_strict() {
    let store = MemoryLedger::new();
    let dispatcher = Dispatcher::default();
    seed(&dispatcher, &store, STAFF);

    let at_boundary = dispatcher.invoke(&store, "readBySalaryFloor", &args(&["50000"]));
    assert_eq!(ids(&at_boundary), vec!["E2"]);

    let negative = dispatcher.invoke(&store, "readBySalaryFloor", &args(&["-250.5"]));
    assert_eq!(ids(&negative), vec!["E1", "E2", "E3", "E4"]);

    let fractional = dispatcher.invoke(&store, "readBySalaryFloor", &args(&["0.25"]));
    assert_eq!(ids(&fractional), vec!["E1", "E2"]);

    let none = dispatcher.invoke(&store, "readBySalaryFloor", &args(&["1e9"]));
    assert_eq!(body(&none)["message"], serde_json::json!([]));
}

#[test]
fn test_raw_filter_query() {
    let store = MemoryLedger::new();
    let dispatcher = Dispatcher::default();
    seed(&dispatcher, &store, STAFF);

    let response = dispatcher.invoke(
        &store,
        "readByFilter",
        &args(&[r#"{"selector":{"department":"Eng","location":"NY"}}"#]),
    );
    assert_eq!(ids(&response), vec!["E1", "E4"]);
}

#[test]
fn test_query_skips_blank_values() {
    let store = MemoryLedger::new();
    let dispatcher = Dispatcher::default();
    seed(&dispatcher, &store, &[["E1", "Ann", "Eng", "50000", "NY"]]);
    store.put_state("E0", b"   ").unwrap();

    let response = dispatcher.invoke(&store, "readByFilter", &args(&[r#"{"selector":{}}"#]));
    assert_eq!(ids(&response), vec!["E1"]);
}

#[test]
fn test_unknown_operation() {
    let store = MemoryLedger::new();
    let response = Dispatcher::default().invoke(&store, "doesNotExist", &[]);
    assert_eq!(response.status, Status::Failure);
    assert_eq!(body(&response)["code"], "UNSUPPORTED_OPERATION");
}

#[test]
fn test_malformed_salary() {
    let store = MemoryLedger::new();
    let response =
        Dispatcher::default().invoke(&store, "create", &args(&["E1", "Ann", "Eng", "abc", "NY"]));
    assert_eq!(response.status, Status::Failure);
    let response_body = body(&response);
    assert_eq!(response_body["OK"], false);
    assert!(response_body["message"].as_str().unwrap().contains("abc"));
    assert!(store.is_empty());
}

#[test]
fn test_non_finite_salary_is_never_stored() {
    let store = MemoryLedger::new();
    let dispatcher = Dispatcher::default();
    for salary in ["inf", "-infinity", "NaN"] {
        let response = dispatcher.invoke(&store, "create", &args(&["E1", "Ann", "Eng", salary, "NY"]));
        assert_eq!(response.status, Status::Failure, "salary {}", salary);
        assert_eq!(body(&response)["code"], "PARSE");
    }
    assert!(store.is_empty());

    // The key stays free for a valid record that reads back intact.
    seed(&dispatcher, &store, &[["E1", "Ann", "Eng", "1.5", "NY"]]);
    let read = dispatcher.invoke(&store, "readByKey", &args(&["E1"]));
    assert_eq!(body(&read)["message"]["salary"], 1.5);
}

#[test]
fn test_whitespace_in_numbers_is_not_trimmed() {
    let store = MemoryLedger::new();
    let response = Dispatcher::default().invoke(&store, "readBySalaryFloor", &args(&[" 10"]));
    assert_eq!(body(&response)["code"], "PARSE");
}
