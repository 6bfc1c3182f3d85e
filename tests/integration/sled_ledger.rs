//! Operations against the durable sled-backed ledger

use super::test_utils::{args, body, ids, seed};
use empledger::{Dispatcher, SledLedger, Status};
use tempfile::TempDir;

#[test]
fn test_records_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let dispatcher = Dispatcher::default();
    {
        let store = SledLedger::new(temp_dir.path()).unwrap();
        seed(
            &dispatcher,
            &store,
            &[
                ["E1", "Ann", "Eng", "50000", "NY"],
                ["E2", "Bob", "Ops", "70000", "LA"],
            ],
        );
        store.flush().unwrap();
    }

    let store = SledLedger::new(temp_dir.path()).unwrap();
    let read = dispatcher.invoke(&store, "readByKey", &args(&["E2"]));
    assert_eq!(read.status, Status::Success);
    assert_eq!(body(&read)["message"]["name"], "Bob");

    let duplicate = dispatcher.invoke(&store, "create", &args(&["E1", "X", "Y", "1", "Z"]));
    assert_eq!(body(&duplicate)["code"], "ALREADY_EXISTS");
}

#[test]
fn test_filter_skip_and_limit_on_sled() {
    let temp_dir = TempDir::new().unwrap();
    let dispatcher = Dispatcher::default();
    let store = SledLedger::new(temp_dir.path()).unwrap();
    seed(
        &dispatcher,
        &store,
        &[
            ["E4", "Dee", "Eng", "40", "NY"],
            ["E1", "Ann", "Eng", "10", "NY"],
            ["E3", "Cy", "Ops", "30", "LA"],
            ["E2", "Bob", "Eng", "20", "NY"],
            ["E5", "Eve", "Eng", "50", "SF"],
        ],
    );

    let query = r#"{"selector":{"department":"Eng"},"skip":1,"limit":2}"#;
    let page = dispatcher.invoke(&store, "readByFilter", &args(&[query]));
    assert_eq!(page.status, Status::Success);
    assert_eq!(ids(&page), vec!["E2", "E4"]);

    let past_end = r#"{"selector":{"department":"Eng"},"skip":10}"#;
    let empty = dispatcher.invoke(&store, "readByFilter", &args(&[past_end]));
    assert_eq!(body(&empty)["message"], serde_json::json!([]));

    let memory_store = empledger::MemoryLedger::new();
    seed(
        &dispatcher,
        &memory_store,
        &[
            ["E4", "Dee", "Eng", "40", "NY"],
            ["E1", "Ann", "Eng", "10", "NY"],
            ["E3", "Cy", "Ops", "30", "LA"],
            ["E2", "Bob", "Eng", "20", "NY"],
            ["E5", "Eve", "Eng", "50", "SF"],
        ],
    );
    assert_eq!(
        dispatcher.invoke(&memory_store, "readByFilter", &args(&[query])),
        page
    );
}

#[test]
fn test_salary_floor_on_sled_matches_memory() {
    let temp_dir = TempDir::new().unwrap();
    let dispatcher = Dispatcher::default();
    let sled_store = SledLedger::new(temp_dir.path()).unwrap();
    let memory_store = empledger::MemoryLedger::new();
    let rows = [
        ["A", "Ann", "Eng", "10", "NY"],
        ["B", "Bob", "Eng", "20", "NY"],
        ["C", "Cy", "Eng", "30", "NY"],
    ];
    seed(&dispatcher, &sled_store, &rows);
    seed(&dispatcher, &memory_store, &rows);

    let from_sled = dispatcher.invoke(&sled_store, "readBySalaryFloor", &args(&["15"]));
    let from_memory = dispatcher.invoke(&memory_store, "readBySalaryFloor", &args(&["15"]));
    assert_eq!(ids(&from_sled), vec!["B", "C"]);
    assert_eq!(from_sled, from_memory);
}
