//! Property-based tests for determinism and query guarantees

use empledger::query::{aggregate, QueryBuilder};
use empledger::types::KeyValue;
use empledger::{Dispatcher, Employee, LedgerStore, MemoryLedger};
use proptest::prelude::*;

fn salaries() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e7f64..1.0e7f64, 0..12)
}

fn populated(salaries: &[f64]) -> MemoryLedger {
    let store = MemoryLedger::new();
    let dispatcher = Dispatcher::default();
    for (i, salary) in salaries.iter().enumerate() {
        let args = vec![
            format!("E{:03}", i),
            "Name".to_string(),
            "Dept".to_string(),
            salary.to_string(),
            "Loc".to_string(),
        ];
        assert!(dispatcher.invoke(&store, "create", &args).is_success());
    }
    store
}

proptest! {
    /// readBySalaryFloor(x) returns exactly the records with salary > x
    #[test]
    fn salary_floor_selects_strictly_greater(values in salaries(), bound in -1.0e7f64..1.0e7f64) {
        let store = populated(&values);
        let response = Dispatcher::default().invoke(&store, "readBySalaryFloor", &[bound.to_string()]);
        prop_assert!(response.is_success());

        let body: serde_json::Value = serde_json::from_str(&response.payload).unwrap();
        let returned: Vec<Employee> = serde_json::from_value(body["message"].clone()).unwrap();
        let expected: Vec<String> = values
            .iter()
            .enumerate()
            .filter(|(_, s)| **s > bound)
            .map(|(i, _)| format!("E{:03}", i))
            .collect();
        let got: Vec<String> = returned.into_iter().map(|e| e.id).collect();
        prop_assert_eq!(got, expected);
    }

    /// Same store state and arguments give identical output text and mutations
    #[test]
    fn invocations_are_deterministic(values in salaries(), bound in any::<f64>()) {
        let first = populated(&values);
        let second = populated(&values);
        let dispatcher = Dispatcher::default();
        let args = vec![bound.to_string()];
        prop_assert_eq!(
            dispatcher.invoke(&first, "readBySalaryFloor", &args),
            dispatcher.invoke(&second, "readBySalaryFloor", &args)
        );
        for i in 0..values.len() {
            let key = format!("E{:03}", i);
            prop_assert_eq!(first.get_state(&key).unwrap(), second.get_state(&key).unwrap());
        }
    }

    /// Every finite bound yields a parseable filter document carrying the exact bound
    #[test]
    fn salary_document_is_valid_json(bound in any::<f64>().prop_filter("finite", |b| b.is_finite())) {
        let text = QueryBuilder::default().by_salary_greater_than(bound).unwrap().to_text();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(doc["selector"]["salary"]["$gt"].as_f64(), Some(bound));
    }

    /// Aggregation keeps non-blank entries in order with no stray separators
    #[test]
    fn aggregate_is_order_preserving(entries in prop::collection::vec(prop::option::of("[ a-z0-9]{0,4}"), 0..10)) {
        let rows: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, v)| Ok(KeyValue { key: i.to_string(), value: v.clone() }))
            .collect();
        let kept: Vec<&str> = entries
            .iter()
            .filter_map(|v| v.as_deref())
            .filter(|v| !v.trim().is_empty())
            .collect();
        prop_assert_eq!(aggregate(rows).unwrap(), format!("[{}]", kept.join(",")));
    }
}
