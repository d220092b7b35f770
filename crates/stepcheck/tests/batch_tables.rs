//! Batch evaluation of data-table rows against documents and variables.

use std::collections::HashMap;

use rstest::{fixture, rstest};
use serde_json::{Value, json};
use serial_test::serial;
use stepcheck::config::{clear_empty_list_is_absent_override, set_empty_list_is_absent};
use stepcheck::datatable::{parse_check_rows, parse_pipe_table};
use stepcheck::{BatchEvaluator, CheckRow, Evaluator, EvaluatorConfig};

#[fixture]
fn response() -> Value {
    json!({
        "status": "Paid",
        "total": "42.50",
        "lines": [
            {"sku": "TEA", "qty": 2},
            {"sku": "CAKE", "qty": 1}
        ],
        "notes": []
    })
}

fn rows(table: &str) -> Vec<CheckRow> {
    let cells = parse_pipe_table(table).unwrap_or_else(|err| panic!("{err}"));
    parse_check_rows(cells).unwrap_or_else(|err| panic!("{err}"))
}

#[rstest]
fn passing_table_yields_every_outcome(response: Value) {
    let checks = rows(
        r#"
        | path             | operator | expected                           |
        | status           | =        | Paid                               |
        | total:decimal    | >=       | 42.5                               |
        | lines[*].sku     | contains | {"ev": ["CAKE"], "inOrder": "no"}  |
        | lines[*].qty     | =        | {"ev": [2, 1]}                     |
        | discount         | not-present |                                 |
        "#,
    );
    let outcomes = BatchEvaluator::default()
        .run(&response, &checks)
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(outcomes.len(), 5);
}

#[rstest]
fn failing_row_reports_its_position(response: Value) {
    let checks = rows(
        "
        | status | =  | Paid |
        | total  | <  | 10   |
        | nope   | ~~ | 1    |
        ",
    );
    let Err(err) = BatchEvaluator::default().run(&response, &checks) else {
        panic!("second row should fail");
    };
    assert_eq!(err.row, 2);
    assert_eq!(
        err.to_string(),
        "check 2 (total) failed: value at 'total': expected < \"10\", actual \"42.50\""
    );
}

#[test]
fn variables_act_as_a_value_source() {
    let mut vars: HashMap<String, Value> = HashMap::new();
    vars.insert("orderId".into(), json!("A-17"));
    vars.insert("order".into(), json!({"lines": 3}));
    let checks = rows(
        "
        | variable    | op | value |
        | orderId     | =  | A-17  |
        | order.lines | >  | 2     |
        ",
    );
    let outcomes = BatchEvaluator::default()
        .run(&vars, checks.iter())
        .unwrap_or_else(|err| panic!("{err}"));
    assert!(outcomes.iter().all(|outcome| outcome.passed()));
}

#[rstest]
#[serial]
fn empty_list_presence_follows_process_flag(response: Value) {
    let checks = rows("| notes | present | |");
    set_empty_list_is_absent(true);
    let strict = BatchEvaluator::new(Evaluator::new(EvaluatorConfig::default()));
    assert!(strict.run(&response, &checks).is_err());
    set_empty_list_is_absent(false);
    let lenient = BatchEvaluator::new(Evaluator::new(EvaluatorConfig::default()));
    assert!(lenient.run(&response, &checks).is_ok());
    clear_empty_list_is_absent_override();
}
