//! Behavioural properties of the evaluator across modes.

use rstest::{fixture, rstest};
use serde_json::{Value, json};
use stepcheck::{
    ConfigError, EvaluationError, Evaluator, EvaluatorConfig, Mode, RawMatchSpec, TypedPath,
};

#[fixture]
fn evaluator() -> Evaluator {
    Evaluator::new(EvaluatorConfig {
        empty_list_is_absent: false,
    })
}

fn passes(evaluator: &Evaluator, actual: &Value, operator: &str, spec: &str) -> bool {
    evaluator
        .evaluate(
            Mode::Report,
            &TypedPath::parse("value"),
            actual,
            operator,
            &RawMatchSpec::from(spec),
        )
        .unwrap_or_else(|err| panic!("{operator} {spec}: {err}"))
        .passed()
}

#[rstest]
fn repeated_evaluation_is_idempotent(evaluator: Evaluator) {
    let actual = json!(["x", "y"]);
    let first = evaluator.evaluate(
        Mode::Report,
        &TypedPath::parse("tags"),
        &actual,
        "contains",
        &RawMatchSpec::from("y"),
    );
    let second = evaluator.evaluate(
        Mode::Report,
        &TypedPath::parse("tags"),
        &actual,
        "contains",
        &RawMatchSpec::from("y"),
    );
    assert_eq!(
        first.unwrap_or_else(|err| panic!("{err}")),
        second.unwrap_or_else(|err| panic!("{err}"))
    );
}

#[rstest]
#[case(json!(5))]
#[case(json!("5"))]
fn integer_and_numeric_text_compare_equal(evaluator: Evaluator, #[case] actual: Value) {
    assert!(passes(&evaluator, &actual, "=", "5"));
}

#[rstest]
#[case(r#"{"ev": ["a", "c"], "inOrder": true}"#, true)]
#[case(r#"{"ev": ["c", "a"], "inOrder": true}"#, false)]
#[case(r#"{"ev": ["c", "a"], "inOrder": false}"#, true)]
fn list_containment_respects_order(
    evaluator: Evaluator,
    #[case] spec: &str,
    #[case] expected: bool,
) {
    assert_eq!(passes(&evaluator, &json!(["a", "b", "c"]), "contains", spec), expected);
}

#[rstest]
fn case_sensitivity_is_opt_out(evaluator: Evaluator) {
    assert!(passes(&evaluator, &json!("HELLO"), "=", r#"{"ev": "hello", "ignoreCase": true}"#));
    assert!(!passes(&evaluator, &json!("HELLO"), "=", r#"{"ev": "hello"}"#));
}

#[rstest]
fn presence_of_null(evaluator: Evaluator) {
    assert!(!passes(&evaluator, &Value::Null, "present", "{}"));
    assert!(passes(&evaluator, &Value::Null, "not-present", "{}"));
}

#[rstest]
fn malformed_spec_is_lenient_only_in_report_api(evaluator: Evaluator) {
    let path = TypedPath::parse("value");
    let spec = RawMatchSpec::from(r#"{"ev": "x", "bogus": 1}"#);
    assert!(!evaluator.check(&path, &json!("x"), "=", &spec));
    let result = evaluator.assert(&path, &json!("x"), "=", &spec);
    assert!(matches!(
        result,
        Err(EvaluationError::Config(ConfigError::MalformedSpec { .. }))
    ));
}

#[rstest]
fn config_errors_are_never_negated(evaluator: Evaluator) {
    let path = TypedPath::parse("value");
    let spec = RawMatchSpec::from(r#"{"ev": "x", "textMatchMechanism": "fuzzy"}"#);
    for operator in ["=", "!="] {
        let result = evaluator.evaluate(Mode::Report, &path, &json!("y"), operator, &spec);
        assert!(
            matches!(result, Err(ref err) if err.is_config()),
            "{operator} should surface the unknown strategy"
        );
    }
}

#[rstest]
#[case(json!(10), ">", "9", true)]
#[case(json!("10"), "<=", "10.0", true)]
#[case(json!(1.5), "<", "1.25", false)]
#[case(json!("ten"), ">", "9", false)]
#[case(json!(1e30), ">", "5", true)]
#[case(json!(-1e29), "<", "0", true)]
#[case(json!("2e30"), ">=", "1e30", true)]
#[case(json!(1e30), "=", "1e30", true)]
fn relational_operators_compare_numerically(
    evaluator: Evaluator,
    #[case] actual: Value,
    #[case] operator: &str,
    #[case] spec: &str,
    #[case] expected: bool,
) {
    assert_eq!(passes(&evaluator, &actual, operator, spec), expected);
}

#[rstest]
fn non_numeric_operand_is_reported(evaluator: Evaluator) {
    let outcome = evaluator
        .evaluate(
            Mode::Report,
            &TypedPath::parse("name"),
            &json!("ten"),
            ">",
            &RawMatchSpec::from("9"),
        )
        .unwrap_or_else(|err| panic!("{err}"));
    assert!(outcome.message().is_some_and(|m| m.ends_with("(non-numeric operand)")));
}

#[rstest]
#[case(r#"{"ev": "^ord-\\d+$", "textMatchMechanism": "regex"}"#, "ord-17", true)]
#[case(r#"{"ev": "ORD", "textMatchMechanism": "starts-with-ignore-case"}"#, "ord-17", true)]
#[case(r#"{"ev": "17", "textMatchMechanism": "ends-with"}"#, "ord-17", true)]
#[case(r#"{"ev": "d-1", "textMatchMechanism": "contains"}"#, "ord-17", true)]
#[case(r#"{"ev": "17", "textMatchMechanism": "starts-with"}"#, "ord-17", false)]
fn strategies_apply_to_equality(
    evaluator: Evaluator,
    #[case] spec: &str,
    #[case] actual: &str,
    #[case] expected: bool,
) {
    assert_eq!(passes(&evaluator, &json!(actual), "=", spec), expected);
}

#[rstest]
fn occurrence_counts_substrings(evaluator: Evaluator) {
    assert!(passes(&evaluator, &json!("a,b,a"), "contains", r#"{"ev": "a", "n": 2}"#));
    assert!(!passes(&evaluator, &json!("a,b,a"), "contains", r#"{"ev": "a", "n": "1"}"#));
}

#[rstest]
fn scalar_actual_against_list_expected_is_promoted(evaluator: Evaluator) {
    assert!(passes(&evaluator, &json!("a"), "contains", r#"{"ev": ["a"]}"#));
    assert!(passes(&evaluator, &json!(["a"]), "=", "a"));
}

#[rstest]
fn element_origin_changes_wording_only(evaluator: Evaluator) {
    let path = TypedPath::parse("#banner").with_origin(stepcheck::ValueOrigin::Element);
    let hello = RawMatchSpec::from("Hello");
    let Err(err) = evaluator.assert(&path, &json!("Welcome"), "=", &hello) else {
        panic!("mismatch expected");
    };
    assert_eq!(
        err.to_string(),
        "element '#banner': expected = \"Hello\", actual \"Welcome\""
    );
}
