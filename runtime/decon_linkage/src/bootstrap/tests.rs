#![allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]

use super::*;
use decon_ir::{Prim, Value};
use decon_patterns::Pattern;

#[test]
fn test_label_switch() {
    let dispatcher = switch_bootstrap(
        Type::Boxed(Prim::Int),
        SwitchCases::Ints(vec![8, 6, 7, 5, 3, 0, 9]),
    )
    .unwrap();
    assert_eq!(dispatcher.case_count(), 7);
    assert_eq!(dispatcher.index_of(&Value::Int(7)).unwrap(), 2);
    assert_eq!(dispatcher.index_of(&Value::Int(42)).unwrap(), 7);
    assert_eq!(dispatcher.index_of(&Value::Null).unwrap(), -1);
}

#[test]
fn test_pattern_switch_returns_carrier() {
    let dispatcher = switch_bootstrap(
        Type::Object,
        SwitchCases::Patterns(vec![
            Pattern::of_type(Type::Str),
            Pattern::of_type(Type::Number),
        ]),
    )
    .unwrap();
    let dispatch = dispatcher.dispatch(&Value::Double(1.5)).unwrap();
    assert_eq!(dispatch.index(), 1);
    assert!(dispatch.carrier().is_some_and(|c| c.is_target(&Value::Double(1.5))));
}

#[test]
fn test_invalid_cases_fail() {
    assert!(switch_bootstrap(Type::Str, SwitchCases::Doubles(vec![1.0])).is_err());
}
