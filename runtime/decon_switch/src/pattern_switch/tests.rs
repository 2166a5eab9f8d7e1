#![allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]

use super::*;
use decon_ir::{Class, ConstructionErrorKind, Field};
use decon_patterns::Projection;
use pretty_assertions::assert_eq;

fn point() -> Class {
    Class::record(
        "Point",
        vec![Field::new("x", Type::INT), Field::new("y", Type::INT)],
    )
}

fn point_pattern(class: &Class) -> Pattern {
    Pattern::of_lazy_projection(Type::Class(class.clone()), Projection::components(class)).unwrap()
}

fn switch(class: &Class, catch_all: bool) -> PatternSwitch {
    let mut cases = vec![Pattern::of_type(Type::Str), point_pattern(class)];
    if catch_all {
        cases.push(Pattern::of_type(Type::Object));
    }
    PatternSwitch::new(Type::Object, &cases).unwrap()
}

#[test]
fn test_first_matching_case() {
    let class = point();
    let switch = switch(&class, false);
    let p = class.instantiate(vec![Value::Int(1), Value::Int(2)]).unwrap();

    assert_eq!(switch.index_of(&Value::string("hi")).unwrap(), 0);
    assert_eq!(switch.index_of(&p).unwrap(), 1);
    assert_eq!(switch.index_of(&Value::Int(5)).unwrap(), 2);
    assert_eq!(switch.index_of(&Value::Null).unwrap(), -1);
}

#[test]
fn test_winning_carrier_is_returned() {
    let class = point();
    let switch = switch(&class, true);
    let p = class.instantiate(vec![Value::Int(3), Value::Int(4)]).unwrap();

    let dispatch = switch.dispatch(&p).unwrap();
    assert_eq!(dispatch.index(), 1);
    assert!(dispatch.carrier().is_some());
    assert_eq!(
        switch.extract(&dispatch).unwrap(),
        Some(vec![Value::Int(3), Value::Int(4)])
    );

    let dispatch = switch.dispatch(&Value::Long(9)).unwrap();
    assert_eq!(dispatch.index(), 2);
    assert_eq!(switch.extract(&dispatch).unwrap(), Some(vec![Value::Long(9)]));
}

#[test]
fn test_no_carrier_without_a_match() {
    let class = point();
    let switch = switch(&class, false);

    let dispatch = switch.dispatch(&Value::Int(5)).unwrap();
    assert!(dispatch.carrier().is_none());
    assert_eq!(switch.extract(&dispatch).unwrap(), None);

    let dispatch = switch.dispatch(&Value::Null).unwrap();
    assert!(dispatch.is_null());
    assert_eq!(dispatch.index(), Dispatch::NULL_INDEX);
    assert_eq!(switch.extract(&dispatch).unwrap(), None);
}

#[test]
fn test_restart_after_rejected_case() {
    let class = point();
    let switch = switch(&class, true);
    let hi = Value::string("hi");
    assert_eq!(switch.dispatch_from(&hi, 1).unwrap().index(), 2);
    assert_eq!(switch.dispatch_from(&hi, 3).unwrap().index(), 3);
}

#[test]
fn test_cases_are_retargeted() {
    let class = point();
    let switch = switch(&class, true);
    for index in 0..switch.case_count() {
        assert_eq!(switch.case(index).unwrap().target(), &Type::Object);
    }
    assert!(switch.case(3).is_none());
    assert!(!switch.case(0).unwrap().descriptor().is_total());
}

#[test]
fn test_incompatible_case_fails_the_build() {
    let class = point();
    let err = PatternSwitch::new(Type::Str, &[point_pattern(&class)]).unwrap_err();
    assert!(matches!(err.kind, ConstructionErrorKind::IncompatibleTarget { .. }));
}

#[test]
fn test_target_must_conform() {
    let switch = PatternSwitch::new(Type::Str, &[Pattern::of_type(Type::Str)]).unwrap();
    assert!(switch.dispatch(&Value::Int(1)).is_err());
}

#[test]
fn test_primitive_static_type() {
    let cases = [
        Pattern::of_constant(Value::Int(7)),
        Pattern::of_type(Type::INT),
    ];
    let switch = PatternSwitch::new(Type::INT, &cases).unwrap();
    assert_eq!(switch.index_of(&Value::Int(7)).unwrap(), 0);
    assert_eq!(switch.index_of(&Value::Int(8)).unwrap(), 1);
}
