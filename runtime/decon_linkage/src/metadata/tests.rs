#![allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]

use super::*;
use decon_ir::{Field, InvocationErrorKind};
use pretty_assertions::assert_eq;

/// `class Temperature { double celsius; }`
fn temperature() -> Class {
    Class::plain("Temperature", None, vec![Field::new("celsius", Type::DOUBLE)])
}

fn celsius(target: &Value) -> f64 {
    target.field(0).and_then(Value::as_double).unwrap_or_default()
}

#[test]
fn test_total_deconstructor() {
    let class = temperature();
    let info = DeconstructorInfo::new(
        Type::Class(class.clone()),
        vec![
            BindingInfo::new("celsius", Type::DOUBLE),
            BindingInfo::new("fahrenheit", Type::DOUBLE),
        ],
        RawDigester::total(|target| {
            let c = celsius(target);
            vec![Value::Double(c), Value::Double(c * 9.0 / 5.0 + 32.0)]
        }),
    );
    let pattern = info.into_pattern().unwrap();
    assert!(pattern.descriptor().is_total());
    assert_eq!(pattern.descriptor().bindings(), &[Type::DOUBLE, Type::DOUBLE]);

    let t = class.instantiate(vec![Value::Double(100.0)]).unwrap();
    assert_eq!(
        pattern.match_bindings(&t).unwrap(),
        Some(vec![Value::Double(100.0), Value::Double(212.0)])
    );
    assert_eq!(pattern.match_bindings(&Value::Null).unwrap(), None);
}

#[test]
fn test_partial_deconstructor() {
    let class = temperature();
    let info = DeconstructorInfo::new(
        Type::Class(class.clone()),
        vec![BindingInfo::new("celsius", Type::DOUBLE)],
        RawDigester::partial(|target| {
            let c = celsius(target);
            (c < 0.0).then(|| vec![Value::Double(c)])
        }),
    );
    let frozen = info.into_pattern().unwrap();
    assert!(!frozen.descriptor().is_total());

    let cold = class.instantiate(vec![Value::Double(-5.0)]).unwrap();
    let warm = class.instantiate(vec![Value::Double(20.0)]).unwrap();
    assert_eq!(frozen.match_bindings(&cold).unwrap(), Some(vec![Value::Double(-5.0)]));
    assert_eq!(frozen.match_bindings(&warm).unwrap(), None);
}

#[test]
fn test_digester_output_is_checked() {
    let class = temperature();
    let wrong_type = DeconstructorInfo::new(
        Type::Class(class.clone()),
        vec![BindingInfo::new("celsius", Type::DOUBLE)],
        RawDigester::total(|_| vec![Value::string("hot")]),
    )
    .into_pattern()
    .unwrap();
    let t = class.instantiate(vec![Value::Double(1.0)]).unwrap();
    let err = wrong_type.try_match(&t).unwrap_err();
    assert!(matches!(err.kind, InvocationErrorKind::BindingType { .. }));

    let wrong_count = DeconstructorInfo::new(
        Type::Class(class),
        vec![BindingInfo::new("celsius", Type::DOUBLE)],
        RawDigester::total(|_| Vec::new()),
    )
    .into_pattern()
    .unwrap();
    let err = wrong_count.try_match(&t).unwrap_err();
    assert!(matches!(err.kind, InvocationErrorKind::ArgumentCount { .. }));
}

#[test]
fn test_record_deconstructor() {
    let class = Class::record(
        "Pair",
        vec![Field::new("left", Type::Str), Field::new("right", Type::INT)],
    );
    let info = DeconstructorInfo::for_record(&class);
    assert_eq!(
        info.bindings,
        vec![
            BindingInfo::new("left", Type::Str),
            BindingInfo::new("right", Type::INT),
        ]
    );

    let pattern = info.into_pattern().unwrap();
    let pair = class
        .instantiate(vec![Value::string("l"), Value::Int(2)])
        .unwrap();
    assert_eq!(
        pattern.match_bindings(&pair).unwrap(),
        Some(vec![Value::string("l"), Value::Int(2)])
    );
}
