//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]

use decon_ir::{Class, Field, Type, Value};

use crate::{Pattern, Projection};

/// `record R(int x, String s, double d)`
pub(crate) fn r_class() -> Class {
    Class::record(
        "R",
        vec![
            Field::new("x", Type::INT),
            Field::new("s", Type::Str),
            Field::new("d", Type::DOUBLE),
        ],
    )
}

/// `record RR(R r1, R r2)`
pub(crate) fn rr_class(r: &Class) -> Class {
    Class::record(
        "RR",
        vec![
            Field::new("r1", Type::Class(r.clone())),
            Field::new("r2", Type::Class(r.clone())),
        ],
    )
}

pub(crate) fn r(class: &Class, x: i32, s: &str, d: f64) -> Value {
    class
        .instantiate(vec![Value::Int(x), Value::string(s), Value::Double(d)])
        .unwrap()
}

pub(crate) fn rr(class: &Class, r1: Value, r2: Value) -> Value {
    class.instantiate(vec![r1, r2]).unwrap()
}

/// Lazy projection over every component of a record.
pub(crate) fn record_pattern(class: &Class) -> Pattern {
    Pattern::of_lazy_projection(Type::Class(class.clone()), Projection::components(class)).unwrap()
}

/// Match and extract, panicking on type errors.
pub(crate) fn bindings(pattern: &Pattern, target: &Value) -> Option<Vec<Value>> {
    pattern.match_bindings(target).unwrap()
}
