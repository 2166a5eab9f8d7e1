//! End-to-end behavior of patterns, combinators, dispatch and linkage
//! through the public API of every runtime crate.

#![allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
#![allow(clippy::approx_constant, reason = "3.14 is a binding value, not pi")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use decon_ir::{
    Class, ConstructionErrorKind, Field, InvocationErrorKind, Prim, Type, Value,
};
use decon_linkage::{
    component_handle, init_tracing, match_handle, switch_bootstrap, MemberKey, PatternRegistry,
};
use decon_patterns::{Pattern, Projection};
use decon_switch::{SwitchCases, TypeLabel};
use pretty_assertions::assert_eq;

fn r_class() -> Class {
    Class::record(
        "R",
        vec![
            Field::new("x", Type::INT),
            Field::new("s", Type::Str),
            Field::new("d", Type::DOUBLE),
        ],
    )
}

fn rr_class(r: &Class) -> Class {
    Class::record(
        "RR",
        vec![
            Field::new("r1", Type::Class(r.clone())),
            Field::new("r2", Type::Class(r.clone())),
        ],
    )
}

fn r(class: &Class, x: i32, s: &str, d: f64) -> Value {
    class
        .instantiate(vec![Value::Int(x), Value::string(s), Value::Double(d)])
        .unwrap()
}

fn lazy(class: &Class) -> Pattern {
    Pattern::of_lazy_projection(Type::Class(class.clone()), Projection::components(class)).unwrap()
}

fn eager(class: &Class) -> Pattern {
    Pattern::of_eager_projection(Type::Class(class.clone()), Projection::components(class)).unwrap()
}

#[test]
fn test_bindings_follow_descriptor() {
    init_tracing();
    let r_class = r_class();
    let target = r(&r_class, 1, "one", 1.0);
    let patterns = [
        lazy(&r_class),
        eager(&r_class),
        lazy(&r_class).drop_bindings(&[1]).unwrap(),
        Pattern::of_type(Type::Object),
        Pattern::of_type_for(Type::Class(r_class.clone()), &Type::Object).unwrap(),
        Pattern::of_constant_for(target.clone(), &Type::Object).unwrap(),
    ];
    for pattern in &patterns {
        let bindings = pattern.match_bindings(&target).unwrap().unwrap();
        assert_eq!(bindings.len(), pattern.arity(), "{}", pattern.descriptor());
        for (value, ty) in bindings.iter().zip(pattern.descriptor().bindings()) {
            assert!(value.conforms_to(ty), "{value} is not a {ty}");
        }
    }
}

#[test]
fn test_type_pattern() {
    let strings = Pattern::of_type(Type::Str);
    assert_eq!(
        strings.match_bindings(&Value::string("foo")).unwrap(),
        Some(vec![Value::string("foo")])
    );
    assert_eq!(strings.match_bindings(&Value::Null).unwrap(), None);

    let err = strings.try_match(&Value::Int(3)).unwrap_err();
    assert!(matches!(err.kind, InvocationErrorKind::TargetType { .. }));
    let err = strings
        .try_match_exact(&Type::Object, &Value::Int(3))
        .unwrap_err();
    assert!(matches!(err.kind, InvocationErrorKind::StaticType { .. }));
}

#[test]
fn test_nullable_type_pattern() {
    let nullable = Pattern::of_type_nullable(Type::Str);
    assert_eq!(
        nullable.match_bindings(&Value::Null).unwrap(),
        Some(vec![Value::Null])
    );
    assert_eq!(Pattern::of_type(Type::Str).match_bindings(&Value::Null).unwrap(), None);
}

#[test]
fn test_adaptation_round_trip() {
    let strings = Pattern::of_type(Type::Str);
    let round_trip = strings
        .adapt_target(&Type::Object)
        .unwrap()
        .adapt_target(&Type::Str)
        .unwrap();
    for target in [Value::string("Foo"), Value::Null] {
        assert_eq!(
            round_trip.match_bindings(&target).unwrap(),
            strings.match_bindings(&target).unwrap()
        );
    }
    assert_eq!(round_trip.target(), &Type::Str);
    assert_eq!(round_trip.descriptor(), strings.descriptor());
}

#[test]
fn test_nested_record_patterns() {
    let r_class = r_class();
    let rr_class = rr_class(&r_class);
    let r1 = r(&r_class, 1, "two", 3.14);
    let r2 = r(&r_class, 2, "four", 6.0);
    let target = rr_class.instantiate(vec![r1.clone(), r2.clone()]).unwrap();

    let nested = lazy(&rr_class).nested(&[Some(lazy(&r_class))]).unwrap();
    assert_eq!(nested.arity(), 5);
    assert_eq!(
        nested.match_bindings(&target).unwrap(),
        Some(vec![
            r1,
            r2,
            Value::Int(1),
            Value::string("two"),
            Value::Double(3.14),
        ])
    );
}

#[test]
fn test_drop_bindings() {
    let r_class = r_class();
    let target = r(&r_class, 5, "five", 5.5);
    let pattern = lazy(&r_class);

    let once = pattern.drop_bindings(&[0]).unwrap();
    let twice = pattern.drop_bindings(&[0, 0]).unwrap();
    assert_eq!(once.descriptor(), twice.descriptor());
    assert_eq!(
        once.match_bindings(&target).unwrap(),
        twice.match_bindings(&target).unwrap()
    );
    assert_eq!(
        once.match_bindings(&target).unwrap(),
        Some(vec![Value::string("five"), Value::Double(5.5)])
    );

    for index in [-1, 3] {
        let err = pattern.drop_bindings(&[index]).unwrap_err();
        assert!(matches!(err.kind, ConstructionErrorKind::IndexOutOfBounds { .. }));
    }
}

#[test]
fn test_carrier_identity() {
    let r_class = r_class();
    let target = r(&r_class, 1, "a", 2.0);

    let carrier = eager(&r_class).try_match(&target).unwrap().unwrap();
    assert!(!carrier.is_target(&target));

    let carrier = lazy(&r_class).try_match(&target).unwrap().unwrap();
    assert!(carrier.is_target(&target));
}

#[test]
fn test_compose_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let length = Pattern::of_type(Type::Str)
        .adapt_target(&Type::Object)
        .unwrap()
        .compose(move |bindings| {
            counter.fetch_add(1, Ordering::SeqCst);
            bindings[0].as_str().map_or(0, str::len)
        });

    assert_eq!(length(&Value::Int(1)).unwrap(), None);
    assert_eq!(length(&Value::Null).unwrap(), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(length(&Value::string("four")).unwrap(), Some(4));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_int_switch() {
    let dispatcher = switch_bootstrap(
        Type::Boxed(Prim::Int),
        SwitchCases::Ints(vec![8, 6, 7, 5, 3, 0, 9]),
    )
    .unwrap();
    assert_eq!(dispatcher.index_of(&Value::Int(7)).unwrap(), 2);
    assert_eq!(dispatcher.index_of(&Value::Int(42)).unwrap(), 7);
    assert_eq!(dispatcher.index_of(&Value::Null).unwrap(), -1);
}

#[test]
fn test_string_switch_with_collision() {
    let dispatcher = switch_bootstrap(
        Type::Str,
        SwitchCases::Strings(vec![Some("Ba".to_string()), Some("CB".to_string())]),
    )
    .unwrap();
    assert_eq!(dispatcher.index_of(&Value::string("Ba")).unwrap(), 0);
    assert_eq!(dispatcher.index_of(&Value::string("CB")).unwrap(), 1);
    assert_eq!(dispatcher.index_of(&Value::string("zz")).unwrap(), 2);
}

#[test]
fn test_float_switch_by_representation() {
    let dispatcher = switch_bootstrap(
        Type::Boxed(Prim::Float),
        SwitchCases::Floats(vec![0.0, -0.0, f32::NAN]),
    )
    .unwrap();
    assert_eq!(dispatcher.index_of(&Value::Float(-0.0)).unwrap(), 1);
    assert_eq!(dispatcher.index_of(&Value::Float(f32::NAN)).unwrap(), 2);
    assert_eq!(dispatcher.index_of(&Value::Float(0.0)).unwrap(), 0);
}

#[test]
fn test_enum_switch_rejects_unknown_constant() {
    let color = Type::Class(Class::enumeration("Color", ["RED", "GREEN"]));
    let err = switch_bootstrap(
        color.clone(),
        SwitchCases::Enum {
            enum_type: color,
            labels: vec![Some("RED".to_string()), Some("PURPLE".to_string())],
        },
    )
    .unwrap_err();
    assert!(matches!(err.kind, ConstructionErrorKind::UnknownEnumConstant { .. }));
}

#[test]
fn test_type_switch_restart() {
    let dispatcher = decon_switch::TypeSwitch::new(
        Type::Object,
        vec![
            TypeLabel::Type(Type::Str),
            TypeLabel::Str("b".to_string()),
        ],
    )
    .unwrap();
    let b = Value::string("b");
    assert_eq!(dispatcher.dispatch_from(&b, 0).unwrap().index(), 0);
    assert_eq!(dispatcher.dispatch_from(&b, 1).unwrap().index(), 1);
    assert_eq!(dispatcher.dispatch_from(&b, 2).unwrap().index(), 2);
}

#[test]
fn test_named_lookup_feeds_switch() {
    let r_class = r_class();
    let owner = Type::Class(r_class.clone());
    let key = MemberKey::deconstructor(owner, vec![Type::INT, Type::Str, Type::DOUBLE]);
    let deconstructor = PatternRegistry::global().find_named(&key).unwrap();

    let dispatcher = switch_bootstrap(
        Type::Object,
        SwitchCases::Patterns(vec![Pattern::of_type(Type::Str), deconstructor.clone()]),
    )
    .unwrap();
    let target = r(&r_class, 9, "nine", 9.5);
    let dispatch = dispatcher.dispatch(&target).unwrap();
    assert_eq!(dispatch.index(), 1);

    let carrier = dispatch.carrier().unwrap();
    let s = component_handle(&deconstructor, 1).unwrap().invoke(carrier).unwrap();
    assert_eq!(s, Value::string("nine"));

    let direct = match_handle(&deconstructor).invoke(&target).unwrap().unwrap();
    assert_eq!(deconstructor.extract(&direct).unwrap().len(), 3);
}
