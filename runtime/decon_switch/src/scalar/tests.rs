#![allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]

use super::*;
use decon_ir::ConstructionErrorKind;

fn index(switch: &impl Dispatcher, target: Value) -> i32 {
    switch.index_of(&target).unwrap()
}

#[test]
fn test_int_labels() {
    let switch = IntSwitch::new(Type::Boxed(Prim::Int), [8, 6, 7, 5, 3, 0, 9]).unwrap();
    assert_eq!(switch.case_count(), 7);
    assert_eq!(index(&switch, Value::Int(7)), 2);
    assert_eq!(index(&switch, Value::Int(8)), 0);
    assert_eq!(index(&switch, Value::Int(9)), 6);
    assert_eq!(index(&switch, Value::Int(42)), 7);
    assert_eq!(index(&switch, Value::Null), -1);
}

#[test]
fn test_int_first_occurrence_wins() {
    let switch = IntSwitch::new(Type::INT, [1, 2, 1, 2]).unwrap();
    assert_eq!(index(&switch, Value::Int(1)), 0);
    assert_eq!(index(&switch, Value::Int(2)), 1);
    assert_eq!(index(&switch, Value::Int(3)), 4);
}

#[test]
fn test_int_switch_over_narrower_kinds() {
    let chars = IntSwitch::new(Type::CHAR, [i32::from(b'a'), i32::from(b'b')]).unwrap();
    assert_eq!(index(&chars, Value::Char(u16::from(b'b'))), 1);

    let bytes = IntSwitch::new(Type::Boxed(Prim::Byte), [-1, 1]).unwrap();
    assert_eq!(index(&bytes, Value::Byte(-1)), 0);
    assert_eq!(index(&bytes, Value::Null), -1);
}

#[test]
fn test_empty_table() {
    let switch = IntSwitch::new(Type::INT, []).unwrap();
    assert_eq!(index(&switch, Value::Int(0)), 0);
}

#[test]
fn test_static_type_is_checked() {
    let err = IntSwitch::new(Type::LONG, [1]).unwrap_err();
    assert!(matches!(err.kind, ConstructionErrorKind::InvalidSwitchType { switch: "int", .. }));
    assert!(LongSwitch::new(Type::Object, [1]).is_err());
    assert!(FloatSwitch::new(Type::DOUBLE, [1.0]).is_err());

    let switch = IntSwitch::new(Type::INT, [1]).unwrap();
    assert!(switch.index_of(&Value::Long(1)).is_err());
    assert!(switch.index_of(&Value::Null).is_err());
}

#[test]
fn test_long_labels() {
    let switch = LongSwitch::new(Type::Boxed(Prim::Long), [i64::MIN, 0, i64::MAX]).unwrap();
    assert_eq!(index(&switch, Value::Long(i64::MAX)), 2);
    assert_eq!(index(&switch, Value::Long(i64::MIN)), 0);
    assert_eq!(index(&switch, Value::Long(1)), 3);
    assert_eq!(index(&switch, Value::Null), -1);
}

#[test]
fn test_float_labels_use_representation() {
    let switch = FloatSwitch::new(Type::Boxed(Prim::Float), [0.0, -0.0, f32::NAN]).unwrap();
    assert_eq!(index(&switch, Value::Float(0.0)), 0);
    assert_eq!(index(&switch, Value::Float(-0.0)), 1);
    assert_eq!(index(&switch, Value::Float(f32::NAN)), 2);
    assert_eq!(index(&switch, Value::Float(-f32::NAN)), 2);
    assert_eq!(index(&switch, Value::Float(1.0)), 3);
    assert_eq!(index(&switch, Value::Null), -1);
}

#[test]
fn test_double_labels_use_representation() {
    let switch = DoubleSwitch::new(Type::DOUBLE, [f64::NAN, -0.0, 0.0, f64::INFINITY]).unwrap();
    assert_eq!(index(&switch, Value::Double(f64::NAN)), 0);
    assert_eq!(index(&switch, Value::Double(-0.0)), 1);
    assert_eq!(index(&switch, Value::Double(0.0)), 2);
    assert_eq!(index(&switch, Value::Double(f64::INFINITY)), 3);
    assert_eq!(index(&switch, Value::Double(f64::NEG_INFINITY)), 4);
}

#[test]
fn test_nan_payloads_collapse() {
    let quiet = f64::from_bits(0x7ff8_0000_0000_0001);
    let switch = DoubleSwitch::new(Type::DOUBLE, [f64::NAN]).unwrap();
    assert_eq!(index(&switch, Value::Double(quiet)), 0);
}
