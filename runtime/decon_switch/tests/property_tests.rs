//! Property tests for dispatch tables.

#![allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]

use decon_ir::{Prim, Type, Value};
use decon_switch::{string_hash, DoubleSwitch, Dispatcher, IntSwitch, LongSwitch, StringSwitch};
use proptest::prelude::*;

/// Index the first label equal to `target` by the given comparison.
fn linear<T>(labels: &[T], eq: impl Fn(&T) -> bool) -> i32 {
    let index = labels.iter().position(eq).unwrap_or(labels.len());
    i32::try_from(index).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn int_switch_agrees_with_linear_scan(
        labels in prop::collection::vec(-20i32..20, 0..24),
        target in -25i32..25,
    ) {
        let switch = IntSwitch::new(Type::Boxed(Prim::Int), labels.clone()).unwrap();
        let got = switch.index_of(&Value::Int(target)).unwrap();
        prop_assert_eq!(got, linear(&labels, |label| *label == target));
        prop_assert_eq!(switch.index_of(&Value::Null).unwrap(), -1);
    }

    #[test]
    fn long_switch_agrees_with_linear_scan(
        labels in prop::collection::vec(any::<i64>(), 0..16),
        pick in any::<prop::sample::Index>(),
        miss in any::<i64>(),
    ) {
        let switch = LongSwitch::new(Type::LONG, labels.clone()).unwrap();
        let target = if labels.is_empty() { miss } else { labels[pick.index(labels.len())] };
        let got = switch.index_of(&Value::Long(target)).unwrap();
        prop_assert_eq!(got, linear(&labels, |label| *label == target));
    }

    #[test]
    fn double_switch_compares_representations(
        labels in prop::collection::vec(
            prop_oneof![
                Just(0.0f64),
                Just(-0.0f64),
                Just(f64::NAN),
                Just(f64::INFINITY),
                -4.0f64..4.0,
            ],
            0..12,
        ),
        target in prop_oneof![Just(0.0f64), Just(-0.0f64), Just(f64::NAN), -4.0f64..4.0],
    ) {
        let switch = DoubleSwitch::new(Type::DOUBLE, labels.clone()).unwrap();
        let bits = Value::double_bits(target);
        let got = switch.index_of(&Value::Double(target)).unwrap();
        prop_assert_eq!(got, linear(&labels, |label| Value::double_bits(*label) == bits));
    }

    #[test]
    fn string_switch_agrees_with_linear_scan(
        labels in prop::collection::vec(prop::option::weighted(0.9, "[A-D][a-dB]{0,2}"), 0..16),
        target in "[A-D][a-dB]{0,2}",
    ) {
        let switch = StringSwitch::new(Type::Str, labels.clone()).unwrap();
        let got = switch.index_of(&Value::string(&target)).unwrap();
        prop_assert_eq!(got, linear(&labels, |label| label.as_deref() == Some(target.as_str())));
    }

    #[test]
    fn string_hash_is_polynomial(s in "\\PC{0,12}") {
        let expected = s
            .encode_utf16()
            .fold(0i64, |h, unit| (h * 31 + i64::from(unit)) & 0xffff_ffff);
        let expected = i32::from_le_bytes(u32::try_from(expected).unwrap().to_le_bytes());
        prop_assert_eq!(string_hash(&s), expected);
    }
}
