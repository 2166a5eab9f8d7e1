//! Decon Switch - compile ordered cases into a single first-match dispatcher.
//!
//! A dispatcher maps a target to an index:
//!
//! - `-1` when the target is null, checked before any case
//! - the smallest `i` whose case matches
//! - `N`, the number of cases, when nothing matches
//!
//! Label dispatchers (`int`, `long`, `float`, `double`, `String`, enum)
//! compare by representation: `NaN` matches a `NaN` label and `+0.0` and
//! `-0.0` are different labels. Pattern dispatchers also return the winning
//! case's carrier so bindings can be read without matching again.

mod cases;
mod dispatch;
mod enums;
mod pattern_switch;
mod scalar;
mod string;
mod type_switch;

pub use cases::{build_dispatcher, SwitchCases};
pub use dispatch::{Dispatch, Dispatcher};
pub use enums::EnumSwitch;
pub use pattern_switch::PatternSwitch;
pub use scalar::{
    DoubleKey, DoubleSwitch, FloatKey, FloatSwitch, IntSwitch, LongSwitch, ScalarSwitch, SwitchKey,
};
pub use string::{string_hash, StringSwitch};
pub use type_switch::{TypeLabel, TypeSwitch};
