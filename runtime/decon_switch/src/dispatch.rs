//! The dispatcher interface shared by every table kind.

use std::fmt;

use decon_ir::{target_type_mismatch, InvocationTypeError, Type, Value};
use decon_patterns::Carrier;

/// Result of one dispatch.
#[derive(Clone, Debug)]
pub struct Dispatch {
    index: i32,
    carrier: Option<Carrier>,
}

impl Dispatch {
    /// Index reported for a null target.
    pub const NULL_INDEX: i32 = -1;

    pub(crate) fn null() -> Self {
        Dispatch {
            index: Self::NULL_INDEX,
            carrier: None,
        }
    }

    pub(crate) fn case(index: usize) -> Self {
        Dispatch {
            index: to_index(index),
            carrier: None,
        }
    }

    pub(crate) fn matched(index: usize, carrier: Carrier) -> Self {
        Dispatch {
            index: to_index(index),
            carrier: Some(carrier),
        }
    }

    /// `-1` for null, the winning case, or the case count.
    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn is_null(&self) -> bool {
        self.index == Self::NULL_INDEX
    }

    /// Carrier of the winning pattern case.
    pub fn carrier(&self) -> Option<&Carrier> {
        self.carrier.as_ref()
    }

    pub fn into_carrier(self) -> Option<Carrier> {
        self.carrier
    }
}

/// A compiled, immutable first-match table.
pub trait Dispatcher: Send + Sync + fmt::Debug {
    /// Type every target must conform to.
    fn static_type(&self) -> &Type;

    /// Number of cases; also the no-match index.
    fn case_count(&self) -> usize;

    /// Select the first matching case for `target`.
    fn dispatch(&self, target: &Value) -> Result<Dispatch, InvocationTypeError>;

    /// Like [`Dispatcher::dispatch`], keeping only the index.
    fn index_of(&self, target: &Value) -> Result<i32, InvocationTypeError> {
        self.dispatch(target).map(|d| d.index())
    }
}

/// Reject targets the dispatcher's static type does not admit.
#[inline]
pub(crate) fn check_target(static_type: &Type, target: &Value) -> Result<(), InvocationTypeError> {
    if target.conforms_to(static_type) {
        Ok(())
    } else {
        Err(target_type_mismatch(static_type, target))
    }
}

pub(crate) fn to_index(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "case lists are bounded by the i32 index space"
)]
pub(crate) fn to_slot(index: usize) -> u32 {
    index as u32
}
