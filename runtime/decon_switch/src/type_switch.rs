//! Dispatch over mixed type and constant labels, resumable from any case.
//!
//! Each label is either a type test or a constant. Dispatch can start at a
//! later case, which lets a caller whose guard rejected case `i` resume the
//! search at `i + 1` without re-testing earlier cases.

use std::fmt;

use decon_ir::{invalid_switch_type, ConstructionError, InvocationTypeError, Type, Value};

use crate::dispatch::{check_target, Dispatch, Dispatcher};

/// One case of a [`TypeSwitch`].
#[derive(Clone, Debug, PartialEq)]
pub enum TypeLabel {
    /// Matches non-null instances of the type.
    Type(Type),
    /// Matches integral targets (`byte` to `long`, `char` included) with
    /// exactly this value.
    ///
    /// Comparison is exact in `i64`: a `float` or `double` target never
    /// matches, even when its value is integral, and no target is truncated
    /// to `int` before comparing.
    Int(i64),
    /// Matches strings equal to this one.
    Str(String),
}

impl TypeLabel {
    fn matches(&self, target: &Value) -> bool {
        match self {
            TypeLabel::Type(ty) => target.is_instance_of(ty),
            TypeLabel::Int(label) => target.as_long() == Some(*label),
            TypeLabel::Str(label) => target.as_str() == Some(label.as_str()),
        }
    }
}

/// First-match dispatcher over [`TypeLabel`]s.
pub struct TypeSwitch {
    static_type: Type,
    labels: Box<[TypeLabel]>,
}

impl TypeSwitch {
    /// `static_type` must be a reference type.
    pub fn new(static_type: Type, labels: Vec<TypeLabel>) -> Result<Self, ConstructionError> {
        if static_type.is_primitive() {
            return Err(invalid_switch_type(&static_type, "type"));
        }
        tracing::debug!(cases = labels.len(), "type dispatch table built");
        Ok(TypeSwitch {
            static_type,
            labels: labels.into_boxed_slice(),
        })
    }

    /// Dispatch considering only cases at `start` and after.
    pub fn dispatch_from(
        &self,
        target: &Value,
        start: usize,
    ) -> Result<Dispatch, InvocationTypeError> {
        check_target(&self.static_type, target)?;
        if target.is_null() {
            return Ok(Dispatch::null());
        }
        let index = self
            .labels
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, label)| label.matches(target))
            .map_or(self.labels.len(), |(index, _)| index);
        Ok(Dispatch::case(index))
    }
}

impl Dispatcher for TypeSwitch {
    fn static_type(&self) -> &Type {
        &self.static_type
    }

    fn case_count(&self) -> usize {
        self.labels.len()
    }

    fn dispatch(&self, target: &Value) -> Result<Dispatch, InvocationTypeError> {
        self.dispatch_from(target, 0)
    }
}

impl fmt::Debug for TypeSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSwitch")
            .field("static_type", &self.static_type)
            .field("labels", &self.labels)
            .finish()
    }
}
