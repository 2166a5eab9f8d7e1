//! Error types shared by pattern construction, matching and dispatch.
//!
//! Two kinds of failure are errors:
//!
//! - `ConstructionError`: a pattern or dispatcher could not be built because
//!   its pieces disagree (arity, types, labels). Raised at build time only.
//! - `InvocationTypeError`: a built step was invoked with a value or static
//!   type that disagrees with its declaration.
//!
//! A target that simply does not match is not an error; it is `Ok(None)` or
//! the no-match index.
//!
//! Factory functions (e.g. `arity_mismatch()`) are the public API; they
//! populate both `kind` and `message`.

use std::fmt;

use crate::types::Type;
use crate::value::Value;

/// Typed category of a `ConstructionError`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructionErrorKind {
    // Pattern shape
    ArityMismatch {
        expected: usize,
        got: usize,
    },
    TargetMismatch {
        expected: Type,
        got: Type,
    },
    CarrierMismatch {
        index: usize,
        expected: String,
        got: String,
    },
    BindingTypeMismatch {
        index: usize,
        expected: Type,
        got: Type,
    },
    PartialityMismatch {
        constructor: &'static str,
        expected: &'static str,
    },

    // Combinators
    IndexOutOfBounds {
        index: isize,
        arity: usize,
    },
    IncompatibleTarget {
        from: Type,
        to: Type,
    },
    TooManyInnerPatterns {
        arity: usize,
        got: usize,
    },
    UnknownField {
        class: String,
        field: String,
    },
    ProjectionSource {
        index: usize,
        target: Type,
        source: Type,
    },

    // Dispatch
    InvalidSwitchType {
        ty: Type,
        switch: &'static str,
    },
    NotAnEnum {
        ty: Type,
    },
    UnknownEnumConstant {
        ty: Type,
        name: String,
    },
    NullLabel {
        index: usize,
    },

    // Linkage
    PatternNotFound {
        owner: Type,
        name: String,
    },
    DescriptorMismatch {
        name: String,
        expected: String,
        got: String,
    },
}

impl fmt::Display for ConstructionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArityMismatch { expected, got } => {
                let word = if *expected == 1 { "component" } else { "components" };
                write!(f, "descriptor declares {expected} {word}, got {got}")
            }
            Self::TargetMismatch { expected, got } => {
                write!(f, "match step accepts {got}, descriptor target is {expected}")
            }
            Self::CarrierMismatch {
                index,
                expected,
                got,
            } => write!(
                f,
                "component {index} accepts carrier {got}, match step produces {expected}"
            ),
            Self::BindingTypeMismatch {
                index,
                expected,
                got,
            } => write!(
                f,
                "component {index} returns {got}, descriptor binding is {expected}"
            ),
            Self::PartialityMismatch {
                constructor,
                expected,
            } => write!(f, "{constructor} requires a {expected} descriptor"),
            Self::IndexOutOfBounds { index, arity } => {
                write!(f, "binding index {index} out of bounds for arity {arity}")
            }
            Self::IncompatibleTarget { from, to } => {
                write!(f, "cannot adapt pattern over {from} to target {to}")
            }
            Self::TooManyInnerPatterns { arity, got } => write!(
                f,
                "{got} inner patterns supplied for an outer pattern with {arity} bindings"
            ),
            Self::UnknownField { class, field } => write!(f, "no field {field} on {class}"),
            Self::ProjectionSource {
                index,
                target,
                source,
            } => write!(f, "component {index} reads from {source}, target is {target}"),
            Self::InvalidSwitchType { ty, switch } => {
                write!(f, "{switch} dispatch cannot switch on {ty}")
            }
            Self::NotAnEnum { ty } => write!(f, "{ty} is not an enum"),
            Self::UnknownEnumConstant { ty, name } => {
                write!(f, "{ty} has no constant named {name}")
            }
            Self::NullLabel { index } => write!(f, "label {index} is null"),
            Self::PatternNotFound { owner, name } => {
                write!(f, "no pattern {name} declared on {owner}")
            }
            Self::DescriptorMismatch {
                name,
                expected,
                got,
            } => write!(f, "pattern {name} has shape {got}, requested {expected}"),
        }
    }
}

/// A pattern or dispatcher that could not be built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructionError {
    pub kind: ConstructionErrorKind,
    pub message: String,
}

impl ConstructionError {
    /// Create an error from a kind, rendering its message.
    #[cold]
    pub fn from_kind(kind: ConstructionErrorKind) -> Self {
        let message = kind.to_string();
        ConstructionError { kind, message }
    }
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConstructionError {}

/// Typed category of an `InvocationTypeError`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvocationErrorKind {
    /// A value does not conform to the declared target type.
    TargetType { expected: Type, got: String },
    /// An exact invocation used a different static type.
    StaticType { expected: Type, got: Type },
    /// A component step received a carrier of another shape.
    CarrierShape {
        expected: &'static str,
        got: &'static str,
    },
    ArgumentCount { expected: usize, got: usize },
    /// A value handed to a carrier or constructor does not conform to its slot.
    BindingType {
        index: usize,
        expected: Type,
        got: String,
    },
    /// A component produced a value outside its declared binding type.
    ComponentResult { expected: Type, got: String },
    NotInstantiable { class: String },
}

impl fmt::Display for InvocationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetType { expected, got } => {
                write!(f, "cannot invoke with {got}: expected {expected}")
            }
            Self::StaticType { expected, got } => {
                write!(f, "call site type {got} does not match declared type {expected}")
            }
            Self::CarrierShape { expected, got } => {
                write!(f, "expected {expected} carrier, got {got} carrier")
            }
            Self::ArgumentCount { expected, got } => {
                write!(f, "expected {expected} values, got {got}")
            }
            Self::BindingType {
                index,
                expected,
                got,
            } => write!(f, "value {index} is {got}, expected {expected}"),
            Self::ComponentResult { expected, got } => {
                write!(f, "component returned {got}, declared {expected}")
            }
            Self::NotInstantiable { class } => write!(f, "{class} cannot be instantiated"),
        }
    }
}

/// A step invoked through a calling convention that disagrees with its
/// declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationTypeError {
    pub kind: InvocationErrorKind,
    pub message: String,
}

impl InvocationTypeError {
    #[cold]
    pub fn from_kind(kind: InvocationErrorKind) -> Self {
        let message = kind.to_string();
        InvocationTypeError { kind, message }
    }
}

impl fmt::Display for InvocationTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for InvocationTypeError {}

// Construction error factories

#[cold]
pub fn arity_mismatch(expected: usize, got: usize) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::ArityMismatch { expected, got })
}

#[cold]
pub fn target_mismatch(expected: &Type, got: &Type) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::TargetMismatch {
        expected: expected.clone(),
        got: got.clone(),
    })
}

#[cold]
pub fn carrier_mismatch(
    index: usize,
    expected: impl fmt::Display,
    got: impl fmt::Display,
) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::CarrierMismatch {
        index,
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn binding_type_mismatch(index: usize, expected: &Type, got: &Type) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::BindingTypeMismatch {
        index,
        expected: expected.clone(),
        got: got.clone(),
    })
}

#[cold]
pub fn partiality_mismatch(constructor: &'static str, expected: &'static str) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::PartialityMismatch {
        constructor,
        expected,
    })
}

#[cold]
pub fn index_out_of_bounds(index: isize, arity: usize) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::IndexOutOfBounds { index, arity })
}

#[cold]
pub fn incompatible_target(from: &Type, to: &Type) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::IncompatibleTarget {
        from: from.clone(),
        to: to.clone(),
    })
}

#[cold]
pub fn too_many_inner_patterns(arity: usize, got: usize) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::TooManyInnerPatterns { arity, got })
}

#[cold]
pub fn unknown_field(class: &str, field: &str) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::UnknownField {
        class: class.to_string(),
        field: field.to_string(),
    })
}

#[cold]
pub fn projection_source_mismatch(index: usize, target: &Type, source: &Type) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::ProjectionSource {
        index,
        target: target.clone(),
        source: source.clone(),
    })
}

#[cold]
pub fn invalid_switch_type(ty: &Type, switch: &'static str) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::InvalidSwitchType {
        ty: ty.clone(),
        switch,
    })
}

#[cold]
pub fn not_an_enum(ty: &Type) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::NotAnEnum { ty: ty.clone() })
}

#[cold]
pub fn unknown_enum_constant(ty: &Type, name: &str) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::UnknownEnumConstant {
        ty: ty.clone(),
        name: name.to_string(),
    })
}

#[cold]
pub fn null_label(index: usize) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::NullLabel { index })
}

#[cold]
pub fn pattern_not_found(owner: &Type, name: &str) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::PatternNotFound {
        owner: owner.clone(),
        name: name.to_string(),
    })
}

#[cold]
pub fn descriptor_mismatch(
    name: &str,
    expected: impl fmt::Display,
    got: impl fmt::Display,
) -> ConstructionError {
    ConstructionError::from_kind(ConstructionErrorKind::DescriptorMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

// Invocation error factories

#[cold]
pub fn target_type_mismatch(expected: &Type, got: &Value) -> InvocationTypeError {
    InvocationTypeError::from_kind(InvocationErrorKind::TargetType {
        expected: expected.clone(),
        got: got.type_name(),
    })
}

#[cold]
pub fn static_type_mismatch(expected: &Type, got: &Type) -> InvocationTypeError {
    InvocationTypeError::from_kind(InvocationErrorKind::StaticType {
        expected: expected.clone(),
        got: got.clone(),
    })
}

#[cold]
pub fn carrier_shape(expected: &'static str, got: &'static str) -> InvocationTypeError {
    InvocationTypeError::from_kind(InvocationErrorKind::CarrierShape { expected, got })
}

#[cold]
pub fn argument_count(expected: usize, got: usize) -> InvocationTypeError {
    InvocationTypeError::from_kind(InvocationErrorKind::ArgumentCount { expected, got })
}

#[cold]
pub fn binding_value_mismatch(index: usize, expected: &Type, got: &Value) -> InvocationTypeError {
    InvocationTypeError::from_kind(InvocationErrorKind::BindingType {
        index,
        expected: expected.clone(),
        got: got.type_name(),
    })
}

#[cold]
pub fn component_result_mismatch(expected: &Type, got: &Value) -> InvocationTypeError {
    InvocationTypeError::from_kind(InvocationErrorKind::ComponentResult {
        expected: expected.clone(),
        got: got.type_name(),
    })
}

#[cold]
pub fn not_instantiable(class: &str) -> InvocationTypeError {
    InvocationTypeError::from_kind(InvocationErrorKind::NotInstantiable {
        class: class.to_string(),
    })
}
