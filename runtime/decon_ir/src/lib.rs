//! Decon IR - runtime type and value model for the decon pattern runtime.
//!
//! This crate provides:
//! - The nominal type model patterns are declared against (`Type`, `Prim`, `Class`)
//! - Runtime values patterns match over (`Value`, `Heap`, `Instance`, `EnumConstant`)
//! - The shared error types (`ConstructionError`, `InvocationTypeError`)
//!
//! # Type Model
//!
//! Reference types form a single-rooted hierarchy under `Type::Object`.
//! Primitives are non-nullable and relate to the hierarchy only through
//! their boxes: a `Prim(Int)` accepts exactly the values a `Boxed(Int)`
//! accepts, minus null.
//!
//! # Value Types
//!
//! Heap-backed values share their payload through `Heap<T>`, whose
//! constructor is crate-private. All heap values are built through
//! `Value::` factory methods or `Class` constructors.

mod errors;
mod types;
mod value;

pub use errors::{
    ConstructionError, ConstructionErrorKind, InvocationErrorKind, InvocationTypeError,
};
pub use types::{Class, ClassKind, Field, Prim, Type};
pub use value::{EnumConstant, Heap, Instance, Value};

// Re-export error constructors for use by other crates
pub use errors::{
    argument_count, arity_mismatch, binding_type_mismatch, binding_value_mismatch,
    carrier_mismatch, carrier_shape, component_result_mismatch, descriptor_mismatch,
    incompatible_target, index_out_of_bounds, invalid_switch_type, not_an_enum, not_instantiable,
    null_label, partiality_mismatch, pattern_not_found, projection_source_mismatch,
    static_type_mismatch, target_mismatch, target_type_mismatch, too_many_inner_patterns,
    unknown_enum_constant, unknown_field,
};
