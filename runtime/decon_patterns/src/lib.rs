//! Decon Patterns - deconstruction patterns and their combinator algebra.
//!
//! A `Pattern` tests whether a target has a given shape and, if it does,
//! exposes a fixed number of typed bindings extracted from it. It is made of
//! three validated pieces:
//!
//! - a `Descriptor`: target type, ordered binding types, partiality
//! - a `MatchStep`: target to carrier, or not-matched
//! - one `ComponentStep` per binding: carrier to binding value
//!
//! # Carriers
//!
//! The carrier is the per-match aggregate handed from the match step to the
//! component steps. Its static shape (`CarrierShape`) is recorded on both
//! sides and checked when a pattern is built, so a component is never
//! applied to a carrier its pattern does not produce.
//!
//! # Combinators
//!
//! New patterns are built from existing ones (`adapt_target`, `nested`,
//! `drop_bindings`, projections, `compose`). Each result is validated by the
//! same constructor as a hand-assembled pattern.

mod carrier;
mod combinators;
mod descriptor;
mod pattern;
mod stack;
mod step;

#[cfg(test)]
mod test_helpers;

pub use carrier::{Carrier, CarrierFactory, CarrierShape, CarrierStrategy, Slots};
pub use combinators::Digester;
pub use descriptor::{Descriptor, Partiality};
pub use pattern::Pattern;
pub use step::{ComponentStep, MatchResult, MatchStep, Predicate, Projection};
