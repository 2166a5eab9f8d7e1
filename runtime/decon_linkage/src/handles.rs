//! Step retrieval for call sites that cache a pattern's pieces separately.

use decon_ir::{index_out_of_bounds, ConstructionError};
use decon_patterns::{ComponentStep, MatchStep, Pattern};

/// The match step of `pattern`.
pub fn match_handle(pattern: &Pattern) -> MatchStep {
    pattern.match_step().clone()
}

/// The component step for binding `index` of `pattern`.
pub fn component_handle(
    pattern: &Pattern,
    index: usize,
) -> Result<ComponentStep, ConstructionError> {
    pattern.component(index).cloned().ok_or_else(|| {
        index_out_of_bounds(isize::try_from(index).unwrap_or(isize::MAX), pattern.arity())
    })
}

/// Every component step of `pattern`, in binding order.
pub fn component_handles(pattern: &Pattern) -> Vec<ComponentStep> {
    pattern.components().to_vec()
}
