//! Switch linkage.

use std::sync::Arc;

use decon_ir::{ConstructionError, Type};
use decon_switch::{build_dispatcher, Dispatcher, SwitchCases};

/// Link a switch over targets of `static_type` to one shared dispatcher.
pub fn switch_bootstrap(
    static_type: Type,
    cases: SwitchCases,
) -> Result<Arc<dyn Dispatcher>, ConstructionError> {
    let kind = cases.kind();
    let dispatcher = build_dispatcher(static_type, cases)?;
    tracing::debug!(
        kind,
        static_type = %dispatcher.static_type(),
        cases = dispatcher.case_count(),
        "switch linked"
    );
    Ok(dispatcher)
}

#[cfg(test)]
mod tests;
