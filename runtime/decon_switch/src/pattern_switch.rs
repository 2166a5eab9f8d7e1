//! Dispatch over patterns.

use std::fmt;

use decon_ir::{ConstructionError, InvocationTypeError, Type, Value};
use decon_patterns::Pattern;

use crate::dispatch::{check_target, Dispatch, Dispatcher};

/// First-match dispatcher over patterns, returning the winning carrier.
pub struct PatternSwitch {
    static_type: Type,
    /// Each case retargeted to `static_type`.
    cases: Box<[Pattern]>,
}

impl PatternSwitch {
    /// Build a dispatcher for targets of `static_type`. Every case is
    /// retargeted to `static_type`; a case that cannot be fails the build.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(static_type = %static_type, cases = cases.len())
    )]
    pub fn new(static_type: Type, cases: &[Pattern]) -> Result<Self, ConstructionError> {
        let cases = cases
            .iter()
            .map(|case| case.adapt_target(&static_type))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(total) = cases.iter().position(|case| case.descriptor().is_total()) {
            if total + 1 < cases.len() {
                tracing::debug!(
                    case = total,
                    unreachable = cases.len() - total - 1,
                    "cases after a total pattern never match"
                );
            }
        }
        Ok(PatternSwitch {
            static_type,
            cases: cases.into_boxed_slice(),
        })
    }

    /// The retargeted case at `index`.
    pub fn case(&self, index: usize) -> Option<&Pattern> {
        self.cases.get(index)
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
        for (index, case) in self.cases.iter().enumerate().skip(start) {
            if let Some(carrier) = case.try_match(target)? {
                return Ok(Dispatch::matched(index, carrier));
            }
        }
        Ok(Dispatch::case(self.cases.len()))
    }

    /// Bindings of the winning case, read from the dispatch's carrier.
    pub fn extract(&self, dispatch: &Dispatch) -> Result<Option<Vec<Value>>, InvocationTypeError> {
        let case = usize::try_from(dispatch.index())
            .ok()
            .and_then(|index| self.cases.get(index));
        match (case, dispatch.carrier()) {
            (Some(case), Some(carrier)) => case.extract(carrier).map(Some),
            _ => Ok(None),
        }
    }
}

impl Dispatcher for PatternSwitch {
    fn static_type(&self) -> &Type {
        &self.static_type
    }

    fn case_count(&self) -> usize {
        self.cases.len()
    }

    fn dispatch(&self, target: &Value) -> Result<Dispatch, InvocationTypeError> {
        self.dispatch_from(target, 0)
    }
}

impl fmt::Debug for PatternSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSwitch")
            .field("static_type", &self.static_type)
            .field("cases", &self.cases)
            .finish()
    }
}

#[cfg(test)]
mod tests;
