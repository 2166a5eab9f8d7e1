//! Dispatch over enum constants by ordinal.

use std::fmt;

use decon_ir::{
    invalid_switch_type, not_an_enum, null_label, unknown_enum_constant, Class, ConstructionError,
    InvocationTypeError, Type, Value,
};

use crate::dispatch::{check_target, to_slot, Dispatch, Dispatcher};

/// First-match dispatcher over the constants of one enum.
pub struct EnumSwitch {
    static_type: Type,
    class: Class,
    /// Case index per ordinal; `cases` where no label names the constant.
    by_ordinal: Box<[u32]>,
    cases: usize,
}

impl EnumSwitch {
    /// Build a table over constant names of `enum_type` for targets of
    /// `static_type`.
    ///
    /// Fails if `enum_type` is not an enum, if `static_type` cannot hold its
    /// constants, if any label is `None`, or if a label names no constant.
    pub fn new<S: AsRef<str>>(
        static_type: Type,
        enum_type: &Type,
        labels: impl IntoIterator<Item = Option<S>>,
    ) -> Result<Self, ConstructionError> {
        let class = enum_type
            .as_class()
            .filter(|class| class.is_enum())
            .ok_or_else(|| not_an_enum(enum_type))?
            .clone();
        if !static_type.is_assignable_from(enum_type) {
            return Err(invalid_switch_type(&static_type, "enum"));
        }

        let labels: Vec<Option<S>> = labels.into_iter().collect();
        let cases = labels.len();
        let mut by_ordinal = vec![to_slot(cases); class.constants().len()];
        for (index, label) in labels.iter().enumerate() {
            let name = label.as_ref().ok_or_else(|| null_label(index))?.as_ref();
            let ordinal = class
                .constant_ordinal(name)
                .ok_or_else(|| unknown_enum_constant(enum_type, name))?;
            if let Some(slot) = by_ordinal.get_mut(ordinal as usize) {
                if *slot == to_slot(cases) {
                    *slot = to_slot(index);
                }
            }
        }
        tracing::debug!(enum_type = %enum_type, cases, "enum dispatch table built");

        Ok(EnumSwitch {
            static_type,
            class,
            by_ordinal: by_ordinal.into_boxed_slice(),
            cases,
        })
    }
}

impl Dispatcher for EnumSwitch {
    fn static_type(&self) -> &Type {
        &self.static_type
    }

    fn case_count(&self) -> usize {
        self.cases
    }

    fn dispatch(&self, target: &Value) -> Result<Dispatch, InvocationTypeError> {
        check_target(&self.static_type, target)?;
        if target.is_null() {
            return Ok(Dispatch::null());
        }
        let index = target
            .as_enum()
            .filter(|constant| *constant.class() == self.class)
            .and_then(|constant| self.by_ordinal.get(constant.ordinal() as usize))
            .map_or(self.cases, |&slot| slot as usize);
        Ok(Dispatch::case(index))
    }
}

impl fmt::Debug for EnumSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumSwitch({}, {} cases)", self.class.name(), self.cases)
    }
}
