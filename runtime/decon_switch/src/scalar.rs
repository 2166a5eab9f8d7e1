//! Dispatch over primitive labels.
//!
//! Labels are sorted once at construction and searched by key. Floating
//! point keys are canonical bit patterns, so `NaN` finds a `NaN` label and
//! signed zeros are distinct.

use std::fmt;

use decon_ir::{invalid_switch_type, ConstructionError, InvocationTypeError, Prim, Type, Value};

use crate::dispatch::{check_target, to_slot, Dispatch, Dispatcher};

/// Search key of one primitive label kind.
pub trait SwitchKey: Copy + Ord + fmt::Debug + Send + Sync + 'static {
    /// The label values callers supply.
    type Label;

    /// Name used in construction errors.
    const KIND: &'static str;

    fn from_label(label: Self::Label) -> Self;

    /// Key of a conforming, non-null target; `None` never matches.
    fn from_value(value: &Value) -> Option<Self>;

    /// Whether targets of `prim` (or its box) can be switched on.
    fn admits(prim: Prim) -> bool;
}

impl SwitchKey for i32 {
    type Label = i32;
    const KIND: &'static str = "int";

    fn from_label(label: i32) -> Self {
        label
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }

    fn admits(prim: Prim) -> bool {
        matches!(prim, Prim::Byte | Prim::Short | Prim::Char | Prim::Int)
    }
}

impl SwitchKey for i64 {
    type Label = i64;
    const KIND: &'static str = "long";

    fn from_label(label: i64) -> Self {
        label
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_long()
    }

    fn admits(prim: Prim) -> bool {
        prim == Prim::Long
    }
}

/// Canonical bits of a `float` label.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FloatKey(u32);

impl SwitchKey for FloatKey {
    type Label = f32;
    const KIND: &'static str = "float";

    fn from_label(label: f32) -> Self {
        FloatKey(Value::float_bits(label))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float().map(Self::from_label)
    }

    fn admits(prim: Prim) -> bool {
        prim == Prim::Float
    }
}

/// Canonical bits of a `double` label.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DoubleKey(u64);

impl SwitchKey for DoubleKey {
    type Label = f64;
    const KIND: &'static str = "double";

    fn from_label(label: f64) -> Self {
        DoubleKey(Value::double_bits(label))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_double().map(Self::from_label)
    }

    fn admits(prim: Prim) -> bool {
        prim == Prim::Double
    }
}

/// First-match dispatcher over primitive labels of one kind.
pub struct ScalarSwitch<K: SwitchKey> {
    static_type: Type,
    /// Sorted by key; one entry per distinct key, holding its first index.
    table: Box<[(K, u32)]>,
    cases: usize,
}

pub type IntSwitch = ScalarSwitch<i32>;
pub type LongSwitch = ScalarSwitch<i64>;
pub type FloatSwitch = ScalarSwitch<FloatKey>;
pub type DoubleSwitch = ScalarSwitch<DoubleKey>;

impl<K: SwitchKey> ScalarSwitch<K> {
    /// Build a table over `labels` for targets of `static_type`, which must
    /// be a primitive of this kind or its box.
    pub fn new(
        static_type: Type,
        labels: impl IntoIterator<Item = K::Label>,
    ) -> Result<Self, ConstructionError> {
        if !static_type.prim_kind().is_some_and(K::admits) {
            return Err(invalid_switch_type(&static_type, K::KIND));
        }
        let mut table: Vec<(K, u32)> = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| (K::from_label(label), to_slot(index)))
            .collect();
        let cases = table.len();
        table.sort_unstable();
        table.dedup_by_key(|entry| entry.0);
        tracing::debug!(
            kind = K::KIND,
            cases,
            distinct = table.len(),
            "scalar dispatch table built"
        );
        Ok(ScalarSwitch {
            static_type,
            table: table.into_boxed_slice(),
            cases,
        })
    }

    fn lookup(&self, key: K) -> Option<usize> {
        let slot = self.table.binary_search_by_key(&key, |entry| entry.0).ok()?;
        self.table.get(slot).map(|entry| entry.1 as usize)
    }
}

impl<K: SwitchKey> Dispatcher for ScalarSwitch<K> {
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
        let index = K::from_value(target)
            .and_then(|key| self.lookup(key))
            .unwrap_or(self.cases);
        Ok(Dispatch::case(index))
    }
}

impl<K: SwitchKey> fmt::Debug for ScalarSwitch<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Switch({}, {} cases)", K::KIND, self.static_type, self.cases)
    }
}

#[cfg(test)]
mod tests;
