//! Dispatch over string labels.
//!
//! Labels are bucketed by a 31-polynomial hash over UTF-16 code units
//! (the hash compiled code already uses for string switches), so distinct
//! labels can share a bucket, e.g. `"Ba"` and `"CB"`. A bucket hit is always
//! confirmed by comparing the strings.

use std::fmt;

use decon_ir::{invalid_switch_type, ConstructionError, InvocationTypeError, Type, Value};

use crate::dispatch::{check_target, to_slot, Dispatch, Dispatcher};

/// Hash of `s` as `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code units,
/// with wrapping 32-bit arithmetic.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

struct Entry {
    hash: i32,
    label: Box<str>,
    index: u32,
}

/// First-match dispatcher over string labels.
///
/// A `None` label is an inert placeholder: it keeps its index but never
/// matches.
pub struct StringSwitch {
    static_type: Type,
    /// Sorted by hash, then by case index.
    entries: Box<[Entry]>,
    cases: usize,
}

impl StringSwitch {
    pub fn new<S: AsRef<str>>(
        static_type: Type,
        labels: impl IntoIterator<Item = Option<S>>,
    ) -> Result<Self, ConstructionError> {
        if static_type != Type::Str {
            return Err(invalid_switch_type(&static_type, "String"));
        }
        let mut cases = 0;
        let mut entries = Vec::new();
        for (index, label) in labels.into_iter().enumerate() {
            cases += 1;
            if let Some(label) = label {
                let label = label.as_ref();
                entries.push(Entry {
                    hash: string_hash(label),
                    label: label.into(),
                    index: to_slot(index),
                });
            }
        }
        entries.sort_by_key(|entry| (entry.hash, entry.index));

        let collisions = entries
            .windows(2)
            .filter(|pair| pair[0].hash == pair[1].hash && pair[0].label != pair[1].label)
            .count();
        tracing::debug!(cases, collisions, "string dispatch table built");

        Ok(StringSwitch {
            static_type,
            entries: entries.into_boxed_slice(),
            cases,
        })
    }

    /// Table over labels none of which is null.
    pub fn of(labels: &[&str]) -> Result<Self, ConstructionError> {
        Self::new(Type::Str, labels.iter().map(Some))
    }

    fn lookup(&self, s: &str) -> Option<usize> {
        let hash = string_hash(s);
        let start = self.entries.partition_point(|entry| entry.hash < hash);
        self.entries[start..]
            .iter()
            .take_while(|entry| entry.hash == hash)
            .find(|entry| &*entry.label == s)
            .map(|entry| entry.index as usize)
    }
}

impl Dispatcher for StringSwitch {
    fn static_type(&self) -> &Type {
        &self.static_type
    }

    fn case_count(&self) -> usize {
        self.cases
    }

    fn dispatch(&self, target: &Value) -> Result<Dispatch, InvocationTypeError> {
        check_target(&self.static_type, target)?;
        let Some(s) = target.as_str() else {
            return Ok(Dispatch::null());
        };
        Ok(Dispatch::case(self.lookup(s).unwrap_or(self.cases)))
    }
}

impl fmt::Debug for StringSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringSwitch({} cases)", self.cases)
    }
}
