//! Deconstructor metadata as supplied by the reflective layer.
//!
//! The runtime only sees the declaring type, the ordered bindings and a raw
//! digester producing the binding values. Everything else about a
//! deconstructor declaration stays with the caller.

use std::fmt;
use std::sync::Arc;

use decon_ir::{Class, ConstructionError, Type, Value};
use decon_patterns::{Digester, Pattern};

type TotalFn = dyn Fn(&Value) -> Vec<Value> + Send + Sync;
type PartialFn = dyn Fn(&Value) -> Option<Vec<Value>> + Send + Sync;

/// One named, typed binding of a deconstructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingInfo {
    pub name: String,
    pub ty: Type,
}

impl BindingInfo {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        BindingInfo {
            name: name.into(),
            ty,
        }
    }
}

/// Computes the binding values of a non-null target, in binding order.
#[derive(Clone)]
pub enum RawDigester {
    /// Every target of the declaring type has bindings.
    Total(Arc<TotalFn>),
    /// `None` when the target does not match.
    Partial(Arc<PartialFn>),
}

impl RawDigester {
    pub fn total<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Vec<Value> + Send + Sync + 'static,
    {
        RawDigester::Total(Arc::new(f))
    }

    pub fn partial<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<Vec<Value>> + Send + Sync + 'static,
    {
        RawDigester::Partial(Arc::new(f))
    }
}

/// A deconstructor declared on a user type.
#[derive(Clone)]
pub struct DeconstructorInfo {
    pub declaring: Type,
    pub bindings: Vec<BindingInfo>,
    pub digester: RawDigester,
}

impl DeconstructorInfo {
    pub fn new(declaring: Type, bindings: Vec<BindingInfo>, digester: RawDigester) -> Self {
        DeconstructorInfo {
            declaring,
            bindings,
            digester,
        }
    }

    /// The canonical deconstructor of a record: one binding per component,
    /// read by position.
    pub fn for_record(record: &Class) -> Self {
        let bindings = record
            .fields()
            .iter()
            .map(|field| BindingInfo::new(field.name.clone(), field.ty.clone()))
            .collect();
        let arity = record.fields().len();
        let digester = RawDigester::total(move |target| {
            (0..arity)
                .map(|index| target.field(index).cloned().unwrap_or(Value::Null))
                .collect()
        });
        DeconstructorInfo::new(Type::Class(record.clone()), bindings, digester)
    }

    pub fn binding_types(&self) -> Vec<Type> {
        self.bindings.iter().map(|binding| binding.ty.clone()).collect()
    }

    /// Build the pattern this deconstructor describes. Binding values the
    /// digester returns are checked against the declared types at match time.
    pub fn into_pattern(self) -> Result<Pattern, ConstructionError> {
        let bindings = self.binding_types();
        let digester = match self.digester {
            RawDigester::Total(f) => {
                Digester::total(move |target, factory| factory.make(f(target)))
            }
            RawDigester::Partial(f) => Digester::partial(move |target, factory| {
                f(target).map(|values| factory.make(values)).transpose()
            }),
        };
        Pattern::of_imperative(self.declaring, bindings, digester)
    }
}

impl fmt::Debug for DeconstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let partial = matches!(self.digester, RawDigester::Partial(_));
        f.debug_struct("DeconstructorInfo")
            .field("declaring", &self.declaring)
            .field("bindings", &self.bindings)
            .field("partial", &partial)
            .finish()
    }
}

#[cfg(test)]
mod tests;
