//! Executable pieces of a pattern and the user functions they wrap.

use std::fmt;
use std::sync::Arc;

use decon_ir::{
    carrier_shape, component_result_mismatch, static_type_mismatch, target_type_mismatch,
    unknown_field, Class, ConstructionError, InvocationTypeError, Type, Value,
};

use crate::carrier::{Carrier, CarrierShape};

/// Outcome of a match step: a carrier, not-matched, or a type error.
pub type MatchResult = Result<Option<Carrier>, InvocationTypeError>;

type MatchFn = dyn Fn(&Value) -> MatchResult + Send + Sync;
type ComponentFn = dyn Fn(&Carrier) -> Result<Value, InvocationTypeError> + Send + Sync;
type ProjectionFn = dyn Fn(&Value) -> Value + Send + Sync;
type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// Target to carrier, or not-matched.
#[derive(Clone)]
pub struct MatchStep {
    target: Type,
    produces: CarrierShape,
    f: Arc<MatchFn>,
}

impl MatchStep {
    pub fn new<F>(target: Type, produces: CarrierShape, f: F) -> Self
    where
        F: Fn(&Value) -> MatchResult + Send + Sync + 'static,
    {
        MatchStep {
            target,
            produces,
            f: Arc::new(f),
        }
    }

    /// Declared target type.
    pub fn target(&self) -> &Type {
        &self.target
    }

    /// Shape of the carriers this step produces.
    pub fn carrier_shape(&self) -> &CarrierShape {
        &self.produces
    }

    /// Run the step. `target` must conform to the declared target type.
    pub fn invoke(&self, target: &Value) -> MatchResult {
        if !target.conforms_to(&self.target) {
            return Err(target_type_mismatch(&self.target, target));
        }
        self.call(target)
    }

    /// Run the step through a call site typed `static_type`, which must be
    /// exactly the declared target type.
    pub fn invoke_exact(&self, static_type: &Type, target: &Value) -> MatchResult {
        if *static_type != self.target {
            return Err(static_type_mismatch(&self.target, static_type));
        }
        self.invoke(target)
    }

    /// Run the step on a target already known to conform.
    #[inline]
    pub(crate) fn call(&self, target: &Value) -> MatchResult {
        (self.f)(target)
    }
}

impl fmt::Debug for MatchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchStep({} -> {})", self.target, self.produces)
    }
}

/// Carrier to one binding value.
#[derive(Clone)]
pub struct ComponentStep {
    accepts: CarrierShape,
    binding: Type,
    f: Arc<ComponentFn>,
}

impl ComponentStep {
    pub fn new<F>(accepts: CarrierShape, binding: Type, f: F) -> Self
    where
        F: Fn(&Carrier) -> Result<Value, InvocationTypeError> + Send + Sync + 'static,
    {
        ComponentStep {
            accepts,
            binding,
            f: Arc::new(f),
        }
    }

    /// Shape of the carriers this step reads.
    pub fn accepts(&self) -> &CarrierShape {
        &self.accepts
    }

    pub fn binding_type(&self) -> &Type {
        &self.binding
    }

    /// Read the binding. The result always conforms to the binding type.
    pub fn invoke(&self, carrier: &Carrier) -> Result<Value, InvocationTypeError> {
        if !self.accepts.admits(carrier) {
            return Err(carrier_shape(self.accepts.name(), carrier.shape_name()));
        }
        let value = (self.f)(carrier)?;
        if !value.conforms_to(&self.binding) {
            return Err(component_result_mismatch(&self.binding, &value));
        }
        Ok(value)
    }
}

impl fmt::Debug for ComponentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentStep({} -> {})", self.accepts, self.binding)
    }
}

/// A user accessor computing one raw value from a target.
#[derive(Clone)]
pub struct Projection {
    source: Type,
    result: Type,
    f: Arc<ProjectionFn>,
}

impl Projection {
    pub fn new<F>(source: Type, result: Type, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Projection {
            source,
            result,
            f: Arc::new(f),
        }
    }

    /// Read the named field of instances of `class`.
    pub fn field(class: &Class, name: &str) -> Result<Self, ConstructionError> {
        let index = class
            .field_index(name)
            .ok_or_else(|| unknown_field(class.name(), name))?;
        let result = class.fields()[index].ty.clone();
        Ok(Projection::new(Type::Class(class.clone()), result, move |target| {
            target.field(index).cloned().unwrap_or(Value::Null)
        }))
    }

    /// One projection per record component, in declaration order.
    pub fn components(record: &Class) -> Vec<Self> {
        let source = Type::Class(record.clone());
        record
            .fields()
            .iter()
            .enumerate()
            .map(|(index, field)| {
                Projection::new(source.clone(), field.ty.clone(), move |target| {
                    target.field(index).cloned().unwrap_or(Value::Null)
                })
            })
            .collect()
    }

    /// Type of the targets this projection reads.
    pub fn source(&self) -> &Type {
        &self.source
    }

    /// Declared type of the projected value.
    pub fn result(&self) -> &Type {
        &self.result
    }

    /// Apply to a target; the result must conform to the declared type.
    pub fn apply(&self, target: &Value) -> Result<Value, InvocationTypeError> {
        let value = (self.f)(target);
        if !value.conforms_to(&self.result) {
            return Err(component_result_mismatch(&self.result, &value));
        }
        Ok(value)
    }
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Projection({} -> {})", self.source, self.result)
    }
}

/// A user guard over targets of one type.
#[derive(Clone)]
pub struct Predicate {
    source: Type,
    f: Arc<PredicateFn>,
}

impl Predicate {
    pub fn new<F>(source: Type, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Predicate {
            source,
            f: Arc::new(f),
        }
    }

    pub fn source(&self) -> &Type {
        &self.source
    }

    pub fn test(&self, target: &Value) -> bool {
        (self.f)(target)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.source)
    }
}

/// The target a self-carrier holds.
pub(crate) fn target_of(carrier: &Carrier) -> Result<&Value, InvocationTypeError> {
    match carrier {
        Carrier::Target(target) => Ok(target),
        other => Err(carrier_shape("target", other.shape_name())),
    }
}
