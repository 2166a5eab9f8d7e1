//! The `Pattern` value and its primitive constructors.
//!
//! Every pattern built from caller-supplied parts, whether assembled by hand
//! or produced by a combinator, passes through [`Pattern::new`], which checks
//! that the descriptor agrees with the match step and with every component
//! step. A pattern that exists is well-formed; matching never re-validates
//! shape.
//!
//! Null targets never reach user digesters or projections. The primitive
//! constructors treat null as not-matched, except `of_type_nullable` and
//! `of_constant(Null)`, which match it.

use std::fmt;
use std::sync::Arc;

use decon_ir::{
    arity_mismatch, binding_type_mismatch, carrier_mismatch, carrier_shape, partiality_mismatch,
    projection_source_mismatch, target_mismatch, ConstructionError, InvocationTypeError, Type,
    Value,
};

use crate::carrier::{Carrier, CarrierFactory, CarrierShape, CarrierStrategy};
use crate::descriptor::Descriptor;
use crate::step::{target_of, ComponentStep, MatchResult, MatchStep, Predicate, Projection};

struct PatternData {
    descriptor: Descriptor,
    match_step: MatchStep,
    components: Vec<ComponentStep>,
    /// Pattern this one was widened from, if any.
    widened_from: Option<Pattern>,
}

/// An immutable deconstruction pattern.
///
/// Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct Pattern(Arc<PatternData>);

impl Pattern {
    /// Assemble a pattern from its parts.
    ///
    /// Fails unless there is one component per binding, the match step
    /// accepts the descriptor's target, and every component reads the
    /// carrier the match step produces and returns its binding's type.
    pub fn new(
        descriptor: Descriptor,
        match_step: MatchStep,
        components: Vec<ComponentStep>,
    ) -> Result<Self, ConstructionError> {
        Self::assemble(descriptor, match_step, components, None)
    }

    pub(crate) fn assemble(
        descriptor: Descriptor,
        match_step: MatchStep,
        components: Vec<ComponentStep>,
        widened_from: Option<Pattern>,
    ) -> Result<Self, ConstructionError> {
        if components.len() != descriptor.arity() {
            return Err(arity_mismatch(descriptor.arity(), components.len()));
        }
        if match_step.target() != descriptor.target() {
            return Err(target_mismatch(descriptor.target(), match_step.target()));
        }
        let pairs = components.iter().zip(descriptor.bindings());
        for (index, (component, binding)) in pairs.enumerate() {
            if component.accepts() != match_step.carrier_shape() {
                return Err(carrier_mismatch(
                    index,
                    match_step.carrier_shape(),
                    component.accepts(),
                ));
            }
            if component.binding_type() != binding {
                return Err(binding_type_mismatch(index, binding, component.binding_type()));
            }
        }
        tracing::trace!(descriptor = %descriptor, "pattern constructed");
        Ok(Pattern(Arc::new(PatternData {
            descriptor,
            match_step,
            components,
            widened_from,
        })))
    }

    pub(crate) fn widened_from(&self) -> Option<&Pattern> {
        self.0.widened_from.as_ref()
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.0.descriptor
    }

    pub fn target(&self) -> &Type {
        self.0.descriptor.target()
    }

    pub fn arity(&self) -> usize {
        self.0.descriptor.arity()
    }

    pub fn match_step(&self) -> &MatchStep {
        &self.0.match_step
    }

    pub fn component(&self, index: usize) -> Option<&ComponentStep> {
        self.0.components.get(index)
    }

    pub fn components(&self) -> &[ComponentStep] {
        &self.0.components
    }

    /// Test `target`; on success the carrier holds the bindings.
    pub fn try_match(&self, target: &Value) -> MatchResult {
        self.0.match_step.invoke(target)
    }

    /// Test `target` through a call site typed `static_type`.
    pub fn try_match_exact(&self, static_type: &Type, target: &Value) -> MatchResult {
        self.0.match_step.invoke_exact(static_type, target)
    }

    /// Read every binding out of a carrier produced by this pattern.
    pub fn extract(&self, carrier: &Carrier) -> Result<Vec<Value>, InvocationTypeError> {
        self.0
            .components
            .iter()
            .map(|component| component.invoke(carrier))
            .collect()
    }

    /// Match and extract in one call.
    pub fn match_bindings(
        &self,
        target: &Value,
    ) -> Result<Option<Vec<Value>>, InvocationTypeError> {
        match self.try_match(target)? {
            Some(carrier) => self.extract(&carrier).map(Some),
            None => Ok(None),
        }
    }

    // Primitive constructors

    /// Pattern whose digester always produces a carrier for non-null targets.
    pub fn total<F>(descriptor: Descriptor, digester: F) -> Result<Self, ConstructionError>
    where
        F: Fn(&Value, &CarrierFactory) -> Result<Carrier, InvocationTypeError>
            + Send
            + Sync
            + 'static,
    {
        if !descriptor.is_total() {
            return Err(partiality_mismatch("total", "total"));
        }
        Self::digesting(descriptor, move |target, factory| {
            digester(target, factory).map(Some)
        })
    }

    /// Pattern whose digester may report not-matched with `Ok(None)`.
    pub fn partial<F>(descriptor: Descriptor, digester: F) -> Result<Self, ConstructionError>
    where
        F: Fn(&Value, &CarrierFactory) -> MatchResult + Send + Sync + 'static,
    {
        if descriptor.is_total() {
            return Err(partiality_mismatch("partial", "partial"));
        }
        Self::digesting(descriptor, digester)
    }

    fn digesting<F>(descriptor: Descriptor, digester: F) -> Result<Self, ConstructionError>
    where
        F: Fn(&Value, &CarrierFactory) -> MatchResult + Send + Sync + 'static,
    {
        let strategy = CarrierStrategy::of(descriptor.bindings());
        let factory = strategy.factory();
        let shape = strategy.shape().clone();
        let step = MatchStep::new(descriptor.target().clone(), shape.clone(), move |target| {
            if target.is_null() {
                return Ok(None);
            }
            match digester(target, &factory)? {
                Some(carrier) if !shape.admits(&carrier) => {
                    Err(carrier_shape(shape.name(), carrier.shape_name()))
                }
                outcome => Ok(outcome),
            }
        });
        Pattern::new(descriptor, step, strategy.accessors())
    }

    /// Total pattern whose bindings are computed by `components` and packed
    /// into a boxed carrier at match time.
    pub fn from_components(
        target: Type,
        components: Vec<Projection>,
    ) -> Result<Self, ConstructionError> {
        let strategy = CarrierStrategy::boxed(&projection_results(&target, &components)?);
        Self::packing(target, components, strategy)
    }

    pub(crate) fn packing(
        target: Type,
        components: Vec<Projection>,
        strategy: CarrierStrategy,
    ) -> Result<Self, ConstructionError> {
        let descriptor = Descriptor::total(target.clone(), strategy.bindings());
        let packer = strategy.clone();
        let step = MatchStep::new(target, strategy.shape().clone(), move |target| {
            if target.is_null() {
                return Ok(None);
            }
            let values = components
                .iter()
                .map(|projection| projection.apply(target))
                .collect::<Result<Vec<_>, _>>()?;
            packer.make(values).map(Some)
        });
        Pattern::new(descriptor, step, strategy.accessors())
    }

    /// Total pattern using the target as its own carrier; each binding is
    /// recomputed from the target whenever it is read.
    pub fn self_total(
        target: Type,
        components: Vec<Projection>,
    ) -> Result<Self, ConstructionError> {
        let bindings = projection_results(&target, &components)?;
        let descriptor = Descriptor::total(target.clone(), bindings);
        let step = MatchStep::new(
            target.clone(),
            CarrierShape::Target(target),
            |target| Ok((!target.is_null()).then(|| Carrier::Target(target.clone()))),
        );
        Self::self_carried(descriptor, step, components)
    }

    /// Like [`Pattern::self_total`], but the target only matches when
    /// `predicate` holds for it.
    pub fn self_partial(
        predicate: Predicate,
        components: Vec<Projection>,
    ) -> Result<Self, ConstructionError> {
        let target = predicate.source().clone();
        let bindings = projection_results(&target, &components)?;
        let descriptor = Descriptor::partial(target.clone(), bindings);
        let step = MatchStep::new(
            target.clone(),
            CarrierShape::Target(target),
            move |target| {
                Ok((!target.is_null() && predicate.test(target))
                    .then(|| Carrier::Target(target.clone())))
            },
        );
        Self::self_carried(descriptor, step, components)
    }

    fn self_carried(
        descriptor: Descriptor,
        step: MatchStep,
        components: Vec<Projection>,
    ) -> Result<Self, ConstructionError> {
        let shape = step.carrier_shape().clone();
        let components = components
            .into_iter()
            .map(|projection| {
                ComponentStep::new(shape.clone(), projection.result().clone(), move |carrier| {
                    projection.apply(target_of(carrier)?)
                })
            })
            .collect();
        Pattern::new(descriptor, step, components)
    }

    /// Matches non-null instances of `ty`, binding the target itself.
    pub fn of_type(ty: Type) -> Self {
        Self::type_test(ty, false)
    }

    /// Like [`Pattern::of_type`], but null also matches, binding null.
    pub fn of_type_nullable(ty: Type) -> Self {
        Self::type_test(ty, true)
    }

    fn type_test(ty: Type, nullable: bool) -> Self {
        let shape = CarrierShape::Target(ty.clone());
        let step = MatchStep::new(ty.clone(), shape.clone(), move |target| {
            if target.is_null() && !nullable {
                return Ok(None);
            }
            Ok(Some(Carrier::Target(target.clone())))
        });
        let component =
            ComponentStep::new(shape, ty.clone(), |carrier| target_of(carrier).cloned());
        Pattern(Arc::new(PatternData {
            descriptor: Descriptor::total(ty.clone(), vec![ty]),
            match_step: step,
            components: vec![component],
            widened_from: None,
        }))
    }

    /// Zero-binding pattern matching targets equal to `constant`.
    ///
    /// The target type is the constant's runtime type, or `Object` for null.
    pub fn of_constant(constant: Value) -> Self {
        let ty = constant.runtime_type().unwrap_or(Type::Object);
        let step = MatchStep::new(ty.clone(), CarrierShape::Target(ty.clone()), move |target| {
            Ok((*target == constant).then(|| Carrier::Target(target.clone())))
        });
        Pattern(Arc::new(PatternData {
            descriptor: Descriptor::partial(ty, Vec::<Type>::new()),
            match_step: step,
            components: Vec::new(),
            widened_from: None,
        }))
    }

    /// [`Pattern::of_type`] retargeted to accept `target`.
    pub fn of_type_for(ty: Type, target: &Type) -> Result<Self, ConstructionError> {
        Self::of_type(ty).adapt_target(target)
    }

    /// [`Pattern::of_type_nullable`] retargeted to accept `target`.
    pub fn of_type_nullable_for(ty: Type, target: &Type) -> Result<Self, ConstructionError> {
        Self::of_type_nullable(ty).adapt_target(target)
    }

    /// [`Pattern::of_constant`] retargeted to accept `target`.
    pub fn of_constant_for(constant: Value, target: &Type) -> Result<Self, ConstructionError> {
        Self::of_constant(constant).adapt_target(target)
    }
}

/// Binding types of `components`, each of which must read from `target`.
pub(crate) fn projection_results(
    target: &Type,
    components: &[Projection],
) -> Result<Vec<Type>, ConstructionError> {
    components
        .iter()
        .enumerate()
        .map(|(index, projection)| {
            if projection.source().is_assignable_from(target) {
                Ok(projection.result().clone())
            } else {
                Err(projection_source_mismatch(index, target, projection.source()))
            }
        })
        .collect()
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({})", self.0.descriptor)
    }
}
