//! Combinators building new patterns from existing ones.
//!
//! Every combinator returns a pattern validated by [`Pattern::new`]; none of
//! them mutate their inputs.

use std::sync::Arc;

use decon_ir::{
    incompatible_target, index_out_of_bounds, too_many_inner_patterns, ConstructionError,
    InvocationTypeError, Type, Value,
};

use crate::carrier::{Carrier, CarrierFactory, CarrierStrategy};
use crate::descriptor::{Descriptor, Partiality};
use crate::pattern::{projection_results, Pattern};
use crate::stack::ensure_sufficient_stack;
use crate::step::{MatchResult, MatchStep, Projection};

type TotalDigestFn =
    dyn Fn(&Value, &CarrierFactory) -> Result<Carrier, InvocationTypeError> + Send + Sync;
type PartialDigestFn = dyn Fn(&Value, &CarrierFactory) -> MatchResult + Send + Sync;

/// A user function computing every raw binding of a target and handing them
/// to the carrier factory.
#[derive(Clone)]
pub enum Digester {
    /// Always produces a carrier.
    Total(Arc<TotalDigestFn>),
    /// May decide the target does not match.
    Partial(Arc<PartialDigestFn>),
}

impl Digester {
    pub fn total<F>(f: F) -> Self
    where
        F: Fn(&Value, &CarrierFactory) -> Result<Carrier, InvocationTypeError>
            + Send
            + Sync
            + 'static,
    {
        Digester::Total(Arc::new(f))
    }

    pub fn partial<F>(f: F) -> Self
    where
        F: Fn(&Value, &CarrierFactory) -> MatchResult + Send + Sync + 'static,
    {
        Digester::Partial(Arc::new(f))
    }
}

impl Pattern {
    /// Retarget this pattern to accept values of `target`.
    ///
    /// Widening to a supertype tests each non-null target for membership in
    /// the old target type; non-members do not match, null reaches this
    /// pattern unchanged. Narrowing to a subtype adds no test, and narrowing
    /// a widened pattern back to the type it was widened from yields that
    /// pattern again. A primitive pattern can be retargeted to its box or any
    /// supertype of the box, and a pattern over a box or its supertypes can
    /// be retargeted to the primitive.
    pub fn adapt_target(&self, target: &Type) -> Result<Pattern, ConstructionError> {
        let from = self.target();
        if from == target {
            return Ok(self.clone());
        }
        let mut origin = self.widened_from();
        while let Some(pattern) = origin {
            if pattern.target() == target {
                return Ok(pattern.clone());
            }
            origin = pattern.widened_from();
        }

        let inner = self.match_step().clone();
        let shape = inner.carrier_shape().clone();
        let (step, partiality, widened) = if let Some(prim) = from.as_prim() {
            let boxed = Type::Boxed(prim);
            if !target.is_assignable_from(&boxed) {
                return Err(incompatible_target(from, target));
            }
            let widened = *target != boxed;
            let partiality = if widened {
                Partiality::Partial
            } else {
                self.descriptor().partiality()
            };
            let step = MatchStep::new(target.clone(), shape, move |value| {
                if value.is_instance_of(&boxed) {
                    inner.call(value)
                } else {
                    Ok(None)
                }
            });
            (step, partiality, widened)
        } else if target.is_primitive() {
            if !from.is_assignable_from(&target.boxed()) {
                return Err(incompatible_target(from, target));
            }
            let step = MatchStep::new(target.clone(), shape, move |value| inner.call(value));
            (step, self.descriptor().partiality(), false)
        } else if target.is_assignable_from(from) {
            let from = from.clone();
            let step = MatchStep::new(target.clone(), shape, move |value| {
                if value.is_null() || value.is_instance_of(&from) {
                    inner.call(value)
                } else {
                    Ok(None)
                }
            });
            (step, Partiality::Partial, true)
        } else if from.is_assignable_from(target) {
            let step = MatchStep::new(target.clone(), shape, move |value| inner.call(value));
            (step, self.descriptor().partiality(), false)
        } else {
            return Err(incompatible_target(from, target));
        };

        let descriptor = self
            .descriptor()
            .with_target(target.clone())
            .with_partiality(partiality);
        let origin = widened.then(|| self.clone());
        Pattern::assemble(descriptor, step, self.components().to_vec(), origin)
    }

    /// Apply `inners[i]`, when present, to this pattern's `i`th binding.
    ///
    /// The result binds this pattern's bindings followed by each present
    /// inner pattern's bindings, in binding order. It fails when this pattern
    /// fails or any inner pattern fails on its binding. A `None` entry leaves
    /// its binding unexpanded. Each inner pattern is first retargeted to the
    /// type of the binding it applies to.
    pub fn nested(&self, inners: &[Option<Pattern>]) -> Result<Pattern, ConstructionError> {
        if inners.len() > self.arity() {
            return Err(too_many_inner_patterns(self.arity(), inners.len()));
        }
        let inners = inners
            .iter()
            .zip(self.descriptor().bindings())
            .enumerate()
            .filter_map(|(index, (inner, binding))| {
                let inner = inner.as_ref()?;
                Some(inner.adapt_target(binding).map(|inner| (index, inner)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut bindings = self.descriptor().bindings().to_vec();
        for (_, inner) in &inners {
            bindings.extend_from_slice(inner.descriptor().bindings());
        }
        let partiality = if inners.is_empty() {
            self.descriptor().partiality()
        } else {
            Partiality::Partial
        };
        let descriptor = Descriptor::new(self.target().clone(), bindings, partiality);
        let strategy = CarrierStrategy::of(descriptor.bindings());

        let outer = self.clone();
        let packer = strategy.clone();
        let step = MatchStep::new(self.target().clone(), strategy.shape().clone(), move |target| {
            ensure_sufficient_stack(|| {
                let Some(carrier) = outer.match_step().call(target)? else {
                    return Ok(None);
                };
                let mut values = outer.extract(&carrier)?;
                for (index, inner) in &inners {
                    let Some(inner_carrier) = inner.match_step().call(&values[*index])? else {
                        return Ok(None);
                    };
                    let inner_values = inner.extract(&inner_carrier)?;
                    values.extend(inner_values);
                }
                packer.make(values).map(Some)
            })
        });
        Pattern::new(descriptor, step, strategy.accessors())
    }

    /// Project away the bindings at `indices`, keeping the rest in order.
    ///
    /// Repeated indices are dropped once. Any index outside `0..arity` is an
    /// error. The match step, and so the carrier, is unchanged.
    pub fn drop_bindings(&self, indices: &[isize]) -> Result<Pattern, ConstructionError> {
        let arity = self.arity();
        let mut dropped = vec![false; arity];
        for &index in indices {
            let slot = usize::try_from(index)
                .ok()
                .and_then(|i| dropped.get_mut(i))
                .ok_or_else(|| index_out_of_bounds(index, arity))?;
            *slot = true;
        }

        let (bindings, components): (Vec<_>, Vec<_>) = self
            .descriptor()
            .bindings()
            .iter()
            .zip(self.components())
            .zip(&dropped)
            .filter(|(_, drop)| !**drop)
            .map(|((binding, component), _)| (binding.clone(), component.clone()))
            .unzip();
        let descriptor = self.descriptor().with_bindings(bindings);
        Pattern::new(descriptor, self.match_step().clone(), components)
    }

    /// Self-carrier pattern over instances of `ty`; every read of a binding
    /// calls its projection on the target again.
    pub fn of_lazy_projection(
        ty: Type,
        components: Vec<Projection>,
    ) -> Result<Pattern, ConstructionError> {
        Pattern::self_total(ty, components)
    }

    /// Pattern over instances of `ty` that calls every projection exactly
    /// once per match and packs the results into a fresh carrier.
    pub fn of_eager_projection(
        ty: Type,
        components: Vec<Projection>,
    ) -> Result<Pattern, ConstructionError> {
        let strategy = CarrierStrategy::of(&projection_results(&ty, &components)?);
        Pattern::packing(ty, components, strategy)
    }

    /// Pattern whose digester computes every binding and calls the carrier
    /// factory itself. A [`Digester::Partial`] may also decline the target.
    pub fn of_imperative(
        target: Type,
        bindings: impl Into<Arc<[Type]>>,
        digester: Digester,
    ) -> Result<Pattern, ConstructionError> {
        match digester {
            Digester::Total(f) => {
                Pattern::total(Descriptor::total(target, bindings), move |t, c| f(t, c))
            }
            Digester::Partial(f) => {
                Pattern::partial(Descriptor::partial(target, bindings), move |t, c| f(t, c))
            }
        }
    }

    /// Fuse this pattern with `downstream` into one function: match, and on
    /// success call `downstream` with the bindings in order. A target that
    /// does not match yields `Ok(None)` without calling `downstream`.
    pub fn compose<R, F>(
        &self,
        downstream: F,
    ) -> impl Fn(&Value) -> Result<Option<R>, InvocationTypeError> + Send + Sync
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
    {
        let pattern = self.clone();
        move |target| {
            let Some(bindings) = pattern.match_bindings(target)? else {
                return Ok(None);
            };
            Ok(Some(downstream(&bindings)))
        }
    }
}
