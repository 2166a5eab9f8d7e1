//! Carrier strategies: how a match step packs extracted values and how
//! component steps read them back.
//!
//! Two layouts exist. The boxed layout stores values positionally in a
//! fresh `Slots` aggregate. The identity layout, used when a descriptor has
//! exactly one binding, makes the lone value the carrier itself. Both are
//! observably the same through `make` and `get`.
//!
//! Strategies are memoized per binding-type list. The cache is the only
//! shared mutable state in the crate: lookups take a read lock, misses build
//! the strategy outside any lock and publish it under the write lock,
//! keeping whichever entry won the race.

use std::fmt;
use std::sync::{Arc, OnceLock};

use decon_ir::{
    argument_count, binding_value_mismatch, carrier_shape, InvocationTypeError, Type, Value,
};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::step::ComponentStep;

/// Positional storage of a boxed carrier.
pub type Slots = SmallVec<[Value; 4]>;

/// The aggregate produced by one successful match.
#[derive(Clone, Debug)]
pub enum Carrier {
    /// The matched target itself; components re-derive bindings from it.
    Target(Value),
    /// The single binding of a one-binding descriptor.
    Single(Value),
    /// Fresh aggregate holding every binding positionally.
    Slots(Slots),
}

impl Carrier {
    /// Whether this carrier is the given target itself.
    pub fn is_target(&self, target: &Value) -> bool {
        matches!(self, Carrier::Target(v) if v.same_object(target))
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            Carrier::Target(_) => "target",
            Carrier::Single(_) => "single",
            Carrier::Slots(_) => "slots",
        }
    }
}

/// The static shape of the carriers a match step produces.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum CarrierShape {
    /// Self-carrier over the given target type.
    Target(Type),
    /// Identity carrier of one binding.
    Single(Type),
    /// Boxed carrier over the given binding types.
    Slots(Arc<[Type]>),
}

impl CarrierShape {
    pub fn name(&self) -> &'static str {
        match self {
            CarrierShape::Target(_) => "target",
            CarrierShape::Single(_) => "single",
            CarrierShape::Slots(_) => "slots",
        }
    }

    /// Whether `carrier` has the layout this shape describes.
    pub fn admits(&self, carrier: &Carrier) -> bool {
        match (self, carrier) {
            (CarrierShape::Target(_), Carrier::Target(_))
            | (CarrierShape::Single(_), Carrier::Single(_)) => true,
            (CarrierShape::Slots(types), Carrier::Slots(values)) => types.len() == values.len(),
            _ => false,
        }
    }
}

impl fmt::Display for CarrierShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarrierShape::Target(ty) => write!(f, "target({ty})"),
            CarrierShape::Single(ty) => write!(f, "single({ty})"),
            CarrierShape::Slots(types) => {
                write!(f, "slots(")?;
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{ty}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Debug for CarrierShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Layout {
    Identity,
    Boxed,
}

struct StrategyData {
    layout: Layout,
    bindings: Arc<[Type]>,
    shape: CarrierShape,
}

/// Carrier constructor and accessors for one binding-type list.
///
/// Cheap to clone; instances for the same binding types are shared.
#[derive(Clone)]
pub struct CarrierStrategy(Arc<StrategyData>);

impl CarrierStrategy {
    /// Strategy for `bindings`, using the identity layout for a single
    /// binding and the boxed layout otherwise.
    pub fn of(bindings: &[Type]) -> Self {
        let layout = if bindings.len() == 1 {
            Layout::Identity
        } else {
            Layout::Boxed
        };
        cached(layout, bindings)
    }

    /// Strategy for `bindings` that always uses the boxed layout.
    pub fn boxed(bindings: &[Type]) -> Self {
        cached(Layout::Boxed, bindings)
    }

    fn build(layout: Layout, bindings: &[Type]) -> Self {
        let bindings: Arc<[Type]> = Arc::from(bindings);
        let shape = match (layout, &*bindings) {
            (Layout::Identity, [only]) => CarrierShape::Single(only.clone()),
            _ => CarrierShape::Slots(Arc::clone(&bindings)),
        };
        CarrierStrategy(Arc::new(StrategyData {
            layout,
            bindings,
            shape,
        }))
    }

    pub fn bindings(&self) -> &[Type] {
        &self.0.bindings
    }

    pub fn arity(&self) -> usize {
        self.0.bindings.len()
    }

    pub fn is_identity(&self) -> bool {
        self.0.layout == Layout::Identity
    }

    /// Shape of every carrier this strategy makes.
    pub fn shape(&self) -> &CarrierShape {
        &self.0.shape
    }

    /// Pack `values` into a carrier. Each value must conform to the binding
    /// type at its position.
    pub fn make(
        &self,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Carrier, InvocationTypeError> {
        let mut values: Slots = values.into_iter().collect();
        let bindings = self.bindings();
        if values.len() != bindings.len() {
            return Err(argument_count(bindings.len(), values.len()));
        }
        for (index, (value, ty)) in values.iter().zip(bindings.iter()).enumerate() {
            if !value.conforms_to(ty) {
                return Err(binding_value_mismatch(index, ty, value));
            }
        }
        if self.is_identity() {
            if let Some(only) = values.pop() {
                return Ok(Carrier::Single(only));
            }
        }
        Ok(Carrier::Slots(values))
    }

    /// Read the `index`th value back out of a carrier made by this strategy.
    pub fn get(&self, carrier: &Carrier, index: usize) -> Result<Value, InvocationTypeError> {
        let value = match (self.0.layout, carrier) {
            (Layout::Identity, Carrier::Single(v)) if index == 0 => Some(v),
            (Layout::Boxed, Carrier::Slots(values)) if values.len() == self.arity() => {
                values.get(index)
            }
            _ => None,
        };
        value
            .cloned()
            .ok_or_else(|| carrier_shape(self.0.shape.name(), carrier.shape_name()))
    }

    /// Component step reading the `index`th binding.
    pub fn accessor(&self, index: usize) -> Option<ComponentStep> {
        let ty = self.bindings().get(index)?.clone();
        let strategy = self.clone();
        Some(ComponentStep::new(self.shape().clone(), ty, move |carrier| {
            strategy.get(carrier, index)
        }))
    }

    /// One component step per binding, in order.
    pub fn accessors(&self) -> Vec<ComponentStep> {
        (0..self.arity()).filter_map(|i| self.accessor(i)).collect()
    }

    /// The constructor handed to digesters.
    pub fn factory(&self) -> CarrierFactory {
        CarrierFactory(self.clone())
    }
}

impl fmt::Debug for CarrierStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CarrierStrategy({:?}, {})", self.0.layout, self.0.shape)
    }
}

/// Carrier constructor for one descriptor, as seen by a digester.
#[derive(Clone, Debug)]
pub struct CarrierFactory(CarrierStrategy);

impl CarrierFactory {
    /// Pack one value per binding, in binding order.
    pub fn make(
        &self,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Carrier, InvocationTypeError> {
        self.0.make(values)
    }

    pub fn bindings(&self) -> &[Type] {
        self.0.bindings()
    }
}

// Strategy cache

type StrategyMap = RwLock<FxHashMap<Arc<[Type]>, CarrierStrategy>>;

#[derive(Default)]
struct StrategyCache {
    identity: StrategyMap,
    boxed: StrategyMap,
}

static STRATEGIES: OnceLock<StrategyCache> = OnceLock::new();

fn cached(layout: Layout, bindings: &[Type]) -> CarrierStrategy {
    let cache = STRATEGIES.get_or_init(StrategyCache::default);
    let map = match layout {
        Layout::Identity => &cache.identity,
        Layout::Boxed => &cache.boxed,
    };

    // Fast path: read lock
    if let Some(strategy) = map.read().get(bindings) {
        return strategy.clone();
    }

    let built = CarrierStrategy::build(layout, bindings);

    // Slow path: write lock, another thread may have published first
    let mut guard = map.write();
    if let Some(strategy) = guard.get(bindings) {
        return strategy.clone();
    }
    tracing::debug!(layout = ?layout, shape = %built.shape(), "carrier strategy published");
    guard.insert(Arc::clone(&built.0.bindings), built.clone());
    built
}
