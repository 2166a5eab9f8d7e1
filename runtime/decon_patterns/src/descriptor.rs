//! Pattern descriptors: the static shape of a pattern.

use std::fmt;
use std::sync::Arc;

use decon_ir::Type;

/// Whether a pattern may fail on a non-null target of its target type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Partiality {
    /// Every non-null value of the target type matches.
    Total,
    /// Matching may fail.
    Partial,
}

impl Partiality {
    pub fn name(self) -> &'static str {
        match self {
            Partiality::Total => "total",
            Partiality::Partial => "partial",
        }
    }
}

/// Target type, ordered binding types and partiality of a pattern.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Descriptor {
    target: Type,
    bindings: Arc<[Type]>,
    partiality: Partiality,
}

impl Descriptor {
    pub fn new(target: Type, bindings: impl Into<Arc<[Type]>>, partiality: Partiality) -> Self {
        Descriptor {
            target,
            bindings: bindings.into(),
            partiality,
        }
    }

    pub fn total(target: Type, bindings: impl Into<Arc<[Type]>>) -> Self {
        Self::new(target, bindings, Partiality::Total)
    }

    pub fn partial(target: Type, bindings: impl Into<Arc<[Type]>>) -> Self {
        Self::new(target, bindings, Partiality::Partial)
    }

    pub fn target(&self) -> &Type {
        &self.target
    }

    pub fn bindings(&self) -> &[Type] {
        &self.bindings
    }

    pub fn binding(&self, index: usize) -> Option<&Type> {
        self.bindings.get(index)
    }

    pub fn arity(&self) -> usize {
        self.bindings.len()
    }

    pub fn partiality(&self) -> Partiality {
        self.partiality
    }

    pub fn is_total(&self) -> bool {
        self.partiality == Partiality::Total
    }

    #[must_use]
    pub fn with_target(&self, target: Type) -> Self {
        Descriptor {
            target,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_bindings(&self, bindings: impl Into<Arc<[Type]>>) -> Self {
        Descriptor {
            bindings: bindings.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_partiality(&self, partiality: Partiality) -> Self {
        Descriptor {
            partiality,
            ..self.clone()
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.target)?;
        for (i, ty) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ty}")?;
        }
        write!(f, ")")?;
        if self.partiality == Partiality::Partial {
            write!(f, "?")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
