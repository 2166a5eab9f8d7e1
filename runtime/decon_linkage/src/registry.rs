//! Named pattern lookup.
//!
//! User types declare patterns as zero-argument factories registered under
//! a [`MemberKey`]. Lookup finds the factory by owner and mangled name,
//! runs it, and checks that the pattern it returns has the requested shape.
//! A record owner with nothing registered for its canonical component list
//! gets a pattern synthesized from its components.

use std::fmt;
use std::sync::{Arc, OnceLock};

use decon_ir::{descriptor_mismatch, pattern_not_found, ConstructionError, Type};
use decon_patterns::{Descriptor, Pattern, Projection};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::metadata::DeconstructorInfo;

/// A zero-argument factory producing a pattern.
pub type PatternFactory = Arc<dyn Fn() -> Result<Pattern, ConstructionError> + Send + Sync>;

/// How a pattern member is declared on its owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RefKind {
    Static,
    Virtual,
    Interface,
    /// A deconstructor; named after its owner.
    Constructor,
}

/// Identifies one pattern member of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemberKey {
    pub owner: Type,
    pub bindings: Arc<[Type]>,
    pub name: String,
    pub kind: RefKind,
}

impl MemberKey {
    pub fn new(
        owner: Type,
        bindings: impl Into<Arc<[Type]>>,
        name: impl Into<String>,
        kind: RefKind,
    ) -> Self {
        MemberKey {
            owner,
            bindings: bindings.into(),
            name: name.into(),
            kind,
        }
    }

    /// Key of the deconstructor of `owner` with the given bindings.
    pub fn deconstructor(owner: Type, bindings: impl Into<Arc<[Type]>>) -> Self {
        let name = owner.simple_name().to_string();
        Self::new(owner, bindings, name, RefKind::Constructor)
    }

    /// Name the member is looked up by: the owner's simple name for a
    /// deconstructor, otherwise the declared name.
    pub fn member_name(&self) -> &str {
        match self.kind {
            RefKind::Constructor => self.owner.simple_name(),
            RefKind::Static | RefKind::Virtual | RefKind::Interface => &self.name,
        }
    }

    /// `$pattern$<name>$(<binding types>)`
    pub fn mangled(&self) -> String {
        let bindings: Vec<String> = self.bindings.iter().map(ToString::to_string).collect();
        format!("$pattern${}$({})", self.member_name(), bindings.join(","))
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.mangled())
    }
}

/// One pattern member contributed by a [`PatternSource`].
#[derive(Clone, Debug)]
pub struct PatternMember {
    pub name: String,
    pub kind: RefKind,
    pub info: DeconstructorInfo,
}

impl PatternMember {
    pub fn new(name: impl Into<String>, kind: RefKind, info: DeconstructorInfo) -> Self {
        PatternMember {
            name: name.into(),
            kind,
            info,
        }
    }
}

/// A user type that declares patterns.
pub trait PatternSource {
    /// The declaring type.
    fn owner(&self) -> Type;

    /// Every pattern member declared on [`PatternSource::owner`].
    fn pattern_members(&self) -> Vec<PatternMember>;
}

type FactoryMap = FxHashMap<(Type, String), PatternFactory>;

/// Thread-safe table of pattern factories.
#[derive(Default)]
pub struct PatternRegistry {
    factories: RwLock<FactoryMap>,
    /// Patterns synthesized for record owners, one per record.
    synthesized: RwLock<FxHashMap<Type, Pattern>>,
}

static GLOBAL: OnceLock<PatternRegistry> = OnceLock::new();

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static PatternRegistry {
        GLOBAL.get_or_init(PatternRegistry::new)
    }

    /// Register `factory` under `key`, replacing any earlier registration.
    pub fn register<F>(&self, key: &MemberKey, factory: F)
    where
        F: Fn() -> Result<Pattern, ConstructionError> + Send + Sync + 'static,
    {
        let mangled = key.mangled();
        let previous = self
            .factories
            .write()
            .insert((key.owner.clone(), mangled.clone()), Arc::new(factory));
        if previous.is_some() {
            tracing::warn!(
                owner = %key.owner,
                name = %mangled,
                "pattern registered twice, keeping the latest"
            );
        }
    }

    /// Register the pattern `info` describes under `name` and `kind`.
    pub fn register_member(&self, owner: Type, member: PatternMember) {
        let key = MemberKey::new(owner, member.info.binding_types(), member.name, member.kind);
        let info = member.info;
        self.register(&key, move || info.clone().into_pattern());
    }

    /// Register a deconstructor of `info.declaring`.
    pub fn register_deconstructor(&self, info: DeconstructorInfo) {
        let key = MemberKey::deconstructor(info.declaring.clone(), info.binding_types());
        self.register(&key, move || info.clone().into_pattern());
    }

    /// Register every member `source` declares. Returns how many there were.
    pub fn register_source(&self, source: &dyn PatternSource) -> usize {
        let owner = source.owner();
        let members = source.pattern_members();
        let count = members.len();
        for member in members {
            self.register_member(owner.clone(), member);
        }
        tracing::debug!(owner = %owner, count, "pattern source registered");
        count
    }

    pub fn contains(&self, key: &MemberKey) -> bool {
        self.factories
            .read()
            .contains_key(&(key.owner.clone(), key.mangled()))
    }

    /// Build the pattern `key` names.
    ///
    /// The factory runs outside the registry lock. Its pattern must target
    /// `key.owner` with exactly `key.bindings`.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key))]
    pub fn find_named(&self, key: &MemberKey) -> Result<Pattern, ConstructionError> {
        let mangled = key.mangled();
        let factory = self
            .factories
            .read()
            .get(&(key.owner.clone(), mangled.clone()))
            .cloned();

        let pattern = match factory {
            Some(factory) => factory()?,
            None => self
                .synthesize_record(key)?
                .ok_or_else(|| pattern_not_found(&key.owner, &mangled))?,
        };

        if pattern.target() != &key.owner || pattern.descriptor().bindings() != &*key.bindings {
            let expected = Descriptor::total(key.owner.clone(), Arc::clone(&key.bindings));
            return Err(descriptor_mismatch(&mangled, expected, pattern.descriptor()));
        }
        Ok(pattern)
    }

    /// Eager component pattern for a record deconstructor key naming the
    /// record's canonical component list.
    fn synthesize_record(&self, key: &MemberKey) -> Result<Option<Pattern>, ConstructionError> {
        if key.kind != RefKind::Constructor {
            return Ok(None);
        }
        let Some(record) = key.owner.as_class().filter(|class| class.is_record()) else {
            return Ok(None);
        };
        let canonical = record
            .fields()
            .iter()
            .map(|field| &field.ty)
            .eq(key.bindings.iter());
        if !canonical {
            return Ok(None);
        }

        // Fast path: read lock
        if let Some(pattern) = self.synthesized.read().get(&key.owner) {
            return Ok(Some(pattern.clone()));
        }

        let built =
            Pattern::of_eager_projection(key.owner.clone(), Projection::components(record))?;

        // Slow path: write lock, another thread may have published first
        let mut guard = self.synthesized.write();
        if let Some(pattern) = guard.get(&key.owner) {
            return Ok(Some(pattern.clone()));
        }
        tracing::debug!(record = %key.owner, "record pattern synthesized");
        guard.insert(key.owner.clone(), built.clone());
        Ok(Some(built))
    }
}

impl fmt::Debug for PatternRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRegistry")
            .field("factories", &self.factories.read().len())
            .field("synthesized", &self.synthesized.read().len())
            .finish()
    }
}
