//! User-declared classes, records and enums.

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashMap;

use super::Type;
use crate::errors::{argument_count, binding_value_mismatch, not_instantiable, InvocationTypeError};
use crate::value::{EnumConstant, Heap, Instance, Value};

/// What a class declares beyond its name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClassKind {
    /// Ordinary class; instances compare by identity.
    Plain,
    /// Record; instances compare component-wise.
    Record,
    /// Enum; values are its declared constants.
    Enum,
}

/// A named, typed field or record component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Field {
            name: name.into(),
            ty,
        }
    }
}

struct ClassDef {
    name: String,
    superclass: Option<Class>,
    kind: ClassKind,
    /// Instance layout, inherited fields first.
    fields: Vec<Field>,
    /// Enum constants in ordinal order.
    constants: Vec<String>,
    /// Field name (or constant name, for enums) to position.
    members: FxHashMap<String, u32>,
}

/// Shared handle to a class declaration. Equality and hashing are by
/// identity: two separately declared classes with the same name differ.
#[derive(Clone)]
pub struct Class(Heap<ClassDef>);

impl Class {
    /// Declare a plain class. Its layout is the superclass layout followed by
    /// `fields`.
    pub fn plain(name: impl Into<String>, superclass: Option<&Class>, fields: Vec<Field>) -> Self {
        let mut layout = superclass.map(|s| s.fields().to_vec()).unwrap_or_default();
        layout.extend(fields);
        Self::declare(name.into(), superclass.cloned(), ClassKind::Plain, layout, Vec::new())
    }

    /// Declare a record with the given ordered components.
    pub fn record(name: impl Into<String>, components: Vec<Field>) -> Self {
        Self::declare(name.into(), None, ClassKind::Record, components, Vec::new())
    }

    /// Declare an enum with the given constants in ordinal order.
    pub fn enumeration<S: Into<String>>(
        name: impl Into<String>,
        constants: impl IntoIterator<Item = S>,
    ) -> Self {
        let constants = constants.into_iter().map(Into::into).collect();
        Self::declare(name.into(), None, ClassKind::Enum, Vec::new(), constants)
    }

    fn declare(
        name: String,
        superclass: Option<Class>,
        kind: ClassKind,
        fields: Vec<Field>,
        constants: Vec<String>,
    ) -> Self {
        let mut members = FxHashMap::default();
        // Later declarations shadow inherited fields of the same name.
        for (i, field) in fields.iter().enumerate() {
            members.insert(field.name.clone(), position(i));
        }
        for (i, constant) in constants.iter().enumerate() {
            members.entry(constant.clone()).or_insert(position(i));
        }
        Class(Heap::new(ClassDef {
            name,
            superclass,
            kind,
            fields,
            constants,
            members,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Name without any package or enclosing-class qualifier.
    pub fn simple_name(&self) -> &str {
        let name = self.name();
        name.rsplit(|c| c == '.' || c == '$').next().unwrap_or(name)
    }

    pub fn superclass(&self) -> Option<&Class> {
        self.0.superclass.as_ref()
    }

    pub fn kind(&self) -> ClassKind {
        self.0.kind
    }

    pub fn is_record(&self) -> bool {
        self.0.kind == ClassKind::Record
    }

    pub fn is_enum(&self) -> bool {
        self.0.kind == ClassKind::Enum
    }

    /// Instance layout; record components for records, empty for enums.
    pub fn fields(&self) -> &[Field] {
        &self.0.fields
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        if self.is_enum() {
            return None;
        }
        self.0.members.get(name).map(|&i| i as usize)
    }

    /// Enum constant names in ordinal order.
    pub fn constants(&self) -> &[String] {
        &self.0.constants
    }

    pub fn constant_ordinal(&self, name: &str) -> Option<u32> {
        if !self.is_enum() {
            return None;
        }
        self.0.members.get(name).copied()
    }

    /// The enum constant with the given name.
    pub fn constant(&self, name: &str) -> Option<Value> {
        let ordinal = self.constant_ordinal(name)?;
        Some(Value::Enum(EnumConstant::new(self.clone(), ordinal)))
    }

    /// Whether `self` is `other` or inherits from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.superclass();
        }
        false
    }

    /// Construct an instance from field values in layout order.
    pub fn instantiate(&self, values: Vec<Value>) -> Result<Value, InvocationTypeError> {
        if self.is_enum() {
            return Err(not_instantiable(self.name()));
        }
        let fields = self.fields();
        if values.len() != fields.len() {
            return Err(argument_count(fields.len(), values.len()));
        }
        for (index, (value, field)) in values.iter().zip(fields).enumerate() {
            if !value.conforms_to(&field.ty) {
                return Err(binding_value_mismatch(index, &field.ty, value));
            }
        }
        Ok(Value::Object(Heap::new(Instance::new(
            self.clone(),
            values.into_boxed_slice(),
        ))))
    }

    /// Identity of the underlying declaration.
    pub(crate) fn addr(&self) -> *const () {
        Heap::as_ptr(&self.0).cast()
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "class layouts never approach u32::MAX members"
)]
fn position(i: usize) -> u32 {
    i as u32
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Heap::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.kind(), self.name())
    }
}
