//! Nominal runtime types.
//!
//! Reference types form one hierarchy rooted at `Object`; primitives stand
//! outside it and are only ever assignable from themselves.

mod class;

pub use class::{Class, ClassKind, Field};

use std::fmt;

/// Primitive kinds. Each has a non-nullable form (`Type::Prim`) and a
/// nullable box (`Type::Boxed`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Prim {
    Bool,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl Prim {
    /// Keyword-style name of the primitive form.
    pub fn name(self) -> &'static str {
        match self {
            Prim::Bool => "boolean",
            Prim::Byte => "byte",
            Prim::Short => "short",
            Prim::Char => "char",
            Prim::Int => "int",
            Prim::Long => "long",
            Prim::Float => "float",
            Prim::Double => "double",
        }
    }

    /// Name of the boxed form.
    pub fn box_name(self) -> &'static str {
        match self {
            Prim::Bool => "Boolean",
            Prim::Byte => "Byte",
            Prim::Short => "Short",
            Prim::Char => "Character",
            Prim::Int => "Integer",
            Prim::Long => "Long",
            Prim::Float => "Float",
            Prim::Double => "Double",
        }
    }

    /// Boxes of numeric primitives are subtypes of `Number`.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Prim::Bool | Prim::Char)
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Prim::Byte | Prim::Short | Prim::Char | Prim::Int | Prim::Long
        )
    }
}

/// A runtime type a pattern or dispatcher can be declared against.
///
/// Equality is nominal; `Class` compares by identity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Root of the reference hierarchy.
    Object,
    /// Supertype of the numeric boxes.
    Number,
    Str,
    /// Non-nullable primitive.
    Prim(Prim),
    /// Nullable box of a primitive.
    Boxed(Prim),
    /// User-declared class, record or enum.
    Class(Class),
}

impl Type {
    pub const BOOL: Type = Type::Prim(Prim::Bool);
    pub const BYTE: Type = Type::Prim(Prim::Byte);
    pub const SHORT: Type = Type::Prim(Prim::Short);
    pub const CHAR: Type = Type::Prim(Prim::Char);
    pub const INT: Type = Type::Prim(Prim::Int);
    pub const LONG: Type = Type::Prim(Prim::Long);
    pub const FLOAT: Type = Type::Prim(Prim::Float);
    pub const DOUBLE: Type = Type::Prim(Prim::Double);

    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Prim(_))
    }

    /// Reference types admit null.
    #[inline]
    pub fn is_reference(&self) -> bool {
        !self.is_primitive()
    }

    pub fn as_prim(&self) -> Option<Prim> {
        match self {
            Type::Prim(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Type::Class(c) => Some(c),
            _ => None,
        }
    }

    /// The primitive kind behind either the primitive or its box.
    pub fn prim_kind(&self) -> Option<Prim> {
        match self {
            Type::Prim(p) | Type::Boxed(p) => Some(*p),
            _ => None,
        }
    }

    /// The reference type values of this type are boxed into.
    pub fn boxed(&self) -> Type {
        match self {
            Type::Prim(p) => Type::Boxed(*p),
            other => other.clone(),
        }
    }

    /// Direct supertype; `None` for `Object` and primitives.
    pub fn superclass(&self) -> Option<Type> {
        match self {
            Type::Object | Type::Prim(_) => None,
            Type::Number | Type::Str => Some(Type::Object),
            Type::Boxed(p) if p.is_numeric() => Some(Type::Number),
            Type::Boxed(_) => Some(Type::Object),
            Type::Class(c) => Some(c.superclass().map_or(Type::Object, |s| Type::Class(s.clone()))),
        }
    }

    /// Whether every value of `other` is also a value of `self`.
    pub fn is_assignable_from(&self, other: &Type) -> bool {
        if self == other {
            return true;
        }
        if self.is_primitive() || other.is_primitive() {
            return false;
        }
        if *self == Type::Object {
            return true;
        }
        let mut current = other.superclass();
        while let Some(ty) = current {
            if ty == *self {
                return true;
            }
            current = ty.superclass();
        }
        false
    }

    pub fn is_enum(&self) -> bool {
        self.as_class().is_some_and(Class::is_enum)
    }

    pub fn is_record(&self) -> bool {
        self.as_class().is_some_and(Class::is_record)
    }

    /// Unqualified name, as used when mangling member names.
    pub fn simple_name(&self) -> &str {
        match self {
            Type::Class(c) => c.simple_name(),
            Type::Object => "Object",
            Type::Number => "Number",
            Type::Str => "String",
            Type::Prim(p) => p.name(),
            Type::Boxed(p) => p.box_name(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Class(c) => f.write_str(c.name()),
            other => f.write_str(other.simple_name()),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<Prim> for Type {
    fn from(prim: Prim) -> Self {
        Type::Prim(prim)
    }
}

impl From<Class> for Type {
    fn from(class: Class) -> Self {
        Type::Class(class)
    }
}
