//! Runtime values.
//!
//! Primitive payloads are stored inline and always carry the runtime type of
//! their box. Strings, instances and enum constants share their payload.

mod heap;

pub use heap::Heap;

use std::fmt;

use crate::types::{Class, Prim, Type};

/// An instance of a plain class or record.
pub struct Instance {
    class: Class,
    fields: Box<[Value]>,
}

impl Instance {
    pub(crate) fn new(class: Class, fields: Box<[Value]>) -> Self {
        Instance { class, fields }
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    /// Field values in layout order.
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }
}

/// One constant of an enum class.
#[derive(Clone)]
pub struct EnumConstant {
    class: Class,
    ordinal: u32,
}

impl EnumConstant {
    pub(crate) fn new(class: Class, ordinal: u32) -> Self {
        EnumConstant { class, ordinal }
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        self.class
            .constants()
            .get(self.ordinal as usize)
            .map_or("", String::as_str)
    }
}

impl PartialEq for EnumConstant {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.ordinal == other.ordinal
    }
}

/// A runtime value a pattern can be matched against.
///
/// Equality (`==`) is value equality: strings by content, records
/// component-wise, plain objects by identity, floating-point payloads by
/// canonical bit pattern. Boxes of different primitive kinds never compare
/// equal, so `Int(3) != Long(3)`.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Char(u16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(Heap<str>),
    Object(Heap<Instance>),
    Enum(EnumConstant),
}

impl Value {
    /// Create a string value.
    pub fn string(s: &str) -> Self {
        Value::Str(Heap::from_str(s))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Primitive kind of an inline payload.
    pub fn prim_kind(&self) -> Option<Prim> {
        Some(match self {
            Value::Bool(_) => Prim::Bool,
            Value::Byte(_) => Prim::Byte,
            Value::Short(_) => Prim::Short,
            Value::Char(_) => Prim::Char,
            Value::Int(_) => Prim::Int,
            Value::Long(_) => Prim::Long,
            Value::Float(_) => Prim::Float,
            Value::Double(_) => Prim::Double,
            _ => return None,
        })
    }

    /// Most specific type of this value; `None` for null.
    pub fn runtime_type(&self) -> Option<Type> {
        if let Some(prim) = self.prim_kind() {
            return Some(Type::Boxed(prim));
        }
        match self {
            Value::Str(_) => Some(Type::Str),
            Value::Object(instance) => Some(Type::Class(instance.class().clone())),
            Value::Enum(constant) => Some(Type::Class(constant.class().clone())),
            _ => None,
        }
    }

    /// Name of the runtime type, or `null`.
    pub fn type_name(&self) -> String {
        self.runtime_type()
            .map_or_else(|| "null".to_string(), |ty| ty.to_string())
    }

    /// Whether this value is a non-null instance of `ty`.
    ///
    /// A primitive type accepts exactly the values of its box.
    pub fn is_instance_of(&self, ty: &Type) -> bool {
        match (self, ty) {
            (Value::Null, _) => false,
            (_, Type::Object) => true,
            (_, Type::Prim(p) | Type::Boxed(p)) => self.prim_kind() == Some(*p),
            (_, Type::Number) => self.prim_kind().is_some_and(Prim::is_numeric),
            (Value::Str(_), Type::Str) => true,
            (Value::Object(instance), Type::Class(class)) => instance.class().is_subclass_of(class),
            (Value::Enum(constant), Type::Class(class)) => constant.class() == class,
            _ => false,
        }
    }

    /// Whether this value may be passed where `ty` is expected: null for any
    /// reference type, otherwise an instance of `ty`.
    #[inline]
    pub fn conforms_to(&self, ty: &Type) -> bool {
        if self.is_null() {
            ty.is_reference()
        } else {
            self.is_instance_of(ty)
        }
    }

    /// Reference identity for heap values; value identity for inline payloads.
    pub fn same_object(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Heap::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Heap::ptr_eq(a, b),
            (Value::Str(_) | Value::Object(_), _) | (_, Value::Str(_) | Value::Object(_)) => false,
            _ => self == other,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumConstant> {
        match self {
            Value::Enum(constant) => Some(constant),
            _ => None,
        }
    }

    /// Integral payload of `int` or narrower, widened.
    pub fn as_int(&self) -> Option<i32> {
        match *self {
            Value::Byte(v) => Some(i32::from(v)),
            Value::Short(v) => Some(i32::from(v)),
            Value::Char(v) => Some(i32::from(v)),
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Any integral payload, widened.
    pub fn as_long(&self) -> Option<i64> {
        match *self {
            Value::Long(v) => Some(v),
            _ => self.as_int().map(i64::from),
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match *self {
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    /// The `index`th field of an instance.
    pub fn field(&self, index: usize) -> Option<&Value> {
        self.as_instance().and_then(|instance| instance.field(index))
    }

    /// Bit pattern used for `float` equality: NaNs collapse to one pattern,
    /// signed zeros stay distinct.
    #[inline]
    pub fn float_bits(v: f32) -> u32 {
        if v.is_nan() {
            0x7fc0_0000
        } else {
            v.to_bits()
        }
    }

    /// Bit pattern used for `double` equality; see [`Value::float_bits`].
    #[inline]
    pub fn double_bits(v: f64) -> u64 {
        if v.is_nan() {
            0x7ff8_0000_0000_0000
        } else {
            v.to_bits()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => Value::float_bits(*a) == Value::float_bits(*b),
            (Value::Double(a), Value::Double(b)) => {
                Value::double_bits(*a) == Value::double_bits(*b)
            }
            (Value::Str(a), Value::Str(b)) => **a == **b,
            (Value::Object(a), Value::Object(b)) => {
                Heap::ptr_eq(a, b)
                    || (a.class() == b.class()
                        && a.class().is_record()
                        && a.fields() == b.fields())
            }
            (Value::Enum(a), Value::Enum(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Char(v) => match char::from_u32(u32::from(*v)) {
                Some(c) => write!(f, "{c}"),
                None => write!(f, "\\u{v:04x}"),
            },
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Double(v) => write!(f, "{v:?}"),
            Value::Str(s) => f.write_str(s),
            Value::Object(instance) => {
                let class = instance.class();
                write!(f, "{}[", class.simple_name())?;
                for (i, (field, value)) in class.fields().iter().zip(instance.fields()).enumerate()
                {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={value}", field.name)?;
                }
                write!(f, "]")
            }
            Value::Enum(constant) => f.write_str(constant.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", &**s),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Short(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Char(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::string(v)
    }
}
