use crate::errors::{ErrorKind, EvFilterError, EvFilterResult};
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Normalizes a float so that `-0.0` and `0.0` hash alike and every NaN
/// shares one bit pattern.
#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Compare two floats for equality with proper NaN handling.
#[inline]
fn num_eq_float(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        true
    } else {
        a == b
    }
}

/// Represents an event property value or a filter constant.
///
/// # Purpose
/// Provides a unified representation for the values produced by field
/// extractors and for the constants filters are registered with. Indexes
/// compare and hash these values, and spatial indexes coerce them to `f64`.
///
/// # Characteristics
/// - **Numeric equality across widths**: `I32(5) == I64(5)`, `F32(1.5) == F64(1.5)`
/// - **Hashable**: consistent with equality, so values can key hash indexes
/// - **Serializable**: can be serialized/deserialized with serde
/// - **Default**: defaults to `Null`
///
/// # Usage
/// ```rust
/// use evfilter::common::Value;
///
/// let v: Value = 42.into();
/// assert_eq!(v.coerce_f64("x").unwrap(), 42.0);
/// assert!(Value::from("abc").coerce_f64("x").is_err());
/// ```
#[derive(Clone, Default, serde::Deserialize, serde::Serialize)]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 8-bit integer value.
    I8(i8),
    /// Represents an unsigned 8-bit integer value.
    U8(u8),
    /// Represents a signed 16-bit integer value.
    I16(i16),
    /// Represents an unsigned 16-bit integer value.
    U16(u16),
    /// Represents a signed 32-bit integer value.
    I32(i32),
    /// Represents an unsigned 32-bit integer value.
    U32(u32),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents an unsigned 64-bit integer value.
    U64(u64),
    /// Represents a 32-bit floating point value.
    F32(f32),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
}

impl Value {
    /// Returns the integer value widened to `i128` if the value is an integer.
    #[inline]
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::I8(v) => Some(*v as i128),
            Value::U8(v) => Some(*v as i128),
            Value::I16(v) => Some(*v as i128),
            Value::U16(v) => Some(*v as i128),
            Value::I32(v) => Some(*v as i128),
            Value::U32(v) => Some(*v as i128),
            Value::I64(v) => Some(*v as i128),
            Value::U64(v) => Some(*v as i128),
            _ => None,
        }
    }

    #[inline]
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value if the [Value] is [Value::String].
    #[inline]
    pub fn as_string(&self) -> Option<&String> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the bool value if the [Value] is [Value::Bool].
    #[inline]
    pub fn as_bool(&self) -> Option<&bool> {
        match self {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Checks if the [Value] is an integer type.
    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Value::I8(_)
                | Value::U8(_)
                | Value::I16(_)
                | Value::U16(_)
                | Value::I32(_)
                | Value::U32(_)
                | Value::I64(_)
                | Value::U64(_)
        )
    }

    #[inline]
    pub fn is_decimal(&self) -> bool {
        matches!(self, Value::F32(_) | Value::F64(_))
    }

    /// Checks if the [Value] is a number type.
    #[inline]
    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_decimal()
    }

    /// Returns a short name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::U8(_) => "u8",
            Value::I16(_) => "i16",
            Value::U16(_) => "u16",
            Value::I32(_) => "i32",
            Value::U32(_) => "u32",
            Value::I64(_) => "i64",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
        }
    }

    /// Coerces a numeric value to `f64`.
    ///
    /// `context` names what is being coerced (usually the extractor
    /// expression) and ends up in the error message.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::TypeCoercionError`] if the value is not a number.
    pub fn coerce_f64(&self, context: &str) -> EvFilterResult<f64> {
        if let Some(v) = self.as_decimal() {
            return Ok(v);
        }
        if let Some(v) = self.as_integer() {
            return Ok(v as f64);
        }
        log::error!("Cannot coerce {} value {} of {} to a number", self.type_name(), self, context);
        Err(EvFilterError::new(
            &format!(
                "Expected a numeric value for {} but found {} ({})",
                context,
                self.type_name(),
                self
            ),
            ErrorKind::TypeCoercionError,
        ))
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(v) => write!(f, "{:?}", v),
            _ => write!(f, "{}", self),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
            return a == b;
        }

        if let (Some(a), Some(b)) = (self.as_decimal(), other.as_decimal()) {
            return num_eq_float(a, b);
        }

        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Some(v) = self.as_integer() {
            0u8.hash(state);
            v.hash(state);
        } else if let Some(v) = self.as_decimal() {
            1u8.hash(state);
            canonical_bits(v).hash(state);
        } else {
            match self {
                Value::Null => 2u8.hash(state),
                Value::Bool(v) => {
                    3u8.hash(state);
                    v.hash(state);
                }
                Value::String(v) => {
                    4u8.hash(state);
                    v.hash(state);
                }
                _ => unreachable!("numeric variants are hashed above"),
            }
        }
    }
}

macro_rules! impl_from_for_value {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(value: $t) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_value!(
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
);

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
