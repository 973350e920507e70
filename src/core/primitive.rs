//! Primitive values naming machine states and machine identities.
//!
//! A state (or uid) is one of a fixed set of primitive kinds: text, integer
//! or floating point. Identity is by value, with integers and integral floats
//! naming the same value (`1` and `1.0` are the same state).

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A text, integer or floating-point value.
///
/// # Example
///
/// ```rust
/// use statewheel::core::Primitive;
///
/// assert_eq!(Primitive::from("idle"), Primitive::Text("idle".to_string()));
/// assert_eq!(Primitive::from(3), Primitive::from(3.0));
/// assert_ne!(Primitive::from(3), Primitive::from("3"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Primitive {
    Text(String),
    Integer(i64),
    Float(#[serde(with = "float_repr")] f64),
}

/// A state of the machine.
pub type State = Primitive;

/// The identity of one machine instance in an identity-scoped engine.
pub type Uid = Primitive;

impl Primitive {
    /// Name of the primitive kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
        }
    }

    /// NaN is not equal to itself, so it cannot name a state or a machine.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Float(f) if f.is_nan())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, including floats that hold an exact integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Float(f) => integral(*f),
            Self::Text(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(_) => None,
        }
    }

    /// Convert an untyped JSON value. Returns `Err` with a description of
    /// the rejected value when it is not one of the primitive kinds.
    pub(crate) fn from_json(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Integer(i))
                } else if n.is_u64() {
                    Err(format!("integer {n} outside the 64-bit signed range"))
                } else {
                    n.as_f64()
                        .map(Self::Float)
                        .ok_or_else(|| format!("number {n}"))
                }
            }
            Value::Bool(b) => Err(format!("bool {b}")),
            Value::Null => Err("null".to_string()),
            Value::Array(_) => Err("array".to_string()),
            Value::Object(_) => Err("object".to_string()),
        }
    }
}

/// JSON has no literal for infinities, so human-readable formats carry
/// non-finite floats as strings. Binary formats keep the raw float.
mod float_repr {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if !serializer.is_human_readable() || value.is_finite() {
            return serializer.serialize_f64(*value);
        }
        let text = if value.is_nan() {
            "NaN"
        } else if value.is_sign_positive() {
            "inf"
        } else {
            "-inf"
        };
        serializer.serialize_str(text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(FloatVisitor)
        } else {
            deserializer.deserialize_f64(FloatVisitor)
        }
    }

    struct FloatVisitor;

    impl<'de> Visitor<'de> for FloatVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a float, \"inf\", \"-inf\" or \"NaN\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            match v {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }
    }
}

fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the exclusive upper bound
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Integer(i), Self::Float(f)) | (Self::Float(f), Self::Integer(i)) => {
                integral(*f) == Some(*i)
            }
            _ => false,
        }
    }
}

impl Eq for Primitive {}

impl Hash for Primitive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Text(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Self::Integer(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            Self::Float(f) => match integral(*f) {
                Some(i) => {
                    1u8.hash(state);
                    i.hash(state);
                }
                None if f.is_nan() => {
                    2u8.hash(state);
                    f64::NAN.to_bits().hash(state);
                }
                None => {
                    2u8.hash(state);
                    f.to_bits().hash(state);
                }
            },
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

macro_rules! primitive_from {
    ($variant:ident: $($ty:ty => $conv:expr),* $(,)?) => {
        $(
            impl From<$ty> for Primitive {
                fn from(value: $ty) -> Self {
                    let conv: fn($ty) -> _ = $conv;
                    Self::$variant(conv(value))
                }
            }
        )*
    };
}

primitive_from!(Text:
    &str => |s| s.to_string(),
    String => |s| s,
    &String => |s| s.clone(),
);

primitive_from!(Integer:
    i8 => i64::from,
    i16 => i64::from,
    i32 => i64::from,
    i64 => |i| i,
    u8 => i64::from,
    u16 => i64::from,
    u32 => i64::from,
);

primitive_from!(Float:
    f32 => f64::from,
    f64 => |f| f,
);

/// Conversion into a validated [`State`].
///
/// Implemented for the primitive Rust types, for [`Primitive`] itself and for
/// untyped `serde_json::Value`s. Values that cannot name a state fail with
/// [`EngineError::InvalidStateType`].
pub trait IntoState {
    fn into_state(self) -> Result<State>;
}

/// Conversion into a validated [`Uid`].
///
/// Same accepted kinds as [`IntoState`]; rejected values fail with
/// [`EngineError::InvalidUidType`].
pub trait IntoUid {
    fn into_uid(self) -> Result<Uid>;
}

fn checked(value: Primitive) -> std::result::Result<Primitive, String> {
    if value.is_valid() {
        Ok(value)
    } else {
        Err(format!("{} NaN", value.kind()))
    }
}

macro_rules! into_primitive {
    ($($ty:ty => $conv:expr),* $(,)?) => {
        $(
            impl IntoState for $ty {
                fn into_state(self) -> Result<State> {
                    let conv: fn($ty) -> std::result::Result<Primitive, String> = $conv;
                    conv(self).map_err(|found| EngineError::InvalidStateType { found })
                }
            }

            impl IntoUid for $ty {
                fn into_uid(self) -> Result<Uid> {
                    let conv: fn($ty) -> std::result::Result<Primitive, String> = $conv;
                    conv(self).map_err(|found| EngineError::InvalidUidType { found })
                }
            }
        )*
    };
}

into_primitive!(
    Primitive => checked,
    &Primitive => |p| checked(p.clone()),
    &str => |s| Ok(Primitive::from(s)),
    String => |s| Ok(Primitive::from(s)),
    &String => |s| Ok(Primitive::from(s)),
    i8 => |i| Ok(Primitive::from(i)),
    i16 => |i| Ok(Primitive::from(i)),
    i32 => |i| Ok(Primitive::from(i)),
    i64 => |i| Ok(Primitive::from(i)),
    u8 => |i| Ok(Primitive::from(i)),
    u16 => |i| Ok(Primitive::from(i)),
    u32 => |i| Ok(Primitive::from(i)),
    u64 => |i| i64::try_from(i)
        .map(Primitive::Integer)
        .map_err(|_| format!("integer {i} outside the 64-bit signed range")),
    usize => |i| i64::try_from(i)
        .map(Primitive::Integer)
        .map_err(|_| format!("integer {i} outside the 64-bit signed range")),
    f32 => |f| checked(Primitive::from(f)),
    f64 => |f| checked(Primitive::from(f)),
    Value => |v| Primitive::from_json(&v).and_then(checked),
    &Value => |v| Primitive::from_json(v).and_then(checked),
);
