//! Configuration value types.
//!
//! | Tag | Rust type |
//! |-----|-----------|
//! | `int8` .. `int64`, `uint8` .. `uint64` | `i8` .. `i64`, `u8` .. `u64` |
//! | `float`, `double` | `f32`, `f64` |
//! | `string` | `String` |
//! | `boolean` | `bool` |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type named by the `type` attribute of a `<variable>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    String,
    Boolean,
}

impl UserType {
    pub const ALL: [UserType; 12] = [
        UserType::Int8,
        UserType::UInt8,
        UserType::Int16,
        UserType::UInt16,
        UserType::Int32,
        UserType::UInt32,
        UserType::Int64,
        UserType::UInt64,
        UserType::Float,
        UserType::Double,
        UserType::String,
        UserType::Boolean,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    pub fn tag(self) -> &'static str {
        match self {
            UserType::Int8 => "int8",
            UserType::UInt8 => "uint8",
            UserType::Int16 => "int16",
            UserType::UInt16 => "uint16",
            UserType::Int32 => "int32",
            UserType::UInt32 => "uint32",
            UserType::Int64 => "int64",
            UserType::UInt64 => "uint64",
            UserType::Float => "float",
            UserType::Double => "double",
            UserType::String => "string",
            UserType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A typed scalar configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConfigValue {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    Boolean(bool),
}

/// A typed array configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConfigArray {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    String(Vec<String>),
    Boolean(Vec<bool>),
}

/// `true`/`false` in any case, or an integer where non-zero is true.
fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        raw.parse::<i64>().ok().map(|v| v != 0)
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

/// Parse every raw value, reporting the index of the first failure.
fn parse_all<T>(raws: &[String], f: impl Fn(&str) -> Option<T>) -> Result<Vec<T>, usize> {
    raws.iter().enumerate().map(|(i, raw)| f(raw).ok_or(i)).collect()
}

impl ConfigValue {
    /// Convert a raw attribute value. Integers are range checked; strings
    /// are taken verbatim.
    pub fn parse(user_type: UserType, raw: &str) -> Option<Self> {
        Some(match user_type {
            UserType::Int8 => Self::Int8(parse_number(raw)?),
            UserType::UInt8 => Self::UInt8(parse_number(raw)?),
            UserType::Int16 => Self::Int16(parse_number(raw)?),
            UserType::UInt16 => Self::UInt16(parse_number(raw)?),
            UserType::Int32 => Self::Int32(parse_number(raw)?),
            UserType::UInt32 => Self::UInt32(parse_number(raw)?),
            UserType::Int64 => Self::Int64(parse_number(raw)?),
            UserType::UInt64 => Self::UInt64(parse_number(raw)?),
            UserType::Float => Self::Float(parse_number(raw)?),
            UserType::Double => Self::Double(parse_number(raw)?),
            UserType::String => Self::String(raw.to_string()),
            UserType::Boolean => Self::Boolean(parse_bool(raw)?),
        })
    }

    pub fn user_type(&self) -> UserType {
        match self {
            Self::Int8(_) => UserType::Int8,
            Self::UInt8(_) => UserType::UInt8,
            Self::Int16(_) => UserType::Int16,
            Self::UInt16(_) => UserType::UInt16,
            Self::Int32(_) => UserType::Int32,
            Self::UInt32(_) => UserType::UInt32,
            Self::Int64(_) => UserType::Int64,
            Self::UInt64(_) => UserType::UInt64,
            Self::Float(_) => UserType::Float,
            Self::Double(_) => UserType::Double,
            Self::String(_) => UserType::String,
            Self::Boolean(_) => UserType::Boolean,
        }
    }
}

impl ConfigArray {
    /// Convert raw values in index order. On failure returns the index of
    /// the offending value.
    pub fn parse(user_type: UserType, raws: &[String]) -> Result<Self, usize> {
        Ok(match user_type {
            UserType::Int8 => Self::Int8(parse_all(raws, parse_number)?),
            UserType::UInt8 => Self::UInt8(parse_all(raws, parse_number)?),
            UserType::Int16 => Self::Int16(parse_all(raws, parse_number)?),
            UserType::UInt16 => Self::UInt16(parse_all(raws, parse_number)?),
            UserType::Int32 => Self::Int32(parse_all(raws, parse_number)?),
            UserType::UInt32 => Self::UInt32(parse_all(raws, parse_number)?),
            UserType::Int64 => Self::Int64(parse_all(raws, parse_number)?),
            UserType::UInt64 => Self::UInt64(parse_all(raws, parse_number)?),
            UserType::Float => Self::Float(parse_all(raws, parse_number)?),
            UserType::Double => Self::Double(parse_all(raws, parse_number)?),
            UserType::String => Self::String(raws.to_vec()),
            UserType::Boolean => Self::Boolean(parse_all(raws, parse_bool)?),
        })
    }

    pub fn user_type(&self) -> UserType {
        match self {
            Self::Int8(_) => UserType::Int8,
            Self::UInt8(_) => UserType::UInt8,
            Self::Int16(_) => UserType::Int16,
            Self::UInt16(_) => UserType::UInt16,
            Self::Int32(_) => UserType::Int32,
            Self::UInt32(_) => UserType::UInt32,
            Self::Int64(_) => UserType::Int64,
            Self::UInt64(_) => UserType::UInt64,
            Self::Float(_) => UserType::Float,
            Self::Double(_) => UserType::Double,
            Self::String(_) => UserType::String,
            Self::Boolean(_) => UserType::Boolean,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rust types that can be read from a configuration, either as a scalar
/// (`T`) or as an array (`Vec<T>`).
pub trait ConfigLookup: Sized {
    const USER_TYPE: UserType;
    const ARRAY: bool;

    fn from_scalar(value: &ConfigValue) -> Option<&Self>;
    fn from_array(array: &ConfigArray) -> Option<&Self>;
}

macro_rules! impl_config_lookup {
    ($($variant:ident: $ty:ty),* $(,)?) => {$(
        impl ConfigLookup for $ty {
            const USER_TYPE: UserType = UserType::$variant;
            const ARRAY: bool = false;

            fn from_scalar(value: &ConfigValue) -> Option<&Self> {
                match value {
                    ConfigValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn from_array(_: &ConfigArray) -> Option<&Self> {
                None
            }
        }

        impl ConfigLookup for Vec<$ty> {
            const USER_TYPE: UserType = UserType::$variant;
            const ARRAY: bool = true;

            fn from_scalar(_: &ConfigValue) -> Option<&Self> {
                None
            }

            fn from_array(array: &ConfigArray) -> Option<&Self> {
                match array {
                    ConfigArray::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    )*};
}

impl_config_lookup!(
    Int8: i8,
    UInt8: u8,
    Int16: i16,
    UInt16: u16,
    Int32: i32,
    UInt32: u32,
    Int64: i64,
    UInt64: u64,
    Float: f32,
    Double: f64,
    String: String,
    Boolean: bool,
);
