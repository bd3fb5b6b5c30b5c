//! Read API over the store.
//!
//! Absent set or key is `Ok(None)`. A present value that does not convert
//! to the requested type is an error, never `None`.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::properties::ConfigSet;
use crate::store::ConfigStore;

/// Target type of a typed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Double,
    Boolean,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Integer => write!(f, "integer"),
            ValueType::Double => write!(f, "double"),
            ValueType::Boolean => write!(f, "boolean"),
        }
    }
}

/// A present value could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{set}.{key} = {value:?} is not a valid {target}")]
pub struct TypeCoercionError {
    pub set: String,
    pub key: String,
    pub value: String,
    pub target: ValueType,
}

impl ConfigStore {
    /// Whole set lookup.
    pub fn get_properties(&self, set: &str) -> Option<Arc<ConfigSet>> {
        self.get(set)
    }

    /// Raw string value.
    pub fn get_value(&self, set: &str, key: &str) -> Option<String> {
        self.get(set)?.get(key).map(str::to_string)
    }

    /// 32-bit signed integer value; an optional leading sign is accepted.
    pub fn get_integer_value(&self, set: &str, key: &str) -> Result<Option<i32>, TypeCoercionError> {
        self.coerce(set, key, ValueType::Integer, |v| v.parse::<i32>().ok())
    }

    /// Floating point value; surrounding whitespace is ignored.
    pub fn get_double_value(&self, set: &str, key: &str) -> Result<Option<f64>, TypeCoercionError> {
        self.coerce(set, key, ValueType::Double, |v| v.trim().parse::<f64>().ok())
    }

    /// `true` or `false`, case-insensitive, surrounding whitespace ignored.
    pub fn get_boolean_value(&self, set: &str, key: &str) -> Result<Option<bool>, TypeCoercionError> {
        self.coerce(set, key, ValueType::Boolean, parse_bool)
    }

    fn coerce<T>(
        &self,
        set: &str,
        key: &str,
        target: ValueType,
        convert: impl FnOnce(&str) -> Option<T>,
    ) -> Result<Option<T>, TypeCoercionError> {
        let Some(value) = self.get_value(set, key) else {
            return Ok(None);
        };
        match convert(&value) {
            Some(v) => Ok(Some(v)),
            None => Err(TypeCoercionError {
                set: set.to_string(),
                key: key.to_string(),
                value,
                target,
            }),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
