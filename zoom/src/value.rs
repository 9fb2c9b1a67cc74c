//! Bridging between Terraform's three-state values and API optionals
//!
//! Configuration and plan values can be unknown, null or known. The API only
//! distinguishes present from absent, so both unknown and null leave a field
//! out of the request.

use tfplug::types::Dynamic;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TfValue<T> {
    Unknown,
    #[default]
    Null,
    Known(T),
}

impl<T> TfValue<T> {
    /// Request side: unknown and null both become absent
    pub fn into_wire(self) -> Option<T> {
        match self {
            TfValue::Known(value) => Some(value),
            TfValue::Unknown | TfValue::Null => None,
        }
    }

    /// Response side: an absent field is null, never unknown
    pub fn from_wire(value: Option<T>) -> Self {
        match value {
            Some(value) => TfValue::Known(value),
            None => TfValue::Null,
        }
    }

    pub fn as_known(&self) -> Option<&T> {
        match self {
            TfValue::Known(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, TfValue::Known(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TfValue::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TfValue::Unknown)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TfValue<U> {
        match self {
            TfValue::Known(value) => TfValue::Known(f(value)),
            TfValue::Null => TfValue::Null,
            TfValue::Unknown => TfValue::Unknown,
        }
    }
}

impl TfValue<String> {
    pub fn as_deref(&self) -> Option<&str> {
        self.as_known().map(String::as_str)
    }
}

/// Scalars that can be read out of a known [`Dynamic`]
pub trait FromDynamic: Sized {
    fn from_dynamic(value: &Dynamic) -> Option<Self>;
}

impl FromDynamic for String {
    fn from_dynamic(value: &Dynamic) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromDynamic for bool {
    fn from_dynamic(value: &Dynamic) -> Option<Self> {
        value.as_bool()
    }
}

impl FromDynamic for f64 {
    fn from_dynamic(value: &Dynamic) -> Option<Self> {
        value.as_number()
    }
}

impl FromDynamic for i64 {
    fn from_dynamic(value: &Dynamic) -> Option<Self> {
        value
            .as_number()
            .filter(|n| n.fract() == 0.0)
            .map(|n| n as i64)
    }
}

impl<T: FromDynamic> TfValue<T> {
    /// Read a framework value. A value of the wrong type reads as null; the
    /// schema has already type-checked configuration by the time handlers run.
    pub fn from_dynamic(value: &Dynamic) -> Self {
        match value {
            Dynamic::Unknown => TfValue::Unknown,
            Dynamic::Null => TfValue::Null,
            other => T::from_dynamic(other)
                .map(TfValue::Known)
                .unwrap_or(TfValue::Null),
        }
    }

    /// Read the named attribute of an object value
    pub fn attr(object: &Dynamic, name: &str) -> Self {
        Self::from_dynamic(object.attribute(name))
    }
}

impl<T: Into<Dynamic>> TfValue<T> {
    pub fn to_dynamic(self) -> Dynamic {
        match self {
            TfValue::Known(value) => value.into(),
            TfValue::Null => Dynamic::Null,
            TfValue::Unknown => Dynamic::Unknown,
        }
    }
}

impl<T> From<Option<T>> for TfValue<T> {
    fn from(value: Option<T>) -> Self {
        TfValue::from_wire(value)
    }
}
