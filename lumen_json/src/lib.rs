//! JSON (de)serialization of scenes, elements and traced paths.

mod elements;
mod scene;

pub use scene::*;

use std::{rc::Rc, sync::Arc};

use core::ops::Deref;

use lumen::*;
use thiserror::Error;

pub use serde_json;

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("missing field \"{0}\"")]
    MissingField(&'static str),

    #[error("invalid field \"{field}\": expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown element type: \"{0}\"")]
    UnknownType(String),

    #[error("invalid element #{index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<JsonError>,
    },

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

impl JsonError {
    #[inline]
    #[must_use]
    pub const fn invalid(field: &'static str, expected: &'static str) -> Self {
        Self::InvalidField { field, expected }
    }
}

/// `json[field]`, or [`JsonError::MissingField`].
pub fn field<'a>(
    json: &'a serde_json::Value,
    field: &'static str,
) -> Result<&'a serde_json::Value, JsonError> {
    json.get(field).ok_or(JsonError::MissingField(field))
}

pub fn float_field(json: &serde_json::Value, name: &'static str) -> Result<Float, JsonError> {
    field(json, name)?
        .as_f64()
        .filter(|f| f.is_finite())
        .ok_or(JsonError::invalid(name, "a finite number"))
}

pub fn vector_field(json: &serde_json::Value, name: &'static str) -> Result<Vector, JsonError> {
    field(json, name)?
        .as_array()
        .map(Vec::as_slice)
        .and_then(json_array_to_vector)
        .ok_or(JsonError::invalid(name, "an array of 2 finite numbers"))
}

/// Like [`float_field`], but returns `Ok(None)` if the field is absent.
pub fn opt_float_field(
    json: &serde_json::Value,
    name: &'static str,
) -> Result<Option<Float>, JsonError> {
    json.get(name)
        .map(|_| float_field(json, name))
        .transpose()
}

pub fn opt_u32_field(json: &serde_json::Value, name: &'static str) -> Result<Option<u32>, JsonError> {
    json.get(name)
        .map(|value| {
            value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(JsonError::invalid(name, "a 32 bit unsigned integer"))
        })
        .transpose()
}

/// `None` if `json_array` doesn't hold exactly 2 finite numbers.
pub fn json_array_to_vector(json_array: &[serde_json::Value]) -> Option<Vector> {
    let [x, y] = json_array else {
        return None;
    };

    let (x, y) = (x.as_f64()?, y.as_f64()?);
    (x.is_finite() && y.is_finite()).then(|| Vector::new(x, y))
}

pub fn map_json_array<C: FromIterator<T>, T>(
    json: &serde_json::Value,
    map: impl FnMut(&serde_json::Value) -> Result<T, JsonError>,
) -> Result<C, JsonError> {
    json.as_array()
        .ok_or(JsonError::invalid("array", "a json array"))?
        .iter()
        .map(map)
        .collect()
}

pub trait JsonType {
    /// Returns a string, unique to the type, found in the "type" field of the json
    /// representation of an element of this type
    fn json_type() -> String;
}

pub trait JsonSer {
    /// Serialize `self` into a JSON value.
    fn to_json(&self) -> serde_json::Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

impl<const N: usize, T: JsonSer> JsonSer for [T; N] {
    fn to_json(&self) -> serde_json::Value {
        self.as_slice().to_json()
    }
}

// these all go through `Deref`, but a blanket impl over `Deref` types
// would conflict with downstream impls

impl<T: JsonSer + ?Sized> JsonSer for Box<T> {
    fn to_json(&self) -> serde_json::Value {
        self.deref().to_json()
    }
}

impl<T: JsonSer + ?Sized> JsonSer for Arc<T> {
    fn to_json(&self) -> serde_json::Value {
        self.deref().to_json()
    }
}

impl<T: JsonSer + ?Sized> JsonSer for Rc<T> {
    fn to_json(&self) -> serde_json::Value {
        self.deref().to_json()
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> serde_json::Value {
        self.deref().to_json()
    }
}

impl<T: JsonSer + ?Sized> JsonSer for &T {
    fn to_json(&self) -> serde_json::Value {
        (*self).to_json()
    }
}

pub trait JsonDes {
    /// Deserialize from a JSON value.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &serde_json::Value) -> Result<Self, JsonError>
    where
        Self: Sized;
}

impl<T: JsonDes> JsonDes for Vec<T> {
    fn from_json(json: &serde_json::Value) -> Result<Self, JsonError> {
        map_json_array(json, T::from_json)
    }
}

impl JsonSer for Color {
    /// `[r, g, b, a]`
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.to_array())
    }
}

impl JsonDes for Color {
    /// Deserialize a color from an array of 3 (opaque) or 4 integers in `0..=255`.
    fn from_json(json: &serde_json::Value) -> Result<Self, JsonError> {
        const EXPECTED: &str = "an array of 3 or 4 integers in 0..=255";

        let channels: Vec<u8> = map_json_array(json, |value| {
            value
                .as_u64()
                .and_then(|c| u8::try_from(c).ok())
                .ok_or(JsonError::invalid("color", EXPECTED))
        })
        .map_err(|_| JsonError::invalid("color", EXPECTED))?;

        match *channels.as_slice() {
            [r, g, b] => Ok(Self::rgb(r, g, b)),
            [r, g, b, a] => Ok(Self::rgba(r, g, b, a)),
            _ => Err(JsonError::invalid("color", EXPECTED)),
        }
    }
}

impl JsonSer for TraceConfig {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "max_ray_length": self.max_ray_length,
            "default_bounces": self.default_bounces,
        })
    }
}

impl JsonDes for TraceConfig {
    /// Missing fields take their default values.
    ///
    /// ```json
    /// {
    ///     "max_ray_length": 2000.0,
    ///     "default_bounces": 5
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, JsonError> {
        let config: Self = serde_json::from_value(json.clone())?;

        if !(config.max_ray_length.is_finite() && config.max_ray_length > EPSILON) {
            return Err(JsonError::invalid("max_ray_length", "a positive number"));
        }

        Ok(config)
    }
}
