use core::fmt;
use std::num::IntErrorKind;

use log::warn;
use thiserror::Error;

use super::*;

/// Draggable points of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Drags the whole element.
    Move = 0,
    /// The first endpoint of a segment, or the start of an arc.
    Start = 1,
    /// The second endpoint of a segment, or the end of an arc.
    End = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    FocalLength,
    Radius,
    RayCount,
}

impl ParameterKind {
    /// The short label editors prefix the value with.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FocalLength => "F",
            Self::Radius => "R",
            Self::RayCount => "N",
        }
    }
}

/// The single numeric parameter of an element, as shown to users.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameter {
    pub kind: ParameterKind,
    pub value: Float,
}

impl Parameter {
    /// The value, with one decimal, and without a trailing `.0`.
    #[must_use]
    pub fn value_string(&self) -> String {
        match self.kind {
            ParameterKind::RayCount => format!("{}", self.value as i64),
            _ => {
                let s = format!("{:.1}", self.value);
                match s.strip_suffix(".0") {
                    Some(stripped) => stripped.to_owned(),
                    None => s,
                }
            }
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.kind.label(), self.value_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("invalid number format: '{0}'")]
    InvalidNumber(String),

    #[error("number out of range: '{0}'")]
    OutOfRange(String),

    #[error("this element has no editable parameter")]
    NotEditable,
}

pub(crate) fn parse_float(s: &str) -> Result<Float, ParameterError> {
    let value = s
        .parse::<Float>()
        .map_err(|_| ParameterError::InvalidNumber(s.to_owned()))
        .and_then(|v| {
            v.is_finite()
                .then_some(v)
                .ok_or_else(|| ParameterError::OutOfRange(s.to_owned()))
        });

    if let Err(e) = &value {
        warn!("{e}");
    }
    value
}

pub(crate) fn parse_int(s: &str) -> Result<i32, ParameterError> {
    let value = s.parse::<i32>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ParameterError::OutOfRange(s.to_owned())
        }
        _ => ParameterError::InvalidNumber(s.to_owned()),
    });

    if let Err(e) = &value {
        warn!("{e}");
    }
    value
}

/// Clamps nonzero values in `(-1, 1)` to `+-1`, keeping their sign.
#[inline]
pub(crate) fn clamp_away_from_zero(v: Float) -> Float {
    if v != 0. && v.abs() < 1. {
        v.signum()
    } else {
        v
    }
}

/// The hooks an editor uses to mutate elements in place.
///
/// Every method leaves the element ready for the next trace pass.
pub trait Editable: OpticalElement {
    fn translate(&mut self, delta: &Vector);

    fn rotate(&mut self, delta: Float);

    fn set_angle(&mut self, angle: Float);

    fn angle(&self) -> Float;

    /// The positions of the [`Handle::Move`], [`Handle::Start`] and [`Handle::End`] handles, in this order.
    fn handles(&self) -> [Vector; 3];

    /// The handle under `point`, if any. Endpoint handles come first, then the move handle,
    /// then the element's body, which counts as [`Handle::Move`].
    fn handle_at(&self, point: &Vector, tolerance: Float) -> Option<Handle> {
        let [center, start, end] = self.handles();
        let near = |p: &Vector| (point - p).norm() <= tolerance;

        if near(&start) {
            Some(Handle::Start)
        } else if near(&end) {
            Some(Handle::End)
        } else if near(&center) || self.is_point_near(point, tolerance) {
            Some(Handle::Move)
        } else {
            None
        }
    }

    /// Moves `handle` to `new_pos`. `last_pos` is where the cursor dragging it previously was.
    fn set_handle_position(&mut self, handle: Handle, new_pos: &Vector, last_pos: &Vector);

    fn parameter(&self) -> Option<Parameter> {
        None
    }

    fn adjust_parameter(&mut self, _delta: Float) {}

    /// Parses `s` and sets the parameter to it.
    ///
    /// On error, the previous value is kept.
    fn set_parameter_from_str(&mut self, _s: &str) -> Result<(), ParameterError> {
        Err(ParameterError::NotEditable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_display() {
        let p = |kind, value| Parameter { kind, value }.to_string();

        assert_eq!(p(ParameterKind::FocalLength, 100.), "F = 100");
        assert_eq!(p(ParameterKind::FocalLength, -12.34), "F = -12.3");
        assert_eq!(p(ParameterKind::Radius, -37.5), "R = -37.5");
        assert_eq!(p(ParameterKind::RayCount, 30.), "N = 30");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse_float("12.5"), Ok(12.5));
        assert_eq!(
            parse_float("abc"),
            Err(ParameterError::InvalidNumber("abc".into()))
        );
        assert_eq!(
            parse_float("1e999"),
            Err(ParameterError::OutOfRange("1e999".into()))
        );
        assert_eq!(parse_int("-4"), Ok(-4));
        assert_eq!(
            parse_int("99999999999"),
            Err(ParameterError::OutOfRange("99999999999".into()))
        );
        assert_eq!(parse_int("4.5"), Err(ParameterError::InvalidNumber("4.5".into())));
    }

    #[test]
    fn clamping() {
        assert_eq!(clamp_away_from_zero(0.), 0.);
        assert_eq!(clamp_away_from_zero(0.3), 1.);
        assert_eq!(clamp_away_from_zero(-0.3), -1.);
        assert_eq!(clamp_away_from_zero(-7.), -7.);
    }
}
