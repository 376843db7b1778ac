use core::f64::consts::TAU;

use lumen_elements::*;

use super::*;

impl JsonType for Mirror {
    fn json_type() -> String {
        "mirror".into()
    }
}

impl JsonSer for Mirror {
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "center": self.segment.center.as_slice(),
            "length": self.segment.length,
            "angle": self.segment.angle,
        })
    }
}

impl JsonDes for Mirror {
    /// Deserialize a new plane mirror from a JSON object.
    ///
    /// ```json
    /// {
    ///     "center": [x, y],
    ///     "length": 200.0,
    ///     "angle": 0.785 // radians, from the x axis
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, JsonError> {
        Ok(Self::new(
            vector_field(json, "center")?,
            float_field(json, "length")?,
            float_field(json, "angle")?,
        ))
    }
}

impl JsonType for Lens {
    fn json_type() -> String {
        "lens".into()
    }
}

impl JsonSer for Lens {
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "center": self.segment.center.as_slice(),
            "height": self.segment.length,
            "angle": self.segment.angle,
            "focal_length": self.focal_length(),
        })
    }
}

impl JsonDes for Lens {
    /// Deserialize a new thin lens from a JSON object.
    ///
    /// ```json
    /// {
    ///     "center": [x, y],
    ///     "height": 100.0,
    ///     "angle": 0.0,
    ///     "focal_length": 100.0 // negative for diverging lenses
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, JsonError> {
        Ok(Self::new(
            vector_field(json, "center")?,
            float_field(json, "height")?,
            float_field(json, "angle")?,
            float_field(json, "focal_length")?,
        ))
    }
}

impl JsonType for SphericalMirror {
    fn json_type() -> String {
        "spherical_mirror".into()
    }
}

impl JsonSer for SphericalMirror {
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "center": self.center.as_slice(),
            "radius": self.radius(),
            "start": self.sector.start(),
            "span": self.sector.span(),
        })
    }
}

impl JsonDes for SphericalMirror {
    /// Deserialize a new spherical mirror from a JSON object.
    ///
    /// ```json
    /// {
    ///     "center": [x, y], // center of curvature
    ///     "radius": 150.0,
    ///     "start": -1.57, // radians
    ///     "span": 3.14 // radians, counter-clockwise from "start"
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, JsonError> {
        Ok(Self::new(
            vector_field(json, "center")?,
            float_field(json, "radius")?,
            float_field(json, "start")?,
            float_field(json, "span")?,
        ))
    }
}

impl JsonType for PointSource {
    fn json_type() -> String {
        "point_source".into()
    }
}

impl JsonSer for PointSource {
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "position": self.position.as_slice(),
            "num_rays": self.num_rays(),
            "color": self.color.to_json(),
            "start": self.sector.start(),
            "span": self.sector.span(),
            "bounces": self.bounces,
        })
    }
}

impl JsonDes for PointSource {
    /// Deserialize a new point source from a JSON object.
    ///
    /// Only `"position"` is required.
    ///
    /// ```json
    /// {
    ///     "position": [x, y],
    ///     "num_rays": 30,
    ///     "color": [255, 255, 0, 255],
    ///     "start": 0.0,
    ///     "span": 6.283,
    ///     "bounces": 5
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, JsonError> {
        let color = json
            .get("color")
            .map(Color::from_json)
            .transpose()?
            .unwrap_or(Color::YELLOW);

        let source = Self::new(
            vector_field(json, "position")?,
            opt_u32_field(json, "num_rays")?.unwrap_or(DEFAULT_RAY_COUNT),
            color,
            opt_float_field(json, "start")?.unwrap_or(0.),
            opt_float_field(json, "span")?.unwrap_or(TAU),
        );

        Ok(match opt_u32_field(json, "bounces")? {
            Some(bounces) => source.with_bounces(bounces),
            None => source,
        })
    }
}

impl JsonSer for Element {
    /// ```json
    /// {
    ///     "type": "mirror" | "lens" | "spherical_mirror" | "point_source",
    ///     "data": // <layout depends on the value at "type">
    /// }
    /// ```
    fn to_json(&self) -> serde_json::Value {
        let (ty, data) = match self {
            Self::Mirror(m) => (Mirror::json_type(), m.to_json()),
            Self::Lens(l) => (Lens::json_type(), l.to_json()),
            Self::SphericalMirror(s) => (SphericalMirror::json_type(), s.to_json()),
            Self::Source(s) => (PointSource::json_type(), s.to_json()),
        };

        serde_json::json!({
            "type": ty,
            "data": data,
        })
    }
}

impl JsonDes for Element {
    /// The format is explained in [`Self::to_json`]
    fn from_json(json: &serde_json::Value) -> Result<Self, JsonError> {
        let ty = field(json, "type")?
            .as_str()
            .ok_or(JsonError::invalid("type", "a string"))?;

        let data = field(json, "data")?;

        if ty == Mirror::json_type() {
            Mirror::from_json(data).map(Self::from)
        } else if ty == Lens::json_type() {
            Lens::from_json(data).map(Self::from)
        } else if ty == SphericalMirror::json_type() {
            SphericalMirror::from_json(data).map(Self::from)
        } else if ty == PointSource::json_type() {
            PointSource::from_json(data).map(Self::from)
        } else {
            Err(JsonError::UnknownType(ty.into()))
        }
    }
}
