use super::*;

/// Any of the elements a scene can hold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Element {
    Mirror(Mirror),
    Lens(Lens),
    SphericalMirror(SphericalMirror),
    Source(PointSource),
}

/// Evaluates `$body` with `$inner` bound to the variant's content.
macro_rules! dispatch {
    ($value:expr, $inner:pat => $body:expr) => {
        match $value {
            Element::Mirror($inner) => $body,
            Element::Lens($inner) => $body,
            Element::SphericalMirror($inner) => $body,
            Element::Source($inner) => $body,
        }
    };
}

impl Element {
    /// The element an editor creates from a press at `start` and a release at `end`.
    ///
    /// Returns `None` if both points are within [`MIN_ELEMENT_PLACEMENT_DISTANCE`] of each
    /// other, or for [`ElementKind::Source`], which is placed with [`Element::source_at`].
    #[must_use]
    pub fn place(kind: ElementKind, start: &Vector, end: &Vector) -> Option<Self> {
        if (end - start).norm() <= MIN_ELEMENT_PLACEMENT_DISTANCE {
            return None;
        }

        match kind {
            ElementKind::Mirror => Some(Mirror::from_endpoints(*start, *end).into()),
            ElementKind::Lens => {
                Some(Lens::from_endpoints(*start, *end, DEFAULT_FOCAL_LENGTH).into())
            }
            ElementKind::SphericalMirror => {
                Some(SphericalMirror::from_placement(*start, *end).into())
            }
            ElementKind::Source => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn source_at(position: impl Into<Vector>) -> Self {
        PointSource::omni(position).into()
    }

    /// How much one step of parameter adjustment in `direction` (`+-1`) changes the parameter.
    #[inline]
    #[must_use]
    pub fn adjust_step(&self, direction: Float) -> Float {
        match self {
            Self::Source(_) => direction * SOURCE_PARAM_ADJUST_SPEED,
            _ => direction * PARAM_ADJUST_SPEED,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_source(&self) -> Option<&PointSource> {
        match self {
            Self::Source(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Mirror> for Element {
    #[inline]
    fn from(value: Mirror) -> Self {
        Self::Mirror(value)
    }
}

impl From<Lens> for Element {
    #[inline]
    fn from(value: Lens) -> Self {
        Self::Lens(value)
    }
}

impl From<SphericalMirror> for Element {
    #[inline]
    fn from(value: SphericalMirror) -> Self {
        Self::SphericalMirror(value)
    }
}

impl From<PointSource> for Element {
    #[inline]
    fn from(value: PointSource) -> Self {
        Self::Source(value)
    }
}

impl OpticalElement for Element {
    #[inline]
    fn kind(&self) -> ElementKind {
        dispatch!(self, e => e.kind())
    }

    #[inline]
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection> {
        dispatch!(self, e => e.find_intersection(ray))
    }

    #[inline]
    fn interact(&self, incoming: &Ray, point: &Vector) -> Option<Ray> {
        dispatch!(self, e => e.interact(incoming, point))
    }

    #[inline]
    fn center(&self) -> Vector {
        dispatch!(self, e => e.center())
    }

    #[inline]
    fn is_point_near(&self, point: &Vector, tolerance: Float) -> bool {
        dispatch!(self, e => e.is_point_near(point, tolerance))
    }

    #[inline]
    fn as_emitter(&self) -> Option<&dyn Emitter> {
        dispatch!(self, e => e.as_emitter())
    }
}

impl Optics for Element {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        // elements report themselves as a whole, not their inner shape
        if let Some(hit) = self.find_intersection(ctx.ray()) {
            ctx.add_hit(hit, self);
        }
    }
}

impl Editable for Element {
    #[inline]
    fn translate(&mut self, delta: &Vector) {
        dispatch!(self, e => e.translate(delta))
    }

    #[inline]
    fn rotate(&mut self, delta: Float) {
        dispatch!(self, e => e.rotate(delta))
    }

    #[inline]
    fn set_angle(&mut self, angle: Float) {
        dispatch!(self, e => e.set_angle(angle))
    }

    #[inline]
    fn angle(&self) -> Float {
        dispatch!(self, e => e.angle())
    }

    #[inline]
    fn handles(&self) -> [Vector; 3] {
        dispatch!(self, e => e.handles())
    }

    #[inline]
    fn handle_at(&self, point: &Vector, tolerance: Float) -> Option<Handle> {
        dispatch!(self, e => e.handle_at(point, tolerance))
    }

    #[inline]
    fn set_handle_position(&mut self, handle: Handle, new_pos: &Vector, last_pos: &Vector) {
        dispatch!(self, e => e.set_handle_position(handle, new_pos, last_pos))
    }

    #[inline]
    fn parameter(&self) -> Option<Parameter> {
        dispatch!(self, e => e.parameter())
    }

    #[inline]
    fn adjust_parameter(&mut self, delta: Float) {
        dispatch!(self, e => e.adjust_parameter(delta))
    }

    #[inline]
    fn set_parameter_from_str(&mut self, s: &str) -> Result<(), ParameterError> {
        dispatch!(self, e => e.set_parameter_from_str(s))
    }
}
