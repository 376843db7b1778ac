use core::f64::consts::TAU;

use log::trace;

use super::*;

/// Distance between a source and its angle handles.
pub const SOURCE_HANDLE_DISTANCE: Float = 40.;

pub const DEFAULT_RAY_COUNT: u32 = 30;

/// Emits a fan of evenly spaced rays from a single point.
///
/// Sources are transparent: they never intersect rays, including their own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSource {
    pub position: Vector,
    num_rays: u32,
    pub color: Color,
    pub sector: Sector,
    /// The number of interactions given to every emitted ray
    pub bounces: u32,
}

impl PointSource {
    /// `num_rays` is raised to at least `1`.
    #[must_use]
    pub fn new(
        position: impl Into<Vector>,
        num_rays: u32,
        color: Color,
        start: Float,
        span: Float,
    ) -> Self {
        Self {
            position: position.into(),
            num_rays: num_rays.max(1),
            color,
            sector: Sector::new(start, span),
            bounces: DEFAULT_BOUNCES,
        }
    }

    /// A yellow source emitting [`DEFAULT_RAY_COUNT`] rays in every direction.
    #[inline]
    #[must_use]
    pub fn omni(position: impl Into<Vector>) -> Self {
        Self::new(position, DEFAULT_RAY_COUNT, Color::YELLOW, 0., TAU)
    }

    #[inline]
    #[must_use]
    pub fn with_bounces(mut self, bounces: u32) -> Self {
        self.bounces = bounces;
        self
    }

    #[inline]
    #[must_use]
    pub const fn num_rays(&self) -> u32 {
        self.num_rays
    }

    #[inline]
    pub fn set_num_rays(&mut self, num_rays: u32) {
        self.num_rays = num_rays.max(1);
    }

    /// The directions of the emitted rays, in emission order.
    ///
    /// A full circle is split in `n` equal steps. A partial arc includes both of its ends
    /// when `n > 1`, a single ray goes through its middle.
    pub fn angles(&self) -> impl Iterator<Item = Float> {
        let (start, span) = (self.sector.start(), self.sector.span());
        let n = if span <= EPSILON { 0 } else { self.num_rays };

        let (first, step) = if self.sector.is_full_circle() {
            (start, TAU / Float::from(n.max(1)))
        } else if n == 1 {
            (start + span / 2., 0.)
        } else {
            (start, span / Float::from(n.saturating_sub(1).max(1)))
        };

        (0..n).map(move |i| first + Float::from(i) * step)
    }
}

impl Default for PointSource {
    #[inline]
    fn default() -> Self {
        Self::omni(Vector::zeros())
    }
}

impl Emitter for PointSource {
    fn emit_rays(&self) -> Vec<Ray> {
        let rays: Vec<_> = self
            .angles()
            .map(|angle| Ray::new(self.position, geom::direction(angle), self.bounces, self.color))
            .collect();

        trace!("source at {:?} emitted {} rays", self.position, rays.len());
        rays
    }
}

impl OpticalElement for PointSource {
    #[inline]
    fn kind(&self) -> ElementKind {
        ElementKind::Source
    }

    #[inline]
    fn find_intersection(&self, _ray: &Ray) -> Option<Intersection> {
        None
    }

    #[inline]
    fn interact(&self, _incoming: &Ray, _point: &Vector) -> Option<Ray> {
        None
    }

    #[inline]
    fn center(&self) -> Vector {
        self.position
    }

    #[inline]
    fn is_point_near(&self, point: &Vector, tolerance: Float) -> bool {
        (point - self.position).norm() <= tolerance
    }

    #[inline]
    fn as_emitter(&self) -> Option<&dyn Emitter> {
        Some(self)
    }
}

impl Optics for PointSource {
    #[inline]
    fn add_hits<'e>(&'e self, _ctx: &mut TraceCtx<'_, 'e>) {}
}

impl Editable for PointSource {
    #[inline]
    fn translate(&mut self, delta: &Vector) {
        self.position += delta;
    }

    #[inline]
    fn rotate(&mut self, delta: Float) {
        self.sector.rotate(delta);
    }

    #[inline]
    fn set_angle(&mut self, angle: Float) {
        self.sector.set_start(angle);
    }

    #[inline]
    fn angle(&self) -> Float {
        self.sector.start()
    }

    fn handles(&self) -> [Vector; 3] {
        let handle = |angle| self.position + geom::direction(angle).into_inner() * SOURCE_HANDLE_DISTANCE;
        [
            self.position,
            handle(self.sector.start()),
            handle(self.sector.end()),
        ]
    }

    fn set_handle_position(&mut self, handle: Handle, new_pos: &Vector, last_pos: &Vector) {
        let angle = geom::angle_of(&(new_pos - self.position));
        match handle {
            Handle::Move => self.translate(&(new_pos - last_pos)),
            Handle::Start => self.sector.drag_start(angle),
            Handle::End => self.sector.drag_end(angle),
        }
    }

    #[inline]
    fn parameter(&self) -> Option<Parameter> {
        Some(Parameter {
            kind: ParameterKind::RayCount,
            value: Float::from(self.num_rays),
        })
    }

    /// Adds the integer part of `delta` to the ray count, which stays at least `1`.
    fn adjust_parameter(&mut self, delta: Float) {
        let n = i64::from(self.num_rays).saturating_add(delta as i64);
        self.num_rays = u32::try_from(n.max(1)).unwrap_or(u32::MAX);
    }

    /// `""` keeps the current count, values below `1` become `1`.
    fn set_parameter_from_str(&mut self, s: &str) -> Result<(), ParameterError> {
        let s = s.trim();
        if !s.is_empty() {
            let n = parse_int(s)?.max(1);
            self.num_rays = n.unsigned_abs();
        }
        Ok(())
    }
}
