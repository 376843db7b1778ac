use core::f64::consts::FRAC_PI_3;

use super::*;

/// Half of the width editors draw the arc with. Points this close to the arc count as
/// being on it, on top of the usual selection tolerance.
const HALF_THICKNESS: Float = 2.;

/// A reflective circular arc.
///
/// The sign of the radius is a user-facing parameter only: the geometry always uses `|radius|`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphericalMirror {
    /// The center of curvature
    pub center: Vector,
    radius: Float,
    pub sector: Sector,
}

impl SphericalMirror {
    /// `|radius| < 1` is clamped to `+-1`, keeping its sign (`0` becomes `1`).
    #[must_use]
    pub fn new(center: impl Into<Vector>, radius: Float, start: Float, span: Float) -> Self {
        Self {
            center: center.into(),
            radius: Self::clamp_radius(radius, radius),
            sector: Sector::new(start, span),
        }
    }

    /// The mirror an editor places by clicking at `center`, then at `edge`: the arc goes
    /// through `edge`, and spans a third of a full turn, centered on it.
    #[must_use]
    pub fn from_placement(center: impl Into<Vector>, edge: impl Into<Vector>) -> Self {
        let (center, edge) = (center.into(), edge.into());
        let delta = edge - center;

        Self::new(
            center,
            delta.norm(),
            geom::angle_of(&delta) - FRAC_PI_3,
            2. * FRAC_PI_3,
        )
    }

    /// Clamps `r` to `sign(reference)` if `|r| < 1`.
    #[inline]
    fn clamp_radius(r: Float, reference: Float) -> Float {
        if r.abs() < 1. {
            if reference >= 0. {
                1.
            } else {
                -1.
            }
        } else {
            r
        }
    }

    #[inline]
    #[must_use]
    pub const fn radius(&self) -> Float {
        self.radius
    }

    pub fn set_radius(&mut self, radius: Float) {
        self.radius = Self::clamp_radius(radius, radius);
    }

    #[inline]
    fn arc_point(&self, angle: Float) -> Vector {
        self.center + geom::direction(angle).into_inner() * self.radius.abs()
    }

    #[inline]
    #[must_use]
    pub fn p1(&self) -> Vector {
        self.arc_point(self.sector.start())
    }

    #[inline]
    #[must_use]
    pub fn p2(&self) -> Vector {
        self.arc_point(self.sector.end())
    }

    /// Unit normal at `point`, pointing to the center of curvature.
    #[inline]
    #[must_use]
    pub fn normal_at(&self, point: &Vector) -> Vector {
        geom::normalize(&(self.center - point))
    }
}

impl OpticalElement for SphericalMirror {
    #[inline]
    fn kind(&self) -> ElementKind {
        ElementKind::SphericalMirror
    }

    fn find_intersection(&self, ray: &Ray) -> Option<Intersection> {
        // roots come sorted, the first one in front of the ray, on the arc, is the closest
        geom::ray_circle_intersection(&ray.origin, &ray.dir, &self.center, self.radius.abs())
            .into_iter()
            .filter(|&t| t > EPSILON)
            .map(|t| Intersection {
                point: ray.at(t),
                distance: t,
            })
            .find(|hit| self.sector.contains(geom::angle_of(&(hit.point - self.center))))
    }

    fn interact(&self, incoming: &Ray, point: &Vector) -> Option<Ray> {
        let normal = self.normal_at(point);
        let reflected = geom::reflect(&incoming.dir, &normal);
        incoming.bounced(point, Unit::new_normalize(reflected))
    }

    #[inline]
    fn center(&self) -> Vector {
        self.center
    }

    fn is_point_near(&self, point: &Vector, tolerance: Float) -> bool {
        let delta = point - self.center;
        (delta.norm() - self.radius.abs()).abs() <= tolerance + HALF_THICKNESS
            && self.sector.contains(geom::angle_of(&delta))
    }
}

impl Optics for SphericalMirror {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        if let Some(hit) = self.find_intersection(ctx.ray()) {
            ctx.add_hit(hit, self);
        }
    }
}

impl Editable for SphericalMirror {
    #[inline]
    fn translate(&mut self, delta: &Vector) {
        self.center += delta;
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

    #[inline]
    fn handles(&self) -> [Vector; 3] {
        [self.center, self.p1(), self.p2()]
    }

    fn set_handle_position(&mut self, handle: Handle, new_pos: &Vector, last_pos: &Vector) {
        let angle = geom::angle_of(&(new_pos - self.center));
        match handle {
            Handle::Move => self.translate(&(new_pos - last_pos)),
            Handle::Start => self.sector.drag_start(angle),
            Handle::End => self.sector.drag_end(angle),
        }
    }

    #[inline]
    fn parameter(&self) -> Option<Parameter> {
        Some(Parameter {
            kind: ParameterKind::Radius,
            value: self.radius,
        })
    }

    /// A radius crossing `(-1, 1)` is stopped at `+-1`, on the side it came from.
    #[inline]
    fn adjust_parameter(&mut self, delta: Float) {
        self.radius = Self::clamp_radius(self.radius + delta, self.radius);
    }

    /// `""` keeps the current radius, `"-"` sets it to `-1`.
    fn set_parameter_from_str(&mut self, s: &str) -> Result<(), ParameterError> {
        match s.trim() {
            "" => {}
            "-" => self.radius = -1.,
            s => self.set_radius(parse_float(s)?),
        }
        Ok(())
    }
}
