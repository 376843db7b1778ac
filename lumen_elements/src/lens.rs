use super::*;

/// An ideal thin lens.
///
/// Geometrically a segment, across which rays are deviated according to the thin lens
/// equation in angle space: a ray reaching the lens at signed height `y` above its center,
/// making an angle `a` with the optical axis, leaves it with an angle `atan(tan(a) - y / f)`.
///
/// Positive focal lengths make converging lenses, negative ones diverging lenses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lens {
    pub segment: Segment,
    focal_length: Float,
}

impl Lens {
    #[inline]
    #[must_use]
    pub fn new(center: impl Into<Vector>, height: Float, angle: Float, focal_length: Float) -> Self {
        Self {
            segment: Segment::new(center, height, angle),
            focal_length: clamp_away_from_zero(focal_length),
        }
    }

    #[inline]
    #[must_use]
    pub fn from_endpoints(p1: impl Into<Vector>, p2: impl Into<Vector>, focal_length: Float) -> Self {
        Self {
            segment: Segment::from_endpoints(p1, p2),
            focal_length: clamp_away_from_zero(focal_length),
        }
    }

    #[inline]
    #[must_use]
    pub const fn focal_length(&self) -> Float {
        self.focal_length
    }

    /// Nonzero values in `(-1, 1)` become `+-1`, `0` makes a lens that doesn't deviate rays.
    #[inline]
    pub fn set_focal_length(&mut self, focal_length: Float) {
        self.focal_length = clamp_away_from_zero(focal_length);
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> Float {
        self.segment.length
    }

    /// The two focal points, on either side of the lens.
    #[must_use]
    pub fn focal_points(&self) -> [Vector; 2] {
        let axis = geom::perp(&geom::direction(self.segment.angle));
        let c = self.segment.center;
        [c + axis * self.focal_length, c - axis * self.focal_length]
    }
}

impl OpticalElement for Lens {
    #[inline]
    fn kind(&self) -> ElementKind {
        ElementKind::Lens
    }

    #[inline]
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection> {
        self.segment.intersection(ray)
    }

    fn interact(&self, incoming: &Ray, point: &Vector) -> Option<Ray> {
        let [p1, p2] = self.segment.endpoints();
        let along = geom::normalize(&(p2 - p1));

        // local frame: `v` is the optical axis, pointing where the ray goes, `u` spans the lens
        let mut v = geom::normalize(&geom::perp(&along));
        if incoming.dir.dot(&v) < 0. {
            v = -v;
        }
        let u = geom::perp(&v);

        let height = (point - self.segment.center).dot(&u);
        let axis_angle = geom::angle_of(&v);
        let alpha_in = geom::normalize_angle(geom::angle_of(&incoming.dir) - axis_angle);

        let alpha_out = if self.focal_length.abs() > EPSILON {
            (alpha_in.tan() - height / self.focal_length).atan()
        } else {
            alpha_in
        };

        incoming.bounced(point, geom::direction(axis_angle + alpha_out))
    }

    #[inline]
    fn center(&self) -> Vector {
        self.segment.center
    }

    #[inline]
    fn is_point_near(&self, point: &Vector, tolerance: Float) -> bool {
        self.segment.distance_to(point) <= tolerance
    }
}

impl Optics for Lens {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        if let Some(hit) = self.find_intersection(ctx.ray()) {
            ctx.add_hit(hit, self);
        }
    }
}

impl Editable for Lens {
    #[inline]
    fn translate(&mut self, delta: &Vector) {
        self.segment.center += delta;
    }

    #[inline]
    fn rotate(&mut self, delta: Float) {
        self.segment.angle += delta;
    }

    #[inline]
    fn set_angle(&mut self, angle: Float) {
        self.segment.angle = angle;
    }

    #[inline]
    fn angle(&self) -> Float {
        self.segment.angle
    }

    #[inline]
    fn handles(&self) -> [Vector; 3] {
        self.segment.handles()
    }

    #[inline]
    fn set_handle_position(&mut self, handle: Handle, new_pos: &Vector, last_pos: &Vector) {
        self.segment.set_handle_position(handle, new_pos, last_pos);
    }

    #[inline]
    fn parameter(&self) -> Option<Parameter> {
        Some(Parameter {
            kind: ParameterKind::FocalLength,
            value: self.focal_length,
        })
    }

    #[inline]
    fn adjust_parameter(&mut self, delta: Float) {
        self.set_focal_length(self.focal_length + delta);
    }

    /// `""` and `"-"` both set the focal length to `0`.
    fn set_parameter_from_str(&mut self, s: &str) -> Result<(), ParameterError> {
        let s = s.trim();
        let f = match s {
            "" | "-" => 0.,
            s => parse_float(s)?,
        };
        self.set_focal_length(f);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lens(f: Float) -> Lens {
        Lens::new([0., 0.], 100., 0., f)
    }

    /// Traces `ray` through `lens`, and returns where it crosses the line `x = 0` afterwards.
    fn axis_crossing(lens: &Lens, ray: &Ray) -> Vector {
        let hit = lens.find_intersection(ray).unwrap();
        let out = lens.interact(ray, &hit.point).unwrap();
        let t = -out.origin.x / out.dir.x;
        out.at(t)
    }

    #[test]
    fn parallel_ray_goes_through_focal_point() {
        let lens = lens(100.);
        let ray = Ray::new([10., -50.], Vector::y_axis(), 5, Color::YELLOW);

        let hit = lens.find_intersection(&ray).unwrap();
        let out = lens.interact(&ray, &hit.point).unwrap();

        // deviated toward the axis by atan(10 / 100)
        let angle = out.dir.x.atan2(out.dir.y);
        assert!((angle - (-10f64 / 100.).atan()).abs() < 1e-9);
        assert!((out.dir.norm() - 1.).abs() < 1e-9);
        assert_eq!(out.bounces_left, 4);

        assert!((axis_crossing(&lens, &ray) - Vector::new(0., 100.)).norm() < 1e-6);
    }

    #[test]
    fn converges_from_either_side() {
        let lens = lens(50.);

        for x in [-30., -5., 5., 30.] {
            let down = Ray::new([x, 40.], -Vector::y_axis(), 5, Color::YELLOW);
            assert!((axis_crossing(&lens, &down) - Vector::new(0., -50.)).norm() < 1e-6);

            let up = Ray::new([x, -40.], Vector::y_axis(), 5, Color::YELLOW);
            assert!((axis_crossing(&lens, &up) - Vector::new(0., 50.)).norm() < 1e-6);
        }
    }

    #[test]
    fn diverging_lens_spreads_rays() {
        let lens = lens(-100.);
        let ray = Ray::new([10., -50.], Vector::y_axis(), 5, Color::YELLOW);

        let hit = lens.find_intersection(&ray).unwrap();
        let out = lens.interact(&ray, &hit.point).unwrap();

        // the outgoing ray seems to come from the virtual focus behind the lens
        let back = out.origin - out.dir.into_inner() * (out.origin.x / out.dir.x);
        assert!((back - Vector::new(0., -100.)).norm() < 1e-6);
    }

    #[test]
    fn central_ray_is_undeviated() {
        let lens = lens(100.);
        let dir = Unit::new_normalize(Vector::new(0.3, 1.));
        let ray = Ray::new(-dir.into_inner() * 50., dir, 5, Color::YELLOW);

        let hit = lens.find_intersection(&ray).unwrap();
        let out = lens.interact(&ray, &hit.point).unwrap();
        assert!((out.dir.into_inner() - dir.into_inner()).norm() < 1e-9);
    }

    #[test]
    fn zero_focal_length_is_a_no_op() {
        let lens = lens(0.);
        let dir = Unit::new_normalize(Vector::new(0.2, 1.));
        let ray = Ray::new([10., -50.], dir, 5, Color::YELLOW);

        let hit = lens.find_intersection(&ray).unwrap();
        let out = lens.interact(&ray, &hit.point).unwrap();
        assert!((out.dir.into_inner() - dir.into_inner()).norm() < 1e-9);
    }

    #[test]
    fn focal_length_editing() {
        let mut lens = lens(100.);

        lens.adjust_parameter(-99.5);
        assert_eq!(lens.focal_length(), 1.);

        lens.set_parameter_from_str("-0.2").unwrap();
        assert_eq!(lens.focal_length(), -1.);

        lens.set_parameter_from_str("-").unwrap();
        assert_eq!(lens.focal_length(), 0.);

        lens.set_parameter_from_str(" 250 ").unwrap();
        assert_eq!(lens.focal_length(), 250.);

        assert!(matches!(
            lens.set_parameter_from_str("2x"),
            Err(ParameterError::InvalidNumber(_))
        ));
        assert_eq!(lens.focal_length(), 250.);
        assert_eq!(lens.parameter().unwrap().to_string(), "F = 250");
    }

    #[test]
    fn focal_points_on_axis() {
        let [f1, f2] = lens(80.).focal_points();
        assert!((f1 - Vector::new(0., 80.)).norm() < 1e-9);
        assert!((f2 - Vector::new(0., -80.)).norm() < 1e-9);
    }
}
