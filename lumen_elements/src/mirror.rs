use super::*;

/// A flat, two-sided, perfectly reflective line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mirror {
    pub segment: Segment,
}

impl Mirror {
    #[inline]
    #[must_use]
    pub fn new(center: impl Into<Vector>, length: Float, angle: Float) -> Self {
        Self {
            segment: Segment::new(center, length, angle),
        }
    }

    #[inline]
    #[must_use]
    pub fn from_endpoints(p1: impl Into<Vector>, p2: impl Into<Vector>) -> Self {
        Self {
            segment: Segment::from_endpoints(p1, p2),
        }
    }
}

impl OpticalElement for Mirror {
    #[inline]
    fn kind(&self) -> ElementKind {
        ElementKind::Mirror
    }

    #[inline]
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection> {
        self.segment.intersection(ray)
    }

    fn interact(&self, incoming: &Ray, point: &Vector) -> Option<Ray> {
        let [p1, p2] = self.segment.endpoints();
        let mut normal = geom::normalize(&geom::perp(&(p2 - p1)));

        // face the incoming ray
        if incoming.dir.dot(&normal) > 0. {
            normal = -normal;
        }

        let reflected = geom::reflect(&incoming.dir, &normal);
        incoming.bounced(point, Unit::new_normalize(reflected))
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

impl Optics for Mirror {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        if let Some(hit) = self.find_intersection(ctx.ray()) {
            ctx.add_hit(hit, self);
        }
    }
}

impl Editable for Mirror {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflection_law() {
        let mirror = Mirror::new([0., 0.], 100., 0.);
        let ray = Ray::new([0., -50.], Vector::y_axis(), 5, Color::YELLOW);

        let hit = mirror.find_intersection(&ray).unwrap();
        assert!(hit.point.norm() < 1e-9);
        assert!((hit.distance - 50.).abs() < 1e-9);

        let out = mirror.interact(&ray, &hit.point).unwrap();
        assert!((out.dir.into_inner() - Vector::new(0., -1.)).norm() < 1e-9);
        assert_eq!(out.bounces_left, 4);
        assert_eq!(out.color, Color::YELLOW);
        assert!(out.origin.y < 0.);
    }

    #[test]
    fn reflects_from_both_sides() {
        let mirror = Mirror::new([0., 0.], 100., 0.);
        let dir = Unit::new_normalize(Vector::new(1., -1.));
        let ray = Ray::new([-10., 10.], dir, 5, Color::YELLOW);

        let hit = mirror.find_intersection(&ray).unwrap();
        let out = mirror.interact(&ray, &hit.point).unwrap();

        let expected = Vector::new(1., 1.).normalize();
        assert!((out.dir.into_inner() - expected).norm() < 1e-9);
    }

    #[test]
    fn tilted_mirror_turns_ray_by_right_angle() {
        let mirror = Mirror::new([10., 0.], 20., core::f64::consts::FRAC_PI_4);
        let ray = Ray::new([0., 0.], Vector::x_axis(), 5, Color::YELLOW);

        let hit = mirror.find_intersection(&ray).unwrap();
        assert!((hit.point - Vector::new(10., 0.)).norm() < 1e-9);

        let out = mirror.interact(&ray, &hit.point).unwrap();
        assert!((out.dir.into_inner() - Vector::new(0., 1.)).norm() < 1e-9);
    }

    #[test]
    fn misses_past_its_ends() {
        let mirror = Mirror::new([0., 0.], 100., 0.);
        let ray = Ray::new([60., -50.], Vector::y_axis(), 5, Color::YELLOW);
        assert!(mirror.find_intersection(&ray).is_none());
    }
}
