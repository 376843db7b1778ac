use core::f64::consts::PI;

use super::*;

/// A line segment, stored as its center, length, and the angle it makes with the x axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub center: Vector,
    pub length: Float,
    pub angle: Float,
}

impl Segment {
    #[inline]
    #[must_use]
    pub fn new(center: impl Into<Vector>, length: Float, angle: Float) -> Self {
        Self {
            center: center.into(),
            length,
            angle,
        }
    }

    /// The segment going from `p1` to `p2`.
    #[must_use]
    pub fn from_endpoints(p1: impl Into<Vector>, p2: impl Into<Vector>) -> Self {
        let (p1, p2) = (p1.into(), p2.into());
        let delta = p2 - p1;

        Self {
            center: (p1 + p2) / 2.,
            length: delta.norm(),
            angle: geom::angle_of(&delta),
        }
    }

    #[inline]
    fn half(&self) -> Vector {
        geom::direction(self.angle).into_inner() * (self.length / 2.)
    }

    #[inline]
    #[must_use]
    pub fn p1(&self) -> Vector {
        self.center - self.half()
    }

    #[inline]
    #[must_use]
    pub fn p2(&self) -> Vector {
        self.center + self.half()
    }

    #[inline]
    #[must_use]
    pub fn endpoints(&self) -> [Vector; 2] {
        let half = self.half();
        [self.center - half, self.center + half]
    }

    #[inline]
    #[must_use]
    pub fn intersection(&self, ray: &Ray) -> Option<Intersection> {
        let [p1, p2] = self.endpoints();
        geom::ray_segment_intersection(&ray.origin, &ray.dir, &p1, &p2)
    }

    #[inline]
    #[must_use]
    pub fn distance_to(&self, point: &Vector) -> Float {
        let [p1, p2] = self.endpoints();
        geom::distance_point_segment(point, &p1, &p2)
    }

    #[inline]
    #[must_use]
    pub fn handles(&self) -> [Vector; 3] {
        let [p1, p2] = self.endpoints();
        [self.center, p1, p2]
    }

    /// Moves an endpoint to `new_pos`, keeping the other one fixed, or translates
    /// the segment by `new_pos - last_pos` for [`Handle::Move`].
    pub fn set_handle_position(&mut self, handle: Handle, new_pos: &Vector, last_pos: &Vector) {
        let [p1, p2] = self.endpoints();

        let other = match handle {
            Handle::Move => {
                self.center += new_pos - last_pos;
                return;
            }
            Handle::Start => p2,
            Handle::End => p1,
        };

        let delta = new_pos - other;
        self.center = (new_pos + other) / 2.;
        self.length = delta.norm();
        self.angle = geom::angle_of(&delta);

        if handle == Handle::Start {
            // `delta` goes from p2 to p1
            self.angle += PI;
            if self.angle > PI {
                self.angle -= 2. * PI;
            }
        }
    }
}
