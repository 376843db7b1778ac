//! Pure 2D geometry used by the optical elements.
//!
//! Nothing in here fails: degenerate inputs (zero-length segments, rays parallel to a
//! segment, zero directions) are absorbed by [`EPSILON`] thresholds and reported as
//! "no intersection" or a zero vector.

use core::f64::consts::{PI, TAU};

use arrayvec::ArrayVec;

use super::*;

/// Returns `v / |v|`, or the zero vector if `|v| < EPSILON`.
#[inline]
#[must_use]
pub fn normalize(v: &Vector) -> Vector {
    let l = v.norm();
    if l < EPSILON {
        Vector::zeros()
    } else {
        v / l
    }
}

/// `v` rotated by a quarter turn, counter-clockwise.
#[inline]
#[must_use]
pub fn perp(v: &Vector) -> Vector {
    Vector::new(-v.y, v.x)
}

/// The z component of the 3D cross product of `a` and `b`.
#[inline]
#[must_use]
pub fn cross(a: &Vector, b: &Vector) -> Float {
    a.x * b.y - a.y * b.x
}

/// The unit vector making an angle of `angle` radians with the x axis.
#[inline]
#[must_use]
pub fn direction(angle: Float) -> Direction {
    let (sin, cos) = angle.sin_cos();
    Unit::new_normalize(Vector::new(cos, sin))
}

/// The angle `v` makes with the x axis, in `[-pi, pi]`.
#[inline]
#[must_use]
pub fn angle_of(v: &Vector) -> Float {
    v.y.atan2(v.x)
}

/// Mirror `v` about the line whose normal is `n`: `v - 2 (v . n) n`.
///
/// `n` is expected to be unit length.
#[inline]
#[must_use]
pub fn reflect(v: &Vector, n: &Vector) -> Vector {
    v - n * (2. * v.dot(n))
}

/// Wraps `angle` into `[-pi, pi)`. Angles already in range are returned as is.
#[inline]
#[must_use]
pub fn normalize_angle(angle: Float) -> Float {
    if (-PI..PI).contains(&angle) {
        angle
    } else {
        (angle + PI).rem_euclid(TAU) - PI
    }
}

/// Whether `angle` lies on the arc going counter-clockwise from `start`, `span` radians long.
///
/// Both ends are inclusive. Arcs crossing the `+-pi` boundary are handled.
#[must_use]
pub fn is_angle_between(angle: Float, start: Float, span: Float) -> bool {
    if span >= TAU - EPSILON {
        return true;
    }

    let a = normalize_angle(angle);
    let s = normalize_angle(start);
    let e = normalize_angle(start + span);

    if s <= e {
        a >= s - EPSILON && a <= e + EPSILON
    } else {
        // wraps through +-pi
        a >= s - EPSILON || a <= e + EPSILON
    }
}

/// Distance between `p` and the closest point of the segment `[a, b]`.
#[must_use]
pub fn distance_point_segment(p: &Vector, a: &Vector, b: &Vector) -> Float {
    let ab = b - a;
    let len_sq = ab.norm_squared();

    if len_sq < EPSILON {
        return (p - a).norm();
    }

    let t = ((p - a).dot(&ab) / len_sq).clamp(0., 1.);
    (p - (a + ab * t)).norm()
}

/// Intersection between the ray starting at `origin`, directed by `dir`
/// and the segment `[p1, p2]`.
///
/// Solves `origin + t * dir = p1 + s * (p2 - p1)`. Accepts `t >= EPSILON` and
/// `s` in `[-EPSILON, 1 + EPSILON]`, rejects rays (nearly) parallel to the segment.
#[must_use]
pub fn ray_segment_intersection(
    origin: &Vector,
    dir: &Vector,
    p1: &Vector,
    p2: &Vector,
) -> Option<Intersection> {
    let v1 = origin - p1;
    let v2 = p2 - p1;
    let v3 = perp(dir);

    let denom = v2.dot(&v3);
    if denom.abs() < EPSILON {
        return None;
    }

    let t = cross(&v2, &v1) / denom;
    let s = v1.dot(&v3) / denom;

    (t >= EPSILON && (-EPSILON..=1. + EPSILON).contains(&s)).then(|| Intersection {
        point: origin + dir * t,
        distance: t,
    })
}

/// Values of `t` such that `origin + t * dir` lies on the circle of center `center`
/// and radius `radius`, sorted in ascending order.
///
/// Returns a single root when the ray is tangent to the circle. Negative roots
/// (behind `origin`) are kept, callers discard them.
#[must_use]
pub fn ray_circle_intersection(
    origin: &Vector,
    dir: &Vector,
    center: &Vector,
    radius: Float,
) -> ArrayVec<Float, 2> {
    let mut roots = ArrayVec::new();

    // substituting `P + t * D` in `||V - C||^2 = r^2` gives `a t^2 + b t + c = 0`
    let oc = origin - center;
    let a = dir.dot(dir);

    if a < EPSILON {
        return roots;
    }

    let b = 2. * oc.dot(dir);
    let c = oc.norm_squared() - radius * radius;
    let delta = b.mul_add(b, -4. * a * c);

    if delta.abs() < EPSILON {
        roots.push(-b / (2. * a));
    } else if delta > 0. {
        let root = delta.sqrt();
        roots.push((-b - root) / (2. * a));
        roots.push((-b + root) / (2. * a));
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: Float, y: Float) -> Vector {
        Vector::new(x, y)
    }

    #[test]
    fn normalize_degenerate_is_zero() {
        assert_eq!(normalize(&v(0., 0.)), Vector::zeros());
        assert_eq!(normalize(&v(1e-7, 0.)), Vector::zeros());
        assert!((normalize(&v(3., 4.)) - v(0.6, 0.8)).norm() < 1e-12);
    }

    #[test]
    fn reflect_about_normal() {
        let r = reflect(&v(0., 1.), &v(0., -1.));
        assert!((r - v(0., -1.)).norm() < 1e-12);

        let r = reflect(&v(1., 1.).normalize(), &v(0., 1.));
        assert!((r - v(1., -1.).normalize()).norm() < 1e-12);
    }

    #[test]
    fn normalize_angle_range() {
        assert!((normalize_angle(3. * PI / 2.) + PI / 2.).abs() < 1e-12);
        assert!((normalize_angle(PI) + PI).abs() < 1e-12);
        assert!((normalize_angle(-PI) + PI).abs() < 1e-12);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn angle_between_inclusive_bounds() {
        let (start, span) = (0.3, 1.2);
        assert!(is_angle_between(start, start, span));
        assert!(is_angle_between(start + span, start, span));
        assert!(is_angle_between(0.9, start, span));
        assert!(!is_angle_between(0.2, start, span));
        assert!(!is_angle_between(1.6, start, span));
    }

    #[test]
    fn angle_between_wraps_through_pi() {
        let start = 170f64.to_radians();
        let span = 40f64.to_radians();

        assert!(is_angle_between(190f64.to_radians(), start, span));
        assert!(is_angle_between(-170f64.to_radians(), start, span));
        assert!(is_angle_between(PI, start, span));
        assert!(is_angle_between(start + span, start, span));
        assert!(!is_angle_between(0., start, span));
        assert!(!is_angle_between(160f64.to_radians(), start, span));
        assert!(!is_angle_between(-140f64.to_radians(), start, span));
    }

    #[test]
    fn full_circle_contains_everything() {
        for i in 0..16 {
            assert!(is_angle_between(i as Float * 0.4, 1., TAU));
        }
    }

    #[test]
    fn point_segment_distance_clamps() {
        let (a, b) = (v(0., 0.), v(10., 0.));
        assert!((distance_point_segment(&v(5., 3.), &a, &b) - 3.).abs() < 1e-12);
        assert!((distance_point_segment(&v(-3., 4.), &a, &b) - 5.).abs() < 1e-12);
        assert!((distance_point_segment(&v(13., 4.), &a, &b) - 5.).abs() < 1e-12);
        // zero-length segment
        assert!((distance_point_segment(&v(3., 4.), &a, &a) - 5.).abs() < 1e-12);
    }

    #[test]
    fn segment_hit() {
        let hit = ray_segment_intersection(&v(0., -50.), &v(0., 1.), &v(-50., 0.), &v(50., 0.))
            .unwrap();
        assert!((hit.distance - 50.).abs() < 1e-9);
        assert!(hit.point.norm() < 1e-9);
    }

    #[test]
    fn segment_miss_parallel_behind_and_outside() {
        let (p1, p2) = (v(-50., 0.), v(50., 0.));
        // parallel
        assert!(ray_segment_intersection(&v(0., -5.), &v(1., 0.), &p1, &p2).is_none());
        // behind the ray
        assert!(ray_segment_intersection(&v(0., 5.), &v(0., 1.), &p1, &p2).is_none());
        // beyond the endpoints
        assert!(ray_segment_intersection(&v(60., -5.), &v(0., 1.), &p1, &p2).is_none());
        // degenerate segment
        assert!(ray_segment_intersection(&v(0., -5.), &v(0., 1.), &p1, &p1).is_none());
    }

    #[test]
    fn segment_endpoint_tolerance() {
        let (p1, p2) = (v(-50., 0.), v(50., 0.));
        assert!(ray_segment_intersection(&v(50., -5.), &v(0., 1.), &p1, &p2).is_some());
        assert!(ray_segment_intersection(&v(-50., -5.), &v(0., 1.), &p1, &p2).is_some());
    }

    #[test]
    fn circle_roots() {
        let c = v(0., 0.);

        let roots = ray_circle_intersection(&v(-10., 0.), &v(1., 0.), &c, 5.);
        assert_eq!(roots.len(), 2);
        assert!((roots[0] - 5.).abs() < 1e-9);
        assert!((roots[1] - 15.).abs() < 1e-9);

        let tangent = ray_circle_intersection(&v(-10., 5.), &v(1., 0.), &c, 5.);
        assert_eq!(tangent.len(), 1);
        assert!((tangent[0] - 10.).abs() < 1e-9);

        assert!(ray_circle_intersection(&v(-10., 6.), &v(1., 0.), &c, 5.).is_empty());
        assert!(ray_circle_intersection(&v(-10., 0.), &v(0., 0.), &c, 5.).is_empty());
    }

    #[test]
    fn circle_roots_from_inside() {
        let roots = ray_circle_intersection(&v(0., 0.), &v(0., 1.), &v(0., 0.), 5.);
        assert_eq!(roots.len(), 2);
        assert!((roots[0] + 5.).abs() < 1e-9);
        assert!((roots[1] - 5.).abs() < 1e-9);
    }
}
