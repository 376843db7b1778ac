use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::*;

/// Collects the hits reported by [`Optics::add_hits`] for one ray, and keeps the closest.
pub struct TraceCtx<'r, 'e> {
    ray: &'r Ray,
    max_length: Float,
    closest: Option<(Intersection, &'e dyn OpticalElement)>,
}

impl<'r, 'e> TraceCtx<'r, 'e> {
    #[inline]
    #[must_use]
    pub fn new(ray: &'r Ray, max_length: Float) -> Self {
        Self {
            ray,
            max_length,
            closest: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn ray(&self) -> &'r Ray {
        self.ray
    }

    /// Stores `hit`, along with the `element` that was hit, if its distance is in
    /// `(EPSILON, max_length)` and strictly smaller than the one stored internally.
    ///
    /// Hits at equal distances keep the first one reported.
    #[inline]
    pub fn add_hit(&mut self, hit: Intersection, element: &'e dyn OpticalElement) {
        let d = hit.distance;

        if d > EPSILON
            && d < self.max_length
            && self
                .closest
                .as_ref()
                .map_or(true, |(closest, _)| d < closest.distance)
        {
            self.closest = Some((hit, element));
        }
    }

    #[inline]
    #[must_use]
    pub fn closest(&self) -> Option<&(Intersection, &'e dyn OpticalElement)> {
        self.closest.as_ref()
    }

    #[inline]
    pub fn take_closest(&mut self) -> Option<(Intersection, &'e dyn OpticalElement)> {
        self.closest.take()
    }
}

/// Settings of a trace pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Hits further than this are ignored, and rays that hit nothing
    /// end this far from their last origin.
    pub max_ray_length: Float,
    /// Bounce budget given to emitted rays.
    pub default_bounces: u32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_ray_length: MAX_RAY_LENGTH,
            default_bounces: DEFAULT_BOUNCES,
        }
    }
}

/// A point of a [`RayPath`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub point: Vector,
    pub color: Color,
}

/// The polyline followed by one ray: its origin, every point it interacted at,
/// and, if it escaped, a point [`max_ray_length`](TraceConfig::max_ray_length) away
/// from its last origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RayPath {
    points: Vec<Waypoint>,
}

impl RayPath {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, point: Vector, color: Color) {
        self.points.push(Waypoint { point, color });
    }

    #[inline]
    #[must_use]
    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Vector> + '_ {
        self.points.iter().map(|w| &w.point)
    }

    /// Pairs of consecutive points, the line segments a renderer would draw.
    #[inline]
    pub fn segments(&self) -> impl Iterator<Item = [&Waypoint; 2]> + '_ {
        self.points.windows(2).map(|w| {
            // ugly, but `slice::array_windows` is unstable
            let [a, b] = w else { unreachable!() };
            [a, b]
        })
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<Waypoint> {
        self.points
    }
}

/// Runs trace passes.
///
/// A trace pass only reads the elements it runs against, so any number of passes
/// over distinct (or unmodified) scenes may run at the same time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tracer {
    pub config: TraceConfig,
}

impl Tracer {
    #[inline]
    #[must_use]
    pub const fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    /// Follows `ray` through `optics` until it is absorbed, runs out of bounces, or escapes.
    ///
    /// The returned path has at most `ray.bounces_left + 1` points.
    #[must_use]
    pub fn trace_ray(&self, optics: &(impl Optics + ?Sized), mut ray: Ray) -> RayPath {
        let max_length = self.config.max_ray_length;

        let mut path = RayPath::new();
        path.push(ray.origin, ray.color);

        while ray.bounces_left > 0 {
            let mut ctx = TraceCtx::new(&ray, max_length);
            optics.add_hits(&mut ctx);

            let Some((hit, element)) = ctx.take_closest() else {
                path.push(ray.at(max_length), ray.color);
                trace!("ray escaped from {:?}", ray.origin);
                break;
            };

            path.push(hit.point, ray.color);

            match element.interact(&ray, &hit.point) {
                Some(next) if next.bounces_left > 0 => ray = next,
                _ => {
                    trace!("ray stopped at {:?} by {:?}", hit.point, element.kind());
                    break;
                }
            }
        }

        path
    }

    /// Runs a full trace pass: every ray of every emitter of `scene`, in order.
    ///
    /// Paths with less than two points are discarded.
    #[must_use]
    pub fn trace<E: OpticalElement + Optics>(&self, scene: &Scene<E>) -> Vec<RayPath> {
        let mut paths = Vec::new();
        let mut num_rays = 0usize;

        for emitter in scene.emitters() {
            for ray in emitter.emit_rays() {
                num_rays += 1;
                let path = self.trace_ray(scene, ray);
                if path.len() > 1 {
                    paths.push(path);
                }
            }
        }

        debug!(
            "trace pass: {} emitters, {} rays, {} paths",
            scene.emitter_indices().len(),
            num_rays,
            paths.len(),
        );

        paths
    }
}
