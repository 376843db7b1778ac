//! A 2D ray optics engine.
//!
//! Light rays leave [`Emitter`]s and bounce off (or refract through) [`OpticalElement`]s
//! until they run out of bounces or escape the scene. A [`Tracer`] resolves every
//! emitted ray of a [`Scene`] into a [`RayPath`].

use std::{rc::Rc, sync::Arc};

pub use either;
pub use nalgebra;

use either::Either;
use nalgebra::{Unit, Vector2};

pub mod geom;
mod scene;
mod trace;

pub use scene::*;
pub use trace::*;

pub type Float = f64;

/// Positions and displacements.
pub type Vector = Vector2<Float>;

/// Unit-length directions.
pub type Direction = Unit<Vector>;

/// Tolerance used for every floating point comparison of the engine.
pub const EPSILON: Float = 1e-5;

/// Length of the last segment of a ray that doesn't hit anything.
pub const MAX_RAY_LENGTH: Float = 2000.;

/// Number of interactions a freshly emitted ray is allowed.
pub const DEFAULT_BOUNCES: u32 = 5;

/// Outgoing rays start this far along their new direction from the point they
/// left, so they don't immediately hit the same surface again.
pub const RAY_ORIGIN_OFFSET: Float = EPSILON * 10.;

/// An RGBA color, carried by rays as an identity tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);

    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[inline]
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::YELLOW
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// A light ray, represented as a half-line, with a limited number of interactions left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The starting point of the half-line
    pub origin: Vector,
    /// The direction of the half-line
    pub dir: Direction,
    /// How many more times this ray may interact with an element
    pub bounces_left: u32,
    pub color: Color,
}

impl Ray {
    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<Vector>, dir: Direction, bounces_left: u32, color: Color) -> Self {
        Self {
            origin: origin.into(),
            dir,
            bounces_left,
            color,
        }
    }

    /// Returns `None` if `dir` is (nearly) the zero vector.
    #[inline]
    #[must_use]
    pub fn try_new_normalize(
        origin: impl Into<Vector>,
        dir: impl Into<Vector>,
        bounces_left: u32,
        color: Color,
    ) -> Option<Self> {
        Unit::try_new(dir.into(), EPSILON).map(|dir| Self::new(origin, dir, bounces_left, color))
    }

    /// Returns [`self.origin`](Self::origin), translated by [`self.dir`](Self::dir)`* t`.
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> Vector {
        self.origin + self.dir.as_ref() * t
    }

    /// The ray leaving `point` in direction `dir` after `self` interacted with an element there.
    ///
    /// The new ray keeps the color of `self`, has one bounce less, and starts
    /// [`RAY_ORIGIN_OFFSET`] away from `point`. Returns `None` if `self` has no bounces left.
    #[inline]
    #[must_use]
    pub fn bounced(&self, point: &Vector, dir: Direction) -> Option<Self> {
        let bounces_left = self.bounces_left.checked_sub(1)?;

        Some(Self {
            origin: point + dir.as_ref() * RAY_ORIGIN_OFFSET,
            dir,
            bounces_left,
            color: self.color,
        })
    }
}

/// Where a ray meets an element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub point: Vector,
    /// The `t` such that [`ray.at(t)`](Ray::at) `== point`.
    pub distance: Float,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Source,
    Mirror,
    Lens,
    SphericalMirror,
}

/// Something that produces rays at the start of every trace pass.
pub trait Emitter {
    /// The rays to trace, in order. Must be finite.
    fn emit_rays(&self) -> Vec<Ray>;
}

/// The core trait of this library, implemented by every element of a scene.
///
/// [`find_intersection`](Self::find_intersection) and [`interact`](Self::interact) are
/// expected to behave like mathematical functions of their arguments: they must not read
/// or mutate any state that would change their result for the same ray.
pub trait OpticalElement {
    fn kind(&self) -> ElementKind;

    /// The intersection of `ray` with this element closest to the ray's origin, that is
    /// strictly ahead of it, if any.
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection>;

    /// The ray leaving `point` after `incoming` reached it, or `None` if
    /// `incoming` is absorbed.
    fn interact(&self, incoming: &Ray, point: &Vector) -> Option<Ray>;

    fn center(&self) -> Vector;

    /// Whether `point` is within `tolerance` of this element's shape.
    fn is_point_near(&self, point: &Vector, tolerance: Float) -> bool;

    /// Elements that emit rays expose themselves here. Emitters are transparent to every ray.
    #[inline]
    fn as_emitter(&self) -> Option<&dyn Emitter> {
        None
    }

    #[inline]
    fn is_emitter(&self) -> bool {
        self.as_emitter().is_some()
    }
}

/// A set of elements rays can hit.
///
/// This is what a [`Tracer`] runs against. Every element type implements it by reporting its
/// own intersection, collections implement it by asking all of their members.
pub trait Optics {
    /// Reports the intersection of [`ctx.ray()`](TraceCtx::ray) with every element of
    /// `self` through [`ctx.add_hit(...)`](TraceCtx::add_hit), in iteration order.
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>);
}

impl<L: OpticalElement, R: OpticalElement> OpticalElement for Either<L, R> {
    #[inline]
    fn kind(&self) -> ElementKind {
        either::for_both!(self, e => e.kind())
    }

    #[inline]
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection> {
        either::for_both!(self, e => e.find_intersection(ray))
    }

    #[inline]
    fn interact(&self, incoming: &Ray, point: &Vector) -> Option<Ray> {
        either::for_both!(self, e => e.interact(incoming, point))
    }

    #[inline]
    fn center(&self) -> Vector {
        either::for_both!(self, e => e.center())
    }

    #[inline]
    fn is_point_near(&self, point: &Vector, tolerance: Float) -> bool {
        either::for_both!(self, e => e.is_point_near(point, tolerance))
    }

    #[inline]
    fn as_emitter(&self) -> Option<&dyn Emitter> {
        either::for_both!(self, e => e.as_emitter())
    }
}

impl<L: Optics, R: Optics> Optics for Either<L, R> {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        either::for_both!(self, e => e.add_hits(ctx));
    }
}

#[impl_trait_for_tuples::impl_for_tuples(1, 16)]
impl Optics for T {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        for_tuples!( #( T.add_hits(ctx); )* );
    }
}

impl<T: Optics> Optics for [T] {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        self.iter().for_each(|optics| optics.add_hits(ctx));
    }
}

impl<const N: usize, T: Optics> Optics for [T; N] {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        self.as_slice().add_hits(ctx);
    }
}

impl<T: Optics> Optics for Vec<T> {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        self.as_slice().add_hits(ctx);
    }
}

// It's clear that all these impls use the `Deref` trait, but writing a blanket impl over all types implementing `Deref`
// makes it impossible to implement it for new types downstream.

impl<T: Optics + ?Sized> Optics for Box<T> {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        self.as_ref().add_hits(ctx);
    }
}

impl<T: Optics + ?Sized> Optics for Rc<T> {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        self.as_ref().add_hits(ctx);
    }
}

impl<T: Optics + ?Sized> Optics for Arc<T> {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        self.as_ref().add_hits(ctx);
    }
}

impl<T: Optics + ?Sized> Optics for &T {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        (**self).add_hits(ctx);
    }
}

impl<T: Optics + ?Sized> Optics for &mut T {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        (**self).add_hits(ctx);
    }
}

impl<T: OpticalElement + ?Sized> OpticalElement for Box<T> {
    #[inline]
    fn kind(&self) -> ElementKind {
        self.as_ref().kind()
    }

    #[inline]
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection> {
        self.as_ref().find_intersection(ray)
    }

    #[inline]
    fn interact(&self, incoming: &Ray, point: &Vector) -> Option<Ray> {
        self.as_ref().interact(incoming, point)
    }

    #[inline]
    fn center(&self) -> Vector {
        self.as_ref().center()
    }

    #[inline]
    fn is_point_near(&self, point: &Vector, tolerance: Float) -> bool {
        self.as_ref().is_point_near(point, tolerance)
    }

    #[inline]
    fn as_emitter(&self) -> Option<&dyn Emitter> {
        self.as_ref().as_emitter()
    }
}

impl<T: OpticalElement + ?Sized> OpticalElement for &T {
    #[inline]
    fn kind(&self) -> ElementKind {
        (**self).kind()
    }

    #[inline]
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection> {
        (**self).find_intersection(ray)
    }

    #[inline]
    fn interact(&self, incoming: &Ray, point: &Vector) -> Option<Ray> {
        (**self).interact(incoming, point)
    }

    #[inline]
    fn center(&self) -> Vector {
        (**self).center()
    }

    #[inline]
    fn is_point_near(&self, point: &Vector, tolerance: Float) -> bool {
        (**self).is_point_near(point, tolerance)
    }

    #[inline]
    fn as_emitter(&self) -> Option<&dyn Emitter> {
        (**self).as_emitter()
    }
}
