use core::f64::consts::TAU;

use super::*;

/// A range of angles, going counter-clockwise from `start`, `span` radians long.
///
/// `start` is kept in `[-pi, pi)` and `span` in `[0, 2 pi]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sector {
    start: Float,
    span: Float,
}

impl Sector {
    #[inline]
    #[must_use]
    pub fn new(start: Float, span: Float) -> Self {
        Self {
            start: geom::normalize_angle(start),
            span: span.clamp(0., TAU),
        }
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> Float {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn span(&self) -> Float {
        self.span
    }

    /// `start + span`, not normalized.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Float {
        self.start + self.span
    }

    #[inline]
    #[must_use]
    pub fn is_full_circle(&self) -> bool {
        self.span >= TAU - EPSILON
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, angle: Float) -> bool {
        geom::is_angle_between(angle, self.start, self.span)
    }

    #[inline]
    pub fn set_start(&mut self, start: Float) {
        self.start = geom::normalize_angle(start);
    }

    #[inline]
    pub fn rotate(&mut self, delta: Float) {
        self.set_start(self.start + delta);
    }

    /// Moves the start of the sector to `angle`, keeping its end fixed.
    pub fn drag_start(&mut self, angle: Float) {
        let old_end = geom::normalize_angle(self.end());
        let mut span = geom::normalize_angle(old_end - angle);
        if span <= 0. {
            span += TAU;
        }
        self.start = geom::normalize_angle(angle);
        self.span = span.clamp(0., TAU);
    }

    /// Moves the end of the sector to `angle`, keeping its start fixed.
    pub fn drag_end(&mut self, angle: Float) {
        let mut span = geom::normalize_angle(angle - self.start);
        if span <= 0. {
            span += TAU;
        }
        self.span = span.clamp(0., TAU);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn construction_normalizes() {
        let s = Sector::new(5. * FRAC_PI_2, 10.);
        assert!((s.start() - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(s.span(), TAU);
        assert!(s.is_full_circle());

        assert_eq!(Sector::new(0., -1.).span(), 0.);
    }

    #[test]
    fn drags_keep_the_opposite_end() {
        let mut s = Sector::new(0., FRAC_PI_2);

        s.drag_start(-FRAC_PI_2);
        assert!((s.start() + FRAC_PI_2).abs() < 1e-12);
        assert!((s.span() - PI).abs() < 1e-12);

        s.drag_end(0.);
        assert!((s.start() + FRAC_PI_2).abs() < 1e-12);
        assert!((s.span() - FRAC_PI_2).abs() < 1e-12);

        // dragging the end behind the start wraps around
        s.drag_end(-PI);
        assert!((s.span() - 3. * FRAC_PI_2).abs() < 1e-12);
    }
}
