//! Random scene generation, for stress tests and demos.

use core::{
    f64::consts::{PI, TAU},
    iter,
};

use lumen::*;
use lumen_elements::*;

pub use rand;

/// Width of the area random elements are placed in.
pub const SCENE_WIDTH: Float = 1200.;
/// Height of the area random elements are placed in.
pub const SCENE_HEIGHT: Float = 800.;

pub trait Random: Sized {
    /// Generate a randomized version of this element using the provided `rng`
    ///
    /// This method must not fail. If creating an element is faillible, keep trying until success
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

/// A random point of the `SCENE_WIDTH x SCENE_HEIGHT` area.
pub fn rand_point(rng: &mut (impl rand::Rng + ?Sized)) -> Vector {
    Vector::new(
        rng.gen_range(0.0..SCENE_WIDTH),
        rng.gen_range(0.0..SCENE_HEIGHT),
    )
}

#[inline]
pub fn rand_angle(rng: &mut (impl rand::Rng + ?Sized)) -> Float {
    rng.gen_range(-PI..PI)
}

impl Random for Color {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        const PALETTE: [Color; 6] = [
            Color::WHITE,
            Color::YELLOW,
            Color::RED,
            Color::GREEN,
            Color::CYAN,
            Color::MAGENTA,
        ];
        PALETTE[rng.gen_range(0..PALETTE.len())]
    }
}

impl Random for Mirror {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self::new(rand_point(rng), rng.gen_range(20.0..300.0), rand_angle(rng))
    }
}

impl Random for Lens {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        // magnitudes below 20 bend rays too much to be interesting
        let focal_length = rng.gen_range(20.0..400.0) * if rng.gen() { 1. } else { -1. };

        Self::new(
            rand_point(rng),
            rng.gen_range(40.0..200.0),
            rand_angle(rng),
            focal_length,
        )
    }
}

impl Random for SphericalMirror {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self::new(
            rand_point(rng),
            rng.gen_range(40.0..250.0),
            rand_angle(rng),
            rng.gen_range(0.2..PI),
        )
    }
}

impl Random for PointSource {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let span = if rng.gen_bool(0.5) {
            TAU
        } else {
            rng.gen_range(0.1..TAU)
        };

        Self::new(
            rand_point(rng),
            rng.gen_range(1..=64),
            Color::random(rng),
            rand_angle(rng),
            span,
        )
        .with_bounces(rng.gen_range(1..=DEFAULT_BOUNCES * 2))
    }
}

impl Random for Element {
    /// A random mirror, lens, or spherical mirror. Never a source.
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        match rng.gen_range(0usize..3) {
            0 => Mirror::random(rng).into(),
            1 => Lens::random(rng).into(),
            2 => SphericalMirror::random(rng).into(),
            _ => unreachable!(),
        }
    }
}

pub fn gen_random<T: Random>(n: usize, rng: &mut (impl rand::Rng + ?Sized)) -> Vec<T> {
    iter::repeat_with(|| T::random(rng)).take(n).collect()
}

/// A scene of `num_elements` random non-emitting elements, followed by `num_sources` random sources.
pub fn random_scene(
    rng: &mut (impl rand::Rng + ?Sized),
    num_elements: usize,
    num_sources: usize,
) -> Scene<Element> {
    let mut elements = gen_random::<Element>(num_elements, rng);
    elements.extend(
        iter::repeat_with(|| Element::from(PointSource::random(rng))).take(num_sources),
    );
    Scene::from_elements(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn scene_layout() {
        let mut rng = StdRng::seed_from_u64(7);
        let scene = random_scene(&mut rng, 12, 3);

        assert_eq!(scene.len(), 15);
        assert_eq!(scene.emitter_indices(), &[12, 13, 14]);
        assert!(scene.elements()[..12].iter().all(|e| !e.is_emitter()));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = random_scene(&mut StdRng::seed_from_u64(42), 8, 2);
        let b = random_scene(&mut StdRng::seed_from_u64(42), 8, 2);
        assert_eq!(a.elements(), b.elements());
    }

    #[test]
    fn random_scenes_respect_bounce_budgets() {
        let mut rng = StdRng::seed_from_u64(1234);

        for _ in 0..20 {
            let scene = random_scene(&mut rng, 10, 2);
            let max_bounces = scene
                .elements()
                .iter()
                .filter_map(Element::as_source)
                .map(|s| s.bounces)
                .max()
                .unwrap();

            for path in Tracer::default().trace(&scene) {
                assert!(path.len() <= max_bounces as usize + 1);
            }
        }
    }

    #[test]
    fn elements_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(99);

        for element in gen_random::<Element>(100, &mut rng) {
            let c = element.center();
            assert!((0. ..SCENE_WIDTH).contains(&c.x) && (0. ..SCENE_HEIGHT).contains(&c.y));
            if let Some(p) = element.parameter() {
                assert!(p.value.abs() >= 1.);
            }
        }
    }
}
