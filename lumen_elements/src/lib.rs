//! The optical elements of the engine: plane mirrors, thin lenses, spherical mirrors
//! and point sources, along with the hooks editors use to manipulate them.

mod edit;
mod element;
mod lens;
mod mirror;
mod sector;
mod segment;
mod source;
mod spherical;

pub use edit::*;
pub use element::*;
pub use lens::*;
pub use mirror::*;
pub use sector::*;
pub use segment::*;
pub use source::*;
pub use spherical::*;

pub use lumen;

use lumen::{nalgebra::Unit, *};

/// How far from an element's body a point may be to select it.
pub const ELEMENT_SELECT_TOLERANCE: Float = 8.;
/// How far from a handle a point may be to grab it.
pub const HANDLE_SELECT_TOLERANCE: Float = 8.;
/// Radians per rotation step.
pub const ROTATION_SPEED: Float = 0.05;
/// Parameter change per adjustment step, for lenses and spherical mirrors.
pub const PARAM_ADJUST_SPEED: Float = 10.;
/// Ray count change per adjustment step, for sources.
pub const SOURCE_PARAM_ADJUST_SPEED: Float = 1.;
pub const MIN_ELEMENT_PLACEMENT_DISTANCE: Float = 5.;
pub const DEFAULT_FOCAL_LENGTH: Float = 100.;

/// The front-most element of `scene` under `point`, and the handle grabbed on it.
///
/// Elements are tested from the last inserted to the first. On each, the handles are tested
/// first (with [`HANDLE_SELECT_TOLERANCE`]), then the body (with [`ELEMENT_SELECT_TOLERANCE`]),
/// which grabs [`Handle::Move`].
pub fn pick<E: Editable>(scene: &Scene<E>, point: &Vector) -> Option<(usize, Handle)> {
    scene
        .elements()
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, element)| {
            element
                .handle_at(point, HANDLE_SELECT_TOLERANCE)
                .or_else(|| {
                    element
                        .is_point_near(point, ELEMENT_SELECT_TOLERANCE)
                        .then_some(Handle::Move)
                })
                .map(|handle| (i, handle))
        })
}

/// A 360 ray source facing a tilted mirror.
#[must_use]
pub fn default_scene() -> Scene<Element> {
    Scene::from_iter([
        Element::from(PointSource::new(
            [100., 400.],
            360,
            Color::YELLOW,
            0.,
            core::f64::consts::TAU,
        )),
        Element::from(Mirror::new([600., 400.], 200., core::f64::consts::FRAC_PI_4)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picking_prefers_front_elements() {
        let mut scene = default_scene();
        scene.push(Mirror::new([600., 400.], 50., 0.).into());

        // both mirrors are under the cursor, the last pushed wins
        assert_eq!(pick(&scene, &Vector::new(605., 402.)), Some((2, Handle::Move)));
        assert_eq!(pick(&scene, &Vector::new(576., 400.)), Some((2, Handle::Start)));
        assert_eq!(pick(&scene, &Vector::new(100., 405.)), Some((0, Handle::Move)));
        // a full circle source has both angle handles at the same place
        assert_eq!(pick(&scene, &Vector::new(138., 400.)), Some((0, Handle::Start)));
        assert_eq!(pick(&scene, &Vector::new(300., 100.)), None);
    }

    #[test]
    fn default_scene_traces() {
        let scene = default_scene();
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.emitter_indices(), &[0]);

        let paths = Tracer::default().trace(&scene);
        assert_eq!(paths.len(), 360);
        assert!(paths.iter().any(|p| p.len() > 2));
    }
}
