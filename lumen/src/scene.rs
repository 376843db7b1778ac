use core::ops::{Deref, DerefMut};

use super::*;

/// An ordered collection of elements, and the indices of those that are emitters.
///
/// The emitter list is recomputed from scratch after every modification, it is never patched.
/// Insertion order only matters for picking (later elements are in front), optics don't depend on it.
#[derive(Clone, Debug)]
pub struct Scene<E> {
    elements: Vec<E>,
    emitters: Vec<usize>,
}

impl<E> Default for Scene<E> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            emitters: Vec::new(),
        }
    }
}

impl<E: OpticalElement> FromIterator<E> for Scene<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_elements(iter.into_iter().collect())
    }
}

impl<E: OpticalElement> Scene<E> {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_elements(elements: Vec<E>) -> Self {
        let mut scene = Self {
            elements,
            emitters: Vec::new(),
        };
        scene.rebuild_emitters();
        scene
    }

    fn rebuild_emitters(&mut self) {
        self.emitters = self
            .elements
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.is_emitter().then_some(i))
            .collect();
    }

    /// Appends `element`, returns its index.
    pub fn push(&mut self, element: E) -> usize {
        self.elements.push(element);
        self.rebuild_emitters();
        self.elements.len() - 1
    }

    /// # Panics
    ///
    /// if `index > self.len()`
    pub fn insert(&mut self, index: usize, element: E) {
        self.elements.insert(index, element);
        self.rebuild_emitters();
    }

    /// Returns `None` if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<E> {
        (index < self.elements.len()).then(|| {
            let element = self.elements.remove(index);
            self.rebuild_emitters();
            element
        })
    }

    pub fn retain(&mut self, f: impl FnMut(&E) -> bool) {
        self.elements.retain(f);
        self.rebuild_emitters();
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.emitters.clear();
    }

    #[inline]
    #[must_use]
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&E> {
        self.elements.get(index)
    }

    /// Mutable access to an element. The emitter list is rebuilt when the returned guard drops.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<ElementMut<'_, E>> {
        (index < self.elements.len()).then(|| ElementMut { scene: self, index })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Indices (into [`Self::elements`]) of the elements that are emitters, in insertion order.
    #[inline]
    #[must_use]
    pub fn emitter_indices(&self) -> &[usize] {
        &self.emitters
    }

    #[inline]
    pub fn emitters(&self) -> impl Iterator<Item = &dyn Emitter> + '_ {
        self.emitters
            .iter()
            .filter_map(|&i| self.elements[i].as_emitter())
    }

    /// The index of the front-most element near `point`, testing the last inserted first.
    #[must_use]
    pub fn element_at(&self, point: &Vector, tolerance: Float) -> Option<usize> {
        self.elements
            .iter()
            .rposition(|e| e.is_point_near(point, tolerance))
    }

    #[inline]
    #[must_use]
    pub fn into_elements(self) -> Vec<E> {
        self.elements
    }
}

impl<E: OpticalElement + Optics> Optics for Scene<E> {
    #[inline]
    fn add_hits<'e>(&'e self, ctx: &mut TraceCtx<'_, 'e>) {
        // emitters are transparent, even to their own rays
        self.elements
            .iter()
            .filter(|e| !e.is_emitter())
            .for_each(|e| e.add_hits(ctx));
    }
}

/// A mutable reference to an element of a [`Scene`], see [`Scene::get_mut`].
pub struct ElementMut<'a, E: OpticalElement> {
    scene: &'a mut Scene<E>,
    index: usize,
}

impl<E: OpticalElement> ElementMut<'_, E> {
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl<E: OpticalElement> Deref for ElementMut<'_, E> {
    type Target = E;

    #[inline]
    fn deref(&self) -> &E {
        &self.scene.elements[self.index]
    }
}

impl<E: OpticalElement> DerefMut for ElementMut<'_, E> {
    #[inline]
    fn deref_mut(&mut self) -> &mut E {
        &mut self.scene.elements[self.index]
    }
}

impl<E: OpticalElement> Drop for ElementMut<'_, E> {
    fn drop(&mut self) {
        self.scene.rebuild_emitters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Either an emitter of a single ray going right, or a dot.
    struct Dot {
        at: Vector,
        emits: bool,
    }

    impl Emitter for Dot {
        fn emit_rays(&self) -> Vec<Ray> {
            vec![Ray::new(self.at, Vector::x_axis(), DEFAULT_BOUNCES, Color::WHITE)]
        }
    }

    impl OpticalElement for Dot {
        fn kind(&self) -> ElementKind {
            if self.emits {
                ElementKind::Source
            } else {
                ElementKind::Mirror
            }
        }

        fn find_intersection(&self, _: &Ray) -> Option<Intersection> {
            None
        }

        fn interact(&self, _: &Ray, _: &Vector) -> Option<Ray> {
            None
        }

        fn center(&self) -> Vector {
            self.at
        }

        fn is_point_near(&self, point: &Vector, tolerance: Float) -> bool {
            (point - self.at).norm() <= tolerance
        }

        fn as_emitter(&self) -> Option<&dyn Emitter> {
            self.emits.then_some(self as &dyn Emitter)
        }
    }

    impl Optics for Dot {
        fn add_hits<'e>(&'e self, _: &mut TraceCtx<'_, 'e>) {}
    }

    fn dot(x: Float, emits: bool) -> Dot {
        Dot {
            at: Vector::new(x, 0.),
            emits,
        }
    }

    #[test]
    fn emitters_follow_every_edit() {
        let mut scene = Scene::new();
        scene.push(dot(0., true));
        scene.push(dot(1., false));
        scene.push(dot(2., true));
        assert_eq!(scene.emitter_indices(), [0, 2]);

        scene.remove(0);
        assert_eq!(scene.emitter_indices(), [1]);

        scene.insert(0, dot(-1., true));
        assert_eq!(scene.emitter_indices(), [0, 2]);

        scene.get_mut(1).unwrap().emits = true;
        assert_eq!(scene.emitter_indices(), [0, 1, 2]);

        scene.retain(|d| d.at.x > 0.);
        assert_eq!(scene.emitter_indices(), [0, 1]);

        assert!(scene.remove(7).is_none());

        scene.clear();
        assert!(scene.emitter_indices().is_empty());
        assert_eq!(scene.emitters().count(), 0);
    }

    #[test]
    fn picking_prefers_front_most() {
        let scene: Scene<_> = [dot(0., false), dot(1., false), dot(10., false)]
            .into_iter()
            .collect();

        assert_eq!(scene.element_at(&Vector::new(0.5, 0.), 1.), Some(1));
        assert_eq!(scene.element_at(&Vector::new(10., 0.5), 1.), Some(2));
        assert_eq!(scene.element_at(&Vector::new(5., 0.), 1.), None);
    }

    #[test]
    fn lone_emitter_escapes() {
        let scene = Scene::from_elements(vec![dot(3., true)]);
        let paths = Tracer::default().trace(&scene);

        assert_eq!(paths.len(), 1);
        let points: Vec<_> = paths[0].iter().copied().collect();
        assert_eq!(
            points,
            [Vector::new(3., 0.), Vector::new(3. + MAX_RAY_LENGTH, 0.)]
        );
    }
}
