//! Bounding box.

use std::iter::FromIterator;

use cgmath::{num_traits::Float, BaseFloat, EuclideanSpace, InnerSpace, Point3};

/// 3D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox3d<S> {
    /// Minimum.
    min: Point3<S>,
    /// Maximum.
    max: Point3<S>,
}

impl<S: BaseFloat> BoundingBox3d<S> {
    /// Returns minimum xyz.
    pub fn min(&self) -> Point3<S> {
        self.min
    }

    /// Returns maximum xyz.
    pub fn max(&self) -> Point3<S> {
        self.max
    }

    /// Extends the bounding box to contain the given point.
    pub fn insert(&self, p: Point3<S>) -> Self {
        Self {
            min: element_wise(self.min, p, Float::min),
            max: element_wise(self.max, p, Float::max),
        }
    }

    /// Merges the bounding boxes.
    pub fn union(&self, o: &Self) -> Self {
        Self {
            min: element_wise(self.min, o.min, Float::min),
            max: element_wise(self.max, o.max, Float::max),
        }
    }

    /// Returns the center.
    pub fn center(&self) -> Point3<S> {
        self.min.midpoint(self.max)
    }

    /// Returns the radius of the bounding sphere around the center.
    pub fn radius(&self) -> S {
        (self.max - self.min).magnitude() / (S::one() + S::one())
    }
}

impl<S: BaseFloat> From<Point3<S>> for BoundingBox3d<S> {
    fn from(p: Point3<S>) -> Self {
        Self { min: p, max: p }
    }
}

/// 3D bounding box, which can be empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionalBoundingBox3d<S> {
    /// Bounding box.
    bbox: Option<BoundingBox3d<S>>,
}

impl<S: BaseFloat> OptionalBoundingBox3d<S> {
    /// Creates an empty bounding box.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bounding box.
    pub fn bounding_box(&self) -> Option<BoundingBox3d<S>> {
        self.bbox
    }

    /// Extends the bounding box to contain the given point.
    pub fn insert(&self, p: Point3<S>) -> Self {
        let bbox = self
            .bbox
            .map_or_else(|| BoundingBox3d::from(p), |bbox| bbox.insert(p));
        Self { bbox: Some(bbox) }
    }

    /// Merges the bounding boxes.
    pub fn union(&self, o: &Self) -> Self {
        let bbox = match (self.bbox, o.bbox) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        };
        Self { bbox }
    }
}

impl<S> Default for OptionalBoundingBox3d<S> {
    fn default() -> Self {
        Self { bbox: None }
    }
}

impl<S: BaseFloat> From<BoundingBox3d<S>> for OptionalBoundingBox3d<S> {
    fn from(bbox: BoundingBox3d<S>) -> Self {
        Self { bbox: Some(bbox) }
    }
}

impl<S: BaseFloat> FromIterator<Point3<S>> for OptionalBoundingBox3d<S> {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Point3<S>>,
    {
        iter.into_iter().fold(Self::new(), |bbox, p| bbox.insert(p))
    }
}

impl<S: BaseFloat> FromIterator<OptionalBoundingBox3d<S>> for OptionalBoundingBox3d<S> {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = OptionalBoundingBox3d<S>>,
    {
        iter.into_iter().fold(Self::new(), |bbox, o| bbox.union(&o))
    }
}

/// Applies the given function element wise.
fn element_wise<S, F>(a: Point3<S>, b: Point3<S>, f: F) -> Point3<S>
where
    F: Fn(S, S) -> S,
{
    Point3::new(f(a.x, b.x), f(a.y, b.y), f(a.z, b.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn collect_points() {
        let bbox: OptionalBoundingBox3d<f32> = vec![
            Point3::new(1.0, -2.0, 0.5),
            Point3::new(-1.0, 2.0, 0.0),
            Point3::new(0.0, 0.0, 3.0),
        ]
        .into_iter()
        .collect();
        let bbox = bbox.bounding_box().unwrap();
        assert_eq!(bbox.min(), Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(bbox.max(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn empty_union_is_identity() {
        let a: OptionalBoundingBox3d<f32> =
            BoundingBox3d::from(Point3::new(1.0, 1.0, 1.0)).into();
        assert_eq!(a.union(&OptionalBoundingBox3d::new()), a);
        assert_eq!(OptionalBoundingBox3d::new().union(&a), a);
        let empty: OptionalBoundingBox3d<f32> = std::iter::empty::<Point3<f32>>().collect();
        assert!(empty.bounding_box().is_none());
    }

    #[test]
    fn center_and_radius() {
        let bbox = BoundingBox3d::from(Point3::new(-1.0_f32, -1.0, -1.0))
            .insert(Point3::new(1.0, 1.0, 1.0));
        assert_eq!(bbox.center(), Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(bbox.radius(), 3.0_f32.sqrt());
    }
}
