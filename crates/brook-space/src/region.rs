//! Physical boxes, rank subdomains and refined regions.

use brook_core::{Axis, Dimensionality, GridKey, Ijk};

/// An axis-aligned box in physical coordinates, `min` to `max`.
///
/// In 2D the z bounds are ignored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Lower corner.
    pub min: [f64; 3],
    /// Upper corner.
    pub max: [f64; 3],
}

impl BoundingBox {
    /// Box spanning `min` to `max`.
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Length of the box along `axis`.
    pub fn length(&self, axis: Axis) -> f64 {
        self.max[axis.index()] - self.min[axis.index()]
    }

    /// `true` if the box has positive length along every active axis.
    pub fn is_proper(&self, dims: Dimensionality) -> bool {
        dims.axes().iter().all(|&a| self.length(a) > 0.0)
    }

    /// Overlap with `other`, or `None` if the boxes do not overlap with
    /// positive volume over the active axes.
    pub fn intersection(&self, other: &BoundingBox, dims: Dimensionality) -> Option<BoundingBox> {
        let mut out = *self;
        for &axis in dims.axes() {
            let a = axis.index();
            out.min[a] = self.min[a].max(other.min[a]);
            out.max[a] = self.max[a].min(other.max[a]);
        }
        out.is_proper(dims).then_some(out)
    }
}

/// The part of one refinement level's domain this rank owns, excluding
/// halo layers.
///
/// `core` must align with the lattice of its level, i.e. both corners
/// lie on cell faces of spacing `dh0 / 2^level` measured from the domain
/// minimum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankSubdomain {
    /// Core box in physical coordinates.
    pub core: BoundingBox,
    /// Depth of the halo layer on every side, in cells of this level.
    pub halo_depth: usize,
}

impl RankSubdomain {
    /// Subdomain with the given core box and halo depth.
    pub fn new(core: BoundingBox, halo_depth: usize) -> Self {
        Self { core, halo_depth }
    }
}

/// A refined region: the patch of level `key.level` nested inside its
/// parent on level `key.level - 1`.
///
/// `min` and `max` are inclusive global cell indices on the parent level.
/// The refined grid therefore covers fine global indices
/// `2 * min ..= 2 * max + 1` on each active axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefinedRegion {
    /// Level (at least 1) and region number of the refined grid.
    pub key: GridKey,
    /// Lower corner, parent-level global indices.
    pub min: Ijk,
    /// Upper corner (inclusive), parent-level global indices.
    pub max: Ijk,
}

impl RefinedRegion {
    /// Region `key` spanning parent-level cells `min ..= max`.
    pub fn new(key: GridKey, min: Ijk, max: Ijk) -> Self {
        Self { key, min, max }
    }

    /// Inclusive bounds of the region in its own level's global indices.
    pub fn fine_bounds(&self) -> (Ijk, Ijk) {
        (self.min.map(|m| 2 * m), self.max.map(|m| 2 * m + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_overlapping_boxes() {
        let a = BoundingBox::new([0.0, 0.0, 0.0], [2.0, 2.0, 0.0]);
        let b = BoundingBox::new([1.0, -1.0, 0.0], [3.0, 1.5, 0.0]);
        let i = a.intersection(&b, Dimensionality::Two).unwrap();
        assert_eq!(i.min[..2], [1.0, 0.0]);
        assert_eq!(i.max[..2], [2.0, 1.5]);
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = BoundingBox::new([0.0; 3], [1.0; 3]);
        let b = BoundingBox::new([1.0, 0.0, 0.0], [2.0, 1.0, 1.0]);
        assert!(a.intersection(&b, Dimensionality::Three).is_none());
    }

    #[test]
    fn fine_bounds_double_the_parent_box() {
        let r = RefinedRegion::new(GridKey::new(1, 0), [2, 3, 0], [4, 5, 0]);
        assert_eq!(r.fine_bounds(), ([4, 6, 0], [9, 11, 1]));
    }
}
