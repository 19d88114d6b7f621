//! Strongly-typed identifiers and the [`Ijk`] type alias.

use crate::edge::{Axis, Edge};
use std::fmt;

/// Integer lattice indices `(i, j, k)` of a site.
///
/// Signed so that positions left of a grid's local origin (halo lookups,
/// coarse/fine mapping across origins) stay representable. In 2D the `k`
/// component is always `0`.
pub type Ijk = [i32; 3];

/// Number of spatial dimensions of a grid.
///
/// Fixed when a grid is constructed and never changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimensionality {
    /// Planar problem; the z axis is collapsed to a single site.
    Two,
    /// Full three-dimensional problem.
    Three,
}

impl Dimensionality {
    /// Number of active axes (2 or 3).
    pub fn count(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Active axes in x, y, z order.
    pub fn axes(self) -> &'static [Axis] {
        match self {
            Self::Two => &[Axis::X, Axis::Y],
            Self::Three => &[Axis::X, Axis::Y, Axis::Z],
        }
    }

    /// Active edges (faces) in `xMin, xMax, yMin, ...` order.
    pub fn edges(self) -> &'static [Edge] {
        match self {
            Self::Two => &Edge::ALL[..4],
            Self::Three => &Edge::ALL,
        }
    }

    /// Number of neighbouring ranks in a full cartesian stencil (8 or 26).
    pub fn neighbour_count(self) -> usize {
        match self {
            Self::Two => 8,
            Self::Three => 26,
        }
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.count())
    }
}

/// Identifies one grid in the refinement hierarchy.
///
/// Level 0 is the coarse background grid. Every refined region keeps its
/// region number on all the levels nested inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey {
    /// Refinement level (0 = coarsest).
    pub level: usize,
    /// Region number within the level.
    pub region: usize,
}

impl GridKey {
    /// The coarse background grid.
    pub const ROOT: GridKey = GridKey {
        level: 0,
        region: 0,
    };

    /// Create a key for `(level, region)`.
    pub fn new(level: usize, region: usize) -> Self {
        Self { level, region }
    }
}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}R{}", self.level, self.region)
    }
}

impl From<(usize, usize)> for GridKey {
    fn from((level, region): (usize, usize)) -> Self {
        Self { level, region }
    }
}
