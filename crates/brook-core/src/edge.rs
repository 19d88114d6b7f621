//! Cartesian axes and the six axis-aligned edges of a box.

use std::fmt;

/// A cartesian axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// x axis (index 0).
    X,
    /// y axis (index 1).
    Y,
    /// z axis (index 2).
    Z,
}

impl Axis {
    /// Component index of this axis in `[x, y, z]` arrays.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// One of the six faces of an axis-aligned box.
///
/// Used both for rank-subdomain edges (sender/receiver layers) and for the
/// wall a boundary condition sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Edge {
    /// Low-x face.
    XMin,
    /// High-x face.
    XMax,
    /// Low-y face.
    YMin,
    /// High-y face.
    YMax,
    /// Low-z face.
    ZMin,
    /// High-z face.
    ZMax,
}

impl Edge {
    /// All six edges in canonical order.
    pub const ALL: [Edge; 6] = [
        Edge::XMin,
        Edge::XMax,
        Edge::YMin,
        Edge::YMax,
        Edge::ZMin,
        Edge::ZMax,
    ];

    /// The axis this edge is normal to.
    pub fn axis(self) -> Axis {
        match self {
            Self::XMin | Self::XMax => Axis::X,
            Self::YMin | Self::YMax => Axis::Y,
            Self::ZMin | Self::ZMax => Axis::Z,
        }
    }

    /// `true` for the high-coordinate face of the axis.
    pub fn is_max(self) -> bool {
        matches!(self, Self::XMax | Self::YMax | Self::ZMax)
    }

    /// Position in [`Edge::ALL`].
    pub fn index(self) -> usize {
        self.axis().index() * 2 + usize::from(self.is_max())
    }

    /// Unit normal pointing from this face into the box interior.
    pub fn inward_normal(self) -> [i32; 3] {
        let mut n = [0; 3];
        n[self.axis().index()] = if self.is_max() { -1 } else { 1 };
        n
    }

    /// The face on the other side of the box.
    pub fn opposite(self) -> Edge {
        Self::ALL[self.index() ^ 1]
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::XMin => "xMin",
            Self::XMax => "xMax",
            Self::YMin => "yMin",
            Self::YMax => "yMax",
            Self::ZMin => "zMin",
            Self::ZMax => "zMax",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_index_matches_canonical_order() {
        for (i, edge) in Edge::ALL.iter().enumerate() {
            assert_eq!(edge.index(), i);
        }
    }

    #[test]
    fn inward_normals_point_into_box() {
        assert_eq!(Edge::XMin.inward_normal(), [1, 0, 0]);
        assert_eq!(Edge::XMax.inward_normal(), [-1, 0, 0]);
        assert_eq!(Edge::ZMax.inward_normal(), [0, 0, -1]);
    }

    #[test]
    fn opposite_edge_swaps_min_and_max() {
        assert_eq!(Edge::XMin.opposite(), Edge::XMax);
        assert_eq!(Edge::YMax.opposite(), Edge::YMin);
        for edge in Edge::ALL {
            assert_eq!(edge.opposite().opposite(), edge);
            assert_eq!(edge.opposite().axis(), edge.axis());
        }
    }
}
