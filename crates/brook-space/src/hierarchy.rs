//! Grid hierarchy: the tree of refined grids and coarse/fine index mapping.

use crate::error::GridError;
use crate::grid::Grid;
use brook_core::{Dimensionality, GridKey, Ijk};
use smallvec::SmallVec;

/// Global offsets of a coarse grid and a fine grid nested in it.
///
/// Both are global indices of local site `[0, 0, 0]` on their own level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelOrigins {
    /// Global offset of the coarse grid.
    pub coarse: Ijk,
    /// Global offset of the fine grid.
    pub fine: Ijk,
}

impl LevelOrigins {
    /// Offsets of `coarse` and its child `fine`.
    pub fn between(coarse: &Grid, fine: &Grid) -> Self {
        Self {
            coarse: coarse.global_offset(),
            fine: fine.global_offset(),
        }
    }
}

/// Local indices of the fine sites covering coarse site `coarse`.
///
/// Every coarse cell splits into `2^dims` fine cells. They are returned
/// with `i` varying slowest and `k` fastest, matching site order. The
/// indices are not checked against the fine grid's extent.
///
/// # Examples
///
/// ```
/// use brook_core::Dimensionality;
/// use brook_space::{fine_indices, LevelOrigins};
///
/// let origins = LevelOrigins { coarse: [0, 0, 0], fine: [4, 6, 0] };
/// let fine = fine_indices([3, 4, 0], origins, Dimensionality::Two);
/// assert_eq!(fine.as_slice(), &[[2, 2, 0], [2, 3, 0], [3, 2, 0], [3, 3, 0]]);
/// ```
pub fn fine_indices(coarse: Ijk, origins: LevelOrigins, dims: Dimensionality) -> SmallVec<[Ijk; 8]> {
    let base: Ijk =
        std::array::from_fn(|a| 2 * (coarse[a] + origins.coarse[a]) - origins.fine[a]);
    let nz = if dims == Dimensionality::Three { 2 } else { 1 };
    let mut out = SmallVec::new();
    for bi in 0..2 {
        for bj in 0..2 {
            for bk in 0..nz {
                let k = if dims == Dimensionality::Three { base[2] + bk } else { coarse[2] };
                out.push([base[0] + bi, base[1] + bj, k]);
            }
        }
    }
    out
}

/// Local index of the coarse site containing fine site `fine`.
///
/// Inverse of [`fine_indices`]; each of the `2^dims` children maps back to
/// the same parent. Negative global indices round toward minus infinity.
pub fn coarse_indices(fine: Ijk, origins: LevelOrigins, dims: Dimensionality) -> Ijk {
    let mut out = [0; 3];
    for axis in dims.axes() {
        let a = axis.index();
        out[a] = (fine[a] + origins.fine[a]).div_euclid(2) - origins.coarse[a];
    }
    if dims == Dimensionality::Two {
        out[2] = fine[2];
    }
    out
}

/// A grid and the refined grids nested directly inside it.
#[derive(Clone, Debug)]
struct GridNode {
    grid: Grid,
    children: Vec<GridNode>,
}

impl GridNode {
    fn new(grid: Grid) -> Self {
        Self {
            grid,
            children: Vec::new(),
        }
    }

    /// Depth-first search following region numbers downward.
    fn find(&self, key: GridKey) -> Option<&GridNode> {
        if self.grid.key() == key {
            return Some(self);
        }
        self.children
            .iter()
            .filter(|c| c.grid.region() == key.region && c.grid.level() <= key.level)
            .find_map(|c| c.find(key))
    }

    fn find_mut(&mut self, key: GridKey) -> Option<&mut GridNode> {
        if self.grid.key() == key {
            return Some(self);
        }
        for child in &mut self.children {
            if child.grid.region() == key.region && child.grid.level() <= key.level {
                if let Some(found) = child.find_mut(key) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Grid>) {
        out.push(&self.grid);
        for child in &self.children {
            child.collect(out);
        }
    }
}

/// The refinement tree held by one rank.
///
/// The root is the level-0 grid; every level-`L` grid of region `r` hangs
/// below the level-`L-1` grid of the same region (or the root when
/// `L == 1`).
///
/// # Examples
///
/// ```
/// use brook_core::{Dimensionality, GridKey, LatticeKind};
/// use brook_space::{Decomposition, GridHierarchy, RefinedRegion};
///
/// let decomp = Decomposition::builder(Dimensionality::Two, [8, 8, 1], 1.0)
///     .single_rank(1)
///     .refined_region(RefinedRegion::new(GridKey::new(1, 0), [2, 2, 0], [5, 5, 0]))
///     .build()
///     .unwrap();
/// let mut tree = GridHierarchy::new(decomp.build_grid(GridKey::ROOT, LatticeKind::D2Q9).unwrap())
///     .unwrap();
/// tree.insert(decomp.build_grid(GridKey::new(1, 0), LatticeKind::D2Q9).unwrap())
///     .unwrap();
///
/// assert_eq!(tree.grid(1, 0).unwrap().spacing(), 0.5);
/// assert_eq!(tree.grid(0, 7).unwrap().key(), GridKey::ROOT);
/// assert!(tree.grid(2, 0).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct GridHierarchy {
    root: GridNode,
}

impl GridHierarchy {
    /// Hierarchy consisting of the level-0 grid `root`.
    pub fn new(root: Grid) -> Result<Self, GridError> {
        if root.level() != 0 {
            return Err(GridError::NotRoot { key: root.key() });
        }
        Ok(Self {
            root: GridNode::new(root),
        })
    }

    /// Attach a refined grid below its parent.
    pub fn insert(&mut self, grid: Grid) -> Result<(), GridError> {
        let key = grid.key();
        if key.level == 0 || self.grid(key.level, key.region).is_some_and(|g| g.key() == key) {
            return Err(GridError::DuplicateGrid { key });
        }
        let parent_key = if key.level == 1 {
            GridKey::ROOT
        } else {
            GridKey::new(key.level - 1, key.region)
        };
        let parent = self
            .root
            .find_mut(parent_key)
            .ok_or(GridError::MissingParent { key })?;
        log::debug!("hierarchy: attached {key} below {parent_key}");
        parent.children.push(GridNode::new(grid));
        Ok(())
    }

    /// The grid at `(level, region)`.
    ///
    /// Level 0 always resolves to the root, whatever the region number.
    /// Returns `None` when no such grid is held on this rank.
    pub fn grid(&self, level: usize, region: usize) -> Option<&Grid> {
        if level == 0 {
            return Some(&self.root.grid);
        }
        self.root.find(GridKey::new(level, region)).map(|n| &n.grid)
    }

    /// Mutable access to the grid at `(level, region)`.
    pub fn grid_mut(&mut self, level: usize, region: usize) -> Option<&mut Grid> {
        if level == 0 {
            return Some(&mut self.root.grid);
        }
        self.root
            .find_mut(GridKey::new(level, region))
            .map(|n| &mut n.grid)
    }

    /// The level-0 grid.
    pub fn root(&self) -> &Grid {
        &self.root.grid
    }

    /// All grids, depth-first from the root.
    pub fn grids(&self) -> Vec<&Grid> {
        let mut out = Vec::new();
        self.root.collect(&mut out);
        out
    }

    /// Number of grids held.
    pub fn len(&self) -> usize {
        self.grids().len()
    }

    /// Always `false`; a hierarchy holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomposition::Decomposition;
    use crate::region::RefinedRegion;
    use brook_core::LatticeKind;
    use proptest::prelude::*;

    fn two_regions() -> (Decomposition, GridHierarchy) {
        let decomp = Decomposition::builder(Dimensionality::Two, [16, 16, 1], 1.0)
            .single_rank(1)
            .refined_region(RefinedRegion::new(GridKey::new(1, 0), [1, 1, 0], [6, 6, 0]))
            .refined_region(RefinedRegion::new(GridKey::new(1, 1), [9, 9, 0], [14, 14, 0]))
            .refined_region(RefinedRegion::new(GridKey::new(2, 1), [20, 20, 0], [25, 25, 0]))
            .build()
            .unwrap();
        let root = decomp.build_grid(GridKey::ROOT, LatticeKind::D2Q9).unwrap();
        let mut tree = GridHierarchy::new(root).unwrap();
        for key in [GridKey::new(1, 0), GridKey::new(1, 1), GridKey::new(2, 1)] {
            tree.insert(decomp.build_grid(key, LatticeKind::D2Q9).unwrap())
                .unwrap();
        }
        (decomp, tree)
    }

    #[test]
    fn lookup_follows_region_numbers() {
        let (_, tree) = two_regions();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.grid(2, 1).unwrap().key(), GridKey::new(2, 1));
        assert_eq!(tree.grid(1, 0).unwrap().key(), GridKey::new(1, 0));
        assert!(tree.grid(2, 0).is_none());
        assert!(tree.grid(1, 5).is_none());
        assert_eq!(tree.grid(0, 3).unwrap().key(), GridKey::ROOT);
    }

    #[test]
    fn grid_mut_reaches_nested_grids() {
        let (_, mut tree) = two_regions();
        tree.grid_mut(2, 1).unwrap().set_density(0, 2.0);
        assert_eq!(tree.grid(2, 1).unwrap().density(0), 2.0);
    }

    #[test]
    fn insert_rejects_orphans_and_duplicates() {
        let (decomp, mut tree) = two_regions();
        let dup = decomp.build_grid(GridKey::new(1, 0), LatticeKind::D2Q9).unwrap();
        assert_eq!(
            tree.insert(dup),
            Err(GridError::DuplicateGrid {
                key: GridKey::new(1, 0)
            })
        );
        let orphan = Grid::builder(LatticeKind::D2Q9, [4, 4, 1])
            .key(GridKey::new(2, 2))
            .build()
            .unwrap();
        assert_eq!(
            tree.insert(orphan),
            Err(GridError::MissingParent {
                key: GridKey::new(2, 2)
            })
        );
        let not_root = Grid::builder(LatticeKind::D2Q9, [4, 4, 1])
            .key(GridKey::new(1, 0))
            .build()
            .unwrap();
        assert!(matches!(GridHierarchy::new(not_root), Err(GridError::NotRoot { .. })));
    }

    #[test]
    fn fine_sites_sit_inside_their_coarse_parent() {
        let (_, tree) = two_regions();
        let coarse = tree.grid(0, 0).unwrap();
        let fine = tree.grid(1, 0).unwrap();
        let origins = LevelOrigins::between(coarse, fine);
        // Coarse global (3, 3) is local (4, 4) with halo offset -1.
        for f in fine_indices([4, 4, 0], origins, Dimensionality::Two) {
            let fs = fine.site(f).unwrap();
            let cs = coarse.site([4, 4, 0]).unwrap();
            let fx = fine.positions(brook_core::Axis::X)[f[0] as usize];
            let cx = coarse.positions(brook_core::Axis::X)[4];
            assert!((fx - cx).abs() < 0.5);
            assert!(fs < fine.site_count() && cs < coarse.site_count());
        }
    }

    #[test]
    fn three_d_children_come_in_eights() {
        let origins = LevelOrigins {
            coarse: [-1, -1, -1],
            fine: [3, 5, 7],
        };
        let fine = fine_indices([2, 3, 4], origins, Dimensionality::Three);
        assert_eq!(fine.len(), 8);
        assert_eq!(fine[0], [-1, -1, -1]);
        assert_eq!(fine[7], [0, 0, 0]);
    }

    proptest! {
        #[test]
        fn coarse_indices_invert_fine_indices(
            c in prop::array::uniform3(-20i32..20),
            oc in prop::array::uniform3(-5i32..5),
            of in prop::array::uniform3(-10i32..10),
            three in any::<bool>(),
        ) {
            let dims = if three { Dimensionality::Three } else { Dimensionality::Two };
            let c = if three { c } else { [c[0], c[1], 0] };
            let origins = LevelOrigins { coarse: oc, fine: of };
            let children = fine_indices(c, origins, dims);
            prop_assert_eq!(children.len(), 1 << dims.count());
            for f in children {
                prop_assert_eq!(coarse_indices(f, origins, dims), c);
            }
        }
    }
}
