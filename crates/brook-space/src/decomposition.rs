//! Rank decomposition: this rank's subdomain on every level, the refined
//! regions of the hierarchy and the global domain they sit in.
//!
//! A [`Decomposition`] is the context every geometric classification query
//! reads. It is assembled once through [`DecompositionBuilder`], validated
//! at [`build()`](DecompositionBuilder::build), and immutable afterwards.

use crate::error::{DecompositionError, GridError};
use crate::grid::{Grid, GridBuilder};
use crate::region::{BoundingBox, RankSubdomain, RefinedRegion};
use brook_core::{Axis, Dimensionality, GridKey, Ijk, LatticeKind, SetupError};

/// Relative tolerance for checking that a subdomain corner sits on a cell face.
const ALIGN_TOL: f64 = 1e-8;

/// Geometry context shared by all grids on this rank.
///
/// Global cell indices on level `L` count cells of spacing `dh0 / 2^L`
/// from `domain_min`; the global domain spans `global_cells * 2^L` cells
/// along each active axis.
#[derive(Clone, Debug)]
pub struct Decomposition {
    dims: Dimensionality,
    domain_min: [f64; 3],
    coarse_spacing: f64,
    global_cells: [usize; 3],
    periodic: [bool; 3],
    subdomains: Vec<RankSubdomain>,
    regions: Vec<RefinedRegion>,
    transition_width: usize,
}

/// Builder for [`Decomposition`].
///
/// # Examples
///
/// ```
/// use brook_core::{Axis, Dimensionality, GridKey, LatticeKind};
/// use brook_space::{Decomposition, RefinedRegion};
///
/// let decomp = Decomposition::builder(Dimensionality::Two, [16, 8, 1], 0.25)
///     .periodic(Axis::Y, true)
///     .single_rank(1)
///     .refined_region(RefinedRegion::new(GridKey::new(1, 0), [4, 2, 0], [7, 5, 0]))
///     .build()
///     .unwrap();
/// assert_eq!(decomp.spacing(1), 0.125);
///
/// let fine = decomp.build_grid(GridKey::new(1, 0), LatticeKind::D2Q9).unwrap();
/// assert_eq!(fine.extent(), [10, 10, 1]);
/// assert_eq!(fine.global_offset(), [7, 3, 0]);
/// ```
#[derive(Clone, Debug)]
pub struct DecompositionBuilder {
    dims: Dimensionality,
    domain_min: [f64; 3],
    coarse_spacing: f64,
    global_cells: [usize; 3],
    periodic: [bool; 3],
    subdomains: Vec<(usize, RankSubdomain)>,
    single_rank_halo: Option<usize>,
    regions: Vec<RefinedRegion>,
    transition_width: usize,
}

impl DecompositionBuilder {
    /// Physical position of the global domain's lower corner (default origin).
    pub fn domain_min(mut self, min: [f64; 3]) -> Self {
        self.domain_min = min;
        self
    }

    /// Mark `axis` periodic (default: no axis is periodic).
    pub fn periodic(mut self, axis: Axis, periodic: bool) -> Self {
        self.periodic[axis.index()] = periodic;
        self
    }

    /// Declare this rank's subdomain on `level`.
    pub fn subdomain(mut self, level: usize, subdomain: RankSubdomain) -> Self {
        self.subdomains.push((level, subdomain));
        self
    }

    /// Give this rank the whole domain on every level that has no explicit
    /// subdomain, with `halo_depth` halo cells on every side.
    pub fn single_rank(mut self, halo_depth: usize) -> Self {
        self.single_rank_halo = Some(halo_depth);
        self
    }

    /// Declare a refined region.
    pub fn refined_region(mut self, region: RefinedRegion) -> Self {
        self.regions.push(region);
        self
    }

    /// Width of the transition layer in parent-level cells (default `1`).
    pub fn transition_width(mut self, width: usize) -> Self {
        self.transition_width = width;
        self
    }

    /// Validate and freeze the decomposition.
    pub fn build(self) -> Result<Decomposition, DecompositionError> {
        let dims = self.dims;

        // 1. Spacing must be finite and positive.
        if !self.coarse_spacing.is_finite() || self.coarse_spacing <= 0.0 {
            return Err(DecompositionError::InvalidSpacing {
                value: self.coarse_spacing,
            });
        }
        // 2. Domain must be non-empty; 2D collapses z to one cell.
        let mut global_cells = self.global_cells;
        if dims.axes().iter().any(|a| global_cells[a.index()] == 0) {
            return Err(DecompositionError::EmptyDomain);
        }
        let mut periodic = self.periodic;
        if dims == Dimensionality::Two {
            if global_cells[2] != 1 {
                log::warn!(
                    "2D decomposition given {} cells along z; using 1",
                    global_cells[2]
                );
            }
            global_cells[2] = 1;
            periodic[2] = false;
        }

        let finest_region = self.regions.iter().map(|r| r.key.level).max().unwrap_or(0);
        let finest_declared = self.subdomains.iter().map(|&(l, _)| l).max().unwrap_or(0);
        let level_count = finest_region.max(finest_declared) + 1;

        // 3. One subdomain per level, contiguous from level 0.
        let mut slots: Vec<Option<RankSubdomain>> = vec![None; level_count];
        for &(level, sub) in &self.subdomains {
            if slots[level].replace(sub).is_some() {
                return Err(DecompositionError::InvalidSubdomain {
                    level,
                    reason: "declared twice".into(),
                });
            }
        }
        let mut subdomains = Vec::with_capacity(level_count);
        for (level, slot) in slots.into_iter().enumerate() {
            let sub = match (slot, self.single_rank_halo) {
                (Some(sub), _) => sub,
                (None, Some(halo_depth)) => RankSubdomain::new(
                    domain_box(dims, self.domain_min, self.coarse_spacing, global_cells),
                    halo_depth,
                ),
                (None, None) => return Err(DecompositionError::MissingSubdomain { level }),
            };
            subdomains.push(sub);
        }

        let decomp = Decomposition {
            dims,
            domain_min: self.domain_min,
            coarse_spacing: self.coarse_spacing,
            global_cells,
            periodic,
            subdomains,
            regions: self.regions,
            transition_width: self.transition_width,
        };

        // 4. Subdomain cores are non-empty, aligned and inside the domain.
        for (level, sub) in decomp.subdomains.iter().enumerate() {
            decomp.check_subdomain(level, sub)?;
        }
        // 5. Regions are unique, in bounds and nested in their parents.
        for (n, region) in decomp.regions.iter().enumerate() {
            if decomp.regions[..n].iter().any(|r| r.key == region.key) {
                return Err(DecompositionError::DuplicateRegion { key: region.key });
            }
            decomp.check_region(region)?;
        }

        log::debug!(
            "decomposition {}: {} levels, {} refined regions, dh0 = {}, cells = {:?}",
            dims,
            decomp.subdomains.len(),
            decomp.regions.len(),
            decomp.coarse_spacing,
            &decomp.global_cells[..dims.count()]
        );
        Ok(decomp)
    }
}

fn domain_box(
    dims: Dimensionality,
    domain_min: [f64; 3],
    dh0: f64,
    global_cells: [usize; 3],
) -> BoundingBox {
    let mut max = domain_min;
    for &axis in dims.axes() {
        let a = axis.index();
        max[a] = domain_min[a] + global_cells[a] as f64 * dh0;
    }
    BoundingBox::new(domain_min, max)
}

impl Decomposition {
    /// Start describing a domain of `global_cells` coarse cells of spacing
    /// `coarse_spacing`.
    pub fn builder(
        dims: Dimensionality,
        global_cells: [usize; 3],
        coarse_spacing: f64,
    ) -> DecompositionBuilder {
        DecompositionBuilder {
            dims,
            domain_min: [0.0; 3],
            coarse_spacing,
            global_cells,
            periodic: [false; 3],
            subdomains: Vec::new(),
            single_rank_halo: None,
            regions: Vec::new(),
            transition_width: 1,
        }
    }

    /// Dimensionality of every grid in the decomposition.
    pub fn dims(&self) -> Dimensionality {
        self.dims
    }

    /// Lower corner of the global domain.
    pub fn domain_min(&self) -> [f64; 3] {
        self.domain_min
    }

    /// Level-0 spacing `dh0`.
    pub fn coarse_spacing(&self) -> f64 {
        self.coarse_spacing
    }

    /// Spacing of `level`: `dh0 / 2^level`.
    pub fn spacing(&self, level: usize) -> f64 {
        self.coarse_spacing * 0.5f64.powi(level as i32)
    }

    /// Number of global cells along each axis on `level` (z stays 1 in 2D).
    pub fn global_cells(&self, level: usize) -> [usize; 3] {
        let mut cells = self.global_cells;
        for &axis in self.dims.axes() {
            cells[axis.index()] <<= level;
        }
        cells
    }

    /// Physical extent of the global domain.
    pub fn domain(&self) -> BoundingBox {
        domain_box(
            self.dims,
            self.domain_min,
            self.coarse_spacing,
            self.global_cells,
        )
    }

    /// `true` if the domain wraps around along `axis`.
    pub fn is_periodic(&self, axis: Axis) -> bool {
        self.periodic[axis.index()]
    }

    /// Number of levels this rank holds a subdomain on.
    pub fn level_count(&self) -> usize {
        self.subdomains.len()
    }

    /// This rank's subdomain on `level`.
    pub fn subdomain(&self, level: usize) -> Option<&RankSubdomain> {
        self.subdomains.get(level)
    }

    /// Halo depth on `level`, `0` if the rank has no subdomain there.
    pub fn halo_depth(&self, level: usize) -> usize {
        self.subdomain(level).map_or(0, |s| s.halo_depth)
    }

    /// Width of the transition layer in parent-level cells.
    pub fn transition_width(&self) -> usize {
        self.transition_width
    }

    /// All declared refined regions.
    pub fn refined_regions(&self) -> &[RefinedRegion] {
        &self.regions
    }

    /// The refined region `(level, region)`, if declared.
    pub fn refined_region(&self, level: usize, region: usize) -> Option<&RefinedRegion> {
        let key = GridKey::new(level, region);
        self.regions.iter().find(|r| r.key == key)
    }

    /// Inclusive global cell indices of this rank's core on `level`.
    pub fn core_cells(&self, level: usize) -> Option<(Ijk, Ijk)> {
        let sub = self.subdomain(level)?;
        let dh = self.spacing(level);
        let mut lo = [0; 3];
        let mut hi = [0; 3];
        for &axis in self.dims.axes() {
            let a = axis.index();
            lo[a] = ((sub.core.min[a] - self.domain_min[a]) / dh).round() as i32;
            hi[a] = ((sub.core.max[a] - self.domain_min[a]) / dh).round() as i32 - 1;
        }
        Some((lo, hi))
    }

    /// Builder for the local grid `key` with its halo, positioned and
    /// offset according to this decomposition.
    ///
    /// Level-0 grids cover the rank's core. Refined grids cover the part
    /// of the rank's core on their level that lies inside the region.
    pub fn grid_builder(&self, key: GridKey, lattice: LatticeKind) -> Result<GridBuilder, GridError> {
        if lattice.dims() != self.dims {
            return Err(SetupError::LatticeMismatch {
                lattice,
                dims: self.dims,
            }
            .into());
        }
        let (mut lo, mut hi) = self
            .core_cells(key.level)
            .ok_or(GridError::UnknownLevel { level: key.level })?;
        if key.level == 0 {
            if key.region != 0 {
                return Err(GridError::UnknownRegion { key });
            }
        } else {
            let region = self
                .refined_region(key.level, key.region)
                .ok_or(GridError::UnknownRegion { key })?;
            let (flo, fhi) = region.fine_bounds();
            for &axis in self.dims.axes() {
                let a = axis.index();
                lo[a] = lo[a].max(flo[a]);
                hi[a] = hi[a].min(fhi[a]);
                if lo[a] > hi[a] {
                    return Err(GridError::EmptyGrid);
                }
            }
        }

        let dh = self.spacing(key.level);
        let h = self.halo_depth(key.level) as i32;
        let mut extent = [1usize; 3];
        let mut offset = [0i32; 3];
        let mut origin = self.domain_min;
        for &axis in self.dims.axes() {
            let a = axis.index();
            extent[a] = (hi[a] - lo[a] + 1 + 2 * h) as usize;
            offset[a] = lo[a] - h;
            origin[a] = self.domain_min[a] + f64::from(offset[a]) * dh;
        }
        log::debug!(
            "grid {key}: extent {:?}, global offset {:?}, dh = {dh}",
            &extent[..self.dims.count()],
            &offset[..self.dims.count()]
        );
        Ok(Grid::builder(lattice, extent)
            .key(key)
            .spacing(dh)
            .origin(origin)
            .global_offset(offset))
    }

    /// Allocate the local grid `key` with every site fluid and at rest.
    pub fn build_grid(&self, key: GridKey, lattice: LatticeKind) -> Result<Grid, GridError> {
        self.grid_builder(key, lattice)?.build()
    }

    fn check_subdomain(&self, level: usize, sub: &RankSubdomain) -> Result<(), DecompositionError> {
        let invalid = |reason: String| DecompositionError::InvalidSubdomain { level, reason };
        if !sub.core.is_proper(self.dims) {
            return Err(invalid("core box is empty".into()));
        }
        let dh = self.spacing(level);
        let cells = self.global_cells(level);
        for &axis in self.dims.axes() {
            let a = axis.index();
            for corner in [sub.core.min[a], sub.core.max[a]] {
                let t = (corner - self.domain_min[a]) / dh;
                if !t.is_finite() || (t - t.round()).abs() > ALIGN_TOL * t.abs().max(1.0) {
                    return Err(invalid(format!(
                        "{axis:?} bound {corner} is not on a level-{level} cell face"
                    )));
                }
                if t.round() < 0.0 || t.round() > cells[a] as f64 {
                    return Err(invalid(format!(
                        "{axis:?} bound {corner} is outside the domain"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_region(&self, region: &RefinedRegion) -> Result<(), DecompositionError> {
        let key = region.key;
        let invalid = |reason: String| DecompositionError::InvalidRegion { key, reason };
        if key.level == 0 {
            return Err(invalid("level 0 is the background grid".into()));
        }
        let parent_cells = self.global_cells(key.level - 1);
        for &axis in self.dims.axes() {
            let a = axis.index();
            if region.min[a] > region.max[a] {
                return Err(invalid(format!("{axis:?} bounds are inverted")));
            }
            if region.min[a] < 0 || region.max[a] as usize >= parent_cells[a] {
                return Err(invalid(format!("{axis:?} bounds leave the domain")));
            }
        }
        if key.level >= 2 {
            let parent = self
                .refined_region(key.level - 1, key.region)
                .ok_or_else(|| invalid("no parent region on the level below".into()))?;
            let (plo, phi) = parent.fine_bounds();
            for &axis in self.dims.axes() {
                let a = axis.index();
                if region.min[a] < plo[a] || region.max[a] > phi[a] {
                    return Err(invalid(format!("{axis:?} bounds leave the parent region")));
                }
            }
        }

        let overlaps_rank = self.core_cells(key.level - 1).is_some_and(|(lo, hi)| {
            self.dims.axes().iter().all(|axis| {
                let a = axis.index();
                region.min[a] <= hi[a] && region.max[a] >= lo[a]
            })
        });
        if !overlaps_rank {
            log::warn!("refined region {key} does not overlap this rank's core");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> DecompositionBuilder {
        Decomposition::builder(Dimensionality::Two, [20, 10, 1], 0.1)
    }

    #[test]
    fn single_rank_covers_domain() {
        let d = channel().single_rank(2).build().unwrap();
        assert_eq!(d.level_count(), 1);
        assert_eq!(d.core_cells(0), Some(([0, 0, 0], [19, 9, 0])));
        let g = d.build_grid(GridKey::ROOT, LatticeKind::D2Q9).unwrap();
        assert_eq!(g.extent(), [24, 14, 1]);
        assert_eq!(g.global_offset(), [-2, -2, 0]);
        assert!((g.origin()[0] + 0.2).abs() < 1e-12);
    }

    #[test]
    fn spacing_halves_per_level() {
        let d = channel().single_rank(1).build().unwrap();
        assert_eq!(d.spacing(0), 0.1);
        assert_eq!(d.spacing(2), 0.025);
        assert_eq!(d.global_cells(2), [80, 40, 1]);
    }

    #[test]
    fn explicit_subdomain_sets_offset() {
        let core = BoundingBox::new([1.0, 0.0, 0.0], [2.0, 1.0, 0.0]);
        let d = channel()
            .subdomain(0, RankSubdomain::new(core, 1))
            .build()
            .unwrap();
        assert_eq!(d.core_cells(0), Some(([10, 0, 0], [19, 9, 0])));
        let g = d.build_grid(GridKey::ROOT, LatticeKind::D2Q9).unwrap();
        assert_eq!(g.global_offset(), [9, -1, 0]);
        assert_eq!(g.extent(), [12, 12, 1]);
    }

    #[test]
    fn refined_grid_clips_to_region() {
        let d = channel()
            .single_rank(1)
            .refined_region(RefinedRegion::new(GridKey::new(1, 0), [4, 2, 0], [9, 7, 0]))
            .build()
            .unwrap();
        assert_eq!(d.level_count(), 2);
        let g = d.build_grid(GridKey::new(1, 0), LatticeKind::D2Q9).unwrap();
        assert_eq!(g.global_offset(), [7, 3, 0]);
        assert_eq!(g.extent(), [14, 14, 1]);
        assert_eq!(g.spacing(), 0.05);
    }

    #[test]
    fn rejects_bad_spacing_and_empty_domain() {
        assert!(matches!(
            Decomposition::builder(Dimensionality::Three, [4, 4, 4], f64::NAN).build(),
            Err(DecompositionError::InvalidSpacing { .. })
        ));
        assert_eq!(
            Decomposition::builder(Dimensionality::Three, [4, 0, 4], 1.0)
                .single_rank(1)
                .build()
                .unwrap_err(),
            DecompositionError::EmptyDomain
        );
    }

    #[test]
    fn missing_level_subdomain_is_reported() {
        let core = BoundingBox::new([0.0; 3], [2.0, 1.0, 0.0]);
        let err = channel()
            .subdomain(0, RankSubdomain::new(core, 1))
            .refined_region(RefinedRegion::new(GridKey::new(1, 0), [0, 0, 0], [1, 1, 0]))
            .build()
            .unwrap_err();
        assert_eq!(err, DecompositionError::MissingSubdomain { level: 1 });
    }

    #[test]
    fn misaligned_subdomain_is_rejected() {
        let core = BoundingBox::new([0.05, 0.0, 0.0], [1.0, 1.0, 0.0]);
        let err = channel()
            .subdomain(0, RankSubdomain::new(core, 1))
            .build()
            .unwrap_err();
        assert!(matches!(err, DecompositionError::InvalidSubdomain { level: 0, .. }));
    }

    #[test]
    fn region_checks() {
        let out_of_bounds = channel()
            .single_rank(1)
            .refined_region(RefinedRegion::new(GridKey::new(1, 0), [15, 0, 0], [20, 3, 0]))
            .build();
        assert!(matches!(out_of_bounds, Err(DecompositionError::InvalidRegion { .. })));

        let orphan = channel()
            .single_rank(1)
            .refined_region(RefinedRegion::new(GridKey::new(2, 0), [0, 0, 0], [3, 3, 0]))
            .build();
        assert!(matches!(orphan, Err(DecompositionError::InvalidRegion { .. })));

        let r = RefinedRegion::new(GridKey::new(1, 0), [0, 0, 0], [3, 3, 0]);
        let twice = channel()
            .single_rank(1)
            .refined_region(r)
            .refined_region(r)
            .build();
        assert_eq!(
            twice.unwrap_err(),
            DecompositionError::DuplicateRegion {
                key: GridKey::new(1, 0)
            }
        );
    }

    #[test]
    fn grid_builder_checks_lattice_and_keys() {
        let d = channel().single_rank(1).build().unwrap();
        assert!(matches!(
            d.build_grid(GridKey::ROOT, LatticeKind::D3Q19),
            Err(GridError::Setup(_))
        ));
        assert_eq!(
            d.build_grid(GridKey::new(1, 0), LatticeKind::D2Q9).unwrap_err(),
            GridError::UnknownLevel { level: 1 }
        );
    }

    #[test]
    fn shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Decomposition>();
        assert_send_sync::<Grid>();
    }
}
