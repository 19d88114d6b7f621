//! Per-grid storage: geometry, site labels and macroscopic/population fields.

use crate::error::GridError;
use crate::util::cell_centres;
use brook_core::{
    Axis, Dimensionality, DirectionSet, Equilibrium, GridKey, Ijk, LatticeKind,
    SecondOrderEquilibrium, SiteLabel,
};

/// One rectangular grid of the refinement hierarchy, as stored on this rank.
///
/// Sites are numbered `(i * ny + j) * nz + k`, so a plain loop over site
/// numbers visits `i`, then `j`, then `k` in ascending order. In 2D `nz`
/// is `1` and `k` is always `0`. Populations are stored site-major:
/// direction `v` of site `s` lives at `s * q + v`. Velocity is stored
/// with one component per active axis.
///
/// `origin` is the lower face of local cell `0` on each axis, and the
/// position arrays hold cell centres `origin + (i + 0.5) * dh`.
#[derive(Clone, Debug)]
pub struct Grid {
    key: GridKey,
    lattice: DirectionSet,
    extent: [usize; 3],
    spacing: f64,
    origin: [f64; 3],
    global_offset: Ijk,
    positions: [Vec<f64>; 3],
    labels: Vec<SiteLabel>,
    f: Vec<f64>,
    rho: Vec<f64>,
    u: Vec<f64>,
}

/// Builder for [`Grid`].
///
/// Every site starts as [`SiteLabel::Fluid`] with equilibrium populations
/// at unit density and rest, unless overridden.
///
/// # Examples
///
/// ```
/// use brook_core::{LatticeKind, SiteLabel};
/// use brook_space::Grid;
///
/// let grid = Grid::builder(LatticeKind::D2Q9, [8, 4, 1])
///     .spacing(0.1)
///     .origin([0.0, 0.0, 0.0])
///     .build()
///     .unwrap();
/// assert_eq!(grid.site_count(), 32);
/// assert_eq!(grid.label(0), SiteLabel::Fluid);
/// assert!((grid.density(5) - 1.0).abs() < 1e-15);
/// ```
#[derive(Clone, Debug)]
pub struct GridBuilder {
    lattice: LatticeKind,
    extent: [usize; 3],
    key: GridKey,
    spacing: f64,
    origin: [f64; 3],
    global_offset: Ijk,
    labels: Option<Vec<SiteLabel>>,
    density: f64,
    velocity: [f64; 3],
}

impl GridBuilder {
    /// Refinement level and region of the grid (default [`GridKey::ROOT`]).
    pub fn key(mut self, key: GridKey) -> Self {
        self.key = key;
        self
    }

    /// Lattice spacing `dh` (default `1.0`).
    pub fn spacing(mut self, dh: f64) -> Self {
        self.spacing = dh;
        self
    }

    /// Lower face of local cell `0` (default the origin).
    pub fn origin(mut self, origin: [f64; 3]) -> Self {
        self.origin = origin;
        self
    }

    /// Global index of local site `[0, 0, 0]` on this grid's level.
    pub fn global_offset(mut self, offset: Ijk) -> Self {
        self.global_offset = offset;
        self
    }

    /// One label per site, in site order.
    pub fn labels(mut self, labels: Vec<SiteLabel>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Uniform initial density and velocity; populations start at the
    /// matching second-order equilibrium.
    pub fn initial_state(mut self, density: f64, velocity: [f64; 3]) -> Self {
        self.density = density;
        self.velocity = velocity;
        self
    }

    /// Validate and allocate the grid.
    pub fn build(self) -> Result<Grid, GridError> {
        let dims = self.lattice.dims();
        let lattice = DirectionSet::new(self.lattice);

        for &axis in dims.axes() {
            let n = self.extent[axis.index()];
            if n == 0 {
                return Err(GridError::EmptyGrid);
            }
            if n > i32::MAX as usize {
                return Err(GridError::DimensionTooLarge { axis, value: n });
            }
        }
        if dims == Dimensionality::Two && self.extent[2] != 1 {
            return Err(GridError::FlatAxisRequired {
                value: self.extent[2],
            });
        }
        if self.extent[2] == 0 {
            return Err(GridError::EmptyGrid);
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(GridError::InvalidSpacing {
                value: self.spacing,
            });
        }

        let sites: usize = self.extent.iter().product();
        let labels = match self.labels {
            Some(labels) if labels.len() != sites => {
                return Err(GridError::LabelCountMismatch {
                    expected: sites,
                    actual: labels.len(),
                });
            }
            Some(labels) => labels,
            None => vec![SiteLabel::Fluid; sites],
        };

        let mut velocity = self.velocity;
        if dims == Dimensionality::Two {
            velocity[2] = 0.0;
        }
        let q = lattice.q();
        let feq: Vec<f64> = (0..q)
            .map(|v| SecondOrderEquilibrium.evaluate(&lattice, v, self.density, velocity))
            .collect();
        let f = feq.repeat(sites);
        let d = dims.count();
        let u = velocity[..d].repeat(sites);

        let positions = [Axis::X, Axis::Y, Axis::Z].map(|axis| {
            let a = axis.index();
            cell_centres(self.origin[a], self.spacing, self.extent[a])
        });

        Ok(Grid {
            key: self.key,
            lattice,
            extent: self.extent,
            spacing: self.spacing,
            origin: self.origin,
            global_offset: self.global_offset,
            positions,
            labels,
            f,
            rho: vec![self.density; sites],
            u,
        })
    }
}

impl Grid {
    /// Start building a grid of `extent` sites on the `lattice` velocity set.
    ///
    /// For 2D sets `extent[2]` must be `1`.
    pub fn builder(lattice: LatticeKind, extent: [usize; 3]) -> GridBuilder {
        GridBuilder {
            lattice,
            extent,
            key: GridKey::ROOT,
            spacing: 1.0,
            origin: [0.0; 3],
            global_offset: [0; 3],
            labels: None,
            density: 1.0,
            velocity: [0.0; 3],
        }
    }

    /// Level and region of this grid.
    pub fn key(&self) -> GridKey {
        self.key
    }

    /// Refinement level.
    pub fn level(&self) -> usize {
        self.key.level
    }

    /// Region number.
    pub fn region(&self) -> usize {
        self.key.region
    }

    /// The velocity set.
    pub fn lattice(&self) -> &DirectionSet {
        &self.lattice
    }

    /// Dimensionality of the grid.
    pub fn dims(&self) -> Dimensionality {
        self.lattice.dims()
    }

    /// Number of sites along each axis (`extent[2] == 1` in 2D).
    pub fn extent(&self) -> [usize; 3] {
        self.extent
    }

    /// Total number of sites.
    pub fn site_count(&self) -> usize {
        self.labels.len()
    }

    /// Lattice spacing `dh`.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Lower face of local cell `0`.
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    /// Global index of local site `[0, 0, 0]`.
    pub fn global_offset(&self) -> Ijk {
        self.global_offset
    }

    /// Cell-centre coordinates along `axis`.
    pub fn positions(&self, axis: Axis) -> &[f64] {
        &self.positions[axis.index()]
    }

    /// Global indices of local site `ijk`.
    pub fn to_global(&self, ijk: Ijk) -> Ijk {
        [
            ijk[0] + self.global_offset[0],
            ijk[1] + self.global_offset[1],
            ijk[2] + self.global_offset[2],
        ]
    }

    /// `true` if `ijk` addresses a site of this grid.
    pub fn contains(&self, ijk: Ijk) -> bool {
        ijk.iter()
            .zip(self.extent)
            .all(|(&i, n)| i >= 0 && (i as usize) < n)
    }

    /// Site number of `ijk`, or `None` if it is off the grid.
    #[inline]
    pub fn site(&self, ijk: Ijk) -> Option<usize> {
        if !self.contains(ijk) {
            return None;
        }
        let [_, ny, nz] = self.extent;
        Some((ijk[0] as usize * ny + ijk[1] as usize) * nz + ijk[2] as usize)
    }

    /// Indices of site number `site`.
    pub fn ijk(&self, site: usize) -> Ijk {
        let [_, ny, nz] = self.extent;
        let k = site % nz;
        let j = (site / nz) % ny;
        let i = site / (nz * ny);
        [i as i32, j as i32, k as i32]
    }

    /// Label of site number `site`.
    #[inline]
    pub fn label(&self, site: usize) -> SiteLabel {
        self.labels[site]
    }

    /// Label at `ijk`, or `None` if it is off the grid.
    pub fn label_at(&self, ijk: Ijk) -> Option<SiteLabel> {
        self.site(ijk).map(|s| self.labels[s])
    }

    /// All labels in site order.
    pub fn labels(&self) -> &[SiteLabel] {
        &self.labels
    }

    /// Relabel the site at `ijk`.
    pub fn set_label(&mut self, ijk: Ijk, label: SiteLabel) -> Result<(), GridError> {
        let site = self.site(ijk).ok_or(GridError::CoordOutOfBounds { ijk })?;
        self.labels[site] = label;
        Ok(())
    }

    /// Population `v` of site number `site`.
    #[inline]
    pub fn f(&self, site: usize, v: usize) -> f64 {
        self.f[site * self.lattice.q() + v]
    }

    /// Overwrite population `v` of site number `site`.
    #[inline]
    pub fn set_f(&mut self, site: usize, v: usize, value: f64) {
        let q = self.lattice.q();
        self.f[site * q + v] = value;
    }

    /// All `q` populations of a site.
    pub fn populations(&self, site: usize) -> &[f64] {
        let q = self.lattice.q();
        &self.f[site * q..(site + 1) * q]
    }

    /// Mutable view of all `q` populations of a site.
    pub fn populations_mut(&mut self, site: usize) -> &mut [f64] {
        let q = self.lattice.q();
        &mut self.f[site * q..(site + 1) * q]
    }

    /// Stored macroscopic density of a site.
    pub fn density(&self, site: usize) -> f64 {
        self.rho[site]
    }

    /// Overwrite the stored density of a site.
    pub fn set_density(&mut self, site: usize, rho: f64) {
        self.rho[site] = rho;
    }

    /// Stored velocity of a site, one component per active axis.
    pub fn velocity(&self, site: usize) -> &[f64] {
        let d = self.dims().count();
        &self.u[site * d..(site + 1) * d]
    }

    /// Mutable view of the stored velocity of a site.
    pub fn velocity_mut(&mut self, site: usize) -> &mut [f64] {
        let d = self.dims().count();
        &mut self.u[site * d..(site + 1) * d]
    }
}
