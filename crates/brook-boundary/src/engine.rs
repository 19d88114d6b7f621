//! The per-step boundary sweep.

use crate::config::{BoundaryConfig, ConfigError, InletScheme};
use crate::request::BoundaryRequest;
use crate::{inlet, outlet, solid};
use brook_core::{DirectionSet, Equilibrium, LatticeKind, SecondOrderEquilibrium, SiteLabel};
use brook_space::Grid;
use std::fmt;

/// Number of sites each boundary kind reconstructed in one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepCounts {
    /// Solid sites bounced back.
    pub solid: usize,
    /// Inlet sites reconstructed.
    pub inlet: usize,
    /// Outlet sites extrapolated.
    pub outlet: usize,
    /// Outlet sites skipped for lack of upstream sites.
    pub outlet_skipped: usize,
}

/// Reconstructs unknown populations at labelled sites after streaming.
///
/// Built once per velocity set from a validated [`BoundaryConfig`]. The
/// engine holds no per-grid state, so one instance serves every grid of
/// the matching velocity set.
///
/// # Examples
///
/// ```
/// use brook_boundary::{BoundaryConfig, BoundaryEngine, BoundaryRequest, InletConfig, OutletConfig};
/// use brook_core::{LatticeKind, SiteLabel};
/// use brook_space::Grid;
///
/// let config = BoundaryConfig {
///     inlet: Some(InletConfig { velocity: [0.05, 0.0, 0.0], ..Default::default() }),
///     outlet: Some(OutletConfig::default()),
/// };
/// let engine = BoundaryEngine::new(config, LatticeKind::D2Q9).unwrap();
///
/// let mut grid = Grid::builder(LatticeKind::D2Q9, [6, 3, 1]).build().unwrap();
/// for j in 0..3 {
///     grid.set_label([0, j, 0], SiteLabel::Inlet).unwrap();
///     grid.set_label([5, j, 0], SiteLabel::Outlet).unwrap();
/// }
/// let counts = engine.apply(&mut grid, BoundaryRequest::All).unwrap();
/// assert_eq!(counts.inlet, 3);
/// assert_eq!(counts.outlet, 3);
/// ```
pub struct BoundaryEngine {
    config: BoundaryConfig,
    lattice: DirectionSet,
    equilibrium: Box<dyn Equilibrium>,
}

impl fmt::Debug for BoundaryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryEngine")
            .field("config", &self.config)
            .field("lattice", &self.lattice.kind())
            .finish_non_exhaustive()
    }
}

impl BoundaryEngine {
    /// Engine for `lattice` grids using the second-order equilibrium.
    pub fn new(config: BoundaryConfig, lattice: LatticeKind) -> Result<Self, ConfigError> {
        Self::with_equilibrium(config, lattice, Box::new(SecondOrderEquilibrium))
    }

    /// Engine for `lattice` grids using the collision model's own
    /// equilibrium. Only the regularised inlet consults it.
    pub fn with_equilibrium(
        config: BoundaryConfig,
        lattice: LatticeKind,
        equilibrium: Box<dyn Equilibrium>,
    ) -> Result<Self, ConfigError> {
        config.validate(lattice.dims())?;
        match (config.inlet, config.outlet) {
            (None, None) => log::debug!("boundary engine ({lattice}): solid walls only"),
            (inlet, outlet) => log::debug!(
                "boundary engine ({lattice}): inlet {}, outlet {}",
                inlet.map_or_else(
                    || "none".to_string(),
                    |i| format!("{} {} u = {:?}", i.face, i.scheme, i.velocity)
                ),
                outlet.map_or_else(|| "none".to_string(), |o| o.face.to_string()),
            ),
        }
        Ok(Self {
            config,
            lattice: DirectionSet::new(lattice),
            equilibrium,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    /// The velocity set this engine works on.
    pub fn lattice(&self) -> &DirectionSet {
        &self.lattice
    }

    /// Sweep `grid` in site order and reconstruct every site whose label
    /// `request` covers.
    ///
    /// When solids are covered the sweep is followed by
    /// [`reset_solid_velocity`](solid::reset_solid_velocity). Inlet and
    /// outlet sites are skipped when the configuration has no inlet or
    /// outlet respectively.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LatticeMismatch`] if `grid` uses a different
    /// velocity set than the engine. The grid is not touched in that case.
    pub fn apply(
        &self,
        grid: &mut Grid,
        request: BoundaryRequest,
    ) -> Result<SweepCounts, ConfigError> {
        if grid.lattice().kind() != self.lattice.kind() {
            return Err(ConfigError::LatticeMismatch {
                engine: self.lattice.kind(),
                grid: grid.lattice().kind(),
            });
        }
        let inlet_face = self
            .config
            .inlet
            .as_ref()
            .and_then(|cfg| Some((cfg, self.lattice.face(cfg.face)?)));
        let outlet_face = self
            .config
            .outlet
            .as_ref()
            .and_then(|cfg| self.lattice.face(cfg.face));

        let mut counts = SweepCounts::default();
        for site in 0..grid.site_count() {
            let label = grid.label(site);
            if !request.applies_to(label) {
                continue;
            }
            match label {
                SiteLabel::Solid => {
                    solid::bounce_back(&self.lattice, grid, site);
                    counts.solid += 1;
                }
                SiteLabel::Inlet => {
                    let Some((cfg, face)) = inlet_face else { continue };
                    match cfg.scheme {
                        InletScheme::ZouHe => {
                            inlet::zou_he(&self.lattice, grid, site, face, cfg.velocity);
                        }
                        InletScheme::Regularised => {
                            inlet::regularised(
                                &self.lattice,
                                grid,
                                site,
                                face,
                                cfg.velocity,
                                self.equilibrium.as_ref(),
                            );
                        }
                    }
                    counts.inlet += 1;
                }
                SiteLabel::Outlet => {
                    let Some(face) = outlet_face else { continue };
                    if outlet::extrapolate(grid, site, face) {
                        counts.outlet += 1;
                    } else {
                        counts.outlet_skipped += 1;
                    }
                }
                SiteLabel::Fluid => {}
            }
        }
        if request.applies_to(SiteLabel::Solid) {
            solid::reset_solid_velocity(grid);
        }

        log::trace!(
            "{}: {} solid, {} inlet, {} outlet ({} skipped) sites reconstructed",
            grid.key(),
            counts.solid,
            counts.inlet,
            counts.outlet,
            counts.outlet_skipped
        );
        Ok(counts)
    }
}
