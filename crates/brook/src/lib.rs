//! Brook: the geometry, grid-hierarchy and boundary-condition core of a
//! distributed multi-resolution lattice Boltzmann solver.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Brook sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use brook::prelude::*;
//!
//! // A 16 x 8 channel on one rank with a single halo layer.
//! let ctx = Decomposition::builder(Dimensionality::Two, [16, 8, 1], 0.1)
//!     .single_rank(1)
//!     .build()
//!     .unwrap();
//! let mut grid = ctx.build_grid(GridKey::ROOT, LatticeKind::D2Q9).unwrap();
//!
//! // Inlet on the left column, outlet on the right.
//! let [nx, ny, _] = grid.extent();
//! for j in 0..ny as i32 {
//!     grid.set_label([0, j, 0], SiteLabel::Inlet).unwrap();
//!     grid.set_label([nx as i32 - 1, j, 0], SiteLabel::Outlet).unwrap();
//! }
//!
//! let config = BoundaryConfig {
//!     inlet: Some(InletConfig { velocity: [0.05, 0.0, 0.0], ..Default::default() }),
//!     outlet: Some(OutletConfig::default()),
//! };
//! let engine = BoundaryEngine::new(config, LatticeKind::D2Q9).unwrap();
//! let counts = engine.apply(&mut grid, BoundaryRequest::All).unwrap();
//! assert_eq!(counts.inlet, ny);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `brook-core` | Velocity sets, edges, labels, grid keys, equilibrium seam |
//! | [`space`] | `brook-space` | Grids, decomposition, geometry queries, hierarchy, halo plans |
//! | [`boundary`] | `brook-boundary` | Bounce-back, inlet and outlet reconstruction |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`brook-core`).
///
/// Contains the discrete velocity sets ([`types::DirectionSet`]), their
/// per-face stencils, and the [`types::Equilibrium`] trait.
pub use brook_core as types;

/// Grid storage and geometry (`brook-space`).
///
/// [`space::Grid`], [`space::Decomposition`], the [`space::classify`]
/// queries, [`space::GridHierarchy`] and [`space::HaloPlan`].
pub use brook_space as space;

/// Boundary-condition reconstruction (`brook-boundary`).
///
/// Build a [`boundary::BoundaryEngine`] once from a
/// [`boundary::BoundaryConfig`] and apply it after every streaming step.
pub use brook_boundary as boundary;

/// Common imports for typical Brook usage.
///
/// ```rust
/// use brook::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use brook_core::{
        Axis, Dimensionality, DirectionSet, Edge, Equilibrium, GridKey, Ijk, LatticeKind,
        SecondOrderEquilibrium, SiteLabel,
    };

    // Space
    pub use brook_space::{
        BoundingBox, Decomposition, Grid, GridHierarchy, HaloPlan, LocationFilter, RankSubdomain,
        RefinedRegion,
    };

    // Errors
    pub use brook_boundary::ConfigError;
    pub use brook_core::SetupError;
    pub use brook_space::{DecompositionError, GridError};

    // Boundary
    pub use brook_boundary::{
        BoundaryConfig, BoundaryEngine, BoundaryRequest, InletConfig, InletScheme, OutletConfig,
    };
}
