//! Benchmark profiles for the Brook solver core.
//!
//! - [`channel_profile`]: a walled channel with inlet, outlet and
//!   scattered obstacles, plus a matching [`BoundaryEngine`]
//! - [`refined_profile`]: a 2D decomposition with two nested refined
//!   regions and the grid hierarchy built from it

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use brook_boundary::{BoundaryConfig, BoundaryEngine, InletConfig, InletScheme, OutletConfig};
use brook_core::{Dimensionality, Edge, GridKey, LatticeKind, SiteLabel};
use brook_space::{Decomposition, Grid, GridHierarchy, RefinedRegion};

/// Build a channel of `extent` sites along x for `kind`.
///
/// Walls on the lowest and highest y rows, a Zou-He inlet at `u = 0.05`
/// on x-min, an extrapolation outlet on x-max, and roughly
/// `obstacle_percent`% of interior sites turned solid by a seeded hash.
pub fn channel_profile(
    kind: LatticeKind,
    extent: [usize; 3],
    scheme: InletScheme,
    obstacle_percent: u64,
    seed: u64,
) -> (Grid, BoundaryEngine) {
    let mut labels = Vec::with_capacity(extent.iter().product());
    let [nx, ny, nz] = extent;
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                let label = if j == 0 || j == ny - 1 {
                    SiteLabel::Solid
                } else if i == 0 {
                    SiteLabel::Inlet
                } else if i == nx - 1 {
                    SiteLabel::Outlet
                } else if i > 2 && i < nx - 3 && obstacle(seed, [i, j, k]) < obstacle_percent {
                    SiteLabel::Solid
                } else {
                    SiteLabel::Fluid
                };
                labels.push(label);
            }
        }
    }

    let grid = Grid::builder(kind, extent)
        .labels(labels)
        .initial_state(1.0, [0.05, 0.0, 0.0])
        .build()
        .expect("channel profile grid is valid");
    let config = BoundaryConfig {
        inlet: Some(InletConfig {
            face: Edge::XMin,
            scheme,
            velocity: [0.05, 0.0, 0.0],
        }),
        outlet: Some(OutletConfig { face: Edge::XMax }),
    };
    let engine = BoundaryEngine::new(config, kind).expect("channel profile config is valid");
    (grid, engine)
}

/// Build a `cells x cells` 2D decomposition with refined regions on
/// levels 1 and 2 around the centre, and every grid of the hierarchy.
///
/// `cells` must be a multiple of 4 and at least 8.
pub fn refined_profile(cells: usize) -> (Decomposition, GridHierarchy) {
    let q = (cells / 4) as i32;
    let ctx = Decomposition::builder(Dimensionality::Two, [cells, cells, 1], 1.0 / cells as f64)
        .single_rank(2)
        .refined_region(RefinedRegion::new(
            GridKey::new(1, 0),
            [q, q, 0],
            [3 * q - 1, 3 * q - 1, 0],
        ))
        .refined_region(RefinedRegion::new(
            GridKey::new(2, 0),
            [3 * q, 3 * q, 0],
            [5 * q - 1, 5 * q - 1, 0],
        ))
        .build()
        .expect("refined profile decomposition is valid");

    let root = ctx
        .build_grid(GridKey::ROOT, LatticeKind::D2Q9)
        .expect("root grid is valid");
    let mut hierarchy = GridHierarchy::new(root).expect("level 0 grid is a root");
    for region in ctx.refined_regions() {
        let grid = ctx
            .build_grid(region.key, LatticeKind::D2Q9)
            .expect("refined grid is valid");
        hierarchy.insert(grid).expect("parent inserted first");
    }
    (ctx, hierarchy)
}

/// Deterministic percentage in `0..100` for a site.
fn obstacle(seed: u64, [i, j, k]: [usize; 3]) -> u64 {
    let h = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add((i as u64).wrapping_mul(1442695040888963407))
        .wrapping_add((j as u64).wrapping_mul(2862933555777941757))
        .wrapping_add((k as u64).wrapping_mul(3202034522624059733));
    (h >> 33) % 100
}
