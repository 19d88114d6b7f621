//! Reusable grid fixtures.
//!
//! The standard scenario is a channel along x:
//!
//! - solid walls on the lowest and highest y rows
//! - inlet sites on the lowest x column between the walls
//! - outlet sites on the highest x column between the walls
//!
//! In 3D the z direction is left open (all fluid).

use brook_core::{Dimensionality, Edge, GridKey, LatticeKind, SiteLabel};
use brook_space::{Decomposition, Grid};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Single-rank decomposition of `cells` coarse cells of unit spacing.
pub fn channel_decomposition(dims: Dimensionality, cells: [usize; 3], halo: usize) -> Decomposition {
    Decomposition::builder(dims, cells, 1.0)
        .single_rank(halo)
        .build()
        .expect("channel decomposition is valid")
}

/// Root grid of `lattice` with `extent` sites, at rest with unit density
/// and labelled as a channel.
pub fn channel_grid(lattice: LatticeKind, extent: [usize; 3]) -> Grid {
    let mut grid = Grid::builder(lattice, extent)
        .key(GridKey::ROOT)
        .build()
        .expect("channel grid is valid");
    label_channel(&mut grid);
    grid
}

/// Apply channel labels to every site of `grid`. Walls take precedence
/// over the inlet and outlet columns.
pub fn label_channel(grid: &mut Grid) {
    let [nx, ny, _] = grid.extent();
    let (nx, ny) = (nx as i32, ny as i32);
    for site in 0..grid.site_count() {
        let ijk = grid.ijk(site);
        let label = if ijk[1] == 0 || ijk[1] == ny - 1 {
            SiteLabel::Solid
        } else if ijk[0] == 0 {
            SiteLabel::Inlet
        } else if ijk[0] == nx - 1 {
            SiteLabel::Outlet
        } else {
            SiteLabel::Fluid
        };
        grid.set_label(ijk, label).expect("site is on the grid");
    }
}

/// Overwrite every population with `w_v (1 + r)`, `r` uniform in
/// `[-0.1, 0.1)`, drawn from a ChaCha8 stream seeded with `seed`.
///
/// Densities stay close to one, so reconstructions remain well inside
/// their stable range.
pub fn random_populations(grid: &mut Grid, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let lattice = grid.lattice().clone();
    for site in 0..grid.site_count() {
        for v in 0..lattice.q() {
            let r: f64 = rng.random::<f64>() * 0.2 - 0.1;
            grid.set_f(site, v, lattice.w(v) * (1.0 + r));
        }
    }
}

/// A velocity with components uniform in `[-max, max)` along the active
/// axes of `dims`, zero elsewhere.
pub fn random_velocity(dims: Dimensionality, max: f64, seed: u64) -> [f64; 3] {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut u = [0.0; 3];
    for &axis in dims.axes() {
        u[axis.index()] = rng.random_range(-max..max);
    }
    u
}

/// Inward-normal component of `u` at `face`.
pub fn normal_component(face: Edge, u: [f64; 3]) -> f64 {
    let n = face.inward_normal();
    (0..3).map(|a| f64::from(n[a]) * u[a]).sum()
}
