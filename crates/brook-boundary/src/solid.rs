//! No-slip walls: halfway bounce-back and the solid velocity reset.

use brook_core::{DirectionSet, SiteLabel};
use brook_space::Grid;

/// Bounce populations back into solid site `site`.
///
/// For every direction `v` the population is taken from the neighbour
/// `site + c_v` in the opposite direction. Off-grid neighbours and
/// neighbours that are themselves solid, inlet or outlet sites supply
/// nothing; those populations keep their current value.
pub fn bounce_back(lattice: &DirectionSet, grid: &mut Grid, site: usize) {
    let ijk = grid.ijk(site);
    for v in 0..lattice.q() {
        let c = lattice.c(v);
        let source = [ijk[0] + c[0], ijk[1] + c[1], ijk[2] + c[2]];
        let Some(s) = grid.site(source) else {
            continue;
        };
        if grid.label(s).is_boundary() {
            continue;
        }
        let value = grid.f(s, lattice.opposite(v));
        grid.set_f(site, v, value);
    }
}

/// Zero the stored velocity of every solid site. Density is left as is.
///
/// Returns the number of sites reset.
pub fn reset_solid_velocity(grid: &mut Grid) -> usize {
    let mut count = 0;
    for site in 0..grid.site_count() {
        if grid.label(site) == SiteLabel::Solid {
            grid.velocity_mut(site).fill(0.0);
            count += 1;
        }
    }
    count
}
