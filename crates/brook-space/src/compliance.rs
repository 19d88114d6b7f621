//! Classification compliance test helpers.
//!
//! These functions verify that the classification queries agree with each
//! other on a given decomposition and grid. Reused across the 2D and 3D
//! test modules.

use crate::classify::{
    enclosing_voxel, is_on_recv_layer, is_on_sender_layer, is_on_this_rank, is_overlap_periodic,
    LocationFilter,
};
use crate::decomposition::Decomposition;
use crate::grid::Grid;
use crate::halo::HaloPlan;
use brook_core::{Axis, Ijk};
use indexmap::IndexSet;

fn centre(grid: &Grid, ijk: Ijk) -> [f64; 3] {
    [Axis::X, Axis::Y, Axis::Z].map(|axis| grid.positions(axis)[ijk[axis.index()] as usize])
}

/// Assert every cell centre resolves back to its own site.
pub fn assert_centres_round_trip(grid: &Grid) {
    for site in 0..grid.site_count() {
        let ijk = grid.ijk(site);
        assert_eq!(enclosing_voxel(centre(grid, ijk), grid), Some(ijk), "site {site}");
    }
}

/// Assert the core and halo filters partition the grid.
pub fn assert_filters_partition(ctx: &Decomposition, grid: &Grid) {
    for site in 0..grid.site_count() {
        let p = centre(grid, grid.ijk(site));
        let core = is_on_this_rank(ctx, p, LocationFilter::CoreOnly, grid).is_some();
        let halo = is_on_this_rank(ctx, p, LocationFilter::HaloOnly, grid).is_some();
        assert!(core ^ halo, "site {site}: core = {core}, halo = {halo}");
    }
}

/// Assert recv layers are exactly the halo and sender layers lie in the core.
pub fn assert_layers_consistent(ctx: &Decomposition, grid: &Grid) {
    for site in 0..grid.site_count() {
        let p = centre(grid, grid.ijk(site));
        let halo = is_on_this_rank(ctx, p, LocationFilter::HaloOnly, grid).is_some();
        assert_eq!(is_on_recv_layer(ctx, p, grid), halo, "site {site}");
        if is_on_sender_layer(ctx, p, grid) {
            assert!(!halo, "sender site {site} lies in the halo");
        }
    }
}

/// Assert periodic-overlap sites are halo sites.
pub fn assert_periodic_overlap_in_halo(ctx: &Decomposition, grid: &Grid) {
    for site in 0..grid.site_count() {
        let ijk = grid.ijk(site);
        if is_overlap_periodic(ctx, ijk, grid) {
            let p = centre(grid, ijk);
            assert!(
                is_on_this_rank(ctx, p, LocationFilter::HaloOnly, grid).is_some(),
                "periodic overlap at core site {ijk:?}"
            );
        }
    }
}

/// Assert the halo plan receives each halo site at most once, sends only
/// sender-layer sites, and lists sites in site order.
pub fn assert_halo_plan_consistent(ctx: &Decomposition, grid: &Grid) {
    let plan = HaloPlan::build(ctx, grid);
    let mut seen = IndexSet::new();
    for dir in plan.recv_directions() {
        let sites = plan.recv(dir);
        for ijk in sites {
            assert!(seen.insert(*ijk), "{ijk:?} received twice");
        }
        assert!(sites.windows(2).all(|w| grid.site(w[0]) < grid.site(w[1])));
    }
    for dir in plan.send_directions() {
        let sites = plan.send(dir);
        for &ijk in sites {
            assert!(is_on_sender_layer(ctx, centre(grid, ijk), grid), "{ijk:?} sent to {dir}");
        }
        assert!(sites.windows(2).all(|w| grid.site(w[0]) < grid.site(w[1])));
    }
}

/// Run all compliance checks on a grid.
pub fn run_full_compliance(ctx: &Decomposition, grid: &Grid) {
    assert_centres_round_trip(grid);
    assert_filters_partition(ctx, grid);
    assert_layers_consistent(ctx, grid);
    assert_periodic_overlap_in_halo(ctx, grid);
    assert_halo_plan_consistent(ctx, grid);
}
