//! Geometric classification of positions and sites.
//!
//! Every query takes the [`Decomposition`] context explicitly together with
//! the grid it is asked about. Positions are physical coordinates; they are
//! first resolved to the enclosing cell with [`enclosing_voxel`], and all
//! further tests are integer comparisons in index space.
//!
//! Layout of one axis of a local grid with extent `n` and halo depth `h`:
//!
//! ```text
//!  0        h        2h            n-2h      n-h        n
//!  | recv   | sender |    core     | sender  | recv     |
//! ```
//!
//! The recv bands are the halo; the sender bands are the outermost `h`
//! core cells, whose values the neighbouring rank's halo mirrors.

use crate::decomposition::Decomposition;
use crate::grid::Grid;
use brook_core::{Axis, Dimensionality, Edge, Ijk};

/// Which part of a rank's grid a position must fall in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LocationFilter {
    /// Anywhere on the grid, halo included.
    #[default]
    Any,
    /// Core only.
    CoreOnly,
    /// Halo only.
    HaloOnly,
}

/// Unit offsets of the neighbouring ranks, indexed by direction number.
///
/// Opposite directions sit at adjacent indices. The first eight entries
/// are the in-plane directions used in 2D.
pub const MPI_DIRECTIONS: [[i32; 3]; 26] = [
    [1, 0, 0],
    [-1, 0, 0],
    [1, 1, 0],
    [-1, -1, 0],
    [0, 1, 0],
    [0, -1, 0],
    [-1, 1, 0],
    [1, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
    [1, 0, 1],
    [-1, 0, -1],
    [1, 1, 1],
    [-1, -1, -1],
    [0, 1, 1],
    [0, -1, -1],
    [-1, 1, 1],
    [1, -1, -1],
    [-1, 0, 1],
    [1, 0, -1],
    [-1, -1, 1],
    [1, 1, -1],
    [0, -1, 1],
    [0, 1, -1],
    [1, -1, 1],
    [-1, 1, -1],
];

/// Direction number of the neighbouring rank at unit `offset`.
///
/// Returns `None` for the zero offset, for components outside `-1..=1`,
/// and for any z component in 2D.
///
/// # Examples
///
/// ```
/// use brook_core::Dimensionality;
/// use brook_space::classify::mpi_direction;
///
/// assert_eq!(mpi_direction([1, 0, 0], Dimensionality::Two), Some(0));
/// assert_eq!(mpi_direction([-1, 1, 0], Dimensionality::Two), Some(6));
/// assert_eq!(mpi_direction([0, 0, 1], Dimensionality::Two), None);
/// assert_eq!(mpi_direction([0, 0, 1], Dimensionality::Three), Some(8));
/// ```
pub fn mpi_direction(offset: Ijk, dims: Dimensionality) -> Option<usize> {
    MPI_DIRECTIONS[..dims.neighbour_count()]
        .iter()
        .position(|&d| d == offset)
}

/// Offset of the neighbouring rank with direction number `direction`.
pub fn mpi_offset(direction: usize) -> Option<Ijk> {
    MPI_DIRECTIONS.get(direction).copied()
}

/// Index along `axis` of the cell of `grid` containing `coord`.
///
/// Cells are half-open intervals `(origin + n dh, origin + (n+1) dh]`, so a
/// coordinate exactly on a cell face resolves to the lower-index cell. The
/// result may lie outside the grid. An inactive axis always gives `0`.
///
/// Returns `None` for a non-finite coordinate or one whose index does not
/// fit in an `i32`.
pub fn enclosing_voxel_axis(coord: f64, axis: Axis, grid: &Grid) -> Option<i32> {
    if !is_active(axis, grid.dims()) {
        return Some(0);
    }
    let t = (coord - grid.origin()[axis.index()]) / grid.spacing();
    if !t.is_finite() {
        return None;
    }
    let floor = t.floor();
    let idx = if t == floor { floor - 1.0 } else { floor };
    if idx < f64::from(i32::MIN) || idx > f64::from(i32::MAX) {
        return None;
    }
    Some(idx as i32)
}

/// Indices of the cell of `grid` containing `position`; see
/// [`enclosing_voxel_axis`].
pub fn enclosing_voxel(position: [f64; 3], grid: &Grid) -> Option<Ijk> {
    Some([
        enclosing_voxel_axis(position[0], Axis::X, grid)?,
        enclosing_voxel_axis(position[1], Axis::Y, grid)?,
        enclosing_voxel_axis(position[2], Axis::Z, grid)?,
    ])
}

/// Global index along `axis` of the cell containing `coord`.
fn global_voxel_axis(coord: f64, axis: Axis, grid: &Grid) -> Option<i32> {
    enclosing_voxel_axis(coord, axis, grid)?.checked_add(grid.global_offset()[axis.index()])
}

/// `true` if `ijk` is not a site of `grid`.
pub fn is_off_grid(ijk: Ijk, grid: &Grid) -> bool {
    !grid.contains(ijk)
}

/// Local index along `axis` of the cell containing `coord`, if it lies on
/// this rank's grid and passes `filter` along that axis.
pub fn is_on_this_rank_axis(
    ctx: &Decomposition,
    coord: f64,
    axis: Axis,
    filter: LocationFilter,
    grid: &Grid,
) -> Option<i32> {
    if !is_active(axis, grid.dims()) {
        return (filter != LocationFilter::HaloOnly).then_some(0);
    }
    let idx = enclosing_voxel_axis(coord, axis, grid)?;
    let n = grid.extent()[axis.index()] as i32;
    if idx < 0 || idx >= n {
        return None;
    }
    let core = in_core(idx, n, halo(ctx, grid));
    match filter {
        LocationFilter::Any => Some(idx),
        LocationFilter::CoreOnly => core.then_some(idx),
        LocationFilter::HaloOnly => (!core).then_some(idx),
    }
}

/// Local indices of the site containing `position`, if it lies on this
/// rank's grid and passes `filter`.
///
/// A site is in the core when it is in the core along every active axis,
/// and in the halo otherwise.
///
/// # Examples
///
/// ```
/// use brook_core::{Dimensionality, GridKey, LatticeKind};
/// use brook_space::classify::{is_on_this_rank, LocationFilter};
/// use brook_space::Decomposition;
///
/// let decomp = Decomposition::builder(Dimensionality::Two, [10, 10, 1], 1.0)
///     .single_rank(1)
///     .build()
///     .unwrap();
/// let grid = decomp.build_grid(GridKey::ROOT, LatticeKind::D2Q9).unwrap();
///
/// let p = [0.5, 4.5, 0.0];
/// assert_eq!(is_on_this_rank(&decomp, p, LocationFilter::CoreOnly, &grid), Some([1, 5, 0]));
/// assert_eq!(is_on_this_rank(&decomp, [-0.5, 4.5, 0.0], LocationFilter::CoreOnly, &grid), None);
/// assert!(is_on_this_rank(&decomp, [-0.5, 4.5, 0.0], LocationFilter::HaloOnly, &grid).is_some());
/// ```
pub fn is_on_this_rank(
    ctx: &Decomposition,
    position: [f64; 3],
    filter: LocationFilter,
    grid: &Grid,
) -> Option<Ijk> {
    let ijk = enclosing_voxel(position, grid)?;
    if is_off_grid(ijk, grid) {
        return None;
    }
    let core = is_core_site(ctx, ijk, grid);
    match filter {
        LocationFilter::Any => Some(ijk),
        LocationFilter::CoreOnly => core.then_some(ijk),
        LocationFilter::HaloOnly => (!core).then_some(ijk),
    }
}

/// `true` if on-grid site `ijk` is in the core along every active axis.
pub fn is_core_site(ctx: &Decomposition, ijk: Ijk, grid: &Grid) -> bool {
    let h = halo(ctx, grid);
    let extent = grid.extent();
    grid.dims()
        .axes()
        .iter()
        .all(|a| in_core(ijk[a.index()], extent[a.index()] as i32, h))
}

/// `true` if `coord`, taken along the axis of `edge`, falls in the sender
/// band next to that edge: the `h` core cells adjacent to the halo.
pub fn is_on_sender_layer_edge(ctx: &Decomposition, coord: f64, edge: Edge, grid: &Grid) -> bool {
    let axis = edge.axis();
    if !is_active(axis, grid.dims()) {
        return false;
    }
    let Some(idx) = enclosing_voxel_axis(coord, axis, grid) else {
        return false;
    };
    let n = grid.extent()[axis.index()] as i32;
    let h = halo(ctx, grid);
    if edge.is_max() {
        idx >= n - 2 * h && idx < n - h
    } else {
        idx >= h && idx < 2 * h
    }
}

/// `true` if `position` is in this rank's core and in at least one sender
/// band.
pub fn is_on_sender_layer(ctx: &Decomposition, position: [f64; 3], grid: &Grid) -> bool {
    is_on_this_rank(ctx, position, LocationFilter::CoreOnly, grid).is_some()
        && grid
            .dims()
            .edges()
            .iter()
            .any(|&e| is_on_sender_layer_edge(ctx, position[e.axis().index()], e, grid))
}

/// `true` if `coord`, taken along the axis of `edge`, falls in the halo
/// band on that edge.
pub fn is_on_recv_layer_edge(ctx: &Decomposition, coord: f64, edge: Edge, grid: &Grid) -> bool {
    let axis = edge.axis();
    if !is_active(axis, grid.dims()) {
        return false;
    }
    let Some(idx) = enclosing_voxel_axis(coord, axis, grid) else {
        return false;
    };
    let n = grid.extent()[axis.index()] as i32;
    let h = halo(ctx, grid);
    if edge.is_max() {
        idx >= n - h && idx < n
    } else {
        idx >= 0 && idx < h
    }
}

/// `true` if `position` is on this rank's grid and in at least one halo band.
pub fn is_on_recv_layer(ctx: &Decomposition, position: [f64; 3], grid: &Grid) -> bool {
    is_on_this_rank(ctx, position, LocationFilter::Any, grid).is_some()
        && grid
            .dims()
            .edges()
            .iter()
            .any(|&e| is_on_recv_layer_edge(ctx, position[e.axis().index()], e, grid))
}

/// `true` if halo site `ijk` mirrors a site across a periodic wrap: along
/// some periodic axis its global index falls outside the global domain.
pub fn is_overlap_periodic(ctx: &Decomposition, ijk: Ijk, grid: &Grid) -> bool {
    if is_off_grid(ijk, grid) {
        return false;
    }
    let global = grid.to_global(ijk);
    let cells = ctx.global_cells(grid.level());
    grid.dims().axes().iter().any(|&axis| {
        let a = axis.index();
        ctx.is_periodic(axis) && (global[a] < 0 || global[a] >= cells[a] as i32)
    })
}

/// `true` if refined region `region` on the level above `grid` overlaps
/// the core of `grid`.
pub fn intersects_refined_region(ctx: &Decomposition, grid: &Grid, region: usize) -> bool {
    let Some(refined) = ctx.refined_region(grid.level() + 1, region) else {
        return false;
    };
    let h = halo(ctx, grid);
    let offset = grid.global_offset();
    let extent = grid.extent();
    grid.dims().axes().iter().all(|axis| {
        let a = axis.index();
        let lo = offset[a] + h;
        let hi = offset[a] + extent[a] as i32 - h - 1;
        lo <= hi && refined.min[a] <= hi && refined.max[a] >= lo
    })
}

/// `true` if `coord`, taken along the axis of `edge`, falls in the
/// transition band of `grid`'s refined region on that edge.
///
/// The band is `2 * transition_width` fine cells wide, measured inward from
/// the region's outer face. Level-0 grids have no transition layer.
pub fn is_on_transition_layer_edge(
    ctx: &Decomposition,
    coord: f64,
    edge: Edge,
    grid: &Grid,
) -> bool {
    let axis = edge.axis();
    if !is_active(axis, grid.dims()) {
        return false;
    }
    let Some((lo, hi, width)) = transition_bounds(ctx, grid) else {
        return false;
    };
    let a = axis.index();
    let Some(g) = global_voxel_axis(coord, axis, grid) else {
        return false;
    };
    if edge.is_max() {
        g > hi[a] - width && g <= hi[a]
    } else {
        g >= lo[a] && g < lo[a] + width
    }
}

/// `true` if `position` lies inside `grid`'s refined region and in its
/// transition band on at least one edge.
pub fn is_on_transition_layer(ctx: &Decomposition, position: [f64; 3], grid: &Grid) -> bool {
    let Some((lo, hi, _)) = transition_bounds(ctx, grid) else {
        return false;
    };
    let dims = grid.dims();
    let inside = dims.axes().iter().all(|&axis| {
        let a = axis.index();
        global_voxel_axis(position[a], axis, grid).is_some_and(|g| g >= lo[a] && g <= hi[a])
    });
    inside
        && dims
            .edges()
            .iter()
            .any(|&e| is_on_transition_layer_edge(ctx, position[e.axis().index()], e, grid))
}

/// Fine-level bounds of `grid`'s region and the transition band width.
fn transition_bounds(ctx: &Decomposition, grid: &Grid) -> Option<(Ijk, Ijk, i32)> {
    if grid.level() == 0 {
        return None;
    }
    let region = ctx.refined_region(grid.level(), grid.region())?;
    let (lo, hi) = region.fine_bounds();
    Some((lo, hi, 2 * ctx.transition_width() as i32))
}

fn halo(ctx: &Decomposition, grid: &Grid) -> i32 {
    ctx.halo_depth(grid.level()) as i32
}

fn in_core(idx: i32, n: i32, h: i32) -> bool {
    idx >= h && idx < n - h
}

fn is_active(axis: Axis, dims: Dimensionality) -> bool {
    axis.index() < dims.count()
}
