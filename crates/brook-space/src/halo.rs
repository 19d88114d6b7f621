//! Halo exchange plans.
//!
//! A [`HaloPlan`] lists, for every neighbouring rank direction, which local
//! sites this rank sends (sender bands) and which it receives into (halo
//! bands). The message-passing layer itself is outside this crate; the
//! plan only fixes what goes where, in site order.

use crate::classify::mpi_direction;
use crate::decomposition::Decomposition;
use crate::grid::Grid;
use brook_core::Ijk;
use indexmap::IndexMap;

/// Send and receive site lists keyed by neighbour direction number (see
/// [`MPI_DIRECTIONS`](crate::classify::MPI_DIRECTIONS)).
///
/// Directions pointing across a non-periodic global domain edge have no
/// neighbour and are omitted, as are sides of a refined grid that lie
/// inside this rank's core. Within each list sites appear in site order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HaloPlan {
    send: IndexMap<usize, Vec<Ijk>>,
    recv: IndexMap<usize, Vec<Ijk>>,
}

impl HaloPlan {
    /// Compute the plan for `grid`.
    ///
    /// A halo site is received from the neighbour in the direction of its
    /// band offset, e.g. a low-x, high-y corner site from direction
    /// `[-1, 1, 0]`. A core site in the sender bands of several axes is
    /// sent to every neighbour whose offset is a non-empty combination of
    /// those bands.
    pub fn build(ctx: &Decomposition, grid: &Grid) -> Self {
        let dims = grid.dims();
        let axes = dims.axes();
        let h = ctx.halo_depth(grid.level()) as i32;
        let extent = grid.extent();
        let cells = ctx.global_cells(grid.level());
        let offset = grid.global_offset();

        // Whether a neighbour exists on the low (0) and high (1) side of each
        // axis. A grid side only faces another rank where it coincides with
        // this rank's core edge on its level; a refined grid's sides inside
        // the rank are region boundaries, fed from the coarse level instead.
        let mut neighbour = [[false; 2]; 3];
        if let Some((rank_lo, rank_hi)) = ctx.core_cells(grid.level()) {
            for &axis in axes {
                let a = axis.index();
                let periodic = ctx.is_periodic(axis);
                let core_lo = offset[a] + h;
                let core_hi = offset[a] + extent[a] as i32 - h - 1;
                neighbour[a] = [
                    core_lo == rank_lo[a] && (periodic || rank_lo[a] > 0),
                    core_hi == rank_hi[a] && (periodic || rank_hi[a] < cells[a] as i32 - 1),
                ];
            }
        }
        let has_neighbour = |dir: Ijk| {
            axes.iter().all(|axis| {
                let a = axis.index();
                match dir[a] {
                    -1 => neighbour[a][0],
                    1 => neighbour[a][1],
                    _ => true,
                }
            })
        };

        let mut plan = HaloPlan::default();
        if h == 0 {
            return plan;
        }
        for site in 0..grid.site_count() {
            let ijk = grid.ijk(site);
            let mut halo_side = [0i32; 3];
            let mut send_side = [0i32; 3];
            for &axis in axes {
                let a = axis.index();
                let (i, n) = (ijk[a], extent[a] as i32);
                halo_side[a] = if i < h {
                    -1
                } else if i >= n - h {
                    1
                } else {
                    0
                };
                send_side[a] = if i < 2 * h {
                    -1
                } else if i >= n - 2 * h {
                    1
                } else {
                    0
                };
            }

            if halo_side != [0; 3] {
                if has_neighbour(halo_side) {
                    if let Some(dir) = mpi_direction(halo_side, dims) {
                        plan.recv.entry(dir).or_default().push(ijk);
                    }
                }
                continue;
            }

            let banded: Vec<usize> = (0..3).filter(|&a| send_side[a] != 0).collect();
            for mask in 1u32..(1 << banded.len()) {
                let mut dir = [0i32; 3];
                for (bit, &a) in banded.iter().enumerate() {
                    if mask & (1 << bit) != 0 {
                        dir[a] = send_side[a];
                    }
                }
                if !has_neighbour(dir) {
                    continue;
                }
                if let Some(d) = mpi_direction(dir, dims) {
                    plan.send.entry(d).or_default().push(ijk);
                }
            }
        }
        plan.send.sort_keys();
        plan.recv.sort_keys();

        log::debug!(
            "halo plan for {}: {} sites sent to {} neighbours, {} received from {}",
            grid.key(),
            plan.total_send(),
            plan.send.len(),
            plan.total_recv(),
            plan.recv.len()
        );
        plan
    }

    /// Sites sent toward direction `dir` (empty if none).
    pub fn send(&self, dir: usize) -> &[Ijk] {
        self.send.get(&dir).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sites received from direction `dir` (empty if none).
    pub fn recv(&self, dir: usize) -> &[Ijk] {
        self.recv.get(&dir).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Directions with a non-empty send list, ascending.
    pub fn send_directions(&self) -> impl Iterator<Item = usize> + '_ {
        self.send.keys().copied()
    }

    /// Directions with a non-empty receive list, ascending.
    pub fn recv_directions(&self) -> impl Iterator<Item = usize> + '_ {
        self.recv.keys().copied()
    }

    /// Total number of site sends over all directions.
    pub fn total_send(&self) -> usize {
        self.send.values().map(Vec::len).sum()
    }

    /// Total number of site receives over all directions.
    pub fn total_recv(&self) -> usize {
        self.recv.values().map(Vec::len).sum()
    }
}
