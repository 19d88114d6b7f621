//! Grid storage, rank decomposition and geometry for Brook.
//!
//! This crate owns everything about *where* sites are:
//!
//! - [`Grid`]: one rectangular grid with its halo, labels and fields
//! - [`Decomposition`]: this rank's subdomains, the refined regions and
//!   the global domain, validated once at construction
//! - [`classify`]: queries answering whether a position lies on this rank,
//!   in a halo, sender or transition layer, or on a periodic overlap
//! - [`GridHierarchy`]: the tree of refined grids with coarse/fine index
//!   mapping ([`fine_indices`], [`coarse_indices`])
//! - [`HaloPlan`]: per-neighbour send and receive site lists

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod decomposition;
pub mod error;
pub mod grid;
pub mod halo;
pub mod hierarchy;
pub mod region;
pub mod util;

#[cfg(test)]
pub(crate) mod compliance;

pub use classify::LocationFilter;
pub use decomposition::{Decomposition, DecompositionBuilder};
pub use error::{DecompositionError, GridError};
pub use grid::{Grid, GridBuilder};
pub use halo::HaloPlan;
pub use hierarchy::{coarse_indices, fine_indices, GridHierarchy, LevelOrigins};
pub use region::{BoundingBox, RankSubdomain, RefinedRegion};
pub use util::linspace;
