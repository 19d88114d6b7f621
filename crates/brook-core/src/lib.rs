//! Core types and traits for the Brook lattice Boltzmann solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Brook workspace:
//! site indices, grid keys, site labels, cartesian edges, the discrete
//! velocity sets and the equilibrium seam consumed by boundary
//! reconstruction.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod equilibrium;
pub mod error;
pub mod id;
pub mod label;
pub mod lattice;

#[cfg(test)]
pub(crate) mod compliance;

pub use edge::{Axis, Edge};
pub use equilibrium::{Equilibrium, SecondOrderEquilibrium};
pub use error::SetupError;
pub use id::{Dimensionality, GridKey, Ijk};
pub use label::SiteLabel;
pub use lattice::{DirectionSet, FaceStencil, LatticeKind};
