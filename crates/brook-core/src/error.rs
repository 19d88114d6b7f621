//! Error types for lattice setup.

use crate::id::Dimensionality;
use crate::lattice::LatticeKind;
use std::error::Error;
use std::fmt;

/// Precondition violations detected while assembling lattice data.
///
/// These indicate a setup bug rather than a runtime condition; they are
/// reported once at construction so that steady-state code never has to
/// re-check them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupError {
    /// The velocity set does not belong to the requested dimensionality.
    LatticeMismatch {
        /// The configured velocity set.
        lattice: LatticeKind,
        /// The dimensionality it was paired with.
        dims: Dimensionality,
    },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatticeMismatch { lattice, dims } => {
                write!(
                    f,
                    "velocity set {lattice} is {}, not {dims}",
                    lattice.dims()
                )
            }
        }
    }
}

impl Error for SetupError {}
