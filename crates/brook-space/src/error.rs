//! Error types for grid and decomposition construction.

use brook_core::{Axis, GridKey, Ijk, SetupError};
use std::error::Error;
use std::fmt;

/// Errors arising from grid construction or hierarchy assembly.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// Attempted to construct a grid with zero sites along an active axis.
    EmptyGrid,
    /// An axis extent does not fit the `i32` site indices.
    DimensionTooLarge {
        /// The offending axis.
        axis: Axis,
        /// The requested extent.
        value: usize,
    },
    /// A 2D grid was given more than one site along z.
    FlatAxisRequired {
        /// The requested z extent.
        value: usize,
    },
    /// Grid spacing is not finite and positive.
    InvalidSpacing {
        /// The rejected spacing.
        value: f64,
    },
    /// The supplied label array does not have one label per site.
    LabelCountMismatch {
        /// Number of sites in the grid.
        expected: usize,
        /// Number of labels supplied.
        actual: usize,
    },
    /// Velocity set and dimensionality disagree.
    Setup(SetupError),
    /// A site index is outside the grid.
    CoordOutOfBounds {
        /// The offending indices.
        ijk: Ijk,
    },
    /// No rank subdomain is declared for the level.
    UnknownLevel {
        /// The requested level.
        level: usize,
    },
    /// No refined region is declared for the key.
    UnknownRegion {
        /// The requested grid.
        key: GridKey,
    },
    /// A grid's parent is not in the hierarchy.
    MissingParent {
        /// The grid that could not be attached.
        key: GridKey,
    },
    /// A grid with the same key is already in the hierarchy.
    DuplicateGrid {
        /// The duplicated key.
        key: GridKey,
    },
    /// The hierarchy root must be a level-0 grid.
    NotRoot {
        /// Key of the grid offered as root.
        key: GridKey,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one site per axis"),
            Self::DimensionTooLarge { axis, value } => {
                write!(f, "{axis:?} extent {value} exceeds i32::MAX")
            }
            Self::FlatAxisRequired { value } => {
                write!(f, "2D grids need a z extent of 1, got {value}")
            }
            Self::InvalidSpacing { value } => {
                write!(f, "grid spacing must be finite and positive, got {value}")
            }
            Self::LabelCountMismatch { expected, actual } => {
                write!(f, "expected {expected} site labels, got {actual}")
            }
            Self::Setup(e) => write!(f, "setup: {e}"),
            Self::CoordOutOfBounds { ijk } => write!(f, "site {ijk:?} is off the grid"),
            Self::UnknownLevel { level } => {
                write!(f, "no rank subdomain declared for level {level}")
            }
            Self::UnknownRegion { key } => write!(f, "no refined region declared for {key}"),
            Self::MissingParent { key } => write!(f, "parent of grid {key} is not in the hierarchy"),
            Self::DuplicateGrid { key } => write!(f, "grid {key} is already in the hierarchy"),
            Self::NotRoot { key } => write!(f, "hierarchy root must be level 0, got {key}"),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Setup(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SetupError> for GridError {
    fn from(e: SetupError) -> Self {
        Self::Setup(e)
    }
}

/// Errors detected while validating a [`Decomposition`](crate::Decomposition).
#[derive(Clone, Debug, PartialEq)]
pub enum DecompositionError {
    /// Coarse spacing is not finite and positive.
    InvalidSpacing {
        /// The rejected spacing.
        value: f64,
    },
    /// The global domain has zero cells along an active axis, or more than
    /// one along z in 2D.
    EmptyDomain,
    /// No rank subdomain was declared for a level that needs one.
    MissingSubdomain {
        /// The level without a subdomain.
        level: usize,
    },
    /// A rank subdomain is malformed.
    InvalidSubdomain {
        /// Level of the subdomain.
        level: usize,
        /// What went wrong.
        reason: String,
    },
    /// A refined region is malformed.
    InvalidRegion {
        /// Key of the region.
        key: GridKey,
        /// What went wrong.
        reason: String,
    },
    /// Two refined regions share a key.
    DuplicateRegion {
        /// The duplicated key.
        key: GridKey,
    },
}

impl fmt::Display for DecompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSpacing { value } => {
                write!(f, "coarse spacing must be finite and positive, got {value}")
            }
            Self::EmptyDomain => write!(f, "global domain must have at least one cell per axis"),
            Self::MissingSubdomain { level } => {
                write!(f, "no rank subdomain declared for level {level}")
            }
            Self::InvalidSubdomain { level, reason } => {
                write!(f, "invalid subdomain on level {level}: {reason}")
            }
            Self::InvalidRegion { key, reason } => {
                write!(f, "invalid refined region {key}: {reason}")
            }
            Self::DuplicateRegion { key } => write!(f, "refined region {key} declared twice"),
        }
    }
}

impl Error for DecompositionError {}
