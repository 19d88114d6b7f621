//! Per-site boundary labels.

use std::fmt;

/// Classification of a lattice site.
///
/// Every site carries exactly one label, assigned when the grid is
/// initialised. The boundary engine dispatches on it each step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SiteLabel {
    /// No-slip wall site (bounce-back).
    Solid,
    /// Ordinary fluid site; untouched by boundary reconstruction.
    #[default]
    Fluid,
    /// Prescribed-velocity inlet site.
    Inlet,
    /// Open outlet site (extrapolation).
    Outlet,
}

impl SiteLabel {
    /// `true` for every label except [`SiteLabel::Fluid`].
    ///
    /// Boundary-labelled neighbours carry no usable information for
    /// bounce-back and are skipped as sources.
    pub fn is_boundary(self) -> bool {
        !matches!(self, Self::Fluid)
    }
}

impl fmt::Display for SiteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Solid => "solid",
            Self::Fluid => "fluid",
            Self::Inlet => "inlet",
            Self::Outlet => "outlet",
        };
        f.write_str(name)
    }
}
