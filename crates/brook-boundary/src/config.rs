//! Boundary configuration, validation and error types.
//!
//! [`BoundaryConfig`] says which face carries the inlet and which the
//! outlet, and how the inlet is reconstructed. [`validate()`](BoundaryConfig::validate)
//! checks it against the grid dimensionality once, when the
//! [`BoundaryEngine`](crate::BoundaryEngine) is built.

use brook_core::{Dimensionality, Edge, LatticeKind};
use std::error::Error;
use std::fmt;

// ── InletScheme ───────────────────────────────────────────────────

/// How unknown populations at inlet sites are reconstructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InletScheme {
    /// Zou-He non-equilibrium bounce-back with transverse momentum
    /// corrections.
    #[default]
    ZouHe,
    /// Latt-Chopard regularised scheme: equilibrium plus the projected
    /// second-order non-equilibrium part.
    Regularised,
}

impl fmt::Display for InletScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZouHe => write!(f, "Zou-He"),
            Self::Regularised => write!(f, "regularised"),
        }
    }
}

// ── InletConfig ───────────────────────────────────────────────────

/// A prescribed-velocity inlet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InletConfig {
    /// Wall the inlet sits on. Default: [`Edge::XMin`].
    pub face: Edge,
    /// Reconstruction scheme. Default: Zou-He.
    pub scheme: InletScheme,
    /// Prescribed velocity in lattice units; z is ignored in 2D and must be
    /// zero there. Default: at rest.
    pub velocity: [f64; 3],
}

impl Default for InletConfig {
    fn default() -> Self {
        Self {
            face: Edge::XMin,
            scheme: InletScheme::ZouHe,
            velocity: [0.0; 3],
        }
    }
}

impl InletConfig {
    /// Velocity component along the inward normal of the inlet face.
    pub fn normal_velocity(&self) -> f64 {
        let n = self.face.inward_normal();
        (0..3).map(|a| f64::from(n[a]) * self.velocity[a]).sum()
    }
}

// ── OutletConfig ──────────────────────────────────────────────────

/// An open extrapolation outlet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutletConfig {
    /// Wall the outlet sits on. Default: [`Edge::XMax`].
    pub face: Edge,
}

impl Default for OutletConfig {
    fn default() -> Self {
        Self { face: Edge::XMax }
    }
}

// ── BoundaryConfig ────────────────────────────────────────────────

/// Full boundary setup for one grid.
///
/// Solid walls need no configuration; they are driven by the site labels
/// alone. With `inlet` or `outlet` unset, sites carrying that label are
/// left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundaryConfig {
    /// Inlet, if any.
    pub inlet: Option<InletConfig>,
    /// Outlet, if any.
    pub outlet: Option<OutletConfig>,
}

impl BoundaryConfig {
    /// Check the configuration against `dims`.
    pub fn validate(&self, dims: Dimensionality) -> Result<(), ConfigError> {
        let active = |face: Edge| dims.edges().contains(&face);
        if let Some(inlet) = &self.inlet {
            // 1. Face must exist in this dimensionality.
            if !active(inlet.face) {
                return Err(ConfigError::FaceNotInDimensionality {
                    face: inlet.face,
                    dims,
                });
            }
            // 2. Velocity must be finite and planar in 2D.
            if inlet.velocity.iter().any(|u| !u.is_finite()) {
                return Err(ConfigError::InvalidVelocity {
                    reason: format!("velocity {:?} is not finite", inlet.velocity),
                });
            }
            if dims == Dimensionality::Two && inlet.velocity[2] != 0.0 {
                return Err(ConfigError::InvalidVelocity {
                    reason: format!("2D inlet has z velocity {}", inlet.velocity[2]),
                });
            }
            // 3. Wall density is rho = (...) / (1 - u.n); u.n >= 1 makes it
            //    singular or negative.
            let un = inlet.normal_velocity();
            if un >= 1.0 {
                return Err(ConfigError::SingularInlet { normal_velocity: un });
            }
        }
        if let Some(outlet) = &self.outlet {
            if !active(outlet.face) {
                return Err(ConfigError::FaceNotInDimensionality {
                    face: outlet.face,
                    dims,
                });
            }
        }
        // 4. Inlet and outlet on distinct faces.
        if let (Some(inlet), Some(outlet)) = (&self.inlet, &self.outlet) {
            if inlet.face == outlet.face {
                return Err(ConfigError::SharedFace { face: inlet.face });
            }
        }
        Ok(())
    }
}

// ── ConfigError ───────────────────────────────────────────────────

/// Errors detected during boundary configuration or engine use.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A z face was configured for a 2D problem.
    FaceNotInDimensionality {
        /// The offending face.
        face: Edge,
        /// The problem's dimensionality.
        dims: Dimensionality,
    },
    /// The inlet velocity is unusable.
    InvalidVelocity {
        /// What went wrong.
        reason: String,
    },
    /// The inlet velocity points out through the inlet at or above lattice
    /// speed, so the wall density is undefined.
    SingularInlet {
        /// `u . n` for the inward normal `n`.
        normal_velocity: f64,
    },
    /// Inlet and outlet were put on the same face.
    SharedFace {
        /// The shared face.
        face: Edge,
    },
    /// The engine was applied to a grid with a different velocity set.
    LatticeMismatch {
        /// The engine's velocity set.
        engine: LatticeKind,
        /// The grid's velocity set.
        grid: LatticeKind,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FaceNotInDimensionality { face, dims } => {
                write!(f, "face {face} does not exist in {dims}")
            }
            Self::InvalidVelocity { reason } => write!(f, "invalid inlet velocity: {reason}"),
            Self::SingularInlet { normal_velocity } => write!(
                f,
                "inlet normal velocity {normal_velocity} makes the wall density singular"
            ),
            Self::SharedFace { face } => write!(f, "inlet and outlet both on {face}"),
            Self::LatticeMismatch { engine, grid } => {
                write!(f, "engine built for {engine} applied to a {grid} grid")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn inlet(face: Edge, velocity: [f64; 3]) -> BoundaryConfig {
        BoundaryConfig {
            inlet: Some(InletConfig {
                face,
                velocity,
                ..InletConfig::default()
            }),
            outlet: Some(OutletConfig::default()),
        }
    }

    #[test]
    fn defaults_are_left_inlet_right_outlet() {
        let cfg = inlet(Edge::XMin, [0.05, 0.0, 0.0]);
        assert!(cfg.validate(Dimensionality::Two).is_ok());
        assert_eq!(InletConfig::default().scheme, InletScheme::ZouHe);
        assert_eq!(OutletConfig::default().face, Edge::XMax);
        assert!(BoundaryConfig::default().validate(Dimensionality::Three).is_ok());
    }

    #[test]
    fn z_faces_rejected_in_2d() {
        let mut cfg = inlet(Edge::ZMin, [0.0; 3]);
        match cfg.validate(Dimensionality::Two) {
            Err(ConfigError::FaceNotInDimensionality { face: Edge::ZMin, .. }) => {}
            other => panic!("expected FaceNotInDimensionality, got {other:?}"),
        }
        assert!(cfg.validate(Dimensionality::Three).is_ok());
        cfg.inlet = None;
        cfg.outlet = Some(OutletConfig { face: Edge::ZMax });
        assert!(cfg.validate(Dimensionality::Two).is_err());
    }

    #[test]
    fn velocity_checks() {
        let nan = inlet(Edge::XMin, [f64::NAN, 0.0, 0.0]);
        assert!(matches!(
            nan.validate(Dimensionality::Two),
            Err(ConfigError::InvalidVelocity { .. })
        ));
        let planar = inlet(Edge::XMin, [0.01, 0.0, 0.02]);
        assert!(planar.validate(Dimensionality::Two).is_err());
        assert!(planar.validate(Dimensionality::Three).is_ok());
        let singular = inlet(Edge::YMax, [0.0, -1.0, 0.0]);
        assert_eq!(
            singular.validate(Dimensionality::Two),
            Err(ConfigError::SingularInlet {
                normal_velocity: 1.0
            })
        );
    }

    #[test]
    fn shared_face_rejected() {
        let cfg = inlet(Edge::XMax, [-0.02, 0.0, 0.0]);
        assert_eq!(
            cfg.validate(Dimensionality::Two),
            Err(ConfigError::SharedFace { face: Edge::XMax })
        );
    }
}
