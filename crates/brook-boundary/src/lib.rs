//! Boundary-condition reconstruction for Brook.
//!
//! After streaming, sites labelled solid, inlet or outlet are missing the
//! populations that would have arrived from outside the fluid. The
//! [`BoundaryEngine`] fills them in:
//!
//! - [`solid`]: halfway bounce-back and the solid velocity reset
//! - [`inlet`]: Zou-He and regularised prescribed-velocity inlets
//! - [`outlet`]: linear extrapolation from upstream sites
//!
//! What to reconstruct is chosen per call with a [`BoundaryRequest`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod inlet;
pub mod outlet;
pub mod request;
pub mod solid;

pub use config::{BoundaryConfig, ConfigError, InletConfig, InletScheme, OutletConfig};
pub use engine::{BoundaryEngine, SweepCounts};
pub use request::BoundaryRequest;
pub use solid::reset_solid_velocity;
