//! Test fixtures and mock types for Brook development.
//!
//! Provides a counting mock of [`Equilibrium`] and, in [`fixtures`],
//! ready-labelled channel grids and seeded random population fills.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    channel_decomposition, channel_grid, label_channel, normal_component, random_populations,
    random_velocity,
};

use brook_core::{DirectionSet, Equilibrium, SecondOrderEquilibrium};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock implementation of [`Equilibrium`].
///
/// Delegates to [`SecondOrderEquilibrium`] and counts evaluations, so
/// tests can check whether (and how often) a reconstruction consulted
/// the collision model.
#[derive(Debug, Default)]
pub struct CountingEquilibrium {
    calls: AtomicUsize,
}

impl CountingEquilibrium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of evaluations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Equilibrium for CountingEquilibrium {
    fn evaluate(&self, lattice: &DirectionSet, v: usize, rho: f64, u: [f64; 3]) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        SecondOrderEquilibrium.evaluate(lattice, v, rho, u)
    }
}
