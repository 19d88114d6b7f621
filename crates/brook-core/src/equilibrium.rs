//! The equilibrium-evaluation seam.
//!
//! Boundary reconstruction does not own a collision model. The regularised
//! inlet needs equilibrium populations, so it consumes them through the
//! [`Equilibrium`] trait, implemented by whatever collision component the
//! solver is built with. Closures with the matching signature work too.

use crate::lattice::DirectionSet;

/// Evaluates the equilibrium population of one direction.
///
/// `u` always has three components; the z component is zero in 2D.
///
/// # Thread Safety
///
/// `Send + Sync` is required so that a boundary engine holding a
/// `Box<dyn Equilibrium>` can be shared between sweeps on different grids.
pub trait Equilibrium: Send + Sync {
    /// Equilibrium value of direction `v` for density `rho` and velocity `u`.
    fn evaluate(&self, lattice: &DirectionSet, v: usize, rho: f64, u: [f64; 3]) -> f64;
}

impl<F> Equilibrium for F
where
    F: Fn(&DirectionSet, usize, f64, [f64; 3]) -> f64 + Send + Sync,
{
    fn evaluate(&self, lattice: &DirectionSet, v: usize, rho: f64, u: [f64; 3]) -> f64 {
        self(lattice, v, rho, u)
    }
}

/// Standard second-order (BGK) equilibrium:
///
/// `f_eq = w rho (1 + c.u / cs^2 + (c.u)^2 / (2 cs^4) - u.u / (2 cs^2))`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SecondOrderEquilibrium;

impl Equilibrium for SecondOrderEquilibrium {
    #[inline]
    fn evaluate(&self, lattice: &DirectionSet, v: usize, rho: f64, u: [f64; 3]) -> f64 {
        let cs2 = lattice.cs2();
        let cu = lattice.dot(v, u);
        let uu = u[0] * u[0] + u[1] * u[1] + u[2] * u[2];
        lattice.w(v) * rho * (1.0 + cu / cs2 + cu * cu / (2.0 * cs2 * cs2) - uu / (2.0 * cs2))
    }
}
