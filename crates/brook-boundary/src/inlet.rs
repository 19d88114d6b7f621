//! Prescribed-velocity inlets.
//!
//! Both schemes work from the [`FaceStencil`] of the inlet wall, so one
//! implementation serves every face of D2Q9, D3Q19 and D3Q27. Let `n` be
//! the inward normal and `u` the prescribed velocity. The wall density
//! follows from mass and normal momentum alone:
//!
//! ```text
//! rho_w = (sum_tangential f + 2 sum_outgoing f) / (1 - u.n)
//! ```

use brook_core::{DirectionSet, Equilibrium, FaceStencil};
use brook_space::Grid;

/// Largest velocity set handled (D3Q27).
const MAX_Q: usize = 27;

/// Density at a velocity wall from the populations streaming could supply.
pub fn wall_density(face: &FaceStencil, f: &[f64], u: [f64; 3]) -> f64 {
    let n = face.normal();
    let un: f64 = (0..3).map(|a| f64::from(n[a]) * u[a]).sum();
    let tangential: f64 = face.tangential().iter().map(|&v| f[v]).sum();
    let outgoing: f64 = face.outgoing().iter().map(|&v| f[v]).sum();
    (tangential + 2.0 * outgoing) / (1.0 - un)
}

/// Zou-He reconstruction of inlet site `site`.
///
/// Each unknown population is its opposite plus the equilibrium momentum
/// difference, corrected along every transverse axis `t` by `c_t N_t` so
/// that the transverse momentum matches `rho_w u_t`:
///
/// ```text
/// a_i   = (2 w_i / cs^2) rho_w (c_i . u)
/// N_t   = (sum_tangential f c_t + sum_unknown c_t a - rho_w u_t) / S_t
/// f_i   = f_opp(i) + a_i - sum_t c_i,t N_t
/// ```
///
/// Only populations are written; stored density and velocity are left to
/// the collision step. Returns the wall density.
pub fn zou_he(
    lattice: &DirectionSet,
    grid: &mut Grid,
    site: usize,
    face: &FaceStencil,
    u: [f64; 3],
) -> f64 {
    let f = grid.populations_mut(site);
    let rho = wall_density(face, f, u);
    let scale = 2.0 * rho / lattice.cs2();

    let mut a = [0.0; MAX_Q];
    for &i in face.unknown() {
        a[i] = scale * lattice.w(i) * lattice.dot(i, u);
    }

    let mut correction = [0.0; 3];
    for &(axis, norm) in face.transverse() {
        let t = axis.index();
        let tangential: f64 = face
            .tangential()
            .iter()
            .map(|&v| f[v] * f64::from(lattice.c(v)[t]))
            .sum();
        let unknown: f64 = face
            .unknown()
            .iter()
            .map(|&i| a[i] * f64::from(lattice.c(i)[t]))
            .sum();
        correction[t] = (tangential + unknown - rho * u[t]) / norm;
    }

    for (&i, &o) in face.unknown().iter().zip(face.outgoing()) {
        let c = lattice.c(i);
        let transverse: f64 = (0..3).map(|t| f64::from(c[t]) * correction[t]).sum();
        f[i] = f[o] + a[i] - transverse;
    }
    rho
}

/// Regularised (Latt-Chopard) reconstruction of inlet site `site`.
///
/// Unknowns first receive the non-equilibrium part of their opposites.
/// The full non-equilibrium tensor `Pi = sum c c (f - f_eq)` is then
/// projected back onto the lattice and every population replaced by
///
/// ```text
/// f_v = f_eq,v + w_v / (2 cs^4) (c_a c_b - cs^2 delta_ab) Pi_ab
/// ```
///
/// The stored density and velocity of the site are overwritten with
/// `(rho_w, u)`. Returns the wall density.
pub fn regularised(
    lattice: &DirectionSet,
    grid: &mut Grid,
    site: usize,
    face: &FaceStencil,
    u: [f64; 3],
    equilibrium: &dyn Equilibrium,
) -> f64 {
    let q = lattice.q();
    let d = lattice.dims().count();
    let cs2 = lattice.cs2();

    let rho = {
        let f = grid.populations_mut(site);
        let rho = wall_density(face, f, u);

        let mut feq = [0.0; MAX_Q];
        for (v, slot) in feq.iter_mut().enumerate().take(q) {
            *slot = equilibrium.evaluate(lattice, v, rho, u);
        }
        for (&i, &o) in face.unknown().iter().zip(face.outgoing()) {
            f[i] = feq[i] + (f[o] - feq[o]);
        }

        let mut pi = [[0.0; 3]; 3];
        for v in 0..q {
            let c = lattice.c(v);
            let fneq = f[v] - feq[v];
            for a in 0..d {
                for b in 0..d {
                    pi[a][b] += f64::from(c[a] * c[b]) * fneq;
                }
            }
        }

        for v in 0..q {
            let c = lattice.c(v);
            let mut contraction = 0.0;
            for a in 0..d {
                for b in 0..d {
                    let delta = if a == b { cs2 } else { 0.0 };
                    contraction += (f64::from(c[a] * c[b]) - delta) * pi[a][b];
                }
            }
            f[v] = feq[v] + lattice.w(v) / (2.0 * cs2 * cs2) * contraction;
        }
        rho
    };

    grid.set_density(site, rho);
    grid.velocity_mut(site).copy_from_slice(&u[..d]);
    rho
}
