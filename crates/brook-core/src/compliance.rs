//! Direction-set compliance test helpers.
//!
//! These functions verify that a [`DirectionSet`] satisfies the moment
//! and symmetry invariants boundary reconstruction relies on. Reused
//! across every lattice test module (D2Q9, D3Q19, D3Q27).

use crate::lattice::DirectionSet;

const TOL: f64 = 1e-14;

/// Assert that the weights sum to one.
pub fn assert_weights_normalised(set: &DirectionSet) {
    let total: f64 = set.weights().iter().sum();
    assert!(
        (total - 1.0).abs() < TOL,
        "{} weights sum to {total}, expected 1.0",
        set.kind()
    );
}

/// Assert `sum_v w_v c_v == 0`.
pub fn assert_first_moment_vanishes(set: &DirectionSet) {
    for a in 0..3 {
        let m: f64 = (0..set.q())
            .map(|v| set.w(v) * f64::from(set.c(v)[a]))
            .sum();
        assert!(m.abs() < TOL, "{} first moment[{a}] = {m}", set.kind());
    }
}

/// Assert `sum_v w_v c_va c_vb == cs^2 delta_ab` over the active axes.
pub fn assert_second_moment_isotropic(set: &DirectionSet) {
    let dims = set.dims().count();
    for a in 0..dims {
        for b in 0..dims {
            let m: f64 = (0..set.q())
                .map(|v| set.w(v) * f64::from(set.c(v)[a] * set.c(v)[b]))
                .sum();
            let expected = if a == b { set.cs2() } else { 0.0 };
            assert!(
                (m - expected).abs() < TOL,
                "{} second moment[{a}][{b}] = {m}, expected {expected}",
                set.kind()
            );
        }
    }
}

/// Assert `opposite` is an involution that negates the velocity vector.
pub fn assert_opposite_involution(set: &DirectionSet) {
    for v in 0..set.q() {
        let o = set.opposite(v);
        assert_eq!(set.opposite(o), v, "{} opposite not an involution at {v}", set.kind());
        let c = set.c(v);
        assert_eq!(set.c(o), [-c[0], -c[1], -c[2]], "{} opposite({v})", set.kind());
    }
    assert_eq!(set.c(set.rest()), [0, 0, 0]);
}

/// Assert every face stencil partitions the directions and that the
/// unknown directions carry a sixth of the total weight, the property
/// that makes wall-density recovery exact.
pub fn assert_face_stencils_consistent(set: &DirectionSet) {
    for &edge in set.dims().edges() {
        let face = set
            .face(edge)
            .expect("every active edge has a stencil");
        let total = face.unknown().len() + face.outgoing().len() + face.tangential().len();
        assert_eq!(total, set.q(), "{} {edge} stencil is not a partition", set.kind());
        for (&u, &o) in face.unknown().iter().zip(face.outgoing()) {
            assert_eq!(set.opposite(u), o);
        }
        let w_unknown: f64 = face.unknown().iter().map(|&v| set.w(v)).sum();
        assert!(
            (w_unknown - set.cs2() / 2.0).abs() < TOL,
            "{} {edge} unknown weight {w_unknown}",
            set.kind()
        );
    }
}

/// Run all compliance checks on a direction set.
pub fn run_full_compliance(set: &DirectionSet) {
    assert_weights_normalised(set);
    assert_first_moment_vanishes(set);
    assert_second_moment_isotropic(set);
    assert_opposite_involution(set);
    assert_face_stencils_consistent(set);
}
