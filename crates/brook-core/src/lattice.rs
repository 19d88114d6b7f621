//! Discrete velocity sets and the per-face stencils derived from them.
//!
//! # Numbering
//!
//! All sets share one convention: opposite directions occupy adjacent
//! indices `(2m, 2m + 1)` and the rest direction is the last index. The
//! D3Q27 set extends D3Q19 by inserting the eight corner directions before
//! the rest direction.
//!
//! # Face stencils
//!
//! Boundary reconstruction needs to know, for a wall with a given
//! orientation, which populations streaming could not supply. Rather than
//! hardcoding index lists per lattice, every [`DirectionSet`] computes a
//! [`FaceStencil`] for each active face once at construction.

use crate::edge::{Axis, Edge};
use crate::error::SetupError;
use crate::id::Dimensionality;
use smallvec::SmallVec;
use std::fmt;

const D2Q9_C: [[i32; 3]; 9] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [1, 1, 0],
    [-1, -1, 0],
    [1, -1, 0],
    [-1, 1, 0],
    [0, 0, 0],
];

const D2Q9_W: [f64; 9] = [
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    4.0 / 9.0,
];

const D3Q19_C: [[i32; 3]; 19] = [
    [1, 0, 0], // 0-5: faces
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
    [1, 1, 0], // 6-17: edges
    [-1, -1, 0],
    [1, -1, 0],
    [-1, 1, 0],
    [0, 1, 1],
    [0, -1, -1],
    [0, 1, -1],
    [0, -1, 1],
    [1, 0, 1],
    [-1, 0, -1],
    [-1, 0, 1],
    [1, 0, -1],
    [0, 0, 0], // 18: rest
];

const D3Q19_W: [f64; 19] = [
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 3.0,
];

const D3Q27_C: [[i32; 3]; 27] = [
    [1, 0, 0], // 0-5: faces
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
    [1, 1, 0], // 6-17: edges
    [-1, -1, 0],
    [1, -1, 0],
    [-1, 1, 0],
    [0, 1, 1],
    [0, -1, -1],
    [0, 1, -1],
    [0, -1, 1],
    [1, 0, 1],
    [-1, 0, -1],
    [-1, 0, 1],
    [1, 0, -1],
    [1, 1, 1], // 18-25: corners
    [-1, -1, -1],
    [1, 1, -1],
    [-1, -1, 1],
    [1, -1, 1],
    [-1, 1, -1],
    [-1, 1, 1],
    [1, -1, -1],
    [0, 0, 0], // 26: rest
];

const D3Q27_W: [f64; 27] = [
    2.0 / 27.0,
    2.0 / 27.0,
    2.0 / 27.0,
    2.0 / 27.0,
    2.0 / 27.0,
    2.0 / 27.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
    8.0 / 27.0,
];

/// Which discrete velocity set a grid uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LatticeKind {
    /// Two-dimensional, nine velocities.
    D2Q9,
    /// Three-dimensional, nineteen velocities.
    D3Q19,
    /// Three-dimensional, twenty-seven velocities.
    D3Q27,
}

impl LatticeKind {
    /// Number of discrete velocities.
    pub fn q(self) -> usize {
        self.velocities().len()
    }

    /// Dimensionality the set is defined for.
    pub fn dims(self) -> Dimensionality {
        match self {
            Self::D2Q9 => Dimensionality::Two,
            Self::D3Q19 | Self::D3Q27 => Dimensionality::Three,
        }
    }

    fn velocities(self) -> &'static [[i32; 3]] {
        match self {
            Self::D2Q9 => &D2Q9_C,
            Self::D3Q19 => &D3Q19_C,
            Self::D3Q27 => &D3Q27_C,
        }
    }

    fn weights(self) -> &'static [f64] {
        match self {
            Self::D2Q9 => &D2Q9_W,
            Self::D3Q19 => &D3Q19_W,
            Self::D3Q27 => &D3Q27_W,
        }
    }
}

impl fmt::Display for LatticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::D2Q9 => "D2Q9",
            Self::D3Q19 => "D3Q19",
            Self::D3Q27 => "D3Q27",
        };
        f.write_str(name)
    }
}

/// Direction classification for one wall orientation.
///
/// For a boundary site on `edge`, with `n` the unit normal pointing into
/// the domain:
///
/// - *unknown* directions have `c . n > 0`; streaming had no upstream site
///   to take them from, so reconstruction must produce them;
/// - *outgoing* directions are their opposites (`c . n < 0`), listed so
///   that `outgoing()[m] == opposite(unknown()[m])`;
/// - *tangential* directions have `c . n == 0` (the rest direction included).
///
/// `transverse()` lists, for each active axis parallel to the wall, the sum
/// of `c_t^2` over the unknown directions. Zou-He transverse momentum
/// corrections are normalised by it.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceStencil {
    edge: Edge,
    normal: [i32; 3],
    unknown: SmallVec<[usize; 9]>,
    outgoing: SmallVec<[usize; 9]>,
    tangential: SmallVec<[usize; 9]>,
    transverse: SmallVec<[(Axis, f64); 2]>,
}

impl FaceStencil {
    fn build(edge: Edge, c: &[[i32; 3]], opposite: &[usize], dims: Dimensionality) -> Self {
        let normal = edge.inward_normal();
        let mut unknown: SmallVec<[usize; 9]> = SmallVec::new();
        let mut outgoing: SmallVec<[usize; 9]> = SmallVec::new();
        let mut tangential: SmallVec<[usize; 9]> = SmallVec::new();
        for (v, cv) in c.iter().enumerate() {
            match dot_i(cv, &normal) {
                d if d > 0 => {
                    unknown.push(v);
                    outgoing.push(opposite[v]);
                }
                0 => tangential.push(v),
                _ => {}
            }
        }
        let transverse = dims
            .axes()
            .iter()
            .filter(|axis| **axis != edge.axis())
            .map(|&axis| {
                let s: i32 = unknown.iter().map(|&v| c[v][axis.index()].pow(2)).sum();
                (axis, f64::from(s))
            })
            .collect();
        Self {
            edge,
            normal,
            unknown,
            outgoing,
            tangential,
            transverse,
        }
    }

    /// The wall this stencil describes.
    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Unit normal pointing into the domain.
    pub fn normal(&self) -> [i32; 3] {
        self.normal
    }

    /// Directions reconstruction has to supply.
    pub fn unknown(&self) -> &[usize] {
        &self.unknown
    }

    /// Opposites of [`unknown`](Self::unknown), index-aligned.
    pub fn outgoing(&self) -> &[usize] {
        &self.outgoing
    }

    /// Directions parallel to the wall, rest direction included.
    pub fn tangential(&self) -> &[usize] {
        &self.tangential
    }

    /// Transverse axes with their `sum(c_t^2)` normaliser.
    pub fn transverse(&self) -> &[(Axis, f64)] {
        &self.transverse
    }
}

/// A discrete velocity set with its derived mappings.
///
/// Built once per grid. Holds the velocity vectors and weights of the
/// chosen [`LatticeKind`], the bounce-back (`opposite`) and specular
/// (`reflect`) pairings, and one [`FaceStencil`] per active face.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionSet {
    kind: LatticeKind,
    c: &'static [[i32; 3]],
    w: &'static [f64],
    opposite: Vec<usize>,
    reflect: [Vec<usize>; 3],
    faces: Vec<FaceStencil>,
}

impl DirectionSet {
    /// Squared lattice sound speed, `1/3` for every supported set.
    pub const CS2: f64 = 1.0 / 3.0;

    /// Build the direction set for `kind`.
    ///
    /// # Examples
    ///
    /// ```
    /// use brook_core::{DirectionSet, LatticeKind};
    ///
    /// let d2q9 = DirectionSet::new(LatticeKind::D2Q9);
    /// assert_eq!(d2q9.q(), 9);
    /// assert_eq!(d2q9.opposite(0), 1);
    /// assert_eq!(d2q9.opposite(d2q9.rest()), d2q9.rest());
    /// ```
    pub fn new(kind: LatticeKind) -> Self {
        let c = kind.velocities();
        let w = kind.weights();
        let dims = kind.dims();

        let opposite = (0..c.len())
            .map(|v| find_direction(c, [-c[v][0], -c[v][1], -c[v][2]]).unwrap_or(v))
            .collect::<Vec<_>>();
        debug_assert!(
            (0..c.len()).all(|v| c[opposite[v]] == c[v].map(|x| -x)),
            "{kind} is not closed under negation"
        );

        let reflect = [Axis::X, Axis::Y, Axis::Z].map(|axis| {
            (0..c.len())
                .map(|v| {
                    let mut r = c[v];
                    r[axis.index()] = -r[axis.index()];
                    find_direction(c, r).unwrap_or(v)
                })
                .collect::<Vec<_>>()
        });
        debug_assert!(
            reflect.iter().zip([0, 1, 2]).all(|(table, a)| {
                (0..c.len()).all(|v| {
                    let mut r = c[v];
                    r[a] = -r[a];
                    c[table[v]] == r
                })
            }),
            "{kind} is not closed under reflection"
        );

        let faces = dims
            .edges()
            .iter()
            .map(|&edge| FaceStencil::build(edge, c, &opposite, dims))
            .collect();

        Self {
            kind,
            c,
            w,
            opposite,
            reflect,
            faces,
        }
    }

    /// Build the direction set for `kind`, checking it matches `dims`.
    pub fn for_dims(kind: LatticeKind, dims: Dimensionality) -> Result<Self, SetupError> {
        if kind.dims() != dims {
            return Err(SetupError::LatticeMismatch {
                lattice: kind,
                dims,
            });
        }
        Ok(Self::new(kind))
    }

    /// Which velocity set this is.
    pub fn kind(&self) -> LatticeKind {
        self.kind
    }

    /// Dimensionality of the set.
    pub fn dims(&self) -> Dimensionality {
        self.kind.dims()
    }

    /// Number of directions.
    pub fn q(&self) -> usize {
        self.c.len()
    }

    /// Index of the rest (zero) direction.
    pub fn rest(&self) -> usize {
        self.c.len() - 1
    }

    /// Velocity vector of direction `v` (z component zero in 2D).
    pub fn c(&self, v: usize) -> [i32; 3] {
        self.c[v]
    }

    /// All velocity vectors in index order.
    pub fn velocities(&self) -> &[[i32; 3]] {
        self.c
    }

    /// Weight of direction `v`.
    pub fn w(&self, v: usize) -> f64 {
        self.w[v]
    }

    /// All weights in index order.
    pub fn weights(&self) -> &[f64] {
        self.w
    }

    /// Lattice sound speed.
    pub fn cs(&self) -> f64 {
        Self::CS2.sqrt()
    }

    /// Squared lattice sound speed.
    pub fn cs2(&self) -> f64 {
        Self::CS2
    }

    /// Bounce-back partner of `v`. The rest direction maps to itself.
    pub fn opposite(&self, v: usize) -> usize {
        self.opposite[v]
    }

    /// Specular partner of `v` off a wall lying on `edge`: the direction
    /// with the wall-normal component negated.
    pub fn reflect(&self, v: usize, edge: Edge) -> usize {
        self.reflect[edge.axis().index()][v]
    }

    /// Stencil for a wall on `edge`, or `None` for a z face of a 2D set.
    pub fn face(&self, edge: Edge) -> Option<&FaceStencil> {
        self.faces.iter().find(|face| face.edge == edge)
    }

    /// `c_v . u`.
    #[inline]
    pub fn dot(&self, v: usize, u: [f64; 3]) -> f64 {
        let c = self.c[v];
        f64::from(c[0]) * u[0] + f64::from(c[1]) * u[1] + f64::from(c[2]) * u[2]
    }

    /// Density and velocity of a population vector.
    ///
    /// A zero density yields a zero velocity rather than a division by zero.
    pub fn moments(&self, f: &[f64]) -> (f64, [f64; 3]) {
        let mut rho = 0.0;
        let mut momentum = [0.0; 3];
        for (v, &fv) in f.iter().enumerate().take(self.q()) {
            rho += fv;
            for (a, m) in momentum.iter_mut().enumerate() {
                *m += fv * f64::from(self.c[v][a]);
            }
        }
        if rho == 0.0 {
            return (rho, [0.0; 3]);
        }
        (rho, momentum.map(|m| m / rho))
    }
}

fn dot_i(a: &[i32; 3], b: &[i32; 3]) -> i32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn find_direction(c: &[[i32; 3]], target: [i32; 3]) -> Option<usize> {
    c.iter().position(|cv| *cv == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    const KINDS: [LatticeKind; 3] = [LatticeKind::D2Q9, LatticeKind::D3Q19, LatticeKind::D3Q27];

    #[test]
    fn sizes_and_dims() {
        assert_eq!(LatticeKind::D2Q9.q(), 9);
        assert_eq!(LatticeKind::D3Q19.q(), 19);
        assert_eq!(LatticeKind::D3Q27.q(), 27);
        assert_eq!(LatticeKind::D2Q9.dims(), Dimensionality::Two);
        assert_eq!(LatticeKind::D3Q27.dims(), Dimensionality::Three);
    }

    #[test]
    fn every_set_is_closed_under_negation_and_reflection() {
        for kind in KINDS {
            let c = kind.velocities();
            for cv in c {
                assert!(find_direction(c, (*cv).map(|x| -x)).is_some(), "{kind} {cv:?}");
                for a in 0..3 {
                    let mut r = *cv;
                    r[a] = -r[a];
                    assert!(find_direction(c, r).is_some(), "{kind} {cv:?} axis {a}");
                }
            }
        }
        assert_eq!(find_direction(LatticeKind::D2Q9.velocities(), [2, 0, 0]), None);
    }

    #[test]
    fn opposite_pairs_are_adjacent() {
        for kind in KINDS {
            let set = DirectionSet::new(kind);
            for v in 0..set.rest() {
                let expected = if v % 2 == 0 { v + 1 } else { v - 1 };
                assert_eq!(set.opposite(v), expected, "{kind} direction {v}");
            }
            assert_eq!(set.opposite(set.rest()), set.rest());
        }
    }

    #[test]
    fn d3q27_extends_d3q19() {
        let q19 = DirectionSet::new(LatticeKind::D3Q19);
        let q27 = DirectionSet::new(LatticeKind::D3Q27);
        for v in 0..18 {
            assert_eq!(q19.c(v), q27.c(v));
        }
        assert_eq!(q27.c(q27.rest()), [0, 0, 0]);
    }

    #[test]
    fn reflect_negates_only_normal_component() {
        let set = DirectionSet::new(LatticeKind::D3Q19);
        // (+x+y) off an x wall becomes (-x+y).
        assert_eq!(set.reflect(6, Edge::XMin), 9);
        // Same pairing from either side of the box.
        assert_eq!(set.reflect(6, Edge::XMax), 9);
        // Directions parallel to the wall are unchanged.
        assert_eq!(set.reflect(2, Edge::XMin), 2);
        assert_eq!(set.reflect(set.rest(), Edge::ZMax), set.rest());
    }

    #[test]
    fn left_face_unknowns_match_classic_numbering() {
        let d2q9 = DirectionSet::new(LatticeKind::D2Q9);
        let face = d2q9.face(Edge::XMin).unwrap();
        assert_eq!(face.unknown(), &[0, 4, 6]);
        assert_eq!(face.outgoing(), &[1, 5, 7]);
        assert_eq!(face.tangential(), &[2, 3, 8]);
        assert_eq!(face.transverse(), &[(Axis::Y, 2.0)]);

        let d3q19 = DirectionSet::new(LatticeKind::D3Q19);
        let face = d3q19.face(Edge::XMin).unwrap();
        assert_eq!(face.unknown(), &[0, 6, 8, 14, 17]);
        assert_eq!(face.outgoing(), &[1, 7, 9, 15, 16]);
        assert_eq!(face.tangential(), &[2, 3, 4, 5, 10, 11, 12, 13, 18]);
        assert_eq!(face.transverse(), &[(Axis::Y, 2.0), (Axis::Z, 2.0)]);
    }

    #[test]
    fn right_face_unknowns_are_outlet_set() {
        let d2q9 = DirectionSet::new(LatticeKind::D2Q9);
        assert_eq!(d2q9.face(Edge::XMax).unwrap().unknown(), &[1, 5, 7]);
        let d3q19 = DirectionSet::new(LatticeKind::D3Q19);
        assert_eq!(
            d3q19.face(Edge::XMax).unwrap().unknown(),
            &[1, 7, 9, 15, 16]
        );
    }

    #[test]
    fn d3q27_face_has_nine_unknowns() {
        let set = DirectionSet::new(LatticeKind::D3Q27);
        for &edge in Dimensionality::Three.edges() {
            let face = set.face(edge).unwrap();
            assert_eq!(face.unknown().len(), 9);
            assert_eq!(face.tangential().len(), 9);
            for &(_, s) in face.transverse() {
                assert_eq!(s, 6.0);
            }
        }
    }

    #[test]
    fn z_faces_absent_in_2d() {
        let set = DirectionSet::new(LatticeKind::D2Q9);
        assert!(set.face(Edge::ZMin).is_none());
        assert!(set.face(Edge::ZMax).is_none());
    }

    #[test]
    fn for_dims_rejects_mismatch() {
        assert!(DirectionSet::for_dims(LatticeKind::D2Q9, Dimensionality::Two).is_ok());
        assert_eq!(
            DirectionSet::for_dims(LatticeKind::D3Q19, Dimensionality::Two),
            Err(SetupError::LatticeMismatch {
                lattice: LatticeKind::D3Q19,
                dims: Dimensionality::Two,
            })
        );
    }

    #[test]
    fn moments_of_weights_are_unit_density_at_rest() {
        for kind in KINDS {
            let set = DirectionSet::new(kind);
            let (rho, u) = set.moments(set.weights());
            assert!((rho - 1.0).abs() < 1e-14);
            assert!(u.iter().all(|c| c.abs() < 1e-14));
        }
        let set = DirectionSet::new(LatticeKind::D2Q9);
        assert_eq!(set.moments(&[0.0; 9]), (0.0, [0.0; 3]));
    }

    // ── Compliance suites ───────────────────────────────────────

    #[test]
    fn compliance_d2q9() {
        compliance::run_full_compliance(&DirectionSet::new(LatticeKind::D2Q9));
    }

    #[test]
    fn compliance_d3q19() {
        compliance::run_full_compliance(&DirectionSet::new(LatticeKind::D3Q19));
    }

    #[test]
    fn compliance_d3q27() {
        compliance::run_full_compliance(&DirectionSet::new(LatticeKind::D3Q27));
    }

    // ── Property tests ──────────────────────────────────────────

    fn arb_kind() -> impl Strategy<Value = LatticeKind> {
        prop_oneof![
            Just(LatticeKind::D2Q9),
            Just(LatticeKind::D3Q19),
            Just(LatticeKind::D3Q27),
        ]
    }

    proptest! {
        #[test]
        fn opposite_is_involution(kind in arb_kind(), v in 0usize..27) {
            let set = DirectionSet::new(kind);
            let v = v % set.q();
            prop_assert_eq!(set.opposite(set.opposite(v)), v);
            let c = set.c(v);
            let o = set.c(set.opposite(v));
            prop_assert_eq!([-c[0], -c[1], -c[2]], o);
        }

        #[test]
        fn reflect_is_involution(kind in arb_kind(), v in 0usize..27, e in 0usize..6) {
            let set = DirectionSet::new(kind);
            let v = v % set.q();
            let edge = Edge::ALL[e];
            prop_assert_eq!(set.reflect(set.reflect(v, edge), edge), v);
        }
    }
}
