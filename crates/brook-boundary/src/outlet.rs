//! Open outlets: linear extrapolation of the unknown populations.

use brook_core::FaceStencil;
use brook_space::Grid;

/// Extrapolate the unknown populations of outlet site `site` from the two
/// sites upstream along the face's inward normal.
///
/// The line through the upstream values is evaluated at the outlet site's
/// own position, which for uniform spacing is `2 f_1 - f_2`. Returns
/// `false`, leaving the site untouched, when either upstream site is off
/// the grid.
pub fn extrapolate(grid: &mut Grid, site: usize, face: &FaceStencil) -> bool {
    let n = face.normal();
    let ijk = grid.ijk(site);
    let up1 = [ijk[0] + n[0], ijk[1] + n[1], ijk[2] + n[2]];
    let up2 = [ijk[0] + 2 * n[0], ijk[1] + 2 * n[1], ijk[2] + 2 * n[2]];
    let (Some(s1), Some(s2)) = (grid.site(up1), grid.site(up2)) else {
        return false;
    };

    let axis = face.edge().axis();
    let a = axis.index();
    let positions = grid.positions(axis);
    let x0 = positions[ijk[a] as usize];
    let x1 = positions[up1[a] as usize];
    let x2 = positions[up2[a] as usize];
    let weight = (x0 - x1) / (x2 - x1);

    for &v in face.unknown() {
        let f1 = grid.f(s1, v);
        let f2 = grid.f(s2, v);
        grid.set_f(site, v, f1 + (f2 - f1) * weight);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_core::{DirectionSet, Edge, LatticeKind};

    #[test]
    fn linear_profiles_are_exact() {
        let lattice = DirectionSet::new(LatticeKind::D2Q9);
        let mut grid = Grid::builder(LatticeKind::D2Q9, [5, 2, 1])
            .spacing(0.25)
            .build()
            .unwrap();
        for s in 0..grid.site_count() {
            let i = grid.ijk(s)[0];
            for v in 0..9 {
                grid.set_f(s, v, 0.1 + 0.01 * v as f64 + 0.002 * f64::from(i));
            }
        }
        let face = lattice.face(Edge::XMax).unwrap();
        let outlet = grid.site([4, 1, 0]).unwrap();
        for &v in face.unknown() {
            grid.set_f(outlet, v, -1.0);
        }
        assert!(extrapolate(&mut grid, outlet, face));
        for &v in face.unknown() {
            let expected = 0.1 + 0.01 * v as f64 + 0.008;
            assert!((grid.f(outlet, v) - expected).abs() < 1e-14, "direction {v}");
        }
        // Known directions are untouched.
        assert!((grid.f(outlet, 0) - 0.108).abs() < 1e-15);
    }

    #[test]
    fn short_upstream_leaves_site_unchanged() {
        let lattice = DirectionSet::new(LatticeKind::D3Q19);
        let mut grid = Grid::builder(LatticeKind::D3Q19, [2, 3, 3]).build().unwrap();
        let face = lattice.face(Edge::XMax).unwrap();
        let site = grid.site([1, 1, 1]).unwrap();
        grid.set_f(site, face.unknown()[0], 7.0);
        assert!(!extrapolate(&mut grid, site, face));
        assert_eq!(grid.f(site, face.unknown()[0]), 7.0);
    }

    #[test]
    fn lower_faces_extrapolate_upward() {
        let lattice = DirectionSet::new(LatticeKind::D3Q27);
        let mut grid = Grid::builder(LatticeKind::D3Q27, [2, 2, 4]).build().unwrap();
        for s in 0..grid.site_count() {
            let k = grid.ijk(s)[2];
            for v in 0..27 {
                grid.set_f(s, v, 1.0 + f64::from(k));
            }
        }
        let face = lattice.face(Edge::ZMin).unwrap();
        let site = grid.site([1, 0, 0]).unwrap();
        assert!(extrapolate(&mut grid, site, face));
        for &v in face.unknown() {
            assert!((grid.f(site, v) - 1.0).abs() < 1e-14);
        }
    }
}
