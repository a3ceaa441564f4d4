//! Tile assembler: folds the base tile into exact symmetry about the
//! Greenwich meridian and the equator, rotates it onto the other five cube
//! faces, and makes shared tile edges bit-identical.

use std::f64::consts::PI;

use tracing::debug;

use crate::geometry::{rot_3d_spherical, AngleUnit, Axis, SphericalPoint, EPSLN10, RADIUS};
use crate::grid::{Edge, VertexGrid};

/// Number of cube faces.
pub const NTILES: usize = 6;

/// Rotations (axis, degrees) that carry tile 0 onto tiles 1 through 5.
const TILE_ROTATIONS: [&[(Axis, f64)]; NTILES - 1] = [
    &[(Axis::Z, -90.0)],
    &[(Axis::Z, -90.0), (Axis::X, 90.0)],
    &[(Axis::Z, -180.0), (Axis::X, 90.0)],
    &[(Axis::Z, 90.0), (Axis::Y, 90.0)],
    &[(Axis::Y, 90.0), (Axis::Z, 0.0)],
];

/// Exact values forced onto the median lines of tiles that touch a pole or
/// straddle the dateline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PoleFix {
    None,
    NorthPole,
    Dateline,
    SouthPole,
}

const POLE_FIXES: [PoleFix; NTILES - 1] = [
    PoleFix::None,
    PoleFix::NorthPole,
    PoleFix::Dateline,
    PoleFix::None,
    PoleFix::SouthPole,
];

/// Copy one tile edge onto the matching edge of a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeamCopy {
    pub src_tile: usize,
    pub src_edge: Edge,
    pub dst_tile: usize,
    pub dst_edge: Edge,
    /// The source edge is walked from its far end.
    pub reversed: bool,
}

const fn seam(
    src_tile: usize,
    src_edge: Edge,
    dst_tile: usize,
    dst_edge: Edge,
    reversed: bool,
) -> SeamCopy {
    SeamCopy {
        src_tile,
        src_edge,
        dst_tile,
        dst_edge,
        reversed,
    }
}

/// The twelve shared edges of the cube, applied in this order.
pub const SEAM_COPIES: [SeamCopy; 12] = [
    seam(0, Edge::East, 1, Edge::West, false),
    seam(0, Edge::North, 2, Edge::West, true),
    seam(0, Edge::West, 4, Edge::North, true),
    seam(0, Edge::South, 5, Edge::North, false),
    seam(1, Edge::North, 2, Edge::South, false),
    seam(1, Edge::East, 3, Edge::South, true),
    seam(1, Edge::South, 5, Edge::East, true),
    seam(2, Edge::East, 3, Edge::West, false),
    seam(2, Edge::North, 4, Edge::West, true),
    seam(3, Edge::North, 4, Edge::South, false),
    seam(3, Edge::East, 5, Edge::South, true),
    seam(4, Edge::East, 5, Edge::West, false),
];

/// Build all six tiles from the base tile.
///
/// `tile0` must be square and centered on (0, 0) with longitudes in
/// [-π, π]. The returned longitudes are still in [-π, π]; see
/// [`normalize_longitudes`] and [`enforce_seams`] for the follow-up passes.
pub fn mirror_grid(mut tile0: VertexGrid) -> Vec<VertexGrid> {
    let ni = tile0.ni;
    let nip = ni + 1;
    let half = nip.div_ceil(2);
    let odd = nip % 2 == 1;
    let mid = (nip - 1) / 2;

    for j in 0..half {
        let jp = ni - j;
        for i in 0..half {
            let ip = ni - i;
            let quad = [
                tile0.index(i, j),
                tile0.index(ip, j),
                tile0.index(i, jp),
                tile0.index(ip, jp),
            ];
            fold_abs(&mut tile0.lon, quad);
            fold_abs(&mut tile0.lat, quad);

            if odd && i == mid {
                tile0.lon[quad[0]] = 0.0;
                tile0.lon[quad[2]] = 0.0;
            }
        }
    }

    let mut tiles = Vec::with_capacity(NTILES);
    for (rotations, fix) in TILE_ROTATIONS.iter().zip(POLE_FIXES) {
        let mut tile = VertexGrid::new(ni, ni);
        for j in 0..nip {
            for i in 0..nip {
                let k = tile0.index(i, j);
                let mut p = SphericalPoint {
                    lon: tile0.lon[k],
                    lat: tile0.lat[k],
                    r: RADIUS,
                };
                for &(axis, angle) in rotations.iter() {
                    p = rot_3d_spherical(axis, p, angle, AngleUnit::Degrees);
                }
                if odd {
                    apply_pole_fix(fix, i, j, mid, &mut p);
                }
                tile.lon[k] = p.lon;
                tile.lat[k] = p.lat;
            }
        }
        tiles.push(tile);
    }
    tiles.insert(0, tile0);

    debug!(ni, "mirrored base tile onto six faces");
    tiles
}

/// Average the magnitudes of four mirrored values, keeping each sign.
fn fold_abs(values: &mut [f64], quad: [usize; 4]) {
    let avg = 0.25 * quad.iter().map(|&k| values[k].abs()).sum::<f64>();
    for k in quad {
        values[k] = if values[k] >= 0.0 { avg } else { -avg };
    }
}

fn apply_pole_fix(fix: PoleFix, i: usize, j: usize, mid: usize, p: &mut SphericalPoint) {
    match fix {
        PoleFix::None => {}
        PoleFix::NorthPole => {
            if i == mid && i == j {
                p.lon = 0.0;
                p.lat = PI * 0.5;
            }
            if j == mid && i < mid {
                p.lon = 0.0;
            }
            if j == mid && i > mid {
                p.lon = PI;
            }
        }
        PoleFix::Dateline => {
            if j == mid {
                p.lon = PI;
            }
        }
        PoleFix::SouthPole => {
            if i == mid && i == j {
                p.lon = 0.0;
                p.lat = -PI * 0.5;
            }
            if i == mid && j > mid {
                p.lon = 0.0;
            }
            if i == mid && j < mid {
                p.lon = PI;
            }
        }
    }
}

/// Shift longitudes (optionally by -π/18), wrap them into [0, 2π) and snap
/// values within 1e-10 of zero to exactly zero.
pub fn normalize_longitudes(tiles: &mut [VertexGrid], shift: bool) {
    for tile in tiles.iter_mut() {
        for (lon, lat) in tile.lon.iter_mut().zip(tile.lat.iter_mut()) {
            if shift {
                *lon -= PI / 18.0;
            }
            if *lon < 0.0 {
                *lon += 2.0 * PI;
            }
            if lon.abs() < EPSLN10 {
                *lon = 0.0;
            }
            if lat.abs() < EPSLN10 {
                *lat = 0.0;
            }
        }
    }
}

/// Copy shared edges so neighboring tiles hold identical coordinates.
pub fn enforce_seams(tiles: &mut [VertexGrid]) {
    for copy in SEAM_COPIES.iter() {
        let src = &tiles[copy.src_tile];
        let n = src.edge_len(copy.src_edge);
        let last = n - 1;
        let values: Vec<(f64, f64)> = (0..n)
            .map(|k| {
                let from = if copy.reversed { last - k } else { k };
                let idx = src.edge_index(copy.src_edge, from);
                (src.lon[idx], src.lat[idx])
            })
            .collect();

        let dst = &mut tiles[copy.dst_tile];
        for (k, (lon, lat)) in values.into_iter().enumerate() {
            let idx = dst.edge_index(copy.dst_edge, k);
            dst.lon[idx] = lon;
            dst.lat[idx] = lat;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::latlon2xyz;
    use crate::gnomonic::{generate_base_tile, GridType};

    fn assembled(ni: usize) -> Vec<VertexGrid> {
        let mut base = generate_base_tile(GridType::GnomonicEd, ni).unwrap();
        base.map_in_place(|p| crate::geometry::LonLat::new(p.lon - PI, p.lat));
        let mut tiles = mirror_grid(base);
        normalize_longitudes(&mut tiles, true);
        enforce_seams(&mut tiles);
        tiles
    }

    #[test]
    fn produces_six_square_tiles() {
        let tiles = assembled(8);
        assert_eq!(tiles.len(), NTILES);
        for tile in &tiles {
            assert_eq!((tile.ni, tile.nj), (8, 8));
            assert!(tile.lon.iter().all(|&l| (0.0..2.0 * PI).contains(&l)));
        }
    }

    #[test]
    fn polar_tiles_have_exact_poles() {
        let tiles = assembled(8);
        assert_eq!(tiles[2].get(4, 4).lat, PI * 0.5);
        assert_eq!(tiles[5].get(4, 4).lat, -PI * 0.5);
    }

    #[test]
    fn seams_are_bit_identical() {
        let tiles = assembled(6);
        for copy in SEAM_COPIES.iter() {
            let src = tiles[copy.src_tile].edge_points(copy.src_edge);
            let mut dst = tiles[copy.dst_tile].edge_points(copy.dst_edge);
            if copy.reversed {
                dst.reverse();
            }
            assert_eq!(src, dst, "{copy:?}");
        }
    }

    #[test]
    fn seams_already_agree_geometrically() {
        // The copy pass only removes rounding differences.
        let mut base = generate_base_tile(GridType::GnomonicEd, 6).unwrap();
        base.map_in_place(|p| crate::geometry::LonLat::new(p.lon - PI, p.lat));
        let tiles = mirror_grid(base);
        for copy in SEAM_COPIES.iter() {
            let src = tiles[copy.src_tile].edge_points(copy.src_edge);
            let mut dst = tiles[copy.dst_tile].edge_points(copy.dst_edge);
            if copy.reversed {
                dst.reverse();
            }
            for (a, b) in src.iter().zip(&dst) {
                let d = (latlon2xyz(*a) - latlon2xyz(*b)).norm();
                assert!(d < 1e-9, "{copy:?}: {d}");
            }
        }
    }

    #[test]
    fn base_tile_is_folded_symmetric() {
        let tiles = assembled(10);
        let t0 = &tiles[0];
        for j in 0..=10 {
            for i in 0..=10 {
                assert_eq!(t0.get(i, j).lat, -t0.get(i, 10 - j).lat);
            }
        }
    }

    #[test]
    fn unshifted_tile0_is_centered_on_greenwich() {
        let mut base = generate_base_tile(GridType::GnomonicEd, 4).unwrap();
        base.map_in_place(|p| crate::geometry::LonLat::new(p.lon - PI, p.lat));
        let mut tiles = mirror_grid(base);
        normalize_longitudes(&mut tiles, false);
        let center = tiles[0].get(2, 2);
        assert_eq!(center.lon, 0.0);
        assert_eq!(center.lat, 0.0);
    }
}
