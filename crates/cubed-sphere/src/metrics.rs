//! Supergrid measurements: edge lengths, cell areas and rotation angles.
//!
//! All functions take one entity's supergrid (or, for the seam and angle
//! passes, the six contiguous global tiles) with longitudes and latitudes
//! still in radians.

use crate::geometry::{great_circle_distance, spherical_excess_area, LonLat, D2R, R2D, RADIUS};
use crate::grid::Edge;
use crate::layout::EntityDims;
use crate::mirror::NTILES;

#[inline]
fn point(x: &[f64], y: &[f64], k: usize) -> LonLat {
    LonLat::new(x[k], y[k])
}

/// Great-circle length of every i-directed supergrid edge, `nx × (ny + 1)`.
pub fn calc_dx(dims: EntityDims, x: &[f64], y: &[f64], dx: &mut [f64]) {
    let (nx, ny, nxp) = (dims.nx(), dims.ny(), dims.nxp());
    for j in 0..=ny {
        for i in 0..nx {
            let k = j * nxp + i;
            dx[j * nx + i] = great_circle_distance(point(x, y, k), point(x, y, k + 1));
        }
    }
}

/// Great-circle length of every j-directed supergrid edge, `(nx + 1) × ny`.
pub fn calc_dy(dims: EntityDims, x: &[f64], y: &[f64], dy: &mut [f64]) {
    let (ny, nxp) = (dims.ny(), dims.nxp());
    for j in 0..ny {
        for i in 0..nxp {
            let k = j * nxp + i;
            dy[j * nxp + i] = great_circle_distance(point(x, y, k), point(x, y, k + nxp));
        }
    }
}

/// dy of a square, unstretched tile from its dx by the tile's 90° symmetry.
pub fn transpose_dx_into_dy(nx: usize, dx: &[f64], dy: &mut [f64]) {
    let nxp = nx + 1;
    for j in 0..nxp {
        for i in 0..nx {
            dy[i * nxp + j] = dx[j * nx + i];
        }
    }
}

/// Where a tile's boundary dy column is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DySource {
    /// dx along the north row of a tile, walked east to west.
    DxNorthReversed(usize),
    /// dx along the south row of a tile, walked east to west.
    DxSouthReversed(usize),
    /// dy along the west column of a tile.
    DyWest(usize),
}

/// Boundary dy columns overwritten so both sides of a seam agree.
const DY_SEAM_FIXES: [(usize, Edge, DySource); 9] = [
    (0, Edge::West, DySource::DxNorthReversed(4)),
    (0, Edge::East, DySource::DyWest(1)),
    (1, Edge::East, DySource::DxSouthReversed(3)),
    (2, Edge::West, DySource::DxNorthReversed(0)),
    (2, Edge::East, DySource::DyWest(3)),
    (3, Edge::East, DySource::DxSouthReversed(5)),
    (4, Edge::West, DySource::DxNorthReversed(2)),
    (4, Edge::East, DySource::DyWest(5)),
    (5, Edge::East, DySource::DxSouthReversed(1)),
];

/// Make dy on tile boundaries equal to the matching edge lengths of the
/// neighboring tile. `dx` and `dy` start at tile 0 and hold the six global
/// tiles of `nx × nx` supergrid cells each.
pub fn enforce_dy_seams(nx: usize, dx: &[f64], dy: &mut [f64]) {
    let nxp = nx + 1;
    let tile = |t: usize| t * nx * nxp;

    for &(dst_tile, dst_edge, source) in DY_SEAM_FIXES.iter() {
        let column = match dst_edge {
            Edge::East => nx,
            _ => 0,
        };
        for j in 0..nx {
            let value = match source {
                DySource::DxNorthReversed(t) => dx[tile(t) + nx * nx + (nx - j - 1)],
                DySource::DxSouthReversed(t) => dx[tile(t) + (nx - j - 1)],
                DySource::DyWest(t) => dy[tile(t) + j * nxp],
            };
            dy[tile(dst_tile) + j * nxp + column] = value;
        }
    }
}

/// Spherical area of every supergrid cell, `nx × ny`.
pub fn calc_cell_area(dims: EntityDims, x: &[f64], y: &[f64], area: &mut [f64]) {
    let (nx, ny, nxp) = (dims.nx(), dims.ny(), dims.nxp());
    for j in 0..ny {
        for i in 0..nx {
            let ll = j * nxp + i;
            let ul = (j + 1) * nxp + i;
            area[j * nx + i] = spherical_excess_area(
                point(x, y, ll),
                point(x, y, ul),
                point(x, y, ll + 1),
                point(x, y, ul + 1),
                RADIUS,
            );
        }
    }
}

#[inline]
fn flat(nxp: isize, tile: isize, j: isize, i: isize) -> usize {
    (tile * nxp * nxp + j * nxp + i) as usize
}

/// Local grid rotation angles (degrees) of the six global tiles by centered
/// differences, crossing into the neighboring tile at the edges.
///
/// The cosine scaling is applied to `y * D2R` although `y` is in radians;
/// downstream consumers depend on these exact values.
pub fn calc_rotation_angle(
    nxp: usize,
    x: &[f64],
    y: &[f64],
    angle_dx: &mut [f64],
    angle_dy: &mut [f64],
) {
    let ntiles = NTILES as isize;
    let np = nxp as isize;
    let nx = np - 1;

    for n in 0..ntiles {
        let even = n % 2 == 0;
        for j in 0..np {
            for i in 0..np {
                let n1 = flat(np, n, j, i);
                let lon_scale = (y[n1] * D2R).cos();

                let (mut tp1, mut tm1) = (n, n);
                let (mut ip1, mut im1) = (i + 1, i - 1);
                let (mut jp1, mut jm1) = (j, j);
                if ip1 >= np {
                    if even {
                        tp1 = n + 1;
                        ip1 = 0;
                    } else {
                        tp1 = (n + 2) % ntiles;
                        ip1 = nx - j - 1;
                        jp1 = 0;
                    }
                }
                if im1 < 0 {
                    if even {
                        tm1 = (n - 2).rem_euclid(ntiles);
                        jm1 = nx;
                        im1 = nx - j;
                    } else {
                        tm1 = n - 1;
                        im1 = nx;
                    }
                }
                let n2 = flat(np, tp1, jp1, ip1);
                let n3 = flat(np, tm1, jm1, im1);
                angle_dx[n1] = (y[n2] - y[n3]).atan2((x[n2] - x[n3]) * lon_scale) * R2D;

                let (mut tp1, mut tm1) = (n, n);
                let (mut ip1, mut im1) = (i, i);
                let (mut jp1, mut jm1) = (j + 1, j - 1);
                if jp1 >= np {
                    if even {
                        tp1 = (n + 2) % ntiles;
                        jp1 = nx - i;
                        ip1 = 0;
                    } else {
                        tp1 = (n + 1) % ntiles;
                        jp1 = 0;
                    }
                }
                if jm1 < 0 {
                    if even {
                        tm1 = (n - 1).rem_euclid(ntiles);
                        jm1 = nx;
                    } else {
                        tm1 = (n - 2).rem_euclid(ntiles);
                        im1 = nx;
                        jm1 = nx - i;
                    }
                }
                let n2 = flat(np, tp1, jp1, ip1);
                let n3 = flat(np, tm1, jm1, im1);
                angle_dy[n1] = (y[n2] - y[n3]).atan2((x[n2] - x[n3]) * lon_scale) * R2D;
            }
        }
    }
}
