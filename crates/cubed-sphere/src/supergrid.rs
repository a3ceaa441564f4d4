//! Supergrid filling.
//!
//! The supergrid of an `ni × nj` grid has `(2ni + 1) × (2nj + 1)` points:
//! vertices at even (i, j), cell centers at odd (i, j), east-face midpoints
//! at (even i, odd j) and north-face midpoints at (odd i, even j).
//! Midpoints are the normalized sum of the corner unit vectors.

use nalgebra::Vector3;

use crate::geometry::{latlon2xyz, xyz2latlon, LonLat};
use crate::grid::VertexGrid;

fn unit_vectors(grid: &VertexGrid) -> Vec<Vector3<f64>> {
    grid.lon
        .iter()
        .zip(&grid.lat)
        .map(|(&lon, &lat)| latlon2xyz(LonLat::new(lon, lat)))
        .collect()
}

fn normalized_mean(sum: Vector3<f64>) -> LonLat {
    xyz2latlon(&(sum / sum.norm()))
}

/// Cell centers, `ni × nj` row-major.
pub fn cell_center(grid: &VertexGrid) -> Vec<LonLat> {
    let v = unit_vectors(grid);
    let (ni, nj) = (grid.ni, grid.nj);
    let mut out = Vec::with_capacity(ni * nj);
    for j in 0..nj {
        for i in 0..ni {
            let sum = v[grid.index(i, j)]
                + v[grid.index(i + 1, j)]
                + v[grid.index(i + 1, j + 1)]
                + v[grid.index(i, j + 1)];
            out.push(normalized_mean(sum));
        }
    }
    out
}

/// Midpoints of the i-constant cell faces, `(ni + 1) × nj` row-major.
pub fn cell_east(grid: &VertexGrid) -> Vec<LonLat> {
    let v = unit_vectors(grid);
    let (ni, nj) = (grid.ni, grid.nj);
    let mut out = Vec::with_capacity((ni + 1) * nj);
    for j in 0..nj {
        for i in 0..=ni {
            out.push(normalized_mean(v[grid.index(i, j)] + v[grid.index(i, j + 1)]));
        }
    }
    out
}

/// Midpoints of the j-constant cell faces, `ni × (nj + 1)` row-major.
pub fn cell_north(grid: &VertexGrid) -> Vec<LonLat> {
    let v = unit_vectors(grid);
    let (ni, nj) = (grid.ni, grid.nj);
    let mut out = Vec::with_capacity(ni * (nj + 1));
    for j in 0..=nj {
        for i in 0..ni {
            out.push(normalized_mean(v[grid.index(i, j)] + v[grid.index(i + 1, j)]));
        }
    }
    out
}

/// Write the supergrid of `grid` into `x` (longitude) and `y` (latitude),
/// both of length `(2ni + 1)(2nj + 1)`.
pub fn fill_supergrid(grid: &VertexGrid, x: &mut [f64], y: &mut [f64]) {
    let (ni, nj) = (grid.ni, grid.nj);
    let nxp = 2 * ni + 1;
    debug_assert_eq!(x.len(), nxp * (2 * nj + 1));
    debug_assert_eq!(y.len(), x.len());

    let mut put = |k: usize, p: LonLat| {
        x[k] = p.lon;
        y[k] = p.lat;
    };

    for j in 0..=nj {
        for i in 0..=ni {
            put(2 * j * nxp + 2 * i, grid.get(i, j));
        }
    }

    for (n, p) in cell_center(grid).into_iter().enumerate() {
        let (i, j) = (n % ni, n / ni);
        put((2 * j + 1) * nxp + 2 * i + 1, p);
    }

    for (n, p) in cell_east(grid).into_iter().enumerate() {
        let (i, j) = (n % (ni + 1), n / (ni + 1));
        put((2 * j + 1) * nxp + 2 * i, p);
    }

    for (n, p) in cell_north(grid).into_iter().enumerate() {
        let (i, j) = (n % ni, n / ni);
        put(2 * j * nxp + 2 * i + 1, p);
    }
}
