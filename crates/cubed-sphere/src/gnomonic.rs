//! Base gnomonic tile generator.
//!
//! Builds the canonical cube face centered at longitude π on the equator,
//! then enforces exact four-fold symmetry about the face medians.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::geometry::{latlon2xyz, mirror_latlon, xyz2latlon};
use crate::grid::VertexGrid;

/// Gnomonic projection variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridType {
    /// Equal edge spacing along the face edges.
    GnomonicEd,
    /// Equidistant variant.
    GnomonicDist,
    /// Equiangular variant.
    GnomonicAngl,
}

impl GridType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridType::GnomonicEd => "gnomonic_ed",
            GridType::GnomonicDist => "gnomonic_dist",
            GridType::GnomonicAngl => "gnomonic_angl",
        }
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gnomonic_ed" => Ok(GridType::GnomonicEd),
            "gnomonic_dist" => Ok(GridType::GnomonicDist),
            "gnomonic_angl" => Ok(GridType::GnomonicAngl),
            other => Err(GridError::UnsupportedGridType(other.to_string())),
        }
    }
}

/// Generate and symmetrize the base tile with `ni` cells per side.
pub fn generate_base_tile(grid_type: GridType, ni: usize) -> Result<VertexGrid> {
    let mut tile = match grid_type {
        GridType::GnomonicEd => gnomonic_ed(ni),
        GridType::GnomonicDist => return Err(GridError::NotImplemented("gnomonic_dist")),
        GridType::GnomonicAngl => return Err(GridError::NotImplemented("gnomonic_angl")),
    };
    symm_ed(&mut tile);
    Ok(tile)
}

/// Equal-edge gnomonic face on the plane `x = -1/√3`.
///
/// The west and east edges are spaced evenly in latitude; the south and
/// north edges are their mirror images across the face diagonal. Interior
/// points are the intersections of the edge lines on the cube face.
pub fn gnomonic_ed(ni: usize) -> VertexGrid {
    let nip = ni + 1;
    let mut tile = VertexGrid::new(ni, ni);

    let rsq3 = 1.0 / 3.0_f64.sqrt();
    let alpha = rsq3.asin();
    let dely = 2.0 * alpha / ni as f64;

    for j in 0..nip {
        let w = tile.index(0, j);
        let e = tile.index(ni, j);
        tile.lon[w] = 0.75 * PI;
        tile.lon[e] = 1.25 * PI;
        tile.lat[w] = -alpha + dely * j as f64;
        tile.lat[e] = tile.lat[w];
    }

    let corner_sw = tile.get(0, 0);
    let corner_ne = tile.get(ni, ni);
    for i in 1..ni {
        let p = mirror_latlon(corner_sw, corner_ne, tile.get(0, i));
        let s = tile.index(i, 0);
        let n = tile.index(i, ni);
        tile.lon[s] = p.lon;
        tile.lat[s] = p.lat;
        tile.lon[n] = p.lon;
        tile.lat[n] = -p.lat;
    }

    // Project the west column and south row back onto the cube face.
    let mut y = vec![0.0; nip * nip];
    let mut z = vec![0.0; nip * nip];
    for k in 1..ni {
        for idx in [tile.index(0, k), tile.index(k, 0)] {
            let v = latlon2xyz(tile.get(idx % nip, idx / nip));
            y[idx] = -v.y * rsq3 / v.x;
            z[idx] = -v.z * rsq3 / v.x;
        }
    }
    for &(i, j) in &[(0, 0), (ni, 0), (0, ni), (ni, ni)] {
        let idx = tile.index(i, j);
        let v = latlon2xyz(tile.get(i, j));
        y[idx] = v.y;
        z[idx] = v.z;
    }
    for j in 1..nip {
        for i in 1..nip {
            y[j * nip + i] = y[i];
            z[j * nip + i] = z[j * nip];
        }
    }

    for idx in 0..nip * nip {
        let p = xyz2latlon(&nalgebra::Vector3::new(-rsq3, y[idx], z[idx]));
        tile.lon[idx] = p.lon;
        tile.lat[idx] = p.lat;
    }

    tile
}

/// Make the tile symmetric about `i = ni/2` and `j = ni/2`.
pub fn symm_ed(tile: &mut VertexGrid) {
    let ni = tile.ni;
    let nip = ni + 1;
    let lon = &mut tile.lon;
    let lat = &mut tile.lat;

    for j in 1..nip {
        for i in 1..ni {
            lon[j * nip + i] = lon[i];
        }
    }

    for j in 0..nip {
        for i in 0..ni / 2 {
            let a = j * nip + i;
            let b = j * nip + (ni - i);
            let avg = 0.5 * (lon[a] - lon[b]);
            lon[a] = avg + PI;
            lon[b] = PI - avg;
            let avg = 0.5 * (lat[a] + lat[b]);
            lat[a] = avg;
            lat[b] = avg;
        }
    }

    for j in 0..ni / 2 {
        let jp = ni - j;
        for i in 1..ni {
            let a = j * nip + i;
            let b = jp * nip + i;
            let avg = 0.5 * (lon[a] + lon[b]);
            lon[a] = avg;
            lon[b] = avg;
            let avg = 0.5 * (lat[a] - lat[b]);
            lat[a] = avg;
            lat[b] = -avg;
        }
    }
}
