//! Schmidt and cube stretching transforms.
//!
//! Both transforms apply a conformal Schmidt stretch centered on a pole of
//! the unstretched grid and then rotate that pole onto the target point, so
//! resolution is enhanced around the target by `factor`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::geometry::{LonLat, EPSLN5, EPSLN7, R2D};
use crate::grid::VertexGrid;

/// Which pole of the unstretched grid is carried to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StretchMode {
    /// Stretch about the south pole.
    Schmidt,
    /// Revised Schmidt with a half-turn pre-rotation in longitude.
    Cube,
}

/// Stretching request. Target coordinates are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StretchParams {
    pub factor: f64,
    pub target_lon: f64,
    pub target_lat: f64,
    pub mode: StretchMode,
}

impl StretchParams {
    pub fn schmidt(factor: f64, target_lon: f64, target_lat: f64) -> Self {
        Self {
            factor,
            target_lon,
            target_lat,
            mode: StretchMode::Schmidt,
        }
    }

    pub fn cube(factor: f64, target_lon: f64, target_lat: f64) -> Self {
        Self {
            factor,
            target_lon,
            target_lat,
            mode: StretchMode::Cube,
        }
    }

    /// Target point in radians.
    pub fn target(&self) -> LonLat {
        LonLat::from_degrees(self.target_lon, self.target_lat)
    }

    /// Whether the factor differs measurably from 1.
    ///
    /// A factor of 1 leaves a rigid rotation, which keeps every length and
    /// area of the unstretched grid.
    pub fn is_stretched(&self) -> bool {
        (self.factor - 1.0).abs() > EPSLN5
    }

    /// Transform every vertex of `tile` in place.
    pub fn apply(&self, tile: &mut VertexGrid) {
        match self.mode {
            StretchMode::Schmidt => direct_transform(self.factor, self.target(), tile),
            StretchMode::Cube => cube_transform(self.factor, self.target(), tile),
        }
    }
}

/// Latitude after the Schmidt stretch about the south pole.
///
/// Returns `lat` unchanged when `|1 - factor²| <= 1e-7`.
pub fn schmidt_latitude(lat: f64, factor: f64) -> f64 {
    let c2p1 = 1.0 + factor * factor;
    let c2m1 = 1.0 - factor * factor;
    if c2m1.abs() > EPSLN7 {
        let sin_lat = lat.sin();
        ((c2m1 + c2p1 * sin_lat) / (c2p1 + c2m1 * sin_lat)).asin()
    } else {
        lat
    }
}

/// Rotate the stretched point (`lon`, `lat_t`) so the south pole lands on
/// `target`. Points that land within 1e-7 of a pole are snapped onto it.
fn pole_shift(lon: f64, lat_t: f64, target: LonLat) -> LonLat {
    let sin_p = target.lat.sin();
    let cos_p = target.lat.cos();
    let sin_lat = lat_t.sin();
    let cos_lat = lat_t.cos();

    let sin_o = -(sin_p * sin_lat + cos_p * cos_lat * lon.cos());
    if 1.0 - sin_o.abs() < EPSLN7 {
        let lat = if sin_o < 0.0 { -0.5 * PI } else { 0.5 * PI };
        return LonLat::new(0.0, lat);
    }

    let mut out_lon = target.lon
        + (-cos_lat * lon.sin()).atan2(-sin_lat * cos_p + cos_lat * sin_p * lon.cos());
    if out_lon < 0.0 {
        out_lon += 2.0 * PI;
    } else if out_lon >= 2.0 * PI {
        out_lon -= 2.0 * PI;
    }
    LonLat::new(out_lon, sin_o.asin())
}

/// Schmidt transform: stretch about the south pole, then shift it to `target`.
pub fn direct_transform(factor: f64, target: LonLat, tile: &mut VertexGrid) {
    tile.map_in_place(|p| pole_shift(p.lon, schmidt_latitude(p.lat, factor), target));
}

/// Cube transform: as [`direct_transform`] with longitude pre-rotated by π.
pub fn cube_transform(factor: f64, target: LonLat, tile: &mut VertexGrid) {
    tile.map_in_place(|p| pole_shift(p.lon + PI, schmidt_latitude(p.lat, factor), target));
}

/// Target latitudes (degrees) that would place a pole exactly on a grid
/// vertex of the stretched grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetLatSuggestion {
    /// The requested target latitude.
    pub input: f64,
    /// Keeps the north pole on a vertex.
    pub north: Option<f64>,
    /// Keeps the south pole on a vertex.
    pub south: Option<f64>,
    /// Keep both poles on vertices, in search order.
    pub both: Vec<f64>,
}

/// Search the unstretched tiles for vertices whose images would be the
/// poles, and suggest nearby target latitudes. The grid is not modified.
///
/// The south pole is a fixed point of the stretch, and the pole shift
/// rotates the point (π, -lat_p) to the north pole and (π, π - lat_p) to
/// the south pole. Inverting the stretch gives the pre-image latitudes to
/// look for on the meridian at π.
pub fn suggest_target_lats(
    factor: f64,
    target: LonLat,
    tiles: &[VertexGrid],
) -> TargetLatSuggestion {
    let c2p1 = 1.0 + factor * factor;
    let c2m1 = 1.0 - factor * factor;
    let sin_p = target.lat.sin();

    let mut suggestion = TargetLatSuggestion {
        input: R2D * target.lat,
        ..Default::default()
    };
    info!(target_lat = suggestion.input, "input target latitude");

    let lam_north_pre = -((c2m1 + c2p1 * sin_p) / (c2p1 + c2m1 * sin_p)).asin();
    let lam_south_pre = -((c2m1 - c2p1 * sin_p) / (c2p1 - c2m1 * sin_p)).asin();

    let near = |p: LonLat, lam: f64| (p.lon - PI).abs() < 0.0001 && (p.lat - lam).abs() < 0.005;

    let mut north_at: Option<(usize, usize, usize)> = None;
    let mut south_at: Option<(usize, usize, usize)> = None;

    // Last match wins, scanning tiles then rows.
    for (n, tile) in tiles.iter().enumerate() {
        for j in 0..=tile.nj {
            if let Some(i) = (0..=tile.ni).find(|&i| near(tile.get(i, j), lam_north_pre)) {
                let s = tile.get(i, j).lat.sin();
                let adjusted = -((c2m1 + c2p1 * s) / (c2p1 + c2m1 * s)).asin();
                suggestion.north = Some(R2D * adjusted);
                north_at = Some((n, j, i));
                info!(
                    target_lat = R2D * adjusted,
                    "suggested target latitude to have the north pole in the grid"
                );
            }
        }
        for j in 0..=tile.nj {
            if let Some(i) = (0..=tile.ni).find(|&i| near(tile.get(i, j), lam_south_pre)) {
                let s = tile.get(i, j).lat.sin();
                let adjusted = ((c2m1 + c2p1 * s) / (c2p1 + c2m1 * s)).asin();
                suggestion.south = Some(R2D * adjusted);
                south_at = Some((n, j, i));
                info!(
                    target_lat = R2D * adjusted,
                    "suggested target latitude to have the south pole in the grid"
                );
            }
        }
    }

    let (Some((nt, nj, ni)), Some((st, sj, si))) = (north_at, south_at) else {
        return suggestion;
    };

    // Both poles are vertices when f == b for the pair of pre-images.
    let f = c2p1 / c2m1 + c2m1 / c2p1;
    let north_tile = &tiles[nt];
    let south_tile = &tiles[st];
    for i_n in ni.saturating_sub(10)..=ni + 10 {
        if i_n > north_tile.ni {
            continue;
        }
        let s_n = north_tile.get(i_n, nj).lat.sin();
        for i_s in si.saturating_sub(10)..=si + 10 {
            if i_s > south_tile.ni {
                continue;
            }
            let s_s = south_tile.get(i_s, sj).lat.sin();
            let b = -2.0 * (1.0 + s_n * s_s) / (s_n + s_s);
            if (f - b).abs() < 0.0001 {
                let adjusted = ((c2m1 + c2p1 * s_s) / (c2p1 + c2m1 * s_s)).asin();
                suggestion.both.push(R2D * adjusted);
                info!(
                    target_lat = R2D * adjusted,
                    "suggested target latitude to have both poles in the grid"
                );
            }
        }
    }

    suggestion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{great_circle_distance, D2R};

    fn single_point(lon: f64, lat: f64) -> VertexGrid {
        let mut grid = VertexGrid::new(0, 0);
        grid.set(0, 0, LonLat::new(lon, lat));
        grid
    }

    fn sample_points() -> VertexGrid {
        let mut grid = VertexGrid::new(3, 3);
        for j in 0..=3 {
            for i in 0..=3 {
                grid.set(
                    i,
                    j,
                    LonLat::new(0.4 + 0.7 * i as f64, -0.9 + 0.55 * j as f64),
                );
            }
        }
        grid
    }

    #[test]
    fn unit_factor_leaves_latitude_alone() {
        for lat in [-1.2, -0.3, 0.0, 0.8, 1.5] {
            assert_eq!(schmidt_latitude(lat, 1.0), lat);
        }
    }

    #[test]
    fn south_pole_is_a_fixed_point_of_the_stretch() {
        assert_eq!(schmidt_latitude(-0.5 * PI, 3.0), -0.5 * PI);
    }

    #[test]
    fn south_pole_maps_to_the_target() {
        let target = LonLat::from_degrees(100.0, 35.0);
        let mut grid = single_point(0.3, -0.5 * PI);
        direct_transform(3.0, target, &mut grid);
        let p = grid.get(0, 0);
        assert!((p.lon - target.lon).abs() < 1e-12);
        assert!((p.lat - target.lat).abs() < 1e-12);
    }

    #[test]
    fn unit_factor_is_a_rigid_rotation() {
        let original = sample_points();
        let mut rotated = original.clone();
        StretchParams::schmidt(1.0, 120.0, 40.0).apply(&mut rotated);

        for a in 0..original.len() {
            for b in (a + 1)..original.len() {
                let before = great_circle_distance(
                    LonLat::new(original.lon[a], original.lat[a]),
                    LonLat::new(original.lon[b], original.lat[b]),
                );
                let after = great_circle_distance(
                    LonLat::new(rotated.lon[a], rotated.lat[a]),
                    LonLat::new(rotated.lon[b], rotated.lat[b]),
                );
                assert!((before - after).abs() < 1e-5, "{before} vs {after}");
            }
        }
    }

    #[test]
    fn stretching_pulls_points_toward_the_target() {
        let target = LonLat::from_degrees(0.0, 45.0);
        let probe = LonLat::new(0.0, -80.0 * D2R);

        let mut weak = single_point(probe.lon, probe.lat);
        direct_transform(1.0, target, &mut weak);
        let mut strong = single_point(probe.lon, probe.lat);
        direct_transform(4.0, target, &mut strong);

        let d_weak = great_circle_distance(weak.get(0, 0), target);
        let d_strong = great_circle_distance(strong.get(0, 0), target);
        assert!(d_strong < d_weak);
    }

    #[test]
    fn cube_transform_pre_rotates_longitude() {
        let target = LonLat::from_degrees(250.0, -20.0);
        let mut cube = sample_points();
        cube_transform(2.5, target, &mut cube);

        let mut shifted = sample_points();
        shifted.map_in_place(|p| LonLat::new(p.lon + PI, p.lat));
        direct_transform(2.5, target, &mut shifted);

        assert_eq!(cube, shifted);
    }

    #[test]
    fn output_longitudes_are_wrapped() {
        let mut grid = sample_points();
        direct_transform(2.0, LonLat::from_degrees(350.0, 10.0), &mut grid);
        assert!(grid.lon.iter().all(|&l| (0.0..2.0 * PI).contains(&l)));
    }

    #[test]
    fn is_stretched_uses_tolerance() {
        assert!(!StretchParams::schmidt(1.0 + 1e-6, 0.0, 0.0).is_stretched());
        assert!(StretchParams::cube(1.001, 0.0, 0.0).is_stretched());
    }

    #[test]
    fn suggestions_recover_exact_pre_images() {
        let factor = 2.0;
        let target = LonLat::from_degrees(90.0, 30.0);
        let c2p1 = 1.0 + factor * factor;
        let c2m1 = 1.0 - factor * factor;
        let sin_p = target.lat.sin();
        let lam_n = -((c2m1 + c2p1 * sin_p) / (c2p1 + c2m1 * sin_p)).asin();
        let lam_s = -((c2m1 - c2p1 * sin_p) / (c2p1 - c2m1 * sin_p)).asin();

        let mut grid = VertexGrid::new(1, 0);
        grid.set(0, 0, LonLat::new(PI, lam_n));
        grid.set(1, 0, LonLat::new(PI, lam_s));
        let before = grid.clone();

        let suggestion = suggest_target_lats(factor, target, std::slice::from_ref(&grid));
        assert_eq!(grid, before);
        assert!((suggestion.input - 30.0).abs() < 1e-12);
        assert!((suggestion.north.unwrap() - 30.0).abs() < 1e-9);
        assert!((suggestion.south.unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn no_suggestion_without_pre_images() {
        let suggestion = suggest_target_lats(
            2.0,
            LonLat::from_degrees(0.0, 30.0),
            &[sample_points()],
        );
        assert_eq!(suggestion.north, None);
        assert_eq!(suggestion.south, None);
        assert!(suggestion.both.is_empty());
    }
}
