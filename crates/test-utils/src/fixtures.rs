//! Common fixtures for cubed-sphere tests.

/// Mean Earth radius used by the grid generator, in meters.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Surface area of the sphere of radius [`EARTH_RADIUS`].
pub fn sphere_area() -> f64 {
    4.0 * std::f64::consts::PI * EARTH_RADIUS * EARTH_RADIUS
}

/// Supergrid sizes (points per tile side) of common resolutions.
pub mod resolution {
    /// C12: 12 model cells per tile side.
    pub const C12: usize = 24;

    /// C24
    pub const C24: usize = 48;

    /// C48
    pub const C48: usize = 96;

    /// C96
    pub const C96: usize = 192;
}

/// Regional nest requests as
/// `(parent_tile, refine_ratio, istart, iend, jstart, jend)` in parent
/// supergrid indices.
pub mod nests {
    /// Nest spec tuple.
    pub type NestTuple = (usize, usize, usize, usize, usize, usize);

    /// Centered 3x nest in tile 6 of a C24 grid.
    pub const C24_TILE6_R3: NestTuple = (6, 3, 17, 32, 17, 32);

    /// Rectangular 2x nest in tile 2 of a C12 grid.
    pub const C12_TILE2_RECT: NestTuple = (2, 2, 5, 12, 5, 18);

    /// 2x nest inside the first nest (telescoping).
    pub const TELESCOPING_R2: NestTuple = (7, 2, 3, 10, 3, 10);
}

/// YAML snippets for configuration loader tests.
pub mod yaml {
    /// Stretched C24 grid with a single nest.
    pub const STRETCHED_NEST: &str = r#"
grid_type: gnomonic_ed
nlon: 48
shift_fac: 18.0
stretch:
  mode: schmidt
  factor: 2.5
  target_lon: 262.4
  target_lat: 35.5
nests:
  - parent_tile: 6
    refine_ratio: 3
    istart: 17
    iend: 32
    jstart: 17
    jend: 32
halo: 3
"#;

    /// Global refinement of a C24 grid.
    pub const GLOBAL_NEST: &str = r#"
nlon: 48
nests:
  - parent_tile: 0
    refine_ratio: 2
"#;

    /// Not YAML a loader can accept.
    pub const MALFORMED: &str = "nlon: [48, 48\nnests: {";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolutions_are_even() {
        for n in [
            resolution::C12,
            resolution::C24,
            resolution::C48,
            resolution::C96,
        ] {
            assert_eq!(n % 2, 0);
        }
    }

    #[test]
    fn test_nest_fixture_parity() {
        for (_, _, is, ie, js, je) in [
            nests::C24_TILE6_R3,
            nests::C12_TILE2_RECT,
            nests::TELESCOPING_R2,
        ] {
            assert_eq!(is % 2, 1);
            assert_eq!(js % 2, 1);
            assert_eq!(ie % 2, 0);
            assert_eq!(je % 2, 0);
        }
    }

    #[test]
    fn test_sphere_area() {
        assert!((sphere_area() - 5.1006447190978e14).abs() < 1.0e3);
    }
}
