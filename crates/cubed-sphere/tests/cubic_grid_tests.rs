//! End-to-end tests of cubed-sphere grid generation.

use cubed_sphere::mirror::NTILES;
use cubed_sphere::{
    create_gnomonic_cubic_grid, create_gnomonic_cubic_grid_gr, CubicGrid, CubicGridConfig,
    GridBuilder, GridError, MultiNestBuilder, NestSpec, StretchParams,
};
use test_utils::nests::NestTuple;
use test_utils::{
    assert_approx_eq, assert_rel_approx_eq, max_abs_diff, max_lon_diff_deg, nests, resolution,
    sphere_area,
};

fn nest(t: NestTuple) -> NestSpec {
    NestSpec::regional(t.0, t.1, t.2, t.3, t.4, t.5)
}

fn build(config: &CubicGridConfig) -> CubicGrid {
    create_gnomonic_cubic_grid(config).expect("grid generation failed")
}

// ============================================================================
// Global tiles
// ============================================================================

#[test]
fn test_c48_buffer_sizes() {
    let grid = build(&CubicGridConfig::uniform(resolution::C48));
    assert_eq!(grid.entity_count(), NTILES);
    assert_eq!(grid.x.len(), NTILES * 97 * 97);
    assert_eq!(grid.area.len(), NTILES * 96 * 96);

    let lengths = grid.lengths.as_ref().unwrap();
    assert_eq!(lengths.dx.len(), NTILES * 96 * 97);
    assert_eq!(lengths.dy.len(), NTILES * 97 * 96);
    assert_eq!(lengths.angle_dx.len(), grid.x.len());

    for tile in grid.tiles() {
        assert_eq!((tile.nx(), tile.ny()), (96, 96));
    }
}

#[test]
fn test_coordinates_in_range_and_shifted() {
    let grid = build(&CubicGridConfig::uniform(resolution::C24));
    assert!(grid.x.iter().all(|&x| (0.0..360.0).contains(&x)));
    assert!(grid.y.iter().all(|&y| (-90.0..=90.0).contains(&y)));

    // Tile 1 center moves from Greenwich to 350°E.
    let tile = grid.tile(0);
    let center = 24 * tile.nxp() + 24;
    assert_approx_eq!(tile.x[center], 350.0, 1e-10);
    assert_approx_eq!(tile.y[center], 0.0, 1e-10);
}

#[test]
fn test_unshifted_grid_centers_tile1_on_greenwich() {
    let config = CubicGridConfig {
        shift_fac: 0.0,
        ..CubicGridConfig::uniform(resolution::C24)
    };
    let grid = build(&config);
    let tile = grid.tile(0);
    let x = tile.x[24 * tile.nxp() + 24];
    assert!(x.abs() < 1e-10 || (x - 360.0).abs() < 1e-10, "x = {x}");
}

#[test]
fn test_polar_tiles_contain_poles() {
    let grid = build(&CubicGridConfig::uniform(resolution::C12));
    let nxp = 25;
    assert_approx_eq!(grid.tile(2).y[12 * nxp + 12], 90.0, 1e-12);
    assert_approx_eq!(grid.tile(5).y[12 * nxp + 12], -90.0, 1e-12);
}

#[test]
fn test_total_area_is_sphere() {
    let grid = build(&CubicGridConfig::uniform(resolution::C24));
    assert_rel_approx_eq!(grid.global_area(), sphere_area(), 1e-9);

    let per_tile: Vec<f64> = grid.tiles().map(|t| t.area.iter().sum()).collect();
    for a in &per_tile[1..] {
        assert_eq!(*a, per_tile[0]);
    }
}

#[test]
fn test_east_west_seam_is_bit_identical() {
    let grid = build(&CubicGridConfig::uniform(resolution::C24));
    let (t0, t1) = (grid.tile(0), grid.tile(1));
    let nxp = t0.nxp();
    for jj in 0..t0.nyp() {
        assert_eq!(t0.x[jj * nxp + nxp - 1], t1.x[jj * nxp]);
        assert_eq!(t0.y[jj * nxp + nxp - 1], t1.y[jj * nxp]);
    }

    let (dy0, dy1) = (t0.dy.unwrap(), t1.dy.unwrap());
    for j in 0..t0.ny() {
        assert_eq!(dy0[j * nxp + nxp - 1], dy1[j * nxp]);
    }
}

#[test]
fn test_edge_lengths_are_positive_and_bounded() {
    let grid = build(&CubicGridConfig::uniform(resolution::C24));
    let lengths = grid.lengths.as_ref().unwrap();
    // A C24 supergrid edge is a couple of hundred km.
    for &d in lengths.dx.iter().chain(&lengths.dy) {
        assert!(d > 20_000.0 && d < 400_000.0, "edge length {d}");
    }
}

#[test]
fn test_rotation_angles_are_finite() {
    let grid = build(&CubicGridConfig::uniform(resolution::C12));
    let lengths = grid.lengths.as_ref().unwrap();
    assert!(lengths
        .angle_dx
        .iter()
        .chain(&lengths.angle_dy)
        .all(|a| a.is_finite()));
}

#[test]
fn test_no_length_angle_output() {
    let config = CubicGridConfig {
        output_length_angle: false,
        ..CubicGridConfig::uniform(resolution::C12)
    };
    let grid = build(&config);
    assert!(grid.lengths.is_none());
    assert_rel_approx_eq!(grid.global_area(), sphere_area(), 1e-9);
}

// ============================================================================
// Stretching
// ============================================================================

#[test]
fn test_schmidt_factor_one_preserves_metrics() {
    let plain = build(&CubicGridConfig {
        shift_fac: 0.0,
        ..CubicGridConfig::uniform(resolution::C12)
    });
    let rotated = build(
        &CubicGridConfig::uniform(resolution::C12)
            .with_stretch(StretchParams::schmidt(1.0, 101.3, 33.7)),
    );

    for (a, b) in plain.area.iter().zip(&rotated.area) {
        assert_rel_approx_eq!(*a, *b, 1e-6);
    }
    let (p, r) = (plain.lengths.unwrap(), rotated.lengths.unwrap());
    for (a, b) in p.dx.iter().zip(&r.dx) {
        assert_rel_approx_eq!(*a, *b, 1e-6);
    }
}

#[test]
fn test_stretched_grids_still_cover_the_sphere() {
    for stretch in [
        StretchParams::schmidt(3.0, 262.4, 35.5),
        StretchParams::cube(2.0, 0.0, 45.0),
    ] {
        let grid = build(&CubicGridConfig::uniform(resolution::C24).with_stretch(stretch));
        assert_rel_approx_eq!(grid.global_area(), sphere_area(), 1e-9);
    }
}

#[test]
fn test_schmidt_concentrates_resolution_at_target() {
    let grid = build(
        &CubicGridConfig::uniform(resolution::C24)
            .with_stretch(StretchParams::schmidt(3.0, 0.0, 90.0)),
    );
    // The south polar tile is refined and moved onto the target.
    let refined: f64 = grid.tile(5).area.iter().sum();
    let coarsened: f64 = grid.tile(2).area.iter().sum();
    assert!(refined * 4.0 < coarsened, "{refined} vs {coarsened}");
    assert!(grid.tile(5).y.iter().any(|&y| (y - 90.0).abs() < 1e-9));
}

#[test]
fn test_target_lat_suggestion_only_without_nests() {
    let stretch = StretchParams::schmidt(2.5, 262.4, 35.5);
    let grid = build(&CubicGridConfig::uniform(resolution::C24).with_stretch(stretch));
    let suggestion = grid.target_lat_suggestion.unwrap();
    assert_approx_eq!(suggestion.input, 35.5, 1e-12);

    let grid = build(
        &CubicGridConfig::uniform(resolution::C24)
            .with_stretch(stretch)
            .with_nest(nest(nests::C24_TILE6_R3)),
    );
    assert!(grid.target_lat_suggestion.is_none());

    let grid = build(
        &CubicGridConfig::uniform(resolution::C24)
            .with_stretch(StretchParams::cube(2.5, 262.4, 35.5)),
    );
    assert!(grid.target_lat_suggestion.is_none());
}

// ============================================================================
// Regional nests
// ============================================================================

#[test]
fn test_unit_refinement_reproduces_parent_window() {
    let (is, ie, js, je) = (9, 20, 5, 16);
    let grid = build(
        &CubicGridConfig::uniform(resolution::C24).with_nest(NestSpec::regional(4, 1, is, ie, js, je)),
    );
    let parent = grid.tile(3);
    let nest = grid.tile(NTILES);
    assert_eq!((nest.nx(), nest.ny()), (ie - is + 1, je - js + 1));

    for jj in 0..nest.nyp() {
        for ii in 0..nest.nxp() {
            let p = (jj + js - 1) * parent.nxp() + ii + is - 1;
            let n = jj * nest.nxp() + ii;
            assert_eq!(nest.x[n], parent.x[p]);
            assert_eq!(nest.y[n], parent.y[p]);
        }
    }
}

#[test]
fn test_nest_vertices_align_with_parent() {
    let spec = nests::C24_TILE6_R3;
    let (r, is, js) = (spec.1, spec.2, spec.4);
    let grid = build(
        &CubicGridConfig {
            halo: 3,
            ..CubicGridConfig::uniform(resolution::C24)
        }
        .with_nest(nest(spec)),
    );
    let parent = grid.tile(5);
    let nest = grid.tile(NTILES);
    assert_eq!((nest.nx(), nest.ny()), (48, 48));

    for b in 0..=8 {
        for a in 0..=8 {
            let n = (2 * r * b) * nest.nxp() + 2 * r * a;
            let p = (js - 1 + 2 * b) * parent.nxp() + is - 1 + 2 * a;
            assert_eq!(nest.x[n], parent.x[p]);
            assert_eq!(nest.y[n], parent.y[p]);
        }
    }
}

#[test]
fn test_nest_area_matches_parent_window() {
    let spec = nests::C24_TILE6_R3;
    let (is, ie, js, je) = (spec.2, spec.3, spec.4, spec.5);
    let grid = build(&CubicGridConfig::uniform(resolution::C24).with_nest(nest(spec)));
    let parent = grid.tile(5);
    let nest = grid.tile(NTILES);

    let mut window = 0.0;
    for j in (js - 1)..je {
        for i in (is - 1)..ie {
            window += parent.area[j * parent.nx() + i];
        }
    }
    let refined: f64 = nest.area.iter().sum();
    assert_rel_approx_eq!(refined, window, 1e-8);
}

#[test]
fn test_nest_angles_are_zero() {
    let grid = build(&CubicGridConfig::uniform(resolution::C24).with_nest(nest(nests::C24_TILE6_R3)));
    let nest = grid.tile(NTILES);
    assert!(nest.angle_dx.unwrap().iter().all(|&a| a == 0.0));
    assert!(nest.angle_dy.unwrap().iter().all(|&a| a == 0.0));
    assert!(grid.tile(5).angle_dy.unwrap().iter().any(|&a| a != 0.0));
}

#[test]
fn test_telescoping_rectangular_nests() {
    let grid = build(
        &CubicGridConfig::uniform(resolution::C12)
            .with_nest(nest(nests::C12_TILE2_RECT))
            .with_nest(nest(nests::TELESCOPING_R2)),
    );
    assert_eq!(grid.entity_count(), NTILES + 2);

    let outer = grid.tile(NTILES);
    let inner = grid.tile(NTILES + 1);
    assert_eq!((outer.nx(), outer.ny()), (16, 28));
    assert_eq!((inner.nx(), inner.ny()), (16, 16));
    assert_eq!(inner.name(), "nest02");

    // The inner nest starts on outer vertex (2, 2) (supergrid 2, 2).
    assert_eq!(inner.x[0], outer.x[2 * outer.nxp() + 2]);
    assert_eq!(inner.y[0], outer.y[2 * outer.nxp() + 2]);

    let lengths = grid.lengths.as_ref().unwrap();
    assert_eq!(lengths.dx.len(), grid.layout.dx_total());
    assert_eq!(lengths.dy.len(), grid.layout.dy_total());
    assert!(inner.dy.unwrap().iter().all(|&d| d > 0.0));
}

// ============================================================================
// Global refinement
// ============================================================================

#[test]
fn test_global_refinement_paths_agree() {
    let config = CubicGridConfig::uniform(resolution::C24).with_nest(NestSpec::global(2));
    let general = build(&config);
    let legacy = create_gnomonic_cubic_grid_gr(&config).unwrap();

    assert_eq!(general.layout, legacy.layout);
    assert!(max_lon_diff_deg(&general.x, &legacy.x) <= 1e-10);
    assert!(max_abs_diff(&general.y, &legacy.y) <= 1e-10);
    assert!(max_abs_diff(&general.area, &legacy.area) <= 1e-6);
}

#[test]
fn test_global_refinement_aligns_with_coarse_grid() {
    let coarse = build(&CubicGridConfig::uniform(resolution::C12));
    let refined = build(&CubicGridConfig::uniform(resolution::C24).with_nest(NestSpec::global(2)));

    for k in 0..NTILES {
        let (c, f) = (coarse.tile(k), refined.tile(k));
        for j in 0..=12 {
            for i in 0..=12 {
                let cn = 2 * j * c.nxp() + 2 * i;
                let fn_ = 4 * j * f.nxp() + 4 * i;
                assert_approx_eq!(f.y[fn_], c.y[cn], 1e-10);
            }
        }
    }
    assert_rel_approx_eq!(refined.global_area(), sphere_area(), 1e-9);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_tile_sizes() {
    assert!(matches!(
        create_gnomonic_cubic_grid(&CubicGridConfig::uniform(25)),
        Err(GridError::InvalidTileSize(_))
    ));

    let mut config = CubicGridConfig::uniform(resolution::C12);
    config.nlat[0] = resolution::C24;
    assert!(matches!(
        create_gnomonic_cubic_grid(&config),
        Err(GridError::InvalidTileSize(_))
    ));
}

#[test]
fn test_legacy_path_rejects_regional_nests() {
    let config = CubicGridConfig::uniform(resolution::C24).with_nest(nest(nests::C24_TILE6_R3));
    assert!(matches!(
        create_gnomonic_cubic_grid_gr(&config),
        Err(GridError::InvalidNest(_))
    ));
}

#[test]
fn test_nest_touching_parent_east_edge() {
    let config =
        CubicGridConfig::uniform(resolution::C12).with_nest(NestSpec::regional(1, 2, 1, 24, 1, 24));
    assert_eq!(
        MultiNestBuilder.build(&config).unwrap_err(),
        GridError::IndexOutOfParent {
            axis: "i",
            index: 13,
            max: 12
        }
    );
}

#[test]
fn test_nest_halo_outside_parent() {
    let config = CubicGridConfig {
        halo: 9,
        ..CubicGridConfig::uniform(resolution::C24).with_nest(nest(nests::C24_TILE6_R3))
    };
    assert!(matches!(
        create_gnomonic_cubic_grid(&config),
        Err(GridError::NestOutsideParent { halo: 9, .. })
    ));
}

#[test]
fn test_unimplemented_grid_types() {
    for (name, expected) in [
        ("gnomonic_dist", GridError::NotImplemented("gnomonic_dist")),
        ("gnomonic_angl", GridError::NotImplemented("gnomonic_angl")),
        ("spectral", GridError::UnsupportedGridType("spectral".into())),
    ] {
        let config = CubicGridConfig {
            grid_type: name.into(),
            ..CubicGridConfig::uniform(resolution::C12)
        };
        assert_eq!(create_gnomonic_cubic_grid(&config).unwrap_err(), expected);
    }
}
