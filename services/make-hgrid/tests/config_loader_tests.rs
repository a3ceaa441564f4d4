//! Loader tests against real files on disk.

use cubed_sphere::{CubicGridConfig, NestSpec, StretchParams};
use make_hgrid::config_loader::{load_hgrid_file, resolve, CliOverrides, TileSizes};
use test_utils::{temp_file_with, yaml};

#[test]
fn test_load_stretched_nest_file() {
    let file = temp_file_with(yaml::STRETCHED_NEST, ".yaml").unwrap();
    let loaded = load_hgrid_file(file.path()).unwrap();

    assert_eq!(loaded.nlon, Some(TileSizes::Uniform(48)));
    assert_eq!(loaded.halo, Some(3));
    assert_eq!(
        loaded.stretch,
        Some(StretchParams::schmidt(2.5, 262.4, 35.5))
    );

    let run = resolve(Some(loaded), &CliOverrides::default()).unwrap();
    assert_eq!(run.grid.nests, vec![NestSpec::regional(6, 3, 17, 32, 17, 32)]);
    assert!(!run.legacy_gr);
}

#[test]
fn test_file_and_flags_produce_the_same_config() {
    let file = temp_file_with(yaml::STRETCHED_NEST, ".yaml").unwrap();
    let from_file = resolve(
        Some(load_hgrid_file(file.path()).unwrap()),
        &CliOverrides::default(),
    )
    .unwrap();

    let from_flags = resolve(
        None,
        &CliOverrides {
            grid_type: Some("gnomonic_ed".into()),
            nlon: vec![48],
            shift_fac: Some(18.0),
            stretch_mode: Some(cubed_sphere::StretchMode::Schmidt),
            stretch_factor: Some(2.5),
            target_lon: Some(262.4),
            target_lat: Some(35.5),
            parent_tile: vec![6],
            refine_ratio: vec![3],
            istart_nest: vec![17],
            iend_nest: vec![32],
            jstart_nest: vec![17],
            jend_nest: vec![32],
            halo: Some(3),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(from_file, from_flags);
}

#[test]
fn test_global_nest_file() {
    let file = temp_file_with(yaml::GLOBAL_NEST, ".yaml").unwrap();
    let run = resolve(
        Some(load_hgrid_file(file.path()).unwrap()),
        &CliOverrides {
            legacy_gr: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        run.grid,
        CubicGridConfig::uniform(48).with_nest(NestSpec::global(2))
    );
    assert!(run.legacy_gr);
}

#[test]
fn test_env_substitution_in_file() {
    std::env::set_var("HGRID_LOADER_TEST_NLON", "96");
    let file = temp_file_with("nlon: ${HGRID_LOADER_TEST_NLON}\nhalo: ${HGRID_LOADER_TEST_HALO:-1}\n", ".yaml")
        .unwrap();
    let loaded = load_hgrid_file(file.path()).unwrap();
    assert_eq!(loaded.nlon, Some(TileSizes::Uniform(96)));
    assert_eq!(loaded.halo, Some(1));
}

#[test]
fn test_malformed_and_missing_files() {
    let file = temp_file_with(yaml::MALFORMED, ".yaml").unwrap();
    let err = load_hgrid_file(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse grid config"));

    let dir = tempfile::tempdir().unwrap();
    let err = load_hgrid_file(dir.path().join("missing.yaml")).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read grid config"));
}
