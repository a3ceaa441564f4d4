//! Configuration loader for make-hgrid.
//!
//! Reads a YAML grid description whose fields mirror the command-line
//! flags, expands `${VAR}` / `${VAR:-default}` references, and merges
//! command-line overrides on top.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cubed_sphere::mirror::NTILES;
use cubed_sphere::{CubicGridConfig, NestSpec, StretchMode, StretchParams};
use serde::{Deserialize, Serialize};

// ============================================================================
// File format
// ============================================================================

/// Supergrid size per tile side, either shared or per tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileSizes {
    Uniform(usize),
    PerTile(Vec<usize>),
}

impl TileSizes {
    pub fn expand(&self) -> Result<[usize; NTILES]> {
        match self {
            TileSizes::Uniform(n) => Ok([*n; NTILES]),
            TileSizes::PerTile(sizes) if sizes.len() == 1 => Ok([sizes[0]; NTILES]),
            TileSizes::PerTile(sizes) => <[usize; NTILES]>::try_from(sizes.as_slice())
                .map_err(|_| {
                    anyhow::anyhow!(
                        "nlon must have 1 or {NTILES} values, got {}",
                        sizes.len()
                    )
                }),
        }
    }
}

/// Contents of a grid YAML file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HgridFile {
    pub grid_type: Option<String>,
    pub nlon: Option<TileSizes>,
    pub shift_fac: Option<f64>,
    pub stretch: Option<StretchParams>,
    pub nests: Option<Vec<NestSpec>>,
    pub halo: Option<usize>,
    pub output_length_angle: Option<bool>,
    pub legacy_gr: Option<bool>,
}

/// Values given on the command line. Empty lists and `None` leave the file
/// (or default) value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub grid_type: Option<String>,
    pub nlon: Vec<usize>,
    pub shift_fac: Option<f64>,
    pub stretch_mode: Option<StretchMode>,
    pub stretch_factor: Option<f64>,
    pub target_lon: Option<f64>,
    pub target_lat: Option<f64>,
    pub parent_tile: Vec<usize>,
    pub refine_ratio: Vec<usize>,
    pub istart_nest: Vec<usize>,
    pub iend_nest: Vec<usize>,
    pub jstart_nest: Vec<usize>,
    pub jend_nest: Vec<usize>,
    pub halo: Option<usize>,
    pub no_length_angle: bool,
    pub legacy_gr: bool,
}

/// A fully merged invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub grid: CubicGridConfig,
    pub legacy_gr: bool,
}

// ============================================================================
// Loading Functions
// ============================================================================

/// Load and parse a grid YAML file with environment variable substitution.
pub fn load_hgrid_file<P: AsRef<Path>>(path: P) -> Result<HgridFile> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read grid config from {:?}", path.as_ref()))?;

    parse_hgrid_yaml(&content)
        .with_context(|| format!("Failed to parse grid config from {:?}", path.as_ref()))
}

/// Parse grid YAML from a string.
pub fn parse_hgrid_yaml(content: &str) -> Result<HgridFile> {
    let expanded = expand_env_vars(content)?;
    let file: HgridFile = serde_yaml::from_str(&expanded).context("Invalid grid config YAML")?;
    Ok(file)
}

/// Merge the file (if any) and command-line values into a validated
/// configuration.
pub fn resolve(file: Option<HgridFile>, cli: &CliOverrides) -> Result<ResolvedRun> {
    let file = file.unwrap_or_default();
    let mut grid = CubicGridConfig::default();

    if let Some(grid_type) = cli.grid_type.clone().or(file.grid_type) {
        grid.grid_type = grid_type;
    }

    let nlon = if cli.nlon.is_empty() {
        file.nlon
    } else {
        Some(TileSizes::PerTile(cli.nlon.clone()))
    };
    if let Some(sizes) = nlon {
        grid.nlon = sizes.expand()?;
        grid.nlat = grid.nlon;
    }

    if let Some(shift_fac) = cli.shift_fac.or(file.shift_fac) {
        grid.shift_fac = shift_fac;
    }
    grid.stretch = merge_stretch(file.stretch, cli)?;

    grid.nests = if cli.parent_tile.is_empty() {
        file.nests.unwrap_or_default()
    } else {
        nests_from_lists(cli)?
    };

    if let Some(halo) = cli.halo.or(file.halo) {
        grid.halo = halo;
    }
    grid.output_length_angle = !cli.no_length_angle && file.output_length_angle.unwrap_or(true);

    grid.validate().context("Invalid grid configuration")?;

    Ok(ResolvedRun {
        grid,
        legacy_gr: cli.legacy_gr || file.legacy_gr.unwrap_or(false),
    })
}

fn merge_stretch(file: Option<StretchParams>, cli: &CliOverrides) -> Result<Option<StretchParams>> {
    let mode = match (cli.stretch_mode, file) {
        (Some(mode), _) => mode,
        (None, Some(stretch)) => stretch.mode,
        (None, None) => {
            anyhow::ensure!(
                cli.stretch_factor.is_none() && cli.target_lon.is_none() && cli.target_lat.is_none(),
                "--stretch-factor, --target-lon and --target-lat need --do-schmidt or --do-cube-transform"
            );
            return Ok(None);
        }
    };

    let factor = cli.stretch_factor.or(file.map(|s| s.factor));
    let target_lon = cli.target_lon.or(file.map(|s| s.target_lon));
    let target_lat = cli.target_lat.or(file.map(|s| s.target_lat));
    match (factor, target_lon, target_lat) {
        (Some(factor), Some(target_lon), Some(target_lat)) => {
            anyhow::ensure!(factor > 0.0, "stretch factor must be positive, got {factor}");
            Ok(Some(StretchParams {
                factor,
                target_lon,
                target_lat,
                mode,
            }))
        }
        _ => anyhow::bail!(
            "stretch factor, target lon and target lat must all be set when stretching is requested"
        ),
    }
}

fn nests_from_lists(cli: &CliOverrides) -> Result<Vec<NestSpec>> {
    let n = cli.parent_tile.len();
    anyhow::ensure!(
        cli.refine_ratio.len() == n,
        "--refine-ratio has {} values but --parent-tile has {n}",
        cli.refine_ratio.len()
    );

    let windows = [
        ("--istart-nest", &cli.istart_nest),
        ("--iend-nest", &cli.iend_nest),
        ("--jstart-nest", &cli.jstart_nest),
        ("--jend-nest", &cli.jend_nest),
    ];
    let global_only = cli.parent_tile.iter().all(|&p| p == 0);
    for (flag, values) in windows {
        anyhow::ensure!(
            values.len() == n || (global_only && values.is_empty()),
            "{flag} has {} values but --parent-tile has {n}",
            values.len()
        );
    }

    let at = |values: &[usize], k: usize| values.get(k).copied().unwrap_or(0);
    Ok((0..n)
        .map(|k| {
            NestSpec::regional(
                cli.parent_tile[k],
                cli.refine_ratio[k],
                at(&cli.istart_nest, k),
                at(&cli.iend_nest, k),
                at(&cli.jstart_nest, k),
                at(&cli.jend_nest, k),
            )
        })
        .collect())
}

/// Expand environment variables in YAML content.
/// Supports ${VAR} and ${VAR:-default} syntax.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .with_context(|| format!("Unclosed variable substitution: ${{{after}"))?;
        result.push_str(&resolve_var_expr(&after[..end])?);
        rest = &after[end + 1..];
    }
    result.push_str(rest);

    Ok(result)
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    match expr.split_once(":-") {
        Some((name, default)) => Ok(std::env::var(name.trim())
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())),
        None => std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr)),
    }
}
