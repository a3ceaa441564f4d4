//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use cubed_sphere::StretchMode;

use crate::config_loader::CliOverrides;

#[derive(Parser, Debug)]
#[command(name = "make-hgrid")]
#[command(about = "Generate a gnomonic cubed-sphere horizontal grid")]
pub struct Args {
    /// YAML grid description; flags given here override its values
    #[arg(long, env = "HGRID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Grid type: gnomonic_ed, gnomonic_dist or gnomonic_angl
    #[arg(long)]
    pub grid_type: Option<String>,

    /// Supergrid points per tile side, one value or six comma-separated
    #[arg(long, value_delimiter = ',')]
    pub nlon: Vec<usize>,

    /// Rotate unstretched grids by -10 degrees when above 1e-4 (default 18)
    #[arg(long)]
    pub shift_fac: Option<f64>,

    /// Apply the Schmidt transformation
    #[arg(long, conflicts_with = "do_cube_transform")]
    pub do_schmidt: bool,

    /// Apply the cube transformation
    #[arg(long)]
    pub do_cube_transform: bool,

    /// Stretching factor
    #[arg(long)]
    pub stretch_factor: Option<f64>,

    /// Target longitude of the stretch, degrees
    #[arg(long, allow_hyphen_values = true)]
    pub target_lon: Option<f64>,

    /// Target latitude of the stretch, degrees
    #[arg(long, allow_hyphen_values = true)]
    pub target_lat: Option<f64>,

    /// Parent of each nest: 1-6 for a tile, 7+ for an earlier nest, 0 for
    /// a global refinement
    #[arg(long, value_delimiter = ',')]
    pub parent_tile: Vec<usize>,

    /// Refinement ratio of each nest
    #[arg(long, value_delimiter = ',')]
    pub refine_ratio: Vec<usize>,

    /// First parent supergrid index in x of each nest (odd)
    #[arg(long, value_delimiter = ',')]
    pub istart_nest: Vec<usize>,

    /// Last parent supergrid index in x of each nest (even)
    #[arg(long, value_delimiter = ',')]
    pub iend_nest: Vec<usize>,

    /// First parent supergrid index in y of each nest (odd)
    #[arg(long, value_delimiter = ',')]
    pub jstart_nest: Vec<usize>,

    /// Last parent supergrid index in y of each nest (even)
    #[arg(long, value_delimiter = ',')]
    pub jend_nest: Vec<usize>,

    /// Parent cells that must stay outside each nest
    #[arg(long)]
    pub halo: Option<usize>,

    /// Skip dx, dy and rotation angles
    #[arg(long)]
    pub no_length_angle: bool,

    /// Use the legacy global-refinement pipeline
    #[arg(long)]
    pub legacy_gr: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log format: json or pretty
    #[arg(long, env = "LOG_FORMAT", default_value = "json")]
    pub log_format: String,
}

impl Args {
    pub fn overrides(&self) -> CliOverrides {
        let stretch_mode = if self.do_schmidt {
            Some(StretchMode::Schmidt)
        } else if self.do_cube_transform {
            Some(StretchMode::Cube)
        } else {
            None
        };

        CliOverrides {
            grid_type: self.grid_type.clone(),
            nlon: self.nlon.clone(),
            shift_fac: self.shift_fac,
            stretch_mode,
            stretch_factor: self.stretch_factor,
            target_lon: self.target_lon,
            target_lat: self.target_lat,
            parent_tile: self.parent_tile.clone(),
            refine_ratio: self.refine_ratio.clone(),
            istart_nest: self.istart_nest.clone(),
            iend_nest: self.iend_nest.clone(),
            jstart_nest: self.jstart_nest.clone(),
            jend_nest: self.jend_nest.clone(),
            halo: self.halo,
            no_length_angle: self.no_length_angle,
            legacy_gr: self.legacy_gr,
        }
    }
}
