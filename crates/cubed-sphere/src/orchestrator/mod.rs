//! Grid generation pipelines.
//!
//! Two strategies build a [`CubicGrid`] from a [`CubicGridConfig`]:
//!
//! - [`MultiNestBuilder`]: any number of regional nests (including nests
//!   inside nests) or a single global refinement.
//! - [`GlobalRefinementBuilder`]: the legacy whole-tile refinement path,
//!   which only accepts a global nest.
//!
//! Both assemble the six global tiles the same way and share the
//! measurement passes in this module.

mod global_refinement;
mod multi_nest;

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CubicGridConfig;
use crate::error::Result;
use crate::geometry::{LonLat, R2D};
use crate::gnomonic::{generate_base_tile, GridType};
use crate::grid::VertexGrid;
use crate::layout::GridLayout;
use crate::metrics::{
    calc_cell_area, calc_dx, calc_dy, calc_rotation_angle, enforce_dy_seams, transpose_dx_into_dy,
};
use crate::mirror::{enforce_seams, mirror_grid, normalize_longitudes, NTILES};
use crate::stretch::TargetLatSuggestion;
use crate::supergrid::fill_supergrid;

pub use global_refinement::GlobalRefinementBuilder;
pub use multi_nest::MultiNestBuilder;

/// Edge lengths (m) and rotation angles (degrees), one slot per supergrid
/// edge or point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeMetrics {
    pub dx: Vec<f64>,
    pub dy: Vec<f64>,
    pub angle_dx: Vec<f64>,
    pub angle_dy: Vec<f64>,
}

/// Supergrid of the six global tiles followed by any nests.
///
/// `x` and `y` are in degrees, `area` in m².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubicGrid {
    pub layout: GridLayout,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub area: Vec<f64>,
    pub lengths: Option<EdgeMetrics>,
    pub target_lat_suggestion: Option<TargetLatSuggestion>,
}

impl CubicGrid {
    /// Tiles plus nests.
    pub fn entity_count(&self) -> usize {
        self.layout.len()
    }

    /// Sum of all cell areas of the six global tiles.
    pub fn global_area(&self) -> f64 {
        let end = self.layout.cell_range(NTILES - 1).end;
        self.area[..end].iter().sum()
    }
}

/// A grid generation strategy.
pub trait GridBuilder {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Validate `config` and produce the grid.
    fn build(&self, config: &CubicGridConfig) -> Result<CubicGrid>;
}

/// Build a grid with the general multi-nest pipeline.
pub fn create_gnomonic_cubic_grid(config: &CubicGridConfig) -> Result<CubicGrid> {
    MultiNestBuilder.build(config)
}

/// Build a grid with the legacy global-refinement pipeline.
pub fn create_gnomonic_cubic_grid_gr(config: &CubicGridConfig) -> Result<CubicGrid> {
    GlobalRefinementBuilder.build(config)
}

// ============================================================================
// Shared pipeline steps
// ============================================================================

/// Base tile, mirrored to six tiles, longitudes normalized, seams copied.
pub(crate) fn assemble_global_tiles(
    grid_type: GridType,
    ni: usize,
    shift: bool,
) -> Result<Vec<VertexGrid>> {
    let mut tile0 = generate_base_tile(grid_type, ni)?;
    tile0.map_in_place(|p| LonLat::new(p.lon - PI, p.lat));

    let mut tiles = mirror_grid(tile0);
    normalize_longitudes(&mut tiles, shift);
    enforce_seams(&mut tiles);
    debug!(ni, shift, "assembled six global tiles");
    Ok(tiles)
}

/// How the measurement passes treat the global tiles.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MeasureOptions {
    /// Stretch factor differs from 1: dy is measured, not transposed.
    pub stretched: bool,
    /// A stretch was requested: every tile gets its own area pass.
    pub area_per_tile: bool,
    pub output_length_angle: bool,
}

/// Fill the supergrid and measure every entity. `entities` holds the six
/// global tiles first, then nests in layout order.
pub(crate) fn measure(
    layout: GridLayout,
    entities: &[VertexGrid],
    options: MeasureOptions,
    target_lat_suggestion: Option<TargetLatSuggestion>,
) -> CubicGrid {
    let mut x = vec![0.0; layout.supergrid_total()];
    let mut y = vec![0.0; layout.supergrid_total()];
    for (k, entity) in entities.iter().enumerate() {
        let range = layout.supergrid_range(k);
        debug!(
            entity = k,
            offset = range.start,
            len = range.len(),
            "filling supergrid"
        );
        fill_supergrid(entity, &mut x[range.clone()], &mut y[range]);
    }

    let lengths = options
        .output_length_angle
        .then(|| edge_metrics(&layout, &x, &y, options.stretched));

    let mut area = vec![0.0; layout.cell_total()];
    if options.area_per_tile {
        for k in 0..NTILES {
            cell_area(&layout, k, &x, &y, &mut area);
        }
    } else {
        cell_area(&layout, 0, &x, &y, &mut area);
        let tile0 = layout.cell_range(0);
        for k in 1..NTILES {
            let start = layout.cell_range(k).start;
            area.copy_within(tile0.clone(), start);
        }
    }
    for k in NTILES..layout.len() {
        cell_area(&layout, k, &x, &y, &mut area);
    }

    for v in x.iter_mut().chain(y.iter_mut()) {
        *v *= R2D;
    }

    CubicGrid {
        layout,
        x,
        y,
        area,
        lengths,
        target_lat_suggestion,
    }
}

fn cell_area(layout: &GridLayout, k: usize, x: &[f64], y: &[f64], area: &mut [f64]) {
    let sg = layout.supergrid_range(k);
    calc_cell_area(
        layout.dims(k),
        &x[sg.clone()],
        &y[sg],
        &mut area[layout.cell_range(k)],
    );
}

fn edge_metrics(layout: &GridLayout, x: &[f64], y: &[f64], stretched: bool) -> EdgeMetrics {
    let mut dx = vec![0.0; layout.dx_total()];
    let mut dy = vec![0.0; layout.dy_total()];

    for k in 0..layout.len() {
        let dims = layout.dims(k);
        let sg = layout.supergrid_range(k);
        let dx_range = layout.dx_range(k);
        calc_dx(dims, &x[sg.clone()], &y[sg.clone()], &mut dx[dx_range.clone()]);
        if stretched || k >= NTILES {
            calc_dy(dims, &x[sg.clone()], &y[sg], &mut dy[layout.dy_range(k)]);
        } else {
            transpose_dx_into_dy(dims.nx(), &dx[dx_range], &mut dy[layout.dy_range(k)]);
        }
    }

    let nx = layout.dims(0).nx();
    let global_dx = layout.dx_range(NTILES - 1).end;
    let global_dy = layout.dy_range(NTILES - 1).end;
    enforce_dy_seams(nx, &dx[..global_dx], &mut dy[..global_dy]);

    // Nest angles stay zero.
    let mut angle_dx = vec![0.0; layout.supergrid_total()];
    let mut angle_dy = vec![0.0; layout.supergrid_total()];
    let global_sg = layout.supergrid_range(NTILES - 1).end;
    calc_rotation_angle(
        layout.dims(0).nxp(),
        &x[..global_sg],
        &y[..global_sg],
        &mut angle_dx[..global_sg],
        &mut angle_dy[..global_sg],
    );

    EdgeMetrics {
        dx,
        dy,
        angle_dx,
        angle_dy,
    }
}
