//! Legacy whole-tile refinement: the six global tiles are built at the
//! coarse resolution, stretched, and each replaced by its refinement.
//!
//! Only a single global nest is accepted. No target-latitude suggestions
//! are produced on this path.

use tracing::debug;

use super::{assemble_global_tiles, measure, CubicGrid, GridBuilder, MeasureOptions};
use crate::config::CubicGridConfig;
use crate::error::{GridError, Result};
use crate::grid::VertexGrid;
use crate::layout::{EntityDims, GridLayout};
use crate::mirror::NTILES;
use crate::nest::{setup_aligned_nest, NestWindow, ParentBounds};

/// Builder for the legacy global-refinement path.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalRefinementBuilder;

impl GridBuilder for GlobalRefinementBuilder {
    fn name(&self) -> &'static str {
        "global_refinement"
    }

    fn build(&self, config: &CubicGridConfig) -> Result<CubicGrid> {
        let refine_ratio = match config.global_nest() {
            Some(nest) => nest.refine_ratio,
            None => return Err(GridError::invalid_nest("use only for global nest")),
        };
        config.validate()?;
        let grid_type = config.parsed_grid_type()?;

        let ni = config.supergrid_size()? / 2;
        let coarse_ni = ni / refine_ratio;
        debug!(builder = self.name(), ni, coarse_ni, refine_ratio, "building cubic grid");

        let mut coarse = assemble_global_tiles(grid_type, coarse_ni, config.shifts_longitude())?;
        if let Some(stretch) = config.stretch {
            for tile in coarse.iter_mut() {
                stretch.apply(tile);
            }
        }

        let mut tiles: Vec<VertexGrid> = Vec::with_capacity(NTILES);
        for (n, tile) in coarse.iter().enumerate() {
            debug!(tile = n + 1, coarse_ni, "refining tile");
            tiles.push(setup_aligned_nest(
                tile,
                0,
                refine_ratio,
                NestWindow::full(coarse_ni, coarse_ni),
                ParentBounds::ClampToEdge,
            )?);
        }

        let layout = GridLayout::new(vec![EntityDims::new(ni, ni); NTILES]);
        let options = MeasureOptions {
            stretched: config.is_stretched(),
            area_per_tile: config.stretch.is_some(),
            output_length_angle: config.output_length_angle,
        };
        Ok(measure(layout, &tiles, options, None))
    }
}
