//! General pipeline: global tiles, optional stretch, then either a global
//! refinement or any number of regional (possibly telescoping) nests.

use tracing::{debug, info};

use super::{assemble_global_tiles, measure, CubicGrid, GridBuilder, MeasureOptions};
use crate::config::CubicGridConfig;
use crate::error::Result;
use crate::grid::VertexGrid;
use crate::layout::{EntityDims, GridLayout};
use crate::nest::{setup_aligned_nest, NestWindow, ParentBounds};
use crate::stretch::{suggest_target_lats, StretchParams, TargetLatSuggestion};

/// Builder for the general multi-nest path.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiNestBuilder;

impl GridBuilder for MultiNestBuilder {
    fn name(&self) -> &'static str {
        "multi_nest"
    }

    fn build(&self, config: &CubicGridConfig) -> Result<CubicGrid> {
        config.validate()?;
        let grid_type = config.parsed_grid_type()?;
        let nx = config.supergrid_size()?;

        let global = config.global_nest().copied();
        let mut ni = nx / 2;
        if let Some(nest) = global {
            ni /= nest.refine_ratio;
        }
        debug!(
            builder = self.name(),
            ni,
            nests = config.nests.len(),
            global_refinement = global.is_some(),
            "building cubic grid"
        );

        let mut tiles = assemble_global_tiles(grid_type, ni, config.shifts_longitude())?;

        let suggestion = config
            .stretch
            .and_then(|stretch| apply_stretch(config, stretch, &mut tiles));

        let entities = match global {
            Some(nest) => refine_globally(&tiles, nest.refine_ratio)?,
            None => {
                let mut arena = tiles;
                for (k, nest) in config.nests.iter().enumerate() {
                    let parent = nest.parent_tile - 1;
                    let window = nest.window()?;
                    debug!(
                        nest = k + 1,
                        parent,
                        refine_ratio = nest.refine_ratio,
                        ?window,
                        "creating regional nest"
                    );
                    let grid = setup_aligned_nest(
                        &arena[parent],
                        config.halo,
                        nest.refine_ratio,
                        window,
                        ParentBounds::Strict,
                    )?;
                    arena.push(grid);
                }
                arena
            }
        };

        let layout = GridLayout::new(
            entities
                .iter()
                .map(|e| EntityDims::new(e.ni, e.nj))
                .collect(),
        );
        let options = MeasureOptions {
            stretched: config.is_stretched(),
            area_per_tile: config.stretch.is_some(),
            output_length_angle: config.output_length_angle,
        };
        Ok(measure(layout, &entities, options, suggestion))
    }
}

/// Stretch every tile. Suggestions are searched on the unstretched tiles,
/// only for Schmidt without nests.
fn apply_stretch(
    config: &CubicGridConfig,
    stretch: StretchParams,
    tiles: &mut [VertexGrid],
) -> Option<TargetLatSuggestion> {
    info!(
        mode = ?stretch.mode,
        factor = stretch.factor,
        target_lon = stretch.target_lon,
        target_lat = stretch.target_lat,
        "stretching cubic grid"
    );
    let suggestion = config
        .wants_target_lat_suggestion()
        .then(|| suggest_target_lats(stretch.factor, stretch.target(), tiles));
    for tile in tiles.iter_mut() {
        stretch.apply(tile);
    }
    suggestion
}

/// Replace each global tile by its whole-tile refinement.
fn refine_globally(tiles: &[VertexGrid], refine_ratio: usize) -> Result<Vec<VertexGrid>> {
    tiles
        .iter()
        .enumerate()
        .map(|(n, tile)| {
            debug!(tile = n + 1, refine_ratio, "refining global tile");
            setup_aligned_nest(
                tile,
                0,
                refine_ratio,
                NestWindow::full(tile.ni, tile.nj),
                ParentBounds::ClampToEdge,
            )
        })
        .collect()
}
