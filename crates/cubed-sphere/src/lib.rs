//! Gnomonic cubed-sphere horizontal grid generation.
//!
//! Builds the supergrid (vertices, cell centers and face midpoints) of the
//! six cube faces projected onto the sphere, with optional Schmidt or cube
//! stretching and nested refinements aligned to their parent grid. Edge
//! lengths, cell areas and rotation angles are computed alongside.
//!
//! ```no_run
//! use cubed_sphere::{create_gnomonic_cubic_grid, CubicGridConfig};
//!
//! let grid = create_gnomonic_cubic_grid(&CubicGridConfig::uniform(96))?;
//! let tile = grid.tile(0);
//! assert_eq!(tile.nx(), 96);
//! # Ok::<(), cubed_sphere::GridError>(())
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod gnomonic;
pub mod grid;
pub mod layout;
pub mod metrics;
pub mod mirror;
pub mod nest;
pub mod orchestrator;
pub mod stretch;
pub mod supergrid;
pub mod tile;

pub use config::{CubicGridConfig, NestSpec};
pub use error::{GridError, Result};
pub use geometry::LonLat;
pub use gnomonic::GridType;
pub use grid::VertexGrid;
pub use layout::{EntityDims, GridLayout};
pub use orchestrator::{
    create_gnomonic_cubic_grid, create_gnomonic_cubic_grid_gr, CubicGrid, EdgeMetrics,
    GlobalRefinementBuilder, GridBuilder, MultiNestBuilder,
};
pub use stretch::{StretchMode, StretchParams, TargetLatSuggestion};
pub use tile::TileGrid;
