//! Error types for cubed-sphere grid generation.

use thiserror::Error;

/// Errors that terminate a grid generation invocation.
///
/// Every variant is fatal for the current invocation: there is no partial
/// result. Near-singular numerics (points on a pole, colocated points) are
/// not errors and are handled by tolerance branches instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Tile dimensions are odd, non-square, or differ between tiles.
    #[error("invalid tile size: {0}")]
    InvalidTileSize(String),

    /// The grid type string is not one of the known gnomonic variants.
    #[error("grid type should be 'gnomonic_ed', 'gnomonic_dist' or 'gnomonic_angl', got '{0}'")]
    UnsupportedGridType(String),

    /// A known projection variant that has no implementation.
    #[error("function {0} not yet implemented")]
    NotImplemented(&'static str),

    /// A nest specification is malformed.
    #[error("invalid nest specification: {0}")]
    InvalidNest(String),

    /// The nest window plus halo does not fit strictly inside its parent.
    #[error(
        "nested grid lies outside its parent: window [{istart},{iend}]x[{jstart},{jend}] \
         with halo {halo} in parent of {parent_ni}x{parent_nj} cells"
    )]
    NestOutsideParent {
        istart: usize,
        iend: usize,
        jstart: usize,
        jend: usize,
        halo: usize,
        parent_ni: usize,
        parent_nj: usize,
    },

    /// A nest vertex needed a parent row or column past the parent edge.
    #[error("parent index out of range: {axis} index {index} > {max}")]
    IndexOutOfParent {
        axis: &'static str,
        index: usize,
        max: usize,
    },

    /// Rotation axis index outside 1 (x), 2 (y), 3 (z).
    #[error("invalid axis {0}: must be 1 for X, 2 for Y, 3 for Z")]
    InvalidAxis(i32),

    /// Great-circle interpolation between antipodal points is undefined.
    #[error(
        "interpolation not well defined between antipodal points \
         ({lon1}, {lat1}) and ({lon2}, {lat2})"
    )]
    AntipodalInterpolation {
        lon1: f64,
        lat1: f64,
        lon2: f64,
        lat2: f64,
    },
}

impl GridError {
    /// Create an InvalidTileSize error.
    pub fn invalid_tile_size(msg: impl Into<String>) -> Self {
        Self::InvalidTileSize(msg.into())
    }

    /// Create an InvalidNest error.
    pub fn invalid_nest(msg: impl Into<String>) -> Self {
        Self::InvalidNest(msg.into())
    }
}

/// Result type for grid generation.
pub type Result<T> = std::result::Result<T, GridError>;
