//! Invocation parameters for cubed-sphere grid generation.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::geometry::EPSLN4;
use crate::gnomonic::GridType;
use crate::mirror::NTILES;
use crate::nest::NestWindow;
use crate::stretch::{StretchMode, StretchParams};

/// Upper bound on the number of nests in one invocation.
pub const MAX_NESTS: usize = 128;

/// A nested grid request.
///
/// Window indices are supergrid indices of the parent: `istart`/`jstart`
/// odd, `iend`/`jend` even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestSpec {
    /// 1..=6 for a global tile, `6 + k` for the k-th earlier nest, or 0 on
    /// the only entry for a global (whole-tile) refinement.
    pub parent_tile: usize,
    pub refine_ratio: usize,
    #[serde(default)]
    pub istart: usize,
    #[serde(default)]
    pub iend: usize,
    #[serde(default)]
    pub jstart: usize,
    #[serde(default)]
    pub jend: usize,
}

impl NestSpec {
    /// Whole-tile refinement of all six tiles.
    pub fn global(refine_ratio: usize) -> Self {
        Self {
            parent_tile: 0,
            refine_ratio,
            istart: 0,
            iend: 0,
            jstart: 0,
            jend: 0,
        }
    }

    /// Regional nest in `parent_tile` covering the given supergrid indices.
    pub fn regional(
        parent_tile: usize,
        refine_ratio: usize,
        istart: usize,
        iend: usize,
        jstart: usize,
        jend: usize,
    ) -> Self {
        Self {
            parent_tile,
            refine_ratio,
            istart,
            iend,
            jstart,
            jend,
        }
    }

    pub fn is_global(&self) -> bool {
        self.parent_tile == 0
    }

    /// Window in parent model-grid cells (1-based, inclusive).
    pub fn window(&self) -> Result<NestWindow> {
        if self.istart % 2 == 0 {
            return Err(GridError::invalid_nest(format!(
                "istart_nest+1 is not divisible by 2 (istart_nest={})",
                self.istart
            )));
        }
        if self.iend % 2 != 0 {
            return Err(GridError::invalid_nest(format!(
                "iend_nest is not divisible by 2 (iend_nest={})",
                self.iend
            )));
        }
        if self.jstart % 2 == 0 {
            return Err(GridError::invalid_nest(format!(
                "jstart_nest+1 is not divisible by 2 (jstart_nest={})",
                self.jstart
            )));
        }
        if self.jend % 2 != 0 {
            return Err(GridError::invalid_nest(format!(
                "jend_nest is not divisible by 2 (jend_nest={})",
                self.jend
            )));
        }

        let window = NestWindow {
            istart: (self.istart + 1) / 2,
            iend: self.iend / 2,
            jstart: (self.jstart + 1) / 2,
            jend: self.jend / 2,
        };
        if window.iend < window.istart || window.jend < window.jstart {
            return Err(GridError::invalid_nest(format!(
                "empty nest window i=[{},{}] j=[{},{}]",
                self.istart, self.iend, self.jstart, self.jend
            )));
        }
        Ok(window)
    }
}

/// Full description of one grid generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubicGridConfig {
    /// Projection variant name, e.g. `gnomonic_ed`.
    pub grid_type: String,

    /// Supergrid points per tile side in x (twice the model cells).
    pub nlon: [usize; NTILES],

    /// Supergrid points per tile side in y.
    pub nlat: [usize; NTILES],

    /// Longitude shift switch. Values above 1e-4 rotate an unstretched grid
    /// by -10°.
    pub shift_fac: f64,

    /// Optional Schmidt or cube stretching.
    pub stretch: Option<StretchParams>,

    /// Nests in processing order.
    pub nests: Vec<NestSpec>,

    /// Parent cells that must remain outside every regional nest window.
    pub halo: usize,

    /// Compute dx, dy and rotation angles.
    pub output_length_angle: bool,
}

impl Default for CubicGridConfig {
    fn default() -> Self {
        Self {
            grid_type: GridType::GnomonicEd.to_string(),
            nlon: [48; NTILES],
            nlat: [48; NTILES],
            shift_fac: 18.0,
            stretch: None,
            nests: Vec::new(),
            halo: 0,
            output_length_angle: true,
        }
    }
}

impl CubicGridConfig {
    /// Square tiles with `nlon` supergrid points per side.
    pub fn uniform(nlon: usize) -> Self {
        Self {
            nlon: [nlon; NTILES],
            nlat: [nlon; NTILES],
            ..Self::default()
        }
    }

    pub fn with_stretch(mut self, stretch: StretchParams) -> Self {
        self.stretch = Some(stretch);
        self
    }

    pub fn with_nest(mut self, nest: NestSpec) -> Self {
        self.nests.push(nest);
        self
    }

    pub fn parsed_grid_type(&self) -> Result<GridType> {
        self.grid_type.parse()
    }

    /// Supergrid points per tile side after checking all six tiles agree.
    pub fn supergrid_size(&self) -> Result<usize> {
        for n in 0..NTILES {
            if self.nlon[n] != self.nlat[n] {
                return Err(GridError::invalid_tile_size(
                    "the grid size in x and y-direction should be the same for the 6 tiles of cubic sphere grid",
                ));
            }
            if self.nlon[n] % 2 != 0 {
                return Err(GridError::invalid_tile_size(
                    "supergrid size in x-direction should be divided by 2",
                ));
            }
            if self.nlat[n] % 2 != 0 {
                return Err(GridError::invalid_tile_size(
                    "supergrid size in y-direction should be divided by 2",
                ));
            }
        }
        if self.nlon[1..].iter().any(|&n| n != self.nlon[0]) {
            return Err(GridError::invalid_tile_size(
                "all six tiles should have same size",
            ));
        }
        if self.nlon[0] == 0 {
            return Err(GridError::invalid_tile_size(
                "supergrid size must be positive",
            ));
        }
        Ok(self.nlon[0])
    }

    /// The global refinement entry, if the nest list is one.
    pub fn global_nest(&self) -> Option<&NestSpec> {
        self.nests.first().filter(|n| n.is_global())
    }

    /// Stretching is requested and the factor differs from 1.
    pub fn is_stretched(&self) -> bool {
        self.stretch.map(|s| s.is_stretched()).unwrap_or(false)
    }

    /// The -10° longitude shift applies.
    pub fn shifts_longitude(&self) -> bool {
        self.stretch.is_none() && self.shift_fac > EPSLN4
    }

    /// Schmidt stretching without nests gets target-latitude suggestions.
    pub fn wants_target_lat_suggestion(&self) -> bool {
        matches!(
            self.stretch,
            Some(StretchParams {
                mode: StretchMode::Schmidt,
                ..
            })
        ) && self.nests.is_empty()
    }

    /// Check everything that does not depend on parent geometry.
    pub fn validate(&self) -> Result<()> {
        let nx = self.supergrid_size()?;
        self.parsed_grid_type()?;

        if self.nests.len() > MAX_NESTS {
            return Err(GridError::invalid_nest(format!(
                "at most {MAX_NESTS} nests are supported, got {}",
                self.nests.len()
            )));
        }

        if let Some(global) = self.global_nest() {
            if self.nests.len() > 1 {
                return Err(GridError::invalid_nest(
                    "a global nest cannot be combined with other nests",
                ));
            }
            if global.refine_ratio == 0 {
                return Err(GridError::invalid_nest("refine ratio must be at least 1"));
            }
            if (nx / 2) % global.refine_ratio != 0 {
                return Err(GridError::invalid_nest(format!(
                    "refine ratio {} does not divide the tile size of {} cells",
                    global.refine_ratio,
                    nx / 2
                )));
            }
            return Ok(());
        }

        for (k, nest) in self.nests.iter().enumerate() {
            if nest.parent_tile == 0 {
                return Err(GridError::invalid_nest(format!(
                    "nest {} has parent tile 0; only the first entry may request a global nest",
                    k + 1
                )));
            }
            if nest.parent_tile > NTILES + k {
                return Err(GridError::invalid_nest(format!(
                    "nest {} refers to parent tile {}, which is not a global tile or an earlier nest",
                    k + 1,
                    nest.parent_tile
                )));
            }
            if nest.refine_ratio == 0 {
                return Err(GridError::invalid_nest(format!(
                    "nest {} refine ratio must be at least 1",
                    k + 1
                )));
            }
            nest.window()?;
        }
        Ok(())
    }
}
