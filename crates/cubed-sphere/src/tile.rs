//! Read-only views of one tile or nest inside a [`CubicGrid`].

use crate::geometry::D2R;
use crate::layout::EntityDims;
use crate::mirror::NTILES;
use crate::orchestrator::CubicGrid;

/// Output name of entity `k`: `tile1`..`tile6`, then `nest01`, `nest02`, ...
pub fn entity_name(k: usize) -> String {
    if k < NTILES {
        format!("tile{}", k + 1)
    } else {
        format!("nest{:02}", k + 1 - NTILES)
    }
}

/// Slices of one entity's supergrid and measurements.
#[derive(Debug, Clone, Copy)]
pub struct TileGrid<'a> {
    pub index: usize,
    pub dims: EntityDims,
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub area: &'a [f64],
    pub dx: Option<&'a [f64]>,
    pub dy: Option<&'a [f64]>,
    pub angle_dx: Option<&'a [f64]>,
    pub angle_dy: Option<&'a [f64]>,
}

impl<'a> TileGrid<'a> {
    pub fn name(&self) -> String {
        entity_name(self.index)
    }

    pub fn is_nest(&self) -> bool {
        self.index >= NTILES
    }

    pub fn nx(&self) -> usize {
        self.dims.nx()
    }

    pub fn ny(&self) -> usize {
        self.dims.ny()
    }

    pub fn nxp(&self) -> usize {
        self.dims.nxp()
    }

    pub fn nyp(&self) -> usize {
        self.dims.nyp()
    }

    /// A-grid (cell center) coordinates in radians: longitudes along the
    /// first row of cells and latitudes along the first column.
    pub fn agrid_lonlat(&self) -> (Vec<f64>, Vec<f64>) {
        let nxp = self.nxp();
        let lon = (0..self.dims.ni)
            .map(|i| self.x[nxp + 2 * i + 1] * D2R)
            .collect();
        let lat = (0..self.dims.nj)
            .map(|j| self.y[(2 * j + 1) * nxp + 1] * D2R)
            .collect();
        (lon, lat)
    }
}

impl CubicGrid {
    /// View of entity `k` (0..6 global tiles, then nests).
    ///
    /// Panics if `k` is not below [`CubicGrid::entity_count`].
    pub fn tile(&self, k: usize) -> TileGrid<'_> {
        let layout = &self.layout;
        let sg = layout.supergrid_range(k);
        let lengths = self.lengths.as_ref();
        TileGrid {
            index: k,
            dims: layout.dims(k),
            x: &self.x[sg.clone()],
            y: &self.y[sg.clone()],
            area: &self.area[layout.cell_range(k)],
            dx: lengths.map(|l| &l.dx[layout.dx_range(k)]),
            dy: lengths.map(|l| &l.dy[layout.dy_range(k)]),
            angle_dx: lengths.map(|l| &l.angle_dx[sg.clone()]),
            angle_dy: lengths.map(|l| &l.angle_dy[sg.clone()]),
        }
    }

    /// Views of every tile and nest in output order.
    pub fn tiles(&self) -> impl Iterator<Item = TileGrid<'_>> {
        (0..self.entity_count()).map(move |k| self.tile(k))
    }
}
