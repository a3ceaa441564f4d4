//! Nest aligner: refine a window of a parent grid by great-circle
//! interpolation so that every `refine_ratio`-th nest vertex is a parent
//! vertex.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridError, Result};
use crate::geometry::{spherical_linear_interpolation, LonLat};
use crate::grid::VertexGrid;

/// Inclusive window of parent cells, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestWindow {
    pub istart: usize,
    pub iend: usize,
    pub jstart: usize,
    pub jend: usize,
}

impl NestWindow {
    /// The whole of a parent with `ni × nj` cells.
    pub fn full(ni: usize, nj: usize) -> Self {
        Self {
            istart: 1,
            iend: ni,
            jstart: 1,
            jend: nj,
        }
    }

    /// Parent cells covered in i.
    pub fn ni(&self) -> usize {
        self.iend + 1 - self.istart
    }

    /// Parent cells covered in j.
    pub fn nj(&self) -> usize {
        self.jend + 1 - self.jstart
    }
}

/// How parent indices past the last row or column are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentBounds {
    /// Out-of-range parent indices are an error.
    Strict,
    /// Out-of-range parent indices read the last row or column. Only the
    /// legacy whole-tile refinement uses this.
    ClampToEdge,
}

/// Build a nest of `window.ni() * refine_ratio` by `window.nj() * refine_ratio`
/// cells inside `parent`.
///
/// The window plus `halo` must lie inside the parent. Nest vertices on a
/// parent row are read directly; others are interpolated between the two
/// parent rows, then along the row between the two bracketing columns.
pub fn setup_aligned_nest(
    parent: &VertexGrid,
    halo: usize,
    refine_ratio: usize,
    window: NestWindow,
    bounds: ParentBounds,
) -> Result<VertexGrid> {
    if refine_ratio == 0 {
        return Err(GridError::invalid_nest("refine ratio must be at least 1"));
    }
    if window.istart == 0 || window.jstart == 0 {
        return Err(GridError::invalid_nest(format!(
            "nest window start ({}, {}) must be 1-based",
            window.istart, window.jstart
        )));
    }
    if window.iend < window.istart || window.jend < window.jstart {
        return Err(GridError::invalid_nest(format!(
            "empty nest window [{},{}]x[{},{}]",
            window.istart, window.iend, window.jstart, window.jend
        )));
    }
    if window.jstart < halo + 1
        || window.istart < halo + 1
        || window.jend + halo > parent.nj
        || window.iend + halo > parent.ni
    {
        return Err(GridError::NestOutsideParent {
            istart: window.istart,
            iend: window.iend,
            jstart: window.jstart,
            jend: window.jend,
            halo,
            parent_ni: parent.ni,
            parent_nj: parent.nj,
        });
    }

    debug!(
        parent_ni = parent.ni,
        parent_nj = parent.nj,
        refine_ratio,
        halo,
        ?window,
        "setting up aligned nest"
    );

    let ni = window.ni() * refine_ratio;
    let nj = window.nj() * refine_ratio;
    let mut nest = VertexGrid::new(ni, nj);
    let r = refine_ratio as f64;

    for j in 0..=nj {
        let jc = window.jstart - 1 + j / refine_ratio;
        let jmod = j % refine_ratio;
        for i in 0..=ni {
            let ic = window.istart - 1 + i / refine_ratio;
            let imod = i % refine_ratio;

            let idx = parent_index(parent, ic, jc, bounds)?;
            let idx_pi = parent_index(parent, ic + 1, jc, bounds)?;

            let (q1, q2) = if jmod == 0 {
                (point_at(parent, idx), point_at(parent, idx_pi))
            } else {
                let idx_pj = parent_index(parent, ic, jc + 1, bounds)?;
                let idx_pjpi = parent_index(parent, ic + 1, jc + 1, bounds)?;
                let beta = jmod as f64 / r;
                (
                    spherical_linear_interpolation(
                        beta,
                        point_at(parent, idx),
                        point_at(parent, idx_pj),
                    )?,
                    spherical_linear_interpolation(
                        beta,
                        point_at(parent, idx_pi),
                        point_at(parent, idx_pjpi),
                    )?,
                )
            };

            let mut p = if imod == 0 {
                q1
            } else {
                spherical_linear_interpolation(imod as f64 / r, q1, q2)?
            };

            if p.lon > 2.0 * PI {
                p.lon -= 2.0 * PI;
            }
            if p.lon < 0.0 {
                p.lon += 2.0 * PI;
            }
            nest.set(i, j, p);
        }
    }

    debug!(
        lon0 = nest.lon[0],
        lat0 = nest.lat[0],
        ni,
        nj,
        "aligned nest ready"
    );
    Ok(nest)
}

fn parent_index(parent: &VertexGrid, ic: usize, jc: usize, bounds: ParentBounds) -> Result<usize> {
    let jc = clamp_axis("j", jc, parent.nj, bounds)?;
    let ic = clamp_axis("i", ic, parent.ni, bounds)?;
    Ok(parent.index(ic, jc))
}

fn clamp_axis(axis: &'static str, index: usize, max: usize, bounds: ParentBounds) -> Result<usize> {
    if index <= max {
        return Ok(index);
    }
    match bounds {
        ParentBounds::ClampToEdge => Ok(max),
        ParentBounds::Strict => Err(GridError::IndexOutOfParent { axis, index, max }),
    }
}

#[inline]
fn point_at(grid: &VertexGrid, idx: usize) -> LonLat {
    LonLat::new(grid.lon[idx], grid.lat[idx])
}
