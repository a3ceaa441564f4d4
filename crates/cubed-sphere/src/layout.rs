//! Offsets of each tile and nest inside the shared output buffers.
//!
//! Entities are stored back to back: the six global tiles first, then the
//! nests in request order. Each buffer has its own prefix-sum table so that
//! rectangular nests never overlap.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Model-grid size of one tile or nest, in cells.
///
/// The supergrid has twice the resolution: `nx = 2 * ni`, `ny = 2 * nj`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDims {
    pub ni: usize,
    pub nj: usize,
}

impl EntityDims {
    pub fn new(ni: usize, nj: usize) -> Self {
        Self { ni, nj }
    }

    #[inline]
    pub fn nx(&self) -> usize {
        2 * self.ni
    }

    #[inline]
    pub fn ny(&self) -> usize {
        2 * self.nj
    }

    #[inline]
    pub fn nxp(&self) -> usize {
        self.nx() + 1
    }

    #[inline]
    pub fn nyp(&self) -> usize {
        self.ny() + 1
    }

    /// Model-grid vertices.
    pub fn vertex_len(&self) -> usize {
        (self.ni + 1) * (self.nj + 1)
    }

    /// Supergrid points.
    pub fn supergrid_len(&self) -> usize {
        self.nxp() * self.nyp()
    }

    /// Supergrid edges along i.
    pub fn dx_len(&self) -> usize {
        self.nx() * self.nyp()
    }

    /// Supergrid edges along j.
    pub fn dy_len(&self) -> usize {
        self.nxp() * self.ny()
    }

    /// Supergrid cells.
    pub fn cell_len(&self) -> usize {
        self.nx() * self.ny()
    }
}

/// Prefix-sum offset tables for every output buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    dims: Vec<EntityDims>,
    supergrid: Vec<usize>,
    dx: Vec<usize>,
    dy: Vec<usize>,
    cells: Vec<usize>,
}

fn prefix_sum(dims: &[EntityDims], len: impl Fn(&EntityDims) -> usize) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(dims.len() + 1);
    let mut total = 0;
    offsets.push(total);
    for d in dims {
        total += len(d);
        offsets.push(total);
    }
    offsets
}

impl GridLayout {
    pub fn new(dims: Vec<EntityDims>) -> Self {
        Self {
            supergrid: prefix_sum(&dims, EntityDims::supergrid_len),
            dx: prefix_sum(&dims, EntityDims::dx_len),
            dy: prefix_sum(&dims, EntityDims::dy_len),
            cells: prefix_sum(&dims, EntityDims::cell_len),
            dims,
        }
    }

    /// Number of tiles plus nests.
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn dims(&self, k: usize) -> EntityDims {
        self.dims[k]
    }

    pub fn all_dims(&self) -> &[EntityDims] {
        &self.dims
    }

    pub fn supergrid_range(&self, k: usize) -> Range<usize> {
        self.supergrid[k]..self.supergrid[k + 1]
    }

    pub fn dx_range(&self, k: usize) -> Range<usize> {
        self.dx[k]..self.dx[k + 1]
    }

    pub fn dy_range(&self, k: usize) -> Range<usize> {
        self.dy[k]..self.dy[k + 1]
    }

    pub fn cell_range(&self, k: usize) -> Range<usize> {
        self.cells[k]..self.cells[k + 1]
    }

    pub fn supergrid_total(&self) -> usize {
        self.supergrid[self.dims.len()]
    }

    pub fn dx_total(&self) -> usize {
        self.dx[self.dims.len()]
    }

    pub fn dy_total(&self) -> usize {
        self.dy[self.dims.len()]
    }

    pub fn cell_total(&self) -> usize {
        self.cells[self.dims.len()]
    }
}
