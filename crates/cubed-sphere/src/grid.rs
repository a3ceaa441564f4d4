//! Vertex arrays for tiles and nests.

use crate::geometry::LonLat;

/// One side of a vertex grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Column `i = 0`.
    West,
    /// Column `i = ni`.
    East,
    /// Row `j = 0`.
    South,
    /// Row `j = nj`.
    North,
}

/// Vertex longitudes and latitudes of one tile or nest (radians).
///
/// Storage is row-major with `(nj + 1)` rows of `(ni + 1)` points:
/// point `(i, j)` lives at `j * (ni + 1) + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexGrid {
    pub ni: usize,
    pub nj: usize,
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
}

impl VertexGrid {
    /// A zero-filled grid of `ni × nj` cells.
    pub fn new(ni: usize, nj: usize) -> Self {
        let n = (ni + 1) * (nj + 1);
        Self {
            ni,
            nj,
            lon: vec![0.0; n],
            lat: vec![0.0; n],
        }
    }

    /// Points per row.
    #[inline]
    pub fn nip(&self) -> usize {
        self.ni + 1
    }

    /// Points per column.
    #[inline]
    pub fn njp(&self) -> usize {
        self.nj + 1
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.lon.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lon.is_empty()
    }

    /// Flat index of vertex `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * (self.ni + 1) + i
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> LonLat {
        let k = self.index(i, j);
        LonLat::new(self.lon[k], self.lat[k])
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, p: LonLat) {
        let k = self.index(i, j);
        self.lon[k] = p.lon;
        self.lat[k] = p.lat;
    }

    /// Number of points along `edge`.
    pub fn edge_len(&self, edge: Edge) -> usize {
        match edge {
            Edge::West | Edge::East => self.nj + 1,
            Edge::South | Edge::North => self.ni + 1,
        }
    }

    /// Flat index of the `k`-th point along `edge`, counted from the
    /// south (west/east edges) or west (south/north edges) end.
    #[inline]
    pub fn edge_index(&self, edge: Edge, k: usize) -> usize {
        match edge {
            Edge::West => self.index(0, k),
            Edge::East => self.index(self.ni, k),
            Edge::South => self.index(k, 0),
            Edge::North => self.index(k, self.nj),
        }
    }

    /// Points along `edge` in increasing index order.
    pub fn edge_points(&self, edge: Edge) -> Vec<LonLat> {
        (0..self.edge_len(edge))
            .map(|k| {
                let idx = self.edge_index(edge, k);
                LonLat::new(self.lon[idx], self.lat[idx])
            })
            .collect()
    }

    /// Apply `f` to every vertex in place.
    pub fn map_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(LonLat) -> LonLat,
    {
        for (lon, lat) in self.lon.iter_mut().zip(self.lat.iter_mut()) {
            let p = f(LonLat::new(*lon, *lat));
            *lon = p.lon;
            *lat = p.lat;
        }
    }
}
