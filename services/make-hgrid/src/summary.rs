//! Run summaries printed after grid generation.

use cubed_sphere::geometry::RADIUS;
use cubed_sphere::{CubicGrid, TargetLatSuggestion};
use serde::Serialize;

/// Per tile or nest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    pub name: String,
    pub nx: usize,
    pub ny: usize,
    pub area: f64,
    pub lon_range: (f64, f64),
    pub lat_range: (f64, f64),
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dx_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSummary {
    pub builder: String,
    pub entities: Vec<EntitySummary>,
    /// Total area of the six global tiles over 4πR².
    pub sphere_coverage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_lat_suggestion: Option<TargetLatSuggestion>,
}

fn range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

pub fn summarize(grid: &CubicGrid, builder: &str) -> GridSummary {
    let entities = grid
        .tiles()
        .map(|tile| EntitySummary {
            name: tile.name(),
            nx: tile.nx(),
            ny: tile.ny(),
            area: tile.area.iter().sum(),
            lon_range: range(tile.x),
            lat_range: range(tile.y),
            dx_range: tile.dx.map(range),
        })
        .collect();

    let sphere = 4.0 * std::f64::consts::PI * RADIUS * RADIUS;
    GridSummary {
        builder: builder.to_string(),
        entities,
        sphere_coverage: grid.global_area() / sphere,
        target_lat_suggestion: grid.target_lat_suggestion.clone(),
    }
}

impl GridSummary {
    /// Plain-text rendering, one line per entity.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{} grid, {} entities, sphere coverage {:.12}\n",
            self.builder,
            self.entities.len(),
            self.sphere_coverage
        );
        for e in &self.entities {
            out.push_str(&format!(
                "{:>7}  {:>5} x {:<5} area {:.6e} m2  lon [{:.4}, {:.4}]  lat [{:.4}, {:.4}]\n",
                e.name, e.nx, e.ny, e.area, e.lon_range.0, e.lon_range.1, e.lat_range.0, e.lat_range.1
            ));
        }
        if let Some(s) = &self.target_lat_suggestion {
            out.push_str(&format!("input target_lat: {:.6}\n", s.input));
            if let Some(north) = s.north {
                out.push_str(&format!("suggested target_lat (north pole in grid): {north:.6}\n"));
            }
            if let Some(south) = s.south {
                out.push_str(&format!("suggested target_lat (south pole in grid): {south:.6}\n"));
            }
            for both in &s.both {
                out.push_str(&format!("suggested target_lat (both poles in grid): {both:.6}\n"));
            }
        }
        out
    }
}
