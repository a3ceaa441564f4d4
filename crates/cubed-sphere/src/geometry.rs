//! Vector and spherical geometry kernel.
//!
//! Longitudes and latitudes are in radians throughout. Cartesian points are
//! on the unit sphere unless a radius is carried explicitly.
//!
//! Two coordinate conventions coexist here:
//! - [`latlon2xyz`] / [`xyz2latlon`]: z = sin(lat), longitude in [0, 2π).
//! - [`spherical_to_cartesian`] / [`cartesian_to_spherical`]: z = -r·sin(lat),
//!   longitude in [-π, π]. Only the tile assembler uses these, through
//!   [`rot_3d_spherical`].

use std::f64::consts::PI;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GridError, Result};

/// Sphere radius used for lengths and areas (meters).
pub const RADIUS: f64 = 6_371_000.0;

/// Degrees to radians.
pub const D2R: f64 = PI / 180.0;

/// Radians to degrees.
pub const R2D: f64 = 180.0 / PI;

pub(crate) const EPSLN4: f64 = 1.0e-4;
pub(crate) const EPSLN5: f64 = 1.0e-5;
pub(crate) const EPSLN7: f64 = 1.0e-7;
pub(crate) const EPSLN8: f64 = 1.0e-8;
pub(crate) const EPSLN10: f64 = 1.0e-10;

/// A point on the sphere (radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Build from degrees.
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg * D2R,
            lat: lat_deg * D2R,
        }
    }
}

/// A point in (lon, lat, radius) form, as consumed by [`rot_3d_spherical`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalPoint {
    pub lon: f64,
    pub lat: f64,
    pub r: f64,
}

/// Cartesian unit vector for a (lon, lat) point.
#[inline]
pub fn latlon2xyz(p: LonLat) -> Vector3<f64> {
    Vector3::new(
        p.lat.cos() * p.lon.cos(),
        p.lat.cos() * p.lon.sin(),
        p.lat.sin(),
    )
}

/// (lon, lat) of a Cartesian vector. The vector need not be normalized.
///
/// Longitude is in [0, 2π); points within 1e-10 of the z axis get longitude 0.
#[inline]
pub fn xyz2latlon(v: &Vector3<f64>) -> LonLat {
    let dist = v.norm();
    let x = v.x / dist;
    let y = v.y / dist;
    let z = v.z / dist;

    let mut lon = if x.abs() + y.abs() < EPSLN10 {
        0.0
    } else {
        y.atan2(x)
    };
    let lat = z.clamp(-1.0, 1.0).asin();
    if lon < 0.0 {
        lon += 2.0 * PI;
    }
    LonLat { lon, lat }
}

/// Convert (lon, lat, r) to Cartesian with the z = -r·sin(lat) convention.
pub fn spherical_to_cartesian(p: SphericalPoint) -> Vector3<f64> {
    Vector3::new(
        p.r * p.lon.cos() * p.lat.cos(),
        p.r * p.lon.sin() * p.lat.cos(),
        -p.r * p.lat.sin(),
    )
}

/// Inverse of [`spherical_to_cartesian`]. Longitude is in [-π, π].
pub fn cartesian_to_spherical(v: &Vector3<f64>) -> SphericalPoint {
    let r = v.norm();
    let lon = if v.x.abs() + v.y.abs() < EPSLN10 {
        0.0
    } else {
        v.y.atan2(v.x)
    };
    let lat = (v.z / r).clamp(-1.0, 1.0).acos() - PI / 2.0;
    SphericalPoint { lon, lat, r }
}

/// Great-circle distance between two points (meters, on [`RADIUS`]).
///
/// Uses the haversine form, which stays accurate for short arcs.
pub fn great_circle_distance(p1: LonLat, p2: LonLat) -> f64 {
    let half_dlat = ((p1.lat - p2.lat) / 2.0).sin();
    let half_dlon = ((p1.lon - p2.lon) / 2.0).sin();
    let beta = 2.0
        * (half_dlat * half_dlat + p1.lat.cos() * p2.lat.cos() * (half_dlon * half_dlon))
            .sqrt()
            .asin();
    RADIUS * beta
}

/// Angle at `v1` between the great circles through (v1, v2) and (v1, v3).
///
/// Degenerate inputs (a zero cross product) give 0.
pub fn spherical_angle(v1: &Vector3<f64>, v2: &Vector3<f64>, v3: &Vector3<f64>) -> f64 {
    let p = v1.cross(v2);
    let q = v1.cross(v3);

    let ddd = p.norm_squared() * q.norm_squared();
    if ddd <= 0.0 {
        return 0.0;
    }

    let cos_angle = p.dot(&q) / ddd.sqrt();
    if cos_angle > 1.0 {
        0.0
    } else if cos_angle < -1.0 {
        PI
    } else {
        cos_angle.acos()
    }
}

/// Area of a spherical quadrilateral from its angular excess.
///
/// Corners are lower-left, upper-left, lower-right, upper-right; the result
/// is in units of `radius`².
pub fn spherical_excess_area(
    p_ll: LonLat,
    p_ul: LonLat,
    p_lr: LonLat,
    p_ur: LonLat,
    radius: f64,
) -> f64 {
    let v_ll = latlon2xyz(p_ll);
    let v_ul = latlon2xyz(p_ul);
    let v_lr = latlon2xyz(p_lr);
    let v_ur = latlon2xyz(p_ur);

    let ang_ll = spherical_angle(&v_ll, &v_lr, &v_ul);
    let ang_ul = spherical_angle(&v_ul, &v_ll, &v_ur);
    let ang_ur = spherical_angle(&v_ur, &v_ul, &v_lr);
    let ang_lr = spherical_angle(&v_lr, &v_ur, &v_ll);

    (ang_ll + ang_ul + ang_ur + ang_lr - 2.0 * PI) * radius * radius
}

/// Angle between two vectors. A zero vector gives 0 rather than NaN.
pub fn angle_between_vectors(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let nrm = v1.norm_squared() * v2.norm_squared();
    if nrm > 0.0 {
        (v1.dot(v2) / nrm.sqrt()).clamp(-1.0, 1.0).acos()
    } else {
        0.0
    }
}

/// Unit normal of the plane through the origin, `p1` and `p2`.
///
/// Collinear inputs give the zero vector.
pub fn plane_normal(p1: &Vector3<f64>, p2: &Vector3<f64>) -> Vector3<f64> {
    let plane = p1.cross(p2);
    let mag = plane.norm();
    if mag > 0.0 {
        plane / mag
    } else {
        plane
    }
}

/// Angular excess of the quadrilateral v1-v2-v3-v4 from the angles between
/// consecutive edge-plane normals.
pub fn excess_of_quad(
    v1: &Vector3<f64>,
    v2: &Vector3<f64>,
    v3: &Vector3<f64>,
    v4: &Vector3<f64>,
) -> f64 {
    let plane1 = plane_normal(v1, v2);
    let plane2 = plane_normal(v2, v3);
    let plane3 = plane_normal(v3, v4);
    let plane4 = plane_normal(v4, v1);

    let ang12 = PI - angle_between_vectors(&plane2, &plane1);
    let ang23 = PI - angle_between_vectors(&plane3, &plane2);
    let ang34 = PI - angle_between_vectors(&plane4, &plane3);
    let ang41 = PI - angle_between_vectors(&plane1, &plane4);

    ang12 + ang23 + ang34 + ang41 - 2.0 * PI
}

/// Mirror image of `p0` through the plane containing `p1`, `p2` and the
/// sphere center.
pub fn mirror_latlon(p1: LonLat, p2: LonLat, p0: LonLat) -> LonLat {
    let v0 = latlon2xyz(p0);
    let nb = latlon2xyz(p1).cross(&latlon2xyz(p2)).normalize();

    let pdot = v0.dot(&nb);
    xyz2latlon(&(v0 - nb * (2.0 * pdot)))
}

/// Coordinate axis for [`rot_3d`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Map 1, 2, 3 to X, Y, Z.
    pub fn from_index(index: i32) -> Result<Self> {
        match index {
            1 => Ok(Axis::X),
            2 => Ok(Axis::Y),
            3 => Ok(Axis::Z),
            other => Err(GridError::InvalidAxis(other)),
        }
    }
}

/// Unit of a rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

/// Matrix that rotates the coordinate frame by `angle` radians about `axis`.
pub fn rotation_matrix(axis: Axis, angle: f64) -> Matrix3<f64> {
    let c = angle.cos();
    let s = angle.sin();
    match axis {
        Axis::X => Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, c, s, //
            0.0, -s, c,
        ),
        Axis::Y => Matrix3::new(
            c, 0.0, -s, //
            0.0, 1.0, 0.0, //
            s, 0.0, c,
        ),
        Axis::Z => Matrix3::new(
            c, s, 0.0, //
            -s, c, 0.0, //
            0.0, 0.0, 1.0,
        ),
    }
}

/// Rotate a Cartesian point about a coordinate axis.
pub fn rot_3d(axis: Axis, v: &Vector3<f64>, angle: f64, unit: AngleUnit) -> Vector3<f64> {
    let angle = match unit {
        AngleUnit::Degrees => angle * D2R,
        AngleUnit::Radians => angle,
    };
    rotation_matrix(axis, angle) * v
}

/// Rotate a point given in (lon, lat, r) form, returning the same form.
pub fn rot_3d_spherical(
    axis: Axis,
    p: SphericalPoint,
    angle: f64,
    unit: AngleUnit,
) -> SphericalPoint {
    let v = spherical_to_cartesian(p);
    cartesian_to_spherical(&rot_3d(axis, &v, angle, unit))
}

/// Spherical linear interpolation along the great circle from `p1` to `p2`.
///
/// Antipodal points have no unique great circle and are an error for every
/// `beta`. Otherwise `beta` = 0 returns `p1` and `beta` = 1 returns `p2`
/// exactly, and colocated points return `p1` with a warning.
pub fn spherical_linear_interpolation(beta: f64, p1: LonLat, p2: LonLat) -> Result<LonLat> {
    let e1 = latlon2xyz(p1).normalize();
    let e2 = latlon2xyz(p2).normalize();
    let omega = e1.dot(&e2).clamp(-1.0, 1.0).acos();

    if (PI - omega).abs() < EPSLN5 {
        return Err(GridError::AntipodalInterpolation {
            lon1: p1.lon,
            lat1: p1.lat,
            lon2: p2.lon,
            lat2: p2.lat,
        });
    }

    if beta == 0.0 {
        return Ok(p1);
    }
    if beta == 1.0 {
        return Ok(p2);
    }

    if (p1.lon - p2.lon).abs() < EPSLN8 && (p1.lat - p2.lat).abs() < EPSLN8 {
        warn!(
            lon = p1.lon,
            lat = p1.lat,
            "spherical_linear_interpolation was passed two colocated points"
        );
        return Ok(p1);
    }

    // Same point with a different longitude label, e.g. on a pole.
    if omega < EPSLN10 {
        warn!(
            omega,
            lon1 = p1.lon,
            lat1 = p1.lat,
            lon2 = p2.lon,
            lat2 = p2.lat,
            "spherical_linear_interpolation was passed two coincident points"
        );
        return Ok(p1);
    }

    let alpha = 1.0 - beta;
    let eb = (e2 * (beta * omega).sin() + e1 * (alpha * omega).sin()) / omega.sin();
    Ok(xyz2latlon(&eb))
}
