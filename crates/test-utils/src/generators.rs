//! Comparison helpers for coordinate and metric buffers.

/// Largest absolute element-wise difference of two equally long slices.
///
/// # Panics
///
/// Panics if the lengths differ.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "slices differ in length");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Largest difference between two longitude slices in degrees, treating
/// values 360° apart as equal.
pub fn max_lon_diff_deg(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "slices differ in length");
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = (x - y).rem_euclid(360.0);
            d.min(360.0 - d)
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_abs_diff() {
        assert_eq!(max_abs_diff(&[1.0, 2.0, 3.0], &[1.0, 2.5, 2.0]), 1.0);
        assert_eq!(max_abs_diff(&[], &[]), 0.0);
    }

    #[test]
    fn test_max_lon_diff_wraps() {
        let d = max_lon_diff_deg(&[359.9999, 10.0], &[0.0001, 10.0]);
        assert!((d - 0.0002).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "differ in length")]
    fn test_max_abs_diff_length_mismatch() {
        max_abs_diff(&[1.0], &[]);
    }
}
