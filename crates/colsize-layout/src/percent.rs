#![forbid(unsafe_code)]

//! Percent normalizer.

/// Tolerance under which a clamped sum counts as exactly 100.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Normalize `values` into a percentage distribution summing to 100.
///
/// - Negative and non-finite entries (NaN stands in for "missing" or
///   "non-numeric") are clamped to `0.0`.
/// - An empty input yields an empty output.
/// - If nothing positive remains, every entry becomes `100 / N`.
/// - If the clamped sum is already within [`SUM_TOLERANCE`] of 100, the
///   clamped vector is returned unchanged.
/// - Otherwise every entry is scaled by `100 / sum`. The scaling goes
///   through the largest entry, so finite inputs at the extremes of `f64`
///   (near `f64::MAX`, or subnormal) still sum to 100.
///
/// Length and order are preserved.
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let clamped: Vec<f64> = values.iter().copied().map(clamp_entry).collect();
    let peak = clamped.iter().copied().fold(0.0, f64::max);

    if peak <= 0.0 {
        let equal = 100.0 / clamped.len() as f64;
        return vec![equal; clamped.len()];
    }
    let sum: f64 = clamped.iter().sum();
    if (sum - 100.0).abs() < SUM_TOLERANCE {
        return clamped;
    }

    // Dividing by the peak first keeps the sum in [1, N]: no overflow for
    // huge entries, no infinite scale for subnormal ones.
    let relative: Vec<f64> = clamped.into_iter().map(|v| v / peak).collect();
    let scale = 100.0 / relative.iter().sum::<f64>();
    relative.into_iter().map(|v| v * scale).collect()
}

#[inline]
fn clamp_entry(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(v: &[f64]) -> f64 {
        v.iter().sum()
    }

    #[test]
    fn empty_stays_empty() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn all_zero_splits_equally() {
        let out = normalize(&[0.0, 0.0, 0.0]);
        assert_eq!(out.len(), 3);
        for v in &out {
            assert_eq!(*v, 100.0 / 3.0);
        }
    }

    #[test]
    fn invalid_entries_clamp_to_zero() {
        let out = normalize(&[f64::NAN, -10.0, 50.0, f64::INFINITY]);
        assert_eq!(out, vec![0.0, 0.0, 100.0, 0.0]);
    }

    #[test]
    fn all_invalid_splits_equally() {
        let out = normalize(&[f64::NAN, -1.0]);
        assert_eq!(out, vec![50.0, 50.0]);
    }

    #[test]
    fn exact_hundred_is_returned_unchanged() {
        let input = [33.0, 33.0, 34.0];
        assert_eq!(normalize(&input), input.to_vec());
    }

    #[test]
    fn near_hundred_is_not_rescaled() {
        let input = [50.0, 50.000_000_1];
        assert_eq!(normalize(&input), input.to_vec());
    }

    #[test]
    fn scales_proportionally() {
        let out = normalize(&[1.0, 1.0, 2.0]);
        assert_eq!(out, vec![25.0, 25.0, 50.0]);
        assert!((sum(&out) - 100.0).abs() < SUM_TOLERANCE);
    }

    #[test]
    fn scales_up_small_shares() {
        let out = normalize(&[10.0, 30.0]);
        assert!((out[0] - 25.0).abs() < SUM_TOLERANCE);
        assert!((out[1] - 75.0).abs() < SUM_TOLERANCE);
    }

    #[test]
    fn huge_entries_do_not_overflow() {
        assert_eq!(normalize(&[f64::MAX, f64::MAX]), vec![50.0, 50.0]);

        let out = normalize(&[1e308, 1e308, 1.0]);
        assert!((sum(&out) - 100.0).abs() < SUM_TOLERANCE, "sum {}", sum(&out));
        assert_eq!(out[0], out[1]);
        assert!(out[2] < 1e-300);
    }

    #[test]
    fn subnormal_entries_do_not_blow_up() {
        let tiny = 5e-324;
        assert_eq!(normalize(&[tiny, tiny]), vec![50.0, 50.0]);

        let out = normalize(&[f64::MIN_POSITIVE / 4.0, f64::MIN_POSITIVE / 4.0, 0.0]);
        assert!(out.iter().all(|v| v.is_finite()));
        assert!((sum(&out) - 100.0).abs() < SUM_TOLERANCE);
    }

    #[test]
    fn order_and_length_preserved() {
        let out = normalize(&[60.0, 0.0, 20.0, 20.0]);
        assert_eq!(out, vec![60.0, 0.0, 20.0, 20.0]);
        let out = normalize(&[3.0, 1.0]);
        assert!(out[0] > out[1]);
    }

    #[test]
    fn single_column_is_full_width() {
        assert_eq!(normalize(&[4.0]), vec![100.0]);
        assert_eq!(normalize(&[0.0]), vec![100.0]);
    }
}
