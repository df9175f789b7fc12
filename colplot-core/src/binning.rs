use crate::quantile::interquartile_range;
use colplot_common::PlotConfig;
use serde::{Deserialize, Serialize};

/// Fallbacks applied when a sample is too degenerate to bin on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinningPolicy {
    pub default_width: f64,
    pub default_count: usize,
    pub max_count: usize,
    /// Cap on `nx * ny` for a 2D grid.
    pub max_cells: usize,
}

impl Default for BinningPolicy {
    fn default() -> Self {
        Self { default_width: 1.0, default_count: 10, max_count: 100_000, max_cells: 1_000_000 }
    }
}

impl BinningPolicy {
    pub fn from_config(cfg: &PlotConfig) -> Self {
        let defaults = Self::default();
        Self {
            default_width: if cfg.default_bin_width > 0.0 { nice_round(cfg.default_bin_width) } else { defaults.default_width },
            default_count: cfg.default_bin_count.max(1),
            max_count: cfg.max_bin_count.max(1),
            max_cells: cfg.max_cells.max(1),
        }
    }
}

/// Raw Freedman–Diaconis width `2 * IQR / cbrt(n)`; `None` for an empty sample.
pub fn freedman_diaconis(sample: &[f64]) -> Option<f64> {
    if sample.is_empty() {
        return None;
    }
    Some(2.0 * interquartile_range(sample) / (sample.len() as f64).cbrt())
}

/// Snap `value` to the nearest of {1, 2, 5, 10} x 10^k. Non-positive input gives 1.0.
pub fn nice_round(value: f64) -> f64 {
    if value <= 0.0 || !value.is_finite() {
        return 1.0;
    }
    let exponent = value.log10().floor() as i32;
    let scale = 10f64.powi(exponent);
    let base = value / scale;
    let nice_base = if base < 1.5 {
        1.0
    } else if base < 3.0 {
        2.0
    } else if base < 7.0 {
        5.0
    } else {
        10.0
    };
    nice_base * scale
}

/// Smallest of {1, 2, 5, 10} x 10^k that is not below `value`. Non-positive input gives 1.0.
pub fn nice_ceil(value: f64) -> f64 {
    if value <= 0.0 || !value.is_finite() {
        return 1.0;
    }
    let exponent = value.log10().floor() as i32;
    let scale = 10f64.powi(exponent);
    let base = value / scale;
    let nice_base = [1.0, 2.0, 5.0].into_iter().find(|b| base <= b * (1.0 + 1e-9)).unwrap_or(10.0);
    nice_base * scale
}

pub fn bin_width(sample: &[f64], policy: &BinningPolicy) -> f64 {
    let Some(raw) = freedman_diaconis(sample) else {
        return policy.default_width;
    };
    let width = nice_round(raw);
    if width <= 0.0 { policy.default_width } else { width }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    pub width: f64,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl BinSpec {
    pub fn for_sample(sample: &[f64], policy: &BinningPolicy) -> Self {
        let width = bin_width(sample, policy);
        let (lower, upper) = min_max(sample).unwrap_or((0.0, 0.0));
        let range = upper - lower;
        let fitted = (range / width).floor();
        if fitted < 1.0 || !fitted.is_finite() {
            return Self { width, lower, upper, count: policy.default_count.min(policy.max_count) };
        }
        if fitted < policy.max_count as f64 {
            return Self { width, lower, upper, count: fitted as usize };
        }
        // Widen to the next nice width that covers the range in at most `max_count` bins.
        let widened = nice_ceil(range / policy.max_count as f64).max(width);
        let count = ((range / widened).ceil() as usize).clamp(1, policy.max_count);
        tracing::debug!(fitted, cap = policy.max_count, width = widened, count, "bin count capped");
        Self { width: widened, lower, upper, count }
    }

    /// Binning for both axes of a 2D grid, with `nx * ny` held to `policy.max_cells`.
    /// Each axis is rebinned with a per-axis cap scaled by the same factor.
    pub fn for_grid(x: &[f64], y: &[f64], policy: &BinningPolicy) -> (Self, Self) {
        let x_bins = Self::for_sample(x, policy);
        let y_bins = Self::for_sample(y, policy);
        let cells = x_bins.count.saturating_mul(y_bins.count);
        if cells <= policy.max_cells {
            return (x_bins, y_bins);
        }
        let shrink = (policy.max_cells as f64 / cells as f64).sqrt();
        let x_cap = ((x_bins.count as f64 * shrink).floor() as usize).clamp(1, policy.max_cells);
        let y_cap = (policy.max_cells / x_cap).max(1);
        tracing::debug!(cells, max_cells = policy.max_cells, x_cap, y_cap, "2D grid rebinned");
        (
            Self::for_sample(x, &BinningPolicy { max_count: x_cap, ..*policy }),
            Self::for_sample(y, &BinningPolicy { max_count: y_cap, ..*policy }),
        )
    }

    /// Width of one of the `count` equal partitions of `[lower, upper]`.
    /// At least `width` when `count` was floored; at most `width` when it was capped.
    pub fn step(&self) -> f64 {
        (self.upper - self.lower) / self.count as f64
    }

    /// Bin holding `value`; the last bin is closed on the right. Values off the range are `None`.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if !(value >= self.lower && value <= self.upper) {
            return None;
        }
        let step = self.step();
        if step <= 0.0 {
            return Some(0);
        }
        let idx = ((value - self.lower) / step) as usize;
        Some(idx.min(self.count - 1))
    }

    pub fn edges(&self) -> Vec<f64> {
        let step = self.step();
        (0..=self.count).map(|i| self.lower + i as f64 * step).collect()
    }

    pub fn center(&self, idx: usize) -> f64 {
        self.lower + (idx as f64 + 0.5) * self.step()
    }
}

pub(crate) fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_nice(v: f64) -> bool {
        let scale = 10f64.powi(v.log10().floor() as i32);
        let base = v / scale;
        [1.0, 2.0, 5.0, 10.0].iter().any(|b| (base - b).abs() < 1e-9)
    }

    #[test] fn nice_1_4() { assert_eq!(nice_round(1.4), 1.0); }
    #[test] fn nice_1_6() { assert_eq!(nice_round(1.6), 2.0); }
    #[test] fn nice_6_9() { assert_eq!(nice_round(6.9), 5.0); }
    #[test] fn nice_7_1() { assert_eq!(nice_round(7.1), 10.0); }
    #[test] fn nice_non_positive() { assert_eq!(nice_round(0.0), 1.0); assert_eq!(nice_round(-3.0), 1.0); assert_eq!(nice_round(f64::NAN), 1.0); }
    #[test] fn nice_keeps_exponent() { assert!((nice_round(0.042) - 0.05).abs() < 1e-15); assert_eq!(nice_round(2600.0), 2000.0); }

    #[test]
    fn nice_outputs_are_nice() {
        let mut v = 1e-6;
        while v < 1e7 {
            let r = nice_round(v);
            assert!(is_nice(r), "{v} -> {r}");
            assert!(r >= 0.66 * v && r <= 1.67 * v, "{v} -> {r}");
            v *= 1.37;
        }
    }

    #[test]
    fn empty_sample_uses_defaults() {
        let p = BinningPolicy::default();
        assert_eq!(freedman_diaconis(&[]), None);
        assert_eq!(bin_width(&[], &p), 1.0);
        let spec = BinSpec::for_sample(&[], &p);
        assert_eq!((spec.lower, spec.upper, spec.count), (0.0, 0.0, 10));
    }

    #[test]
    fn constant_sample_falls_back_to_ten_bins() {
        let spec = BinSpec::for_sample(&[3.0; 20], &BinningPolicy::default());
        assert_eq!(spec.width, 1.0);
        assert_eq!(spec.count, 10);
        assert_eq!(spec.index_of(3.0), Some(0));
    }

    #[test]
    fn uniform_0_100() {
        let sample: Vec<f64> = (0..1000).map(|i| i as f64 * 100.0 / 999.0).collect();
        let spec = BinSpec::for_sample(&sample, &BinningPolicy::default());
        assert!(spec.count >= 1);
        assert!(is_nice(spec.width));
        assert_eq!(spec.width, 10.0);
        assert_eq!(spec.count, 10);
        assert_eq!((spec.lower, spec.upper), (0.0, 100.0));
    }

    #[test]
    fn outlier_heavy_sample_is_capped() {
        let mut sample = vec![0.0; 99];
        sample.push(1e12);
        let p = BinningPolicy { max_count: 500, ..BinningPolicy::default() };
        let spec = BinSpec::for_sample(&sample, &p);
        assert_eq!(spec.count, 500);
        assert_eq!(spec.width, 2e9);
    }

    #[test]
    fn capped_width_covers_the_range() {
        // 1000 values on [0, 0.999] plus one at 1e6: FD width 0.5, far too many bins
        let mut sample: Vec<f64> = (0..1000).map(|i| i as f64 / 1000.0).collect();
        sample.push(1e6);
        for max_count in [7, 300, 1234, 100_000] {
            let p = BinningPolicy { max_count, ..BinningPolicy::default() };
            let spec = BinSpec::for_sample(&sample, &p);
            assert!(spec.count <= max_count, "{max_count}: {}", spec.count);
            assert!(spec.count >= 1);
            assert!(is_nice(spec.width), "{max_count}: {}", spec.width);
            assert!(spec.width * spec.count as f64 >= spec.upper - spec.lower, "{max_count}: {spec:?}");
            assert!(spec.step() <= spec.width);
            assert_eq!(spec.index_of(1e6), Some(spec.count - 1));
        }
    }

    #[test]
    fn nice_ceil_rounds_up() {
        assert_eq!(nice_ceil(1.0), 1.0);
        assert_eq!(nice_ceil(1.01), 2.0);
        assert_eq!(nice_ceil(2.5), 5.0);
        assert_eq!(nice_ceil(5.5), 10.0);
        assert!((nice_ceil(0.03) - 0.05).abs() < 1e-15);
        assert_eq!(nice_ceil(0.0), 1.0);
    }

    #[test]
    fn grid_is_held_to_max_cells() {
        let mut sample: Vec<f64> = (0..999).map(|i| i as f64 * 1e-5).collect();
        sample.push(1000.0);
        let p = BinningPolicy::default();
        let (xb, yb) = BinSpec::for_grid(&sample, &sample, &p);
        assert!(xb.count * yb.count <= p.max_cells, "{} x {}", xb.count, yb.count);
        assert!(xb.width * xb.count as f64 >= xb.upper - xb.lower);
        assert!(yb.width * yb.count as f64 >= yb.upper - yb.lower);
    }

    #[test]
    fn lopsided_grid_is_held_to_max_cells() {
        let mut wide: Vec<f64> = (0..999).map(|i| i as f64 * 1e-5).collect();
        wide.push(1000.0);
        let p = BinningPolicy { max_cells: 10, ..BinningPolicy::default() };
        let (xb, yb) = BinSpec::for_grid(&wide, &[1.0; 1000], &p);
        assert!(xb.count * yb.count <= 10, "{} x {}", xb.count, yb.count);
        assert_eq!(yb.count, 1);
    }

    #[test]
    fn small_grid_is_unchanged() {
        let sample: Vec<f64> = (0..1000).map(|i| i as f64 * 100.0 / 999.0).collect();
        let p = BinningPolicy::default();
        let (xb, _) = BinSpec::for_grid(&sample, &sample, &p);
        assert_eq!(xb, BinSpec::for_sample(&sample, &p));
    }

    #[test]
    fn index_closes_last_bin() {
        let spec = BinSpec { width: 2.0, lower: 0.0, upper: 10.0, count: 5 };
        assert_eq!(spec.index_of(0.0), Some(0));
        assert_eq!(spec.index_of(1.99), Some(0));
        assert_eq!(spec.index_of(2.0), Some(1));
        assert_eq!(spec.index_of(10.0), Some(4));
        assert_eq!(spec.index_of(10.5), None);
        assert_eq!(spec.index_of(f64::NAN), None);
        assert_eq!(spec.edges(), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(spec.center(2), 5.0);
    }

    #[test]
    fn policy_from_config() {
        let cfg = PlotConfig { default_bin_count: 0, default_bin_width: 2.0, ..PlotConfig::default() };
        let p = BinningPolicy::from_config(&cfg);
        assert_eq!(p.default_count, 1);
        assert_eq!(p.default_width, 2.0);
        let cfg = PlotConfig { default_bin_width: 3.0, max_cells: 0, ..PlotConfig::default() };
        let p = BinningPolicy::from_config(&cfg);
        assert_eq!(p.default_width, 5.0);
        assert_eq!(p.max_cells, 1);
    }
}
