//! Chart data preparation. Nothing here draws; everything is testable.

use crate::error::{EdaError, Result};
use crate::utils::{optional_f64_values, optional_string_values};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;

/// Row counts per category, split by a hue column.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedCounts {
    pub categories: Vec<String>,
    pub hues: Vec<String>,
    /// `counts[category][hue]`
    pub counts: Vec<Vec<usize>>,
}

impl GroupedCounts {
    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Equal-width bins over a value range. The last bin includes its right edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` edges, ascending
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Five-number summary with 1.5 IQR whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub label: String,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value not below `q1 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest value not above `q3 + 1.5 * IQR`
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

fn series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))
}

/// Count rows per (`category`, `hue`) pair. Rows missing either are skipped;
/// both axes are sorted.
pub fn grouped_counts(df: &DataFrame, category: &str, hue: &str) -> Result<GroupedCounts> {
    let cats = optional_string_values(series(df, category)?)?;
    let hues = optional_string_values(series(df, hue)?)?;

    let mut pairs: BTreeMap<(String, String), usize> = BTreeMap::new();
    let mut cat_set = BTreeSet::new();
    let mut hue_set = BTreeSet::new();

    for (c, h) in cats.into_iter().zip(hues) {
        if let (Some(c), Some(h)) = (c, h) {
            cat_set.insert(c.clone());
            hue_set.insert(h.clone());
            *pairs.entry((c, h)).or_insert(0) += 1;
        }
    }

    let categories: Vec<String> = cat_set.into_iter().collect();
    let hues: Vec<String> = hue_set.into_iter().collect();
    let counts = categories
        .iter()
        .map(|c| {
            hues.iter()
                .map(|h| pairs.get(&(c.clone(), h.clone())).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    Ok(GroupedCounts {
        categories,
        hues,
        counts,
    })
}

/// Bin values into `bins` equal-width bins spanning their range. A constant
/// sequence gets a unit-wide range centered on the value.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect();

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram { edges, counts })
}

/// Scott's rule bandwidth: sample std times `n^(-1/5)`.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bw = var.sqrt() * (n as f64).powf(-0.2);

    (bw > 0.0).then_some(bw)
}

/// Gaussian kernel density evaluated at each grid point.
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
    let bw = scott_bandwidth(values)?;
    let n = values.len() as f64;
    let norm = 1.0 / (n * bw * (2.0 * PI).sqrt());

    Some(
        grid.iter()
            .map(|&x| {
                values
                    .iter()
                    .map(|&v| {
                        let z = (x - v) / bw;
                        (-0.5 * z * z).exp()
                    })
                    .sum::<f64>()
                    * norm
            })
            .collect(),
    )
}

/// Density curve over the histogram range, scaled so it overlays bar counts.
pub fn kde_curve(values: &[f64], hist: &Histogram, points: usize) -> Vec<(f64, f64)> {
    let (Some(&lo), Some(&hi)) = (hist.edges.first(), hist.edges.last()) else {
        return Vec::new();
    };
    if points < 2 {
        return Vec::new();
    }

    let step = (hi - lo) / (points - 1) as f64;
    let grid: Vec<f64> = (0..points).map(|i| lo + step * i as f64).collect();
    let scale = values.len() as f64 * hist.bin_width();

    match gaussian_kde(values, &grid) {
        Some(density) => grid
            .into_iter()
            .zip(density)
            .map(|(x, d)| (x, d * scale))
            .collect(),
        None => Vec::new(),
    }
}

/// Box statistics of `values`. `None` when there are none.
pub fn box_stats(label: &str, values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }

    let ca = Float64Chunked::from_slice(label.into(), values);
    let quartile = |q: f64| ca.quantile(q, QuantileMethod::Linear).ok().flatten();
    let q1 = quartile(0.25)?;
    let q3 = quartile(0.75)?;
    let median = ca.median()?;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= low_fence && *v <= high_fence)
        .collect();
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxStats {
        label: label.to_string(),
        q1,
        median,
        q3,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers,
    })
}

/// Non-missing `value` column entries per sorted `group` value.
pub fn values_by_group(df: &DataFrame, group: &str, value: &str) -> Result<Vec<(String, Vec<f64>)>> {
    let groups = optional_string_values(series(df, group)?)?;
    let values = optional_f64_values(series(df, value)?)?;

    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (g, v) in groups.into_iter().zip(values) {
        if let (Some(g), Some(v)) = (g, v) {
            grouped.entry(g).or_default().push(v);
        }
    }

    Ok(grouped.into_iter().collect())
}
