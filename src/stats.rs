//! Descriptive statistics over dataset columns
//!
//! Missing values (`None`) are skipped by every numeric statistic.

use serde::Serialize;
use std::collections::BTreeMap;

/// Default number of histogram bins for distribution views
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Largest bin count a histogram may be built with
pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// Arithmetic mean of the present values, `None` when there are none
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Count occurrences of each value, most frequent first.
///
/// Ties are ordered by ascending value.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut counts: Vec<(T, usize)> = counts.into_iter().collect();
    // Stable sort keeps ascending value order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most frequent value, smallest value on ties
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    value_counts(values).into_iter().next().map(|(v, _)| v)
}

/// One histogram bin covering `[lower, upper)` (the last bin is closed)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram of a column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
    /// Values included in the bins
    pub total: usize,
}

impl Histogram {
    /// Largest bin count
    pub fn peak(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Build an equal-width histogram over `[min, max]` of the present values.
///
/// Returns `None` when `bins` is zero or above `MAX_HISTOGRAM_BINS`, or when
/// there are no values. A constant column yields a single unit-width bin.
pub fn histogram(values: &[Option<f64>], bins: usize) -> Option<Histogram> {
    if bins == 0 || bins > MAX_HISTOGRAM_BINS {
        return None;
    }

    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let min = present.iter().copied().reduce(f64::min)?;
    let max = present.iter().copied().reduce(f64::max)?;

    if max == min {
        return Some(Histogram {
            min,
            max,
            bin_width: 1.0,
            bins: vec![HistogramBin {
                lower: min - 0.5,
                upper: min + 0.5,
                count: present.len(),
            }],
            total: present.len(),
        });
    }

    let bin_width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in &present {
        let index = (((value - min) / bin_width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * bin_width,
            upper: min + (i + 1) as f64 * bin_width,
            count,
        })
        .collect();

    Some(Histogram {
        min,
        max,
        bin_width,
        bins,
        total: present.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_skips_missing() {
        assert_eq!(mean(&[Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(mean(&[None, None]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_value_counts_order() {
        let counts = value_counts(vec![3, 1, 3, 2, 1, 3]);
        assert_eq!(counts, vec![(3, 3), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_mode_ties_pick_smallest() {
        assert_eq!(mode(vec![4, 2, 4, 2]), Some(2));
        assert_eq!(mode(Vec::<i64>::new()), None);
    }

    #[test]
    fn test_mode_over_optional_codes() {
        // Missing sorts before every known code
        assert_eq!(mode(vec![None, Some(1), None, Some(1)]), Some(None));
        assert_eq!(mode(vec![None, Some(1), Some(1)]), Some(Some(1)));
    }

    #[test]
    fn test_histogram_bins_and_edges() {
        let values: Vec<Option<f64>> = vec![Some(0.0), Some(1.0), Some(2.5), Some(10.0), None];
        let hist = histogram(&values, 4).unwrap();

        assert_eq!(hist.total, 4);
        assert_eq!(hist.bin_width, 2.5);
        let counts: Vec<usize> = hist.bins.iter().map(|b| b.count).collect();
        // 2.5 sits on the second bin's lower edge; 10.0 lands in the closed last bin
        assert_eq!(counts, vec![2, 1, 0, 1]);
        assert_eq!(hist.bins[3].upper, 10.0);
        assert_eq!(hist.peak(), 2);
    }

    #[test]
    fn test_histogram_constant_and_empty() {
        let hist = histogram(&[Some(5.0), Some(5.0)], 30).unwrap();
        assert_eq!(hist.bins.len(), 1);
        assert_eq!(hist.bins[0].count, 2);

        assert!(histogram(&[None], 30).is_none());
        assert!(histogram(&[Some(1.0)], 0).is_none());
    }

    #[test]
    fn test_histogram_rejects_oversized_bin_count() {
        let values = vec![Some(1.0), Some(2.0)];
        let widest = histogram(&values, MAX_HISTOGRAM_BINS).unwrap();
        assert_eq!(widest.bins.len(), MAX_HISTOGRAM_BINS);
        assert!(histogram(&values, MAX_HISTOGRAM_BINS + 1).is_none());
        assert!(histogram(&values, usize::MAX).is_none());
    }
}
