//! View Summary Module
//! Pure aggregations from the cleaned table to per-view summaries.

use polars::prelude::*;
use statrs::distribution::{Continuous, Normal};
use std::collections::HashMap;
use thiserror::Error;

use crate::data::{COL_COST, COL_COUNTRY, COL_CUISINES, COL_PRICE_RANGE, COL_RATING, COL_VOTES};
use crate::stats::View;

/// Entries kept by the ranked bar views.
pub const TOP_N: usize = 10;
/// Fixed-width bin count for the rating histogram.
pub const RATING_BINS: usize = 20;
/// Fixed-width bin count for the votes histogram.
pub const VOTES_BINS: usize = 50;
/// Votes above this exist in the data but are not displayed.
pub const VOTES_DISPLAY_MAX: f64 = 2000.0;
/// Correlation matrix columns, in display order.
pub const CORRELATION_COLUMNS: [&str; 4] = [COL_COST, COL_PRICE_RANGE, COL_VOTES, COL_RATING];

const CURVE_POINTS: usize = 200;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("column \"{0}\" has no usable values")]
    EmptyColumn(String),
}

/// One labelled value in a ranked bar summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub cost: f64,
    pub rating: f64,
    pub votes: f64,
    pub price_range: i64,
}

/// Summary handed to the chart layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewSummary {
    Ranked {
        entries: Vec<RankedEntry>,
        value_label: &'static str,
    },
    Pie {
        slices: Vec<PieSlice>,
    },
    Histogram {
        bins: Vec<HistogramBin>,
        curve: Option<Vec<[f64; 2]>>,
        display_max: Option<f64>,
    },
    Scatter {
        points: Vec<ScatterPoint>,
    },
    Heatmap {
        labels: Vec<&'static str>,
        matrix: Vec<Vec<f64>>,
    },
}

impl ViewSummary {
    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            ViewSummary::Ranked { entries, .. } => entries.is_empty(),
            ViewSummary::Pie { slices } => slices.is_empty(),
            ViewSummary::Histogram { bins, .. } => bins.is_empty(),
            ViewSummary::Scatter { points } => points.is_empty(),
            ViewSummary::Heatmap { matrix, .. } => matrix.is_empty(),
        }
    }
}

/// Computes per-view summaries from the cleaned table.
pub struct SummaryCalculator;

impl SummaryCalculator {
    /// Compute the summary for one view. An empty cleaned table yields the
    /// view's empty shape; per-view failures surface as errors without
    /// touching any other view.
    pub fn compute(df: &DataFrame, view: View) -> Result<ViewSummary, SummaryError> {
        match view {
            View::TopCountries => Self::top_countries(df),
            View::TopCuisines => Self::top_cuisines(df),
            View::RatingDistribution => Self::rating_distribution(df),
            View::PriceRangeDistribution => Self::price_range_distribution(df),
            View::CostVsRating => Self::cost_vs_rating(df),
            View::CorrelationHeatmap => Self::correlation_heatmap(df),
            View::VotesDistribution => Self::votes_distribution(df),
            View::AvgCostByCountry => Self::avg_cost_by_country(df),
            View::CuisineVsRating => Self::cuisine_vs_rating(df),
        }
    }

    fn top_countries(df: &DataFrame) -> Result<ViewSummary, SummaryError> {
        let countries = Self::text_column(df, COL_COUNTRY)?;
        let entries = Self::top_n(Self::count_by_key(countries.into_iter()), TOP_N);
        Ok(ViewSummary::Ranked {
            entries,
            value_label: "Restaurants",
        })
    }

    /// Multi-cuisine strings count as one distinct category; they are
    /// deliberately not split on commas.
    fn top_cuisines(df: &DataFrame) -> Result<ViewSummary, SummaryError> {
        let cuisines = Self::text_column(df, COL_CUISINES)?;
        let entries = Self::top_n(Self::count_by_key(cuisines.into_iter()), TOP_N);
        Ok(ViewSummary::Ranked {
            entries,
            value_label: "Restaurants",
        })
    }

    fn rating_distribution(df: &DataFrame) -> Result<ViewSummary, SummaryError> {
        let values: Vec<f64> = Self::numeric_column(df, COL_RATING)?
            .into_iter()
            .flatten()
            .collect();
        let bins = Self::histogram(&values, RATING_BINS);
        let curve = Self::kde_curve(&values, &bins);
        Ok(ViewSummary::Histogram {
            bins,
            curve,
            display_max: None,
        })
    }

    fn price_range_distribution(df: &DataFrame) -> Result<ViewSummary, SummaryError> {
        let tiers = Self::numeric_column(df, COL_PRICE_RANGE)?;
        let entries = Self::count_by_key(
            tiers
                .into_iter()
                .map(|tier| tier.map(|t| format!("{}", t as i64))),
        );
        let total: f64 = entries.iter().map(|e| e.value).sum();
        let keep = entries.len();
        let ranked = Self::top_n(entries, keep);
        let slices = ranked
            .into_iter()
            .map(|e| PieSlice {
                label: e.label,
                count: e.value as usize,
                percent: 100.0 * e.value / total,
            })
            .collect();
        Ok(ViewSummary::Pie { slices })
    }

    fn cost_vs_rating(df: &DataFrame) -> Result<ViewSummary, SummaryError> {
        let cost = Self::numeric_column(df, COL_COST)?;
        let rating = Self::numeric_column(df, COL_RATING)?;
        let votes = Self::numeric_column(df, COL_VOTES)?;
        let tier = Self::numeric_column(df, COL_PRICE_RANGE)?;

        let mut points = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            if let (Some(cost), Some(rating), Some(votes), Some(tier)) =
                (cost[i], rating[i], votes[i], tier[i])
            {
                points.push(ScatterPoint {
                    cost,
                    rating,
                    votes,
                    price_range: tier as i64,
                });
            }
        }
        Ok(ViewSummary::Scatter { points })
    }

    fn correlation_heatmap(df: &DataFrame) -> Result<ViewSummary, SummaryError> {
        let labels: Vec<&'static str> = CORRELATION_COLUMNS.to_vec();
        if df.height() == 0 {
            return Ok(ViewSummary::Heatmap {
                labels,
                matrix: Vec::new(),
            });
        }

        let mut columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(CORRELATION_COLUMNS.len());
        for name in CORRELATION_COLUMNS {
            let values = Self::numeric_column(df, name)?;
            if values.iter().all(Option::is_none) {
                return Err(SummaryError::EmptyColumn(name.to_string()));
            }
            columns.push(values);
        }

        let n = columns.len();
        let mut matrix = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            for j in 0..n {
                matrix[i][j] = if i == j {
                    1.0
                } else {
                    Self::pearson(&columns[i], &columns[j])
                };
            }
        }
        Ok(ViewSummary::Heatmap { labels, matrix })
    }

    fn votes_distribution(df: &DataFrame) -> Result<ViewSummary, SummaryError> {
        let values: Vec<f64> = Self::numeric_column(df, COL_VOTES)?
            .into_iter()
            .flatten()
            .collect();
        let bins = Self::clip_bins(Self::histogram(&values, VOTES_BINS), VOTES_DISPLAY_MAX);
        Ok(ViewSummary::Histogram {
            bins,
            curve: None,
            display_max: Some(VOTES_DISPLAY_MAX),
        })
    }

    /// Plain mean per country; countries with few records are not weighted
    /// differently.
    fn avg_cost_by_country(df: &DataFrame) -> Result<ViewSummary, SummaryError> {
        let countries = Self::text_column(df, COL_COUNTRY)?;
        let costs = Self::numeric_column(df, COL_COST)?;
        let entries = Self::top_n(
            Self::mean_by_key(countries.into_iter().zip(costs)),
            TOP_N,
        );
        Ok(ViewSummary::Ranked {
            entries,
            value_label: "Average Cost for Two",
        })
    }

    fn cuisine_vs_rating(df: &DataFrame) -> Result<ViewSummary, SummaryError> {
        let cuisines = Self::text_column(df, COL_CUISINES)?;
        let ratings = Self::numeric_column(df, COL_RATING)?;
        let entries = Self::top_n(
            Self::mean_by_key(cuisines.into_iter().zip(ratings)),
            TOP_N,
        );
        Ok(ViewSummary::Ranked {
            entries,
            value_label: "Average Rating",
        })
    }

    /// Walk a column as optional strings.
    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, SummaryError> {
        let column = df.column(name)?;
        let mut out = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let value = column.get(i)?;
            if value.is_null() {
                out.push(None);
            } else {
                out.push(Some(value.to_string().trim_matches('"').to_string()));
            }
        }
        Ok(out)
    }

    /// Walk a column as optional f64, casting on the way.
    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, SummaryError> {
        let casted = df.column(name)?.cast(&DataType::Float64)?;
        let ca = casted.f64()?;
        Ok(ca.into_iter().collect())
    }

    /// Count occurrences per key, accumulating in first-seen order so ties
    /// later resolve by first appearance.
    fn count_by_key(keys: impl Iterator<Item = Option<String>>) -> Vec<RankedEntry> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, f64> = HashMap::new();
        for key in keys.flatten() {
            if !counts.contains_key(&key) {
                order.push(key.clone());
            }
            *counts.entry(key).or_insert(0.0) += 1.0;
        }
        order
            .into_iter()
            .map(|label| {
                let value = counts[&label];
                RankedEntry { label, value }
            })
            .collect()
    }

    /// Mean per key, first-seen order; rows missing key or value are skipped.
    fn mean_by_key(
        pairs: impl Iterator<Item = (Option<String>, Option<f64>)>,
    ) -> Vec<RankedEntry> {
        let mut order: Vec<String> = Vec::new();
        let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
        for (key, value) in pairs {
            let (Some(key), Some(value)) = (key, value) else {
                continue;
            };
            if !sums.contains_key(&key) {
                order.push(key.clone());
            }
            let slot = sums.entry(key).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }
        order
            .into_iter()
            .map(|label| {
                let (sum, n) = sums[&label];
                RankedEntry {
                    value: sum / n as f64,
                    label,
                }
            })
            .collect()
    }

    /// Stable descending sort, then keep the head.
    fn top_n(mut entries: Vec<RankedEntry>, n: usize) -> Vec<RankedEntry> {
        entries.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries.truncate(n);
        entries
    }

    /// Fixed-width bins over the full value range.
    fn histogram(values: &[f64], bin_count: usize) -> Vec<HistogramBin> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            if v.is_nan() {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
        }
        if !min.is_finite() {
            return Vec::new();
        }
        if min == max {
            return vec![HistogramBin {
                lower: min,
                upper: max,
                count: values.iter().filter(|v| !v.is_nan()).count(),
            }];
        }

        let width = (max - min) / bin_count as f64;
        let mut counts = vec![0usize; bin_count];
        for &v in values {
            if v.is_nan() {
                continue;
            }
            let idx = (((v - min) / width) as usize).min(bin_count - 1);
            counts[idx] += 1;
        }
        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: min + i as f64 * width,
                upper: min + (i + 1) as f64 * width,
                count,
            })
            .collect()
    }

    /// Drop bins beyond the display cap and clamp the last visible edge, so
    /// no reported edge exceeds the cap.
    fn clip_bins(bins: Vec<HistogramBin>, cap: f64) -> Vec<HistogramBin> {
        bins.into_iter()
            .filter(|bin| bin.lower < cap)
            .map(|mut bin| {
                if bin.upper > cap {
                    bin.upper = cap;
                }
                bin
            })
            .collect()
    }

    /// Gaussian KDE with Scott's bandwidth, evaluated across the histogram
    /// range and scaled to the count axis so it overlays the bars.
    fn kde_curve(values: &[f64], bins: &[HistogramBin]) -> Option<Vec<[f64; 2]>> {
        let n = values.len();
        let first = bins.first()?;
        let last = bins.last()?;
        if n < 2 {
            return None;
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std = variance.sqrt();
        if !(std > 0.0) {
            return None;
        }

        let bandwidth = std * (n as f64).powf(-0.2);
        let kernel = Normal::new(0.0, bandwidth).ok()?;
        let bin_width = first.upper - first.lower;
        let span = last.upper - first.lower;

        let mut curve = Vec::with_capacity(CURVE_POINTS);
        for i in 0..CURVE_POINTS {
            let x = first.lower + span * i as f64 / (CURVE_POINTS - 1) as f64;
            let density = values.iter().map(|&v| kernel.pdf(x - v)).sum::<f64>() / n as f64;
            curve.push([x, density * n as f64 * bin_width]);
        }
        Some(curve)
    }

    /// Pearson correlation over pairwise-complete observations, clamped to
    /// [-1, 1]. Fewer than two complete pairs or zero variance yields NaN.
    fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
        let pairs: Vec<(f64, f64)> = a
            .iter()
            .zip(b.iter())
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .collect();
        let n = pairs.len();
        if n < 2 {
            return f64::NAN;
        }

        let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
        let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in &pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }
        if var_x == 0.0 || var_y == 0.0 {
            return f64::NAN;
        }
        (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
    }
}
