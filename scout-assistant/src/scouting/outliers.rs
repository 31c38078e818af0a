// Z-score outlier detection across the batter population.

use crate::records::{avg_key, sr_key, BatterRecord, Population};

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single metric column across the
/// population.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and sample standard deviation (n-1 denominator) for a slice
/// of values. Returns `None` for fewer than two values, where the sample
/// deviation is undefined.
pub fn pool_stats(values: &[f64]) -> Option<PoolStats> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(PoolStats {
        mean,
        stdev: variance.sqrt(),
    })
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero (guarding
/// against division by zero).
pub fn zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Outlier detection settings, passed explicitly so thresholds can vary per
/// call without shared state.
#[derive(Debug, Clone, Copy)]
pub struct OutlierConfig {
    /// |z| must exceed this to count as an outlier.
    pub threshold: f64,
    /// Minimum population size for a z-score to be meaningful. Must be >= 2.
    pub min_sample: usize,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        OutlierConfig {
            threshold: 1.5,
            min_sample: 2,
        }
    }
}

/// How a batter's value compares to the peer population on one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Significantly above the population mean.
    Strength,
    /// Significantly below the population mean.
    Weakness,
    Neutral,
    /// Missing value or undersized population; skip silently, never render.
    InsufficientData,
}

/// Classification plus the numbers behind it.
#[derive(Debug, Clone, Copy)]
pub struct OutlierResult {
    pub classification: Classification,
    pub value: Option<f64>,
    pub zscore: Option<f64>,
}

/// Classify one batter value against the full population of the metric.
///
/// A zero-deviation population classifies everyone as `Neutral` regardless
/// of value. Recomputed from scratch each call; the population snapshot is
/// the single source of truth.
pub fn classify(
    value: Option<f64>,
    population: &[f64],
    config: &OutlierConfig,
) -> OutlierResult {
    let insufficient = OutlierResult {
        classification: Classification::InsufficientData,
        value,
        zscore: None,
    };

    let Some(value) = value else {
        return insufficient;
    };
    if population.len() < config.min_sample {
        return insufficient;
    }
    let Some(stats) = pool_stats(population) else {
        return insufficient;
    };

    let z = zscore(value, &stats);
    let classification = if stats.stdev < STDEV_EPSILON {
        Classification::Neutral
    } else if z > config.threshold {
        Classification::Strength
    } else if z < -config.threshold {
        Classification::Weakness
    } else {
        Classification::Neutral
    };

    OutlierResult {
        classification,
        value: Some(value),
        zscore: Some(z),
    }
}

// ---------------------------------------------------------------------------
// Pitch dimensions
// ---------------------------------------------------------------------------

/// Length buckets in the dataset's column naming.
const LENGTH_BUCKETS: &[&str] = &[
    "full",
    "good_length",
    "short",
    "short_of_a_good_length",
    "yorker",
    "full_toss",
];

/// Line buckets in the dataset's column naming.
const LINE_BUCKETS: &[&str] = &[
    "down_leg",
    "on_the_stumps",
    "outside_offstump",
    "wide_outside_offstump",
    "wide_down_leg",
];

/// A pitch dimension the detector walks bucket by bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Length,
    Line,
}

impl Dimension {
    /// The fragment used in metric column names.
    pub fn key_fragment(&self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Line => "line",
        }
    }

    pub fn buckets(&self) -> &'static [&'static str] {
        match self {
            Dimension::Length => LENGTH_BUCKETS,
            Dimension::Line => LINE_BUCKETS,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-dimension detection
// ---------------------------------------------------------------------------

/// One outlier bucket for a batter: display name plus the numbers the
/// write-up renders.
#[derive(Debug, Clone)]
pub struct BucketOutlier {
    /// Bucket name with underscores replaced by spaces.
    pub bucket: String,
    pub avg: f64,
    pub sr: f64,
    /// |z| of the average column; the ranking key.
    pub magnitude: f64,
}

/// Strengths and weaknesses for one dimension, each sorted by |z| descending.
#[derive(Debug, Clone, Default)]
pub struct DimensionOutliers {
    pub strengths: Vec<BucketOutlier>,
    pub weaknesses: Vec<BucketOutlier>,
}

impl DimensionOutliers {
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty() && self.weaknesses.is_empty()
    }
}

/// Detect outlier buckets for a batter along one pitch dimension.
///
/// A bucket is considered only when the batter has both the average and the
/// strike-rate value; the average column's z-score against the population
/// decides strength or weakness.
pub fn detect_outliers(
    population: &Population,
    batter: &BatterRecord,
    dimension: Dimension,
    config: &OutlierConfig,
) -> DimensionOutliers {
    let mut outliers = DimensionOutliers::default();

    for bucket in dimension.buckets() {
        let avg_col = avg_key(dimension.key_fragment(), bucket);
        let sr_col = sr_key(dimension.key_fragment(), bucket);

        let (Some(avg), Some(sr)) = (batter.metric(&avg_col), batter.metric(&sr_col)) else {
            continue;
        };

        let pool = population.metric_values(&avg_col);
        let result = classify(Some(avg), &pool, config);

        let entry = |z: f64| BucketOutlier {
            bucket: bucket.replace('_', " "),
            avg,
            sr,
            magnitude: z.abs(),
        };

        match result.classification {
            Classification::Strength => {
                outliers.strengths.push(entry(result.zscore.unwrap_or(0.0)));
            }
            Classification::Weakness => {
                outliers.weaknesses.push(entry(result.zscore.unwrap_or(0.0)));
            }
            Classification::Neutral | Classification::InsufficientData => {}
        }
    }

    let by_magnitude = |a: &BucketOutlier, b: &BucketOutlier| {
        b.magnitude
            .partial_cmp(&a.magnitude)
            .unwrap_or(std::cmp::Ordering::Equal)
    };
    outliers.strengths.sort_by(by_magnitude);
    outliers.weaknesses.sort_by(by_magnitude);

    outliers
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
