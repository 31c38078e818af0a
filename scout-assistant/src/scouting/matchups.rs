// Bowler-type matchup summaries: per batter, how they fare against each
// bowling style, with coarse performance bands for quick reading.

use crate::records::DataError;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One batter-versus-bowler-type row from the matchup export.
#[derive(Debug, Clone)]
pub struct MatchupRow {
    pub batter_name: String,
    /// Bowling style as named in the export, e.g. "Right arm legbreak".
    pub bowler_type: String,
    pub balls_faced: u32,
    pub runs: u32,
    pub average: Option<f64>,
    pub dot_pct: Option<f64>,
    pub boundary_pct: Option<f64>,
}

impl MatchupRow {
    /// Runs per hundred balls, rounded to one decimal place. `None` when the
    /// batter has not faced the type.
    pub fn strike_rate(&self) -> Option<f64> {
        if self.balls_faced == 0 {
            return None;
        }
        let sr = f64::from(self.runs) / f64::from(self.balls_faced) * 100.0;
        Some((sr * 10.0).round() / 10.0)
    }
}

/// Coarse banding of a matchup metric for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Good,
    Medium,
    Poor,
    NoData,
}

impl Band {
    pub fn label(&self) -> &'static str {
        match self {
            Band::Good => "good",
            Band::Medium => "medium",
            Band::Poor => "poor",
            Band::NoData => "-",
        }
    }
}

fn band_high_good(value: Option<f64>, good: f64, medium: f64) -> Band {
    match value {
        None => Band::NoData,
        Some(v) if v >= good => Band::Good,
        Some(v) if v >= medium => Band::Medium,
        Some(_) => Band::Poor,
    }
}

/// Strike-rate band: 140+ good, 120+ medium.
pub fn band_strike_rate(sr: Option<f64>) -> Band {
    band_high_good(sr, 140.0, 120.0)
}

/// Batting-average band: 40+ good, 25+ medium.
pub fn band_average(avg: Option<f64>) -> Band {
    band_high_good(avg, 40.0, 25.0)
}

/// Boundary-percentage band: 20+ good, 15+ medium.
pub fn band_boundary_pct(pct: Option<f64>) -> Band {
    band_high_good(pct, 20.0, 15.0)
}

/// Dot-ball-percentage band. Polarity is reversed: fewer dots is better for
/// the batter, so 30 or less is good and above 40 is poor.
pub fn band_dot_pct(pct: Option<f64>) -> Band {
    match pct {
        None => Band::NoData,
        Some(v) if v <= 30.0 => Band::Good,
        Some(v) if v <= 40.0 => Band::Medium,
        Some(_) => Band::Poor,
    }
}

/// All matchup rows for a batch, queryable per batter.
#[derive(Debug, Clone, Default)]
pub struct MatchupTable {
    rows: Vec<MatchupRow>,
}

impl MatchupTable {
    pub fn new(rows: Vec<MatchupRow>) -> Self {
        MatchupTable { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A batter's matchups, most-faced bowling type first. Name match is
    /// exact and case-sensitive, like the population lookup.
    pub fn for_batter(&self, name: &str) -> Vec<&MatchupRow> {
        let mut rows: Vec<&MatchupRow> = self
            .rows
            .iter()
            .filter(|r| r.batter_name == name)
            .collect();
        rows.sort_by(|a, b| b.balls_faced.cmp(&a.balls_faced));
        rows
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawMatchupRow {
    #[serde(rename = "Batter_Name")]
    batter_name: String,
    #[serde(rename = "bowler.type")]
    bowler_type: String,
    #[serde(default)]
    balls_faced: Option<u32>,
    #[serde(default)]
    runs_vs_type: Option<u32>,
    #[serde(default)]
    batting_avg: Option<f64>,
    #[serde(default)]
    dot_pct: Option<f64>,
    #[serde(default)]
    boundary_pct: Option<f64>,
}

fn load_from_reader<R: Read>(rdr: R) -> Result<Vec<MatchupRow>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawMatchupRow>() {
        match result {
            Ok(raw) => rows.push(MatchupRow {
                batter_name: raw.batter_name.trim().to_string(),
                bowler_type: raw.bowler_type.trim().to_string(),
                balls_faced: raw.balls_faced.unwrap_or(0),
                runs: raw.runs_vs_type.unwrap_or(0),
                average: raw.batting_avg.filter(|v| v.is_finite()),
                dot_pct: raw.dot_pct.filter(|v| v.is_finite()),
                boundary_pct: raw.boundary_pct.filter(|v| v.is_finite()),
            }),
            Err(e) => {
                warn!("skipping malformed matchup row: {}", e);
            }
        }
    }
    Ok(rows)
}

/// Load the bowler-type matchup CSV. The file is optional upstream; callers
/// decide whether a missing path is an error.
pub fn load_matchups(path: &Path) -> Result<MatchupTable, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let rows = load_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(MatchupTable::new(rows))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
