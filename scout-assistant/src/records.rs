// Batting data loading and the in-memory batter population.
//
// Reads two CSVs: the per-batter statistics export (one row per batter, a
// handful of identity columns plus a few hundred numeric metric columns) and
// the team-selection file listing each side's top run scorers.

use crate::scouting::zones::Hand;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One batter's record: identity plus a flat map of metric columns.
/// Missing metrics are simply absent from the map. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct BatterRecord {
    pub batter_id: u32,
    pub name: String,
    pub team: Option<String>,
    pub hand: Hand,
    /// Rank among the team's run scorers (1 = highest aggregate).
    pub rank: Option<u32>,
    metrics: HashMap<String, f64>,
}

impl BatterRecord {
    pub fn new(batter_id: u32, name: impl Into<String>, hand: Hand) -> Self {
        BatterRecord {
            batter_id,
            name: name.into(),
            team: None,
            hand,
            rank: None,
            metrics: HashMap::new(),
        }
    }

    /// Builder-style metric insertion, used by the loader and by tests.
    pub fn with_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }

    pub fn with_team(mut self, team: impl Into<String>, rank: u32) -> Self {
        self.team = Some(team.into());
        self.rank = Some(rank);
        self
    }

    /// A metric value, or `None` when the column is missing for this batter.
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied()
    }

    /// Iterate metric keys with a common prefix (used for shot-type columns,
    /// which are open-ended in the dataset).
    pub fn metrics_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.metrics
            .iter()
            .filter(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), *v))
    }
}

/// The full batter population for one analysis batch. Read-only after
/// construction; every outlier statistic is recomputed from it per call.
#[derive(Debug, Clone)]
pub struct Population {
    records: Vec<BatterRecord>,
}

impl Population {
    pub fn new(records: Vec<BatterRecord>) -> Self {
        Population { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[BatterRecord] {
        &self.records
    }

    /// Exact-match, case-sensitive lookup by batter name.
    pub fn get(&self, name: &str) -> Option<&BatterRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// All non-missing values of a metric column across the population.
    pub fn metric_values(&self, key: &str) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.metric(key)).collect()
    }

    /// Sorted unique team names.
    pub fn teams(&self) -> Vec<String> {
        let mut teams: Vec<String> = self
            .records
            .iter()
            .filter_map(|r| r.team.clone())
            .collect();
        teams.sort();
        teams.dedup();
        teams
    }

    /// A team's batters in run-scorer rank order.
    pub fn team_players(&self, team: &str) -> Vec<&BatterRecord> {
        let mut players: Vec<&BatterRecord> = self
            .records
            .iter()
            .filter(|r| r.team.as_deref() == Some(team))
            .collect();
        players.sort_by_key(|r| r.rank.unwrap_or(u32::MAX));
        players
    }
}

// ---------------------------------------------------------------------------
// Metric column names
// ---------------------------------------------------------------------------

/// Average runs-per-dismissal column for a pitch dimension bucket.
pub fn avg_key(dimension: &str, bucket: &str) -> String {
    format!("avg_runs_per_dismissal_vs_pitch_{dimension}_{bucket}")
}

/// Strike-rate column for a pitch dimension bucket.
pub fn sr_key(dimension: &str, bucket: &str) -> String {
    format!("strike_rate_vs_pitch_{dimension}_{bucket}")
}

/// Shot-share column prefix for a bowling type (`pace` or `spin`).
pub fn shot_key_prefix(bowling_type: &str) -> String {
    format!("pct_shots_by_shot_type_vs_{bowling_type}_")
}

/// Boundary share of a wagon zone.
pub fn boundary_zone_key(zone: u8) -> String {
    format!("pct_boundaries_in_wagon_zone_{zone}")
}

/// Caught-dismissal share of a wagon zone.
pub fn caught_zone_key(zone: u8) -> String {
    format!("pct_caught_dismissals_in_wagon_zone_{zone}")
}

/// Fours count in a wagon zone.
pub fn fours_key(zone: u8) -> String {
    format!("fours_wagonZone{zone}")
}

/// Sixes count in a wagon zone.
pub fn sixes_key(zone: u8) -> String {
    format!("sixes_wagonZone{zone}")
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Batting statistics row. Identity columns are named; every other column is
/// absorbed through `#[serde(flatten)]` and parsed as a numeric metric.
#[derive(Debug, Deserialize)]
struct RawBattingRow {
    batter_id: u32,
    #[serde(default)]
    bat: String,
    #[serde(default)]
    bat_hand: String,
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

/// Team-selection row: which batters make a side's top run scorers.
#[derive(Debug, Deserialize)]
struct RawTeamRow {
    team_bat: String,
    p_bat: u32,
    bat: String,
    team_runs_rank: u32,
}

// ---------------------------------------------------------------------------
// Batting hand inference
// ---------------------------------------------------------------------------

/// Known left-handed batters, used when the `bat_hand` column is absent or
/// empty. The dataset should carry the hand; this is the fallback only.
const KNOWN_LHB: &[&str] = &[
    "David Warner",
    "Shikhar Dhawan",
    "Quinton de Kock",
    "Rishabh Pant",
    "Ishan Kishan",
    "Devon Conway",
    "Rovman Powell",
    "Shimron Hetmyer",
    "Nicholas Pooran",
    "Ravindra Jadeja",
    "Axar Patel",
    "Krunal Pandya",
    "Mitchell Marsh",
    "Lalit Yadav",
    "Venkatesh Iyer",
    "Rinku Singh",
    "Marcus Stoinis",
    "Cameron Green",
    "Prithvi Shaw",
    "Yashasvi Jaiswal",
    "Tilak Varma",
    "Angkrish Raghuvanshi",
    "Travis Head",
    "Abhishek Sharma",
];

/// Infer a batter's hand from the known-LHB name list, defaulting to RHB.
fn infer_hand(name: &str) -> Hand {
    if KNOWN_LHB.contains(&name) {
        Hand::Left
    } else {
        Hand::Right
    }
}

fn resolve_hand(declared: &str, name: &str) -> Hand {
    match Hand::parse(declared) {
        Some(hand) => hand,
        None => {
            if !declared.trim().is_empty() {
                warn!("unrecognized bat_hand '{}' for '{}', inferring", declared, name);
            }
            infer_hand(name)
        }
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

/// Intermediate batting row before the team merge.
#[derive(Debug, Clone)]
struct BattingRow {
    batter_id: u32,
    name: String,
    declared_hand: String,
    metrics: HashMap<String, f64>,
}

fn load_batting_from_reader<R: Read>(rdr: R) -> Result<Vec<BattingRow>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawBattingRow>() {
        match result {
            Ok(raw) => {
                let mut metrics = HashMap::with_capacity(raw.extra.len());
                for (key, value) in raw.extra {
                    if let Some(v) = numeric_value(&value) {
                        if v.is_finite() {
                            metrics.insert(key, v);
                        }
                    }
                }
                rows.push(BattingRow {
                    batter_id: raw.batter_id,
                    name: raw.bat.trim().to_string(),
                    declared_hand: raw.bat_hand,
                    metrics,
                });
            }
            Err(e) => {
                warn!("skipping malformed batting row: {}", e);
            }
        }
    }
    Ok(rows)
}

/// Extract an f64 from a flattened CSV cell. The csv crate hands cells to
/// serde as strings; empty cells and non-numeric text are treated as missing.
fn numeric_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

fn load_teams_from_reader<R: Read>(rdr: R) -> Result<Vec<RawTeamRow>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawTeamRow>() {
        match result {
            Ok(raw) => rows.push(raw),
            Err(e) => {
                warn!("skipping malformed team row: {}", e);
            }
        }
    }
    Ok(rows)
}

/// Join team selections onto batting statistics by batter id. A selected
/// batter with no batting row still gets a (metric-less) record, so the
/// write-up generator can report it with every section skipped.
///
/// Batting rows without a selection are kept as teamless records: selection
/// decides who gets a report, not who counts as a peer, so the outlier pool
/// must span the whole batting export.
fn merge(batting: Vec<BattingRow>, teams: Vec<RawTeamRow>) -> Vec<BatterRecord> {
    let by_id: HashMap<u32, BattingRow> =
        batting.into_iter().map(|row| (row.batter_id, row)).collect();

    let mut selected: HashSet<u32> = HashSet::with_capacity(teams.len());
    let mut records = Vec::with_capacity(by_id.len());
    for team_row in teams {
        selected.insert(team_row.p_bat);
        let name = team_row.bat.trim().to_string();
        let record = match by_id.get(&team_row.p_bat) {
            Some(batting_row) => {
                let hand = resolve_hand(&batting_row.declared_hand, &name);
                BatterRecord {
                    batter_id: batting_row.batter_id,
                    name,
                    team: Some(team_row.team_bat.trim().to_string()),
                    hand,
                    rank: Some(team_row.team_runs_rank),
                    metrics: batting_row.metrics.clone(),
                }
            }
            None => {
                warn!(
                    "no batting statistics for '{}' (id {}), record will be empty",
                    name, team_row.p_bat
                );
                BatterRecord {
                    batter_id: team_row.p_bat,
                    name: name.clone(),
                    team: Some(team_row.team_bat.trim().to_string()),
                    hand: infer_hand(&name),
                    rank: Some(team_row.team_runs_rank),
                    metrics: HashMap::new(),
                }
            }
        };
        records.push(record);
    }

    let mut unselected: Vec<&BattingRow> = by_id
        .values()
        .filter(|row| !selected.contains(&row.batter_id))
        .collect();
    unselected.sort_by_key(|row| row.batter_id);
    for row in unselected {
        let hand = resolve_hand(&row.declared_hand, &row.name);
        records.push(BatterRecord {
            batter_id: row.batter_id,
            name: row.name.clone(),
            team: None,
            hand,
            rank: None,
            metrics: row.metrics.clone(),
        });
    }

    records
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, DataError> {
    std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the batter population from the batting-statistics CSV and the
/// team-selection CSV.
pub fn load_population(batting_path: &Path, teams_path: &Path) -> Result<Population, DataError> {
    let batting = load_batting_from_reader(open(batting_path)?).map_err(|e| DataError::Csv {
        path: batting_path.display().to_string(),
        source: e,
    })?;
    let teams = load_teams_from_reader(open(teams_path)?).map_err(|e| DataError::Csv {
        path: teams_path.display().to_string(),
        source: e,
    })?;

    if batting.is_empty() {
        return Err(DataError::Validation(
            "batting CSV produced zero valid rows".into(),
        ));
    }
    if teams.is_empty() {
        return Err(DataError::Validation(
            "team CSV produced zero valid rows".into(),
        ));
    }

    Ok(Population::new(merge(batting, teams)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
