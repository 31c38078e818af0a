// Tactical write-up assembly: five insight sections in fixed order, bounded
// by word and line budgets.

use crate::records::{boundary_zone_key, caught_zone_key, shot_key_prefix, BatterRecord, Population};
use crate::scouting::format::{count_lines, count_words, fmt_pct, MetricFormatter};
use crate::scouting::outliers::{detect_outliers, Dimension, DimensionOutliers, OutlierConfig};
use crate::scouting::zones::{label_for, Hand, ZONE_COUNT};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Write-up assembly settings. Passed explicitly per call; tests and callers
/// can tighten budgets without touching shared state.
#[derive(Debug, Clone, Copy)]
pub struct WriteupConfig {
    /// Hard cap on total words across all sections.
    pub max_words: usize,
    /// Hard cap on non-blank lines across all sections.
    pub max_lines: usize,
    /// Strengths and weaknesses reported per dimension section.
    pub max_per_side: usize,
    /// Shots reported per bowling type in the Shots section.
    pub top_shots: usize,
    /// Zones reported in the Boundaries and Dismissals sections.
    pub top_zones: usize,
    pub outliers: OutlierConfig,
}

impl Default for WriteupConfig {
    fn default() -> Self {
        WriteupConfig {
            max_words: 150,
            max_lines: 10,
            max_per_side: 2,
            top_shots: 2,
            top_zones: 3,
            outliers: OutlierConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Write-up types
// ---------------------------------------------------------------------------

/// The five insight sections, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Length,
    Line,
    Shots,
    Boundaries,
    Dismissals,
}

impl SectionKind {
    /// Fixed render order; budget overflow drops from the end.
    pub const ORDER: [SectionKind; 5] = [
        SectionKind::Length,
        SectionKind::Line,
        SectionKind::Shots,
        SectionKind::Boundaries,
        SectionKind::Dismissals,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Length => "Length",
            SectionKind::Line => "Line",
            SectionKind::Shots => "Shots",
            SectionKind::Boundaries => "Boundaries",
            SectionKind::Dismissals => "Dismissals",
        }
    }
}

/// One rendered insight section.
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    pub text: String,
}

/// A complete tactical write-up for one batter.
#[derive(Debug, Clone)]
pub struct WriteUp {
    pub batter_name: String,
    pub hand: Hand,
    pub sections: Vec<Section>,
    pub word_count: usize,
    pub line_count: usize,
}

impl WriteUp {
    /// The section texts joined with blank lines.
    pub fn text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Trailing stats line for display under the write-up.
    pub fn stats_line(&self) -> String {
        format!(
            "{} sections | {} words | {} lines",
            self.sections.len(),
            self.word_count,
            self.line_count
        )
    }
}

#[derive(Debug, Error)]
pub enum WriteupError {
    #[error("no batting record for '{0}'")]
    UnknownBatter(String),
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate the tactical write-up for a batter.
///
/// Sections are rendered in fixed order and any section without usable data
/// is omitted silently. If the assembled text exceeds the word or line
/// budget, trailing sections are dropped (Dismissals first) and the text is
/// re-rendered; with only the Length section left, it is truncated to a
/// single top strength and weakness. Deterministic for identical inputs.
pub fn generate(
    population: &Population,
    batter_name: &str,
    config: &WriteupConfig,
) -> Result<WriteUp, WriteupError> {
    let batter = population
        .get(batter_name)
        .ok_or_else(|| WriteupError::UnknownBatter(batter_name.to_string()))?;

    let mut enabled = SectionKind::ORDER.len();
    loop {
        let sections = render_sections(population, batter, config, enabled, config.max_per_side);
        if within_budget(&sections, config) {
            return Ok(assemble(batter, sections));
        }
        if enabled > 1 {
            enabled -= 1;
            continue;
        }
        // Length alone still blows the budget: keep only its top strength
        // and top weakness.
        let sections = render_sections(population, batter, config, 1, 1);
        return Ok(assemble(batter, sections));
    }
}

fn within_budget(sections: &[Section], config: &WriteupConfig) -> bool {
    let text = join_sections(sections);
    count_words(&text) <= config.max_words && count_lines(&text) <= config.max_lines
}

fn join_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn assemble(batter: &BatterRecord, sections: Vec<Section>) -> WriteUp {
    let text = join_sections(&sections);
    WriteUp {
        batter_name: batter.name.clone(),
        hand: batter.hand,
        word_count: count_words(&text),
        line_count: count_lines(&text),
        sections,
    }
}

/// Render the first `enabled` kinds in fixed order, skipping sections with
/// no usable data. A fresh `MetricFormatter` per call keeps the
/// first-occurrence convention consistent across budget re-renders.
fn render_sections(
    population: &Population,
    batter: &BatterRecord,
    config: &WriteupConfig,
    enabled: usize,
    max_per_side: usize,
) -> Vec<Section> {
    let mut formatter = MetricFormatter::new();
    let mut sections = Vec::new();

    for kind in &SectionKind::ORDER[..enabled] {
        let text = match kind {
            SectionKind::Length => {
                let outliers =
                    detect_outliers(population, batter, Dimension::Length, &config.outliers);
                dimension_section(&outliers, LENGTH_WORDING, &mut formatter, max_per_side)
            }
            SectionKind::Line => {
                let outliers =
                    detect_outliers(population, batter, Dimension::Line, &config.outliers);
                dimension_section(&outliers, LINE_WORDING, &mut formatter, max_per_side)
            }
            SectionKind::Shots => shots_section(batter, config.top_shots),
            SectionKind::Boundaries => boundaries_section(batter, config.top_zones),
            SectionKind::Dismissals => dismissals_section(batter, config.top_zones),
        };
        if let Some(text) = text {
            sections.push(Section { kind: *kind, text });
        }
    }

    sections
}

// ---------------------------------------------------------------------------
// Dimension sections (Length, Line)
// ---------------------------------------------------------------------------

/// Verbs that differ between the Length and Line templates.
struct DimensionWording {
    title: &'static str,
    strength_verb: &'static str,
    weakness_verb: &'static str,
    advice_verb: &'static str,
}

const LENGTH_WORDING: DimensionWording = DimensionWording {
    title: "Length",
    strength_verb: "Strong vs",
    weakness_verb: "weak vs",
    advice_verb: "Target",
};

const LINE_WORDING: DimensionWording = DimensionWording {
    title: "Line",
    strength_verb: "Excels",
    weakness_verb: "struggles",
    advice_verb: "Bowl",
};

fn dimension_section(
    outliers: &DimensionOutliers,
    wording: DimensionWording,
    formatter: &mut MetricFormatter,
    max_per_side: usize,
) -> Option<String> {
    if outliers.is_empty() {
        return None;
    }

    let mut parts = Vec::new();

    if !outliers.strengths.is_empty() {
        let rendered: Vec<String> = outliers
            .strengths
            .iter()
            .take(max_per_side)
            .map(|o| format!("{} {}", o.bucket, formatter.pair(o.avg, o.sr)))
            .collect();
        parts.push(format!("{} {}", wording.strength_verb, rendered.join(" and ")));
    }

    if !outliers.weaknesses.is_empty() {
        let rendered: Vec<String> = outliers
            .weaknesses
            .iter()
            .take(max_per_side)
            .map(|o| format!("{} {}", o.bucket, formatter.pair(o.avg, o.sr)))
            .collect();
        parts.push(format!("{} {}", wording.weakness_verb, rendered.join(" and ")));
        // Bowling advice targets the most pronounced weakness.
        parts.push(format!(
            "{} {}",
            wording.advice_verb, outliers.weaknesses[0].bucket
        ));
    }

    Some(format!("**{}:** {}.", wording.title, parts.join(". ")))
}

// ---------------------------------------------------------------------------
// Shots section
// ---------------------------------------------------------------------------

/// Top shots by share for one bowling type, largest first.
fn top_shots(batter: &BatterRecord, bowling_type: &str, n: usize) -> Vec<(String, f64)> {
    let prefix = shot_key_prefix(bowling_type);
    let mut shots: Vec<(String, f64)> = batter
        .metrics_with_prefix(&prefix)
        .filter(|(_, pct)| *pct > 0.0)
        .map(|(key, pct)| (key[prefix.len()..].replace('_', " "), pct))
        .collect();
    // Shot columns live in a HashMap, so ties need a name tiebreaker to keep
    // output stable across runs.
    shots.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    shots.truncate(n);
    shots
}

fn shots_section(batter: &BatterRecord, top_n: usize) -> Option<String> {
    let pace = top_shots(batter, "pace", top_n);
    let spin = top_shots(batter, "spin", top_n);
    if pace.is_empty() && spin.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    for (label, shots) in [("vs Pace", pace), ("vs Spin", spin)] {
        if shots.is_empty() {
            continue;
        }
        let rendered: Vec<String> = shots
            .iter()
            .map(|(shot, pct)| format!("{} {}", shot, fmt_pct(*pct)))
            .collect();
        parts.push(format!("{}: {}", label, rendered.join(", ")));
    }

    Some(format!("**Shots:** {}.", parts.join("; ")))
}

// ---------------------------------------------------------------------------
// Zone sections (Boundaries, Dismissals)
// ---------------------------------------------------------------------------

/// Top zones by share, translated to fielding-position labels through the
/// batter's hand. Zones with zero or missing share are excluded.
fn top_zones(
    batter: &BatterRecord,
    key_for: fn(u8) -> String,
    hand: Hand,
    n: usize,
) -> Vec<(&'static str, f64)> {
    let mut zones = Vec::new();
    for zone in 1..=ZONE_COUNT {
        let Some(pct) = batter.metric(&key_for(zone)) else {
            continue;
        };
        if pct <= 0.0 {
            continue;
        }
        // The table is total over zones 1-8, so this cannot fail here.
        if let Ok(label) = label_for(zone, hand) {
            zones.push((label, pct));
        }
    }
    zones.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    zones.truncate(n);
    zones
}

fn zone_list(zones: &[(&'static str, f64)]) -> String {
    zones
        .iter()
        .map(|(label, pct)| format!("{} {}", label, fmt_pct(*pct)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn boundaries_section(batter: &BatterRecord, top_n: usize) -> Option<String> {
    let zones = top_zones(batter, boundary_zone_key, batter.hand, top_n);
    if zones.is_empty() {
        return None;
    }

    let advice = match &zones[..] {
        [(only, _)] => format!("Protect {only}"),
        [(first, _), (second, _), ..] => format!("Protect {first} and {second}"),
        [] => unreachable!(),
    };

    Some(format!(
        "**Boundaries:** Top zones: {}. {}.",
        zone_list(&zones),
        advice
    ))
}

fn dismissals_section(batter: &BatterRecord, top_n: usize) -> Option<String> {
    let zones = top_zones(batter, caught_zone_key, batter.hand, top_n);
    if zones.is_empty() {
        return None;
    }

    let advice = match &zones[..] {
        [(only, _)] => format!("Place catcher at {only}"),
        [(first, _), (second, _), ..] => format!("Place catchers at {first} and {second}"),
        [] => unreachable!(),
    };

    Some(format!(
        "**Dismissals:** Catch zones: {}. {}.",
        zone_list(&zones),
        advice
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
