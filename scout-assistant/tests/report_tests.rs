// End-to-end report generation: CSV exports on disk through to write-up text.

use scout_assistant::records::{self, avg_key, sr_key, BatterRecord, Population};
use scout_assistant::scouting::format;
use scout_assistant::scouting::writeup::{self, SectionKind, WriteupConfig};
use scout_assistant::scouting::zones::Hand;
use std::fs;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Population in which "Aiden Blake" averages 61 vs full pitches against a
/// peer pool spread 30-55 (z roughly +1.7) and 12 vs short (z roughly -2.4),
/// with shot and wagon-zone shares filled in.
fn population() -> Population {
    let full_avg = avg_key("length", "full");
    let full_sr = sr_key("length", "full");
    let short_avg = avg_key("length", "short");
    let short_sr = sr_key("length", "short");

    let focus = BatterRecord::new(1, "Aiden Blake", Hand::Right)
        .with_team("Harbour Kings", 1)
        .with_metric(&full_avg, 61.0)
        .with_metric(&full_sr, 175.0)
        .with_metric(&short_avg, 12.0)
        .with_metric(&short_sr, 88.0)
        .with_metric("pct_shots_by_shot_type_vs_pace_pull_shot", 34.0)
        .with_metric("pct_shots_by_shot_type_vs_spin_sweep", 28.0)
        .with_metric("pct_boundaries_in_wagon_zone_1", 30.0)
        .with_metric("pct_boundaries_in_wagon_zone_3", 45.0)
        .with_metric("pct_boundaries_in_wagon_zone_6", 25.0)
        .with_metric("pct_caught_dismissals_in_wagon_zone_7", 60.0)
        .with_metric("pct_caught_dismissals_in_wagon_zone_6", 40.0);

    let mut batters = vec![focus];
    for (i, avg) in [30.0, 35.0, 40.0, 40.0, 45.0, 45.0, 50.0, 55.0]
        .iter()
        .enumerate()
    {
        batters.push(
            BatterRecord::new(i as u32 + 2, format!("Peer {i}"), Hand::Right)
                .with_team("Harbour Kings", i as u32 + 2)
                .with_metric(&full_avg, *avg)
                .with_metric(&full_sr, 130.0)
                .with_metric(&short_avg, *avg)
                .with_metric(&short_sr, 120.0),
        );
    }
    Population::new(batters)
}

// ---------------------------------------------------------------------------
// Write-up content
// ---------------------------------------------------------------------------

#[test]
fn strength_renders_with_full_labels_on_first_pair() {
    let pop = population();
    let report = writeup::generate(&pop, "Aiden Blake", &WriteupConfig::default()).unwrap();
    let text = report.text();
    assert!(text.contains("Strong vs full (61 avg; 175 SR)"), "got: {text}");
    // Labels appear exactly once, on the first pair.
    assert_eq!(text.matches(" avg; ").count(), 1);
}

#[test]
fn weakness_becomes_bowling_advice() {
    let pop = population();
    let report = writeup::generate(&pop, "Aiden Blake", &WriteupConfig::default()).unwrap();
    let text = report.text();
    assert!(text.contains("weak vs short (12; 88)"), "got: {text}");
    assert!(text.contains("Target short"), "got: {text}");
}

#[test]
fn zone_sections_rank_and_advise() {
    let pop = population();
    let report = writeup::generate(&pop, "Aiden Blake", &WriteupConfig::default()).unwrap();
    let text = report.text();
    assert!(
        text.contains("Top zones: Mid Wicket (45%), Fine Leg (30%), Covers (25%)"),
        "got: {text}"
    );
    assert!(text.contains("Protect Mid Wicket and Fine Leg"), "got: {text}");
    assert!(text.contains("Catch zones: Point (60%), Covers (40%)"), "got: {text}");
    assert!(text.contains("Place catchers at Point and Covers"), "got: {text}");
}

#[test]
fn sections_keep_fixed_order() {
    let pop = population();
    let report = writeup::generate(&pop, "Aiden Blake", &WriteupConfig::default()).unwrap();
    let kinds: Vec<SectionKind> = report.sections.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::Length,
            SectionKind::Line,
            SectionKind::Shots,
            SectionKind::Boundaries,
            SectionKind::Dismissals,
        ]
        .into_iter()
        .filter(|k| kinds.contains(k))
        .collect::<Vec<_>>()
    );
    // Line has no outlier data for the focus batter, so it is absent.
    assert!(!kinds.contains(&SectionKind::Line));
}

#[test]
fn uniform_population_produces_no_length_section() {
    let full_avg = avg_key("length", "full");
    let full_sr = sr_key("length", "full");
    // Every batter identical: stdev is zero, nobody is an outlier.
    let batters: Vec<BatterRecord> = (1..=5)
        .map(|i| {
            BatterRecord::new(i, format!("Clone {i}"), Hand::Right)
                .with_metric(&full_avg, 40.0)
                .with_metric(&full_sr, 130.0)
        })
        .collect();
    let pop = Population::new(batters);
    let report = writeup::generate(&pop, "Clone 1", &WriteupConfig::default()).unwrap();
    assert!(report.sections.is_empty());
}

#[test]
fn reports_are_deterministic() {
    let pop = population();
    let config = WriteupConfig::default();
    let a = writeup::generate(&pop, "Aiden Blake", &config).unwrap();
    let b = writeup::generate(&pop, "Aiden Blake", &config).unwrap();
    assert_eq!(a.text(), b.text());
    assert_eq!(a.stats_line(), b.stats_line());
}

// ---------------------------------------------------------------------------
// Budgets and validation
// ---------------------------------------------------------------------------

#[test]
fn tight_word_budget_drops_trailing_sections() {
    let pop = population();
    let config = WriteupConfig {
        max_words: 30,
        ..WriteupConfig::default()
    };
    let report = writeup::generate(&pop, "Aiden Blake", &config).unwrap();
    assert!(report.word_count <= 30);
    let kinds: Vec<SectionKind> = report.sections.iter().map(|s| s.kind).collect();
    assert!(kinds.contains(&SectionKind::Length));
    assert!(!kinds.contains(&SectionKind::Dismissals));

    let validation = format::validate(&report, config.max_words, config.max_lines);
    assert!(validation.is_valid());
    // Fewer than three sections draws a sparseness warning.
    assert!(!validation.warnings.is_empty());
}

#[test]
fn one_line_budget_truncates_to_length_only() {
    let pop = population();
    let config = WriteupConfig {
        max_lines: 1,
        ..WriteupConfig::default()
    };
    let report = writeup::generate(&pop, "Aiden Blake", &config).unwrap();
    assert_eq!(report.line_count, 1);
    assert_eq!(report.sections.len(), 1);
    assert_eq!(report.sections[0].kind, SectionKind::Length);
}

#[test]
fn full_report_passes_validation() {
    let pop = population();
    let config = WriteupConfig::default();
    let report = writeup::generate(&pop, "Aiden Blake", &config).unwrap();
    let validation = format::validate(&report, config.max_words, config.max_lines);
    assert!(validation.is_valid());
    assert!(validation.warnings.is_empty());
}

// ---------------------------------------------------------------------------
// CSV round trip
// ---------------------------------------------------------------------------

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn report_from_csv_exports() {
    let dir = temp_dir("scout_report_csv_test");

    let batting = "\
batter_id,bat,bat_hand,avg_runs_per_dismissal_vs_pitch_length_full,strike_rate_vs_pitch_length_full
1,Aiden Blake,RHB,61.0,175.0
2,Peer A,RHB,30.0,130.0
3,Peer B,RHB,35.0,130.0
4,Peer C,RHB,40.0,130.0
5,Peer D,RHB,40.0,130.0
6,Peer E,RHB,45.0,130.0
7,Peer F,RHB,45.0,130.0
8,Peer G,RHB,50.0,130.0
9,Peer H,LHB,55.0,130.0";
    let teams = "\
team_bat,p_bat,bat,team_runs_rank
Harbour Kings,1,Aiden Blake,1
Harbour Kings,9,Peer H,2";

    let batting_path = dir.join("batting.csv");
    let teams_path = dir.join("teams.csv");
    fs::write(&batting_path, batting).unwrap();
    fs::write(&teams_path, teams).unwrap();

    let pop = records::load_population(&batting_path, &teams_path).unwrap();
    // Every batting row loads; only the two selected batters carry a team.
    assert_eq!(pop.len(), 9);
    assert_eq!(pop.teams(), vec!["Harbour Kings"]);
    assert_eq!(pop.team_players("Harbour Kings").len(), 2);

    let report = writeup::generate(&pop, "Aiden Blake", &WriteupConfig::default()).unwrap();
    assert_eq!(report.hand, Hand::Right);
    // The z-score pool is the whole batting file, not the two selected
    // batters: against the nine-value pool the 61 average vs full pitches is
    // a strength (z roughly +1.7); against the selected pair alone it would
    // sit near the mean and render nothing.
    assert!(
        report.text().contains("Strong vs full (61 avg; 175 SR)"),
        "got: {}",
        report.text()
    );

    let _ = fs::remove_dir_all(&dir);
}
