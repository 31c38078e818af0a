// Scout assistant entry point.
//
// Startup sequence:
// 1. Parse CLI arguments
// 2. Initialize tracing (stderr, so report text on stdout stays clean)
// 3. Load config, copying defaults on first run
// 4. Load the batter population from the CSV exports
// 5. Run the requested command

use scout_assistant::config::{self, Config};
use scout_assistant::records::{self, Population};
use scout_assistant::scouting::format;
use scout_assistant::scouting::matchups::{
    self, band_average, band_boundary_pct, band_dot_pct, band_strike_rate, MatchupTable,
};
use scout_assistant::scouting::writeup;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "wicky",
    about = "Opposition scouting reports from ball-by-ball batting exports"
)]
struct Cli {
    /// Directory containing config/ and defaults/ (and the data paths are
    /// resolved relative to it).
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the teams in the selection file.
    Teams,
    /// Print scouting reports for selected batters.
    Report {
        /// Restrict to one team's selected batters.
        #[arg(long)]
        team: Option<String>,
        /// Report on a single batter by exact name.
        #[arg(long)]
        batter: Option<String>,
        /// Append the bowler-type matchup table to each report.
        #[arg(long)]
        matchups: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // 1. CLI
    let cli = Cli::parse();

    // 2. Tracing
    init_tracing()?;

    // 3. Config
    let config =
        config::load_config(&cli.config_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: threshold={}, budget {} words / {} lines",
        config.outliers.threshold, config.writeup.max_words, config.writeup.max_lines
    );

    // 4. Data
    let population = records::load_population(
        &cli.config_dir.join(&config.data.batting),
        &cli.config_dir.join(&config.data.teams),
    )
    .context("failed to load batting data")?;
    info!(
        "Loaded {} selected batters across {} teams",
        population.len(),
        population.teams().len()
    );

    // 5. Command dispatch
    match cli.command {
        Command::Teams => {
            for team in population.teams() {
                println!("{team}");
            }
        }
        Command::Report {
            team,
            batter,
            matchups: with_matchups,
        } => {
            let matchup_table = if with_matchups {
                Some(load_matchup_table(&cli.config_dir, &config)?)
            } else {
                None
            };
            run_report(
                &population,
                &config,
                team.as_deref(),
                batter.as_deref(),
                matchup_table.as_ref(),
            )?;
        }
    }

    Ok(())
}

fn load_matchup_table(config_dir: &Path, config: &Config) -> anyhow::Result<MatchupTable> {
    let Some(rel) = config.data.matchups.as_deref() else {
        anyhow::bail!("--matchups requested but data.matchups is not set in scout.toml");
    };
    let table =
        matchups::load_matchups(&config_dir.join(rel)).context("failed to load matchup data")?;
    if table.is_empty() {
        warn!("matchup file {rel} contained no rows");
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Report command
// ---------------------------------------------------------------------------

fn run_report(
    population: &Population,
    config: &Config,
    team: Option<&str>,
    batter: Option<&str>,
    matchup_table: Option<&MatchupTable>,
) -> anyhow::Result<()> {
    let today = chrono::Local::now().format("%Y-%m-%d");

    if let Some(name) = batter {
        println!("Scouting report - {today}");
        println!();
        print_batter_report(population, config, name, matchup_table)?;
        return Ok(());
    }

    let teams = match team {
        Some(t) => {
            if population.team_players(t).is_empty() {
                anyhow::bail!("no selected batters for team '{t}'");
            }
            vec![t.to_string()]
        }
        None => population.teams(),
    };

    for team_name in teams {
        println!("{team_name} - scouting report ({today})");
        println!();
        for record in population.team_players(&team_name) {
            print_batter_report(population, config, &record.name, matchup_table)?;
        }
    }

    Ok(())
}

fn print_batter_report(
    population: &Population,
    config: &Config,
    name: &str,
    matchup_table: Option<&MatchupTable>,
) -> anyhow::Result<()> {
    let report = writeup::generate(population, name, &config.writeup)
        .with_context(|| format!("failed to generate report for '{name}'"))?;

    println!("=== {} ({}) ===", report.batter_name, report.hand.label());
    println!();
    if report.sections.is_empty() {
        println!("No usable data for this batter.");
    } else {
        println!("{}", report.text());
    }
    println!();
    println!("{}", report.stats_line());
    println!();

    let validation = format::validate(&report, config.writeup.max_words, config.writeup.max_lines);
    for error in &validation.errors {
        warn!("{}: {}", report.batter_name, error);
    }
    for warning in &validation.warnings {
        warn!("{}: {}", report.batter_name, warning);
    }

    if let Some(table) = matchup_table {
        print_matchups(table, name);
    }

    Ok(())
}

fn print_matchups(table: &MatchupTable, name: &str) {
    let rows = table.for_batter(name);
    if rows.is_empty() {
        println!("No matchup data.");
        println!();
        return;
    }

    println!("Matchups (most faced first):");
    for row in rows {
        let sr = row.strike_rate();
        println!(
            "  {:<24} {:>4} balls  SR {:>6} [{}]  avg {:>5} [{}]  dot% {:>5} [{}]  bdry% {:>5} [{}]",
            row.bowler_type,
            row.balls_faced,
            fmt_opt(sr),
            band_strike_rate(sr).label(),
            fmt_opt(row.average),
            band_average(row.average).label(),
            fmt_opt(row.dot_pct),
            band_dot_pct(row.dot_pct).label(),
            fmt_opt(row.boundary_pct),
            band_boundary_pct(row.boundary_pct).label(),
        );
    }
    println!();
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize tracing to stderr; stdout carries only the report text.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scout_assistant=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
