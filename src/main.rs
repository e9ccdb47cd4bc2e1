use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use aft_scorer::scoring::{self, AgeGroup, Event, ScoreInput, ScoringTables, Sex};
use aft_scorer::{config, output, telemetry};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score six event results and check them against a MOS category
    Score(ScoreArgs),
    /// Print the scoring table for a sex and age group
    Table {
        #[arg(long)]
        sex: Sex,
        #[arg(long)]
        age_group: AgeGroup,
        /// Only print this event (MDL, SPT, HRP, SDC, PLK, 2MR)
        #[arg(long)]
        event: Option<Event>,
    },
    /// List MOS categories and their minimums
    Categories,
    /// Validate a scoring tables file (defaults to the active tables)
    Check {
        file: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ScoreArgs {
    #[arg(long)]
    sex: Sex,

    /// Age group, e.g. 17-21
    #[arg(long, required_unless_present = "age", conflicts_with = "age")]
    age_group: Option<AgeGroup>,

    /// Age in years, mapped to its age group
    #[arg(long)]
    age: Option<u32>,

    /// Deadlift, pounds
    #[arg(long)]
    mdl: f64,

    /// Standing power throw, meters
    #[arg(long)]
    spt: f64,

    /// Hand-release push-ups, repetitions
    #[arg(long)]
    hrp: f64,

    /// Sprint-drag-carry time (m:ss, 2m30s, or seconds)
    #[arg(long, value_parser = parse_time_arg)]
    sdc: u32,

    /// Plank time (m:ss, 2m30s, or seconds)
    #[arg(long, value_parser = parse_time_arg)]
    plk: u32,

    /// Two-mile run time (m:ss, 17m30s, or seconds)
    #[arg(long = "two-mr", value_parser = parse_time_arg)]
    two_mr: u32,

    /// MOS category (defaults to the configured category, or Heavy)
    #[arg(long)]
    category: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
#[command(name = "aft-scorer")]
#[command(about = "Fitness test score calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/aft-scorer/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Scoring tables file (overrides the config and the bundled tables)
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Parse a time argument given as "m:ss", a duration like "4m15s", or plain
/// seconds.
fn parse_time_arg(value: &str) -> Result<u32, String> {
    let value = value.trim();
    if value.contains(':') {
        return scoring::parse_clock(value).map_err(|e| format!("{:#}", e));
    }
    if let Ok(seconds) = value.parse::<u32>() {
        return Ok(seconds);
    }
    let duration = humantime::parse_duration(value)
        .map_err(|e| format!("invalid time '{}': {}", value, e))?;
    u32::try_from(duration.as_secs()).map_err(|_| format!("time '{}' is too large", value))
}

fn main() {
    let cli = Cli::parse();

    let config = match config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let log_level = if cli.verbose { "debug" } else { config.log_level() };
    if let Err(e) = telemetry::init(log_level) {
        eprintln!("Config error: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    let use_colors = output::should_use_colors();

    if let Commands::Check { file } = &cli.command {
        let path = file.as_deref().or(cli.tables.as_deref()).or(config.tables.as_deref());
        let result = match path {
            Some(path) => ScoringTables::load(path),
            None => ScoringTables::bundled(),
        };
        match result {
            Ok(tables) => {
                let missing = tables.missing_tables();
                for (sex, age_group, event) in &missing {
                    eprintln!("warning: no table for {} {} {}", sex, age_group, event);
                }
                println!(
                    "Scoring tables OK ({} categories, {} missing tables)",
                    tables.mos_categories.len(),
                    missing.len()
                );
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let tables = match config::load_tables(&config, cli.tables.as_deref()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Scoring tables error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    match cli.command {
        Commands::Score(args) => {
            let age_group = match args.age_group.or_else(|| args.age.and_then(AgeGroup::for_age)) {
                Some(group) => group,
                None => {
                    eprintln!("No age group for age {}: minimum age is 17", args.age.unwrap_or(0));
                    std::process::exit(EXIT_INPUT);
                }
            };

            let input = ScoreInput {
                sex: args.sex,
                age_group,
                mdl: args.mdl,
                spt: args.spt,
                hrp: args.hrp,
                sdc: f64::from(args.sdc),
                plk: f64::from(args.plk),
                two_mr: f64::from(args.two_mr),
            };

            if let Err(errors) = scoring::validate_input(&input) {
                eprintln!("Invalid input:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_INPUT);
            }

            let category = args
                .category
                .as_deref()
                .unwrap_or_else(|| config.default_category());
            let report = scoring::score_and_evaluate(&tables, &input, category);

            if args.json {
                match output::format_json(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize report: {:#}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                }
            } else {
                if cli.verbose {
                    eprintln!("Scoring {} {} against {}", input.sex, input.age_group, category);
                }
                println!("{}", output::format_report(&report, cli.verbose, use_colors));
            }
        }
        Commands::Table {
            sex,
            age_group,
            event,
        } => {
            let events: Vec<Event> = match event {
                Some(event) => vec![event],
                None => Event::ALL.to_vec(),
            };
            let mut sections = Vec::new();
            for event in events {
                match tables.event_table(sex, age_group, event) {
                    Some(table) => sections.push(output::format_event_table(
                        sex, age_group, event, table, use_colors,
                    )),
                    None => eprintln!("No table for {} {} {}", sex, age_group, event),
                }
            }
            println!("{}", sections.join("\n\n"));
        }
        Commands::Categories => {
            println!("{}", output::format_categories(tables.categories(), use_colors));
        }
        Commands::Check { .. } => unreachable!("handled before tables are loaded"),
    }

    std::process::exit(EXIT_SUCCESS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_time_arg_formats() {
        assert_eq!(parse_time_arg("4:15"), Ok(255));
        assert_eq!(parse_time_arg("4m15s"), Ok(255));
        assert_eq!(parse_time_arg("255"), Ok(255));
        assert_eq!(parse_time_arg("17m 30s"), Ok(1050));
        assert!(parse_time_arg("4:xx").is_err());
        assert!(parse_time_arg("soon").is_err());
    }

    #[test]
    fn test_score_args_with_age() {
        let cli = Cli::try_parse_from([
            "aft-scorer", "score", "--sex", "female", "--age", "23", "--mdl", "120", "--spt",
            "4.2", "--hrp", "20", "--sdc", "2:45", "--plk", "1:30", "--two-mr", "22:00",
        ])
        .unwrap();
        match cli.command {
            Commands::Score(args) => {
                assert_eq!(args.sex, Sex::Female);
                assert_eq!(args.age, Some(23));
                assert_eq!(args.sdc, 165);
                assert_eq!(args.two_mr, 1320);
                assert!(!args.json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_score_requires_age_or_group() {
        let result = Cli::try_parse_from([
            "aft-scorer", "score", "--sex", "male", "--mdl", "200", "--spt", "8", "--hrp", "30",
            "--sdc", "2:00", "--plk", "3:00", "--two-mr", "17:00",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_table_rejects_unknown_event() {
        let result = Cli::try_parse_from([
            "aft-scorer", "table", "--sex", "male", "--age-group", "17-21", "--event", "RUN",
        ]);
        assert!(result.is_err());
    }
}
