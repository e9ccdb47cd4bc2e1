use std::io::IsTerminal;
use owo_colors::OwoColorize;

use crate::scoring::{
    seconds_to_time_string, AgeGroup, Event, EventScore, EventTable, MosCategory, Outcome,
    PassFailResult, ScoreReport, ScoreResult, Sex,
};

/// Format a performance in the unit it was entered in.
/// Timed events show as "mm:ss", the power throw keeps one decimal.
pub fn format_performance(event: Event, value: f64) -> String {
    if event.is_timed() && value.is_finite() && value >= 0.0 {
        seconds_to_time_string(value.round() as u32)
    } else if event == Event::PowerThrow {
        format!("{:.1} {}", value, event.unit())
    } else {
        format!("{} {}", value, event.unit())
    }
}

fn outcome_note(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Matched => "",
        Outcome::BelowFloor => "below minimum",
        Outcome::AboveCeiling => "above maximum",
        Outcome::InGap => "between ranges",
        Outcome::MissingTable => "no table",
    }
}

/// Format one event line: code, performance, points.
/// In verbose mode the matched range and any out-of-table note are appended.
fn format_event_line(detail: &EventScore, verbose: bool, use_colors: bool) -> String {
    let code = format!("{:<4}", detail.event.code());
    let performance = format!("{:>10}", format_performance(detail.event, detail.performance));
    let points = format!("{:>4}", detail.points);

    let mut line = if use_colors {
        format!("{} {}  {}", code.bold(), performance, points.cyan())
    } else {
        format!("{} {}  {}", code, performance, points)
    };

    if verbose {
        if let Some(range) = detail.range {
            line.push_str(&format!(
                "  [{} .. {}]",
                format_bound(detail.event, range.min),
                format_bound(detail.event, range.max)
            ));
        }
        let note = outcome_note(detail.outcome);
        if !note.is_empty() {
            line.push_str(&format!("  ({})", note));
        }
    }

    line
}

fn format_bound(event: Event, value: f64) -> String {
    if event.is_timed() {
        seconds_to_time_string(value.max(0.0).round() as u32)
    } else if event == Event::PowerThrow {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Format the per-event breakdown and total.
pub fn format_score(result: &ScoreResult, verbose: bool, use_colors: bool) -> String {
    let mut lines: Vec<String> = result
        .details
        .iter()
        .map(|detail| format_event_line(detail, verbose, use_colors))
        .collect();

    let total = format!("{} / {}", result.total_score, result.max_possible);
    if use_colors {
        lines.push(format!("{} {}", "Total:".bold(), total.bold()));
    } else {
        lines.push(format!("Total: {}", total));
    }

    lines.join("\n")
}

/// Format a pass/fail verdict with the thresholds that produced it.
pub fn format_pass_fail(result: &PassFailResult, use_colors: bool) -> String {
    if let Some(ref reason) = result.reason {
        return if use_colors {
            format!("{} {}", "FAIL".red().bold(), reason)
        } else {
            format!("FAIL {}", reason)
        };
    }

    let verdict = if use_colors {
        if result.passed {
            "PASS".green().bold().to_string()
        } else {
            "FAIL".red().bold().to_string()
        }
    } else if result.passed {
        "PASS".to_string()
    } else {
        "FAIL".to_string()
    };

    let mut line = format!(
        "{} {} (minimum total {}, {} per event)",
        verdict, result.mos_category, result.minimum_required, result.per_event_minimum
    );

    if !result.total_passed {
        line.push_str("\n  Total score below minimum");
    }
    if !result.event_failures.is_empty() {
        let failures: Vec<&str> = result.event_failures.iter().map(|e| e.code()).collect();
        line.push_str(&format!("\n  Events below minimum: {}", failures.join(", ")));
    }

    line
}

/// Format a full report: breakdown followed by the verdict, if any.
pub fn format_report(report: &ScoreReport, verbose: bool, use_colors: bool) -> String {
    let mut output = format_score(&report.score, verbose, use_colors);
    if let Some(ref pass_fail) = report.pass_fail {
        output.push('\n');
        output.push_str(&format_pass_fail(pass_fail, use_colors));
    }
    output
}

/// Format a report as pretty-printed JSON for scripting.
pub fn format_json(report: &ScoreReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Format one event table as "min .. max  points" rows.
pub fn format_event_table(
    sex: Sex,
    age_group: AgeGroup,
    event: Event,
    table: &EventTable,
    use_colors: bool,
) -> String {
    let header = format!("{} {} {} ({})", event.code(), sex, age_group, event.unit());
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for range in table.ranges() {
        lines.push(format!(
            "  {:>8} .. {:<8} {:>4}",
            format_bound(event, range.min),
            format_bound(event, range.max),
            range.points
        ));
    }

    lines.join("\n")
}

/// Format category minimums, one per line.
pub fn format_categories<'a>(
    categories: impl Iterator<Item = (&'a str, &'a MosCategory)>,
    use_colors: bool,
) -> String {
    let lines: Vec<String> = categories
        .map(|(name, category)| {
            let name = format!("{:<12}", name);
            let name = if use_colors {
                name.bold().to_string()
            } else {
                name
            };
            format!(
                "{} total >= {:<4} per event >= {:<4} {}",
                name, category.minimum_total, category.minimum_per_event, category.description
            )
        })
        .collect();

    if lines.is_empty() {
        "No MOS categories defined.".to_string()
    } else {
        lines.join("\n")
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}
