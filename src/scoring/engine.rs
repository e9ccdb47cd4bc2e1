use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::tables::{ScoringRange, ScoringTables};
use super::types::{
    AgeGroup, Event, EventPoints, ScoreInput, Sex, MAX_EVENT_POINTS, MAX_TOTAL_POINTS,
};

/// Category used when the caller does not pick one.
pub const DEFAULT_CATEGORY: &str = "Heavy";

/// How a performance was turned into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Inside one of the table's ranges
    Matched,
    /// Below the first range's minimum, scores 0
    BelowFloor,
    /// Above every range's maximum, capped at full points
    AboveCeiling,
    /// Between two ranges, scored by the lower neighbour
    InGap,
    /// No table for this sex, age group and event, scores 0
    MissingTable,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EventScore {
    pub event: Event,
    pub performance: f64,
    pub points: u32,
    /// The range that decided the points, if any
    pub range: Option<ScoringRange>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoreResult {
    pub event_points: EventPoints,
    pub total_score: u32,
    pub max_possible: u32,
    /// Per-event resolution, in canonical event order
    pub details: Vec<EventScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PassFailResult {
    pub passed: bool,
    pub total_passed: bool,
    pub all_events_passed: bool,
    pub event_failures: Vec<Event>,
    pub minimum_required: u32,
    pub per_event_minimum: u32,
    pub mos_category: String,
    pub category_description: Option<String>,
    /// Why the result could not be evaluated (unknown category)
    pub reason: Option<String>,
}

/// A score together with its pass/fail verdict, serialized as one object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    #[serde(flatten)]
    pub score: ScoreResult,
    #[serde(flatten)]
    pub pass_fail: Option<PassFailResult>,
}

/// Points for one event.
///
/// Never fails: a missing table scores 0 and is logged, performances below
/// the floor score 0 and performances above the ceiling score full points.
pub fn calculate_event_points(
    tables: &ScoringTables,
    sex: Sex,
    age_group: AgeGroup,
    event: Event,
    performance: f64,
) -> EventScore {
    let score = |points: u32, range: Option<&ScoringRange>, outcome: Outcome| EventScore {
        event,
        performance,
        points,
        range: range.copied(),
        outcome,
    };

    let ranges = match tables.event_table(sex, age_group, event) {
        Some(table) if !table.ranges().is_empty() => table.ranges(),
        _ => {
            warn!(%sex, %age_group, %event, "No scoring data found");
            return score(0, None, Outcome::MissingTable);
        }
    };

    if let Some(range) = ranges.iter().find(|r| r.contains(performance)) {
        debug!(%event, performance, points = range.points, "Matched scoring range");
        return score(range.points, Some(range), Outcome::Matched);
    }

    // NaN compares false against everything; treat it as no performance
    if performance.is_nan() || performance < ranges[0].min {
        debug!(%event, performance, "Below minimum threshold");
        return score(0, Some(&ranges[0]), Outcome::BelowFloor);
    }

    let lower = ranges
        .iter()
        .filter(|r| r.max < performance)
        .max_by(|a, b| a.max.total_cmp(&b.max));

    match lower {
        Some(range) if ranges.iter().any(|r| r.max > performance) => {
            debug!(%event, performance, points = range.points, "Between scoring ranges");
            score(range.points, Some(range), Outcome::InGap)
        }
        _ => {
            debug!(%event, performance, "Above maximum threshold");
            score(MAX_EVENT_POINTS, ranges.last(), Outcome::AboveCeiling)
        }
    }
}

/// Score all six events and sum them.
pub fn calculate_total_score(tables: &ScoringTables, input: &ScoreInput) -> ScoreResult {
    let details: Vec<EventScore> = Event::ALL
        .iter()
        .map(|&event| {
            calculate_event_points(
                tables,
                input.sex,
                input.age_group,
                event,
                input.performance(event),
            )
        })
        .collect();

    let event_points: EventPoints = details.iter().map(|d| (d.event, d.points)).collect();
    let total_score = event_points.total();

    ScoreResult {
        event_points,
        total_score,
        max_possible: MAX_TOTAL_POINTS,
        details,
    }
}

/// Check a score against a category's minimums.
///
/// Passing requires both the minimum total and the per-event minimum in every
/// event. An event missing from `event_points` counts as 0. An unknown
/// category yields a failing result with `reason` set.
pub fn determine_pass_fail(
    tables: &ScoringTables,
    total_score: u32,
    event_points: &EventPoints,
    mos_category: &str,
) -> PassFailResult {
    let Some(category) = tables.category(mos_category) else {
        warn!(category = mos_category, "Invalid MOS category");
        return PassFailResult {
            passed: false,
            total_passed: false,
            all_events_passed: false,
            event_failures: Vec::new(),
            minimum_required: 0,
            per_event_minimum: 0,
            mos_category: mos_category.to_string(),
            category_description: None,
            reason: Some(format!("Invalid MOS category '{}'", mos_category)),
        };
    };

    let total_passed = total_score >= category.minimum_total;
    let event_failures: Vec<Event> = Event::ALL
        .iter()
        .copied()
        .filter(|&event| event_points.get(event).unwrap_or(0) < category.minimum_per_event)
        .collect();
    let all_events_passed = event_failures.is_empty();

    PassFailResult {
        passed: total_passed && all_events_passed,
        total_passed,
        all_events_passed,
        event_failures,
        minimum_required: category.minimum_total,
        per_event_minimum: category.minimum_per_event,
        mos_category: mos_category.to_string(),
        category_description: Some(category.description.clone()),
        reason: None,
    }
}

/// Score a performance set and evaluate it against `mos_category`.
pub fn score_and_evaluate(
    tables: &ScoringTables,
    input: &ScoreInput,
    mos_category: &str,
) -> ScoreReport {
    let score = calculate_total_score(tables, input);
    let pass_fail = determine_pass_fail(tables, score.total_score, &score.event_points, mos_category);
    ScoreReport {
        score,
        pass_fail: Some(pass_fail),
    }
}
