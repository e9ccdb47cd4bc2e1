pub mod engine;
pub mod tables;
pub mod time;
pub mod types;
pub mod validation;

pub use engine::{
    calculate_event_points, calculate_total_score, determine_pass_fail, score_and_evaluate,
    EventScore, Outcome, PassFailResult, ScoreReport, ScoreResult, DEFAULT_CATEGORY,
};
pub use tables::{EventTable, MosCategory, ScoringRange, ScoringTables};
pub use time::{parse_clock, seconds_to_time_string, time_string_to_seconds};
pub use types::{AgeGroup, Event, EventPoints, ScoreInput, Sex, MAX_EVENT_POINTS, MAX_TOTAL_POINTS};
pub use validation::{validate_input, validate_tables};
