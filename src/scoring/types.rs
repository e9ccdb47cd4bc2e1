use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Highest score a single event can award.
pub const MAX_EVENT_POINTS: u32 = 100;

/// Highest total score across all six events.
pub const MAX_TOTAL_POINTS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => bail!("Unknown sex '{}': expected 'male' or 'female'", other),
        }
    }
}

/// Age bracket a set of tables applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum AgeGroup {
    #[serde(rename = "17-21")]
    From17To21,
    #[serde(rename = "22-26")]
    From22To26,
    #[serde(rename = "27-31")]
    From27To31,
    #[serde(rename = "32-36")]
    From32To36,
    #[serde(rename = "37-41")]
    From37To41,
    #[serde(rename = "42-46")]
    From42To46,
    #[serde(rename = "47-51")]
    From47To51,
    #[serde(rename = "52-56")]
    From52To56,
    #[serde(rename = "57-61")]
    From57To61,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 9] = [
        AgeGroup::From17To21,
        AgeGroup::From22To26,
        AgeGroup::From27To31,
        AgeGroup::From32To36,
        AgeGroup::From37To41,
        AgeGroup::From42To46,
        AgeGroup::From47To51,
        AgeGroup::From52To56,
        AgeGroup::From57To61,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::From17To21 => "17-21",
            AgeGroup::From22To26 => "22-26",
            AgeGroup::From27To31 => "27-31",
            AgeGroup::From32To36 => "32-36",
            AgeGroup::From37To41 => "37-41",
            AgeGroup::From42To46 => "42-46",
            AgeGroup::From47To51 => "47-51",
            AgeGroup::From52To56 => "52-56",
            AgeGroup::From57To61 => "57-61",
        }
    }

    /// Band for an age in years. Under 17 has no band; anyone older than 61
    /// is scored in the oldest band.
    pub fn for_age(age: u32) -> Option<AgeGroup> {
        if age < 17 {
            return None;
        }
        let index = ((age - 17) / 5).min(AgeGroup::ALL.len() as u32 - 1);
        Some(AgeGroup::ALL[index as usize])
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeGroup {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match AgeGroup::ALL.iter().find(|group| group.label() == s) {
            Some(group) => Ok(*group),
            None => bail!(
                "Unknown age group '{}': expected one of {}",
                s,
                AgeGroup::ALL.map(|g| g.label()).join(", ")
            ),
        }
    }
}

/// The six scored events, declared in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Event {
    /// Three-repetition maximum deadlift, pounds
    #[serde(rename = "MDL")]
    Deadlift,
    /// Standing power throw, meters
    #[serde(rename = "SPT")]
    PowerThrow,
    /// Hand-release push-ups, repetitions
    #[serde(rename = "HRP")]
    PushUps,
    /// Sprint-drag-carry, seconds
    #[serde(rename = "SDC")]
    SprintDragCarry,
    /// Plank hold, seconds
    #[serde(rename = "PLK")]
    Plank,
    /// Two-mile run, seconds
    #[serde(rename = "2MR")]
    TwoMileRun,
}

impl Event {
    pub const ALL: [Event; 6] = [
        Event::Deadlift,
        Event::PowerThrow,
        Event::PushUps,
        Event::SprintDragCarry,
        Event::Plank,
        Event::TwoMileRun,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Event::Deadlift => "MDL",
            Event::PowerThrow => "SPT",
            Event::PushUps => "HRP",
            Event::SprintDragCarry => "SDC",
            Event::Plank => "PLK",
            Event::TwoMileRun => "2MR",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Event::Deadlift => "lbs",
            Event::PowerThrow => "m",
            Event::PushUps => "reps",
            Event::SprintDragCarry | Event::Plank | Event::TwoMileRun => "s",
        }
    }

    /// Smallest meaningful difference between two performances.
    /// Adjacent table ranges may be at most this far apart.
    pub fn resolution(&self) -> f64 {
        match self {
            Event::PowerThrow => 0.1,
            _ => 1.0,
        }
    }

    pub fn is_timed(&self) -> bool {
        matches!(
            self,
            Event::SprintDragCarry | Event::Plank | Event::TwoMileRun
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Event {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match Event::ALL
            .iter()
            .find(|event| event.code().eq_ignore_ascii_case(s))
        {
            Some(event) => Ok(*event),
            None => bail!(
                "Unknown event '{}': expected one of {}",
                s,
                Event::ALL.map(|e| e.code()).join(", ")
            ),
        }
    }
}

/// Points per event, iterated in canonical event order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EventPoints(BTreeMap<Event, u32>);

impl EventPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: Event, points: u32) {
        self.0.insert(event, points);
    }

    pub fn get(&self, event: Event) -> Option<u32> {
        self.0.get(&event).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Event, u32)> + '_ {
        self.0.iter().map(|(event, points)| (*event, *points))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }
}

impl FromIterator<(Event, u32)> for EventPoints {
    fn from_iter<I: IntoIterator<Item = (Event, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One performance per event for a single soldier, already in table units:
/// pounds, meters, repetitions and seconds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoreInput {
    pub sex: Sex,
    pub age_group: AgeGroup,
    pub mdl: f64,
    pub spt: f64,
    pub hrp: f64,
    pub sdc: f64,
    pub plk: f64,
    pub two_mr: f64,
}

impl ScoreInput {
    pub fn performance(&self, event: Event) -> f64 {
        match event {
            Event::Deadlift => self.mdl,
            Event::PowerThrow => self.spt,
            Event::PushUps => self.hrp,
            Event::SprintDragCarry => self.sdc,
            Event::Plank => self.plk,
            Event::TwoMileRun => self.two_mr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_parse() {
        assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("Female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("F".parse::<Sex>().unwrap(), Sex::Female);
        assert!("other".parse::<Sex>().is_err());
    }

    #[test]
    fn test_age_group_parse_and_display() {
        let group: AgeGroup = "32-36".parse().unwrap();
        assert_eq!(group, AgeGroup::From32To36);
        assert_eq!(group.to_string(), "32-36");
        assert!("16-20".parse::<AgeGroup>().is_err());
    }

    #[test]
    fn test_age_group_for_age() {
        assert_eq!(AgeGroup::for_age(16), None);
        assert_eq!(AgeGroup::for_age(17), Some(AgeGroup::From17To21));
        assert_eq!(AgeGroup::for_age(21), Some(AgeGroup::From17To21));
        assert_eq!(AgeGroup::for_age(22), Some(AgeGroup::From22To26));
        assert_eq!(AgeGroup::for_age(61), Some(AgeGroup::From57To61));
        assert_eq!(AgeGroup::for_age(70), Some(AgeGroup::From57To61));
    }

    #[test]
    fn test_event_codes_in_canonical_order() {
        let codes: Vec<&str> = Event::ALL.iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec!["MDL", "SPT", "HRP", "SDC", "PLK", "2MR"]);

        let mut sorted = Event::ALL;
        sorted.sort();
        assert_eq!(sorted, Event::ALL);
    }

    #[test]
    fn test_event_parse_case_insensitive() {
        assert_eq!("2mr".parse::<Event>().unwrap(), Event::TwoMileRun);
        assert_eq!("PLK".parse::<Event>().unwrap(), Event::Plank);
        assert!("run".parse::<Event>().is_err());
    }

    #[test]
    fn test_event_points_iterates_canonically() {
        let points: EventPoints = vec![
            (Event::TwoMileRun, 70),
            (Event::Deadlift, 60),
            (Event::Plank, 80),
        ]
        .into_iter()
        .collect();

        let order: Vec<Event> = points.iter().map(|(e, _)| e).collect();
        assert_eq!(order, vec![Event::Deadlift, Event::Plank, Event::TwoMileRun]);
        assert_eq!(points.total(), 210);
    }

    #[test]
    fn test_event_points_serializes_by_code() {
        let points: EventPoints = vec![(Event::TwoMileRun, 70), (Event::Deadlift, 60)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&points).unwrap();
        assert_eq!(json, r#"{"MDL":60,"2MR":70}"#);
    }
}
