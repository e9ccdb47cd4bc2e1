use anyhow::{Context, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use super::time::parse_clock;
use super::types::{AgeGroup, Event, Sex};
use super::validation::validate_tables;

/// Tables compiled into the binary, used unless a replacement file is given.
const BUNDLED_TABLES: &str = include_str!("../../data/scoring_tables.yaml");

/// Closed interval of performances worth a fixed number of points.
///
/// Bounds may be written as plain numbers or as "m:ss" clock strings, which
/// load as seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringRange {
    #[serde(deserialize_with = "deserialize_bound")]
    pub min: f64,
    #[serde(deserialize_with = "deserialize_bound")]
    pub max: f64,
    pub points: u32,
}

impl ScoringRange {
    pub fn contains(&self, performance: f64) -> bool {
        performance >= self.min && performance <= self.max
    }
}

/// Ranges for one (sex, age group, event), sorted ascending by `min`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EventTable(Vec<ScoringRange>);

impl EventTable {
    pub fn new(ranges: Vec<ScoringRange>) -> Self {
        Self(ranges)
    }

    pub fn ranges(&self) -> &[ScoringRange] {
        &self.0
    }

    pub fn first(&self) -> Option<&ScoringRange> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&ScoringRange> {
        self.0.last()
    }
}

/// Minimum standards for a physical-demand category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MosCategory {
    pub minimum_total: u32,
    pub minimum_per_event: u32,
    #[serde(default)]
    pub description: String,
}

/// Complete table set: event tables keyed by sex, age group and event, plus
/// the category minimums.
///
/// Example YAML:
/// ```yaml
/// mos_categories:
///   Heavy: { minimum_total: 440, minimum_per_event: 60, description: "Heavy physical demand" }
/// tables:
///   female:
///     "17-21":
///       MDL:
///         - { min: 0, max: 79, points: 0 }
///         - { min: 80, max: 89, points: 20 }
///       PLK:
///         - { min: "0:00", max: "0:29", points: 0 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringTables {
    #[serde(default)]
    pub mos_categories: BTreeMap<String, MosCategory>,

    #[serde(default)]
    pub tables: BTreeMap<Sex, BTreeMap<AgeGroup, BTreeMap<Event, EventTable>>>,
}

impl ScoringTables {
    /// The table set shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_yaml_str(BUNDLED_TABLES).context("Bundled scoring tables are invalid")
    }

    /// Load a table set from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the YAML cannot be parsed,
    /// or the tables fail validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scoring tables at {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid scoring tables in {}", path.display()))
    }

    /// Parse and validate a table set. All validation problems are reported
    /// together.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let tables: ScoringTables =
            serde_saphyr::from_str(content).context("Failed to parse scoring tables YAML")?;

        if let Err(errors) = validate_tables(&tables) {
            anyhow::bail!(
                "{} problem(s) in scoring tables:\n  - {}",
                errors.len(),
                errors.join("\n  - ")
            );
        }

        Ok(tables)
    }

    pub fn event_table(&self, sex: Sex, age_group: AgeGroup, event: Event) -> Option<&EventTable> {
        self.tables.get(&sex)?.get(&age_group)?.get(&event)
    }

    pub fn category(&self, name: &str) -> Option<&MosCategory> {
        self.mos_categories.get(name)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &MosCategory)> {
        self.mos_categories
            .iter()
            .map(|(name, category)| (name.as_str(), category))
    }

    /// Every (sex, age group, event) combination with no table. Lookups for
    /// these score 0.
    pub fn missing_tables(&self) -> Vec<(Sex, AgeGroup, Event)> {
        let mut missing = Vec::new();
        for sex in Sex::ALL {
            for age_group in AgeGroup::ALL {
                for event in Event::ALL {
                    if self.event_table(sex, age_group, event).is_none() {
                        missing.push((sex, age_group, event));
                    }
                }
            }
        }
        missing
    }
}

fn deserialize_bound<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoundVisitor;

    impl<'de> Visitor<'de> for BoundVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or a \"m:ss\" time")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            parse_clock(value)
                .map(f64::from)
                .map_err(|e| E::custom(format!("{:#}", e)))
        }
    }

    deserializer.deserialize_any(BoundVisitor)
}
