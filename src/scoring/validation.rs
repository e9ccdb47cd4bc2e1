use super::tables::ScoringTables;
use super::types::{Event, ScoreInput, MAX_EVENT_POINTS, MAX_TOTAL_POINTS};

/// Tolerance for comparing fractional bounds such as 4.4 and 4.5.
const EPSILON: f64 = 1e-9;

/// Validate a table set at load time.
/// Returns all validation errors at once (not just the first).
///
/// Ranges must be sorted, non-overlapping and gapless at the event's
/// resolution, so every performance between the floor and the ceiling lands
/// in exactly one range.
pub fn validate_tables(tables: &ScoringTables) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (name, category) in &tables.mos_categories {
        if category.minimum_total > MAX_TOTAL_POINTS {
            errors.push(format!(
                "mos_categories.{}.minimum_total: {} exceeds maximum of {}",
                name, category.minimum_total, MAX_TOTAL_POINTS
            ));
        }
        if category.minimum_per_event > MAX_EVENT_POINTS {
            errors.push(format!(
                "mos_categories.{}.minimum_per_event: {} exceeds maximum of {}",
                name, category.minimum_per_event, MAX_EVENT_POINTS
            ));
        }
    }

    for (sex, groups) in &tables.tables {
        for (age_group, events) in groups {
            for (event, table) in events {
                let path = format!("{}.{}.{}", sex, age_group, event);
                let ranges = table.ranges();

                if ranges.is_empty() {
                    errors.push(format!("{}: table has no ranges", path));
                    continue;
                }

                for (i, range) in ranges.iter().enumerate() {
                    if !range.min.is_finite() || !range.max.is_finite() {
                        errors.push(format!("{}[{}]: bounds must be finite", path, i));
                        continue;
                    }
                    if range.min > range.max {
                        errors.push(format!(
                            "{}[{}]: min {} is greater than max {}",
                            path, i, range.min, range.max
                        ));
                    }
                    if range.points > MAX_EVENT_POINTS {
                        errors.push(format!(
                            "{}[{}]: points {} exceeds maximum of {}",
                            path, i, range.points, MAX_EVENT_POINTS
                        ));
                    }
                }

                for (i, pair) in ranges.windows(2).enumerate() {
                    let (prev, next) = (&pair[0], &pair[1]);
                    if next.min <= prev.max {
                        errors.push(format!(
                            "{}[{}]: min {} overlaps previous range ending at {}",
                            path,
                            i + 1,
                            next.min,
                            prev.max
                        ));
                    } else if next.min - prev.max > event.resolution() + EPSILON {
                        errors.push(format!(
                            "{}[{}]: gap between {} and {} (resolution {})",
                            path,
                            i + 1,
                            prev.max,
                            next.min,
                            event.resolution()
                        ));
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a performance set before it is scored.
/// Returns all validation errors at once (not just the first).
pub fn validate_input(input: &ScoreInput) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for event in Event::ALL {
        let value = input.performance(event);
        if !value.is_finite() {
            errors.push(format!("{}: must be a number", event));
        } else if value < 0.0 {
            errors.push(format!("{}: must not be negative", event));
        }
    }

    if input.hrp.is_finite() && input.hrp.fract() != 0.0 {
        errors.push(format!("{}: must be a whole number of repetitions", Event::PushUps));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::tables::{EventTable, MosCategory, ScoringRange};
    use crate::scoring::types::{AgeGroup, Sex};
    use std::collections::BTreeMap;

    fn range(min: f64, max: f64, points: u32) -> ScoringRange {
        ScoringRange { min, max, points }
    }

    fn single_table(event: Event, ranges: Vec<ScoringRange>) -> ScoringTables {
        let mut events = BTreeMap::new();
        events.insert(event, EventTable::new(ranges));
        let mut groups = BTreeMap::new();
        groups.insert(AgeGroup::From17To21, events);
        let mut tables = BTreeMap::new();
        tables.insert(Sex::Male, groups);
        ScoringTables {
            mos_categories: BTreeMap::new(),
            tables,
        }
    }

    fn sample_input() -> ScoreInput {
        ScoreInput {
            sex: Sex::Male,
            age_group: AgeGroup::From17To21,
            mdl: 200.0,
            spt: 8.0,
            hrp: 30.0,
            sdc: 120.0,
            plk: 180.0,
            two_mr: 1020.0,
        }
    }

    #[test]
    fn test_valid_tables() {
        let tables = single_table(
            Event::Deadlift,
            vec![range(0.0, 79.0, 0), range(80.0, 89.0, 20), range(90.0, 210.0, 100)],
        );
        assert!(validate_tables(&tables).is_ok());
    }

    #[test]
    fn test_empty_tables() {
        assert!(validate_tables(&ScoringTables::default()).is_ok());
    }

    #[test]
    fn test_fractional_resolution_allows_tenth_steps() {
        let tables = single_table(
            Event::PowerThrow,
            vec![range(0.0, 3.9, 0), range(4.0, 4.4, 20), range(4.5, 15.0, 100)],
        );
        assert!(validate_tables(&tables).is_ok());
    }

    #[test]
    fn test_overlapping_ranges() {
        let tables = single_table(
            Event::Deadlift,
            vec![range(0.0, 80.0, 0), range(80.0, 89.0, 20)],
        );
        let errors = validate_tables(&tables).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("male.17-21.MDL[1]"));
        assert!(errors[0].contains("overlaps"));
    }

    #[test]
    fn test_gap_between_ranges() {
        let tables = single_table(
            Event::Deadlift,
            vec![range(0.0, 79.0, 0), range(85.0, 89.0, 20)],
        );
        let errors = validate_tables(&tables).unwrap_err();
        assert!(errors[0].contains("gap"));
    }

    #[test]
    fn test_gap_at_tenth_resolution() {
        let tables = single_table(
            Event::PowerThrow,
            vec![range(0.0, 3.9, 0), range(4.1, 15.0, 20)],
        );
        assert!(validate_tables(&tables).is_err());
    }

    #[test]
    fn test_unsorted_ranges_are_overlaps() {
        let tables = single_table(
            Event::Deadlift,
            vec![range(80.0, 89.0, 20), range(0.0, 79.0, 0)],
        );
        assert!(validate_tables(&tables).is_err());
    }

    #[test]
    fn test_empty_event_table() {
        let tables = single_table(Event::Plank, vec![]);
        let errors = validate_tables(&tables).unwrap_err();
        assert!(errors[0].contains("no ranges"));
    }

    #[test]
    fn test_points_over_maximum() {
        let tables = single_table(Event::Deadlift, vec![range(0.0, 10.0, 120)]);
        let errors = validate_tables(&tables).unwrap_err();
        assert!(errors[0].contains("points 120"));
    }

    #[test]
    fn test_category_limits() {
        let mut tables = ScoringTables::default();
        tables.mos_categories.insert(
            "Heavy".to_string(),
            MosCategory {
                minimum_total: 601,
                minimum_per_event: 101,
                description: String::new(),
            },
        );
        let errors = validate_tables(&tables).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_collects_all_errors() {
        let tables = single_table(
            Event::Deadlift,
            vec![
                range(10.0, 5.0, 0),    // Error 1: min > max
                range(6.0, 30.0, 150),  // Error 2: points
                range(25.0, 40.0, 20),  // Error 3: overlap
            ],
        );
        let errors = validate_tables(&tables).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_input()).is_ok());
    }

    #[test]
    fn test_negative_and_nan_input() {
        let input = ScoreInput {
            mdl: -5.0,
            plk: f64::NAN,
            ..sample_input()
        };
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("MDL"));
        assert!(errors[1].starts_with("PLK"));
    }

    #[test]
    fn test_fractional_push_ups() {
        let input = ScoreInput {
            hrp: 12.5,
            ..sample_input()
        };
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(errors, vec!["HRP: must be a whole number of repetitions".to_string()]);
    }
}
