//! Load-time upgrade of stored task entries to the current record shape.
//!
//! Older files hold bare strings instead of records, use `"task"` for the
//! description, or lack `day_of_week`. Everything that can become a [`Task`]
//! is upgraded; entries missing a required field are dropped.

use chrono::{Datelike, NaiveDate, Weekday};
use serde_json::{Map, Value};

use crate::task::{format_date, parse_date, Task};

const LEGACY_DESCRIPTION_KEY: &str = "task";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub upgraded_legacy: usize,
    pub renamed_key: usize,
    pub backfilled_weekday: usize,
    pub corrected_weekday: usize,
    pub dropped: usize,
}

#[derive(Debug)]
pub struct Migration {
    pub tasks: Vec<Task>,
    pub report: MigrationReport,
    changed: bool,
}

impl Migration {
    /// Whether the migrated collection differs from what was stored.
    pub fn changed(&self) -> bool {
        self.changed
    }
}

pub fn migrate(entries: &[Value], today: NaiveDate) -> Migration {
    let mut report = MigrationReport::default();
    let mut tasks = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry {
            Value::String(description) => {
                report.upgraded_legacy += 1;
                tasks.push(Task::new(description.clone(), today));
            }
            Value::Object(fields) => match upgrade_record(fields, today, &mut report) {
                Some(task) => tasks.push(task),
                None => report.dropped += 1,
            },
            _ => report.dropped += 1,
        }
    }

    // Comparing the serialized form also catches extra keys and
    // non-canonical weekday spellings.
    let changed = serde_json::to_value(&tasks)
        .map_or(true, |migrated| migrated.as_array().map(Vec::as_slice) != Some(entries));

    Migration {
        tasks,
        report,
        changed,
    }
}

fn upgrade_record(
    fields: &Map<String, Value>,
    today: NaiveDate,
    report: &mut MigrationReport,
) -> Option<Task> {
    let (description, renamed) = match fields.get("description") {
        Some(value) => (value.as_str()?, false),
        None => (fields.get(LEGACY_DESCRIPTION_KEY)?.as_str()?, true),
    };
    let deadline = fields.get("deadline")?.as_str()?;
    let completed = fields.get("completed")?.as_bool()?;

    let stored_day = fields
        .get("day_of_week")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<Weekday>().ok());

    let parsed = parse_date(deadline);
    let day_of_week = match (stored_day, parsed) {
        (stored, Some(date)) => {
            match stored {
                None => report.backfilled_weekday += 1,
                Some(day) if day != date.weekday() => report.corrected_weekday += 1,
                Some(_) => {}
            }
            date.weekday()
        }
        (Some(day), None) => day,
        (None, None) => {
            report.backfilled_weekday += 1;
            today.weekday()
        }
    };

    if renamed {
        report.renamed_key += 1;
    }

    Some(Task {
        description: description.to_string(),
        // parseable deadlines are always stored as YYYY-MM-DD
        deadline: parsed.map_or_else(|| deadline.to_string(), format_date),
        day_of_week,
        completed,
    })
}
