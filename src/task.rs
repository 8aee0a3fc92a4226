use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub deadline: String, // YYYY-MM-DD, kept verbatim when unparsable
    #[serde(with = "weekday_name")]
    pub day_of_week: Weekday,
    pub completed: bool,
}

impl Task {
    pub fn new(description: impl Into<String>, deadline: NaiveDate) -> Self {
        Self {
            description: description.into(),
            deadline: format_date(deadline),
            day_of_week: deadline.weekday(),
            completed: false,
        }
    }

    pub fn deadline_date(&self) -> Option<NaiveDate> {
        parse_date(&self.deadline)
    }

    /// Replaces description and deadline, re-deriving the weekday.
    pub fn reschedule(&mut self, description: impl Into<String>, deadline: NaiveDate) {
        self.description = description.into();
        self.deadline = format_date(deadline);
        self.day_of_week = deadline.weekday();
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Full English weekday names on the wire ("Monday"), any chrono-accepted
/// spelling on the way in.
mod weekday_name {
    use super::*;

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(day_name(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Weekday>()
            .map_err(|_| serde::de::Error::custom(format!("invalid weekday: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_year_2024_is_a_monday() {
        let task = Task::new("plan", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(task.deadline, "2024-01-01");
        assert_eq!(day_name(task.day_of_week), "Monday");
        assert!(!task.completed);
    }

    #[test]
    fn serializes_full_weekday_name() {
        let task = Task::new("ship", NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["day_of_week"], "Friday");
        assert_eq!(json["deadline"], "2024-03-15");
        assert_eq!(json["description"], "ship");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn rejects_unknown_weekday() {
        let raw = r#"{"description":"x","deadline":"2024-01-01","day_of_week":"Funday","completed":false}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }

    #[test]
    fn reschedule_moves_weekday_with_deadline() {
        let mut task = Task::new("a", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        task.completed = true;
        task.reschedule("b", NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(task.description, "b");
        assert_eq!(task.deadline, "2024-01-03");
        assert_eq!(task.day_of_week, Weekday::Wed);
        assert!(task.completed);
    }

    #[test]
    fn deadline_date_reads_stored_string() {
        let mut task = Task::new("a", NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(task.deadline_date(), NaiveDate::from_ymd_opt(2024, 6, 1));
        task.deadline = "soon".to_string();
        assert_eq!(task.deadline_date(), None);
    }

    #[test]
    fn parse_date_handles_garbage() {
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("tomorrow"), None);
        assert_eq!(
            parse_date(" 2024-02-29 "),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }
}
