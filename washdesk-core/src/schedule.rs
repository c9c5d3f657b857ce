//! Day-of-week schedules.
//!
//! Building and vehicle schedules reach the console in three shapes: a
//! comma-joined string (`"Monday,Wednesday"`), an array of day names, or an
//! array of `{ "day": "Monday" }` objects. [`ScheduleDays`] accepts all of
//! them and always writes the comma-joined form back.

use crate::error::DecodeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn all() -> &'static [Weekday] {
        &[
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    pub fn short(&self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Weekday::all()
            .iter()
            .copied()
            .find(|day| {
                lowered == day.name().to_ascii_lowercase()
                    || lowered == day.short().to_ascii_lowercase()
            })
            .ok_or_else(|| DecodeError::UnknownDay(s.trim().to_string()))
    }
}

/// Ordered set of weekdays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDays(BTreeSet<Weekday>);

impl ScheduleDays {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse the comma-joined form. Blank segments are skipped.
    pub fn parse(joined: &str) -> Result<Self, DecodeError> {
        Self::from_names(joined.split(','))
    }

    pub fn from_names<I, S>(names: I) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut days = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            if name.trim().is_empty() {
                continue;
            }
            days.insert(name.parse::<Weekday>()?);
        }
        Ok(Self(days))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    /// Flip one day in or out of the set.
    pub fn toggle(&mut self, day: Weekday) {
        if !self.0.remove(&day) {
            self.0.insert(day);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }

    pub fn to_joined(&self) -> String {
        self.0
            .iter()
            .map(Weekday::name)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<Weekday> for ScheduleDays {
    fn from_iter<T: IntoIterator<Item = Weekday>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ScheduleDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_joined())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireDay {
    Name(String),
    Object { day: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireSchedule {
    Joined(String),
    List(Vec<WireDay>),
}

impl<'de> Deserialize<'de> for ScheduleDays {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Option::<WireSchedule>::deserialize(deserializer)? {
            None => Ok(ScheduleDays::new()),
            Some(WireSchedule::Joined(joined)) => ScheduleDays::parse(&joined),
            Some(WireSchedule::List(items)) => ScheduleDays::from_names(items.into_iter().map(
                |item| match item {
                    WireDay::Name(name) => name,
                    WireDay::Object { day } => day,
                },
            )),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

impl Serialize for ScheduleDays {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_joined())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_shapes_normalize_identically() {
        let joined: ScheduleDays = serde_json::from_str("\"Monday,Wednesday\"").unwrap();
        let names: ScheduleDays = serde_json::from_str(r#"["wednesday","monday"]"#).unwrap();
        let objects: ScheduleDays =
            serde_json::from_str(r#"[{"day":"Mon"},{"day":"Wed"}]"#).unwrap();

        assert_eq!(joined, names);
        assert_eq!(names, objects);
        assert_eq!(
            serde_json::to_string(&objects).unwrap(),
            "\"Monday,Wednesday\""
        );
    }

    #[test]
    fn test_null_and_empty_are_empty_schedule() {
        let null: ScheduleDays = serde_json::from_str("null").unwrap();
        let blank: ScheduleDays = serde_json::from_str("\"\"").unwrap();
        assert!(null.is_empty());
        assert!(blank.is_empty());
    }

    #[test]
    fn test_unknown_day_fails_decode() {
        let result = serde_json::from_str::<ScheduleDays>("\"Funday\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut days = ScheduleDays::new();
        days.toggle(Weekday::Friday);
        assert!(days.contains(Weekday::Friday));
        days.toggle(Weekday::Friday);
        assert!(days.is_empty());
    }

    #[test]
    fn test_joined_output_is_week_ordered() {
        let days = ScheduleDays::parse("sun, tue ,Mon").unwrap();
        assert_eq!(days.to_joined(), "Monday,Tuesday,Sunday");
    }
}
