//! Weekly timetable model.
//!
//! # Responsibility
//! - Define scheduled class entries and the per-day grouping.
//! - Validate wall-clock input in the fixed `HH:MM` 24-hour format.
//!
//! # Invariants
//! - The day map always contains exactly the 7 weekday keys.
//! - Each day's entries stay sorted ascending by `start_time`.
//! - `course_name` is a creation-time snapshot and is never re-synced after
//!   a course rename.

use crate::model::course::{Course, CourseId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("valid clock regex"));

/// Stable identifier for a timetable entry.
pub type EntryId = Uuid;

/// Timetable grouping key.
///
/// Declaration order is the display/iteration order (Monday first); the wire
/// names are the capitalized English day names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
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
    /// All weekdays in display order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// The capitalized English day name, identical to the wire form.
    pub fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rejected wall-clock input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParseError {
    input: String,
}

impl Display for TimeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid wall-clock time `{}`; expected zero-padded 24h HH:MM",
            self.input
        )
    }
}

impl Error for TimeParseError {}

/// Zero-padded 24-hour wall-clock time, e.g. `"09:05"`.
///
/// The fixed format makes lexicographic order equal chronological order,
/// which the timetable relies on for day sorting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClassTime(String);

impl ClassTime {
    /// Parses and validates an `HH:MM` string.
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        if CLOCK_RE.is_match(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(TimeParseError {
                input: input.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ClassTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ClassTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ClassTime {
    // Re-validates on read so a malformed snapshot is rejected at load time
    // instead of flowing into the in-memory collections.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ClassTime::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A scheduled class occurrence on a given weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: EntryId,
    pub course_id: CourseId,
    /// Course name snapshot taken when the entry was created.
    pub course_name: String,
    pub day: Weekday,
    pub start_time: ClassTime,
    pub end_time: ClassTime,
}

/// Validated input for the add-timetable-entry command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimetableEntry {
    course_id: CourseId,
    course_name: String,
    day: Weekday,
    start_time: ClassTime,
    end_time: ClassTime,
}

impl NewTimetableEntry {
    /// Validates raw timetable form input against an existing course and
    /// captures the denormalized course-name snapshot.
    ///
    /// Only the wall-clock format is validated; an end time earlier than the
    /// start time is accepted.
    pub fn new(
        course: &Course,
        day: Weekday,
        start_time: &str,
        end_time: &str,
    ) -> Result<Self, TimeParseError> {
        Ok(Self {
            course_id: course.id,
            course_name: course.name.clone(),
            day,
            start_time: ClassTime::parse(start_time)?,
            end_time: ClassTime::parse(end_time)?,
        })
    }

    pub(crate) fn into_entry(self) -> TimetableEntry {
        TimetableEntry {
            id: Uuid::new_v4(),
            course_id: self.course_id,
            course_name: self.course_name,
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Weekly timetable: per-day ordered sequences of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timetable {
    days: BTreeMap<Weekday, Vec<TimetableEntry>>,
}

impl Default for Timetable {
    fn default() -> Self {
        let mut days = BTreeMap::new();
        for day in Weekday::ALL {
            days.insert(day, Vec::new());
        }
        Self { days }
    }
}

impl<'de> Deserialize<'de> for Timetable {
    // Snapshots written by older sessions may lack day keys; absent days are
    // restored as empty sequences to keep the 7-key invariant.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut days = BTreeMap::<Weekday, Vec<TimetableEntry>>::deserialize(deserializer)?;
        for day in Weekday::ALL {
            days.entry(day).or_default();
        }
        Ok(Self { days })
    }
}

impl Timetable {
    /// Entries scheduled on one day, ordered ascending by start time.
    pub fn entries(&self, day: Weekday) -> &[TimetableEntry] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total entry count across all days.
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts an entry into its day and restores ascending start-time order.
    ///
    /// The sort is stable: entries with equal start times keep insertion
    /// order.
    pub(crate) fn insert(&mut self, entry: TimetableEntry) {
        let day = self.days.entry(entry.day).or_default();
        day.push(entry);
        day.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    }

    /// Removes one entry from a day. Returns whether it was present.
    pub(crate) fn remove(&mut self, day: Weekday, entry_id: EntryId) -> bool {
        let entries = self.days.entry(day).or_default();
        let before = entries.len();
        entries.retain(|entry| entry.id != entry_id);
        entries.len() != before
    }
}
