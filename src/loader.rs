//! Trip record loading, start-time derivation, and month/weekday filtering.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Month names accepted by the month filter, 1-based by position. The shipped
/// data sets cover January through June only, so the filter vocabulary stops
/// there; rendering uses the full twelve-name table in [`crate::output`].
pub const FILTER_MONTHS: [&str; 6] = [
    "january", "february", "march", "april", "may", "june",
];

/// Weekday names as `chrono`'s `%A` produces them.
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Narrows a record set to one month, or keeps every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    /// 1-based month number within the January–June vocabulary.
    Month(u32),
}

impl MonthFilter {
    /// Builds a filter from a validated lowercase token ("all" or a month name).
    pub fn parse(token: &str) -> Option<Self> {
        if token == "all" {
            return Some(Self::All);
        }
        FILTER_MONTHS
            .iter()
            .position(|m| *m == token)
            .map(|i| Self::Month(i as u32 + 1))
    }

    fn keeps(&self, trip: &Trip) -> bool {
        match self {
            Self::All => true,
            Self::Month(month) => trip.month == *month,
        }
    }
}

/// Narrows a record set to one weekday, or keeps every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayFilter {
    All,
    /// Capitalized weekday name, e.g. "Sunday".
    Day(String),
}

impl DayFilter {
    /// Builds a filter from a validated lowercase token ("all" or a day name).
    pub fn parse(token: &str) -> Option<Self> {
        if token == "all" {
            return Some(Self::All);
        }
        DAY_NAMES
            .iter()
            .find(|d| d.eq_ignore_ascii_case(token))
            .map(|d| Self::Day((*d).to_string()))
    }

    fn keeps(&self, trip: &Trip) -> bool {
        match self {
            Self::All => true,
            Self::Day(day) => trip.day_of_week == *day,
        }
    }
}

/// One bike trip as recorded in a city CSV, plus the attributes derived from
/// its start timestamp after parsing. Derived fields are filled once by the
/// loader and never re-mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    #[serde(rename = "Start Time", deserialize_with = "parse_timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(rename = "End Time", deserialize_with = "parse_timestamp")]
    pub end_time: NaiveDateTime,
    #[serde(rename = "Start Station")]
    pub start_station: String,
    #[serde(rename = "End Station")]
    pub end_station: String,
    /// Seconds.
    #[serde(rename = "Trip Duration")]
    pub trip_duration: f64,
    #[serde(rename = "User Type")]
    pub user_type: String,
    /// Absent for cities that do not record it; empty fields read as None.
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    /// Recorded as a float (e.g. `1992.0`) in the source files.
    #[serde(rename = "Birth Year", default)]
    pub birth_year: Option<f64>,

    #[serde(skip)]
    pub month: u32,
    #[serde(skip)]
    pub day_of_week: String,
    #[serde(skip)]
    pub hour: u32,
}

impl Trip {
    fn derive_columns(&mut self) {
        self.month = self.start_time.month();
        self.day_of_week = self.start_time.format("%A").to_string();
        self.hour = self.start_time.hour();
    }

    /// The "From: X, To: Y" label used to rank start/end station pairs.
    pub fn trip_label(&self) -> String {
        format!("From: {}, To: {}", self.start_station, self.end_station)
    }
}

fn parse_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
}

/// The trips loaded for one city after optional month/weekday narrowing,
/// together with schema-level flags for the optional columns. Row order is
/// preserved from the source file.
#[derive(Debug)]
pub struct RecordSet {
    pub trips: Vec<Trip>,
    /// Whether the source file had a Gender column at all, regardless of
    /// per-row nulls.
    pub has_gender: bool,
    /// Whether the source file had a Birth Year column at all.
    pub has_birth_year: bool,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn months(&self) -> impl Iterator<Item = u32> + '_ {
        self.trips.iter().map(|t| t.month)
    }

    pub fn weekdays(&self) -> impl Iterator<Item = &str> {
        self.trips.iter().map(|t| t.day_of_week.as_str())
    }

    pub fn hours(&self) -> impl Iterator<Item = u32> + '_ {
        self.trips.iter().map(|t| t.hour)
    }

    pub fn start_stations(&self) -> impl Iterator<Item = &str> {
        self.trips.iter().map(|t| t.start_station.as_str())
    }

    pub fn end_stations(&self) -> impl Iterator<Item = &str> {
        self.trips.iter().map(|t| t.end_station.as_str())
    }

    pub fn trip_labels(&self) -> impl Iterator<Item = String> + '_ {
        self.trips.iter().map(Trip::trip_label)
    }

    pub fn durations(&self) -> impl Iterator<Item = f64> + '_ {
        self.trips.iter().map(|t| t.trip_duration)
    }

    pub fn user_types(&self) -> impl Iterator<Item = &str> {
        self.trips.iter().map(|t| t.user_type.as_str())
    }

    /// Gender values with nulls relabeled to a literal "Missing data" category,
    /// so tabulated counts still sum to the row total.
    pub fn genders(&self) -> impl Iterator<Item = &str> {
        self.trips
            .iter()
            .map(|t| t.gender.as_deref().unwrap_or("Missing data"))
    }

    /// Birth years truncated to whole years; None marks a missing entry.
    pub fn birth_years(&self) -> impl Iterator<Item = Option<i32>> + '_ {
        self.trips.iter().map(|t| t.birth_year.map(|y| y as i32))
    }
}

/// Loads the city CSV at `path`, derives month/weekday/hour from each trip's
/// start timestamp, and keeps only the rows matching the requested filters.
///
/// Zero surviving rows is not an error; an unreadable or malformed file is.
pub fn load(path: &Path, month: &MonthFilter, day: &DayFilter) -> Result<RecordSet> {
    let file = File::open(path)
        .with_context(|| format!("failed to open trip data {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let headers = rdr
        .headers()
        .with_context(|| format!("failed to read header row of {}", path.display()))?;
    let has_gender = headers.iter().any(|h| h == "Gender");
    let has_birth_year = headers.iter().any(|h| h == "Birth Year");

    let mut trips = Vec::new();
    for result in rdr.deserialize() {
        let mut trip: Trip =
            result.with_context(|| format!("malformed trip row in {}", path.display()))?;
        trip.derive_columns();
        if month.keeps(&trip) && day.keeps(&trip) {
            trips.push(trip);
        }
    }

    debug!(
        rows = trips.len(),
        has_gender, has_birth_year, "Trip data loaded"
    );

    Ok(RecordSet {
        trips,
        has_gender,
        has_birth_year,
    })
}
