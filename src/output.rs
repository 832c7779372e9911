//! Console report blocks for a filtered record set.
//!
//! Each block writes its statistics to the supplied stream, followed by an
//! elapsed-time line and a separator, mirroring the interactive tool's layout.

use anyhow::Result;
use std::io::Write;
use std::time::Instant;
use tracing::debug;

use crate::loader::RecordSet;
use crate::stats::{self, StatsError};

/// Full calendar month names, indexed by month number. The filter vocabulary
/// only covers January through June, but any derived month renders correctly.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const SEPARATOR: &str = "----------------------------------------";

pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[month as usize - 1],
        _ => "Unknown",
    }
}

fn finish_block<W: Write>(out: &mut W, started: Instant) -> Result<()> {
    writeln!(out, "\nThis took {:.4} seconds.", started.elapsed().as_secs_f64())?;
    writeln!(out, "{SEPARATOR}")?;
    Ok(())
}

/// Prints the most frequent travel times: month, weekday, and start hour.
pub fn time_stats<W: Write>(out: &mut W, set: &RecordSet) -> Result<()> {
    writeln!(out, "\nCalculating the most frequent times of travel...\n")?;
    let started = Instant::now();

    let month = stats::mode_stat(set.months())?;
    writeln!(
        out,
        "Most common month: {}; Count: {}; Percentage: {}%",
        month_name(month.value),
        month.count,
        month.percent
    )?;

    let day = stats::mode_stat(set.weekdays())?;
    writeln!(
        out,
        "Most common day: {}; Count: {}; Percentage: {}%",
        day.value, day.count, day.percent
    )?;

    let hour = stats::mode_stat(set.hours())?;
    writeln!(
        out,
        "Most common start hour: {}:00; Count: {}; Percentage: {}%",
        hour.value, hour.count, hour.percent
    )?;

    finish_block(out, started)
}

/// Prints the most popular start station, end station, and start→end trip.
pub fn station_stats<W: Write>(out: &mut W, set: &RecordSet) -> Result<()> {
    writeln!(out, "\nCalculating the most popular stations and trip...\n")?;
    let started = Instant::now();

    let start = stats::mode_stat(set.start_stations())?;
    writeln!(
        out,
        "Most common start station: {}; Count: {}; Percentage: {}%",
        start.value, start.count, start.percent
    )?;

    let end = stats::mode_stat(set.end_stations())?;
    writeln!(
        out,
        "Most common end station: {}; Count: {}; Percentage: {}%",
        end.value, end.count, end.percent
    )?;

    let trip = stats::mode_stat(set.trip_labels())?;
    writeln!(
        out,
        "Most common trip: {}; Count: {}; Percentage: {}%",
        trip.value, trip.count, trip.percent
    )?;

    finish_block(out, started)
}

/// Prints total and average trip duration in seconds.
pub fn trip_duration_stats<W: Write>(out: &mut W, set: &RecordSet) -> Result<()> {
    writeln!(out, "\nCalculating trip duration...\n")?;
    let started = Instant::now();

    writeln!(
        out,
        "Total travel time: {} seconds",
        stats::total_duration(set.durations())
    )?;
    writeln!(
        out,
        "Average travel time: {} seconds",
        stats::mean_duration(set.durations())?
    )?;

    finish_block(out, started)
}

/// Prints user-type, gender, and birth-year breakdowns. Gender and birth year
/// are skipped with a notice for cities whose source files lack those columns.
pub fn user_stats<W: Write>(out: &mut W, set: &RecordSet) -> Result<()> {
    writeln!(out, "\nCalculating user stats...\n")?;
    let started = Instant::now();

    writeln!(out, "User types:")?;
    for (value, count, percent) in stats::distribution(set.user_types()) {
        writeln!(out, "  {value}: {count} ({percent}%)")?;
    }

    if set.has_gender {
        writeln!(out, "\nGender:")?;
        for (value, count, percent) in stats::distribution(set.genders()) {
            writeln!(out, "  {value}: {count} ({percent}%)")?;
        }
    } else {
        writeln!(out, "\nThis city has no data for gender")?;
    }

    if set.has_birth_year {
        match stats::year_stats(set.birth_years()) {
            Ok(years) => {
                writeln!(out, "\nBirth year:")?;
                writeln!(out, "  Earliest year: {}", years.earliest)?;
                writeln!(out, "  Most recent year: {}", years.most_recent)?;
                writeln!(out, "  Most common year: {}", years.most_common)?;
                writeln!(
                    out,
                    "  Note: {} records are missing a birth year",
                    years.missing
                )?;
            }
            // The column exists but every surviving row is null
            Err(StatsError::EmptySeries) => {
                writeln!(out, "\nEvery matching record is missing a birth year")?;
            }
        }
    } else {
        writeln!(out, "\nThis city has no data for birth year")?;
    }

    finish_block(out, started)
}

/// Prints all four report blocks for a non-empty record set.
pub fn report<W: Write>(out: &mut W, set: &RecordSet) -> Result<()> {
    debug!(rows = set.len(), "Printing report blocks");

    time_stats(out, set)?;
    station_stats(out, set)?;
    trip_duration_stats(out, set)?;
    user_stats(out, set)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{DayFilter, MonthFilter, load};
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn sample_set(name: &str) -> (PathBuf, RecordSet) {
        let path = write_fixture(
            name,
            ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year\n\
             0,2017-01-01 00:07:57,2017-01-01 00:20:53,600,Canal St,Clark St,Subscriber,Male,1992.0\n\
             1,2017-01-01 09:15:00,2017-01-01 09:30:00,900,Canal St,Clark St,Customer,,\n\
             2,2017-02-01 09:02:10,2017-02-01 09:22:10,1500,Clark St,Canal St,Subscriber,Female,1988.0\n",
        );
        let set = load(&path, &MonthFilter::All, &DayFilter::All).unwrap();
        (path, set)
    }

    #[test]
    fn test_month_name_lookup() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "Unknown");
        assert_eq!(month_name(13), "Unknown");
    }

    #[test]
    fn test_time_stats_block() {
        let (path, set) = sample_set("bikeshare_output_time.csv");
        let mut out = Vec::new();

        time_stats(&mut out, &set).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Most common month: January; Count: 2; Percentage: 66.67%"));
        assert!(text.contains("Most common day: Sunday; Count: 2; Percentage: 66.67%"));
        assert!(text.contains("Most common start hour: 9:00; Count: 2; Percentage: 66.67%"));
        assert!(text.contains("This took"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_station_stats_block() {
        let (path, set) = sample_set("bikeshare_output_station.csv");
        let mut out = Vec::new();

        station_stats(&mut out, &set).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Most common start station: Canal St; Count: 2"));
        assert!(text.contains("Most common end station: Clark St; Count: 2"));
        assert!(
            text.contains("Most common trip: From: Canal St, To: Clark St; Count: 2")
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_trip_duration_block() {
        let (path, set) = sample_set("bikeshare_output_duration.csv");
        let mut out = Vec::new();

        trip_duration_stats(&mut out, &set).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total travel time: 3000 seconds"));
        assert!(text.contains("Average travel time: 1000 seconds"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_user_stats_block_with_optional_columns() {
        let (path, set) = sample_set("bikeshare_output_user.csv");
        let mut out = Vec::new();

        user_stats(&mut out, &set).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Subscriber: 2 (66.67%)"));
        assert!(text.contains("Customer: 1 (33.33%)"));
        assert!(text.contains("Missing data: 1 (33.33%)"));
        assert!(text.contains("Earliest year: 1988"));
        assert!(text.contains("Most recent year: 1992"));
        assert!(text.contains("Note: 1 records are missing a birth year"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_user_stats_block_without_optional_columns() {
        let path = write_fixture(
            "bikeshare_output_no_optional.csv",
            ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n\
             0,2017-03-03 12:00:00,2017-03-03 12:30:00,1800,E St,F St,Subscriber\n",
        );
        let set = load(&path, &MonthFilter::All, &DayFilter::All).unwrap();
        let mut out = Vec::new();

        user_stats(&mut out, &set).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("This city has no data for gender"));
        assert!(text.contains("This city has no data for birth year"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_stats_on_empty_set_fail_explicitly() {
        let (path, _) = sample_set("bikeshare_output_empty.csv");
        let empty = load(
            &path,
            &MonthFilter::parse("june").unwrap(),
            &DayFilter::All,
        )
        .unwrap();
        assert!(empty.is_empty());

        let mut out = Vec::new();
        assert!(time_stats(&mut out, &empty).is_err());

        fs::remove_file(&path).unwrap();
    }
}
