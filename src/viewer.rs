//! Paginated raw-trip display.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::input::Prompter;
use crate::loader::{RecordSet, Trip};

const PAGE_SIZE: usize = 5;

fn format_row(trip: &Trip) -> String {
    format!(
        "{} | {} -> {} | {} s | {}",
        trip.start_time, trip.start_station, trip.end_station, trip.trip_duration, trip.user_type
    )
}

/// Shows the filtered trips five rows at a time, in source order, until the
/// user declines or the rows run out.
pub fn display_raw_data<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    set: &RecordSet,
) -> Result<()> {
    let mut answer =
        prompter.ask_valid("\nWould you like to see the raw trip data? Enter y/n", &["y", "n"])?;
    let mut cursor = 0usize;

    while answer == "y" {
        for trip in set.trips.iter().skip(cursor).take(PAGE_SIZE) {
            prompter.say(&format_row(trip))?;
        }
        cursor += PAGE_SIZE;

        if cursor >= set.len() {
            prompter.say("\nThere is nothing more to display")?;
            break;
        }

        answer = prompter.ask_valid("Would you like to see five more? Enter y/n", &["y", "n"])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{DayFilter, MonthFilter, load};
    use std::env;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn fixture_set(name: &str, rows: usize) -> (PathBuf, RecordSet) {
        let mut contents = String::from(
            ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n",
        );
        for i in 0..rows {
            contents.push_str(&format!(
                "{i},2017-01-01 00:{:02}:00,2017-01-01 01:00:00,600,Stop {i},Stop {},Subscriber\n",
                i % 60,
                i + 1,
            ));
        }
        let path = env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        let set = load(&path, &MonthFilter::All, &DayFilter::All).unwrap();
        (path, set)
    }

    fn run_viewer(script: &str, set: &RecordSet) -> String {
        let mut prompter = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        display_raw_data(&mut prompter, set).unwrap();
        String::from_utf8(prompter.into_output()).unwrap()
    }

    #[test]
    fn test_declining_shows_nothing() {
        let (path, set) = fixture_set("bikeshare_viewer_decline.csv", 7);
        let output = run_viewer("n\n", &set);

        assert!(!output.contains("Stop 0"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_first_page_shows_five_rows() {
        let (path, set) = fixture_set("bikeshare_viewer_page.csv", 7);
        let output = run_viewer("y\nn\n", &set);

        assert!(output.contains("Stop 0"));
        assert!(output.contains("Stop 4"));
        assert!(!output.contains("| Stop 5 ->"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_viewer_stops_when_rows_run_out() {
        let (path, set) = fixture_set("bikeshare_viewer_exhaust.csv", 7);
        // Second page only holds 2 rows, so the viewer ends without re-asking
        let output = run_viewer("y\ny\n", &set);

        assert!(output.contains("| Stop 5 ->"));
        assert!(output.contains("| Stop 6 ->"));
        assert!(output.contains("There is nothing more to display"));

        fs::remove_file(&path).unwrap();
    }
}
