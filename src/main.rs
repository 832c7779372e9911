//! CLI entry point for the bikeshare explorer.
//!
//! Provides subcommands for interactively exploring a city's trip records and
//! for listing the configured cities and their data files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use bikeshare_explorer::config::CityConfig;
use bikeshare_explorer::input::Prompter;
use bikeshare_explorer::loader::{self, DAY_NAMES, DayFilter, FILTER_MONTHS, MonthFilter};
use bikeshare_explorer::output;
use bikeshare_explorer::viewer;

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "A tool to explore US bikeshare trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively filter a city's trips and print statistics
    Explore {
        /// Directory containing the city CSV files
        #[arg(short, long, default_value = "data")]
        data_dir: String,

        /// Optional JSON file mapping city names to CSV paths
        #[arg(short, long)]
        config: Option<String>,
    },
    /// List the configured cities and their data files
    Cities {
        /// Directory containing the city CSV files
        #[arg(short, long, default_value = "data")]
        data_dir: String,

        /// Optional JSON file mapping city names to CSV paths
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file. User-facing
    // prompts and reports go to stdout, diagnostics to stderr.
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Explore { data_dir, config } => {
            let cities = load_config(&data_dir, config.as_deref())?;
            let stdin = io::stdin().lock();
            let stdout = io::stdout();
            let mut prompter = Prompter::new(stdin, stdout);
            explore(&mut prompter, &cities)?;
        }
        Commands::Cities { data_dir, config } => {
            let cities = load_config(&data_dir, config.as_deref())?;
            let mut stdout = io::stdout();
            for (city, path) in cities.iter() {
                writeln!(stdout, "{city}: {}", path.display())?;
            }
        }
    }

    Ok(())
}

fn load_config(data_dir: &str, config: Option<&str>) -> Result<CityConfig> {
    match config {
        Some(path) => CityConfig::load(path),
        None => Ok(CityConfig::with_data_dir(data_dir)),
    }
}

/// One full interactive session: repeated explore rounds until the user
/// declines the restart prompt.
fn explore<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, cities: &CityConfig) -> Result<()> {
    prompter.say("Hello there! Let's explore some US bikeshare data!")?;

    loop {
        let (city, month, day) = get_filters(prompter, cities)?;

        let path = cities
            .path_for(&city)
            .with_context(|| format!("no data file configured for {city}"))?;

        info!(city = %city, path = %path.display(), "Loading trip data");
        let set = loader::load(path, &month, &day)?;

        if set.is_empty() {
            warn!(city = %city, "No trips matched the selected filters");
            prompter.say("\nNo trips match those filters. Try a different combination.")?;
        } else {
            info!(rows = set.len(), "Computing statistics");
            output::report(prompter.writer(), &set)?;
            viewer::display_raw_data(prompter, &set)?;
        }

        let again = prompter.ask_valid("\nWould you like to restart? Enter yes or no", &["yes", "no"])?;
        if again != "yes" {
            prompter.say("\nThank you for your time. Come back again soon!")?;
            break;
        }
    }

    Ok(())
}

/// Prompts for the city, month, and weekday filters.
fn get_filters<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    cities: &CityConfig,
) -> Result<(String, MonthFilter, DayFilter)> {
    let city_names: Vec<&str> = cities.cities().collect();
    let city = prompter.ask_valid(
        &format!(
            "\nWhich city would you like to explore? ({})",
            city_names.join(" / ")
        ),
        &city_names,
    )?;

    let mut month_tokens: Vec<&str> = FILTER_MONTHS.to_vec();
    month_tokens.push("all");
    let month_token = prompter.ask_valid(
        "\nAny particular month from January to June? If not, enter 'all'",
        &month_tokens,
    )?;
    let month = MonthFilter::parse(&month_token).context("validated month token failed to parse")?;

    let day_tokens: Vec<String> = DAY_NAMES.iter().map(|d| d.to_lowercase()).collect();
    let mut day_allowed: Vec<&str> = day_tokens.iter().map(String::as_str).collect();
    day_allowed.push("all");
    let day_token = prompter.ask_valid(
        "\nAny particular day of the week? If not, enter 'all'",
        &day_allowed,
    )?;
    let day = DayFilter::parse(&day_token).context("validated day token failed to parse")?;

    Ok((city, month, day))
}
