mod app;
mod config;
mod predict;
mod report;
mod search;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::app::{InputPaths, RunSettings};
use crate::predict::DEFAULT_TLE_URL;
use crate::report::DEFAULT_PLACEHOLDER;
use crate::search::{SearchOptions, SearchWindow};

#[derive(Parser)]
#[command(name = "aoi-pass")]
#[command(about = "Find satellite passes over areas of interest")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the satellite config, AOI file and element sets
    Validate {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Search the window and write the pass report
    Search {
        #[command(flatten)]
        inputs: InputArgs,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Element set cache file
    #[arg(long, default_value = "input/resource.txt")]
    tleset_file: PathBuf,
    /// AOI list, one `lat, lon, name` per line
    #[arg(long, default_value = "input/AOI.txt")]
    aoi_file: PathBuf,
    /// Satellite selection, display names and orbit offsets
    #[arg(long, default_value = "input/SATELLITE.json")]
    satellite_json: PathBuf,
}

#[derive(Args)]
struct SearchArgs {
    /// Where to download element sets from
    #[arg(long, default_value = DEFAULT_TLE_URL)]
    tleset_url: String,
    /// Maximum age of the element set cache, e.g. `12h`
    #[arg(long, default_value = "12h", value_parser = humantime::parse_duration)]
    tleset_update_interval: Duration,
    /// Maximum off-nadir angle in degrees
    #[arg(long, default_value_t = 45.0)]
    max_offnadir: f64,
    /// First day of the search, YYYY-MM-DD (default: today, UTC)
    #[arg(long)]
    start_date: Option<NaiveDate>,
    /// Number of days to search
    #[arg(long, default_value_t = 7)]
    days: u32,
    /// HTML template containing the placeholder
    #[arg(long, default_value = "input/AOI-Pass-Template.html")]
    template_html: PathBuf,
    #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
    placeholder_string: String,
    #[arg(long, default_value = "output/AOI-Pass.html")]
    output_html: PathBuf,
    /// Also write the passes as JSON
    #[arg(long)]
    output_json: Option<PathBuf>,
}

impl InputArgs {
    fn paths(&self) -> InputPaths {
        InputPaths {
            satellite_config: self.satellite_json.clone(),
            aoi_file: self.aoi_file.clone(),
            tle_file: self.tleset_file.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { inputs } => validate(&inputs),
        Commands::Search { inputs, search } => run(&inputs, search).await,
    }
}

fn validate(inputs: &InputArgs) -> ExitCode {
    match app::load_inputs(&inputs.paths()) {
        Ok(loaded) => {
            println!(
                "Inputs are valid ({} satellites, {} AOIs)",
                loaded.satellites.len(),
                loaded.aois.len()
            );
            for satellite in &loaded.satellites {
                println!("  {}", satellite);
            }
            for aoi in &loaded.aois {
                println!("  {}", aoi);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Validation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(inputs: &InputArgs, search: SearchArgs) -> ExitCode {
    let start_date = search
        .start_date
        .unwrap_or_else(|| Utc::now().date_naive());
    let window = match SearchWindow::from_days(start_date, search.days) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Invalid search window: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let settings = RunSettings {
        inputs: inputs.paths(),
        tle_url: search.tleset_url,
        tle_max_age: search.tleset_update_interval,
        window,
        options: SearchOptions::new(search.max_offnadir),
        template_html: search.template_html,
        placeholder: search.placeholder_string,
        output_html: search.output_html,
        output_json: search.output_json,
    };

    match app::run_search(&settings).await {
        Ok(count) => {
            log::info!("Search finished with {} passes", count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Search failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
