use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Config, SheetOptions, DEFAULT_TARGET};
use crate::interaction::loader::ScrollPolicy;

#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(
    version,
    about = "Harvest reviews from a lazily rendered menu page and relay them to WordPress",
    long_about = r#"
Gleaner - Review Harvester

Drives a headless Chrome through a client-rendered restaurant page, opens the
"info and reviews" panel, scrolls the review list until it has loaded, extracts
every review and pushes each one to WordPress as a draft post.

Credentials are read from the environment:
  WP_URL        WordPress base URL (e.g. https://blog.example.com)
  WP_USER       WordPress username
  WP_APP_PASS   WordPress application password
  SHEETS_TOKEN  OAuth bearer token (only with --sheet-id)
"#
)]
pub struct Args {
    /// Page to harvest reviews from
    #[arg(value_name = "URL", default_value = DEFAULT_TARGET)]
    pub url: String,

    /// Output directory for reviews.json and failure diagnostics
    #[arg(short, long, default_value = "gleaner-output", value_name = "DIR")]
    pub output: PathBuf,

    /// Timeout for page navigation in seconds
    #[arg(short, long, default_value = "60", value_name = "SECS")]
    pub timeout: u64,

    /// How long to wait for review items to appear, in seconds
    #[arg(long, default_value = "60", value_name = "SECS")]
    pub ready_timeout: u64,

    /// Interval between readiness checks, in milliseconds
    #[arg(long, default_value = "500", value_name = "MS")]
    pub poll_interval: u64,

    /// Number of scroll steps inside the review list
    #[arg(long, default_value = "25", value_name = "NUM")]
    pub scroll_iterations: u32,

    /// Pixels scrolled per step
    #[arg(long, default_value = "1200", value_name = "PX")]
    pub scroll_step: u32,

    /// Pause after each scroll step, in milliseconds
    #[arg(long, default_value = "350", value_name = "MS")]
    pub scroll_delay: u64,

    /// Path to a Chrome/Chromium binary
    #[arg(long, value_name = "PATH")]
    pub chrome_bin: Option<PathBuf>,

    /// Google Sheets spreadsheet id; enables the spreadsheet sink
    #[arg(long, value_name = "ID")]
    pub sheet_id: Option<String>,

    /// A1 range rows are appended to
    #[arg(long, default_value = "Sheet1!A:D", value_name = "RANGE")]
    pub sheet_range: String,

    /// Extract and save locally without pushing anywhere
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn into_config(self) -> Config {
        Config {
            url: self.url,
            output: self.output,
            timeout: self.timeout.max(1),
            ready_timeout: Duration::from_secs(self.ready_timeout.max(1)),
            poll_interval: Duration::from_millis(self.poll_interval.max(50)),
            scroll: ScrollPolicy {
                iterations: self.scroll_iterations,
                step_px: self.scroll_step,
                delay: Duration::from_millis(self.scroll_delay),
            },
            verbose: self.verbose,
            chrome_bin: self.chrome_bin,
            dry_run: self.dry_run,
            sheet: self.sheet_id.map(|spreadsheet_id| SheetOptions {
                spreadsheet_id,
                range: self.sheet_range,
            }),
        }
    }
}

pub fn parse() -> Config {
    Args::parse().into_config()
}
