//! Command-line interface for the harvester.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::assemble::RecordAssembler;
use crate::config::{ExtractorConfig, ScrapeConfig};
use crate::error::Result;
use crate::harvester::{assemble_snapshots, scrape_projects_with, HarvestProgress};
use crate::output::{save_json, to_json_string, to_output_records, OutputRecord};
use crate::types::FieldName;

/// RERA Harvester - Collect registered project records from the Odisha RERA portal.
#[derive(Parser)]
#[command(name = "rera-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log progress (info level) unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape projects from the live portal through WebDriver.
    Scrape {
        /// Project list URL (default: RERA_LIST_URL or the registered projects list)
        #[arg(long)]
        url: Option<String>,

        /// Number of projects from the top of the list
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// WebDriver server URL (default: WEBDRIVER_URL or http://localhost:9515)
        #[arg(long)]
        webdriver: Option<String>,

        /// Show the browser window
        #[arg(long)]
        no_headless: bool,

        /// Output file (default: rera_projects_data.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract one record from saved detail page sources.
    Extract {
        /// Page source with the overview tab rendered
        #[arg(long)]
        overview: PathBuf,

        /// Page source with the promoter tab rendered (default: the overview source)
        #[arg(long)]
        promoter: Option<PathBuf>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scrape {
            url,
            count,
            webdriver,
            no_headless,
            output,
        } => {
            let mut config = ScrapeConfig::from_env();
            if let Some(url) = url {
                config = config.with_list_url(url);
            }
            if let Some(count) = count {
                config = config.with_project_count(count);
            }
            if let Some(webdriver) = webdriver {
                config = config.with_webdriver_url(webdriver);
            }
            if no_headless {
                config = config.with_headless(false);
            }
            if let Some(output) = output {
                config = config.with_output_path(output);
            }
            scrape_command(&config).await
        }
        Commands::Extract {
            overview,
            promoter,
            output,
        } => extract_command(&overview, promoter.as_deref(), output.as_deref()),
    }
}

/// Execute the scrape command.
/// Invalid settings are reported by [`scrape_projects_with`] before any
/// connection is made.
async fn scrape_command(config: &ScrapeConfig) -> Result<()> {
    println!(
        "{} {} projects from {}",
        style("Scraping").bold(),
        style(config.project_count).cyan(),
        style(&config.list_url).green()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Connecting to WebDriver...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = scrape_projects_with(config, |progress| match progress {
        HarvestProgress::Listed { count } => {
            pb.set_message(format!("Found {count} projects"));
        }
        HarvestProgress::Project {
            position,
            total,
            listing,
        } => {
            pb.set_message(format!("[{position}/{total}] {}", listing.name));
        }
    })
    .await;

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    if report.records.is_empty() {
        println!("{}", style("No projects were scraped.").yellow().bold());
        println!("Check the WebDriver server and the portal availability.");
        return Ok(());
    }

    let output = to_output_records(&report.records);
    for record in &output {
        print_record(record);
    }

    let path = save_json(&output, &config.output_path)?;

    println!();
    println!(
        "  Scraped: {}  Skipped: {}",
        style(report.records.len()).green(),
        if report.skipped > 0 {
            style(report.skipped).yellow().bold()
        } else {
            style(report.skipped).dim()
        }
    );
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        path.display()
    );

    Ok(())
}

/// Execute the extract command.
fn extract_command(overview: &Path, promoter: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let overview_html = fs::read_to_string(overview)?;
    let promoter_html = match promoter {
        Some(path) => fs::read_to_string(path)?,
        None => overview_html.clone(),
    };

    let assembler = RecordAssembler::new(ExtractorConfig::default())?;
    let records: Vec<_> = assemble_snapshots(&assembler, &overview_html, Some(&promoter_html))
        .into_iter()
        .collect();
    let output_records = to_output_records(&records);

    match output {
        Some(path) => {
            let path = save_json(&output_records, path)?;
            eprintln!(
                "{} {}",
                style("Saved to:").green().bold(),
                path.display()
            );
        }
        None => println!("{}", to_json_string(&output_records)?),
    }

    Ok(())
}

fn print_record(record: &OutputRecord) {
    println!(
        "{}",
        style(format!("--- Project {} ---", record.serial_no)).bold()
    );
    let fields = [
        (FieldName::RegistrationNumber, &record.registration_number),
        (FieldName::ProjectName, &record.project_name),
        (FieldName::PromoterName, &record.promoter_name),
        (FieldName::PromoterAddress, &record.promoter_address),
        (FieldName::GstNumber, &record.gst_number),
    ];
    for (field, value) in fields {
        let value = if value.is_found() {
            style(value.to_string()).green()
        } else {
            style(value.to_string()).yellow()
        };
        println!("  {}: {}", field.key(), value);
    }
}
