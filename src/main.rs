//! EventManager - thank-you letters for event attendees
//!
//! Reads an attendee roster, cleans contact fields, looks up each
//! attendee's legislators through the Google Civic Information API,
//! writes one letter per attendee and reports the peak registration
//! hours and days.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Fatal startup or I/O error (missing roster, template, API key, ...)

mod analysis;
mod civic;
mod cli;
mod cleaning;
mod config;
mod letter;
mod models;
mod pipeline;
mod roster;

use anyhow::{Context, Result};
use civic::{CivicClient, ClientConfig, OfflineLookup, RepresentativeLookup};
use cli::Args;
use config::{Config, CONFIG_FILE};
use letter::{LetterTemplate, LetterWriter};
use pipeline::{print_rankings, Pipeline, RunSummary};
use roster::Roster;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("EventManager v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .event_manager.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load collaborators, then run the pass and print the rankings.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Every collaborator is loaded before the first record is read.
    let mut roster = Roster::open(&config.input.roster)?;
    let template = LetterTemplate::load(&config.input.template)
        .with_context(|| format!("Invalid template {}", config.input.template.display()))?;
    let writer = LetterWriter::new(&config.output.directory);

    let summary = if args.offline {
        info!("Offline mode: skipping representative lookups");
        process_roster(&OfflineLookup, &mut roster, &template, &writer).await?
    } else {
        let api_key = civic::load_api_key(&config.civic.key_file)?;
        let client = CivicClient::new(ClientConfig {
            base_url: config.civic.base_url.clone(),
            api_key,
            timeout_seconds: config.civic.timeout_seconds,
            levels: config.civic.levels.clone(),
            roles: config.civic.roles.clone(),
        })?;
        process_roster(&client, &mut roster, &template, &writer).await?
    };

    let mut stdout = std::io::stdout();
    print_rankings(&summary, &mut stdout)?;

    info!(
        "Processed {} attendees ({} letters in {}, {} registration times, {} lookup fallbacks, {} unparsed dates, {} skipped rows) in {:.1}s",
        summary.records,
        summary.letters_written,
        writer.output_dir().display(),
        summary.registrations.len(),
        summary.lookup_fallbacks,
        summary.unparsed_dates,
        summary.skipped_rows,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

async fn process_roster<L: RepresentativeLookup>(
    lookup: &L,
    roster: &mut Roster<std::fs::File>,
    template: &LetterTemplate,
    writer: &LetterWriter,
) -> Result<RunSummary> {
    println!("EventManager initialized.");

    let pipeline = Pipeline::new(lookup, template, writer);
    let mut stdout = std::io::stdout();
    pipeline.run(roster, &mut stdout).await
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
