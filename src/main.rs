use analytics::StatisticsReport;
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{LogFormat, init_tracing, load_config};
use core_types::{Property, PropertyId};
use database::{
    InMemoryListingRepository, ListingFilter, ListingRepository, PgListingRepository, connect,
};
use rust_decimal::Decimal;
use statistics::StatisticsService;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shown in place of a metric that has no defined value.
const NOT_AVAILABLE: &str = "not available";

/// The main entry point for the Vitrina listing statistics tool.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    let _log_guard = init_tracing(&config.logging)?;

    let repo = open_repository(cli.snapshot.as_deref()).await?;

    // Execute the appropriate command
    match cli.command {
        Commands::Stats(args) => {
            let service = StatisticsService::new(repo, config.analytics);
            handle_stats(args, &service).await
        }
        Commands::Listings(args) => handle_listings(args, repo.as_ref()).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Market statistics for real-estate listings.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the TOML configuration file. A missing file means defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Read listings from a JSON snapshot instead of the database.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Overrides the configured log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the statistics report of one listing.
    Stats(StatsArgs),
    /// List listings, optionally filtered by type and municipality.
    Listings(ListingsArgs),
}

#[derive(Parser)]
struct StatsArgs {
    /// The listing id.
    id: PropertyId,

    /// Print the full report as JSON instead of the export table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ListingsArgs {
    /// Property type (case-insensitive exact match), e.g. "Apartamento".
    #[arg(long = "type")]
    property_type: Option<String>,

    /// Municipality (case-insensitive exact match), e.g. "Envigado".
    #[arg(long)]
    municipality: Option<String>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn open_repository(snapshot: Option<&Path>) -> anyhow::Result<Arc<dyn ListingRepository>> {
    match snapshot {
        Some(path) => {
            let repo = InMemoryListingRepository::from_json_file(path)
                .await
                .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            Ok(Arc::new(repo))
        }
        None => {
            let pool = connect()
                .await
                .context("Failed to connect to the database")?;
            Ok(Arc::new(PgListingRepository::new(pool)))
        }
    }
}

async fn handle_stats(args: StatsArgs, service: &StatisticsService) -> anyhow::Result<()> {
    let report = service.compute_statistics(&args.id).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", export_table(&report));
    }
    Ok(())
}

async fn handle_listings(args: ListingsArgs, repo: &dyn ListingRepository) -> anyhow::Result<()> {
    let filter = ListingFilter::new(args.property_type.as_deref(), args.municipality.as_deref());
    let listings = repo.find_listings(&filter).await?;
    tracing::info!(?filter, found = listings.len(), "Listing search complete.");

    println!("{}", listings_table(&listings));
    Ok(())
}

/// Renders the five export rows, values at 2 decimal places.
fn export_table(report: &StatisticsReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    for row in report.export_rows() {
        table.add_row(vec![row.label.to_string(), display_value(row.value)]);
    }
    table
}

fn listings_table(listings: &[Property]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Id",
        "Code",
        "Department",
        "Municipality",
        "Neighborhood",
        "Type",
        "Area (m²)",
        "List price",
        "Features",
    ]);
    for p in listings {
        table.add_row(vec![
            p.id.to_string(),
            p.code.clone(),
            p.location.department.clone(),
            p.location.municipality.clone(),
            p.location.neighborhood.clone(),
            p.property_type.clone(),
            p.area.to_string(),
            p.list_price.to_string(),
            p.features.join(", "),
        ]);
    }
    table
}

fn display_value(value: Option<Decimal>) -> String {
    value
        .map(|v| v.round_dp(2).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_render_as_not_available() {
        assert_eq!(display_value(None), NOT_AVAILABLE);
        assert_eq!(display_value(Some(Decimal::new(20005, 1))), "2000.5");
        assert_eq!(display_value(Some(Decimal::new(1, 0) / Decimal::new(3, 0))), "0.33");
    }

    #[test]
    fn cli_parses_stats_command() {
        let id = PropertyId::random();
        let id_text = id.to_string();
        let cli = Cli::try_parse_from(["vitrina", "stats", id_text.as_str(), "--json"]).unwrap();
        match cli.command {
            Commands::Stats(args) => {
                assert_eq!(args.id, id);
                assert!(args.json);
            }
            Commands::Listings(_) => panic!("expected stats"),
        }
        assert!(Cli::try_parse_from(["vitrina", "stats", "  "]).is_err());

        let cli = Cli::try_parse_from(["vitrina", "stats", "65a1f0c2e4b0a1b2c3d4e5f6"]).unwrap();
        match cli.command {
            Commands::Stats(args) => assert_eq!(args.id.as_str(), "65a1f0c2e4b0a1b2c3d4e5f6"),
            Commands::Listings(_) => panic!("expected stats"),
        }
    }
}
