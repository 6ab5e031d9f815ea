use clap::{Parser, Subcommand};
use lastfm_harvester::config::{API_BASE_URL, DEFAULT_USER_AGENT};
use lastfm_harvester::{FileCache, HarvestConfig, Harvester, NoCache, ResponseCache};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lastfm-harvester")]
#[command(about = "Harvest the Last.fm top artists chart into a CSV file", long_about = None)]
struct Cli {
    /// Last.fm API key (can also be set via LASTFM_API_KEY env var)
    #[arg(long, env = "LASTFM_API_KEY", hide_env_values = true)]
    api_key: String,

    /// API endpoint
    #[arg(long, default_value = API_BASE_URL)]
    base_url: String,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Response cache file
    #[arg(long, default_value = ".lastfm-cache.json")]
    cache: PathBuf,

    /// Do not read or write the response cache
    #[arg(long, conflicts_with = "cache")]
    no_cache: bool,

    /// Pause after each live request, in milliseconds
    #[arg(long, default_value_t = 250)]
    delay_ms: u64,

    /// Request timeout, in milliseconds
    #[arg(long, default_value_t = 3500)]
    timeout_ms: u64,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Paginate the chart, tag every artist and write the CSV
    Harvest {
        /// Maximum number of chart pages to fetch
        #[arg(short, long, default_value_t = 5)]
        pages: u32,

        /// Artists per page
        #[arg(short, long, default_value_t = 500)]
        limit: u32,

        /// Output CSV path
        #[arg(short, long, default_value = "artists.csv")]
        output: PathBuf,
    },
    /// Print the chart's pagination attributes
    Summary,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = HarvestConfig {
        base_url: cli.base_url,
        api_key: cli.api_key,
        user_agent: cli.user_agent,
        delay: Duration::from_millis(cli.delay_ms),
        timeout: Duration::from_millis(cli.timeout_ms),
        ..Default::default()
    };

    if let Commands::Harvest {
        pages,
        limit,
        output,
    } = &cli.command
    {
        config.max_pages = *pages;
        config.per_page = *limit;
        config.output = output.clone();
    }

    let cache: Box<dyn ResponseCache> = if cli.no_cache {
        Box::new(NoCache)
    } else {
        Box::new(FileCache::open(&cli.cache)?)
    };

    let mut harvester = Harvester::new(config, cache)?;

    match &cli.command {
        Commands::Harvest { .. } => {
            harvester.set_show_progress(true);
            let report = harvester.run().await?;
            println!(
                "✅ {} artists from {} pages written to {}",
                report.export.rows,
                report.pages,
                harvester.config().output.display()
            );
            if report.enrichment.failed > 0 {
                println!(
                    "   {} of {} tag lookups failed",
                    report.enrichment.failed, report.enrichment.lookups
                );
            }
        }
        Commands::Summary => {
            let attr = harvester.chart_summary().await?;
            harvester.api().cache().flush().await?;
            println!("{}", attr.total_pages);
            println!(
                "   page {} of {}, {} per page, {} artists",
                attr.page, attr.total_pages, attr.per_page, attr.total
            );
        }
    }

    Ok(())
}
