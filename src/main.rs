mod config;
mod error;
mod extract;
mod navigate;
mod output;
mod pacing;
mod pipeline;
mod serpapi;
mod session;
mod types;
mod verify;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;

use config::QueryRequest;

#[derive(Debug, Parser)]
#[command(
    name = "aimode-scraper",
    version,
    about = "Query Google AI Mode (udm=50) and save the answer plus cited sources as JSON"
)]
struct Cli {
    /// The query to search
    query: String,

    /// Show the browser window (useful for debugging)
    #[arg(long)]
    no_headless: bool,

    /// Timeout in ms for each navigation wait
    #[arg(long, default_value_t = 30_000)]
    timeout: u64,

    /// Browser locale
    #[arg(long, default_value = "en-US")]
    locale: String,

    /// Output JSON file
    #[arg(short, long, default_value = "response.json")]
    output: PathBuf,

    /// Save a full-page screenshot (e.g. screenshot.png)
    #[arg(short, long)]
    screenshot: Option<PathBuf>,

    /// Lower bound of the randomized pre-request delay, in ms
    #[arg(long, default_value_t = 2_000)]
    min_delay: u64,

    /// Upper bound of the randomized pre-request delay, in ms
    #[arg(long, default_value_t = 5_000)]
    max_delay: u64,

    /// Disable the pre-request delay entirely
    #[arg(long)]
    no_delay: bool,

    /// Skip the homepage-first flow and navigate straight to the results URL
    #[arg(long)]
    direct: bool,

    /// Pin the first user-agent/viewport/timezone instead of randomizing
    #[arg(long)]
    no_random_fingerprint: bool,

    /// Use the paid SerpAPI upstream instead of a local browser
    #[arg(long)]
    serpapi: bool,

    /// Geo-location parameter for the SerpAPI upstream
    #[arg(long, default_value = "us")]
    gl: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if cli.serpapi {
        let client = serpapi::SerpApiClient::from_env()?;
        println!("Searching via SerpAPI: {}", cli.query);
        let envelope = client.query(&cli.query, &cli.gl).await?;
        std::fs::write(&cli.output, serde_json::to_string_pretty(&envelope)?)?;
        println!("Response saved to: {}", cli.output.display());
        return Ok(());
    }

    let (delay_min_ms, delay_max_ms) = if cli.no_delay {
        (0, 0)
    } else {
        (cli.min_delay, cli.max_delay)
    };

    let mut request = QueryRequest::new(cli.query);
    request.headless = !cli.no_headless;
    request.timeout_ms = cli.timeout;
    request.locale = cli.locale;
    request.screenshot = cli.screenshot;
    request.delay_min_ms = delay_min_ms;
    request.delay_max_ms = delay_max_ms;
    request.homepage_first = !cli.direct;
    request.randomize_fingerprint = !cli.no_random_fingerprint;

    println!("Searching: {}", request.query);
    println!("Please wait...");

    let result = pipeline::run_query(&request).await?;

    output::write_json(&result, &cli.output)?;
    println!("Response saved to: {}", cli.output.display());
    output::print_summary(&result);

    Ok(())
}
