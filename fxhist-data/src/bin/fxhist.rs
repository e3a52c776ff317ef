use anyhow::Context;
use clap::Parser;
use fxhist_data::{
    exchange::oanda::{OANDA_PRACTICE_BASE_URL, rest::OandaRestClient},
    job::{DownloadJob, JobConfig},
};
use fxhist_instrument::{Granularity, InstrumentName};
use std::{path::PathBuf, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Download the candles of one Oanda instrument with no time limit, by chaining multiple
/// bounded requests, and save them to a CSV file.
#[derive(Debug, Parser)]
#[command(name = "fxhist", version, about)]
struct Cli {
    /// Access token for the Oanda fxTrade Practice API.
    #[arg(long, env = "OANDA_TOKEN", default_value = "ADD YOUR TOKEN HERE", hide_env_values = true)]
    oanda_token: String,

    /// Request candles for this instrument, eg/ EUR_USD.
    #[arg(long, default_value = "EUR_USD")]
    instrument: String,

    /// Candle granularity code (S5, S10, S15, S30, M1..M30, H1..H12, D, W).
    #[arg(long, default_value = "H1", value_parser = parse_granularity)]
    granularity: Granularity,

    /// First calendar year to download.
    #[arg(long, default_value_t = 2014)]
    begin: i32,

    /// Year to stop at (exclusive).
    #[arg(long, default_value_t = 2015)]
    end: i32,

    /// Where to save the CSV, defaults to ./<instrument>_<granularity>.csv
    #[arg(long)]
    path: Option<PathBuf>,

    /// Oanda REST API base URL.
    #[arg(long, env = "OANDA_BASE_URL", default_value = OANDA_PRACTICE_BASE_URL)]
    base_url: String,

    /// Pause between two consecutive requests, in milliseconds.
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Clamp the last request to the end of the job and drop candles past it.
    #[arg(long)]
    trim_to_end: bool,
}

fn parse_granularity(code: &str) -> Result<Granularity, String> {
    code.parse::<Granularity>().map_err(|error| {
        let choices: Vec<_> = Granularity::ALL.iter().map(Granularity::as_str).collect();
        format!("{error} (possible values: {})", choices.join(", "))
    })
}

impl Cli {
    fn job_config(&self) -> anyhow::Result<JobConfig> {
        let config = JobConfig::from_years(
            InstrumentName::from(self.instrument.as_str()),
            self.granularity,
            self.begin,
            self.end,
        )?
        .with_delay(Duration::from_millis(self.delay_ms))
        .with_trim_to_end(self.trim_to_end);

        Ok(match &self.path {
            Some(path) => config.with_path(path),
            None => config,
        })
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.job_config()?;
    let client = OandaRestClient::with_base_url(cli.base_url.as_str(), cli.oanda_token.as_str())
        .context("failed to build Oanda REST client")?;

    let job = DownloadJob::new(config);
    let report = job
        .run_to_csv(&client)
        .await
        .context("candle download failed")?;

    info!(?report, "job finished");
    println!("Saved to {}", job.config.path.display());

    Ok(())
}
