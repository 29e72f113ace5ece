use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*, TraceLevel};
use dotenv::{dotenv, var};
use pulse_warehouse::{
    api::{Api, Http},
    compute_five_day_rates, series_to_json, FeedConfig, FeedZone, Sohu, StockDataPoint,
};
use tracing::{debug, info, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;

fn preprocess(trace_level: Level) {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber).expect("Set subscriber");
}

fn print_series(series: &[StockDataPoint], pretty: bool) -> Result<()> {
    println!("{}", series_to_json(series, pretty)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::TRACE => Level::TRACE,
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level);
    trace!("Command line input recorded: {cli:#?}");

    let config = FeedConfig {
        endpoint: cli.endpoint.clone(),
        zone: FeedZone::resolve(&cli.zone),
        ..FeedConfig::default()
    };
    debug!("Feed configuration: {config:?}");

    // "> pulse <COMMAND>"
    match &cli.command {
        // "> pulse raw"
        Raw => {
            let http_client = pulse_util::build_client(var("USER_AGENT").ok().as_deref())?;
            info!("Fetching quote history for {}", config.code);
            let payload = Sohu::new(config).fetch(&http_client).await?;
            println!("{payload}");
        }

        // "> pulse rates <PATH>"
        Rates { path } => {
            let payload = pulse_util::read_text(path).await?;
            let series = compute_five_day_rates(&payload)?;
            info!("Computed five-day rates for {} days", series.len());
            print_series(&series, cli.pretty)?;
        }

        // "> pulse analysis"
        Analysis => {
            let http_client = pulse_util::build_client(var("USER_AGENT").ok().as_deref())?;
            info!("Analysing quote history for {}", config.code);
            let series = Sohu::new(config).etl(&http_client).await?;
            info!("Computed five-day rates for {} days", series.len());
            print_series(&series, cli.pretty)?;
        }
    }

    Ok(())
}
