use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, global = true, ignore_case = true, default_value = "INFO")]
    pub trace: TraceLevel,

    /// IANA timezone in which "today" is resolved; unknown names fall back to local time.
    #[arg(long, global = true, default_value = pulse_warehouse::schema::common::DEFAULT_ZONE)]
    pub zone: String,

    /// Quote history endpoint.
    #[arg(long, global = true, default_value = pulse_warehouse::schema::index::feed::SOHU_HISHQ_URL)]
    pub endpoint: String,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the raw quote history payload for the trailing 180 days.
    Raw,

    /// Compute five-day volume & turnover rates from a saved payload ("-" reads stdin).
    Rates { path: String },

    /// Fetch the quote history and compute its five-day rates.
    Analysis,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}
