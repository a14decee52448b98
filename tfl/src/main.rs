use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use tfl::departures::{
    DepartureResolver, DeparturesConfig, ResolutionRequest, ResolveError, TransitApi,
};
use tfl::display::{
    self, CheckResult, DeparturesOutput, DisruptionsOutput, StationsOutput, StatusOutput,
};
use tfl::domain::{
    Arrival, Direction, Disruption, LineStatus, Station, StopDetails, TimeError,
    TimetableDocument, parse_time_today,
};
use tfl::logger::init_logger;
use tfl::tfl::{DEFAULT_BASE_URL, MockTflClient, TflClient, TflConfig, TflError};

/// Transport for London departure boards.
#[derive(Parser)]
#[command(name = "tfl", version, about)]
struct Cli {
    /// TfL API key
    #[arg(long, env = "TFL_APP_KEY", global = true, hide_env_values = true)]
    key: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Serve captured API responses from this directory instead of the API
    #[arg(long, env = "TFL_MOCK_DIR", global = true)]
    mock_dir: Option<PathBuf>,

    /// API base URL
    #[arg(long, env = "TFL_BASE_URL", default_value = DEFAULT_BASE_URL, hide = true)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show departures from a station
    Departures {
        /// Station name, matched case-insensitively
        station: String,

        /// Only show this line (id or name)
        line: Option<String>,

        /// Maximum number of departures (0 for all)
        #[arg(short = 'n', long, default_value_t = 0)]
        limit: usize,

        /// Filter by line, destination or platform words
        #[arg(short, long = "match")]
        match_filter: Option<String>,

        /// Show departures at or after this time today (HH:MM)
        #[arg(short, long)]
        time: Option<String>,
    },

    /// Search for stations
    Search {
        /// Station name
        station: String,
    },

    /// Show line status
    Status,

    /// Show service disruptions
    #[command(visible_alias = "delays")]
    Disruptions,

    /// Check that the API key is configured and valid
    Check,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Tfl(#[from] TflError),

    #[error("error parsing time: {0}")]
    Time(#[from] TimeError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// The API or captured data standing in for it.
enum Backend {
    Live(TflClient),
    Mock(MockTflClient),
}

impl Backend {
    fn from_cli(cli: &Cli) -> Result<Self, TflError> {
        if let Some(dir) = &cli.mock_dir {
            debug!(dir = %dir.display(), "using mock data");
            return MockTflClient::new(dir).map(Backend::Mock);
        }

        let config = TflConfig::new(cli.key.clone()).with_base_url(cli.base_url.clone());
        TflClient::new(config).map(Backend::Live)
    }

    fn has_key(&self) -> bool {
        match self {
            Backend::Live(c) => c.has_key(),
            Backend::Mock(c) => c.has_key(),
        }
    }

    async fn validate_key(&self) -> Result<(), TflError> {
        match self {
            Backend::Live(c) => c.validate_key().await,
            Backend::Mock(c) => c.validate_key().await,
        }
    }

    async fn line_statuses(&self) -> Result<Vec<LineStatus>, TflError> {
        match self {
            Backend::Live(c) => c.line_statuses().await,
            Backend::Mock(c) => c.line_statuses().await,
        }
    }

    async fn disruptions(&self) -> Result<Vec<Disruption>, TflError> {
        match self {
            Backend::Live(c) => c.disruptions().await,
            Backend::Mock(c) => c.disruptions().await,
        }
    }
}

impl TransitApi for Backend {
    async fn search_stations(&self, query: &str) -> Result<Vec<Station>, TflError> {
        match self {
            Backend::Live(c) => c.search_stations(query).await,
            Backend::Mock(c) => c.search_stations(query).await,
        }
    }

    async fn live_arrivals(
        &self,
        stop_id: &str,
        line_id: Option<&str>,
    ) -> Result<Vec<Arrival>, TflError> {
        match self {
            Backend::Live(c) => c.live_arrivals(stop_id, line_id).await,
            Backend::Mock(c) => c.live_arrivals(stop_id, line_id).await,
        }
    }

    async fn stop_details(&self, stop_id: &str) -> Result<StopDetails, TflError> {
        match self {
            Backend::Live(c) => c.stop_details(stop_id).await,
            Backend::Mock(c) => c.stop_details(stop_id).await,
        }
    }

    async fn timetable(
        &self,
        line_id: &str,
        stop_id: &str,
        direction: Direction,
    ) -> Result<Option<TimetableDocument>, TflError> {
        match self {
            Backend::Live(c) => c.timetable(line_id, stop_id, direction).await,
            Backend::Mock(c) => c.timetable(line_id, stop_id, direction).await,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logger();
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let backend = Backend::from_cli(cli)?;
    let mut out = io::stdout().lock();

    match &cli.command {
        Command::Departures {
            station,
            line,
            limit,
            match_filter,
            time,
        } => {
            let now = Local::now();

            let mut request = ResolutionRequest::new(station.as_str()).with_limit(*limit);
            if let Some(line) = line {
                request = request.with_line(line.as_str());
            }
            if let Some(filter) = match_filter {
                request = request.with_match(filter.as_str());
            }
            if let Some(time) = time {
                request = request.with_target_time(parse_time_today(time, now)?);
            }

            let config = DeparturesConfig::default();
            let board = DepartureResolver::new(&backend, &config)
                .resolve(&request, now)
                .await?;

            match cli.format {
                Format::Json => {
                    if let Some(advisory) = board.advisory {
                        eprintln!("Note: {advisory}");
                    }
                    display::write_json(
                        &mut out,
                        &DeparturesOutput::new(&board.station.name, &board.arrivals),
                    )?;
                }
                Format::Text => {
                    if let Some(advisory) = board.advisory {
                        display::text::print_note(&mut out, advisory.message())?;
                    }
                    display::text::print_arrivals(&mut out, &board.arrivals, &board.station.name)?;
                }
            }
        }

        Command::Search { station } => {
            let stations = backend.search_stations(station).await?;
            match cli.format {
                Format::Json => display::write_json(&mut out, &StationsOutput::new(&stations))?,
                Format::Text => display::text::print_stations(&mut out, &stations)?,
            }
        }

        Command::Status => {
            let statuses = backend.line_statuses().await?;
            match cli.format {
                Format::Json => display::write_json(&mut out, &StatusOutput::new(&statuses))?,
                Format::Text => display::text::print_line_statuses(&mut out, &statuses)?,
            }
        }

        Command::Disruptions => {
            let disruptions = backend.disruptions().await?;
            match cli.format {
                Format::Json => {
                    display::write_json(&mut out, &DisruptionsOutput::new(&disruptions))?
                }
                Format::Text => display::text::print_disruptions(&mut out, &disruptions)?,
            }
        }

        Command::Check => return check(&backend, cli.format, &mut out).await,
    }

    Ok(ExitCode::SUCCESS)
}

async fn check(
    backend: &Backend,
    format: Format,
    out: &mut impl Write,
) -> Result<ExitCode, CliError> {
    if !backend.has_key() {
        match format {
            Format::Json => display::write_json(out, &CheckResult::missing_key())?,
            Format::Text => {
                eprintln!("No API key configured.");
                eprintln!("Set TFL_APP_KEY environment variable or use --key flag.");
            }
        }
        return Ok(ExitCode::FAILURE);
    }

    if format == Format::Text {
        write!(out, "Validating API key... ")?;
        out.flush()?;
    }

    match backend.validate_key().await {
        Ok(()) => {
            match format {
                Format::Json => display::write_json(out, &CheckResult::valid())?,
                Format::Text => writeln!(out, "valid")?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            match format {
                Format::Json => display::write_json(out, &CheckResult::failed(&e))?,
                Format::Text => {
                    eprintln!("failed");
                    eprintln!("Error: {e}");
                }
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn departures_arguments() {
        let cli = Cli::try_parse_from([
            "tfl",
            "departures",
            "Liverpool Street",
            "elizabeth",
            "-n",
            "5",
            "-m",
            "heathrow",
            "-t",
            "14:30",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, Format::Json);
        match cli.command {
            Command::Departures {
                station,
                line,
                limit,
                match_filter,
                time,
            } => {
                assert_eq!(station, "Liverpool Street");
                assert_eq!(line.as_deref(), Some("elizabeth"));
                assert_eq!(limit, 5);
                assert_eq!(match_filter.as_deref(), Some("heathrow"));
                assert_eq!(time.as_deref(), Some("14:30"));
            }
            _ => panic!("expected departures"),
        }
    }

    #[test]
    fn delays_is_an_alias() {
        let cli = Cli::try_parse_from(["tfl", "delays"]).unwrap();
        assert!(matches!(cli.command, Command::Disruptions));
    }
}
