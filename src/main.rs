use std::{io, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ft::{
    dataset::DatasetFile, flightinfo, metar, Airline, Airport, CodeKind, Config, Error, Flight,
};

#[derive(Parser, Debug)]
#[command(
    name = "ft",
    version,
    about = "Command-line flight tracker",
    arg_required_else_help = true
)]
struct Cli {
    /// Override the dataset cache directory (defaults to ~/.ft).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print records as pretty JSON instead of formatted text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Display airport information
    #[command(visible_alias = "a")]
    Airportinfo { code: String },
    /// Track a flight
    #[command(visible_alias = "t")]
    Track { ident: String },
    /// Airline information
    #[command(visible_alias = "l")]
    Airlineinfo { code: String },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let palette = Palette::detect();
            eprintln!("{}{err}{}", palette.error, palette.reset);
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Validation and configuration problems exit with 2, everything else
/// (not found, I/O, network, decode) with 1.
fn exit_status(err: &Error) -> u8 {
    match err {
        Error::InvalidAirportCode(_) | Error::MissingCredentials | Error::NoHomeDir => 2,
        _ => 1,
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    match &cli.command {
        Command::Airportinfo { code } => airport_info(cli, code),
        Command::Track { ident } => track(cli, ident),
        Command::Airlineinfo { code } => airline_info(cli, code),
    }
}

#[derive(Serialize)]
struct AirportReport<'a> {
    #[serde(flatten)]
    airport: &'a Airport,
    metar: &'a str,
}

fn airport_info(cli: &Cli, code: &str) -> Result<(), Error> {
    // Shape check happens before configuration is even loaded.
    CodeKind::classify(code)?;
    let code = code.to_uppercase();

    let config = Config::from_env(cli.data_dir.clone())?;
    let datasets = config.datasets();
    datasets.ensure(DatasetFile::Airports);

    let path = datasets.path(DatasetFile::Airports);
    let airport =
        Airport::find(&path, &code)?.ok_or_else(|| Error::AirportNotFound(code.clone()))?;
    let observation = metar::get(&airport.icao, None)?;

    if cli.json {
        let report = AirportReport {
            airport: &airport,
            metar: &observation,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            render_airport(&airport, &observation, &Palette::detect())
        );
    }
    Ok(())
}

fn track(cli: &Cli, ident: &str) -> Result<(), Error> {
    let config = Config::from_env(cli.data_dir.clone())?;
    // Fail on missing credentials before any network traffic, the
    // provisioning downloads included.
    let credentials = config.credentials()?;
    let ident = ident.to_uppercase();

    config.datasets().ensure(DatasetFile::Routes);

    let flights = flightinfo::get(&ident, &credentials, None)?;
    if flights.is_empty() {
        return Err(Error::NoFlightData(ident));
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&flights)?);
    } else {
        let palette = Palette::detect();
        for flight in &flights {
            print!("{}", render_flight(flight, &palette));
        }
    }
    Ok(())
}

fn airline_info(cli: &Cli, code: &str) -> Result<(), Error> {
    let code = code.to_uppercase();
    let config = Config::from_env(cli.data_dir.clone())?;
    let datasets = config.datasets();
    datasets.ensure(DatasetFile::Airlines);

    let path = datasets.path(DatasetFile::Airlines);
    let airline =
        Airline::find(&path, &code)?.ok_or_else(|| Error::AirlineNotFound(code.clone()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&airline)?);
    } else {
        print!("{}", render_airline(&airline, &Palette::detect()));
    }
    Ok(())
}

/// ANSI styling for the labeled output lines, silenced by `NO_COLOR` or
/// `TERM=dumb`.
struct Palette {
    label: &'static str,
    value: &'static str,
    error: &'static str,
    reset: &'static str,
}

const COLOR: Palette = Palette {
    label: "\x1b[34m",
    value: "\x1b[32m",
    error: "\x1b[31m",
    reset: "\x1b[0m",
};

const PLAIN: Palette = Palette {
    label: "",
    value: "",
    error: "",
    reset: "",
};

impl Palette {
    fn detect() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM")
                .map(|term| !term.eq_ignore_ascii_case("dumb"))
                .unwrap_or(true);
        if enabled {
            COLOR
        } else {
            PLAIN
        }
    }
}

fn render_airport(airport: &Airport, observation: &str, p: &Palette) -> String {
    format!(
        "{l}Airport Name: {v}{name}{r}\n\
         {l}Location    : {v}{city}, {country}{r}\n\
         {l}Altitude    : {v}{altitude}ft{r}\n\
         {l}ICAO        : {v}{icao}{r}{l} IATA: {v}{iata}{r}\n\
         {l}METAR       : {v}{observation}{r}\n",
        l = p.label,
        v = p.value,
        r = p.reset,
        name = airport.name,
        city = airport.city,
        country = airport.country,
        altitude = airport.altitude,
        icao = airport.icao,
        iata = airport.iata,
    )
}

fn render_flight(flight: &Flight, p: &Palette) -> String {
    let arrival = flight
        .estimated_arrival()
        .map(|time| time.format("%Y-%m-%d %H:%M:%S %z").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "{l}Origin City      : {v}{origin}{r}\n\
         {l}Destination City : {v}{destination}{r}\n\
         {l}Aircraft Type    : {v}{aircraft}{r}\n\
         {l}Filed Arrival    : {v}{filed_ete}{r}\n\
         {l}Scheduled Arrival: {v}{arrival}{r}\n\
         {l}Route            : {v}{route}{r}\n",
        l = p.label,
        v = p.value,
        r = p.reset,
        origin = flight.origin_city,
        destination = flight.destination_city,
        aircraft = flight.aircraft_type,
        filed_ete = flight.filed_ete,
        route = flight.route,
    )
}

fn render_airline(airline: &Airline, p: &Palette) -> String {
    let status = if airline.active { "Active" } else { "Inactive" };
    format!(
        "{l}Airline Name     : {v}{name}{r}\n\
         {l}ICAO             : {v}{icao}{r}{l} IATA: {v}{iata}{r}\n\
         {l}Airline Callsign : {v}{callsign}{r}\n\
         {l}Airline Country  : {v}{country}{r}\n\
         {l}Airline Status   : {v}{status}{r}\n",
        l = p.label,
        v = p.value,
        r = p.reset,
        name = airline.name,
        icao = airline.icao,
        iata = airline.iata,
        callsign = airline.callsign,
        country = airline.country,
    )
}
