use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const GEONAMES_BASE: &str = "http://dev.geonames.org";

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not fetch weather observation: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("no weather observation available for {0}")]
    NoObservation(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "weatherObservation")]
    weather_observation: Option<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    observation: String,
}

fn request_url(base: Option<&str>, icao: &str) -> String {
    format!(
        "{}/weatherIcaoJSON?ICAO={icao}",
        base.unwrap_or(GEONAMES_BASE)
    )
}

fn observation(envelope: Envelope, icao: &str) -> Result<String, Error> {
    envelope
        .weather_observation
        .map(|weather| weather.observation)
        .ok_or_else(|| Error::NoObservation(icao.to_string()))
}

/// Fetch the current METAR text for an ICAO station.
pub fn get(icao: &str, base: Option<&str>) -> Result<String, Error> {
    let url = request_url(base, icao);
    debug!("fetching weather observation from {url}");
    let envelope = reqwest::blocking::get(&url)?
        .error_for_status()?
        .json::<Envelope>()?;
    observation(envelope, icao)
}
