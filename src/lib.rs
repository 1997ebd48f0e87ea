mod airline;
mod airport;
pub mod dataset;
pub mod flightinfo;
pub mod metar;

use serde::Deserialize;
use std::{env, fs::read_to_string, io, path::Path, path::PathBuf};
use thiserror::Error;
use tracing::debug;

pub use airline::Airline;
pub use airport::{Airport, CodeKind};
pub use dataset::Datasets;
pub use flightinfo::{Credentials, Flight};

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not validate airport code: {0}")]
    InvalidAirportCode(String),
    #[error("please set the FLIGHTAWARE_API_USER and FLIGHTAWARE_API_KEY variables")]
    MissingCredentials,
    #[error("HOME is not set, cannot locate the data directory")]
    NoHomeDir,
    #[error("airport unknown: {0}")]
    AirportNotFound(String),
    #[error("airline not found: {0}")]
    AirlineNotFound(String),
    #[error("no flight data for {0}")]
    NoFlightData(String),
    #[error("failed to read file: {0}")]
    FileRead(#[from] io::Error),
    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to deserialize toml file: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Metar(#[from] metar::Error),
    #[error(transparent)]
    FlightInfo(#[from] flightinfo::Error),
}

/// Runtime configuration, resolved once at startup.
///
/// Credentials come from the `FLIGHTAWARE_API_USER`/`FLIGHTAWARE_API_KEY`
/// environment variables, falling back to an optional `config.toml` in the
/// data directory. The data directory defaults to `~/.ft`.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub api_user: String,
    pub api_key: String,
    pub data_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_user: Option<String>,
    api_key: Option<String>,
}

impl ConfigFile {
    fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        debug!("reading credentials from {}", path.display());
        Ok(toml::from_str(&read_to_string(path)?)?)
    }
}

impl Config {
    pub fn from_env(data_dir: Option<PathBuf>) -> Result<Self, Error> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".ft"))
                .ok_or(Error::NoHomeDir)?,
        };
        let file = ConfigFile::load(&data_dir.join("config.toml"))?;
        Ok(Self::resolve(
            data_dir,
            file,
            env::var("FLIGHTAWARE_API_USER").ok(),
            env::var("FLIGHTAWARE_API_KEY").ok(),
        ))
    }

    /// Environment values win over config-file values; empty strings count
    /// as unset.
    fn resolve(
        data_dir: PathBuf,
        file: ConfigFile,
        env_user: Option<String>,
        env_key: Option<String>,
    ) -> Self {
        Self {
            api_user: env_user
                .filter(|user| !user.is_empty())
                .or(file.api_user)
                .unwrap_or_default(),
            api_key: env_key
                .filter(|key| !key.is_empty())
                .or(file.api_key)
                .unwrap_or_default(),
            data_dir,
        }
    }

    pub fn credentials(&self) -> Result<Credentials, Error> {
        if self.api_user.is_empty() || self.api_key.is_empty() {
            return Err(Error::MissingCredentials);
        }
        Ok(Credentials {
            user: self.api_user.clone(),
            key: self.api_key.clone(),
        })
    }

    pub fn datasets(&self) -> Datasets {
        Datasets::new(&self.data_dir)
    }
}
