//! Local cache of the OpenFlights reference tables.
//!
//! The three `.dat` files are plain comma-separated tables without a header
//! row. They are downloaded once into the data directory and reused until
//! deleted by hand; there is no refresh or integrity check.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;
use tracing::{info, warn};

const AIRPORTS_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/airports.dat";
const AIRLINES_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/airlines.dat";
const ROUTES_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/routes.dat";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to create file: {0}")]
    FileCreate(#[from] io::Error),
    #[error("failed to fetch: {0}")]
    Fetch(#[from] reqwest::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetFile {
    Airports,
    Airlines,
    Routes,
}

impl DatasetFile {
    const ALL: [Self; 3] = [Self::Airports, Self::Airlines, Self::Routes];

    fn file_name(self) -> &'static str {
        match self {
            Self::Airports => "airports.dat",
            Self::Airlines => "airlines.dat",
            Self::Routes => "routes.dat",
        }
    }

    fn url(self) -> &'static str {
        match self {
            Self::Airports => AIRPORTS_URL,
            Self::Airlines => AIRLINES_URL,
            Self::Routes => ROUTES_URL,
        }
    }
}

/// Layout of the dataset cache directory.
#[derive(Clone, Debug)]
pub struct Datasets {
    dir: PathBuf,
}

impl Datasets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, file: DatasetFile) -> PathBuf {
        self.dir.join(file.file_name())
    }

    /// Make sure the table needed by the current operation is present,
    /// downloading all three tables when it is not.
    ///
    /// A download that fails is logged and skipped; the remaining tables are
    /// still attempted and partial files are left in place. Lookups against
    /// a table that never arrived report the missing file themselves.
    pub fn ensure(&self, file: DatasetFile) {
        if self.path(file).exists() {
            return;
        }
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!("could not create {}: {e}", self.dir.display());
        }
        for file in DatasetFile::ALL {
            if let Err(e) = download(file.url(), &self.path(file)) {
                warn!("error while downloading {}: {e}", file.url());
            }
        }
    }
}

fn download(url: &str, target: &Path) -> Result<(), DownloadError> {
    info!("downloading {url} to {}", target.display());
    let mut output = File::create(target)?;
    reqwest::blocking::get(url)?
        .error_for_status()?
        .copy_to(&mut output)?;
    Ok(())
}

/// Open a table for the sequential scans in the lookup code. Rows may carry
/// any number of fields.
pub(crate) fn open(path: &Path) -> Result<csv::Reader<File>, crate::Error> {
    let file = File::open(path)?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file))
}

/// Best-effort numeric field: anything that does not parse is the type's
/// zero, matching how the upstream tables are consumed elsewhere.
pub(crate) fn lenient<T: FromStr + Default>(value: Option<&str>) -> T {
    value.and_then(|raw| raw.parse().ok()).unwrap_or_default()
}

pub(crate) fn text(record: &csv::StringRecord, index: usize) -> String {
    record.get(index).unwrap_or_default().to_string()
}
