use std::path::Path;

use geo::Point;
use itertools::process_results;
use serde::Serialize;

use crate::dataset::{lenient, open, text};

/// Which identifier scheme an airport code belongs to, decided by length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeKind {
    /// 3-letter IATA designator.
    Iata,
    /// 4-letter ICAO designator.
    Icao,
}

impl CodeKind {
    /// Reject anything that is not 3 or 4 characters before any I/O happens.
    pub fn classify(code: &str) -> Result<Self, crate::Error> {
        match code.chars().count() {
            3 => Ok(Self::Iata),
            4 => Ok(Self::Icao),
            _ => Err(crate::Error::InvalidAirportCode(code.to_string())),
        }
    }
}

/// One row of `airports.dat`.
///
/// Column layout: ordinal, name, city, country, IATA, ICAO, latitude,
/// longitude, altitude in feet. IATA and ICAO are treated as unique within
/// a snapshot; the table itself is not validated for uniqueness.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Airport {
    pub index: u32,
    pub name: String,
    pub city: String,
    pub country: String,
    pub iata: String,
    pub icao: String,
    pub location: Point,
    pub altitude: i32,
}

impl Airport {
    fn from_record(record: &csv::StringRecord) -> Self {
        Self {
            index: lenient(record.get(0)),
            name: text(record, 1),
            city: text(record, 2),
            country: text(record, 3),
            iata: text(record, 4),
            icao: text(record, 5),
            location: Point::new(lenient(record.get(7)), lenient(record.get(6))),
            altitude: lenient(record.get(8)),
        }
    }

    /// Scan the table for the first row whose IATA or ICAO column equals
    /// `code` and return that row's ordinal. Callers normalise the code to
    /// uppercase; the comparison itself is exact.
    pub fn resolve_index(path: &Path, code: &str) -> Result<Option<u32>, crate::Error> {
        let mut reader = open(path)?;
        process_results(reader.records(), |mut records| {
            records
                .find(|record| record.get(4) == Some(code) || record.get(5) == Some(code))
                .map(|record| lenient(record.get(0)))
        })
        .map_err(Into::into)
    }

    /// Scan the table for the first row whose ordinal column equals `index`.
    pub fn by_index(path: &Path, index: u32) -> Result<Option<Self>, crate::Error> {
        let mut reader = open(path)?;
        process_results(reader.records(), |mut records| {
            records
                .find(|record| lenient::<u32>(record.get(0)) == index)
                .map(|record| Self::from_record(&record))
        })
        .map_err(Into::into)
    }

    pub fn find(path: &Path, code: &str) -> Result<Option<Self>, crate::Error> {
        match Self::resolve_index(path, code)? {
            Some(index) => Self::by_index(path, index),
            None => Ok(None),
        }
    }
}
