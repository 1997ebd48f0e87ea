use std::path::Path;

use itertools::process_results;
use serde::Serialize;

use crate::dataset::{lenient, open, text};

/// One row of `airlines.dat`.
///
/// Column layout: numeric id, name, alias, IATA, ICAO, callsign, country,
/// active marker (`Y` means active).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Airline {
    pub id: u32,
    pub name: String,
    pub alias: String,
    pub iata: String,
    pub icao: String,
    pub callsign: String,
    pub country: String,
    pub active: bool,
}

impl Airline {
    fn from_record(record: &csv::StringRecord) -> Self {
        Self {
            id: lenient(record.get(0)),
            name: text(record, 1),
            alias: text(record, 2),
            iata: text(record, 3),
            icao: text(record, 4),
            callsign: text(record, 5),
            country: text(record, 6),
            active: record.get(7) == Some("Y"),
        }
    }

    /// Scan the table for the first row whose ICAO column equals `code`.
    /// The source table may repeat designators; earlier rows take
    /// precedence, the same policy as airport lookups.
    pub fn find(path: &Path, code: &str) -> Result<Option<Self>, crate::Error> {
        let mut reader = open(path)?;
        process_results(reader.records(), |mut records| {
            records
                .find(|record| record.get(4) == Some(code))
                .map(|record| Self::from_record(&record))
        })
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::Airline;
    use crate::Error;

    fn write_table(rows: &[&str]) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("airlines.dat");
        let mut file = fs::File::create(&path).unwrap();
        for row in rows {
            file.write_all(row.as_bytes()).unwrap();
        }
        (dir, path)
    }

    #[test]
    fn finds_an_airline_by_icao_code() {
        let (_dir, path) = write_table(&[
            "324,\"All Nippon Airways\",\"ANA All Nippon Airways\",\"NH\",\"ANA\",\"ALL NIPPON\",\"Japan\",\"Y\"\n",
            "2822,\"Iberia Airlines\",\"Iberia\",\"IB\",\"IBE\",\"IBERIA\",\"Spain\",\"Y\"\n",
        ]);
        let airline = Airline::find(&path, "IBE").unwrap().unwrap();
        assert_eq!(
            airline,
            Airline {
                id: 2822,
                name: "Iberia Airlines".to_string(),
                alias: "Iberia".to_string(),
                iata: "IB".to_string(),
                icao: "IBE".to_string(),
                callsign: "IBERIA".to_string(),
                country: "Spain".to_string(),
                active: true,
            }
        );
    }

    #[test]
    fn no_matching_row_yields_none() {
        let (_dir, path) = write_table(&[
            "324,\"All Nippon Airways\",\"ANA All Nippon Airways\",\"NH\",\"ANA\",\"ALL NIPPON\",\"Japan\",\"Y\"\n",
        ]);
        assert_eq!(Airline::find(&path, "ZZZ").unwrap(), None);
    }

    #[test]
    fn duplicate_designators_resolve_to_the_first_row() {
        // The table is not deduplicated upstream, so the scan policy
        // matters: the earliest row wins.
        let (_dir, path) = write_table(&[
            "10,\"Old Carrier\",\\N,\"OC\",\"DUP\",\"OLD\",\"Testland\",\"N\"\n",
            "11,\"New Carrier\",\\N,\"NC\",\"DUP\",\"NEW\",\"Testland\",\"Y\"\n",
        ]);
        let airline = Airline::find(&path, "DUP").unwrap().unwrap();
        assert_eq!(airline.id, 10);
        assert_eq!(airline.name, "Old Carrier");
        assert!(!airline.active);
    }

    #[test]
    fn inactive_marker_and_missing_id_parse_leniently() {
        let (_dir, path) = write_table(&[
            "-1,\"Unknown\",\\N,\"-\",\"N/A\",\\N,\\N,\"N\"\n",
        ]);
        let airline = Airline::find(&path, "N/A").unwrap().unwrap();
        // A negative id does not fit the unsigned column, so it falls back
        // to zero like any other malformed number.
        assert_eq!(airline.id, 0);
        assert_eq!(airline.alias, "\\N");
        assert!(!airline.active);
    }

    #[test]
    fn missing_table_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("airlines.dat");
        assert!(matches!(
            Airline::find(&path, "ANA"),
            Err(Error::FileRead(_))
        ));
    }
}
