use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const FLIGHTXML_BASE: &str = "https://flightxml.flightaware.com/json/FlightXML2";

// Fixed paging: the tracker only ever shows the most relevant result page.
const RESULT_CAP: u32 = 1;
const PAGE_OFFSET: u32 = 2;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not fetch flight data: {0}")]
    Fetch(#[from] reqwest::Error),
}

/// Basic-auth credential pair for the flight-tracking service.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub user: String,
    pub key: String,
}

/// One tracked flight as reported by the FlightInfoEx endpoint. Fetched
/// fresh per invocation and discarded after display.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Flight {
    #[serde(rename = "originCity", default)]
    pub origin_city: String,
    #[serde(rename = "destinationCity", default)]
    pub destination_city: String,
    #[serde(rename = "aircrafttype", default)]
    pub aircraft_type: String,
    #[serde(rename = "filed_ete", default)]
    pub filed_ete: String,
    #[serde(rename = "estimatedarrivaltime", default)]
    pub estimated_arrival_time: i64,
    #[serde(default)]
    pub route: String,
}

impl Flight {
    /// Estimated arrival as local calendar time, when the reported epoch
    /// timestamp is representable.
    pub fn estimated_arrival(&self) -> Option<DateTime<Local>> {
        Local.timestamp_opt(self.estimated_arrival_time, 0).single()
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "FlightInfoExResult")]
    result: ResultPage,
}

#[derive(Debug, Deserialize)]
struct ResultPage {
    #[serde(default)]
    flights: Vec<Flight>,
}

fn request_url(base: Option<&str>, ident: &str) -> String {
    format!(
        "{}/FlightInfoEx?ident={ident}&howMany={RESULT_CAP}&offset={PAGE_OFFSET}",
        base.unwrap_or(FLIGHTXML_BASE)
    )
}

/// Fetch the tracking records for a flight ident. Callers verify the
/// credentials are non-empty before getting here.
pub fn get(
    ident: &str,
    credentials: &Credentials,
    base: Option<&str>,
) -> Result<Vec<Flight>, Error> {
    let url = request_url(base, ident);
    debug!("fetching flight data from {url}");
    let envelope = reqwest::blocking::Client::new()
        .get(&url)
        .basic_auth(&credentials.user, Some(&credentials.key))
        .send()?
        .error_for_status()?
        .json::<Envelope>()?;
    Ok(envelope.result.flights)
}

#[cfg(test)]
mod tests {
    use super::{request_url, Envelope, Flight};

    #[test]
    fn url_carries_ident_and_fixed_paging() {
        let url = request_url(None, "BAW284");
        assert_eq!(
            url,
            "https://flightxml.flightaware.com/json/FlightXML2/FlightInfoEx?ident=BAW284&howMany=1&offset=2"
        );

        let url = request_url(Some("http://localhost:9999"), "IBE6253");
        assert!(url.starts_with("http://localhost:9999/FlightInfoEx?ident=IBE6253"));
    }

    #[test]
    fn decodes_the_flight_envelope() {
        let envelope: Envelope = serde_json::from_str(
            r#"{
                "FlightInfoExResult": {
                    "next_offset": -1,
                    "flights": [
                        {
                            "ident": "BAW284",
                            "aircrafttype": "A388",
                            "filed_ete": "09:55:00",
                            "estimatedarrivaltime": 1700000000,
                            "originCity": "San Francisco, CA",
                            "destinationCity": "London, England",
                            "route": "TRUKN2 ORRCA MLBEC BOPUT"
                        }
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            envelope.result.flights,
            vec![Flight {
                origin_city: "San Francisco, CA".to_string(),
                destination_city: "London, England".to_string(),
                aircraft_type: "A388".to_string(),
                filed_ete: "09:55:00".to_string(),
                estimated_arrival_time: 1_700_000_000,
                route: "TRUKN2 ORRCA MLBEC BOPUT".to_string(),
            }]
        );
    }

    #[test]
    fn missing_fields_default_instead_of_failing() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"FlightInfoExResult": {"flights": [{"ident": "X"}]}}"#)
                .unwrap();
        let flight = &envelope.result.flights[0];
        assert_eq!(flight.aircraft_type, "");
        assert_eq!(flight.estimated_arrival_time, 0);
    }

    #[test]
    fn arrival_epoch_round_trips_through_local_time() {
        let flight = Flight {
            estimated_arrival_time: 1_700_000_000,
            ..Flight::default()
        };
        assert_eq!(
            flight.estimated_arrival().unwrap().timestamp(),
            1_700_000_000
        );
    }
}
