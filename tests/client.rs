//! End-to-end tests against a mocked CBIBS endpoint.
//!
//! The client is blocking, so each test spins up a multi-thread tokio
//! runtime to host the wiremock server and drives the client from the
//! test thread.

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cbibs::{Client, Error, Payload, ResponseFormat};

fn start_server() -> (tokio::runtime::Runtime, MockServer) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn client_for(server: &MockServer) -> Client {
    Client::new("abcd").with_base_url(format!("{}/api/v1", server.uri()))
}

#[test]
fn all_stations_payload_is_returned_unchanged() {
    let (rt, server) = start_server();

    let body = json!({
        "stations": [
            {"stationShortName": "AN", "stationLongName": "Annapolis"},
            {"stationShortName": "SN", "stationLongName": "Susquehanna"},
        ]
    });
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v1/json/station"))
            .and(query_param("key", "abcd"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(&server),
    );

    match client_for(&server).current_readings().unwrap() {
        Payload::Json(v) => assert_eq!(v, body),
        other => panic!("expected JSON payload, got {other:?}"),
    }
}

#[test]
fn station_codes_are_upper_cased_in_the_request_path() {
    let (rt, server) = start_server();

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v1/json/station/AN"))
            .and(query_param("key", "abcd"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"stations":[{"stationShortName":"AN"}]}"#),
            )
            .mount(&server),
    );

    // Lower-case input must still hit the upper-cased path above.
    let payload = client_for(&server).station_readings("an").unwrap();
    assert!(matches!(payload, Payload::Json(_)));
}

#[test]
fn invalid_key_in_a_200_response_is_an_auth_error() {
    let (rt, server) = start_server();

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v1/json/station"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"error": "Invalid API Key"}"#),
            )
            .mount(&server),
    );

    match client_for(&server).current_readings() {
        Err(Error::Auth(msg)) => assert_eq!(msg, "Invalid API Key"),
        other => panic!("expected Auth error, got {other:?}"),
    }
}

#[test]
fn non_200_status_is_an_http_error() {
    let (rt, server) = start_server();

    rt.block_on(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server),
    );

    let client = client_for(&server);

    match client.current_readings() {
        Err(Error::Http { status, url }) => {
            assert_eq!(status.as_u16(), 500);
            assert!(url.ends_with("/json/station"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }

    match client.station_readings("YS") {
        Err(Error::Http { status, .. }) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[test]
fn xml_mode_returns_the_document_root() {
    let (rt, server) = start_server();

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v1/xml/station"))
            .and(query_param("key", "abcd"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<stations><station shortName="AN"><windSpeed>4.2</windSpeed></station></stations>"#,
            ))
            .mount(&server),
    );

    let client = client_for(&server).with_format(ResponseFormat::Xml);
    match client.current_readings().unwrap() {
        Payload::Xml(root) => {
            assert_eq!(root.name, "stations");
            assert!(root.get_child("station").is_some());
        }
        other => panic!("expected XML payload, got {other:?}"),
    }
}

#[test]
fn unknown_station_code_makes_no_network_call() {
    let (rt, server) = start_server();

    rt.block_on(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(0)
            .mount(&server),
    );

    match client_for(&server).station_readings("ZZ") {
        Err(Error::InvalidStationCode(code)) => assert_eq!(code, "ZZ"),
        other => panic!("expected InvalidStationCode, got {other:?}"),
    }

    rt.block_on(server.verify());
}

#[test]
fn query_readings_send_the_time_window() {
    let (rt, server) = start_server();

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v1/json/query/SR"))
            .and(query_param("key", "abcd"))
            .and(query_param("sd", "2021-06-01T00:00:00Z"))
            .and(query_param("ed", "2021-06-02T00:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"stations":[]}"#))
            .mount(&server),
    );

    let start = Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2021, 6, 2, 0, 0, 0).unwrap();
    let payload = client_for(&server)
        .query_readings("sr", start, end)
        .unwrap();
    assert!(matches!(payload, Payload::Json(_)));
}

#[test]
fn session_scope_shares_the_client_across_calls() {
    let (rt, server) = start_server();

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v1/json/station"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"stations":[]}"#))
            .mount(&server),
    );
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v1/json/station/N"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"stations":[]}"#))
            .mount(&server),
    );

    let mut client = client_for(&server);
    client
        .with_session(|c| {
            c.current_readings()?;
            c.station_readings("n")?;
            Ok(())
        })
        .unwrap();

    // A failure inside the scope still surfaces, and the client remains
    // usable afterwards.
    let err = client.with_session(|c| c.station_readings("ZZ"));
    assert!(matches!(err, Err(Error::InvalidStationCode(_))));
    client.current_readings().unwrap();
}
