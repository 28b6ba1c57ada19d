use chrono::{TimeZone, Utc};
use hackerone_client::api::transport::{Connector, RawResponse, Transport};
use hackerone_client::{Config, Credentials, Error, HackerOneClient, Result, Severity};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct FakeState {
    connects: usize,
    requests: Vec<(String, Vec<(String, String)>)>,
    responses: VecDeque<Result<RawResponse>>,
}

#[derive(Clone, Debug, Default)]
struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Debug)]
struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConnector {
    fn respond(&self, response: Result<RawResponse>) -> &Self {
        self.state.lock().unwrap().responses.push_back(response);
        self
    }

    fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl Connector for FakeConnector {
    type Transport = FakeTransport;

    fn connect(&self, _credentials: &Credentials) -> Result<FakeTransport> {
        self.state.lock().unwrap().connects += 1;
        Ok(FakeTransport {
            state: self.state.clone(),
        })
    }
}

impl Transport for FakeTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push((
            path.to_string(),
            query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        ));
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("no scripted response".into())))
    }
}

fn record(id: &str, score: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "type": "report",
        "attributes": {
            "title": format!("Report {}", id),
            "state": "new",
            "created_at": "2024-05-02T10:00:00.000Z"
        },
        "relationships": {
            "severity": { "data": { "type": "severity", "attributes": { "score": score } } },
            "weakness": { "data": { "type": "weakness", "attributes": { "name": "Improper Authentication", "external_id": "cwe-287" } } }
        }
    })
}

fn ok(body: serde_json::Value) -> Result<RawResponse> {
    Ok(RawResponse::new(200, body.to_string()))
}

fn transient(msg: &str) -> Result<RawResponse> {
    Err(Error::Transport(msg.to_string()))
}

fn client_with(config: Config, connector: &FakeConnector) -> HackerOneClient<FakeConnector> {
    HackerOneClient::with_connector(
        Arc::new(config),
        Some(Credentials::new("api-user", "api-token")),
        connector.clone(),
    )
}

fn since() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn test_reports_without_program_makes_no_request() {
    let connector = FakeConnector::default();
    let client = client_with(Config::new(), &connector);

    let err = client.reports(since()).await.unwrap_err();

    match err {
        Error::InvalidArgument(msg) => assert_eq!(msg, "Program cannot be nil"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(connector.connects(), 0);
    assert!(connector.requests().is_empty());
}

#[tokio::test]
async fn test_reports_with_empty_program_is_rejected() {
    let connector = FakeConnector::default();
    let client = client_with(Config::new(), &connector).for_program("");

    assert!(matches!(
        client.reports(since()).await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(connector.requests().is_empty());
}

#[tokio::test]
async fn test_reports_sends_filters_and_keeps_order() {
    let connector = FakeConnector::default();
    connector.respond(ok(json!({
        "data": [record("3", json!(5000)), record("1", json!(null)), record("2", json!(1200))]
    })));
    let client = client_with(Config::new(), &connector).for_program("acme");

    let reports = client.reports(since()).await.unwrap();

    let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "1", "2"]);
    assert_eq!(reports[0].severity, Severity::Critical);
    assert_eq!(reports[1].severity, Severity::None);
    assert_eq!(reports[2].severity, Severity::Medium);
    assert_eq!(
        reports[0].classification_label().as_deref(),
        Some("CWE-287: Improper Authentication")
    );

    let requests = connector.requests();
    assert_eq!(requests.len(), 1);
    let (path, query) = &requests[0];
    assert_eq!(path, "reports");
    assert_eq!(
        query,
        &vec![
            ("filter[state][]".to_string(), "new".to_string()),
            ("filter[program][]".to_string(), "acme".to_string()),
            (
                "filter[created_at__gt]".to_string(),
                "2024-05-01T00:00:00Z".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_reports_uses_configured_program() {
    let connector = FakeConnector::default();
    connector.respond(ok(json!({ "data": [] })));
    let mut config = Config::new();
    config.set_program(Some("configured".into()));
    let client = client_with(config, &connector);

    let reports = client.reports(since()).await.unwrap();

    assert!(reports.is_empty());
    assert_eq!(connector.requests()[0].1[1].1, "configured");
}

#[tokio::test]
async fn test_reports_use_configured_ranges() {
    let connector = FakeConnector::default();
    connector.respond(ok(json!({ "data": [record("1", json!(8.5))] })));
    let mut config = Config::new();
    config.set_program(Some("acme".into()));
    config.set_low_range(0.1..4.0).unwrap();
    config.set_medium_range(4.0..7.0).unwrap();
    config.set_high_range(7.0..9.0).unwrap();
    config.set_critical_range(9.0..10.1).unwrap();
    let client = client_with(config, &connector);

    let reports = client.reports(since()).await.unwrap();
    assert_eq!(reports[0].severity, Severity::High);
}

#[tokio::test]
async fn test_reports_missing_data_is_protocol_error() {
    let connector = FakeConnector::default();
    connector.respond(ok(json!({ "errors": [{ "title": "Unauthorized" }] })));
    let client = client_with(Config::new(), &connector).for_program("acme");

    match client.reports(since()).await {
        Err(Error::Protocol(msg)) => {
            assert!(msg.contains("Expected data attribute in response"));
            assert!(msg.contains("Unauthorized"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_reports_null_data_is_protocol_error() {
    let connector = FakeConnector::default();
    connector.respond(ok(json!({ "data": null })));
    let client = client_with(Config::new(), &connector).for_program("acme");

    assert!(matches!(client.reports(since()).await, Err(Error::Protocol(_))));
}

#[tokio::test]
async fn test_reports_transport_error_is_not_retried() {
    let connector = FakeConnector::default();
    connector.respond(transient("connection reset"));
    let client = client_with(Config::new(), &connector).for_program("acme");

    assert!(matches!(client.reports(since()).await, Err(Error::Transport(_))));
    assert_eq!(connector.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_report_recovers_after_two_transient_failures() {
    let connector = FakeConnector::default();
    connector
        .respond(transient("timed out"))
        .respond(transient("connection refused"))
        .respond(ok(json!({ "data": record("77", json!(2600)) })));
    let client = client_with(Config::new(), &connector);
    let started = tokio::time::Instant::now();

    let report = client.report("77").await.unwrap();

    assert_eq!(report.id, "77");
    assert_eq!(report.severity, Severity::High);
    assert_eq!(started.elapsed(), Duration::from_secs(1 + 2));
    let requests = connector.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|(path, query)| path == "reports/77" && query.is_empty()));
    assert_eq!(connector.connects(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_report_returns_last_error_when_retries_exhausted() {
    let connector = FakeConnector::default();
    connector
        .respond(transient("first"))
        .respond(transient("second"))
        .respond(transient("third"))
        .respond(ok(json!({ "data": record("77", json!(1)) })));
    let client = client_with(Config::new(), &connector);

    match client.report("77").await {
        Err(Error::Transport(msg)) => assert_eq!(msg, "third"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(connector.requests().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_report_not_found_fails_without_retry() {
    let connector = FakeConnector::default();
    connector.respond(Ok(RawResponse::new(
        404,
        json!({ "errors": [{ "status": 404, "title": "Not Found" }] }).to_string(),
    )));
    let client = client_with(Config::new(), &connector);
    let started = tokio::time::Instant::now();

    match client.report("12345").await {
        Err(Error::InvalidArgument(msg)) => {
            assert!(msg.contains("#12345"));
            assert!(msg.contains("Not Found"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(connector.requests().len(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_report_malformed_body_is_not_retried() {
    let connector = FakeConnector::default();
    connector.respond(Ok(RawResponse::new(200, "<html>oops</html>")));
    let client = client_with(Config::new(), &connector);

    assert!(matches!(client.report("1").await, Err(Error::Json(_))));
    assert_eq!(connector.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_credentials_fail_without_network() {
    let connector = FakeConnector::default();
    connector.respond(ok(json!({ "data": [] })));
    let client = HackerOneClient::with_connector(Arc::new(Config::new()), None, connector.clone())
        .for_program("acme");
    let started = tokio::time::Instant::now();

    assert!(matches!(client.reports(since()).await, Err(Error::NotConfigured(_))));
    assert!(matches!(client.report("1").await, Err(Error::NotConfigured(_))));

    assert_eq!(connector.connects(), 0);
    assert!(connector.requests().is_empty());
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_connection_built_once_across_clones() {
    let connector = FakeConnector::default();
    connector
        .respond(ok(json!({ "data": [] })))
        .respond(ok(json!({ "data": [] })))
        .respond(ok(json!({ "data": record("5", json!(10)) })));
    let client = client_with(Config::new(), &connector);

    client.for_program("one").reports(since()).await.unwrap();
    client.for_program("two").reports(since()).await.unwrap();
    client.clone().report("5").await.unwrap();

    assert_eq!(connector.connects(), 1);
    assert_eq!(connector.requests().len(), 3);
}
