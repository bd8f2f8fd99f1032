use proxy_sift::{Probe, ProbeVerdict, VerifierClient, VerifierConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, timeout: Duration) -> VerifierClient {
    let config = VerifierConfig::new()
        .with_endpoint(format!("{}/api/v1/check", server.uri()))
        .with_timeout(timeout);
    VerifierClient::with_config(config).unwrap()
}

#[tokio::test]
async fn bare_result_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/check"))
        .and(query_param("ip", "5.6.7.8:443"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "proxy": "5.6.7.8",
            "proxyip": true,
            "ip": "5.6.7.8",
            "port": 443,
            "delay": 231,
            "country": "US",
            "asOrganization": "Org B"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let verdict = client(&server, Duration::from_secs(5))
        .probe("5.6.7.8", 443)
        .await;
    let ProbeVerdict::Success(success) = verdict else {
        panic!("expected success, got {:?}", verdict);
    };
    assert_eq!(success.to_entry(), "5.6.7.8,443,US,Org B");
    assert_eq!(success.delay_ms, 231.0);
}

#[tokio::test]
async fn envelope_with_proxyip_false_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "result": {
                "proxy": "5.6.7.8",
                "proxyip": false,
                "port": 443,
                "country": "US",
                "asOrganization": "Org B"
            }
        })))
        .mount(&server)
        .await;

    let verdict = client(&server, Duration::from_secs(5))
        .probe("5.6.7.8", 443)
        .await;
    assert_eq!(verdict, ProbeVerdict::failure("not a proxy ip"));
}

#[tokio::test]
async fn non_ok_status_reports_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let verdict = client(&server, Duration::from_secs(5))
        .probe("1.2.3.4", 80)
        .await;
    assert_eq!(verdict, ProbeVerdict::failure("Service Unavailable"));
}

#[tokio::test]
async fn malformed_body_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let verdict = client(&server, Duration::from_secs(5))
        .probe("1.2.3.4", 80)
        .await;
    assert!(!verdict.is_success());
}

#[tokio::test]
async fn slow_verifier_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "proxy": "1.2.3.4",
                    "proxyip": true,
                    "port": 80,
                    "country": "ID",
                    "asOrganization": "Org"
                }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let verdict = client(&server, Duration::from_millis(200))
        .probe("1.2.3.4", 80)
        .await;
    assert_eq!(verdict, ProbeVerdict::timeout());
}
