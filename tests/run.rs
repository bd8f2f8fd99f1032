use proxy_sift::{run, Error, RunConfig};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_in(dir: &Path, server: &MockServer) -> RunConfig {
    RunConfig::new()
        .with_input(dir.join("rawProxyList.txt"))
        .with_raw_output(dir.join("rawProxyList.txt"))
        .with_active_output(dir.join("proxyList.txt"))
        .with_sample_output(dir.join("kvProxyList.json"))
        .with_endpoint(format!("{}/api/v1/check", server.uri()))
        .with_concurrency(4)
        .with_timeout(Duration::from_millis(500))
}

fn verified(proxy: &str, port: u16, country: &str, org: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "proxy": proxy,
        "proxyip": true,
        "ip": proxy,
        "port": port,
        "delay": 100,
        "country": country,
        "asOrganization": org
    }))
}

#[tokio::test]
async fn end_to_end_writes_sorted_artifacts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("ip", "5.6.7.8:443"))
        .respond_with(verified("5.6.7.8", 443, "US", "Org B"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("ip", "1.2.3.4:8080"))
        .respond_with(verified("1.2.3.4", 8080, "ID", "Org A"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("ip", "9.9.9.9:80"))
        .respond_with(verified("9.9.9.9", 80, "SG", "Slow").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), &server);
    fs::write(
        &config.input,
        "5.6.7.8,443,US,Org+B\n\
         1.2.3.4,8080,ID,Org A\n\
         1.2.3.4,8080,ID,Org A\n\
         9.9.9.9,80,SG,Slow\n\
         4.4.4.4,1080,DE,Unlisted\n",
    )
    .unwrap();

    let report = run(&config).await.unwrap();
    assert_eq!(report.total, 5);
    assert_eq!(report.unique, 4);
    assert_eq!(report.saved, 2);
    assert_eq!(report.failed, 2);
    assert!(report.peak_in_flight <= 4);

    assert_eq!(
        fs::read_to_string(&config.raw_output).unwrap(),
        "1.2.3.4,8080,ID,Org A\n\
         9.9.9.9,80,SG,Slow\n\
         5.6.7.8,443,US,Org B\n\
         4.4.4.4,1080,DE,Unlisted"
    );
    assert_eq!(
        fs::read_to_string(&config.active_output).unwrap(),
        "1.2.3.4,8080,ID,Org A\n5.6.7.8,443,US,Org B"
    );

    let samples: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config.sample_output).unwrap()).unwrap();
    assert_eq!(
        samples,
        json!({ "ID": ["1.2.3.4:8080"], "US": ["5.6.7.8:443"] })
    );
}

#[tokio::test]
async fn malformed_port_aborts_before_probing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(verified("1.2.3.4", 8080, "ID", "Org A"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), &server);
    fs::write(&config.input, "1.2.3.4,8080,ID,Org A\n5.6.7.8,http,US,Org B\n").unwrap();

    let err = run(&config).await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert!(!config.active_output.exists());
    assert!(!config.sample_output.exists());
    assert_eq!(
        fs::read_to_string(&config.input).unwrap(),
        "1.2.3.4,8080,ID,Org A\n5.6.7.8,http,US,Org B\n"
    );
}

#[tokio::test]
async fn missing_input_is_read_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), &server);

    let err = run(&config).await.unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}

#[tokio::test]
async fn sample_map_is_capped_per_country() {
    let server = MockServer::start().await;
    let mut input = String::new();
    for port in 1000..1015u16 {
        Mock::given(method("GET"))
            .and(query_param("ip", format!("7.7.7.7:{}", port)))
            .respond_with(verified("7.7.7.7", port, "JP", "Org"))
            .mount(&server)
            .await;
        input.push_str(&format!("7.7.7.7,{},JP,Org\n", port));
    }

    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), &server).with_sample_cap(10);
    fs::write(&config.input, input).unwrap();

    let report = run(&config).await.unwrap();
    assert_eq!(report.saved, 15);

    let samples: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config.sample_output).unwrap()).unwrap();
    assert_eq!(samples["JP"].as_array().unwrap().len(), 10);
    assert_eq!(
        fs::read_to_string(&config.active_output).unwrap().lines().count(),
        15
    );
}
