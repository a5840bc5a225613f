//! Integration tests for the Vultr datasource using wiremock

use std::time::Duration;

use tempfile::TempDir;
use vultr_nocloud::datasources::MetadataSource;
use vultr_nocloud::datasources::vultr::Vultr;
use vultr_nocloud::{BridgeError, run_with};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const METADATA: &str = r#"{
    "bgp": {"ipv4": {}, "ipv6": {}},
    "hostname": "guest-1",
    "instanceid": "4f0e9a1c",
    "interfaces": [
        {
            "ipv4": {
                "address": "203.0.113.5",
                "gateway": "203.0.113.1",
                "netmask": "255.255.254.0"
            },
            "mac": "56:00:04:aa:bb:01",
            "network-type": "public"
        },
        {
            "ipv4": {"address": "10.24.96.3", "gateway": "", "netmask": "255.255.240.0"},
            "mac": "5a:00:04:aa:bb:02",
            "network-type": "private",
            "networkid": "net5e8c"
        }
    ],
    "public-keys": "ssh-ed25519 AAAAC3Nza user@laptop\n\nssh-rsa AAAAB3Nza ops@bastion\n",
    "region": {"regioncode": "AMS"}
}"#;

async fn server_with(response: ResponseTemplate) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.json"))
        .respond_with(response)
        .mount(&mock_server)
        .await;

    mock_server
}

fn datasource(server: &MockServer) -> Vultr {
    Vultr::with_url(format!("{}/v1.json", server.uri()), Duration::from_secs(5)).unwrap()
}

fn dir_is_empty(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path()).unwrap().next().is_none()
}

/// Test decoding a full document from the service
#[tokio::test]
async fn test_fetch_metadata_document() {
    let server = server_with(ResponseTemplate::new(200).set_body_string(METADATA)).await;

    let doc = datasource(&server).fetch().await.unwrap();

    assert_eq!(doc.hostname, "guest-1");
    assert_eq!(doc.instance_id, "4f0e9a1c");
    assert_eq!(doc.region.region_code, "AMS");
    assert_eq!(doc.interfaces.len(), 2);
    assert_eq!(doc.interfaces[1].network_id, "net5e8c");
    assert_eq!(doc.interfaces[1].ipv4.netmask, "255.255.240.0");
}

/// Test that an error status carries the response body
#[tokio::test]
async fn test_fetch_error_status_includes_body() {
    let server =
        server_with(ResponseTemplate::new(503).set_body_string("metadata not ready")).await;

    let err = datasource(&server).fetch().await.unwrap_err();

    match err {
        BridgeError::MetadataStatus { status, ref body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "metadata not ready");
        }
        other => panic!("Expected MetadataStatus, got {:?}", other),
    }
}

/// Test that a malformed body is rejected
#[tokio::test]
async fn test_fetch_malformed_json() {
    let server = server_with(ResponseTemplate::new(200).set_body_string("{\"hostname\": ")).await;

    let err = datasource(&server).fetch().await.unwrap_err();
    assert!(matches!(err, BridgeError::Json(_)));
}

/// Test that a slow service hits the timeout
#[tokio::test]
async fn test_fetch_timeout() {
    let server = server_with(
        ResponseTemplate::new(200)
            .set_body_string(METADATA)
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let ds = Vultr::with_url(
        format!("{}/v1.json", server.uri()),
        Duration::from_millis(200),
    )
    .unwrap();
    let err = ds.fetch().await.unwrap_err();

    assert!(matches!(err, BridgeError::Timeout(_)), "got {:?}", err);
}

/// Test that the service is asked exactly once
#[tokio::test]
async fn test_fetch_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = datasource(&mock_server).fetch().await;
    assert!(result.is_err());
}

/// Test the fetch-translate-write sequence against the mock service
#[tokio::test]
async fn test_run_with_writes_seed() {
    let server = server_with(ResponseTemplate::new(200).set_body_string(METADATA)).await;
    let output = TempDir::new().unwrap();

    let seed = run_with(&datasource(&server), output.path()).await.unwrap();

    assert_eq!(
        seed.metadata.public_keys,
        vec!["ssh-ed25519 AAAAC3Nza user@laptop", "ssh-rsa AAAAB3Nza ops@bastion"]
    );

    let meta: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output.path().join("meta-data")).unwrap())
            .unwrap();
    assert_eq!(meta["instance-id"], "4f0e9a1c");
    assert_eq!(meta["region"], "AMS");
    assert_eq!(meta["hostname"], "guest-1");
    assert_eq!(meta["local-hostname"], "guest-1");
    assert_eq!(meta["availability-zone"], "unknown");

    let network: serde_yaml::Value = serde_yaml::from_str(
        &std::fs::read_to_string(output.path().join("network-config")).unwrap(),
    )
    .unwrap();
    assert_eq!(network["version"].as_u64(), Some(2));
    let config = network["config"].as_sequence().unwrap();
    assert_eq!(config.len(), 1);
    assert_eq!(config[0]["name"].as_str(), Some("eth1"));
    assert_eq!(config[0]["mac_address"].as_str(), Some("5a:00:04:aa:bb:02"));
    assert_eq!(config[0]["subnets"][0]["address"].as_str(), Some("10.24.96.3"));

    assert!(std::fs::read(output.path().join("user-data")).unwrap().is_empty());
}

/// Test that an error status leaves the seed directory untouched
#[tokio::test]
async fn test_run_with_error_status_writes_nothing() {
    let server = server_with(ResponseTemplate::new(404).set_body_string("not found")).await;
    let output = TempDir::new().unwrap();

    let result = run_with(&datasource(&server), output.path()).await;

    assert!(result.is_err());
    assert!(dir_is_empty(&output));
}

/// Test that an undecodable document leaves the seed directory untouched
#[tokio::test]
async fn test_run_with_bad_json_writes_nothing() {
    let server =
        server_with(ResponseTemplate::new(200).set_body_string("<html>captive</html>")).await;
    let output = TempDir::new().unwrap();

    let result = run_with(&datasource(&server), output.path()).await;

    assert!(matches!(result, Err(BridgeError::Json(_))));
    assert!(dir_is_empty(&output));
}
