use super::*;
use crate::config::Config;
use clap::Parser;

fn test_config() -> Config {
    Config::parse_from([
        "proctor-ai",
        "--object-store-endpoint",
        "http://localhost:9000",
        "--object-store-access-key",
        "minioadmin",
        "--object-store-secret-key",
        "minioadmin",
    ])
}

#[tokio::test]
async fn connect_builds_a_client_without_touching_the_network() {
    let config = test_config();
    let client = ObjectStoreClient::connect(&config).await;
    // Construction is purely local config; only the first real call hits the network.
    assert!(client.check_connection().await == client.check_connection().await);
}

#[tokio::test]
async fn download_from_unreachable_endpoint_returns_none_rather_than_panicking() {
    let config = test_config();
    let client = ObjectStoreClient::connect(&config).await;
    let result = client.download_bytes("proctoring-snapshots", "missing.jpg").await;
    assert!(result.is_none());
}
