#![allow(dead_code)]

use agrihub_api::{ApiClient, ApiConfig, MemoryTokenStore};
use agrihub_model::{Domain, Resource};
use agrihub_provider::{DomainConfig, RecordingNotifier, ResourceProvider};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::MockServer;

pub fn api_for(server: &MockServer) -> Arc<ApiClient> {
    let config = ApiConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        ..Default::default()
    };
    Arc::new(ApiClient::new(config, Arc::new(MemoryTokenStore::with_token("test-token"))).unwrap())
}

pub fn provider_with<E: Resource>(
    server: &MockServer,
    config: DomainConfig,
) -> (ResourceProvider<E>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let provider = ResourceProvider::new(config, api_for(server), notifier.clone());
    (provider, notifier)
}

pub fn provider<E: Resource>(
    server: &MockServer,
    domain: Domain,
) -> (ResourceProvider<E>, Arc<RecordingNotifier>) {
    provider_with(server, DomainConfig::for_domain(domain))
}

pub fn crop(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

pub fn crop_with_type(id: &str, name: &str, type_id: &str) -> Value {
    json!({ "id": id, "name": name, "cropTypeId": type_id })
}

pub fn ids<E: Resource>(provider: &ResourceProvider<E>) -> Vec<String> {
    provider
        .entities()
        .iter()
        .map(|e| e.id().to_string())
        .collect()
}
