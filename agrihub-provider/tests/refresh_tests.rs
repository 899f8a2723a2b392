mod common;

use agrihub_model::{Domain, DomainEntity, MediaResource};
use agrihub_provider::{NotificationLevel, RefreshSummary};
use common::{crop, provider};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

// ── Classification ──────────────────────────────────────────────

#[tokio::test]
async fn full_refresh_fills_every_collection() {
    let server = MockServer::start().await;
    mount_get(&server, "/crop/crops", ResponseTemplate::new(200).set_body_json(json!([crop("1", "Rice")]))).await;
    mount_get(
        &server,
        "/crop/documents",
        ResponseTemplate::new(200).set_body_json(json!({"documents": [{"id": "d1", "title": "Guide", "cropId": "1"}]})),
    )
    .await;
    mount_get(
        &server,
        "/crop/types",
        ResponseTemplate::new(200).set_body_json(json!({"types": [{"id": "t1", "name": "Cereal"}]})),
    )
    .await;

    let (crops, notifier) = provider::<DomainEntity>(&server, Domain::Crop);
    let report = crops.refresh_all().await;

    assert_eq!(report.summary, RefreshSummary::Fetched { total: 3 });
    assert_eq!(report.outcome("documents").unwrap().result, Ok(1));
    assert_eq!(crops.count(), 1);
    assert_eq!(crops.count_documents(), 1);
    assert_eq!(crops.types_count(), 1);
    assert_eq!(crops.documents_for("1").len(), 1);
    assert_eq!(crops.error(), None);

    let notes = notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Success);
    assert_eq!(notes[0].message, "Crops fetched successfully");
}

#[tokio::test]
async fn one_failed_sub_fetch_reports_partial_once() {
    let server = MockServer::start().await;
    mount_get(&server, "/crop/crops", ResponseTemplate::new(200).set_body_json(json!([crop("1", "Rice")]))).await;
    mount_get(&server, "/crop/documents", ResponseTemplate::new(500)).await;
    mount_get(&server, "/crop/types", ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let (crops, notifier) = provider::<DomainEntity>(&server, Domain::Crop);
    let report = crops.refresh_all().await;

    assert_eq!(report.summary, RefreshSummary::Partial { failed: 1, total: 3 });
    assert!(report.outcome("documents").unwrap().is_failure());
    assert_eq!(crops.count(), 1);

    let notes = notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].is_failure());
    assert!(notes[0].message.contains("1 of 3 failed"), "{}", notes[0].message);
    assert!(crops.error().is_some());
    assert!(!crops.is_loading());
}

#[tokio::test]
async fn late_successes_do_not_clear_partial_failure() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(300);
    mount_get(
        &server,
        "/crop/crops",
        ResponseTemplate::new(200).set_body_json(json!([crop("1", "Rice")])).set_delay(delay),
    )
    .await;
    mount_get(
        &server,
        "/crop/documents",
        ResponseTemplate::new(500).set_body_json(json!({"message": "Document store offline"})),
    )
    .await;
    mount_get(&server, "/crop/types", ResponseTemplate::new(200).set_body_json(json!([])).set_delay(delay)).await;
    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);

    let report = crops.refresh_all().await;

    assert_eq!(report.summary, RefreshSummary::Partial { failed: 1, total: 3 });
    assert_eq!(crops.error().as_deref(), Some("Document store offline"));
    assert_eq!(crops.count(), 1);
}

#[tokio::test]
async fn every_sub_fetch_failing_suggests_offline_service() {
    let server = MockServer::start().await;
    for route in ["/crop/crops", "/crop/documents", "/crop/types"] {
        mount_get(&server, route, ResponseTemplate::new(503)).await;
    }
    let (crops, notifier) = provider::<DomainEntity>(&server, Domain::Crop);

    let report = crops.refresh_all().await;

    assert_eq!(report.summary, RefreshSummary::AllFailed { total: 3 });
    assert_eq!(
        notifier.messages(),
        vec!["Failed to fetch crops: all 3 requests failed, the service may be offline"]
    );
}

#[tokio::test]
async fn empty_responses_report_no_records() {
    let server = MockServer::start().await;
    for route in ["/crop/crops", "/crop/documents", "/crop/types"] {
        mount_get(&server, route, ResponseTemplate::new(200).set_body_json(json!({"data": []}))).await;
    }
    let (crops, notifier) = provider::<DomainEntity>(&server, Domain::Crop);

    let report = crops.refresh_all().await;

    assert_eq!(report.summary, RefreshSummary::NoRecords { total: 3 });
    let notes = notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Info);
    assert_eq!(notes[0].message, "No crops records found");
}

#[tokio::test]
async fn domains_without_sub_resources_only_fetch_entities() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/media/resources",
        ResponseTemplate::new(200).set_body_json(json!([{"id": "v1", "title": "Irrigation", "type": "video"}])),
    )
    .await;
    let (media, _) = provider::<MediaResource>(&server, Domain::Media);

    let report = media.refresh_all().await;

    assert_eq!(report.summary, RefreshSummary::Fetched { total: 1 });
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn complete_refresh_clears_stale_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_get(&server, "/crop/crops", ResponseTemplate::new(200).set_body_json(json!([crop("1", "Rice")]))).await;
    mount_get(&server, "/crop/documents", ResponseTemplate::new(200).set_body_json(json!([]))).await;
    mount_get(&server, "/crop/types", ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);
    crops.fetch_all().await;
    assert!(crops.error().is_some());

    crops.refresh_all().await;
    assert_eq!(crops.error(), None);
}

// ── Concurrency ─────────────────────────────────────────────────

#[tokio::test]
async fn sub_fetches_run_concurrently() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(400);
    mount_get(
        &server,
        "/crop/crops",
        ResponseTemplate::new(200).set_body_json(json!([crop("1", "Rice")])).set_delay(delay),
    )
    .await;
    mount_get(&server, "/crop/documents", ResponseTemplate::new(200).set_body_json(json!([])).set_delay(delay)).await;
    mount_get(&server, "/crop/types", ResponseTemplate::new(200).set_body_json(json!([])).set_delay(delay)).await;
    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);

    let started = Instant::now();
    let report = crops.refresh_all().await;
    let elapsed = started.elapsed();

    assert!(report.summary.is_complete());
    assert!(elapsed < delay * 3, "refresh took {elapsed:?}");
}
