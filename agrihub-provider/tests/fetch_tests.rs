mod common;

use agrihub_api::ListFilter;
use agrihub_model::{Domain, DomainEntity, MediaKind, MediaResource};
use common::{crop, crop_with_type, ids, provider};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── fetch_all ───────────────────────────────────────────────────

#[tokio::test]
async fn fetch_all_fills_empty_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([crop("1", "Rice")])))
        .mount(&server)
        .await;

    let (crops, notifier) = provider::<DomainEntity>(&server, Domain::Crop);
    assert_eq!(crops.count(), 0);

    let fetched = crops.fetch_all().await;

    assert_eq!(fetched, vec![DomainEntity::new("1", "Rice")]);
    assert_eq!(crops.entities(), vec![DomainEntity::new("1", "Rice")]);
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn fetch_all_replaces_instead_of_merging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([crop("1", "Rice"), crop("2", "Maize")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [crop("2", "Maize"), crop("3", "Sorghum"), crop("3", "Sorghum")]
        })))
        .mount(&server)
        .await;

    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);
    crops.fetch_all().await;
    crops.fetch_all().await;

    assert_eq!(ids(&crops), vec!["2", "3"]);
}

#[tokio::test]
async fn failed_fetch_keeps_cache_and_records_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([crop("1", "Rice")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Database unavailable"})))
        .mount(&server)
        .await;

    let (crops, notifier) = provider::<DomainEntity>(&server, Domain::Crop);
    crops.fetch_all().await;

    let second = crops.fetch_all().await;

    assert!(second.is_empty());
    assert_eq!(ids(&crops), vec!["1"]);
    assert_eq!(crops.error().as_deref(), Some("Database unavailable"));
    assert!(!crops.is_loading());
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn try_fetch_all_exposes_error_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})))
        .mount(&server)
        .await;

    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);
    let err = crops.try_fetch_all().await.unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn success_after_failure_clears_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);
    crops.fetch_all().await;
    assert_eq!(crops.error().as_deref(), Some("Service Unavailable"));

    crops.fetch_all().await;
    assert_eq!(crops.error(), None);
}

#[tokio::test]
async fn loading_flag_tracks_in_flight_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);
    assert!(!crops.is_loading());

    let probe = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        crops.is_loading()
    };
    let (_, during) = tokio::join!(crops.fetch_all(), probe);

    assert!(during);
    assert!(!crops.is_loading());
}

#[tokio::test]
async fn cancelled_fetch_does_not_stay_loading() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);
    let timed_out = tokio::time::timeout(Duration::from_millis(100), crops.fetch_all()).await;

    assert!(timed_out.is_err());
    assert!(!crops.is_loading());
}

// ── fetch_filtered ──────────────────────────────────────────────

#[tokio::test]
async fn filtered_fetch_sends_type_and_active() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/resources"))
        .and(query_param("type", "video"))
        .and(query_param("isActive", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [{"id": "v1", "title": "Drip irrigation", "type": "video", "isActive": true}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (media, _) = provider::<MediaResource>(&server, Domain::Media);
    let videos = media
        .fetch_filtered(&ListFilter::new().kind("video").active(true))
        .await;

    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].kind, MediaKind::Video);
    assert_eq!(media.get_by_foreign_key("video").len(), 1);
}

// ── documents and types ─────────────────────────────────────────

#[tokio::test]
async fn fetch_documents_uses_domain_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crop/documents"))
        .and(query_param("domainType", "crop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                {"id": "d1", "title": "Rice guide", "author": "u1", "fileUrls": ["a.pdf"], "cropId": "1"},
                {"id": "d2", "title": "Cereal overview", "author": "u1", "cropTypeId": "t1"}
            ]
        })))
        .mount(&server)
        .await;

    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);
    let docs = crops.fetch_documents(None).await;

    assert_eq!(docs.len(), 2);
    assert_eq!(crops.count_documents(), 2);
    assert_eq!(crops.documents_for("1").len(), 1);
    assert_eq!(crops.documents_for("t1")[0].id, "d2");
    assert_eq!(crops.document_by_id("d1").unwrap().file_urls, vec!["a.pdf"]);
}

#[tokio::test]
async fn fetch_documents_with_explicit_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crop/documents"))
        .and(query_param("domainType", "horticulture"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);
    crops.fetch_documents(Some("horticulture")).await;
    assert_eq!(crops.error(), None);
}

#[tokio::test]
async fn domain_without_documents_reports_config_error() {
    let server = MockServer::start().await;
    let (media, _) = provider::<MediaResource>(&server, Domain::Media);

    let err = media.try_fetch_documents(None).await.unwrap_err();

    assert!(matches!(err, agrihub_api::ApiError::Config(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_types_and_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crop/types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "types": [{"id": "t1", "name": "Cereal", "count": 2}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crop/crops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            crop_with_type("1", "Rice", "t1"),
            crop_with_type("2", "Maize", "t1"),
            crop_with_type("3", "Cassava", "t2")
        ])))
        .mount(&server)
        .await;

    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);
    crops.fetch_types().await;
    crops.fetch_all().await;

    assert_eq!(crops.types_count(), 1);
    assert_eq!(crops.type_by_id("t1").unwrap().entity_count, 2);
    let cereals: Vec<_> = crops.get_by_foreign_key("t1").into_iter().map(|c| c.name).collect();
    assert_eq!(cereals, vec!["Rice", "Maize"]);
    assert_eq!(crops.get_by_id("3").unwrap().name, "Cassava");
    assert!(crops.get_by_id("404").is_none());
}

#[tokio::test]
async fn accessors_never_hit_the_network() {
    let server = MockServer::start().await;
    let (crops, _) = provider::<DomainEntity>(&server, Domain::Crop);

    assert!(crops.get_by_id("1").is_none());
    assert!(crops.get_by_foreign_key("t1").is_empty());
    assert_eq!(crops.count(), 0);
    assert_eq!(crops.count_documents(), 0);

    assert!(server.received_requests().await.unwrap().is_empty());
}
