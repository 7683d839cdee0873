//! End-to-end pipeline tests. A single mock server stands in for the post
//! host, the inference service, the geocoder and FIRMS, which all live on
//! distinct paths.

use std::io::Write;

use postmap_core::{FailureKind, NoLocationReason, PostText, RunStatus, Stage};
use postmap_extractor::LocationExtractor;
use postmap_firms::FirmsClient;
use postmap_geocoder::Geocoder;
use postmap_pipeline::{Pipeline, Progress, RunRequest, Session};
use postmap_scraper::PostFetcher;
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POST_URL: &str = "https://t.me/nexta_live/106925";

struct Harness {
    server: MockServer,
    pipeline: Pipeline,
    _prompt: NamedTempFile,
}

async fn harness() -> Harness {
    let server = MockServer::start().await;
    let mut prompt = NamedTempFile::new().expect("temp prompt file");
    prompt
        .write_all(b"Return {\"location\": \"...\"} for the place in the post.")
        .expect("write prompt");

    let uri = server.uri();
    let pipeline = Pipeline::from_parts(
        PostFetcher::with_base_url(5, "Mozilla/5.0 (postmap-test)", &uri).unwrap(),
        LocationExtractor::new(&uri, "gpt-oss:20b", prompt.path(), 5).unwrap(),
        Geocoder::with_base_url("tg-strike-extractor", 5, &uri).unwrap(),
        FirmsClient::with_base_url("TESTKEY", 5, &uri).unwrap(),
    );

    Harness {
        server,
        pipeline,
        _prompt: prompt,
    }
}

fn request(reference: &str, fetch_fires: bool) -> RunRequest {
    RunRequest {
        reference: reference.to_string(),
        fetch_fires,
        radius_km: 50.0,
        day_range: 1,
    }
}

async fn mount_post(server: &MockServer, post_path: &str, description: &str) {
    let html = format!(
        r#"<html><head><meta property="og:description" content="{description}"></head></html>"#
    );
    Mock::given(method("GET"))
        .and(path(post_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

async fn mount_chat(server: &MockServer, content: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-oss:20b",
            "message": {
                "role": "assistant",
                "content": content,
                "thinking": "The post mentions Tikkurila."
            },
            "total_duration": 2_500_000_000_u64
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_firms(server: &MockServer, status: u16, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/area/csv/TESTKEY/[A-Z0-9_]+/[-0-9.,]+/1$"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string("latitude,longitude,confidence\n60.31,25.01,n\n"),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn tikkurila() -> serde_json::Value {
    json!([{
        "lat": "60.2925",
        "lon": "25.0440",
        "display_name": "Tikkurila, Vantaa, Finland"
    }])
}

#[tokio::test]
async fn full_run_locates_post_and_collects_fires() {
    let h = harness().await;
    mount_post(&h.server, "/nexta_live/106925", "Explosions heard in Tikkurila").await;
    mount_chat(&h.server, r#"{"location": "Tikkurila, Vantaa"}"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Tikkurila, Vantaa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tikkurila()))
        .expect(1)
        .mount(&h.server)
        .await;
    mount_firms(&h.server, 200, 4).await;

    let mut events = Vec::new();
    let result = h
        .pipeline
        .run(&request(&format!("{POST_URL}?single"), true), 1, |p| {
            events.push(p);
        })
        .await;

    assert_eq!(result.status(), &RunStatus::Located);
    assert_eq!(result.version(), 1);
    assert_eq!(
        result.post_text(),
        Some(&PostText::Body("Explosions heard in Tikkurila".to_string()))
    );
    let guess = result.guess().expect("guess recorded");
    assert_eq!(guess.location, "Tikkurila, Vantaa");
    assert!((guess.elapsed_secs - 2.5).abs() < 1e-9);

    let coordinate = result.coordinate().expect("coordinate resolved");
    assert!((coordinate.lat - 60.2925).abs() < 1e-9);
    assert_eq!(
        result.place().map(|p| p.address.as_str()),
        Some("Tikkurila, Vantaa, Finland")
    );

    let fires = result.fires().expect("fires requested");
    assert_eq!(fires.len(), 4);
    assert!(fires.iter().all(|f| f.field("confidence") == Some("n")));

    assert_eq!(
        events,
        vec![
            Progress::StageStarted(Stage::Fetching),
            Progress::Percent(33),
            Progress::StageStarted(Stage::Extracting),
            Progress::StageStarted(Stage::Geocoding),
            Progress::Percent(66),
            Progress::StageStarted(Stage::FetchingFires),
            Progress::Percent(100),
        ]
    );
}

#[tokio::test]
async fn fires_not_requested_leaves_fires_absent() {
    let h = harness().await;
    mount_post(&h.server, "/nexta_live/106925", "Smoke over Tikkurila").await;
    mount_chat(&h.server, r#"{"location": "Tikkurila, Vantaa"}"#, 1).await;
    mount_search(&h.server, tikkurila(), 1).await;
    mount_firms(&h.server, 200, 0).await;

    let result = h.pipeline.run(&request(POST_URL, false), 1, |_| {}).await;

    assert_eq!(result.status(), &RunStatus::Located);
    assert!(result.coordinate().is_some());
    assert!(result.fires().is_none());
}

#[tokio::test]
async fn all_fire_sources_failing_is_still_located() {
    let h = harness().await;
    mount_post(&h.server, "/nexta_live/106925", "Smoke over Tikkurila").await;
    mount_chat(&h.server, r#"{"location": "Tikkurila, Vantaa"}"#, 1).await;
    mount_search(&h.server, tikkurila(), 1).await;
    mount_firms(&h.server, 500, 4).await;

    let result = h.pipeline.run(&request(POST_URL, true), 1, |_| {}).await;

    assert_eq!(result.status(), &RunStatus::Located);
    assert_eq!(result.fires(), Some(&[][..]));
}

#[tokio::test]
async fn invalid_reference_fails_at_fetch() {
    let h = harness().await;
    mount_chat(&h.server, "{}", 0).await;

    let mut events = Vec::new();
    let result = h
        .pipeline
        .run(&request("https://example.com/post/1", false), 1, |p| {
            events.push(p);
        })
        .await;

    let RunStatus::Failed(failure) = result.status() else {
        panic!("expected failure, got: {:?}", result.status());
    };
    assert_eq!(failure.stage, Stage::Fetching);
    assert_eq!(failure.kind, FailureKind::InvalidReference);
    assert!(result.post_text().is_none());
    assert_eq!(events.last(), Some(&Progress::Percent(0)));
}

#[tokio::test]
async fn missing_post_page_fails_at_fetch() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/nexta_live/106925"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.server)
        .await;
    mount_chat(&h.server, "{}", 0).await;

    let result = h.pipeline.run(&request(POST_URL, false), 1, |_| {}).await;

    let RunStatus::Failed(failure) = result.status() else {
        panic!("expected failure, got: {:?}", result.status());
    };
    assert_eq!(failure.stage, Stage::Fetching);
    assert_eq!(failure.kind, FailureKind::FetchError);
}

#[tokio::test]
async fn empty_post_skips_extraction() {
    let h = harness().await;
    mount_post(&h.server, "/nexta_live/106925", " ").await;
    mount_chat(&h.server, "{}", 0).await;

    let result = h.pipeline.run(&request(POST_URL, true), 1, |_| {}).await;

    assert_eq!(
        result.status(),
        &RunStatus::NoLocation {
            reason: NoLocationReason::EmptyPost
        }
    );
    assert_eq!(result.post_text(), Some(&PostText::Empty));
    assert!(result.guess().is_none());
}

#[tokio::test]
async fn malformed_model_output_fails_at_extraction() {
    let h = harness().await;
    mount_post(&h.server, "/nexta_live/106925", "Smoke over Tikkurila").await;
    mount_chat(&h.server, "Tikkurila, probably", 1).await;
    mount_search(&h.server, tikkurila(), 0).await;

    let result = h.pipeline.run(&request(POST_URL, false), 1, |_| {}).await;

    let RunStatus::Failed(failure) = result.status() else {
        panic!("expected failure, got: {:?}", result.status());
    };
    assert_eq!(failure.stage, Stage::Extracting);
    assert_eq!(failure.kind, FailureKind::MalformedModelOutput);
    assert!(result.post_text().is_some());
    assert!(result.guess().is_none());
}

#[tokio::test]
async fn sentinel_guess_skips_geocoding() {
    let h = harness().await;
    mount_post(&h.server, "/nexta_live/106925", "Good morning everyone").await;
    mount_chat(&h.server, r#"{"location": "Not Found"}"#, 1).await;
    mount_search(&h.server, tikkurila(), 0).await;

    let result = h.pipeline.run(&request(POST_URL, true), 1, |_| {}).await;

    assert_eq!(
        result.status(),
        &RunStatus::NoLocation {
            reason: NoLocationReason::ModelFoundNothing
        }
    );
    assert!(result.guess().is_some());
    assert!(result.coordinate().is_none());
    assert!(result.fires().is_none());
}

#[tokio::test]
async fn unresolved_place_is_no_location_not_failure() {
    let h = harness().await;
    mount_post(&h.server, "/nexta_live/106925", "Strike on zzqx").await;
    mount_chat(&h.server, r#"{"location": "zzqxnonexistentplace123"}"#, 1).await;
    mount_search(&h.server, json!([]), 1).await;
    mount_firms(&h.server, 200, 0).await;

    let result = h.pipeline.run(&request(POST_URL, true), 1, |_| {}).await;

    assert_eq!(
        result.status(),
        &RunStatus::NoLocation {
            reason: NoLocationReason::Unresolved
        }
    );
    assert!(!result.status().is_failure());
    assert!(result.coordinate().is_none());
    assert!(result.fires().is_none());
}

#[tokio::test]
async fn geocoder_outage_fails_at_geocoding() {
    let h = harness().await;
    mount_post(&h.server, "/nexta_live/106925", "Smoke over Tikkurila").await;
    mount_chat(&h.server, r#"{"location": "Tikkurila, Vantaa"}"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let result = h.pipeline.run(&request(POST_URL, true), 1, |_| {}).await;

    let RunStatus::Failed(failure) = result.status() else {
        panic!("expected failure, got: {:?}", result.status());
    };
    assert_eq!(failure.stage, Stage::Geocoding);
    assert_eq!(failure.kind, FailureKind::GeocodingServiceError);
    assert!(failure.to_string().starts_with("geocoding: "));
    assert!(result.guess().is_some());
}

#[tokio::test]
async fn second_run_replaces_session_state() {
    let h = harness().await;
    mount_post(&h.server, "/nexta_live/106925", "Smoke over Tikkurila").await;
    mount_chat(&h.server, r#"{"location": "Tikkurila, Vantaa"}"#, 1).await;
    mount_search(&h.server, tikkurila(), 1).await;
    mount_firms(&h.server, 200, 4).await;
    Mock::given(method("GET"))
        .and(path("/nexta_live/999"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&h.server)
        .await;

    let mut session = Session::new(h.pipeline);
    assert!(session.current().is_none());

    let first = session.run(&request(POST_URL, true), |_| {}).await;
    assert_eq!(first.status(), &RunStatus::Located);
    assert!(first.fires().is_some());
    let first_id = first.run_id();

    session
        .run(&request("https://t.me/nexta_live/999", true), |_| {})
        .await;

    let current = session.current().expect("second result stored");
    assert_ne!(current.run_id(), first_id);
    assert_eq!(current.version(), 2);
    assert_eq!(session.runs(), 2);
    assert!(current.status().is_failure());
    assert!(current.coordinate().is_none());
    assert!(current.fires().is_none());
    assert!(current.guess().is_none());
}
