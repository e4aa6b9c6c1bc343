//! HTTP delivery tests against a mock backend.

use std::time::Duration;

use mockito::Matcher;
use serde_json::json;
use uuid::Uuid;

use rutina_core::{Event, ProgressReporter};

/// Give the transport task a moment to drain the queue.
async fn wait_for(mock: &mockito::Mock) {
    for _ in 0..100 {
        if mock.matched_async().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn delivers_series_report_once_despite_repeats() {
    let mut server = mockito::Server::new_async().await;
    let session_id = Uuid::new_v4();
    let mock = server
        .mock(
            "PUT",
            format!("/api/routines/sessions/{session_id}/exercise/0").as_str(),
        )
        .match_body(Matcher::Json(json!({
            "series_completed": 1,
            "status": "completed",
            "time_spent_seconds": 30,
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let base = format!("{}/api/routines", server.url());
    let mut reporter = ProgressReporter::http(session_id, &base).unwrap();
    reporter.report_series(0, 1, 30);
    reporter.report_series(0, 1, 30); // dropped locally, no second request

    wait_for(&mock).await;
    mock.assert_async().await;
    assert!(reporter.poll_warnings().is_empty());
}

#[tokio::test]
async fn delivers_outcome_and_finish() {
    let mut server = mockito::Server::new_async().await;
    let session_id = Uuid::new_v4();
    let outcome_mock = server
        .mock(
            "PUT",
            format!("/api/routines/sessions/{session_id}/exercise/2").as_str(),
        )
        .match_body(Matcher::Json(json!({
            "series_completed": 1,
            "status": "skipped",
            "time_spent_seconds": 42,
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let finish_mock = server
        .mock(
            "POST",
            format!("/api/routines/sessions/{session_id}/finish").as_str(),
        )
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let base = format!("{}/api/routines", server.url());
    let mut reporter = ProgressReporter::http(session_id, &base).unwrap();
    reporter.report_outcome(2, rutina_core::Outcome::Skipped, 1, 42);
    reporter.finish_session();

    wait_for(&finish_mock).await;
    outcome_mock.assert_async().await;
    finish_mock.assert_async().await;
}

#[tokio::test]
async fn delivers_warmup_time() {
    let mut server = mockito::Server::new_async().await;
    let session_id = Uuid::new_v4();
    let mock = server
        .mock(
            "POST",
            format!("/api/routines/sessions/{session_id}/warmup").as_str(),
        )
        .match_body(Matcher::Json(json!({ "warmup_time_seconds": 300 })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let base = format!("{}/api/routines", server.url());
    let mut reporter = ProgressReporter::http(session_id, &base).unwrap();
    reporter.report_warmup_time(300);

    wait_for(&mock).await;
    mock.assert_async().await;
}

#[tokio::test]
async fn backend_failure_surfaces_as_warning_not_error() {
    let mut server = mockito::Server::new_async().await;
    let session_id = Uuid::new_v4();
    let mock = server
        .mock(
            "PUT",
            format!("/api/routines/sessions/{session_id}/exercise/0").as_str(),
        )
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let base = format!("{}/api/routines", server.url());
    let mut reporter = ProgressReporter::http(session_id, &base).unwrap();
    reporter.report_series(0, 1, 30);

    wait_for(&mock).await;
    let mut warnings = reporter.poll_warnings();
    for _ in 0..100 {
        if !warnings.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        warnings = reporter.poll_warnings();
    }
    assert!(matches!(
        warnings.first(),
        Some(Event::ReportFailed { description, .. }) if description == "series 1 of exercise 0"
    ));
}

#[tokio::test]
async fn unreachable_backend_is_non_fatal() {
    // Nothing listens here; delivery fails, the reporter keeps working.
    let session_id = Uuid::new_v4();
    let mut reporter = ProgressReporter::http(session_id, "http://127.0.0.1:1/api").unwrap();
    reporter.report_series(0, 1, 30);

    let mut warnings = Vec::new();
    for _ in 0..200 {
        warnings = reporter.poll_warnings();
        if !warnings.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(matches!(warnings.first(), Some(Event::ReportFailed { .. })));
}
