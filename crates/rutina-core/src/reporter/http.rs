//! HTTP transport for progress reports.
//!
//! Mirrors the backend's session endpoints:
//!
//! - `PUT  {base}/sessions/{id}/exercise/{order}` with
//!   `{ series_completed, status, time_spent_seconds }`
//! - `POST {base}/sessions/{id}/warmup` with `{ warmup_time_seconds }`
//! - `POST {base}/sessions/{id}/finish`

use chrono::Utc;
use reqwest::Client;
use serde_json::json;
use tokio::sync::mpsc;
use url::Url;
use uuid::Uuid;

use crate::error::ReportError;
use crate::events::Event;
use crate::reporter::ReportRequest;

/// Delivers queued reports to the backend over HTTP, one attempt each.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    session_id: Uuid,
}

impl HttpBackend {
    pub fn new(base_url: &str, session_id: Uuid) -> Result<Self, ReportError> {
        // Url::join drops the last path segment without a trailing slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Ok(Self {
            client: Client::new(),
            base_url: Url::parse(&normalized)?,
            session_id,
        })
    }

    pub async fn deliver(&self, request: &ReportRequest) -> Result<(), ReportError> {
        match request {
            ReportRequest::Series {
                exercise_order,
                series_index,
                seconds_spent,
            } => {
                let body = json!({
                    "series_completed": series_index,
                    "status": "completed",
                    "time_spent_seconds": seconds_spent,
                });
                self.put_exercise(*exercise_order, &body).await
            }
            ReportRequest::Outcome {
                exercise_order,
                status,
                series_completed,
                seconds_spent,
            } => {
                let body = json!({
                    "series_completed": series_completed,
                    "status": status.as_str(),
                    "time_spent_seconds": seconds_spent,
                });
                self.put_exercise(*exercise_order, &body).await
            }
            ReportRequest::WarmupTime { seconds } => {
                let url = self.session_url("warmup")?;
                let body = json!({ "warmup_time_seconds": seconds });
                let resp = self.client.post(url).json(&body).send().await?;
                check_status(resp.status())
            }
            ReportRequest::FinishSession => {
                let url = self.session_url("finish")?;
                let resp = self.client.post(url).send().await?;
                check_status(resp.status())
            }
        }
    }

    async fn put_exercise(
        &self,
        exercise_order: usize,
        body: &serde_json::Value,
    ) -> Result<(), ReportError> {
        let url = self
            .base_url
            .join(&format!("sessions/{}/exercise/{exercise_order}", self.session_id))?;
        let resp = self.client.put(url).json(body).send().await?;
        check_status(resp.status())
    }

    fn session_url(&self, suffix: &str) -> Result<Url, ReportError> {
        Ok(self
            .base_url
            .join(&format!("sessions/{}/{suffix}", self.session_id))?)
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), ReportError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ReportError::Rejected {
            status: status.as_u16(),
        })
    }
}

/// Transport task: drains the queue, delivers each report once, and turns
/// failures into warning events. Ends when the reporter handle is dropped.
pub(crate) async fn pump(
    mut rx: mpsc::UnboundedReceiver<ReportRequest>,
    backend: HttpBackend,
    warnings: mpsc::UnboundedSender<Event>,
) {
    while let Some(request) = rx.recv().await {
        if let Err(error) = backend.deliver(&request).await {
            tracing::warn!(%error, report = %request.describe(), "progress report failed");
            let _ = warnings.send(Event::ReportFailed {
                description: request.describe(),
                error: error.to_string(),
                at: Utc::now(),
            });
        }
    }
}
