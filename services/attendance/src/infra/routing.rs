//! Routed-distance client for the Google Distance Matrix JSON API.

use anyhow::{Context as _, anyhow};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use muster_domain::geo::Coordinate;

use crate::config::RoutingConfig;
use crate::domain::repository::RoutingPort;
use crate::error::AttendanceServiceError;

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<DistanceMatrixRow>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixRow {
    #[serde(default)]
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixElement {
    status: String,
    distance: Option<DistanceValue>,
}

#[derive(Debug, Deserialize)]
struct DistanceValue {
    /// Meters.
    value: f64,
}

/// Pull the single origin/destination distance out of a provider response.
fn distance_from_response(body: DistanceMatrixResponse) -> anyhow::Result<f64> {
    if body.status != "OK" {
        let detail = body.error_message.unwrap_or_default();
        return Err(anyhow!("provider status {}: {detail}", body.status));
    }
    let element = body
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .context("provider returned no elements")?;
    if element.status != "OK" {
        return Err(anyhow!("element status {}", element.status));
    }
    element
        .distance
        .map(|d| d.value)
        .context("element has no distance")
}

enum AttemptError {
    /// Transport failure, timeout, 5xx or 429.
    Retryable(anyhow::Error),
    Terminal(anyhow::Error),
}

#[derive(Clone)]
pub struct DistanceMatrixClient {
    http: reqwest::Client,
    config: RoutingConfig,
}

impl DistanceMatrixClient {
    pub fn new(config: RoutingConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn request_url(&self, key: &str, from: Coordinate, to: Coordinate) -> anyhow::Result<Url> {
        Url::parse_with_params(
            &self.config.base_url,
            &[
                ("origins", from.to_query_value()),
                ("destinations", to.to_query_value()),
                ("key", key.to_owned()),
            ],
        )
        .context("build distance matrix url")
    }

    async fn attempt(&self, url: &Url) -> Result<f64, AttemptError> {
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                AttemptError::Retryable(anyhow!(e).context("send distance matrix request"))
            })?;

        let status = resp.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::Retryable(anyhow!("provider returned {status}")));
        }
        if !status.is_success() {
            return Err(AttemptError::Terminal(anyhow!("provider returned {status}")));
        }

        let body = resp.json::<DistanceMatrixResponse>().await.map_err(|e| {
            let retryable = e.is_timeout();
            let e = anyhow!(e).context("decode distance matrix response");
            if retryable {
                AttemptError::Retryable(e)
            } else {
                AttemptError::Terminal(e)
            }
        })?;
        distance_from_response(body).map_err(AttemptError::Terminal)
    }
}

impl RoutingPort for DistanceMatrixClient {
    async fn routed_meters(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<f64, AttendanceServiceError> {
        let key = self.config.api_key.as_deref().ok_or_else(|| {
            AttendanceServiceError::Upstream(anyhow!("ROUTING_API_KEY is not set"))
        })?;
        let url = self
            .request_url(key, from, to)
            .map_err(AttendanceServiceError::Upstream)?;

        let mut retry = 0;
        loop {
            match self.attempt(&url).await {
                Ok(meters) => return Ok(meters),
                Err(AttemptError::Retryable(e)) if retry < self.config.max_retries => {
                    retry += 1;
                    let delay = self.config.backoff_for(retry);
                    tracing::warn!(
                        error = %e,
                        retry,
                        delay_ms = delay.as_millis() as u64,
                        "routing provider attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(AttemptError::Retryable(e) | AttemptError::Terminal(e)) => {
                    return Err(AttendanceServiceError::Upstream(e));
                }
            }
        }
    }
}
