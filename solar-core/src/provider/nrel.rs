use anyhow::Context;
use chrono::Utc;
use reqwest::Url;
use serde::Deserialize;

use crate::{
    error::QueryError,
    model::{Revision, SolarQuery, SolarResult},
};

use super::HttpTransport;

pub const DEFAULT_BASE_URL: &str = "https://developer.nrel.gov/api";

const RESOURCE_PATH: &str = "solar/solar_resource/v1.json";

/// Client for the NREL solar resource endpoint.
#[derive(Debug)]
pub struct NrelClient {
    base_url: String,
    transport: Box<dyn HttpTransport>,
}

impl NrelClient {
    pub fn new(base_url: impl Into<String>, transport: Box<dyn HttpTransport>) -> Self {
        Self { base_url: base_url.into(), transport }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One GET for `query`, projected through `revision`.
    pub async fn fetch(
        &self,
        query: &SolarQuery,
        revision: Revision,
    ) -> Result<SolarResult, QueryError> {
        let url = resource_url(&self.base_url, query);
        Url::parse(&url).with_context(|| {
            format!("Invalid request URL: {}", redact_key(&url, &query.credential))
        })?;

        tracing::debug!(url = %redact_key(&url, &query.credential), %revision, "requesting solar resource");

        let reply = self.transport.get(&url).await.map_err(|err| {
            tracing::warn!("solar resource request did not complete: {err:#}");
            QueryError::TransportFailure
        })?;

        if !reply.is_success() {
            tracing::warn!(
                status = reply.status,
                body = %truncate_body(&reply.body),
                "solar resource request failed"
            );
            return Err(QueryError::TransportFailure);
        }

        parse_resource(&reply.body, revision)
    }
}

/// Builds the request URL. Inputs are interpolated verbatim.
pub fn resource_url(base_url: &str, query: &SolarQuery) -> String {
    format!(
        "{}/{RESOURCE_PATH}?api_key={}&lat={}&lon={}",
        base_url.trim_end_matches('/'),
        query.credential,
        query.latitude,
        query.longitude,
    )
}

/// Projects a 2xx response body into a [`SolarResult`].
///
/// DNI is required. GHI is read only when `revision` displays it and is
/// independently optional.
pub fn parse_resource(body: &str, revision: Revision) -> Result<SolarResult, QueryError> {
    let parsed: NrelResponse =
        serde_json::from_str(body).context("Failed to parse NREL solar resource JSON")?;

    if !parsed.errors.is_empty() {
        tracing::debug!(errors = ?parsed.errors, "NREL reported errors");
    }

    let (dni, ghi) = match parsed.outputs {
        Some(NrelOutputs::Metrics { avg_dni, avg_ghi }) => {
            (avg_dni.and_then(NrelMetric::annual), avg_ghi.and_then(NrelMetric::annual))
        }
        Some(NrelOutputs::Other(_)) | None => (None, None),
    };

    let dni_kwh_m2_day = dni.ok_or(QueryError::DataUnavailable)?;
    let ghi_kwh_m2_day = if revision.reads_ghi() { ghi } else { None };

    Ok(SolarResult { dni_kwh_m2_day, ghi_kwh_m2_day, fetched_at: Utc::now() })
}

#[derive(Debug, Deserialize)]
struct NrelResponse {
    #[serde(default)]
    errors: Vec<String>,
    outputs: Option<NrelOutputs>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NrelOutputs {
    Metrics { avg_dni: Option<NrelMetric>, avg_ghi: Option<NrelMetric> },
    // e.g. `[]` when the request was rejected
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NrelMetric {
    Values { annual: Option<f64> },
    // uncovered locations report `"no data"`
    Other(serde_json::Value),
}

impl NrelMetric {
    fn annual(self) -> Option<f64> {
        match self {
            NrelMetric::Values { annual } => annual,
            NrelMetric::Other(_) => None,
        }
    }
}

fn redact_key(url: &str, key: &str) -> String {
    if key.is_empty() { url.to_string() } else { url.replace(key, "***") }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
