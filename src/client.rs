// Runtime-data fetch: one GET against the configured endpoint, with HTTP
// cache busting for live reads and a short-TTL in-process snapshot for the
// rest.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use reqwest::header::CACHE_CONTROL;

use crate::error::FetchError;
use crate::models::RuntimeDataResponse;

/// Upstream requests slower than this count as network failures.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

struct Snapshot {
    fetched_at: Instant,
    payload: Arc<RuntimeDataResponse>,
}

/// HTTP client for the runtime-data endpoint. Callers that must see the
/// live upstream (the poller) bypass the snapshot cache, which also turns
/// on cache busting for any HTTP caches in between.
pub struct RuntimeClient {
    http: reqwest::Client,
    endpoint: String,
    cache_ttl: Duration,
    snapshot: Mutex<Option<Snapshot>>,
}

impl RuntimeClient {
    pub fn new(endpoint: impl Into<String>, cache_ttl: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            cache_ttl,
            snapshot: Mutex::new(None),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the runtime-data payload.
    ///
    /// With `bypass_cache` the request carries `_t=<epoch-ms>` plus
    /// `Cache-Control: no-cache` and the snapshot is skipped; without it, a
    /// snapshot younger than the TTL is returned directly. Successful
    /// payloads refresh the snapshot either way.
    pub async fn fetch(&self, bypass_cache: bool) -> Result<Arc<RuntimeDataResponse>, FetchError> {
        if !bypass_cache && let Some(cached) = self.fresh_snapshot() {
            return Ok(cached);
        }

        let mut request = self.http.get(&self.endpoint);
        if bypass_cache {
            let epoch_ms = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);
            request = request
                .query(&[("_t", epoch_ms.to_string())])
                .header(CACHE_CONTROL, "no-cache");
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;
        validate_shape(&value)?;
        let payload = Arc::new(serde_json::from_value::<RuntimeDataResponse>(value)?);

        self.store_snapshot(payload.clone());
        Ok(payload)
    }

    fn fresh_snapshot(&self) -> Option<Arc<RuntimeDataResponse>> {
        if self.cache_ttl.is_zero() {
            return None;
        }
        let guard = self.snapshot.lock().ok()?;
        let snapshot = guard.as_ref()?;
        (snapshot.fetched_at.elapsed() < self.cache_ttl).then(|| snapshot.payload.clone())
    }

    fn store_snapshot(&self, payload: Arc<RuntimeDataResponse>) {
        if self.cache_ttl.is_zero() {
            return;
        }
        if let Ok(mut guard) = self.snapshot.lock() {
            *guard = Some(Snapshot {
                fetched_at: Instant::now(),
                payload,
            });
        }
    }
}

/// Structural pass over the decoded JSON before typed deserialization, so a
/// wrong-shaped body reports the offending path instead of a serde field
/// error. Runs before anything is cached or returned.
fn validate_shape(value: &serde_json::Value) -> Result<(), FetchError> {
    let invalid = |msg: &str| FetchError::Validation(msg.to_string());

    let root = value.as_object().ok_or_else(|| invalid("root is not an object"))?;
    let meta = root
        .get("meta")
        .ok_or_else(|| invalid("missing `meta`"))?
        .as_object()
        .ok_or_else(|| invalid("`meta` is not an object"))?;
    if !meta.get("sources").is_some_and(|s| s.is_array()) {
        return Err(invalid("`meta.sources` is not a list"));
    }
    let data = root
        .get("data")
        .ok_or_else(|| invalid("missing `data`"))?
        .as_object()
        .ok_or_else(|| invalid("`data` is not an object"))?;
    for (date, points) in data {
        if !points.is_array() {
            return Err(FetchError::Validation(format!("`data.{date}` is not a list")));
        }
    }
    Ok(())
}
