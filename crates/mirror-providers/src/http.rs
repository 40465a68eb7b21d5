use mirror_core::error::UpstreamError;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use reqwest::{RequestBuilder, Response};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) async fn send_classified(
    builder: RequestBuilder,
    what: &str,
) -> Result<Response, UpstreamError> {
    let response = builder
        .send()
        .await
        .map_err(|err| UpstreamError::Network(format!("{what}: {err}")))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let err = classify_status(status, response.headers(), what);
    let _ = response.bytes().await;
    Err(err)
}

pub(crate) fn classify_status(
    status: StatusCode,
    headers: &HeaderMap,
    what: &str,
) -> UpstreamError {
    if status == StatusCode::NOT_FOUND {
        return UpstreamError::NotFound {
            what: what.to_string(),
        };
    }
    if status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && ratelimit_exhausted(headers))
    {
        return UpstreamError::RateLimited {
            reset_at: ratelimit_reset(headers).or_else(|| retry_after_deadline(headers)),
        };
    }
    UpstreamError::Network(format!("{what}: HTTP {status}"))
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

fn ratelimit_exhausted(headers: &HeaderMap) -> bool {
    header_u64(headers, "x-ratelimit-remaining") == Some(0)
}

fn ratelimit_reset(headers: &HeaderMap) -> Option<u64> {
    header_u64(headers, "x-ratelimit-reset")
}

fn retry_after_deadline(headers: &HeaderMap) -> Option<u64> {
    let delay = header_u64(headers, "retry-after")?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    Some(now.saturating_add(delay))
}
