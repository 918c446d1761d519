//! Request construction and response classification.

use hps_core::error::extract_detail;
use hps_core::session::SessionState;
use hps_core::{HpsError, Result};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Parses and checks the configured base URL.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url.trim_end_matches('/'))
        .map_err(|e| HpsError::config(format!("Invalid API base URL '{}': {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(HpsError::config(format!(
            "API base URL '{}' cannot carry paths",
            base_url
        )));
    }
    Ok(url)
}

/// Appends path segments to the base URL, percent-encoding each one.
///
/// A trailing `""` segment produces a trailing slash (`/models/`).
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| HpsError::config(format!("API base URL '{}' cannot carry paths", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Adds the bearer header when a token is present.
pub(crate) fn authorize(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Sends the request and turns every non-2xx status into an error.
///
/// A 401 ends the current session before the error is returned.
pub(crate) async fn send(builder: RequestBuilder, session: &SessionState) -> Result<Response> {
    let response = builder
        .send()
        .await
        .map_err(|e| HpsError::network(e.to_string()))?;

    let status = response.status();
    debug!("[Http] {} {}", status.as_u16(), response.url().path());
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body);

    if status == StatusCode::UNAUTHORIZED {
        session.invalidate();
        return Err(HpsError::Unauthorized { detail });
    }

    warn!(
        "[Http] Request failed with {}: {}",
        status.as_u16(),
        detail.as_deref().unwrap_or("no detail")
    );
    Err(HpsError::http(status.as_u16(), detail))
}

/// Reads a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = read_bytes(response).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Reads a binary body.
pub(crate) async fn read_bytes(response: Response) -> Result<Vec<u8>> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| HpsError::network(format!("Failed to read response body: {}", e)))?;
    Ok(bytes.to_vec())
}
