//! Runtime used by clients generated with `oas3-client-gen`.
//!
//! Generated code only talks to [`RequestHandler`] and [`ApiError`]; the
//! `chrono` and `serde_json` re-exports let generated types name date and
//! free-form values without extra dependencies in the consuming crate.

pub use chrono;
pub use http::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
pub use serde_json;

/// Errors surfaced by generated client methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("server responded with {status}: {body}")]
  Status { status: StatusCode, body: String },
  #[error("failed to decode response body: {0}")]
  Decode(#[from] serde_json::Error),
  #[error("response carried no payload")]
  MissingBody,
}

impl ApiError {
  /// Returns the HTTP status when the server answered with a non-success code.
  #[must_use]
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Status { status, .. } => Some(*status),
      Self::Transport(err) => err.status(),
      Self::Decode(_) | Self::MissingBody => None,
    }
  }
}

/// Sends JSON requests relative to a base URL.
#[derive(Debug, Clone)]
pub struct RequestHandler {
  client: reqwest::Client,
  base_url: String,
}

impl RequestHandler {
  #[must_use]
  pub fn new(base_url: impl Into<String>) -> Self {
    Self::with_client(reqwest::Client::new(), base_url)
  }

  #[must_use]
  pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
    Self {
      client,
      base_url: base_url.into(),
    }
  }

  #[must_use]
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Joins the base URL and a rendered route without doubling the separator.
  #[must_use]
  pub fn url(&self, path: &str) -> String {
    join_url(&self.base_url, path)
  }

  /// Sends one request and decodes the JSON payload, if the server sent one.
  pub async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Option<T>, ApiError>
  where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    let response = self.dispatch(method, path, body).await?;
    let status = response.status();
    let bytes = response.bytes().await?;
    decode_body(status, &bytes)
  }

  /// Sends one request whose response carries no payload worth decoding.
  pub async fn execute<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ApiError>
  where
    B: Serialize + ?Sized,
  {
    let response = self.dispatch(method, path, body).await?;
    let status = response.status();
    if status.is_success() {
      return Ok(());
    }
    let bytes = response.bytes().await?;
    Err(ApiError::Status {
      status,
      body: String::from_utf8_lossy(&bytes).into_owned(),
    })
  }

  async fn dispatch<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<reqwest::Response, ApiError>
  where
    B: Serialize + ?Sized,
  {
    let mut request = self.client.request(method, self.url(path));
    if let Some(body) = body {
      request = request.json(body);
    }
    Ok(request.send().await?)
  }
}

/// Interprets a response body.
///
/// Non-success statuses become [`ApiError::Status`]. A `204 No Content` or a
/// blank body yields `Ok(None)` so callers can decide what absence means for
/// their response shape.
pub fn decode_body<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<Option<T>, ApiError> {
  if !status.is_success() {
    return Err(ApiError::Status {
      status,
      body: String::from_utf8_lossy(bytes).into_owned(),
    });
  }

  if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
    return Ok(None);
  }

  Ok(Some(serde_json::from_slice(bytes)?))
}

fn join_url(base_url: &str, path: &str) -> String {
  let base = base_url.trim_end_matches('/');
  if path.is_empty() {
    return base.to_string();
  }
  if path.starts_with('/') {
    format!("{base}{path}")
  } else {
    format!("{base}/{path}")
  }
}
