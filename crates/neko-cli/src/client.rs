//! Async HTTP client wrapping the neko JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use neko_core::cat::CatProfile;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Connection settings for the neko API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the neko JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  // ── Cats ──────────────────────────────────────────────────────────────────

  /// `GET /api/cats`
  pub async fn list_cats(&self) -> Result<Vec<CatProfile>> {
    let resp = self.client.get(self.url("/cats")).send().await?;
    json_or_error(resp).await
  }

  /// `GET /api/cats/{id}`
  pub async fn get_cat(&self, id: i64) -> Result<CatProfile> {
    let resp = self.client.get(self.url(&format!("/cats/{id}"))).send().await?;
    json_or_error(resp).await
  }

  /// `POST /api/cats`
  pub async fn create_cat(&self, body: &Value) -> Result<CatProfile> {
    let resp = self.client.post(self.url("/cats")).json(body).send().await?;
    json_or_error(resp).await
  }

  /// `PUT /api/cats/{id}`
  pub async fn update_cat(&self, id: i64, body: &Value) -> Result<CatProfile> {
    let resp = self
      .client
      .put(self.url(&format!("/cats/{id}")))
      .json(body)
      .send()
      .await?;
    json_or_error(resp).await
  }

  /// `DELETE /api/cats/{id}`
  pub async fn delete_cat(&self, id: i64) -> Result<()> {
    let resp = self.client.delete(self.url(&format!("/cats/{id}"))).send().await?;
    json_or_error::<Value>(resp).await.map(drop)
  }
}

/// Decode a success body, or turn a failure into the server's `error`
/// string, falling back to `HTTP <status>`.
async fn json_or_error<T: DeserializeOwned>(resp: Response) -> Result<T> {
  let status = resp.status();
  if status.is_success() {
    return resp.json().await.context("decoding response body");
  }
  let message = resp
    .json::<Value>()
    .await
    .ok()
    .and_then(|body| body.get("error")?.as_str().map(str::to_owned))
    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
  Err(anyhow!(message))
}
