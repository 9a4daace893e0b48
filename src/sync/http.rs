//! JSON-over-HTTP persistence (`GET/PUT {base}/{id}`, `POST {base}`)

use crate::attributes::Record;
use crate::config::ApiConfig;
use crate::error::{SyncError, SyncResult};
use crate::sync::Persistence;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

pub struct HttpPersistence {
    client: Client,
    base_url: Url,
}

impl HttpPersistence {
    /// Create a collaborator for the resource collection at `base_url`
    pub fn new(base_url: &str, request_timeout: Duration) -> SyncResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SyncError::configuration(format!(
                "Base URL cannot hold record paths: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| SyncError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(api: &ApiConfig) -> SyncResult<Self> {
        Self::new(&api.base_url, api.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of a single record, e.g. `http://localhost:3000/users/1`
    pub fn record_url(&self, id: u64) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    fn check_status(url: &Url, response: Response) -> SyncResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(SyncError::status(url.as_str(), status.as_u16()))
        }
    }
}

#[async_trait(?Send)]
impl<T: Record> Persistence<T> for HttpPersistence {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_record(&self, id: u64) -> SyncResult<T> {
        let url = self.record_url(id);
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let response = Self::check_status(&url, response)?;
        let body = response.text().await?;

        Ok(serde_json::from_str(&body)?)
    }

    async fn save_record(&self, record: &T) -> SyncResult<u64> {
        if let Some(id) = record.id() {
            let url = self.record_url(id);
            tracing::debug!("PUT {}", url);
            let response = self.client.put(url.clone()).json(record).send().await?;
            Self::check_status(&url, response)?;
            return Ok(id);
        }

        let url = self.base_url.clone();
        tracing::debug!("POST {}", url);
        let response = self.client.post(url.clone()).json(record).send().await?;
        let response = Self::check_status(&url, response)?;
        let body = response.text().await?;

        // The server echoes the created record, including its new id
        let created: T = serde_json::from_str(&body)?;
        created
            .id()
            .ok_or_else(|| SyncError::invalid_response("created record has no id"))
    }
}
