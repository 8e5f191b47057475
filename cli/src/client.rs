//! HTTP client for the storage and workflow endpoints.

use std::time::Duration;

use async_trait::async_trait;
use docflow_core::{
    endpoints, ApiError, ApiResult, BlobsPayload, DeleteOutcome, FileRef, JobStatus, Listing,
    Pause, StartedJob, StorageApi, UploadReceipt, UploadRequest,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

/// Backend used when neither `--api-url` nor `DOCFLOW_API_URL` is set
/// (local Functions host).
pub const DEFAULT_API_URL: &str = "http://localhost:7071";

#[derive(Clone, Debug)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// [`StorageApi`] over `reqwest`.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(settings: ClientSettings) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: settings.base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        endpoints::url(&self.base_url, path)
    }

    /// Status URIs are absolute in production; a relative one is resolved
    /// against the API base.
    fn resolve(&self, uri: &str) -> String {
        if uri.starts_with('/') {
            self.url(uri)
        } else {
            uri.to_string()
        }
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> ApiResult<String> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            log::debug!("HTTP {} body: {}", status, body);
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Terminate URIs carry a `reason={text}` placeholder; replace it.
fn terminate_url(uri: &str, reason: &str) -> ApiResult<Url> {
    let mut url =
        Url::parse(uri).map_err(|e| ApiError::Decode(format!("Bad terminate URI: {}", e)))?;
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "reason")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .append_pair("reason", reason)
        .extend_pairs(others);
    Ok(url)
}

#[async_trait(?Send)]
impl StorageApi for HttpApi {
    async fn list_files(&self) -> ApiResult<Listing> {
        let request = self.client.get(self.url(endpoints::LIST_FILES));
        self.send_json(request).await
    }

    async fn upload(&self, request: &UploadRequest) -> ApiResult<UploadReceipt> {
        let http = self.client.post(self.url(endpoints::UPLOAD)).json(request);
        let body = self.send(http).await?;
        if body.trim().is_empty() {
            return Ok(UploadReceipt {
                success: true,
                ..Default::default()
            });
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn delete(&self, files: &[FileRef]) -> ApiResult<DeleteOutcome> {
        let request = self
            .client
            .post(self.url(endpoints::DELETE))
            .json(&BlobsPayload { blobs: files });
        self.send_json(request).await
    }

    async fn start_workflow(&self, files: &[FileRef]) -> ApiResult<StartedJob> {
        let request = self
            .client
            .post(self.url(endpoints::START_WORKFLOW))
            .json(&BlobsPayload { blobs: files });
        self.send_json(request).await
    }

    async fn job_status(&self, status_uri: &str) -> ApiResult<JobStatus> {
        let request = self.client.get(self.resolve(status_uri));
        self.send_json(request).await
    }

    async fn terminate(&self, terminate_uri: &str, reason: &str) -> ApiResult<()> {
        let url = terminate_url(&self.resolve(terminate_uri), reason)?;
        match self.send(self.client.post(url)).await {
            Ok(_) => Ok(()),
            // Already finished: nothing left to terminate.
            Err(ApiError::Server { status: 410, .. }) => {
                log::info!("Job already finished, nothing to terminate");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// [`Pause`] backed by the tokio timer.
pub struct TokioPause;

#[async_trait(?Send)]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminate_url_replaces_placeholder() {
        let url = terminate_url(
            "https://fn.example.net/runtime/webhooks/durabletask/instances/abc/terminate\
             ?reason={text}&taskHub=hub&code=xyz",
            "Cancelled by user",
        )
        .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("reason".to_string(), "Cancelled by user".to_string()));
        assert!(pairs.contains(&("taskHub".to_string(), "hub".to_string())));
        assert!(pairs.contains(&("code".to_string(), "xyz".to_string())));
    }

    #[test]
    fn test_relative_status_uri_uses_base() {
        let api = HttpApi::new(ClientSettings {
            base_url: "http://localhost:7071/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            api.resolve("/runtime/status/abc"),
            "http://localhost:7071/runtime/status/abc"
        );
        assert_eq!(api.resolve("https://other/status"), "https://other/status");
    }
}
