//! HTTP service for the storage and workflow endpoints.

use async_trait::async_trait;
use docflow_core::{
    endpoints, ApiError, ApiResult, BlobsPayload, DeleteOutcome, FileRef, JobStatus, Listing,
    StartedJob, StorageApi, UploadReceipt, UploadRequest,
};
use gloo_net::http::{Request, Response};

use crate::config::API_BASE;

/// [`StorageApi`] over the browser `fetch`.
#[derive(Clone, Debug)]
pub struct GlooApi {
    base_url: String,
}

impl Default for GlooApi {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

impl GlooApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        endpoints::url(&self.base_url, path)
    }
}

/// Keep the body of a 2xx response, turn anything else into an [`ApiError`].
fn check_status(status: u16, body: String) -> ApiResult<String> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        log::debug!("HTTP {} body: {}", status, body);
        Err(ApiError::from_response(status, &body))
    }
}

fn network(e: gloo_net::Error) -> ApiError {
    ApiError::Network(format!("HTTP request failed: {}", e))
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Terminate URIs carry a `reason={text}` placeholder.
fn fill_reason(uri: &str, encoded_reason: &str) -> String {
    uri.replace("{text}", encoded_reason)
}

async fn read(response: Response) -> ApiResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(format!("Failed to read response: {}", e)))?;
    check_status(status, body)
}

async fn post_json<B: serde::Serialize>(url: &str, body: &B) -> ApiResult<String> {
    let request = Request::post(url)
        .json(body)
        .map_err(|e| ApiError::Decode(format!("Failed to build request: {}", e)))?;
    let response = request.send().await.map_err(network)?;
    read(response).await
}

async fn get(url: &str) -> ApiResult<String> {
    let response = Request::get(url).send().await.map_err(network)?;
    read(response).await
}

#[async_trait(?Send)]
impl StorageApi for GlooApi {
    async fn list_files(&self) -> ApiResult<Listing> {
        decode(&get(&self.url(endpoints::LIST_FILES)).await?)
    }

    async fn upload(&self, request: &UploadRequest) -> ApiResult<UploadReceipt> {
        let body = post_json(&self.url(endpoints::UPLOAD), request).await?;
        if body.trim().is_empty() {
            return Ok(UploadReceipt {
                success: true,
                ..Default::default()
            });
        }
        decode(&body)
    }

    async fn delete(&self, files: &[FileRef]) -> ApiResult<DeleteOutcome> {
        let body = post_json(&self.url(endpoints::DELETE), &BlobsPayload { blobs: files }).await?;
        decode(&body)
    }

    async fn start_workflow(&self, files: &[FileRef]) -> ApiResult<StartedJob> {
        let body = post_json(
            &self.url(endpoints::START_WORKFLOW),
            &BlobsPayload { blobs: files },
        )
        .await?;
        decode(&body)
    }

    async fn job_status(&self, status_uri: &str) -> ApiResult<JobStatus> {
        decode(&get(status_uri).await?)
    }

    async fn terminate(&self, terminate_uri: &str, reason: &str) -> ApiResult<()> {
        let encoded = String::from(js_sys::encode_uri_component(reason));
        let url = fill_reason(terminate_uri, &encoded);
        let response = Request::post(&url).send().await.map_err(network)?;
        match read(response).await {
            Ok(_) => Ok(()),
            Err(ApiError::Server { status: 410, .. }) => {
                log::info!("Job already finished, nothing to terminate");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
