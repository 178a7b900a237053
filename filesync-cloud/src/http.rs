//! reqwest implementation of [`RemoteLogClient`].

use crate::api::{
    DeleteFromTrashRequest, DiffPage, MetadataScope, TrashRequest, UpdateMagicMetadataRequest,
};
use crate::config::ApiConfig;
use crate::error::{CloudError, CloudResult};
use crate::remote::RemoteLogClient;
use async_trait::async_trait;
use filesync_types::{CollectionId, Timestamp};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Header carrying the session token on every request.
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// HTTP client for the remote log API.
pub struct HttpRemoteLog {
    config: ApiConfig,
    client: Client,
}

impl HttpRemoteLog {
    /// Creates a client for the given API.
    pub fn new(config: ApiConfig) -> CloudResult<Self> {
        if config.base_url.is_empty() {
            return Err(CloudError::Config("base_url is empty".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

/// Maps a non-success response to a [`CloudError`].
async fn check_status(response: Response) -> CloudResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => {
            let body = response.text().await.unwrap_or_default();
            Err(CloudError::AuthFailed(body))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            Err(CloudError::RateLimited { retry_after_secs })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(CloudError::Api(format!("{status}: {body}")))
        }
    }
}

#[async_trait]
impl RemoteLogClient for HttpRemoteLog {
    async fn diff(
        &self,
        token: &str,
        collection_id: CollectionId,
        since_time: Timestamp,
    ) -> CloudResult<DiffPage> {
        debug!(%collection_id, %since_time, "fetching collection diff");
        let response = self
            .client
            .get(self.config.endpoint("/collections/v2/diff"))
            .header(AUTH_HEADER, token)
            .query(&[
                ("collectionID", collection_id.get()),
                ("sinceTime", since_time.as_micros()),
            ])
            .send()
            .await?;

        let page = check_status(response).await?.json::<DiffPage>().await?;
        Ok(page)
    }

    async fn trash(&self, token: &str, request: &TrashRequest) -> CloudResult<()> {
        debug!(count = request.items.len(), "trashing files");
        let response = self
            .client
            .post(self.config.endpoint("/files/trash"))
            .header(AUTH_HEADER, token)
            .json(request)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete_from_trash(
        &self,
        token: &str,
        request: &DeleteFromTrashRequest,
    ) -> CloudResult<()> {
        debug!(count = request.file_ids.len(), "deleting files from trash");
        let response = self
            .client
            .post(self.config.endpoint("/trash/delete"))
            .header(AUTH_HEADER, token)
            .json(request)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn update_magic_metadata(
        &self,
        token: &str,
        scope: MetadataScope,
        request: &UpdateMagicMetadataRequest,
    ) -> CloudResult<()> {
        debug!(%scope, count = request.metadata_list.len(), "updating magic metadata");
        let response = self
            .client
            .put(self.config.endpoint(scope.path()))
            .header(AUTH_HEADER, token)
            .json(request)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
