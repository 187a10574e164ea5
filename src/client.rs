//! Google Drive API client for the item lifecycle calls.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, Client, Response, Url};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use crate::auth::Authenticator;
use crate::error::{DriveError, Result};
use crate::models::{ApiErrorResponse, DriveFile};
use crate::url_parser::is_valid_id;

/// Base URL for Google Drive API v3.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Upload URL for Google Drive API.
pub const UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Content to upload alongside a creation request.
#[derive(Debug)]
pub struct Media {
    file: File,
    content_type: String,
}

impl Media {
    /// `file` is streamed from its current position.
    pub fn new(file: File, content_type: impl Into<String>) -> Self {
        Self {
            file,
            content_type: content_type.into(),
        }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn into_file(self) -> File {
        self.file
    }
}

/// The remote calls the item lifecycle needs.
///
/// Every call opts into shared drive support and requests only `fields`.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Fetch item metadata by ID.
    async fn get_file(&self, file_id: &str, fields: &str) -> Result<DriveFile>;

    /// Create an item, uploading `media` as its content when given.
    async fn create_file(
        &self,
        metadata: &DriveFile,
        media: Option<Media>,
        fields: &str,
    ) -> Result<DriveFile>;

    /// Delete an item by ID.
    async fn delete_file(&self, file_id: &str) -> Result<()>;
}

/// reqwest-backed [`DriveApi`].
pub struct DriveClient {
    auth: Authenticator,
    http: Client,
    api_base: String,
    upload_base: String,
}

impl DriveClient {
    /// Create a client against the public Drive v3 endpoints.
    pub fn new(auth: Authenticator) -> Self {
        Self::with_base_urls(auth, DRIVE_API_BASE, UPLOAD_API_BASE)
    }

    /// Create a client against custom endpoints (proxies, test servers).
    pub fn with_base_urls(
        auth: Authenticator,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            http: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            upload_base: upload_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// `{api_base}/files/{file_id}`, with the ID added as a single escaped
    /// path segment.
    fn file_url(&self, file_id: &str) -> Result<Url> {
        if !is_valid_id(file_id) {
            return Err(DriveError::InvalidUrlOrId(file_id.to_string()));
        }

        let mut url = Url::parse(&self.api_base)
            .map_err(|err| DriveError::InvalidUrlOrId(format!("{}: {}", self.api_base, err)))?;
        url.path_segments_mut()
            .map_err(|_| DriveError::InvalidUrlOrId(self.api_base.clone()))?
            .pop_if_empty()
            .push("files")
            .push(file_id);
        Ok(url)
    }

    async fn create_metadata_only(&self, metadata: &DriveFile, fields: &str) -> Result<Response> {
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .post(format!("{}/files", self.api_base))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true"), ("fields", fields)])
            .json(metadata)
            .send()
            .await?;

        Ok(response)
    }

    /// Metadata and content in one `multipart/related` request, with the
    /// file streamed rather than buffered.
    async fn create_multipart(
        &self,
        metadata: &DriveFile,
        media: Media,
        fields: &str,
    ) -> Result<Response> {
        let token = self.auth.get_access_token().await?;
        let boundary = format!("gdrive_provider_{}", Uuid::new_v4().simple());

        let head = format!(
            "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{}\r\n--{boundary}\r\nContent-Type: {}\r\n\r\n",
            serde_json::to_string(metadata)?,
            media.content_type(),
        );
        let tail = format!("\r\n--{boundary}--");

        let body = stream::once(async move { Ok::<_, std::io::Error>(Bytes::from(head)) })
            .chain(ReaderStream::new(media.into_file()))
            .chain(stream::once(async move { Ok(Bytes::from(tail)) }));

        let response = self
            .http
            .post(format!("{}/files", self.upload_base))
            .bearer_auth(&token)
            .query(&[
                ("uploadType", "multipart"),
                ("supportsAllDrives", "true"),
                ("fields", fields),
            ])
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(Body::wrap_stream(body))
            .send()
            .await?;

        Ok(response)
    }
}

#[async_trait]
impl DriveApi for DriveClient {
    async fn get_file(&self, file_id: &str, fields: &str) -> Result<DriveFile> {
        let url = self.file_url(file_id)?;
        let token = self.auth.get_access_token().await?;
        debug!(file_id, fields, "getting drive item");

        let response = self
            .http
            .get(url)
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true"), ("fields", fields)])
            .send()
            .await?;

        let file: DriveFile = check_status(response).await?.json().await?;
        Ok(file)
    }

    async fn create_file(
        &self,
        metadata: &DriveFile,
        media: Option<Media>,
        fields: &str,
    ) -> Result<DriveFile> {
        debug!(
            name = %metadata.name,
            mime_type = metadata.mime_type.as_deref().unwrap_or("-"),
            with_content = media.is_some(),
            "creating drive item"
        );

        let response = match media {
            Some(media) => self.create_multipart(metadata, media, fields).await?,
            None => self.create_metadata_only(metadata, fields).await?,
        };

        let file: DriveFile = check_status(response).await?.json().await?;
        Ok(file)
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        let url = self.file_url(file_id)?;
        let token = self.auth.get_access_token().await?;
        debug!(file_id, "deleting drive item");

        let response = self
            .http
            .delete(url)
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true")])
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-success response into [`DriveError::ApiError`], preferring the
/// message from Google's error body when there is one.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return Err(DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        });
    }
    Err(DriveError::ApiError {
        status: status.as_u16(),
        message: error_body,
    })
}
