// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP image store.
//!
//! Images are `PUT` under `<folder>/<unix-timestamp>_<random>.<ext>` and
//! served from the configured public URL.

use crate::config::StorageConfig;
use crate::error::ClientError;
use parkdesk::{ObjectStorage, ServiceError};
use parkdesk_domain::{ImageFolder, ImageRef, ImageUpload, validate_image_upload};
use reqwest::header::CONTENT_TYPE;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Builds a fresh object key for `upload` in `folder`.
#[must_use]
pub fn object_key(folder: ImageFolder, upload: &ImageUpload) -> String {
    let timestamp: i64 = OffsetDateTime::now_utc().unix_timestamp();
    format!(
        "{}/{timestamp}_{}.{}",
        folder.as_str(),
        rand::random::<u64>(),
        upload.extension()
    )
}

/// Image store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpObjectStorage {
    http: reqwest::Client,
    config: StorageConfig,
}

impl HttpObjectStorage {
    /// Creates a store client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorageConfig) -> Result<Self, ClientError> {
        let http: reqwest::Client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Returns the store's configuration.
    #[must_use]
    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Validates and uploads an image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is invalid (nothing is sent), the store
    /// is not configured, or the upload fails.
    pub async fn put_image(
        &self,
        upload: &ImageUpload,
        folder: ImageFolder,
    ) -> Result<ImageRef, ClientError> {
        validate_image_upload(upload)?;
        if self.config.upload_url.is_empty() {
            return Err(ClientError::NotConfigured);
        }

        let key: String = object_key(folder, upload);
        let url: String = format!("{}/{key}", self.config.upload_url);
        debug!(key = %key, size = upload.size(), mime = %upload.mime_type, "Uploading image");

        let mut request = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, upload.mime_type.as_str())
            .body(upload.bytes.clone());
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response: reqwest::Response = request
            .send()
            .await
            .map_err(ClientError::from)
            .inspect_err(|err| warn!(key = %key, error = %err, "Image upload failed"))?;
        let status = response.status();
        if !status.is_success() {
            warn!(key = %key, status = status.as_u16(), "Image store refused upload");
            return Err(ClientError::Upload {
                status: status.as_u16(),
            });
        }

        let public: String = self.config.public_url_for(&key);
        info!(url = %public, "Image uploaded");
        Ok(ImageRef::new(&public))
    }
}

impl ObjectStorage for HttpObjectStorage {
    async fn upload_image(
        &self,
        upload: &ImageUpload,
        folder: ImageFolder,
    ) -> Result<ImageRef, ServiceError> {
        Ok(self.put_image(upload, folder).await?)
    }
}
