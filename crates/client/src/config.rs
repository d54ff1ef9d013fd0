// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Connection settings for the remote services.

use std::time::Duration;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for the parking API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every action is posted to.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Operator session token.
    pub bearer_token: Option<String>,
}

impl ClientConfig {
    /// Creates a configuration with the default timeout and no token.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().to_string(),
            timeout: DEFAULT_TIMEOUT,
            bearer_token: None,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the operator session token. A blank token is ignored.
    #[must_use]
    pub fn with_bearer_token(mut self, token: &str) -> Self {
        let token: &str = token.trim();
        self.bearer_token = (!token.is_empty()).then(|| token.to_string());
        self
    }

    /// Returns whether a base URL has been supplied.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }
}

/// Settings for the image store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// URL objects are uploaded under.
    pub upload_url: String,
    /// URL objects are served from, when it differs from `upload_url`.
    pub public_url: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Credential sent with each upload.
    pub token: Option<String>,
}

impl StorageConfig {
    /// Creates a configuration serving objects from the upload URL.
    #[must_use]
    pub fn new(upload_url: &str) -> Self {
        Self {
            upload_url: upload_url.trim().trim_end_matches('/').to_string(),
            public_url: None,
            timeout: DEFAULT_TIMEOUT,
            token: None,
        }
    }

    /// Serves uploaded objects from `public_url`.
    #[must_use]
    pub fn with_public_url(mut self, public_url: &str) -> Self {
        self.public_url = Some(public_url.trim().trim_end_matches('/').to_string());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the upload credential. A blank token is ignored.
    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        let token: &str = token.trim();
        self.token = (!token.is_empty()).then(|| token.to_string());
        self
    }

    /// Returns the public URL of the object stored under `key`.
    #[must_use]
    pub fn public_url_for(&self, key: &str) -> String {
        let base: &str = self.public_url.as_deref().unwrap_or(&self.upload_url);
        format!("{base}/{key}")
    }
}
