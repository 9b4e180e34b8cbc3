// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::Region;
use log::debug;
use s3up_core::{Context, Error, Result};
use serde::Deserialize;

/// Environment variable that selects the region.
pub const S3UP_REGION: &str = "S3UP_REGION";
/// Environment variable that overrides the region-templated endpoint.
pub const S3UP_SERVER_URL: &str = "S3UP_SERVER_URL";
/// Environment variable that sets the number of concurrent part uploads.
pub const S3UP_WORKERS: &str = "S3UP_WORKERS";
/// Environment variable that sets the chunk size in bytes.
pub const S3UP_CHUNK_SIZE: &str = "S3UP_CHUNK_SIZE";

/// Default number of concurrent part uploads.
pub const DEFAULT_WORKERS: usize = 5;
/// Default chunk size: 8 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 8 * 1024 * 1024;
/// Largest number of parts a multipart upload may have.
pub const MAX_PARTS: u64 = 10_000;
/// Service name used in the credential scope.
pub const SIGNING_SERVICE: &str = "s3";

/// Config for the object storage endpoint and the upload engine.
///
/// ```toml
/// region = "br-se-1"
/// # overrides the region-templated host
/// server_url = "http://localhost:9000"
/// workers = 5
/// chunk_size = 8388608
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Region of the endpoint, also used as the credential scope region.
    pub region: Region,
    /// Explicit endpoint that takes precedence over the region template.
    pub server_url: Option<String>,
    /// Number of workers uploading parts concurrently.
    pub workers: usize,
    /// Size in bytes of every part except the last.
    pub chunk_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::default(),
            server_url: None,
            workers: DEFAULT_WORKERS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Load the default config with the `S3UP_*` environment variables applied.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        Self::default().overlay_env(ctx)
    }

    /// Overlay the `S3UP_*` environment variables on top of this config.
    pub fn overlay_env(mut self, ctx: &Context) -> Result<Self> {
        if let Some(v) = ctx.env_var(S3UP_REGION) {
            self.region = v.parse()?;
        }
        if let Some(v) = ctx.env_var(S3UP_SERVER_URL) {
            self.server_url = (!v.is_empty()).then_some(v);
        }
        if let Some(v) = ctx.env_var(S3UP_WORKERS) {
            self.workers = v.trim().parse().map_err(|e| {
                Error::config_invalid(format!("{S3UP_WORKERS} is not a number: {v}")).with_source(e)
            })?;
        }
        if let Some(v) = ctx.env_var(S3UP_CHUNK_SIZE) {
            self.chunk_size = v.trim().parse().map_err(|e| {
                Error::config_invalid(format!("{S3UP_CHUNK_SIZE} is not a number: {v}"))
                    .with_source(e)
            })?;
        }

        debug!("config loaded from env: {self:?}");
        Ok(self)
    }

    /// Load the config from a TOML file. Missing fields take their defaults.
    pub async fn from_file(ctx: &Context, path: &str) -> Result<Self> {
        let path = ctx.expand_home_dir(path).unwrap_or_else(|| path.to_string());
        let content = ctx.file_read_as_string(&path).await?;
        let cfg: Config = toml::from_str(&content).map_err(|e| {
            Error::config_invalid(format!("failed to parse config file {path}")).with_source(e)
        })?;

        debug!("config loaded from {path}: {cfg:?}");
        Ok(cfg)
    }

    /// Reject values the upload engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::config_invalid("workers must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(Error::config_invalid("chunk size must be at least 1 byte"));
        }
        if let Some(url) = &self.server_url {
            let uri: http::Uri = url.parse().map_err(|e| {
                Error::config_invalid(format!("server url {url} is invalid")).with_source(e)
            })?;
            if uri.scheme().is_none() || uri.authority().is_none() {
                return Err(Error::config_invalid(format!(
                    "server url {url} must have a scheme and a host"
                )));
            }
        }
        Ok(())
    }

    /// The endpoint requests are sent to, without a trailing slash.
    pub fn endpoint(&self) -> String {
        match &self.server_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => self.region.endpoint(),
        }
    }

    /// Number of parts a file of `size` bytes is split into.
    pub fn chunk_count(&self, size: u64) -> u64 {
        size.div_ceil(self.chunk_size)
    }
}
