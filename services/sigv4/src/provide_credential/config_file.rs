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

use crate::constants::{DEFAULT_CREDENTIALS_FILE, S3UP_CREDENTIALS_FILE};
use crate::Credential;
use async_trait::async_trait;
use log::debug;
use s3up_core::{Context, Error, ProvideCredential, Result};
use serde::Deserialize;

/// ConfigFileCredentialProvider loads credentials from a TOML file.
///
/// The file is looked up at, in order:
///
/// 1. The path given via `with_path()`
/// 2. The `S3UP_CREDENTIALS_FILE` environment variable
/// 3. `~/.config/s3up/credentials.toml`
///
/// ```toml
/// access_key_id = "..."
/// secret_access_key = "..."
/// # optional
/// session_token = "..."
/// ```
///
/// A missing file yields no credential; a file that cannot be parsed is an
/// error.
#[derive(Debug, Default, Clone)]
pub struct ConfigFileCredentialProvider {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CredentialFile {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    session_token: Option<String>,
}

impl ConfigFileCredentialProvider {
    /// Create a new ConfigFileCredentialProvider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path to the credentials file.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for ConfigFileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let path = if let Some(path) = &self.path {
            path.clone()
        } else if let Some(path) = ctx.env_var(S3UP_CREDENTIALS_FILE) {
            path
        } else {
            DEFAULT_CREDENTIALS_FILE.to_string()
        };

        let Some(expanded_path) = ctx.expand_home_dir(&path) else {
            debug!("failed to expand homedir for path: {path}");
            return Ok(None);
        };

        let content = match ctx.file_read_as_string(&expanded_path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("failed to read credentials file {expanded_path}: {err:?}");
                return Ok(None);
            }
        };

        let file: CredentialFile = toml::from_str(&content).map_err(|e| {
            Error::config_invalid(format!("failed to parse credentials file {expanded_path}"))
                .with_source(e)
        })?;

        match (file.access_key_id, file.secret_access_key) {
            (Some(ak), Some(sk)) => Ok(Some(Credential {
                access_key_id: ak,
                secret_access_key: sk,
                session_token: file.session_token,
            })),
            _ => {
                debug!("credentials file {expanded_path} has no access key pair");
                Ok(None)
            }
        }
    }
}
