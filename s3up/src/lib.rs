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

//! Sign requests and upload files to S3 compatible object storage.
//!
//! This crate ties the workspace together:
//!
//! - [`sigv4`] signs requests.
//! - [`object_storage`] picks between a single PUT and a multipart upload and
//!   runs it.
//! - [`default_context`] wires the tokio file reader, the reqwest transport
//!   and the OS environment (feature `default-context`, on by default).
//!
//! ## Example
//!
//! ```no_run
//! use s3up::object_storage::Config;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> s3up::Result<()> {
//! let ctx = s3up::default_context();
//! let config = Config::from_env(&ctx)?;
//! let location = s3up::upload(
//!     ctx,
//!     &config,
//!     "backup.tar.gz",
//!     "s3://bucket/backups/",
//!     &CancellationToken::new(),
//! )
//! .await?;
//! println!("uploaded to {location}");
//! # Ok(())
//! # }
//! ```

pub use s3up_core::*;

/// SigV4 request signing.
pub mod sigv4 {
    pub use s3up_sigv4::*;
}

/// The upload engine.
pub mod object_storage {
    pub use s3up_object_storage::*;
}

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

use log::info;
use s3up_object_storage::{
    presign_request_signer, presign_url, Config, ObjectLocation, ReportProgress, Session,
    Uploader, SIGNING_SERVICE,
};
use s3up_sigv4::{Credential, DefaultCredentialProvider, RequestSigner, StaticCredentialProvider};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Signer over the workspace's SigV4 credential.
pub type DefaultSigner = Signer<Credential>;

/// Create a signer for `config`'s region.
///
/// Credentials come from `static_credential` when given, otherwise from the
/// environment and then the credentials file.
pub fn default_signer(
    ctx: Context,
    config: &Config,
    static_credential: Option<StaticCredentialProvider>,
) -> DefaultSigner {
    let mut provider = DefaultCredentialProvider::new();
    if let Some(static_credential) = static_credential {
        provider = provider.push_front(static_credential);
    }

    Signer::new(
        ctx,
        provider,
        RequestSigner::new(SIGNING_SERVICE, config.region.as_str()),
    )
}

/// Create a presigned URL granting `method` on `dst` for `expires_in`.
///
/// `dst` must name an object. Credentials are loaded the way
/// [`default_signer`] loads them.
pub async fn presign(
    ctx: Context,
    config: &Config,
    dst: &str,
    method: http::Method,
    expires_in: Duration,
) -> Result<String> {
    config.validate()?;
    let location = dst.parse::<ObjectLocation>()?;
    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        presign_request_signer(config, expires_in)?,
    );

    presign_url(&signer, config, &location, method).await
}

/// Upload the file at `src` to `dst` and return where it landed.
///
/// `dst` is `s3://bucket/key` or `bucket/key`; when the key is empty or ends
/// with `/` the file name of `src` is appended to it.
pub async fn upload(
    ctx: Context,
    config: &Config,
    src: &str,
    dst: &str,
    token: &CancellationToken,
) -> Result<ObjectLocation> {
    let session = Session::new(default_signer(ctx, config, None));
    upload_with_session(session, config, src, dst, token).await
}

/// Same as [`upload`], reporting the uploaded byte count to `progress`.
pub async fn upload_with_progress(
    ctx: Context,
    config: &Config,
    src: &str,
    dst: &str,
    progress: impl ReportProgress,
    token: &CancellationToken,
) -> Result<ObjectLocation> {
    let session = Session::new(default_signer(ctx, config, None)).with_progress(progress);
    upload_with_session(session, config, src, dst, token).await
}

async fn upload_with_session(
    session: Session,
    config: &Config,
    src: &str,
    dst: &str,
    token: &CancellationToken,
) -> Result<ObjectLocation> {
    let file_name = Path::new(src)
        .file_name()
        .map(|v| v.to_string_lossy().to_string())
        .ok_or_else(|| Error::config_invalid(format!("source {src:?} has no file name")))?;
    let location = dst.parse::<ObjectLocation>()?.join_file_name(&file_name);

    let uploader = Uploader::new(session, config, src, location.clone()).await?;
    uploader.upload(token).await?;

    info!("uploaded {src} to {location}");
    Ok(location)
}
