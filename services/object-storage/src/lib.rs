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

//! Upload engine for S3 compatible object storage.
//!
//! [`Uploader::new`] inspects the source file and picks a strategy:
//!
//! - [`SmallFileUploader`] sends files that fit in one chunk with a single
//!   signed PUT.
//! - [`BigFileUploader`] splits larger files into chunks and uploads them as
//!   a multipart upload with a bounded pool of workers.
//!
//! Every request is signed through a [`Session`], which also decodes the
//! backend's answer into a typed value or a [`ServiceError`].
//!
//! ## Example
//!
//! ```no_run
//! use s3up_core::{Context, OsEnv, Result, Signer};
//! use s3up_file_read_tokio::TokioFileRead;
//! use s3up_object_storage::{Config, Session, Uploader, SIGNING_SERVICE};
//! use s3up_sigv4::{DefaultCredentialProvider, RequestSigner};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_file_read(TokioFileRead).with_env(OsEnv);
//! let config = Config::from_env(&ctx)?;
//! let signer = Signer::new(
//!     ctx,
//!     DefaultCredentialProvider::new(),
//!     RequestSigner::new(SIGNING_SERVICE, config.region.as_str()),
//! );
//!
//! let uploader = Uploader::new(
//!     Session::new(signer),
//!     &config,
//!     "backup.tar.gz",
//!     "s3://bucket/backups/backup.tar.gz".parse()?,
//! )
//! .await?;
//! uploader.upload(&CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::{
    Config, DEFAULT_CHUNK_SIZE, DEFAULT_WORKERS, MAX_PARTS, S3UP_CHUNK_SIZE, S3UP_REGION,
    S3UP_SERVER_URL, S3UP_WORKERS, SIGNING_SERVICE,
};

mod region;
pub use region::{Region, HOST_TEMPLATE};

mod location;
pub use location::ObjectLocation;

mod types;
pub use types::{
    complete_multipart_upload_xml, from_xml, CompletedPart, InitiateMultipartUploadResult,
    ServiceError, S3_XML_NAMESPACE,
};

mod progress;
pub use progress::{LogProgress, ReportProgress};

mod session;
pub use session::{FromResponse, PartUploaded, Session};

mod uploader;
pub use uploader::{SourceFile, Uploader};

mod small;
pub use small::SmallFileUploader;

mod multipart;
pub use multipart::BigFileUploader;

mod presign;
pub use presign::{
    presign_request_signer, presign_url, DEFAULT_PRESIGN_EXPIRES, MAX_PRESIGN_EXPIRES,
};
