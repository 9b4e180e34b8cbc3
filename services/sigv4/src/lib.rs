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

//! SigV4 request signing for S3 compatible storage.
//!
//! This crate implements the signing protocol from primitives:
//!
//! - [`payload_hash`] and [`payload_md5`] hash a request payload without
//!   consuming it.
//! - [`RequestSigner`] canonicalizes the request, derives the signing key with
//!   [`generate_signing_key`] and attaches the `Authorization` header.
//! - Credential providers load a [`Credential`] from static values, the
//!   environment or a TOML credentials file.
//!
//! ## Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use s3up_core::{Body, Context, ExcludedHeaders, OsEnv, Result, Signer};
//! use s3up_file_read_tokio::TokioFileRead;
//! use s3up_sigv4::{DefaultCredentialProvider, RequestSigner, EXCLUDED_HEADERS};
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_file_read(TokioFileRead).with_env(OsEnv);
//! let signer = Signer::new(
//!     ctx,
//!     DefaultCredentialProvider::new(),
//!     RequestSigner::new("s3", "br-se-1"),
//! );
//!
//! let mut parts = http::Request::put("https://br-se1.magaluobjects.com/bucket/key")
//!     .body(())?
//!     .into_parts()
//!     .0;
//! let body = Body::Unsigned(Bytes::from_static(b"hello"));
//! signer
//!     .sign(&mut parts, &body, &ExcludedHeaders::new(EXCLUDED_HEADERS))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{
    CONTENT_MD5, DEFAULT_CONTENT_TYPE, EXCLUDED_HEADERS, S3UP_ACCESS_KEY_ID,
    S3UP_CREDENTIALS_FILE, S3UP_SECRET_ACCESS_KEY, S3UP_SESSION_TOKEN, UNSIGNED_PAYLOAD,
    X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};

mod credential;
pub use credential::Credential;

mod payload;
pub use payload::{payload_hash, payload_md5};

mod sign_request;
pub use sign_request::{generate_signing_key, RequestSigner};

mod provide_credential;
pub use provide_credential::*;
