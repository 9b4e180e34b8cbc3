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

//! Core components for signing and uploading objects.
//!
//! This crate provides the foundational types and traits shared by the s3up
//! crates. It owns no service specific logic.
//!
//! ## Overview
//!
//! - **Context**: holds the file reader, the HTTP sender and the environment
//!   every other component works through.
//! - **Traits**: [`ProvideCredential`] loads credentials, [`SignRequest`]
//!   signs a request given a [`Body`] and a set of [`ExcludedHeaders`].
//! - **Signer**: caches a credential and drives the two traits above.
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use s3up_core::{
//!     Body, Context, ExcludedHeaders, ProvideCredential, Result, SignRequest, Signer,
//!     SigningCredential,
//! };
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     token: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.token.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<MyCredential>> {
//!         Ok(Some(MyCredential {
//!             token: "my-token".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyBuilder;
//!
//! #[async_trait]
//! impl SignRequest for MyBuilder {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _: &Context,
//!         req: &mut http::request::Parts,
//!         _: &Body,
//!         _: &ExcludedHeaders,
//!         cred: Option<&MyCredential>,
//!     ) -> Result<()> {
//!         if let Some(cred) = cred {
//!             req.headers.insert("x-token", cred.token.parse()?);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::new(), MyLoader, MyBuilder);
//!
//! let mut parts = http::Request::builder()
//!     .method("GET")
//!     .uri("https://example.com")
//!     .body(())?
//!     .into_parts()
//!     .0;
//! signer
//!     .sign(&mut parts, &Body::Empty, &ExcludedHeaders::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: hashing and HMAC helpers
//! - [`time`]: time formatting used in signatures
//! - [`utils`]: redaction of secrets in logs

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod context;
pub use context::{Context, NoopEnv, NoopFileRead, NoopHttpSend};
mod fs;
pub use fs::{FileKind, FileMetadata, FileRead};
mod http;
pub use http::HttpSend;
mod env;
pub use env::{Env, OsEnv, StaticEnv};

mod body;
pub use body::Body;
mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod chain;
pub use chain::ProvideCredentialChain;
mod request;
pub use request::{ExcludedHeaders, SigningRequest};
mod signer;
pub use signer::Signer;
