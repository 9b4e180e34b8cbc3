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

use crate::types::{from_xml, InitiateMultipartUploadResult, ServiceError};
use crate::ReportProgress;
use bytes::Bytes;
use http::header::ETAG;
use log::debug;
use s3up_core::{Body, Context, Error, ExcludedHeaders, Result, Signer};
use s3up_sigv4::Credential;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// FromResponse decodes a successful response into a typed value.
pub trait FromResponse: Sized {
    /// Decode the response. Only called for 2xx responses.
    fn from_response(resp: http::Response<Bytes>) -> Result<Self>;
}

/// Success without a body the caller cares about.
impl FromResponse for () {
    fn from_response(_: http::Response<Bytes>) -> Result<Self> {
        Ok(())
    }
}

impl FromResponse for InitiateMultipartUploadResult {
    fn from_response(resp: http::Response<Bytes>) -> Result<Self> {
        from_xml(resp.body())
    }
}

/// The answer to a part upload: only the `ETag` header matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartUploaded {
    /// The ETag exactly as returned, quotes included.
    pub etag: String,
}

impl FromResponse for PartUploaded {
    fn from_response(resp: http::Response<Bytes>) -> Result<Self> {
        let etag = resp
            .headers()
            .get(ETAG)
            .ok_or_else(|| Error::protocol("part upload response has no ETag header"))?
            .to_str()
            .map_err(|e| Error::protocol("part upload ETag is not valid ascii").with_source(e))?;

        Ok(Self {
            etag: etag.to_string(),
        })
    }
}

/// Session signs requests and sends them through the context's transport.
///
/// It performs no retries: every call is exactly one request.
#[derive(Debug, Clone)]
pub struct Session {
    signer: Signer<Credential>,
    progress: Option<Arc<dyn ReportProgress>>,
}

impl Session {
    /// Create a session around a signer.
    pub fn new(signer: Signer<Credential>) -> Self {
        Self {
            signer,
            progress: None,
        }
    }

    /// Report the progress of uploads run through this session.
    pub fn with_progress(mut self, progress: impl ReportProgress) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Forward `done` of `total` bytes to the progress reporter, if any.
    pub fn report_progress(&self, done: u64, total: u64) {
        if let Some(progress) = &self.progress {
            progress.report(done, total);
        }
    }

    /// The context requests are sent and files are read with.
    pub fn context(&self) -> &Context {
        self.signer.context()
    }

    /// Sign `req` with `excluded` headers left out of the signature, send it,
    /// and decode the response as `T`.
    ///
    /// Non-2xx responses fail with [`s3up_core::ErrorKind::Transport`] and a
    /// [`ServiceError`] source. Firing `token` aborts the request in flight.
    pub async fn send<T: FromResponse>(
        &self,
        req: http::Request<Body>,
        excluded: &ExcludedHeaders,
        token: &CancellationToken,
    ) -> Result<T> {
        let (parts, body) = req.into_parts();
        let target = format!("{} {}", parts.method, parts.uri);
        if token.is_cancelled() {
            return Err(Error::cancelled(format!("{target} cancelled before sending")));
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::cancelled(format!("{target} cancelled"))),
            res = self.execute(parts, body, excluded, &target) => res,
        }
    }

    async fn execute<T: FromResponse>(
        &self,
        mut parts: http::request::Parts,
        body: Body,
        excluded: &ExcludedHeaders,
        target: &str,
    ) -> Result<T> {
        self.signer.sign(&mut parts, &body, excluded).await?;

        debug!("sending request {target}");
        let resp = self
            .context()
            .http_send(http::Request::from_parts(parts, body.into_bytes()))
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let err = ServiceError::from_response(status, resp.into_body());
            debug!("request {target} failed: {err}");
            return Err(Error::transport(format!(
                "{target} failed with status {status}: {}",
                err.code
            ))
            .with_source(err));
        }

        T::from_response(resp)
    }
}
