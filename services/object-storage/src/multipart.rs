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

use crate::session::PartUploaded;
use crate::types::{
    complete_multipart_upload_xml, CompletedPart, InitiateMultipartUploadResult,
};
use crate::{Session, SourceFile};
use bytes::Bytes;
use futures::future::try_join_all;
use http::header::CONTENT_TYPE;
use http::HeaderName;
use log::{debug, info};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use s3up_core::{Body, Error, ExcludedHeaders, Result};
use s3up_sigv4::{CONTENT_MD5, DEFAULT_CONTENT_TYPE, EXCLUDED_HEADERS};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// ETags by part index and the bytes uploaded so far.
struct Slots {
    etags: Vec<Option<String>>,
    uploaded: u64,
}

/// BigFileUploader uploads a file as a multipart upload.
///
/// The upload id is fetched lazily and at most once. Parts are uploaded by
/// `workers` concurrent workers pulling chunk indices from a shared counter;
/// each ETag lands in the slot of its index so the completion request lists
/// parts in ascending order whatever order they finished in.
///
/// A failed part or completion fails the whole upload. No abort request is
/// sent, so parts that did go up stay on the backend until it expires them.
#[derive(Debug)]
pub struct BigFileUploader {
    session: Session,
    url: String,
    source: SourceFile,
    chunk_size: u64,
    chunk_count: u64,
    workers: usize,
    upload_id: OnceCell<String>,
}

impl BigFileUploader {
    pub fn new(
        session: Session,
        url: String,
        source: SourceFile,
        chunk_size: u64,
        workers: usize,
    ) -> Self {
        Self {
            chunk_count: source.size.div_ceil(chunk_size),
            session,
            url,
            source,
            chunk_size,
            workers,
            upload_id: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    /// Number of parts this upload is split into.
    pub fn chunk_count(&self) -> u64 {
        self.chunk_count
    }

    pub async fn upload(&self, token: &CancellationToken) -> Result<()> {
        info!(
            "starting multipart upload of {} to {} in {} parts",
            self.source.path, self.url, self.chunk_count
        );

        self.session.report_progress(0, self.source.size);
        let parts = self.upload_parts(token).await?;
        self.complete(&parts, token).await?;

        info!(
            "uploaded {} to {} in {} parts",
            self.source.path, self.url, self.chunk_count
        );
        Ok(())
    }

    /// The upload id of this upload, initiating it on first use.
    ///
    /// A failed initiate leaves nothing cached, so the next caller tries
    /// again.
    async fn upload_id(&self, token: &CancellationToken) -> Result<&str> {
        self.upload_id
            .get_or_try_init(|| self.initiate(token))
            .await
            .map(String::as_str)
    }

    async fn initiate(&self, token: &CancellationToken) -> Result<String> {
        let req = http::Request::post(format!("{}?uploads", self.url))
            .header(CONTENT_TYPE, DEFAULT_CONTENT_TYPE)
            .body(Body::Empty)?;
        let result: InitiateMultipartUploadResult = self
            .session
            .send(req, &ExcludedHeaders::new(EXCLUDED_HEADERS), token)
            .await?;

        debug!("initiated multipart upload {}", result.upload_id);
        Ok(result.upload_id)
    }

    async fn upload_parts(&self, token: &CancellationToken) -> Result<Vec<CompletedPart>> {
        let next = AtomicU64::new(0);
        let slots = Mutex::new(Slots {
            etags: vec![None; self.chunk_count as usize],
            uploaded: 0,
        });

        let workers = (self.workers as u64).clamp(1, self.chunk_count.max(1));
        try_join_all((0..workers).map(|_| self.run_worker(&next, &slots, token))).await?;

        slots
            .into_inner()
            .expect("lock poisoned")
            .etags
            .into_iter()
            .enumerate()
            .map(|(index, etag)| {
                let part_number = index as u64 + 1;
                etag.map(|etag| CompletedPart { part_number, etag })
                    .ok_or_else(|| Error::unexpected(format!("part {part_number} has no ETag")))
            })
            .collect()
    }

    async fn run_worker(
        &self,
        next: &AtomicU64,
        slots: &Mutex<Slots>,
        token: &CancellationToken,
    ) -> Result<()> {
        loop {
            let index = next.fetch_add(1, Ordering::Relaxed);
            if index >= self.chunk_count {
                return Ok(());
            }
            if token.is_cancelled() {
                return Err(Error::cancelled(format!(
                    "upload to {} cancelled before part {}",
                    self.url,
                    index + 1
                )));
            }

            let etag = self.upload_part(index, token).await?;

            // Reported under the lock so the byte count never goes backwards.
            let mut guard = slots.lock().expect("lock poisoned");
            guard.etags[index as usize] = Some(etag);
            guard.uploaded += self.part_len(index);
            self.session.report_progress(guard.uploaded, self.source.size);
        }
    }

    async fn upload_part(&self, index: u64, token: &CancellationToken) -> Result<String> {
        let upload_id = self.upload_id(token).await?;
        let part_number = index + 1;
        let offset = index * self.chunk_size;
        let len = self.part_len(index);

        debug!("sending part {part_number} of {}", self.chunk_count);
        let content = self
            .session
            .context()
            .file_read_range(&self.source.path, offset, len)
            .await?;

        let url = format!(
            "{}?partNumber={part_number}&uploadId={}",
            self.url,
            utf8_percent_encode(upload_id, &QUERY_ENCODE_SET)
        );
        let req = http::Request::put(url)
            .header(CONTENT_TYPE, &self.source.mime)
            .body(Body::Unsigned(Bytes::from(content)))?;
        let part: PartUploaded = self
            .session
            .send(req, &ExcludedHeaders::new(EXCLUDED_HEADERS), token)
            .await?;

        debug!("part {part_number} of {} uploaded", self.chunk_count);
        Ok(part.etag)
    }

    fn part_len(&self, index: u64) -> u64 {
        self.chunk_size.min(self.source.size - index * self.chunk_size)
    }

    async fn complete(&self, parts: &[CompletedPart], token: &CancellationToken) -> Result<()> {
        let upload_id = self.upload_id(token).await?;
        let body = complete_multipart_upload_xml(parts);
        debug!(
            "completing multipart upload {upload_id} with etags {:?}",
            parts.iter().map(|p| p.etag.as_str()).collect::<Vec<_>>()
        );

        let url = format!(
            "{}?uploadId={}",
            self.url,
            utf8_percent_encode(upload_id, &QUERY_ENCODE_SET)
        );
        let req = http::Request::post(url).body(Body::Bytes(Bytes::from(body)))?;
        let excluded = ExcludedHeaders::new(EXCLUDED_HEADERS)
            .with([CONTENT_TYPE, HeaderName::from_static(CONTENT_MD5)]);
        self.session.send::<()>(req, &excluded, token).await
    }
}
