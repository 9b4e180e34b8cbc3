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

mod multipart;
mod selector;
mod small;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use s3up_core::{Context, Result, Signer};
use s3up_file_read_tokio::TokioFileRead;
use s3up_object_storage::{Config, Region, ReportProgress, Session};
use s3up_sigv4::{Credential, RequestSigner, StaticCredentialProvider};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const UPLOAD_ID: &str = "VXBsb2FkIElE+1";

/// A request as seen by the transport.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_initiate(&self) -> bool {
        self.method == Method::POST && self.query("uploads").is_some()
    }

    pub fn is_part(&self) -> bool {
        self.method == Method::PUT && self.query("partNumber").is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.method == Method::POST && self.query("uploadId").is_some()
    }

    pub fn part_number(&self) -> u64 {
        self.query("partNumber")
            .and_then(|v| v.parse().ok())
            .expect("part request must carry a part number")
    }
}

/// RecordingProgress keeps every `(done, total)` pair it is given.
#[derive(Debug, Clone, Default)]
pub struct RecordingProgress {
    reports: Arc<Mutex<Vec<(u64, u64)>>>,
}

impl RecordingProgress {
    pub fn reports(&self) -> Vec<(u64, u64)> {
        self.reports.lock().expect("lock poisoned").clone()
    }
}

impl ReportProgress for RecordingProgress {
    fn report(&self, done: u64, total: u64) {
        self.reports.lock().expect("lock poisoned").push((done, total));
    }
}

/// RecordingHttpSend answers like an S3 backend and records every request.
#[derive(Debug, Clone, Default)]
pub struct RecordingHttpSend {
    requests: Arc<Mutex<Vec<Recorded>>>,
    /// Part number that is answered with a 500.
    pub fail_part: Option<u64>,
    /// Answer part uploads without an ETag header.
    pub omit_etag: bool,
    /// Delay before answering the initiate request.
    pub initiate_delay: Duration,
    /// Delay before answering part uploads; later parts answer sooner.
    pub part_delay: Duration,
}

impl RecordingHttpSend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl s3up_core::HttpSend for RecordingHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        let recorded = Recorded {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            query: parts
                .uri
                .query()
                .map(|q| {
                    form_urlencoded::parse(q.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            headers: parts.headers,
            body,
        };
        self.requests
            .lock()
            .expect("lock poisoned")
            .push(recorded.clone());

        let resp = http::Response::builder();
        if recorded.is_initiate() {
            tokio::time::sleep(self.initiate_delay).await;
            let body = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><InitiateMultipartUploadResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Bucket>bucket</Bucket><Key>key</Key><UploadId>{UPLOAD_ID}</UploadId></InitiateMultipartUploadResult>"#
            );
            return Ok(resp.status(StatusCode::OK).body(Bytes::from(body))?);
        }

        if recorded.is_part() {
            let n = recorded.part_number();
            tokio::time::sleep(self.part_delay / n as u32).await;
            if self.fail_part == Some(n) {
                return Ok(resp.status(StatusCode::INTERNAL_SERVER_ERROR).body(
                    Bytes::from_static(
                        b"<Error><Code>InternalError</Code><Message>We encountered an internal error</Message></Error>",
                    ),
                )?);
            }
            let resp = if self.omit_etag {
                resp
            } else {
                resp.header(http::header::ETAG, format!("\"etag-{n}\""))
            };
            return Ok(resp.status(StatusCode::OK).body(Bytes::new())?);
        }

        Ok(resp
            .status(StatusCode::OK)
            .header(http::header::ETAG, "\"abc123\"")
            .body(Bytes::new())?)
    }
}

/// Build a session that reads real files and sends through `transport`.
pub fn session(transport: Option<RecordingHttpSend>) -> Session {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut ctx = Context::new().with_file_read(TokioFileRead);
    if let Some(transport) = transport {
        ctx = ctx.with_http_send(transport);
    }
    let signer: Signer<Credential> = Signer::new(
        ctx,
        StaticCredentialProvider::new("access_key_id", "secret_access_key"),
        RequestSigner::new("s3", Region::BrSe1.as_str()),
    );
    Session::new(signer)
}

pub fn config(chunk_size: u64, workers: usize) -> Config {
    Config {
        region: Region::BrSe1,
        server_url: None,
        workers,
        chunk_size,
    }
}

/// Write a file of `size` bytes whose content differs per byte position.
pub fn source_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    let content: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    std::fs::write(&path, content).expect("source file must be written");
    path
}
