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

use super::{config, session, source_file, RecordingHttpSend, RecordingProgress};
use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use http::Method;
use pretty_assertions::assert_eq;
use s3up_core::{ErrorKind, Result};
use s3up_object_storage::{ObjectLocation, Uploader};
use s3up_sigv4::{UNSIGNED_PAYLOAD, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_small_file_single_put() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "report.json", 700);
    let transport = RecordingHttpSend::default();

    let uploader = Uploader::new(
        session(Some(transport.clone())),
        &config(1024, 5),
        &path.to_string_lossy(),
        "s3://bucket/reports/".parse::<ObjectLocation>()?.join_file_name("report.json"),
    )
    .await?;
    assert!(matches!(uploader, Uploader::Small(_)));
    uploader.upload(&CancellationToken::new()).await?;

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let put = &requests[0];
    assert_eq!(put.method, Method::PUT);
    assert_eq!(put.path, "/bucket/reports/report.json");
    assert!(put.query.is_empty());
    assert_eq!(put.body.to_vec(), std::fs::read(&path)?);
    assert_eq!(put.headers[HOST], "br-se1.magaluobjects.com");
    assert_eq!(put.headers[CONTENT_TYPE], "application/json");
    assert_eq!(put.headers[X_AMZ_CONTENT_SHA_256], UNSIGNED_PAYLOAD);
    assert!(put.headers.contains_key(X_AMZ_DATE));
    assert!(put.headers[AUTHORIZATION]
        .to_str()?
        .starts_with("AWS4-HMAC-SHA256 Credential=access_key_id/"));
    Ok(())
}

#[tokio::test]
async fn test_file_of_exactly_one_chunk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 1024);
    let transport = RecordingHttpSend::default();

    let uploader = Uploader::new(
        session(Some(transport.clone())),
        &config(1024, 5),
        &path.to_string_lossy(),
        ObjectLocation::new("bucket", "data.bin"),
    )
    .await?;
    assert!(matches!(uploader, Uploader::Small(_)));
    uploader.upload(&CancellationToken::new()).await?;

    assert_eq!(transport.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_small_file_reports_progress() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 700);
    let progress = RecordingProgress::default();

    let uploader = Uploader::new(
        session(Some(RecordingHttpSend::default())).with_progress(progress.clone()),
        &config(1024, 5),
        &path.to_string_lossy(),
        ObjectLocation::new("bucket", "data.bin"),
    )
    .await?;
    uploader.upload(&CancellationToken::new()).await?;

    assert_eq!(progress.reports(), vec![(0, 700), (700, 700)]);
    Ok(())
}

#[tokio::test]
async fn test_no_transport_configured() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 10);

    let uploader = Uploader::new(
        session(None),
        &config(1024, 5),
        &path.to_string_lossy(),
        ObjectLocation::new("bucket", "data.bin"),
    )
    .await?;
    let err = uploader
        .upload(&CancellationToken::new())
        .await
        .expect_err("no transport must fail");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(err.to_string().contains("no transport available"));
    Ok(())
}
