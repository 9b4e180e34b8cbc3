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

use super::{
    config, session, source_file, Recorded, RecordingHttpSend, RecordingProgress, UPLOAD_ID,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use pretty_assertions::assert_eq;
use s3up_core::{ErrorKind, Result};
use s3up_object_storage::{ObjectLocation, ServiceError, Uploader};
use s3up_sigv4::{CONTENT_MD5, UNSIGNED_PAYLOAD, X_AMZ_CONTENT_SHA_256};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const MIB: usize = 1024 * 1024;

async fn big_uploader(
    transport: &RecordingHttpSend,
    path: &std::path::Path,
    chunk_size: u64,
    workers: usize,
) -> Result<Uploader> {
    let uploader = Uploader::new(
        session(Some(transport.clone())),
        &config(chunk_size, workers),
        &path.to_string_lossy(),
        "s3://bucket/dir/data.bin".parse::<ObjectLocation>()?,
    )
    .await?;
    assert!(matches!(uploader, Uploader::Big(_)), "must pick multipart");
    Ok(uploader)
}

fn parts_of(requests: &[Recorded]) -> Vec<&Recorded> {
    let mut parts: Vec<_> = requests.iter().filter(|r| r.is_part()).collect();
    parts.sort_by_key(|r| r.part_number());
    parts
}

fn expected_completion(n: u64) -> String {
    let mut xml =
        r#"<CompleteMultipartUpload xmlns="http://s3.amazonaws.com/doc/2006-03-01/">"#.to_string();
    for i in 1..=n {
        xml.push_str(&format!(
            "<Part><ETag>\"etag-{i}\"</ETag><PartNumber>{i}</PartNumber></Part>"
        ));
    }
    xml.push_str("</CompleteMultipartUpload>");
    xml
}

#[tokio::test]
async fn test_two_and_a_half_chunks() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 2560);
    let transport = RecordingHttpSend {
        part_delay: Duration::from_millis(60),
        ..Default::default()
    };

    let uploader = big_uploader(&transport, &path, 1024, 3).await?;
    uploader.upload(&CancellationToken::new()).await?;

    let requests = transport.requests();
    assert_eq!(requests.len(), 5);
    assert!(requests[0].is_initiate(), "initiate must come first");
    assert!(requests[4].is_complete(), "completion must come last");
    assert_eq!(requests.iter().filter(|r| r.is_initiate()).count(), 1);

    let parts = parts_of(&requests);
    assert_eq!(
        parts.iter().map(|r| r.part_number()).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(
        parts.iter().map(|r| r.body.len()).collect::<Vec<_>>(),
        vec![1024, 1024, 512]
    );
    let uploaded: Vec<u8> = parts.iter().flat_map(|r| r.body.to_vec()).collect();
    assert_eq!(uploaded, std::fs::read(&path)?);

    for part in &parts {
        assert_eq!(part.path, "/bucket/dir/data.bin");
        assert_eq!(part.query("uploadId"), Some(UPLOAD_ID));
        assert_eq!(part.headers[X_AMZ_CONTENT_SHA_256], UNSIGNED_PAYLOAD);
        assert_eq!(part.headers[CONTENT_TYPE], "application/octet-stream");
        assert!(part.headers.contains_key(CONTENT_MD5));
    }

    let complete = &requests[4];
    assert_eq!(complete.query("uploadId"), Some(UPLOAD_ID));
    assert_eq!(
        String::from_utf8(complete.body.to_vec())?,
        expected_completion(3)
    );
    assert!(!complete.headers.contains_key(CONTENT_MD5));
    let auth = complete.headers[AUTHORIZATION].to_str()?;
    assert!(
        auth.contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date,"),
        "completion must not sign content-type: {auth}"
    );
    Ok(())
}

#[tokio::test]
async fn test_progress_counts_every_part() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 2560);
    let transport = RecordingHttpSend {
        part_delay: Duration::from_millis(60),
        ..Default::default()
    };
    let progress = RecordingProgress::default();

    let uploader = Uploader::new(
        session(Some(transport.clone())).with_progress(progress.clone()),
        &config(1024, 3),
        &path.to_string_lossy(),
        ObjectLocation::new("bucket", "data.bin"),
    )
    .await?;
    uploader.upload(&CancellationToken::new()).await?;

    let reports = progress.reports();
    assert_eq!(reports.len(), 4, "one report at start and one per part");
    assert_eq!(reports[0], (0, 2560));
    assert_eq!(reports[3], (2560, 2560));
    assert!(reports.iter().all(|(_, total)| *total == 2560));
    assert!(
        reports.windows(2).all(|w| w[0].0 < w[1].0),
        "progress must grow: {reports:?}"
    );
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_26_mib() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 26 * MIB);
    let transport = RecordingHttpSend::default();

    let uploader = big_uploader(&transport, &path, 8 * MIB as u64, 5).await?;
    uploader.upload(&CancellationToken::new()).await?;

    let requests = transport.requests();
    assert_eq!(requests.iter().filter(|r| r.is_initiate()).count(), 1);
    assert_eq!(requests.iter().filter(|r| r.is_complete()).count(), 1);

    let parts = parts_of(&requests);
    assert_eq!(
        parts.iter().map(|r| r.part_number()).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    assert_eq!(parts[3].body.len(), 2 * MIB);

    let complete = requests.last().expect("completion must be sent");
    assert!(complete.is_complete());
    assert_eq!(
        String::from_utf8(complete.body.to_vec())?,
        expected_completion(4)
    );
    Ok(())
}

#[tokio::test]
async fn test_single_initiate_under_concurrency() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 55);
    let transport = RecordingHttpSend {
        initiate_delay: Duration::from_millis(50),
        ..Default::default()
    };

    let uploader = big_uploader(&transport, &path, 10, 8).await?;
    uploader.upload(&CancellationToken::new()).await?;

    let requests = transport.requests();
    assert_eq!(requests.iter().filter(|r| r.is_initiate()).count(), 1);
    assert!(requests[0].is_initiate());
    assert_eq!(parts_of(&requests).len(), 6);
    Ok(())
}

#[tokio::test]
async fn test_part_failure_skips_completion() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 40);
    let transport = RecordingHttpSend {
        fail_part: Some(2),
        ..Default::default()
    };

    let uploader = big_uploader(&transport, &path, 10, 1).await?;
    let err = uploader
        .upload(&CancellationToken::new())
        .await
        .expect_err("part 2 must fail the upload");
    assert_eq!(err.kind(), ErrorKind::Transport);

    let service = err
        .source_ref()
        .and_then(|e| e.downcast_ref::<ServiceError>())
        .expect("service error must be attached");
    assert_eq!(service.status, http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(service.code, "InternalError");

    let requests = transport.requests();
    assert_eq!(
        parts_of(&requests)
            .iter()
            .map(|r| r.part_number())
            .collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert!(!requests.iter().any(|r| r.is_complete()));
    Ok(())
}

#[tokio::test]
async fn test_missing_etag_is_protocol_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 20);
    let transport = RecordingHttpSend {
        omit_etag: true,
        ..Default::default()
    };

    let uploader = big_uploader(&transport, &path, 10, 2).await?;
    let err = uploader
        .upload(&CancellationToken::new())
        .await
        .expect_err("missing etag must fail");
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(!transport.requests().iter().any(|r| r.is_complete()));
    Ok(())
}

#[tokio::test]
async fn test_cancel_in_flight() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 40);
    let transport = RecordingHttpSend {
        part_delay: Duration::from_secs(30),
        ..Default::default()
    };

    let uploader = big_uploader(&transport, &path, 10, 2).await?;
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let err = tokio::time::timeout(Duration::from_secs(5), uploader.upload(&token))
        .await
        .expect("cancelled upload must return promptly")
        .expect_err("cancelled upload must fail");
    assert_eq!(err.kind(), ErrorKind::Cancelled);

    let requests = transport.requests();
    assert!(parts_of(&requests).len() <= 2, "no part beyond the workers");
    assert!(!requests.iter().any(|r| r.is_complete()));
    Ok(())
}

#[tokio::test]
async fn test_cancelled_before_start() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 40);
    let transport = RecordingHttpSend::default();

    let uploader = big_uploader(&transport, &path, 10, 2).await?;
    let token = CancellationToken::new();
    token.cancel();

    let err = uploader.upload(&token).await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(transport.requests().is_empty());
    Ok(())
}
