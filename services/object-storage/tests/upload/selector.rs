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

use super::{config, session, source_file, RecordingHttpSend};
use pretty_assertions::assert_eq;
use s3up_core::{ErrorKind, Result};
use s3up_object_storage::{ObjectLocation, Uploader};
use tokio_util::sync::CancellationToken;

fn destination() -> ObjectLocation {
    ObjectLocation::new("bucket", "object")
}

#[tokio::test]
async fn test_directory_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let transport = RecordingHttpSend::default();

    let err = Uploader::new(
        session(Some(transport.clone())),
        &config(1024, 5),
        &dir.path().to_string_lossy(),
        destination(),
    )
    .await
    .expect_err("directory must be rejected");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(err.to_string().contains("cannot upload a directory"));
    assert!(transport.requests().is_empty());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_socket_is_unsupported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("daemon.sock");
    let _listener = std::os::unix::net::UnixListener::bind(&path)?;

    let err = Uploader::new(
        session(Some(RecordingHttpSend::default())),
        &config(1024, 5),
        &path.to_string_lossy(),
        destination(),
    )
    .await
    .expect_err("socket must be rejected");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(err.to_string().contains("unsupported file type"));
    Ok(())
}

#[tokio::test]
async fn test_too_many_parts() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "data.bin", 10_001);
    let transport = RecordingHttpSend::default();

    let err = Uploader::new(
        session(Some(transport.clone())),
        &config(1, 5),
        &path.to_string_lossy(),
        destination(),
    )
    .await
    .expect_err("10001 parts must be rejected");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(transport.requests().is_empty());

    let uploader = Uploader::new(
        session(Some(transport.clone())),
        &config(2, 5),
        &path.to_string_lossy(),
        destination(),
    )
    .await?;
    assert!(matches!(uploader, Uploader::Big(_)));
    Ok(())
}

#[tokio::test]
async fn test_empty_file_is_small() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = source_file(dir.path(), "empty.txt", 0);

    let uploader = Uploader::new(
        session(Some(RecordingHttpSend::default())),
        &config(1024, 5),
        &path.to_string_lossy(),
        destination(),
    )
    .await?;
    assert!(matches!(uploader, Uploader::Small(_)));
    assert_eq!(uploader.source().size, 0);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_uploads_target() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir(dir.path().join("real"))?;
    let target = source_file(&dir.path().join("real"), "data.csv", 300);
    let link = dir.path().join("latest.csv");
    std::os::unix::fs::symlink("real/data.csv", &link)?;
    let transport = RecordingHttpSend::default();

    let uploader = Uploader::new(
        session(Some(transport.clone())),
        &config(1024, 5),
        &link.to_string_lossy(),
        destination(),
    )
    .await?;
    assert!(matches!(uploader, Uploader::Small(_)));
    uploader.upload(&CancellationToken::new()).await?;

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body.to_vec(), std::fs::read(&target)?);
    assert_eq!(requests[0].headers[http::header::CONTENT_TYPE], "text/csv");
    Ok(())
}
