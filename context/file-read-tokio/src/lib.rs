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

//! Tokio-based file reading implementation for s3up.
//!
//! This crate provides `TokioFileRead`, an async file reader that implements
//! the `FileRead` trait from `s3up_core` using Tokio's file system operations.
//!
//! Uploaders use it to stat a source without following links, resolve
//! symbolic links and read either a whole file or a single chunk of it.
//!
//! ## Example
//!
//! ```no_run
//! use s3up_core::{Context, FileKind, OsEnv};
//! use s3up_file_read_tokio::TokioFileRead;
//!
//! #[tokio::main]
//! async fn main() -> s3up_core::Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_env(OsEnv);
//!
//!     let meta = ctx.file_metadata("/tmp/backup.tar").await?;
//!     if meta.kind == FileKind::Regular {
//!         let head = ctx.file_read_range("/tmp/backup.tar", 0, 512).await?;
//!         println!("read {} of {} bytes", head.len(), meta.len);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use s3up_core::{Error, FileKind, FileMetadata, FileRead, Result};
use std::io::SeekFrom;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::unexpected(format!("failed to read file {path}")).with_source(e))
    }

    async fn file_read_range(&self, path: &str, offset: u64, len: u64) -> Result<Vec<u8>> {
        let mut f = tokio::fs::File::open(path)
            .await
            .map_err(|e| Error::unexpected(format!("failed to open file {path}")).with_source(e))?;
        f.seek(SeekFrom::Start(offset)).await.map_err(|e| {
            Error::unexpected(format!("failed to seek file {path} to {offset}")).with_source(e)
        })?;

        let mut buf = Vec::with_capacity(len as usize);
        f.take(len).read_to_end(&mut buf).await.map_err(|e| {
            Error::unexpected(format!("failed to read {len} bytes from file {path}"))
                .with_source(e)
        })?;
        Ok(buf)
    }

    async fn file_metadata(&self, path: &str) -> Result<FileMetadata> {
        let meta = tokio::fs::symlink_metadata(path)
            .await
            .map_err(|e| Error::unexpected(format!("failed to stat file {path}")).with_source(e))?;

        let ft = meta.file_type();
        let kind = if ft.is_symlink() {
            FileKind::Symlink
        } else if ft.is_dir() {
            FileKind::Dir
        } else if ft.is_file() {
            FileKind::Regular
        } else {
            FileKind::Other
        };

        Ok(FileMetadata {
            kind,
            len: meta.len(),
        })
    }

    async fn file_read_link(&self, path: &str) -> Result<String> {
        let target = tokio::fs::read_link(path)
            .await
            .map_err(|e| Error::unexpected(format!("failed to read link {path}")).with_source(e))?;

        target.into_os_string().into_string().map_err(|v| {
            Error::unexpected(format!("link target {v:?} of {path} is not valid utf-8"))
        })
    }
}
