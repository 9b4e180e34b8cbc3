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

use crate::config::MAX_PARTS;
use crate::{BigFileUploader, Config, ObjectLocation, Session, SmallFileUploader};
use log::debug;
use s3up_core::{Context, Error, FileKind, Result};
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Symbolic links followed before the source is considered a loop.
const MAX_SYMLINK_HOPS: usize = 40;

/// A regular file ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path the content is read from, with symbolic links resolved.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type guessed from the extension of the path given by the caller.
    pub mime: String,
}

impl SourceFile {
    /// Stat `path` and resolve it to a regular file.
    ///
    /// Symbolic links are followed hop by hop, each relative target taken
    /// against the directory of the link that points to it, and the final
    /// target must be a regular file. Directories and other file types are
    /// rejected.
    pub async fn resolve(ctx: &Context, path: &str) -> Result<Self> {
        let mut target = path.to_string();
        let mut meta = ctx.file_metadata(&target).await?;
        let mut hops = 0;
        while meta.kind == FileKind::Symlink {
            if hops == MAX_SYMLINK_HOPS {
                return Err(Error::config_invalid(format!(
                    "too many levels of symbolic links: {path}"
                )));
            }
            hops += 1;

            let link = ctx.file_read_link(&target).await?;
            let next = match Path::new(&target).parent() {
                Some(dir) if Path::new(&link).is_relative() => {
                    dir.join(&link).to_string_lossy().to_string()
                }
                _ => link,
            };
            debug!("source {target} is a link to {next}");
            meta = ctx.file_metadata(&next).await?;
            target = next;
        }

        let shown = if target == path {
            path.to_string()
        } else {
            format!("{path} links to {target}")
        };
        match meta.kind {
            FileKind::Regular => {}
            FileKind::Dir => {
                return Err(Error::config_invalid(format!(
                    "cannot upload a directory: {shown}, upload its files one by one instead"
                )))
            }
            _ => {
                return Err(Error::config_invalid(format!(
                    "unsupported file type: {shown}"
                )))
            }
        }

        Ok(Self {
            path: target,
            size: meta.len,
            mime: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        })
    }
}

/// Uploader is the strategy picked for a source file.
#[derive(Debug)]
pub enum Uploader {
    /// The file fits in one chunk and goes up with a single PUT.
    Small(SmallFileUploader),
    /// The file spans several chunks and goes up as a multipart upload.
    Big(BigFileUploader),
}

impl Uploader {
    /// Pick the upload strategy for `src`.
    ///
    /// Fails before any request is sent if the source is not a regular file
    /// or if it would need more than 10 000 parts.
    pub async fn new(
        session: Session,
        config: &Config,
        src: &str,
        dst: ObjectLocation,
    ) -> Result<Self> {
        config.validate()?;

        let source = SourceFile::resolve(session.context(), src).await?;
        let chunk_count = config.chunk_count(source.size);
        if chunk_count > MAX_PARTS {
            return Err(Error::config_invalid(format!(
                "{src} is {} bytes and needs {chunk_count} parts of {} bytes, at most {MAX_PARTS} are allowed",
                source.size, config.chunk_size
            )));
        }

        let url = dst.url(&config.endpoint());
        debug!(
            "uploading {src} ({} bytes, {}) to {url} in {chunk_count} chunks",
            source.size, source.mime
        );

        if chunk_count > 1 {
            Ok(Uploader::Big(BigFileUploader::new(
                session,
                url,
                source,
                config.chunk_size,
                config.workers,
            )))
        } else {
            Ok(Uploader::Small(SmallFileUploader::new(session, url, source)))
        }
    }

    /// Run the upload. Firing `token` aborts it.
    pub async fn upload(&self, token: &CancellationToken) -> Result<()> {
        match self {
            Uploader::Small(v) => v.upload(token).await,
            Uploader::Big(v) => v.upload(token).await,
        }
    }

    /// The file being uploaded.
    pub fn source(&self) -> &SourceFile {
        match self {
            Uploader::Small(v) => v.source(),
            Uploader::Big(v) => v.source(),
        }
    }
}
