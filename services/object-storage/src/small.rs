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

use crate::{Session, SourceFile};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use log::info;
use s3up_core::{Body, ExcludedHeaders, Result};
use s3up_sigv4::EXCLUDED_HEADERS;
use tokio_util::sync::CancellationToken;

/// SmallFileUploader sends the whole file with one signed PUT.
#[derive(Debug)]
pub struct SmallFileUploader {
    session: Session,
    url: String,
    source: SourceFile,
}

impl SmallFileUploader {
    pub fn new(session: Session, url: String, source: SourceFile) -> Self {
        Self {
            session,
            url,
            source,
        }
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub async fn upload(&self, token: &CancellationToken) -> Result<()> {
        self.session.report_progress(0, self.source.size);
        let content = self.session.context().file_read(&self.source.path).await?;

        let req = http::Request::put(&self.url)
            .header(CONTENT_TYPE, &self.source.mime)
            .body(Body::Unsigned(Bytes::from(content)))?;
        self.session
            .send::<()>(req, &ExcludedHeaders::new(EXCLUDED_HEADERS), token)
            .await?;
        self.session.report_progress(self.source.size, self.source.size);

        info!("uploaded {} to {}", self.source.path, self.url);
        Ok(())
    }
}
