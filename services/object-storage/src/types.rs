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

use bytes::Bytes;
use http::StatusCode;
use s3up_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Namespace of the S3 XML documents.
pub const S3_XML_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Decode an XML document into `T`.
pub fn from_xml<T: DeserializeOwned>(content: &[u8]) -> Result<T> {
    let content = std::str::from_utf8(content)
        .map_err(|e| Error::protocol("response body is not valid utf-8").with_source(e))?;
    quick_xml::de::from_str(content)
        .map_err(|e| Error::protocol("failed to decode xml response body").with_source(e))
}

/// Response of the initiate request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitiateMultipartUploadResult {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

/// One uploaded part, as listed in the completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPart {
    /// 1-based part number.
    pub part_number: u64,
    /// ETag returned by the part upload, including its quotes.
    pub etag: String,
}

/// Build the `CompleteMultipartUpload` document.
///
/// ETags are written verbatim: the backend expects the literal quotes it
/// returned, so they must not be escaped into `&quot;`.
pub fn complete_multipart_upload_xml(parts: &[CompletedPart]) -> String {
    let mut xml = String::with_capacity(parts.len() * 96 + 128);
    xml.push_str(&format!(
        "<CompleteMultipartUpload xmlns=\"{S3_XML_NAMESPACE}\">"
    ));
    for part in parts {
        xml.push_str("<Part><ETag>");
        xml.push_str(&part.etag);
        xml.push_str("</ETag><PartNumber>");
        xml.push_str(&part.part_number.to_string());
        xml.push_str("</PartNumber></Part>");
    }
    xml.push_str("</CompleteMultipartUpload>");
    xml
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// ServiceError is the backend's answer to a request that did not succeed.
///
/// It is attached as the source of the [`Error`] returned for any non-2xx
/// response.
#[derive(Debug, Clone, thiserror::Error)]
#[error("service responded {status}: {code}: {message}")]
pub struct ServiceError {
    pub status: StatusCode,
    /// The `<Code>` of the error document, or `unknown`.
    pub code: String,
    /// The `<Message>` of the error document, or the status line.
    pub message: String,
    /// The raw response body.
    pub payload: Bytes,
}

impl ServiceError {
    /// Build the error from a response status and body.
    pub fn from_response(status: StatusCode, payload: Bytes) -> Self {
        let decoded = std::str::from_utf8(&payload)
            .ok()
            .and_then(|s| quick_xml::de::from_str::<ErrorResponse>(s).ok())
            .unwrap_or_default();

        let code = if decoded.code.is_empty() {
            "unknown".to_string()
        } else {
            decoded.code
        };
        let message = if decoded.message.is_empty() {
            status.to_string()
        } else {
            decoded.message
        };

        Self {
            status,
            code,
            message,
            payload,
        }
    }
}
