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

//! Content hashing for request payloads.

use crate::constants::{CONTENT_MD5, UNSIGNED_PAYLOAD, X_AMZ_CONTENT_SHA_256};
use http::header;
use http::HeaderName;
use http::HeaderValue;
use s3up_core::hash::{base64_md5, hex_sha256, EMPTY_STRING_SHA256};
use s3up_core::{Body, ExcludedHeaders, Result, SigningRequest};

/// Payload hash that goes into the canonical request.
///
/// - [`Body::Empty`] hashes to the SHA-256 of the empty string.
/// - [`Body::Bytes`] hashes to the hex SHA-256 of its content.
/// - [`Body::Unsigned`] is replaced by the `UNSIGNED-PAYLOAD` sentinel.
pub fn payload_hash(body: &Body) -> String {
    match body {
        Body::Empty => EMPTY_STRING_SHA256.to_string(),
        Body::Bytes(bs) => hex_sha256(bs),
        Body::Unsigned(_) => UNSIGNED_PAYLOAD.to_string(),
    }
}

/// Base64 MD5 of the payload, `None` for empty payloads.
pub fn payload_md5(body: &Body) -> Option<String> {
    body.as_bytes()
        .filter(|bs| !bs.is_empty())
        .map(|bs| base64_md5(bs))
}

/// Write the payload derived headers into the request and return the
/// payload hash.
///
/// `x-amz-content-sha256` is always set. `Content-MD5` is computed unless
/// it is already present, excluded from signing or the payload is empty.
/// `Content-Length` follows the payload length for requests with a body.
pub(crate) fn apply_payload_headers(
    req: &mut SigningRequest,
    body: &Body,
    excluded: &ExcludedHeaders,
) -> Result<String> {
    let hash = payload_hash(body);
    req.headers
        .insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(&hash)?);

    let md5 = HeaderName::from_static(CONTENT_MD5);
    if !excluded.contains(&md5) && !req.headers.contains_key(&md5) {
        if let Some(checksum) = payload_md5(body) {
            req.headers.insert(md5, HeaderValue::from_str(&checksum)?);
        }
    }

    if !matches!(body, Body::Empty) {
        req.headers
            .insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    }

    Ok(hash)
}
