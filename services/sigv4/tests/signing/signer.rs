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

use super::fixed_signer;
use bytes::Bytes;
use http::{header, Method, Request};
use pretty_assertions::assert_eq;
use s3up_core::{Body, ErrorKind, ExcludedHeaders, Result};
use s3up_sigv4::{
    CONTENT_MD5, EXCLUDED_HEADERS, S3UP_ACCESS_KEY_ID, S3UP_SECRET_ACCESS_KEY,
    X_AMZ_CONTENT_SHA_256,
};

const ENVS: [(&str, &str); 2] = [
    (S3UP_ACCESS_KEY_ID, "MGCACCESSKEY123"),
    (S3UP_SECRET_ACCESS_KEY, "MGCSECRETKEY/abcdefghijklmnop"),
];

fn part_request() -> http::request::Parts {
    Request::builder()
        .method(Method::PUT)
        .uri("https://br-se1.magaluobjects.com/my-bucket/photos/cat.jpg?uploadId=upl-123&partNumber=2")
        .header(header::CONTENT_TYPE, "image/jpeg")
        .body(())
        .expect("request must be valid")
        .into_parts()
        .0
}

#[tokio::test]
async fn test_signer_loads_env_credential() -> Result<()> {
    let signer = fixed_signer(&ENVS);
    let mut parts = part_request();

    signer
        .sign(
            &mut parts,
            &Body::Unsigned(Bytes::from_static(b"hello world")),
            &ExcludedHeaders::new(EXCLUDED_HEADERS),
        )
        .await?;

    assert_eq!(
        parts.headers[header::AUTHORIZATION],
        "AWS4-HMAC-SHA256 Credential=MGCACCESSKEY123/20240301/br-se-1/s3/aws4_request, SignedHeaders=content-md5;content-type;host;x-amz-content-sha256;x-amz-date, Signature=0f1dd5210ca0853eeed6744bbe0ae54742f47d883fb1749a53b67456716293a5"
    );
    assert_eq!(parts.headers[CONTENT_MD5], "XrY7u+Ae7tCTyyK7j1rNww==");
    Ok(())
}

#[tokio::test]
async fn test_concurrent_signing_uses_independent_exclusions() -> Result<()> {
    let signer = fixed_signer(&ENVS);
    let default = ExcludedHeaders::new(EXCLUDED_HEADERS);
    let widened = default.with([header::CONTENT_TYPE, http::HeaderName::from_static(CONTENT_MD5)]);

    let body = Body::Bytes(Bytes::from_static(b"<CompleteMultipartUpload/>"));
    let mut plain = part_request();
    let mut completion = part_request();
    let (a, b) = tokio::join!(
        signer.sign(&mut plain, &body, &default),
        signer.sign(&mut completion, &body, &widened),
    );
    a?;
    b?;

    let plain_auth = plain.headers[header::AUTHORIZATION].to_str()?;
    let completion_auth = completion.headers[header::AUTHORIZATION].to_str()?;
    assert!(plain_auth.contains("SignedHeaders=content-md5;content-type;host;"));
    assert!(completion_auth.contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date,"));
    assert!(completion.headers.get(CONTENT_MD5).is_none());
    assert_eq!(
        plain.headers[X_AMZ_CONTENT_SHA_256],
        completion.headers[X_AMZ_CONTENT_SHA_256]
    );
    Ok(())
}

#[tokio::test]
async fn test_signer_without_credential() {
    let signer = fixed_signer(&[]);

    let err = signer
        .sign(
            &mut part_request(),
            &Body::Empty,
            &ExcludedHeaders::new(EXCLUDED_HEADERS),
        )
        .await
        .expect_err("no credential is configured");
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
}
