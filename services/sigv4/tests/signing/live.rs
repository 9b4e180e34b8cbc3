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
use http::{Method, Request, StatusCode};
use log::warn;
use s3up_core::{Body, Context, ExcludedHeaders, OsEnv, Result, Signer};
use s3up_http_send_reqwest::ReqwestHttpSend;
use s3up_sigv4::{DefaultCredentialProvider, RequestSigner, EXCLUDED_HEADERS};
use std::env;

/// Returns the bucket url when live tests are enabled.
fn live_bucket_url() -> Option<String> {
    let _ = env_logger::builder().is_test(true).try_init();

    if env::var("S3UP_SIGV4_TEST").ok().as_deref() != Some("on") {
        return None;
    }
    Some(env::var("S3UP_SIGV4_URL").expect("S3UP_SIGV4_URL must be set"))
}

#[tokio::test]
async fn test_put_and_head_object() -> Result<()> {
    let Some(url) = live_bucket_url() else {
        warn!("S3UP_SIGV4_TEST is not set, skipped");
        return Ok(());
    };
    let region = env::var("S3UP_SIGV4_REGION").unwrap_or_else(|_| "br-se-1".to_string());

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let signer = Signer::new(
        ctx.clone(),
        DefaultCredentialProvider::new(),
        RequestSigner::new("s3", &region),
    );
    let excluded = ExcludedHeaders::new(EXCLUDED_HEADERS);

    let body = Body::Unsigned(Bytes::from_static(b"Hello, World!"));
    let (mut parts, _) = Request::builder()
        .method(Method::PUT)
        .uri(format!("{url}/s3up-sigv4-live-test"))
        .body(())?
        .into_parts();
    signer.sign(&mut parts, &body, &excluded).await?;
    let resp = ctx
        .http_send(Request::from_parts(parts, body.into_bytes()))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let (mut parts, _) = Request::builder()
        .method(Method::HEAD)
        .uri(format!("{url}/s3up-sigv4-live-test"))
        .body(())?
        .into_parts();
    signer.sign(&mut parts, &Body::Empty, &excluded).await?;
    let resp = ctx.http_send(Request::from_parts(parts, Bytes::new())).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}
