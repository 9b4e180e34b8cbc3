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

use crate::constants::{
    AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, DEFAULT_CONTENT_TYPE, REQUEST_SUFFIX,
    SECRET_PREFIX, SIGNING_ALGORITHM, UNSIGNED_PAYLOAD, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::payload::apply_payload_headers;
use crate::Credential;
use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use s3up_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use s3up_core::time::{format_date, format_iso8601, now, DateTime};
use s3up_core::{
    Body, Context, Error, ExcludedHeaders, Result, SignRequest, SigningRequest,
};
use std::fmt::Write;
use std::time::Duration;

/// RequestSigner that implements SigV4 signing.
///
/// By default the signature goes into the `Authorization` header. With
/// [`RequestSigner::with_expires`] it goes into the query instead and the
/// resulting URI is a presigned URL.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
/// - [Authenticating Requests: Using Query Parameters](https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html)
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
    expires_in: Option<Duration>,
}

impl RequestSigner {
    /// Create a new signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            time: None,
            expires_in: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign in the query, producing URLs valid for `expires_in`.
    ///
    /// The payload is never part of a query signature, it is always signed
    /// as `UNSIGNED-PAYLOAD`.
    pub fn with_expires(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: &Body,
        excluded: &ExcludedHeaders,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };

        let now = self.time.unwrap_or_else(now);
        let mut signed_req = SigningRequest::build(req)?;

        // canonicalize context
        let payload_hash =
            canonicalize_header(&mut signed_req, body, excluded, cred, self.expires_in, now)?;

        // Scope: "20240301/br-se-1/s3/aws4_request"
        let scope = format!(
            "{}/{}/{}/{}",
            format_date(now),
            self.region,
            self.service,
            REQUEST_SUFFIX
        );
        debug!("calculated scope: {scope}");

        let signed_headers = signed_req.header_name_to_vec_sorted(excluded).join(";");
        if let Some(expires_in) = self.expires_in {
            presign_query(&mut signed_req, cred, &scope, &signed_headers, expires_in, now);
        }
        canonicalize_query(&mut signed_req);

        // build canonical request and string to sign.
        let creq = canonical_request_string(&signed_req, excluded, &signed_headers, &payload_hash)?;
        debug!("calculated canonical request: {creq}");
        let encoded_req = hex_sha256(creq.as_bytes());

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20240301T120000Z
        // 20240301/br-se-1/s3/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{SIGNING_ALGORITHM}")?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{}", &scope)?;
            write!(f, "{}", &encoded_req)?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        if self.expires_in.is_some() {
            signed_req.query_push("X-Amz-Signature", signature);
            return signed_req.apply(req);
        }

        let mut authorization = HeaderValue::from_str(&format!(
            "{SIGNING_ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.access_key_id, scope, signed_headers, signature
        ))
        .map_err(|e| {
            Error::request_invalid("failed to create authorization header").with_source(e)
        })?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(req)
    }
}

fn canonical_request_string(
    ctx: &SigningRequest,
    excluded: &ExcludedHeaders,
    signed_headers: &str,
    payload_hash: &str,
) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", ctx.method)?;
    // Insert encoded path
    let path = percent_decode_str(&ctx.path)
        .decode_utf8()
        .map_err(|e| Error::request_invalid("request path is not valid utf-8").with_source(e))?;
    writeln!(f, "{}", utf8_percent_encode(&path, &AWS_URI_ENCODE_SET))?;
    // Insert query
    writeln!(
        f,
        "{}",
        ctx.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    )?;
    // Insert signed headers
    for name in ctx.header_name_to_vec_sorted(excluded) {
        writeln!(f, "{}:{}", name, ctx.header_value_joined(name)?)?;
    }
    writeln!(f)?;
    writeln!(f, "{signed_headers}")?;
    write!(f, "{payload_hash}")?;

    Ok(f)
}

fn canonicalize_header(
    ctx: &mut SigningRequest,
    body: &Body,
    excluded: &ExcludedHeaders,
    cred: &Credential,
    expires_in: Option<Duration>,
    now: DateTime,
) -> Result<String> {
    // Header names and values need to be normalized according to Step 4 of https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html
    for (_, value) in ctx.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    // Insert HOST header if not present.
    if ctx.headers.get(header::HOST).is_none() {
        ctx.headers
            .insert(header::HOST, HeaderValue::from_str(ctx.authority.as_str())?);
    }

    // Query signing carries date, token and payload mode in the query.
    if expires_in.is_some() {
        return Ok(UNSIGNED_PAYLOAD.to_string());
    }

    if !matches!(body, Body::Empty) && ctx.headers.get(header::CONTENT_TYPE).is_none() {
        ctx.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
        );
    }

    ctx.headers
        .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);

    let payload_hash = apply_payload_headers(ctx, body, excluded)?;

    // Insert X_AMZ_SECURITY_TOKEN header if security token exists.
    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token)?;
        // Set token value sensitive to avoid leaking.
        value.set_sensitive(true);

        ctx.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(payload_hash)
}

fn presign_query(
    ctx: &mut SigningRequest,
    cred: &Credential,
    scope: &str,
    signed_headers: &str,
    expires_in: Duration,
    now: DateTime,
) {
    ctx.query_push("X-Amz-Algorithm", SIGNING_ALGORITHM);
    ctx.query_push(
        "X-Amz-Credential",
        format!("{}/{}", cred.access_key_id, scope),
    );
    ctx.query_push("X-Amz-Date", format_iso8601(now));
    ctx.query_push("X-Amz-Expires", expires_in.as_secs().to_string());
    ctx.query_push("X-Amz-SignedHeaders", signed_headers);

    if let Some(token) = &cred.session_token {
        ctx.query_push("X-Amz-Security-Token", token.as_str());
    }
}

fn canonicalize_query(ctx: &mut SigningRequest) {
    // Return if query is empty.
    if ctx.query.is_empty() {
        return;
    }

    // Sort by param name, then by value for repeated names.
    ctx.query.sort();

    ctx.query = ctx
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
}

/// Derive the signing key for the given date, region and service.
///
/// `HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")`
pub fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("{SECRET_PREFIX}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), REQUEST_SUFFIX.as_bytes())
}
