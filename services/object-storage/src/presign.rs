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

use crate::{Config, ObjectLocation, SIGNING_SERVICE};
use http::Method;
use log::debug;
use s3up_core::{Body, Error, ExcludedHeaders, Result, Signer};
use s3up_sigv4::{Credential, RequestSigner, EXCLUDED_HEADERS};
use std::time::Duration;

/// Lifetime of a presigned URL when the caller does not pick one.
pub const DEFAULT_PRESIGN_EXPIRES: Duration = Duration::from_secs(5 * 60);
/// Longest lifetime a presigned URL may have.
pub const MAX_PRESIGN_EXPIRES: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Build a query signer for URLs valid for `expires_in`.
///
/// `expires_in` must be between one second and seven days.
pub fn presign_request_signer(config: &Config, expires_in: Duration) -> Result<RequestSigner> {
    if expires_in < Duration::from_secs(1) || expires_in > MAX_PRESIGN_EXPIRES {
        return Err(Error::config_invalid(format!(
            "presigned url expiration must be between 1 second and 7 days, got {}s",
            expires_in.as_secs()
        )));
    }

    Ok(RequestSigner::new(SIGNING_SERVICE, config.region.as_str()).with_expires(expires_in))
}

/// Presign `method` on the object at `location`.
///
/// `signer` must be built over [`presign_request_signer`]. Only `GET` and
/// `PUT` can be presigned and the location must name an object.
pub async fn presign_url(
    signer: &Signer<Credential>,
    config: &Config,
    location: &ObjectLocation,
    method: Method,
) -> Result<String> {
    if method != Method::GET && method != Method::PUT {
        return Err(Error::config_invalid(format!(
            "only GET and PUT can be presigned, got {method}"
        )));
    }
    if location.is_prefix() {
        return Err(Error::config_invalid(format!(
            "at least one key is required: {location}"
        )));
    }

    let mut parts = http::Request::builder()
        .method(method)
        .uri(location.url(&config.endpoint()))
        .body(())?
        .into_parts()
        .0;
    signer
        .sign(&mut parts, &Body::Empty, &ExcludedHeaders::new(EXCLUDED_HEADERS))
        .await?;

    debug!("presigned {} {location}", parts.method);
    Ok(parts.uri.to_string())
}
