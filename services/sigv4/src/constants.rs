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

use http::header;
use http::HeaderName;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in signing.
pub const X_AMZ_CONTENT_SHA_256: &str = "x-amz-content-sha256";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";
pub const CONTENT_MD5: &str = "content-md5";

/// Payload hash sentinel for bodies whose digest is not part of the signature.
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";
/// Content type used when a request with a body carries none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub const SIGNING_ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const SECRET_PREFIX: &str = "AWS4";
pub const REQUEST_SUFFIX: &str = "aws4_request";

// Env values used to load credentials.
pub const S3UP_ACCESS_KEY_ID: &str = "S3UP_ACCESS_KEY_ID";
pub const S3UP_SECRET_ACCESS_KEY: &str = "S3UP_SECRET_ACCESS_KEY";
pub const S3UP_SESSION_TOKEN: &str = "S3UP_SESSION_TOKEN";
pub const S3UP_CREDENTIALS_FILE: &str = "S3UP_CREDENTIALS_FILE";

pub const DEFAULT_CREDENTIALS_FILE: &str = "~/.config/s3up/credentials.toml";

/// Headers that never take part in the signature.
///
/// They are either set by the transport after signing or carry the
/// signature itself.
pub const EXCLUDED_HEADERS: [HeaderName; 8] = [
    header::AUTHORIZATION,
    header::ACCEPT_ENCODING,
    HeaderName::from_static("amz-sdk-invocation-id"),
    HeaderName::from_static("amz-sdk-request"),
    header::USER_AGENT,
    HeaderName::from_static("x-amzn-trace-id"),
    header::EXPECT,
    header::CONTENT_LENGTH,
];

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static AWS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// But used in query.
pub static AWS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
