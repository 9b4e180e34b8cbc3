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

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use s3up_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

static KEY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// ObjectLocation addresses an object as a bucket and a key.
///
/// Parsed from either `s3://bucket/key` or `bucket/key`. A key that is empty
/// or ends with `/` names a prefix; see [`ObjectLocation::join_file_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    /// Bucket name.
    pub bucket: String,
    /// Object key, without a leading slash.
    pub key: String,
}

impl ObjectLocation {
    /// Create a location from its parts.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Whether the key names a prefix rather than an object.
    pub fn is_prefix(&self) -> bool {
        self.key.is_empty() || self.key.ends_with('/')
    }

    /// Append `name` to the key when the key names a prefix.
    pub fn join_file_name(mut self, name: &str) -> Self {
        if self.is_prefix() {
            self.key.push_str(name);
        }
        self
    }

    /// The object URL under `endpoint`, with the key percent-encoded and no
    /// trailing slash.
    pub fn url(&self, endpoint: &str) -> String {
        let key = utf8_percent_encode(&self.key, &KEY_ENCODE_SET).to_string();
        let url = format!(
            "{}/{}/{}",
            endpoint.trim_end_matches('/'),
            self.bucket,
            key
        );
        url.trim_end_matches('/').to_string()
    }
}

impl FromStr for ObjectLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let path = s.strip_prefix("s3://").unwrap_or(s);
        let (bucket, key) = path.split_once('/').unwrap_or((path, ""));
        if bucket.is_empty() {
            return Err(Error::config_invalid(format!(
                "destination {s:?} has no bucket name"
            )));
        }

        Ok(Self::new(bucket, key.trim_start_matches('/')))
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}
