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

/// Body is the payload that travels with a request that is about to be signed.
///
/// The payload is held in memory as [`Bytes`], so hashing it never consumes
/// the content that is later sent on the wire: every reader works on a cheap
/// clone of the same buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    /// No payload at all.
    #[default]
    Empty,
    /// A payload whose SHA-256 digest is part of the signature.
    Bytes(Bytes),
    /// A payload signed with the unsigned-payload sentinel instead of its
    /// digest.
    ///
    /// Used for part and object uploads where hashing large buffers up front
    /// is not worth it.
    Unsigned(Bytes),
}

impl Body {
    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().map(|bs| bs.len()).unwrap_or_default()
    }

    /// Returns true if there is no payload or it has zero length.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the payload.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Empty => None,
            Body::Bytes(bs) | Body::Unsigned(bs) => Some(bs),
        }
    }

    /// Take the payload out, returning an empty buffer for [`Body::Empty`].
    pub fn into_bytes(self) -> Bytes {
        match self {
            Body::Empty => Bytes::new(),
            Body::Bytes(bs) | Body::Unsigned(bs) => bs,
        }
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::Bytes(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(value))
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Bytes(Bytes::from(value))
    }
}
