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

use crate::Result;
use std::fmt::Debug;

/// The kind of a filesystem entry, as reported without following links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A regular file.
    Regular,
    /// A symbolic link.
    Symlink,
    /// A directory.
    Dir,
    /// Anything else: sockets, fifos, devices.
    Other,
}

/// Metadata of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    /// Kind of the entry.
    pub kind: FileKind,
    /// Length in bytes.
    pub len: u64,
}

/// FileRead is used to inspect and read source files.
///
/// Uploaders use it to stat the source, resolve symbolic links and read
/// either the whole file or one chunk of it.
#[async_trait::async_trait]
pub trait FileRead: Debug + Send + Sync + 'static {
    /// Read the file content entirely in `Vec<u8>`.
    async fn file_read(&self, path: &str) -> Result<Vec<u8>>;

    /// Read `len` bytes starting at `offset`.
    ///
    /// Returns fewer bytes only when the file ends before `offset + len`.
    async fn file_read_range(&self, path: &str, offset: u64, len: u64) -> Result<Vec<u8>>;

    /// Stat the path without following symbolic links.
    async fn file_metadata(&self, path: &str) -> Result<FileMetadata>;

    /// Read the target of a symbolic link.
    async fn file_read_link(&self, path: &str) -> Result<String>;
}
