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

use std::fmt::Debug;

/// ReportProgress receives the byte count of an upload as it advances.
///
/// `done` never decreases across calls for one upload and reaches `total`
/// once every byte went up. Calls come from the upload workers, so
/// implementations must return quickly.
pub trait ReportProgress: Debug + Send + Sync + 'static {
    /// Report that `done` of `total` bytes are uploaded.
    fn report(&self, done: u64, total: u64);
}

/// Logs every report at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ReportProgress for LogProgress {
    fn report(&self, done: u64, total: u64) {
        let percent = if total == 0 { 100 } else { done * 100 / total };
        log::info!("uploaded {done} of {total} bytes ({percent}%)");
    }
}
