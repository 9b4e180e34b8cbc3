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

use anyhow::{bail, Result};
use s3up::object_storage::{Config, ReportProgress};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct StderrProgress;

impl ReportProgress for StderrProgress {
    fn report(&self, done: u64, total: u64) {
        let percent = if total == 0 { 100 } else { done * 100 / total };
        eprint!("\r{done}/{total} bytes ({percent}%)");
        if done == total {
            eprintln!();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [src, dst] = args.as_slice() else {
        bail!("usage: upload <source file> <s3://bucket/key>");
    };

    let ctx = s3up::default_context();
    let config = Config::from_env(&ctx)?;
    config.validate()?;

    // Ctrl-C aborts the requests in flight.
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let location =
        s3up::upload_with_progress(ctx, &config, src, dst, StderrProgress, &token).await?;
    println!("Uploaded {src} to {location}");
    Ok(())
}
