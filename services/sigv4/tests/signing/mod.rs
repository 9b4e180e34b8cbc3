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

mod live;
mod signer;

use s3up_core::{Context, Signer, StaticEnv};
use s3up_sigv4::{Credential, DefaultCredentialProvider, RequestSigner};
use std::collections::HashMap;

/// Build a signer over a fixed environment and signing time.
pub fn fixed_signer(envs: &[(&str, &str)]) -> Signer<Credential> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_env(StaticEnv {
        home_dir: None,
        envs: envs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    });
    let time = "2024-03-01T12:00:00Z".parse().expect("time must be valid");

    Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        RequestSigner::new("s3", "br-se-1").with_time(time),
    )
}
