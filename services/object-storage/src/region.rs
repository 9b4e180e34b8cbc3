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

use s3up_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host template that regions are substituted into.
pub const HOST_TEMPLATE: &str = "https://{{region}}.magaluobjects.com";

/// Region is the set of regions the object storage is offered in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    /// `br-ne-1`
    #[default]
    BrNe1,
    /// `br-ne-2`
    BrNe2,
    /// `br-se-1`
    BrSe1,
}

impl Region {
    /// The region name as used in the credential scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::BrNe1 => "br-ne-1",
            Region::BrNe2 => "br-ne-2",
            Region::BrSe1 => "br-se-1",
        }
    }

    /// The region as it appears in the host name: `br-se-1` becomes `br-se1`.
    pub fn host_segment(&self) -> &'static str {
        match self {
            Region::BrNe1 => "br-ne1",
            Region::BrNe2 => "br-ne2",
            Region::BrSe1 => "br-se1",
        }
    }

    /// The endpoint for this region, without a trailing slash.
    pub fn endpoint(&self) -> String {
        HOST_TEMPLATE.replace("{{region}}", self.host_segment())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "br-ne-1" | "br-ne1" => Ok(Region::BrNe1),
            "br-ne-2" | "br-ne2" => Ok(Region::BrNe2),
            "br-se-1" | "br-se1" => Ok(Region::BrSe1),
            _ => Err(Error::config_invalid(format!(
                "unknown region {s:?}, expected one of br-ne-1, br-ne-2, br-se-1"
            ))),
        }
    }
}

impl TryFrom<String> for Region {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(value: Region) -> Self {
        value.as_str().to_string()
    }
}
