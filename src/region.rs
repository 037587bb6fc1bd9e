//! Customer.io data-center regions
//!
//! Each account lives in exactly one region, and every App API request
//! must go to that region's host.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Data-center region of a Customer.io workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// United States
    #[serde(rename = "US")]
    Us,
    /// European Union
    #[serde(rename = "EU")]
    Eu,
}

/// Region code, region, and App API base URL
const REGION_TABLE: [(&str, Region, &str); 2] = [
    ("US", Region::Us, "https://beta-api.customer.io/v1/api/"),
    ("EU", Region::Eu, "https://beta-api-eu.customer.io/v1/api/"),
];

impl Region {
    /// App API base URL for this region (always ends with `/`)
    pub fn base_url(self) -> &'static str {
        REGION_TABLE
            .iter()
            .find(|(_, region, _)| *region == self)
            .map_or(REGION_TABLE[0].2, |(_, _, url)| url)
    }

    /// Configuration code for this region
    pub fn code(self) -> &'static str {
        REGION_TABLE
            .iter()
            .find(|(_, region, _)| *region == self)
            .map_or(REGION_TABLE[0].0, |(code, _, _)| code)
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        REGION_TABLE
            .iter()
            .find(|(code, _, _)| *code == s)
            .map(|(_, region, _)| *region)
            .ok_or_else(|| Error::invalid_value("region", "Region must be set to US or EU."))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
