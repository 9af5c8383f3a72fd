use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wire discriminator for feed records.
///
/// Matching is exact and case-sensitive: `"BANNER"` parses, `"Banner"` does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModelType {
    Banner,
    Product,
}

impl ModelType {
    pub const ALL: [ModelType; 2] = [ModelType::Banner, ModelType::Product];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Banner => "BANNER",
            ModelType::Product => "PRODUCT",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
