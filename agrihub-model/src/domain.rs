use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A content area served by its own provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Crop,
    Livestock,
    Fishery,
    Machine,
    Admin,
    Media,
}

impl Domain {
    /// All domains, in dashboard order.
    pub const ALL: [Domain; 6] = [
        Domain::Crop,
        Domain::Livestock,
        Domain::Fishery,
        Domain::Machine,
        Domain::Admin,
        Domain::Media,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Crop => "crop",
            Domain::Livestock => "livestock",
            Domain::Fishery => "fishery",
            Domain::Machine => "machine",
            Domain::Admin => "admin",
            Domain::Media => "media",
        }
    }

    /// Returns true for the four agricultural content domains.
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            Domain::Crop | Domain::Livestock | Domain::Fishery | Domain::Machine
        )
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crop" | "crops" => Ok(Domain::Crop),
            "livestock" => Ok(Domain::Livestock),
            "fishery" | "fisheries" => Ok(Domain::Fishery),
            "machine" | "machines" | "machinery" => Ok(Domain::Machine),
            "admin" | "users" => Ok(Domain::Admin),
            "media" | "resources" => Ok(Domain::Media),
            other => Err(ModelError::UnknownDomain(other.to_string())),
        }
    }
}
