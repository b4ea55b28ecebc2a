use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Authorization class carried in the `role` claim of the caller's token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "R001")]
    Admin,
    #[serde(rename = "R002")]
    Manager,
    #[serde(rename = "R003")]
    Doctor,
    #[serde(rename = "R004")]
    Staff,
    #[serde(rename = "R005")]
    Patient,
}

impl Role {
    /// Every role except patients.
    pub const CLINICAL: [Role; 4] = [Role::Admin, Role::Manager, Role::Doctor, Role::Staff];

    pub fn code(&self) -> &'static str {
        match self {
            Role::Admin => "R001",
            Role::Manager => "R002",
            Role::Doctor => "R003",
            Role::Staff => "R004",
            Role::Patient => "R005",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role code: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R001" => Ok(Role::Admin),
            "R002" => Ok(Role::Manager),
            "R003" => Ok(Role::Doctor),
            "R004" => Ok(Role::Staff),
            "R005" => Ok(Role::Patient),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
