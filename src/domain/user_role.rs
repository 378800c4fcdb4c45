use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole{
    SuperAdmin,
    Vendor,
    Client,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str{
        match self {
            UserRole::SuperAdmin => "SUPERADMIN",
            UserRole::Vendor => "VENDOR",
            UserRole::Client => "CLIENT"
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPERADMIN" => Ok(UserRole::SuperAdmin),
            "VENDOR" => Ok(UserRole::Vendor),
            "CLIENT" => Ok(UserRole::Client),
            other => Err(format!("{} is not a known role", other))
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
