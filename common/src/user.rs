use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(UserId)
    }
}

/// Account type of a marketplace user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Farmer,
    Buyer,
    Admin,
}

impl UserRole {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "farmer" => Some(UserRole::Farmer),
            "buyer" => Some(UserRole::Buyer),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Farmer => "farmer",
            UserRole::Buyer => "buyer",
            UserRole::Admin => "admin",
        }
    }

    /// Server path of the landing dashboard for this role.
    pub fn dashboard_path(self) -> &'static str {
        match self {
            UserRole::Farmer => "/farmer/dashboard",
            UserRole::Buyer => "/buyer/dashboard",
            UserRole::Admin => "/admin/dashboard",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the host page tells the client about the signed-in user.
///
/// The server renders these as `data-user-*` attributes on `<body>`.
/// Missing attributes leave the corresponding field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub role: Option<UserRole>,
    pub user_id: Option<UserId>,
    pub location: String,
    pub county: String,
}

impl UserProfile {
    /// Build a profile from a dataset lookup keyed by camelCase attribute
    /// names (`userType`, `userId`, `userLocation`, `userCounty`).
    pub fn from_dataset(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            role: get("userType").as_deref().and_then(UserRole::parse),
            user_id: get("userId").and_then(|v| v.parse().ok()),
            location: get("userLocation").unwrap_or_default(),
            county: get("userCounty").unwrap_or_default(),
        }
    }

    pub fn is_farmer(&self) -> bool {
        self.role == Some(UserRole::Farmer)
    }
}
