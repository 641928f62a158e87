//! Status and classification enums.
//!
//! Everything here is stored as lowercase text (database columns, session
//! snapshots, form values), so each enum has a matching `Display`/`FromStr`
//! pair alongside its serde representation.

use serde::{Deserialize, Serialize};

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Rank,
    Key,
    Unban,
}

impl Category {
    /// All categories, in catalog order.
    pub const ALL: [Self; 3] = [Self::Rank, Self::Key, Self::Unban];

    /// Lowercase identifier, used in product ids and URLs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rank => "rank",
            Self::Key => "key",
            Self::Unban => "unban",
        }
    }

    /// Human-readable plural label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Rank => "Ranks",
            Self::Key => "Crate Keys",
            Self::Unban => "Unbans",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rank" => Ok(Self::Rank),
            "key" => Ok(Self::Key),
            "unban" => Ok(Self::Unban),
            _ => Err(format!("invalid category: {s}")),
        }
    }
}

/// Outcome of a purchase. Only `Completed` purchases count towards spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    #[default]
    Completed,
    Pending,
    Failed,
}

impl PurchaseStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PurchaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("invalid purchase status: {s}")),
        }
    }
}

/// Account role. Admins can reach the `/admin` panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_text_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("crate".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_matches_display() {
        let json = serde_json::to_string(&Category::Unban).unwrap();
        assert_eq!(json, "\"unban\"");
    }

    #[test]
    fn test_purchase_status_parse() {
        assert_eq!(
            "completed".parse::<PurchaseStatus>().unwrap(),
            PurchaseStatus::Completed
        );
        assert_eq!(
            "failed".parse::<PurchaseStatus>().unwrap(),
            PurchaseStatus::Failed
        );
        assert!("Completed".parse::<PurchaseStatus>().is_err());
    }

    #[test]
    fn test_user_role() {
        assert_eq!(UserRole::default(), UserRole::User);
        assert!("admin".parse::<UserRole>().unwrap().is_admin());
        assert!(!UserRole::User.is_admin());
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
