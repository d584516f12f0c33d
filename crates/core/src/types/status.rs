//! Role and status enums.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Customers and sellers share the same account shape and are
/// distinguished only by role. Deleting an account behaves differently
/// per role: customers are soft-deleted, sellers are deactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "lowercase")
)]
pub enum UserRole {
    Customer,
    Seller,
}

impl UserRole {
    /// The lowercase wire representation (`"customer"` / `"seller"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Seller => "seller",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cart lifecycle status.
///
/// A customer has at most one `active` cart at a time. Checkout empties
/// the active cart rather than flipping it to `ordered`, so the same row
/// is reused by the next add; `ordered` exists for schema parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "cart_status", rename_all = "lowercase")
)]
pub enum CartStatus {
    #[default]
    Active,
    Ordered,
}

impl CartStatus {
    /// The lowercase wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ordered => "ordered",
        }
    }
}

impl fmt::Display for CartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Seller).unwrap(),
            "\"seller\""
        );
        let role: UserRole = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(role, UserRole::Customer);
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!(serde_json::from_str::<UserRole>("\"admin\"").is_err());
    }

    #[test]
    fn test_cart_status_default_is_active() {
        assert_eq!(CartStatus::default(), CartStatus::Active);
        assert_eq!(CartStatus::Active.as_str(), "active");
    }
}
