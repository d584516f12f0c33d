//! User domain types.

use chrono::{DateTime, Utc};

use bazaar_core::{Email, UserId, UserRole};

/// A marketplace account (domain type).
///
/// Customers and sellers share this shape; only `role` distinguishes
/// them. `deleted_at` is set when a customer soft-deletes their account;
/// seller rows are never removed, only flipped to `is_active = false`.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address (login identifier).
    pub email: Email,
    /// Account role.
    pub role: UserRole,
    /// Whether the account is active (sellers are deactivated on delete).
    pub is_active: bool,
    /// Soft-delete marker (customers only).
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this account may list and manage products.
    #[must_use]
    pub fn is_seller(&self) -> bool {
        self.role == UserRole::Seller
    }
}
