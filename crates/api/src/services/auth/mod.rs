//! Authentication service.
//!
//! Registration, login, Argon2id password hashing, and bearer token
//! issuance. Tokens are HS256 JWTs carrying the user ID in `sub`.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use bazaar_core::{Email, UserId, UserRole};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// JWT claims carried by bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Authentication service.
///
/// Handles registration, login, and token issuance.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    jwt_secret: &'a SecretString,
    token_ttl_secs: i64,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, jwt_secret: &'a SecretString, token_ttl_secs: i64) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt_secret,
            token_ttl_secs,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidRole` if the role is not `customer` or `seller`.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let role = parse_role(role)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password, returning a signed bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        verify_password(password, &password_hash)?;

        let token = encode_token(user.id, self.jwt_secret, self.token_ttl_secs)?;

        Ok((user, token))
    }
}

/// Sign a bearer token for a user.
///
/// # Errors
///
/// Returns `AuthError::Token` if signing fails.
pub fn encode_token(
    user_id: UserId,
    secret: &SecretString,
    ttl_secs: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.as_i32().to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )?;

    Ok(token)
}

/// Validate a bearer token's signature and expiry, returning its claims.
///
/// # Errors
///
/// Returns the `jsonwebtoken` error for an invalid or expired token;
/// callers treat any failure as an authentication failure.
pub fn decode_token(
    token: &str,
    secret: &SecretString,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data: TokenData<Claims> = decode(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

fn parse_role(role: &str) -> Result<UserRole, AuthError> {
    match role {
        "customer" => Ok(UserRole::Customer),
        "seller" => Ok(UserRole::Seller),
        other => Err(AuthError::InvalidRole(format!(
            "invalid role '{other}', use 'customer' or 'seller'"
        ))),
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_rejects_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_parse_role() {
        assert!(matches!(parse_role("customer"), Ok(UserRole::Customer)));
        assert!(matches!(parse_role("seller"), Ok(UserRole::Seller)));
        assert!(matches!(parse_role("admin"), Err(AuthError::InvalidRole(_))));
    }

    #[test]
    fn test_token_roundtrip() {
        let secret = SecretString::from("0aF9!kQz@7Lm#2Xp$5Rt^8Wv&1Yb*4Nc");
        let token = encode_token(UserId::new(42), &secret, 3600).unwrap();
        let claims = decode_token(&token, &secret).unwrap();
        assert_eq!(claims.sub, "42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let secret = SecretString::from("0aF9!kQz@7Lm#2Xp$5Rt^8Wv&1Yb*4Nc");
        let other = SecretString::from("zZ9#pL2@wQ8$mN4!kX6^vB1&cJ3*hG5t");
        let token = encode_token(UserId::new(1), &secret, 3600).unwrap();
        assert!(decode_token(&token, &other).is_err());
    }
}
