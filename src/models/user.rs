//! User account model (borrowers and administrators) and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::Permission;
use crate::error::AppError;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip)]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    /// Granted permission codenames
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Permissions held by the account; superusers hold all of them
    pub fn granted_permissions(&self) -> Vec<Permission> {
        if self.is_superuser {
            return Permission::ALL.to_vec();
        }
        self.permissions
            .iter()
            .filter_map(|codename| codename.parse().ok())
            .collect()
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.username)
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"))]
    pub username: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl CreateUser {
    pub fn require_filled(&self) -> Result<(), AppError> {
        super::require_filled(&[("username", &self.username)])
    }
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with bearer token
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub permissions: Vec<Permission>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Admin site access
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff || self.is_superuser {
            Ok(())
        } else {
            Err(AppError::Authorization("Staff account required".to_string()))
        }
    }

    /// Account management
    pub fn require_superuser(&self) -> Result<(), AppError> {
        if self.is_superuser {
            Ok(())
        } else {
            Err(AppError::Authorization("Superuser privileges required".to_string()))
        }
    }

    pub fn has_perm(&self, permission: Permission) -> bool {
        self.is_superuser || self.permissions.contains(&permission)
    }

    pub fn require_perm(&self, permission: Permission) -> Result<(), AppError> {
        if self.has_perm(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Permission required: {}",
                permission.description()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(is_staff: bool, is_superuser: bool, permissions: Vec<Permission>) -> UserClaims {
        UserClaims {
            sub: "librarian".to_string(),
            user_id: 2,
            is_staff,
            is_superuser,
            permissions,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn test_staff_required() {
        assert!(claims(false, false, vec![]).require_staff().is_err());
        assert!(claims(true, false, vec![]).require_staff().is_ok());
        assert!(claims(false, true, vec![]).require_staff().is_ok());
    }

    #[test]
    fn test_mark_returned_permission() {
        let staff = claims(true, false, vec![]);
        assert!(!staff.has_perm(Permission::CanMarkReturned));
        assert!(matches!(
            staff.require_perm(Permission::CanMarkReturned),
            Err(AppError::Authorization(_))
        ));

        let granted = claims(true, false, vec![Permission::CanMarkReturned]);
        assert!(granted.has_perm(Permission::CanMarkReturned));

        let superuser = claims(true, true, vec![]);
        assert!(superuser.has_perm(Permission::CanMarkReturned));
    }

    #[test]
    fn test_token_roundtrip_rejects_wrong_secret() {
        let token = claims(true, false, vec![]).create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.sub, "librarian");
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_unknown_permission_codenames_ignored() {
        let user = User {
            id: 1,
            username: "reader".to_string(),
            password: None,
            first_name: None,
            last_name: None,
            email: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            permissions: vec!["catalog.can_mark_returned".to_string(), "bogus".to_string()],
            created_at: Utc::now(),
        };
        assert_eq!(user.granted_permissions(), vec![Permission::CanMarkReturned]);
        assert_eq!(user.to_string(), "reader");
    }

    #[test]
    fn test_whitespace_username_is_required() {
        let data: CreateUser =
            serde_json::from_value(serde_json::json!({ "username": "   " })).unwrap();
        assert!(data.validate().is_ok());
        match data.require_filled() {
            Err(AppError::Fields(fields)) => {
                assert_eq!(fields["username"], vec![crate::models::FIELD_REQUIRED.to_string()])
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
