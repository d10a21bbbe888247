//! Shared domain enums

use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres,
};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Book instance availability, stored as a one-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "r")]
    Reserved,
}

impl LoanStatus {
    /// Every status, in choice order
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Maintenance,
        LoanStatus::OnLoan,
        LoanStatus::Available,
        LoanStatus::Reserved,
    ];

    /// Stored code
    pub fn code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    /// Human-readable choice label
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl Default for LoanStatus {
    fn default() -> Self {
        LoanStatus::Maintenance
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoanStatus::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| format!("Invalid loan status code: {}", s))
    }
}

// SQLx conversion for LoanStatus (VARCHAR(1) column)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
        <&str as Encode<Postgres>>::encode(self.code(), buf)
    }
}

// ---------------------------------------------------------------------------
// Permission
// ---------------------------------------------------------------------------

/// Permissions beyond basic create/read/update/delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Permission {
    /// Set book as returned
    #[serde(rename = "catalog.can_mark_returned")]
    CanMarkReturned,
}

impl Permission {
    pub const ALL: [Permission; 1] = [Permission::CanMarkReturned];

    pub fn codename(&self) -> &'static str {
        match self {
            Permission::CanMarkReturned => "catalog.can_mark_returned",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Permission::CanMarkReturned => "Set book as returned",
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.codename() == s)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_maintenance() {
        assert_eq!(LoanStatus::default(), LoanStatus::Maintenance);
        assert_eq!(LoanStatus::default().code(), "m");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!("o".parse::<LoanStatus>(), Ok(LoanStatus::OnLoan));
        assert_eq!("r".parse::<LoanStatus>(), Ok(LoanStatus::Reserved));
        assert!("x".parse::<LoanStatus>().is_err());
        assert_eq!(LoanStatus::OnLoan.to_string(), "On loan");
    }

    #[test]
    fn test_status_serde_uses_codes() {
        let json = serde_json::to_string(&LoanStatus::Available).unwrap();
        assert_eq!(json, "\"a\"");
        let status: LoanStatus = serde_json::from_str("\"m\"").unwrap();
        assert_eq!(status, LoanStatus::Maintenance);
    }

    #[test]
    fn test_permission_codename() {
        assert_eq!(
            "catalog.can_mark_returned".parse::<Permission>(),
            Ok(Permission::CanMarkReturned)
        );
        assert!("catalog.can_burn_books".parse::<Permission>().is_err());
    }
}
