use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AdminRole {
    Admin,
}

impl AdminRole {
    pub fn as_str(&self) -> &str {
        match self {
            AdminRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(AdminRole::Admin),
            _ => None,
        }
    }
}

/// Admin account as exposed to clients. The password hash never leaves the
/// database layer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdminProfile {
    pub id: Uuid,
    pub email: String,
    pub role: AdminRole,
    pub created_at: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: AdminProfile,
}
