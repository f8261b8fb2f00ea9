use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Agent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub owner_id: Uuid,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateAgentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub password: String,
}

/// Partial update; absent or empty fields keep their current value.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
}
