use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// One stored list item, as embedded in the grouped batch and agent views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ListItemEntry {
    pub id: Uuid,
    pub first_name: String,
    pub phone: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AgentDistribution {
    pub agent_id: Uuid,
    pub agent_name: String,
    pub item_count: usize,
}

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UploadSummary {
    pub batch_id: Uuid,
    pub total_items: usize,
    pub distribution: Vec<AgentDistribution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub count: i64,
    pub agent_count: i64,
    pub created_at: i64,
}

/// Items of one batch assigned to a single agent. Name and email are absent
/// when the agent has since been deleted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BatchAgentGroup {
    pub agent_id: Uuid,
    pub agent_name: Option<String>,
    pub agent_email: Option<String>,
    pub count: usize,
    pub items: Vec<ListItemEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BatchDetail {
    pub batch_id: Uuid,
    pub distribution: Vec<BatchAgentGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AgentBatchGroup {
    pub batch_id: Uuid,
    pub created_at: i64,
    pub count: usize,
    pub items: Vec<ListItemEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AgentLists {
    pub agent_id: Uuid,
    pub agent_name: String,
    pub lists: Vec<AgentBatchGroup>,
}
