pub mod admin;
pub mod agent;
pub mod contact;
pub mod list;
pub mod response;

pub use admin::{AdminProfile, AdminRole, AuthResponse, LoginRequest, RegisterRequest};
pub use agent::{Agent, CreateAgentRequest, UpdateAgentRequest};
pub use contact::ContactRecord;
pub use list::{
    AgentBatchGroup, AgentDistribution, AgentLists, BatchAgentGroup, BatchDetail, BatchSummary,
    ListItemEntry, UploadSummary,
};
pub use response::ApiResponse;
