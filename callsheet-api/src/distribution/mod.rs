//! Round-robin distribution of uploaded contact lists across agents.

mod distributor;
pub mod pipeline;

pub use distributor::{
    distribute, distribute_with_batch_id, AgentAssignment, AssignedRecord, Distribution,
    DistributionError,
};
pub use pipeline::process_upload;
