pub mod orchestrator;
pub mod records;
pub mod status;
pub mod tasks;
