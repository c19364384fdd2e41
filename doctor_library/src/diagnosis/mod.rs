pub mod finding;
pub mod orchestrator;
pub mod presenter;
