pub mod agents;
pub mod config;
pub mod config_file;
pub mod errors;
pub mod personas;
pub mod pipeline;
pub mod providers;
pub mod readability;
pub mod report;
pub mod schema;
pub mod trace;
pub mod types;

pub use crate::config_file::ProviderConfig;
pub use crate::personas::{PersonaProfile, PersonaTable};
pub use crate::pipeline::{DocumentInput, Orchestrator, PipelineRun};
pub use crate::report::FinalReport;
