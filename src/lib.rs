pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::AzureOpenAiClient;
pub use config::{azure::AzureOpenAiConfig, cli::LocalStorage, CliConfig};
pub use core::{
    agent::ChatAgent,
    engine::{ReportEngine, WorkflowOutput, WorkflowStage},
    pipeline::SalesReportPipeline,
};
pub use utils::error::{ReportError, Result};
