pub mod azure;
pub mod cli;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CSV_PATH: &str = "sample_sales_data.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "daily-sales-reporter"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Turns a sales CSV into a stakeholder report with a two-agent workflow")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_CSV_PATH))]
    pub csv_path: String,

    #[cfg_attr(feature = "cli", arg(long, help = "Override the request given to the workflow"))]
    pub prompt: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Directory to save report.md into"))]
    pub output_path: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log process CPU and memory per stage"))]
    pub monitor: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON"))]
    pub json_logs: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            csv_path: DEFAULT_CSV_PATH.to_string(),
            prompt: None,
            output_path: None,
            verbose: false,
            monitor: false,
            json_logs: false,
        }
    }
}

impl CliConfig {
    /// The user's request that opens the conversation.
    pub fn prompt(&self) -> String {
        self.prompt.clone().unwrap_or_else(|| {
            format!(
                "Analyze {} and create a daily sales summary report for stakeholders.",
                self.csv_path
            )
        })
    }
}

impl ConfigProvider for CliConfig {
    fn csv_path(&self) -> &str {
        &self.csv_path
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("csv_path", &self.csv_path)?;
        validation::validate_file_extension("csv_path", &self.csv_path, &["csv"])?;
        if let Some(output) = &self.output_path {
            validation::validate_path("output_path", output)?;
        }
        if let Some(prompt) = &self.prompt {
            validation::validate_non_empty_string("prompt", prompt)?;
        }
        Ok(())
    }
}
