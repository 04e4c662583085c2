use crate::core::agent::{DATA_ANALYZER_NAME, REPORT_WRITER_NAME};
use crate::core::summarizer;
use crate::core::{ChatRole, Conversation, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::StageMonitor;
use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    NotStarted,
    Summarizing,
    Composing,
    Done,
    Failed,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not started",
            Self::Summarizing => "summarizing",
            Self::Composing => "composing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Output of one workflow run.
#[derive(Debug, Clone)]
pub struct WorkflowOutput {
    pub conversation: Conversation,
    pub saved_to: Option<String>,
}

/// Runs the analyzer → writer handoff once, strictly in sequence.
pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
    monitor: StageMonitor,
    stage: Mutex<WorkflowStage>,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: StageMonitor::new(monitor_enabled),
            stage: Mutex::new(WorkflowStage::NotStarted),
        }
    }

    /// Stage reached by the most recent run.
    pub fn stage(&self) -> WorkflowStage {
        self.stage
            .lock()
            .map(|stage| *stage)
            .unwrap_or(WorkflowStage::Failed)
    }

    /// Moves to `next`, returning the stage that was left.
    fn enter(&self, next: WorkflowStage) -> WorkflowStage {
        let previous = match self.stage.lock() {
            Ok(mut stage) => std::mem::replace(&mut *stage, next),
            Err(_) => WorkflowStage::Failed,
        };
        tracing::info!("Workflow stage: {} → {}", previous, next);
        if next != WorkflowStage::Failed {
            self.monitor.log_stage(&next.to_string());
        }
        previous
    }

    pub async fn run(&self, prompt: &str) -> Result<WorkflowOutput> {
        self.enter(WorkflowStage::NotStarted);
        let result = self.run_stages(prompt).await;

        match &result {
            Ok(_) => self.monitor.log_final_stats(),
            Err(e) => {
                let failed_in = self.enter(WorkflowStage::Failed);
                tracing::error!("Workflow failed while {}: {}", failed_in, e);
            }
        }
        result
    }

    async fn run_stages(&self, prompt: &str) -> Result<WorkflowOutput> {
        let mut conversation = Conversation::default();
        conversation.push("user", ChatRole::User, prompt);

        self.enter(WorkflowStage::Summarizing);
        let dataset = self.pipeline.extract().await?;
        tracing::info!("Extracted {} sales records", dataset.records.len());
        if let Ok(overview) = summarizer::overview(&dataset) {
            tracing::debug!(
                "Columns: {:?}, sample rows: {}, dates {} .. {}",
                overview.columns,
                overview.sample_data.len(),
                overview.date_range.first,
                overview.date_range.last
            );
        }

        let summary = self.pipeline.summarize(&dataset).await?;
        tracing::info!(
            "Summarized {} transactions, total revenue {}",
            summary.number_of_transactions,
            summary.total_revenue
        );
        conversation.push(DATA_ANALYZER_NAME, ChatRole::Assistant, summary.to_json()?);

        self.enter(WorkflowStage::Composing);
        let report = self.pipeline.compose(&summary).await?;
        tracing::info!("Report composed ({} chars)", report.as_str().len());
        conversation.push(REPORT_WRITER_NAME, ChatRole::Assistant, report.into_string());

        let saved_to = self.pipeline.load(&conversation).await?;
        if let Some(path) = &saved_to {
            tracing::info!("📁 Report saved to: {}", path);
        }

        self.enter(WorkflowStage::Done);
        Ok(WorkflowOutput {
            conversation,
            saved_to,
        })
    }
}
