use crate::core::summarizer;
use crate::core::{
    ChatAgent, ConfigProvider, Conversation, Pipeline, ReportText, SalesDataset, Storage,
    SummaryStatistics,
};
use crate::utils::error::{ReportError, Result};
use std::path::Path;

pub const REPORT_FILENAME: &str = "report.md";

/// CSV in, narrated report out: local summarization, remote composition.
pub struct SalesReportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    writer: ChatAgent,
}

impl<S: Storage, C: ConfigProvider> SalesReportPipeline<S, C> {
    pub fn new(storage: S, config: C, writer: ChatAgent) -> Self {
        Self {
            storage,
            config,
            writer,
        }
    }
}

fn render_markdown(conversation: &Conversation, report: &str) -> String {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S %Z");
    let prompt = conversation
        .messages
        .first()
        .map(|m| m.text.as_str())
        .unwrap_or_default();
    format!(
        "<!-- generated {} -->\n<!-- prompt: {} -->\n\n{}\n",
        generated_at,
        prompt.replace("--", "-"),
        report.trim_end()
    )
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SalesReportPipeline<S, C> {
    async fn extract(&self) -> Result<SalesDataset> {
        tracing::debug!("Reading sales data from: {}", self.config.csv_path());
        let bytes = self.storage.read_file(self.config.csv_path()).await?;
        summarizer::parse_sales_csv(&bytes)
    }

    async fn summarize(&self, dataset: &SalesDataset) -> Result<SummaryStatistics> {
        summarizer::summarize(&dataset.records)
    }

    async fn compose(&self, summary: &SummaryStatistics) -> Result<ReportText> {
        let context = summary.to_json()?;
        let text = self.writer.run(&context).await?;
        Ok(ReportText::new(text))
    }

    async fn load(&self, conversation: &Conversation) -> Result<Option<String>> {
        let Some(output_dir) = self.config.output_path() else {
            return Ok(None);
        };

        let report = conversation
            .report()
            .ok_or_else(|| ReportError::data("conversation has no report to save"))?;

        let target = Path::new(output_dir).join(REPORT_FILENAME);
        let target = target.to_string_lossy().into_owned();

        // 寫入 Markdown 報告
        tracing::debug!("Writing report ({} bytes) to {}", report.len(), target);
        self.storage
            .write_file(&target, render_markdown(conversation, report).as_bytes())
            .await?;

        Ok(Some(target))
    }
}
