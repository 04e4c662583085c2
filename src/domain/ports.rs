use crate::domain::model::{
    ChatRequest, Conversation, ReportText, SalesDataset, SummaryStatistics,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn csv_path(&self) -> &str;
    fn output_path(&self) -> Option<&str>;
}

/// A hosted chat-completion endpoint: messages in, assistant text out.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SalesDataset>;
    async fn summarize(&self, dataset: &SalesDataset) -> Result<SummaryStatistics>;
    async fn compose(&self, summary: &SummaryStatistics) -> Result<ReportText>;
    /// Persists the finished conversation; returns where it went, if anywhere.
    async fn load(&self, conversation: &Conversation) -> Result<Option<String>>;
}
