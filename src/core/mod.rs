pub mod agent;
pub mod engine;
pub mod pipeline;
pub mod summarizer;

pub use crate::domain::model::{
    ChatMessage, ChatRequest, ChatRole, Conversation, ConversationMessage, DatasetOverview,
    DateRange, Money, Performer, ReportText, SalesDataset, SalesRecord, SummaryStatistics,
};
pub use crate::domain::ports::{ChatCompletion, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
pub use agent::ChatAgent;
