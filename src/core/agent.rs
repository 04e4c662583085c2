use crate::core::{ChatCompletion, ChatMessage, ChatRequest};
use crate::utils::error::Result;
use std::sync::Arc;

pub const DATA_ANALYZER_NAME: &str = "DataAnalyzer";
pub const REPORT_WRITER_NAME: &str = "ReportWriter";

pub const REPORT_WRITER_INSTRUCTIONS: &str = "\
You are an internal business analyst writing daily sales summaries for stakeholders. \
You will receive structured JSON data from the previous agent. \
Your job is to create a clear, actionable report for Slack/Teams/Email.

**REQUIRED FORMAT**:
1. Header: Date range + quick summary line
2. Key Metrics: 3-4 most important numbers (revenue, transactions, averages)
3. Top Performers: Best region/product/salesperson with their numbers
4. Brief Insight: ONE sentence about what stands out or needs attention

**EXAMPLE 1 (Restaurant Context)**:
📊 **Daily Sales Report - Nov 17, 2025**

Strong Friday! Dinner rush drove solid numbers.

**Key Metrics:**
• Total Revenue: $8,450
• Transactions: 127
• Avg Check: $66.54
• Units Sold: 342

**Top Performers:**
🏆 Best Location: Downtown ($3,200)
🍕 Best Item: Margherita Pizza ($1,890 revenue)
⭐ Top Server: Maria ($2,100 in sales)

💡 *Insight: Downtown location up 18% vs last Friday. Consider staffing boost for weekends.*

**EXAMPLE 2 (Retail Context)**:
📈 **Sales Summary - October 2024**

Solid month with consistent growth across regions.

**Key Metrics:**
• Total Revenue: $1,070,000
• Transactions: 56
• Avg Deal Size: $19,107
• Units Moved: 5,780

**Top Performers:**
🌎 Best Region: East ($272,000)
📦 Best Product: Product D ($352,000)
🎯 Top Rep: Mike Brown ($272,000)

💡 *Insight: Product D momentum continues - up 22% MoM. Stock levels should be reviewed.*

**CRITICAL RULES**:
- Professional but conversational tone
- Use EXACT numbers from JSON data
- Keep total message under 150 words
- Include ONE actionable insight at the end
- Use minimal emojis (just for section headers and highlights)
- Format for readability in Slack/Teams (bold headers, bullet points)
- NO fluff or unnecessary commentary

**Adapt context based on data** (restaurant, retail, e-commerce, etc.)";

/// A named role bound to a completion endpoint.
#[derive(Clone)]
pub struct ChatAgent {
    name: String,
    instructions: String,
    client: Arc<dyn ChatCompletion>,
}

impl ChatAgent {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        client: Arc<dyn ChatCompletion>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            client,
        }
    }

    pub fn report_writer(client: Arc<dyn ChatCompletion>) -> Self {
        Self::new(REPORT_WRITER_NAME, REPORT_WRITER_INSTRUCTIONS, client)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Instructions go in as the system message, `input` verbatim as the user message.
    pub fn build_request(&self, input: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![
                ChatMessage::system(self.instructions.as_str()),
                ChatMessage::user(input),
            ],
        }
    }

    pub async fn run(&self, input: &str) -> Result<String> {
        tracing::debug!("Agent {} received {} chars of input", self.name, input.len());
        let text = self.client.complete(self.build_request(input)).await?;
        tracing::debug!("Agent {} produced {} chars", self.name, text.len());
        Ok(text)
    }
}

impl std::fmt::Debug for ChatAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAgent")
            .field("name", &self.name)
            .field("instructions_len", &self.instructions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChatRole;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingClient {
        reply: String,
        requests: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl ChatCompletion for RecordingClient {
        async fn complete(&self, request: ChatRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_run_sends_instructions_and_input_verbatim() {
        let client = Arc::new(RecordingClient {
            reply: "Report body".to_string(),
            requests: Mutex::new(Vec::new()),
        });
        let agent = ChatAgent::new("Writer", "Be concise.", client.clone());

        let output = agent.run("{\"total\": 1}").await.unwrap();
        assert_eq!(output, "Report body");

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[0].messages[0].role, ChatRole::System);
        assert_eq!(requests[0].messages[0].content, "Be concise.");
        assert_eq!(requests[0].messages[1].role, ChatRole::User);
        assert_eq!(requests[0].messages[1].content, "{\"total\": 1}");
    }

    #[test]
    fn test_report_writer_defaults() {
        let client = Arc::new(RecordingClient {
            reply: String::new(),
            requests: Mutex::new(Vec::new()),
        });
        let agent = ChatAgent::report_writer(client);
        assert_eq!(agent.name(), REPORT_WRITER_NAME);
        assert!(agent.instructions().contains("Use EXACT numbers from JSON data"));
        assert!(agent.instructions().contains("**EXAMPLE 1 (Restaurant Context)**"));
        assert!(agent
            .instructions()
            .contains("Product D momentum continues - up 22% MoM. Stock levels should be reviewed."));
    }
}
