use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Amount in whole cents. Serialized the way stakeholders read it: `$1,234.50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// 由十進位金額換算，四捨五入到分
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = (abs / 100).to_string();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{}${}.{:02}", sign, grouped, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the sales CSV. `revenue` is already resolved from either the
/// revenue column or `units_sold * unit_price`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub product: String,
    pub salesperson: String,
    pub units_sold: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,
    pub revenue: Money,
}

/// Parsed CSV: header names in file order plus rows in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesDataset {
    pub columns: Vec<String>,
    pub records: Vec<SalesRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Performer {
    pub name: String,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub total_revenue: Money,
    pub total_units_sold: u64,
    pub average_revenue_per_transaction: Money,
    pub number_of_transactions: usize,
    pub date_range: DateRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_region: Option<Performer>,
    pub top_product: Performer,
    pub top_salesperson: Performer,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub region_breakdown: Vec<Performer>,
    pub product_breakdown: Vec<Performer>,
    pub salesperson_breakdown: Vec<Performer>,
}

impl SummaryStatistics {
    /// The textual form handed to the report writer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub total_rows: usize,
    pub columns: Vec<String>,
    pub sample_data: Vec<SalesRecord>,
    pub date_range: DateRange,
}

/// Narrative returned by the language model. Opaque beyond display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportText(String);

impl ReportText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ReportText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationMessage {
    pub author: String,
    pub role: ChatRole,
    pub text: String,
}

/// Everything the workflow said, in order: prompt, analysis, report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    pub messages: Vec<ConversationMessage>,
}

impl Conversation {
    pub fn push(&mut self, author: impl Into<String>, role: ChatRole, text: impl Into<String>) {
        self.messages.push(ConversationMessage {
            author: author.into(),
            role,
            text: text.into(),
        });
    }

    /// Text of the final assistant message, i.e. the report.
    pub fn report(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant)
            .map(|m| m.text.as_str())
    }

    pub fn render(&self) -> String {
        let mut out = String::from("\n===== Conversation =====\n");
        for (i, msg) in self.messages.iter().enumerate() {
            out.push_str(&format!(
                "{}\n{:02} [{}]\n{}\n",
                "-".repeat(60),
                i + 1,
                msg.author,
                msg.text
            ));
        }
        out
    }
}
