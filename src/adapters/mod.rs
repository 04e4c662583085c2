// Adapters layer: concrete clients for external systems.

pub mod azure_openai;

pub use azure_openai::AzureOpenAiClient;
