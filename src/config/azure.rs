use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::env;
use std::fmt;

pub const API_KEY_VAR: &str = "API_KEY";
pub const DEPLOYMENT_VAR: &str = "AZURE_AI_MODEL_DEPLOYMENT_NAME";
pub const ENDPOINT_VAR: &str = "AZURE_AI_PROJECT_ENDPOINT";
pub const API_VERSION_VAR: &str = "AZURE_AI_API_VERSION";

/// Credentials and routing for an Azure OpenAI chat deployment.
#[derive(Clone, PartialEq, Eq)]
pub struct AzureOpenAiConfig {
    pub api_key: String,
    pub deployment_name: String,
    pub endpoint: String,
    pub api_version: String,
}

impl AzureOpenAiConfig {
    pub fn new(
        api_key: impl Into<String>,
        deployment_name: impl Into<String>,
        endpoint: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            deployment_name: deployment_name.into(),
            endpoint: endpoint.into(),
            api_version: api_version.into(),
        }
    }

    /// 從環境變數載入；任一缺漏即失敗
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| -> Result<String> {
            let value = lookup(name);
            let present = validation::validate_required_field(name, &value)?;
            Ok(present.to_string())
        };

        let config = Self {
            api_key: read(API_KEY_VAR)?,
            deployment_name: read(DEPLOYMENT_VAR)?,
            endpoint: read(ENDPOINT_VAR)?,
            api_version: read(API_VERSION_VAR)?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for AzureOpenAiConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string(API_KEY_VAR, &self.api_key)?;
        validation::validate_non_empty_string(DEPLOYMENT_VAR, &self.deployment_name)?;
        validation::validate_url(ENDPOINT_VAR, &self.endpoint)?;
        validation::validate_non_empty_string(API_VERSION_VAR, &self.api_version)?;
        Ok(())
    }
}

impl fmt::Debug for AzureOpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("deployment_name", &self.deployment_name)
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .finish()
    }
}
