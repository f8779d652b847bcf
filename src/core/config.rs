use anyhow::{anyhow, Result};
use url::Url;

#[derive(Clone, Debug)]
pub struct ReconcilerConfig {
    /// Generation endpoint of the AI completion service.
    pub completion_url: Url,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub user_agent: String,
}

impl ReconcilerConfig {
    pub fn from_env() -> Result<Self> {
        let completion_url = std::env::var("RECONCILE_COMPLETION_URL")
            .map_err(|_| anyhow!("RECONCILE_COMPLETION_URL environment variable not set"))?;
        let completion_url = Url::parse(&completion_url)
            .map_err(|e| anyhow!("RECONCILE_COMPLETION_URL is not a valid URL: {}", e))?;

        let model =
            std::env::var("RECONCILE_MODEL").unwrap_or_else(|_| "gpt-oss-20b".to_string());

        let temperature = match std::env::var("RECONCILE_TEMPERATURE") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow!("RECONCILE_TEMPERATURE is not a number: {}", raw))?,
            Err(_) => 0.2,
        };

        let max_tokens = match std::env::var("RECONCILE_MAX_TOKENS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow!("RECONCILE_MAX_TOKENS is not an integer: {}", raw))?,
            Err(_) => 2048,
        };

        let user_agent = std::env::var("USER_AGENT")
            .unwrap_or_else(|_| "software@example.com".to_string());

        Ok(Self {
            completion_url,
            model,
            temperature,
            max_tokens,
            user_agent,
        })
    }
}
