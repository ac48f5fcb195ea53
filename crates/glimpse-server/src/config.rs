use glimpse_core::GlimpseError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Process-environment configuration for the server binary.
///
/// A missing API key is deliberately not rejected here: the first model call
/// fails with a provider error instead, matching the observed behavior.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, GlimpseError> {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let base_url = std::env::var("OPENAI_BASE_URL").ok();
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| GlimpseError::Config(format!("invalid PORT value: {raw}")))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url,
            port,
        })
    }
}
