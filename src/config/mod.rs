use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://diginotebackend.netlify.app";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub document_debounce_ms: u64,
    pub user_debounce_ms: u64,
}

impl SearchConfig {
    pub fn document_debounce(&self) -> Duration {
        Duration::from_millis(self.document_debounce_ms)
    }

    pub fn user_debounce(&self) -> Duration {
        Duration::from_millis(self.user_debounce_ms)
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("DIGINOTES_ENV").as_deref() {
            Ok("development") | Ok("dev") => Environment::Development,
            _ => Environment::Production,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DIGINOTES_API_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("DIGINOTES_REQUEST_LOGGING") {
            self.api.request_logging = v.parse().unwrap_or(self.api.request_logging);
        }

        if let Ok(v) = env::var("DIGINOTES_DOCUMENT_SEARCH_DEBOUNCE_MS") {
            self.search.document_debounce_ms = v.parse().unwrap_or(self.search.document_debounce_ms);
        }
        if let Ok(v) = env::var("DIGINOTES_USER_SEARCH_DEBOUNCE_MS") {
            self.search.user_debounce_ms = v.parse().unwrap_or(self.search.user_debounce_ms);
        }

        self
    }

    /// Base URL replaced, everything else from the production preset
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::production();
        config.api.base_url = base_url.into();
        config
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                request_logging: true,
            },
            search: SearchConfig {
                document_debounce_ms: 500,
                user_debounce_ms: 0,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                request_logging: false,
            },
            search: SearchConfig {
                document_debounce_ms: 500,
                user_debounce_ms: 0,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

pub fn config() -> &'static ClientConfig {
    &CONFIG
}
