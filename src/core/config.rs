use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub const DEFAULT_USER_AGENT: &str = "shelfwatch (software@example.com)";
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Settings for the EDGAR fetch layer. The extraction core never reads these.
#[derive(Clone, Debug)]
pub struct EdgarConfig {
    /// Outbound identification string; SEC requires "App Name (contact)"
    pub user_agent: String,
    pub data_dir: PathBuf,
    pub max_concurrent: usize,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            data_dir: PathBuf::from("data"),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl EdgarConfig {
    pub fn from_env() -> Result<Self> {
        let user_agent = std::env::var("SEC_USER_AGENT")
            .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        let data_dir = PathBuf::from(
            std::env::var("SHELFWATCH_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
        );

        let max_concurrent = match std::env::var("SEC_MAX_CONCURRENT") {
            Ok(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("SEC_MAX_CONCURRENT must be a positive integer: {}", raw))?,
            Err(_) => DEFAULT_MAX_CONCURRENT,
        };

        Ok(Self {
            user_agent,
            data_dir,
            max_concurrent,
        })
    }

    pub fn filings_dir(&self) -> PathBuf {
        self.data_dir.join("edgar").join("filings")
    }

    pub fn facts_dir(&self) -> PathBuf {
        self.data_dir.join("edgar").join("facts")
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir.join("edgar").join("documents")
    }
}
