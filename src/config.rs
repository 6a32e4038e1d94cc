use std::{fs::File, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::api::Endpoints;
use crate::session::DEFAULT_USER_AGENT;

pub const PASSWORD_VARIABLE: &str = "SUI_PASSWORD";

#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub account_book: Option<String>,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Configuration {
    pub fn load(path: &Path) -> anyhow::Result<Configuration> {
        debug!("loading {}", path.display());
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    /// The environment wins over the file so the password can stay out of it.
    pub fn password(&self) -> Option<String> {
        std::env::var(PASSWORD_VARIABLE)
            .ok()
            .or_else(|| self.password.clone())
    }
}
