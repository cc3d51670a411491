//! Client configuration.
//!
//! Defaults are layered under `ADPOSTING_*` environment variables, e.g.
//! `ADPOSTING_BASE_URI=https://adposting.example/`.

use std::time::Duration;

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

pub const ENV_PREFIX: &str = "ADPOSTING_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_uri: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_uri: "http://localhost:8080/".to_string(),
            timeout_secs: 30,
            user_agent: concat!("adposting-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn load() -> ApiResult<Self> {
        Self::figment()
            .extract()
            .map_err(|e| ApiError::Config(e.to_string()))
    }

    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(ClientConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
