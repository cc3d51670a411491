//! Bearer token seam.
//!
//! Acquiring and refreshing tokens belongs to the caller. The client asks the
//! provider for a token once per request and treats it as opaque.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Token {
    #[serde(alias = "accessToken")]
    pub access_token: String,
}

impl OAuth2Token {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for OAuth2Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Token")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_token(&self) -> ApiResult<OAuth2Token>;
}

/// Hands out the same token on every call.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: OAuth2Token,
}

impl StaticTokenProvider {
    pub fn new(token: OAuth2Token) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> ApiResult<OAuth2Token> {
        Ok(self.token.clone())
    }
}
