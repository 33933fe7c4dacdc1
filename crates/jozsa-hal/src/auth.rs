//! Credential sources for remote backends.
//!
//! Credentials are always handed to a backend explicitly; nothing here
//! caches a session in process-wide state.

use std::fmt;

use async_trait::async_trait;

use crate::error::{HalError, HalResult};

/// Source of an access token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get a valid access token.
    async fn get_token(&self) -> HalResult<String>;

    /// Check if a token is available without fetching it.
    fn has_valid_token(&self) -> bool;
}

/// Reads the token from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    env_var: String,
}

impl EnvTokenProvider {
    /// Create a provider for the given variable.
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
        }
    }

    /// Provider for `IBM_QUANTUM_TOKEN`.
    pub fn ibm() -> Self {
        Self::new("IBM_QUANTUM_TOKEN")
    }

    /// Name of the variable this provider reads.
    pub fn env_var(&self) -> &str {
        &self.env_var
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn get_token(&self) -> HalResult<String> {
        match std::env::var(&self.env_var) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(HalError::AuthenticationFailed(format!(
                "environment variable {} not set",
                self.env_var
            ))),
        }
    }

    fn has_valid_token(&self) -> bool {
        std::env::var(&self.env_var).is_ok_and(|t| !t.trim().is_empty())
    }
}

/// A fixed token, e.g. from a config file.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> HalResult<String> {
        if self.token.is_empty() {
            return Err(HalError::AuthenticationFailed("empty token".into()));
        }
        Ok(self.token.clone())
    }

    fn has_valid_token(&self) -> bool {
        !self.token.is_empty()
    }
}
