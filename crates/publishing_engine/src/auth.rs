//! Credentials for admin API calls.
//!
//! The engine asks the provider for a token on every request and forwards it
//! as a bearer header; it never stores one of its own.

pub trait AuthProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// No credentials; requests go out without an `Authorization` header.
#[derive(Debug, Default, Clone, Copy)]
pub struct Anonymous;

impl AuthProvider for Anonymous {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Token handed over by the session layer.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

impl AuthProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Reads the token from an environment variable at call time.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl AuthProvider for EnvTokenProvider {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

pub(crate) fn authorization_value(provider: &dyn AuthProvider) -> Option<String> {
    provider.bearer_token().map(|token| format!("Bearer {token}"))
}
