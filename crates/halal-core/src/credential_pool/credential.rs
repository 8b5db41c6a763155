use std::fmt;
use std::sync::Arc;

/// Provider secret. Redacted in `Debug` so it never reaches a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(Arc::from(raw.as_ref()))
    }

    /// Raw secret for the outbound request header/query.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// One pooled credential. The label is what logs and exclusion sets use.
#[derive(Debug, Clone)]
pub(super) struct Credential {
    pub(super) id: String,
    pub(super) key: ApiKey,
}

/// A credential handed out for a single provider attempt.
#[derive(Debug, Clone)]
pub struct CredentialLease {
    id: String,
    key: ApiKey,
}

impl CredentialLease {
    pub(super) fn from_credential(credential: &Credential) -> Self {
        Self { id: credential.id.clone(), key: credential.key.clone() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn key(&self) -> &ApiKey {
        &self.key
    }
}
