#![forbid(unsafe_code)]

use ol_core::ids::OwnerId;
use ol_storage::{SqliteStore, StoreError};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub(crate) enum AuthError {
    MissingCredential,
    UnknownCredential,
    ExpiredCredential,
    Store(StoreError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "missing credential"),
            Self::UnknownCredential => write!(f, "unknown credential"),
            Self::ExpiredCredential => write!(f, "expired credential"),
            Self::Store(err) => write!(f, "store: {err}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Resolves a caller credential to an owner. The credential is an opaque
/// token, optionally carrying a `Bearer ` prefix.
pub(crate) trait AuthContext {
    fn resolve_owner(&self, credential: &str) -> Result<OwnerId, AuthError>;
}

impl AuthContext for SqliteStore {
    fn resolve_owner(&self, credential: &str) -> Result<OwnerId, AuthError> {
        let token = credential
            .strip_prefix("Bearer ")
            .unwrap_or(credential)
            .trim();
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let Some(row) = self.resolve_token(token)? else {
            return Err(AuthError::UnknownCredential);
        };
        if row.expires_at_ms <= crate::support::now_ms_i64() {
            return Err(AuthError::ExpiredCredential);
        }

        OwnerId::try_new(row.owner_id).map_err(|_| AuthError::UnknownCredential)
    }
}

/// Mints opaque token text: hex SHA-256 over the owner id, the issue time,
/// the process id, and a process-local counter. No claims, no structure.
pub(crate) fn mint_token_text(owner: OwnerId) -> String {
    use sha2::{Digest, Sha256};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut hasher = Sha256::new();
    hasher.update(owner.get().to_le_bytes());
    hasher.update(crate::support::now_ms_i64().to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());
    hasher.update(COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());

    use std::fmt::Write as _;
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
