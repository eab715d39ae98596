#![forbid(unsafe_code)]

use ol_core::ids::OwnerId;
use rusqlite::{OptionalExtension, params};

use super::{SqliteStore, StoreError, TokenRow, ensure_owner_exists_tx, now_ms};

impl SqliteStore {
    /// Records an opaque access token for the owner. The token text is
    /// minted by the caller; the store only cares that it is unique.
    pub fn issue_token(
        &mut self,
        owner: OwnerId,
        token: String,
        ttl_ms: i64,
    ) -> Result<TokenRow, StoreError> {
        let issued_at_ms = now_ms();
        let expires_at_ms = issued_at_ms.saturating_add(ttl_ms.max(0));

        let tx = self.write_tx()?;
        ensure_owner_exists_tx(&tx, owner)?;
        tx.execute(
            "INSERT INTO access_tokens(token, owner_id, issued_at_ms, expires_at_ms) \
             VALUES (?1, ?2, ?3, ?4)",
            params![token, owner.get(), issued_at_ms, expires_at_ms],
        )?;
        tx.commit()?;

        Ok(TokenRow {
            token,
            owner_id: owner.get(),
            issued_at_ms,
            expires_at_ms,
        })
    }

    /// Plain lookup; the caller judges expiry against its own clock.
    pub fn resolve_token(&self, token: &str) -> Result<Option<TokenRow>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT token, owner_id, issued_at_ms, expires_at_ms \
                 FROM access_tokens WHERE token=?1",
                params![token],
                |row| {
                    Ok(TokenRow {
                        token: row.get(0)?,
                        owner_id: row.get(1)?,
                        issued_at_ms: row.get(2)?,
                        expires_at_ms: row.get(3)?,
                    })
                },
            )
            .optional()?)
    }

    pub fn revoke_token(&mut self, token: &str) -> Result<bool, StoreError> {
        let tx = self.write_tx()?;
        let deleted = tx.execute("DELETE FROM access_tokens WHERE token=?1", params![token])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    pub fn purge_expired_tokens(&mut self, now_ms: i64) -> Result<usize, StoreError> {
        let tx = self.write_tx()?;
        let purged = tx.execute(
            "DELETE FROM access_tokens WHERE expires_at_ms <= ?1",
            params![now_ms],
        )?;
        tx.commit()?;
        Ok(purged)
    }
}
