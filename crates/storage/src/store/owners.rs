#![forbid(unsafe_code)]

use ol_core::ids::OwnerId;
use ol_core::validate::{validate_email, validate_username};
use rusqlite::{OptionalExtension, params};

use super::{
    CreateOwnerRequest, OwnerRow, SqliteStore, StoreError, ensure_owner_exists_tx,
    is_constraint_violation, now_ms,
};

impl SqliteStore {
    /// Registers a new owner. Uniqueness of username and email is enforced by
    /// the insert itself (mapped from the constraint violation), not by a
    /// racy pre-check.
    pub fn create_owner(&mut self, request: CreateOwnerRequest) -> Result<OwnerRow, StoreError> {
        let username = validate_username(&request.username)
            .map_err(|err| StoreError::Validation(err.message()))?
            .to_string();
        let email = validate_email(&request.email)
            .map_err(|err| StoreError::Validation(err.message()))?
            .to_string();
        let now_ms = now_ms();

        let tx = self.write_tx()?;
        let insert = tx.execute(
            "INSERT INTO owners(username, email, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?3)",
            params![username, email, now_ms],
        );

        if let Err(err) = insert {
            if is_constraint_violation(&err) {
                return Err(StoreError::OwnerExists);
            }
            return Err(StoreError::Sql(err));
        }

        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(OwnerRow {
            id,
            username,
            email,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        })
    }

    pub fn get_owner(&self, owner: OwnerId) -> Result<Option<OwnerRow>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, username, email, created_at_ms, updated_at_ms \
                 FROM owners WHERE id=?1",
                params![owner.get()],
                owner_from_row,
            )
            .optional()?)
    }

    pub fn find_owner_by_username(&self, username: &str) -> Result<Option<OwnerRow>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, username, email, created_at_ms, updated_at_ms \
                 FROM owners WHERE username=?1",
                params![username.trim()],
                owner_from_row,
            )
            .optional()?)
    }

    /// Removes the owner; items and tokens go with it through the cascading
    /// foreign keys.
    pub fn delete_owner(&mut self, owner: OwnerId) -> Result<(), StoreError> {
        let tx = self.write_tx()?;
        ensure_owner_exists_tx(&tx, owner)?;
        tx.execute("DELETE FROM owners WHERE id=?1", params![owner.get()])?;
        tx.commit()?;
        Ok(())
    }
}

fn owner_from_row(row: &rusqlite::Row<'_>) -> Result<OwnerRow, rusqlite::Error> {
    Ok(OwnerRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        created_at_ms: row.get(3)?,
        updated_at_ms: row.get(4)?,
    })
}
