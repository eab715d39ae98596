#![forbid(unsafe_code)]

use ol_core::ids::{ItemId, OwnerId};
use ol_core::rank::{Shift, shift_for_move};
use ol_core::validate::validate_title;
use rusqlite::{OptionalExtension, Row, Transaction, params};

use super::{
    CreateItemRequest, ItemRow, SqliteStore, StoreError, UpdateItemRequest, ensure_owner_exists_tx,
    now_ms,
};

const ITEM_COLUMNS: &str =
    "id, owner_id, title, description, completed, order_no, created_at_ms, updated_at_ms";

impl SqliteStore {
    pub fn list_items(&self, owner: OwnerId) -> Result<Vec<ItemRow>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE owner_id=?1 ORDER BY order_no ASC"
        ))?;
        let rows = stmt.query_map(params![owner.get()], item_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_item(&self, owner: OwnerId, id: ItemId) -> Result<ItemRow, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM items WHERE owner_id=?1 AND id=?2"),
                params![owner.get(), id.get()],
                item_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound)
    }

    /// Appends a new item at rank `N+1` for the owner. The next rank is read
    /// inside the same immediate transaction as the insert, so two concurrent
    /// creates for one owner cannot compute the same rank.
    pub fn create_item(
        &mut self,
        owner: OwnerId,
        request: CreateItemRequest,
    ) -> Result<ItemRow, StoreError> {
        let title = validate_title(&request.title)
            .map_err(|err| StoreError::Validation(err.message()))?
            .to_string();
        let now_ms = now_ms();

        let tx = self.write_tx()?;
        ensure_owner_exists_tx(&tx, owner)?;

        let next: i64 = tx.query_row(
            "SELECT COALESCE(MAX(order_no), 0) + 1 FROM items WHERE owner_id=?1",
            params![owner.get()],
            |row| row.get(0),
        )?;

        tx.execute(
            "INSERT INTO items(owner_id, title, description, completed, order_no, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                owner.get(),
                title,
                request.description,
                request.completed,
                next,
                now_ms
            ],
        )?;

        let id = tx.last_insert_rowid();
        let row = item_row_tx(&tx, owner, id)?;
        tx.commit()?;
        Ok(row)
    }

    /// Rewrites the item's payload fields. `order_no` is never altered here.
    pub fn update_item(
        &mut self,
        owner: OwnerId,
        id: ItemId,
        request: UpdateItemRequest,
    ) -> Result<ItemRow, StoreError> {
        let title = validate_title(&request.title)
            .map_err(|err| StoreError::Validation(err.message()))?
            .to_string();
        let now_ms = now_ms();

        let tx = self.write_tx()?;
        item_row_tx(&tx, owner, id.get())?;

        tx.execute(
            "UPDATE items SET title=?3, description=?4, completed=?5, updated_at_ms=?6 \
             WHERE owner_id=?1 AND id=?2",
            params![
                owner.get(),
                id.get(),
                title,
                request.description,
                request.completed,
                now_ms
            ],
        )?;

        let row = item_row_tx(&tx, owner, id.get())?;
        tx.commit()?;
        Ok(row)
    }

    /// Deletes the item and closes the rank gap it leaves: every sibling with
    /// a greater rank shifts down by one, all inside one transaction.
    pub fn delete_item(&mut self, owner: OwnerId, id: ItemId) -> Result<(), StoreError> {
        let tx = self.write_tx()?;
        let removed_order = current_order_tx(&tx, owner, id.get())?;

        tx.execute(
            "DELETE FROM items WHERE owner_id=?1 AND id=?2",
            params![owner.get(), id.get()],
        )?;

        tx.execute(
            "UPDATE items SET order_no = -(order_no - 1) WHERE owner_id=?1 AND order_no > ?2",
            params![owner.get(), removed_order],
        )?;
        flip_negated_ranks_tx(&tx, owner)?;

        tx.commit()?;
        Ok(())
    }

    /// Moves the item to `new_order_no` (1-based), shifting the in-between
    /// siblings by one toward the vacated slot.
    pub fn move_item(
        &mut self,
        owner: OwnerId,
        id: ItemId,
        new_order_no: i64,
    ) -> Result<(), StoreError> {
        let now_ms = now_ms();

        let tx = self.write_tx()?;
        let current = current_order_tx(&tx, owner, id.get())?;

        let max: i64 = tx.query_row(
            "SELECT COUNT(*) FROM items WHERE owner_id=?1",
            params![owner.get()],
            |row| row.get(0),
        )?;

        if new_order_no < 1 || new_order_no > max {
            return Err(StoreError::InvalidPosition {
                requested: new_order_no,
                max,
            });
        }

        match shift_for_move(current, new_order_no) {
            Shift::None => {
                tx.commit()?;
                return Ok(());
            }
            Shift::Down { above, upto } => {
                park_item_tx(&tx, owner, id.get())?;
                tx.execute(
                    "UPDATE items SET order_no = -(order_no - 1) \
                     WHERE owner_id=?1 AND order_no > ?2 AND order_no <= ?3",
                    params![owner.get(), above, upto],
                )?;
                flip_negated_ranks_tx(&tx, owner)?;
            }
            Shift::Up { from, below } => {
                park_item_tx(&tx, owner, id.get())?;
                tx.execute(
                    "UPDATE items SET order_no = -(order_no + 1) \
                     WHERE owner_id=?1 AND order_no >= ?2 AND order_no < ?3",
                    params![owner.get(), from, below],
                )?;
                flip_negated_ranks_tx(&tx, owner)?;
            }
        }

        tx.execute(
            "UPDATE items SET order_no=?3, updated_at_ms=?4 WHERE owner_id=?1 AND id=?2",
            params![owner.get(), id.get(), new_order_no, now_ms],
        )?;

        tx.commit()?;
        Ok(())
    }
}

fn item_from_row(row: &Row<'_>) -> Result<ItemRow, rusqlite::Error> {
    Ok(ItemRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        completed: row.get(4)?,
        order_no: row.get(5)?,
        created_at_ms: row.get(6)?,
        updated_at_ms: row.get(7)?,
    })
}

fn item_row_tx(tx: &Transaction<'_>, owner: OwnerId, id: i64) -> Result<ItemRow, StoreError> {
    tx.query_row(
        &format!("SELECT {ITEM_COLUMNS} FROM items WHERE owner_id=?1 AND id=?2"),
        params![owner.get(), id],
        item_from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound)
}

fn current_order_tx(tx: &Transaction<'_>, owner: OwnerId, id: i64) -> Result<i64, StoreError> {
    tx.query_row(
        "SELECT order_no FROM items WHERE owner_id=?1 AND id=?2",
        params![owner.get(), id],
        |row| row.get::<_, i64>(0),
    )
    .optional()?
    .ok_or(StoreError::NotFound)
}

// SQLite checks UNIQUE(owner_id, order_no) per row inside a single UPDATE,
// so a range shift cannot write final ranks directly. The moved row parks at
// rank 0, the affected range lands on negated target ranks, and a second
// statement flips the sign. Every intermediate row state stays unique.
fn park_item_tx(tx: &Transaction<'_>, owner: OwnerId, id: i64) -> Result<(), StoreError> {
    tx.execute(
        "UPDATE items SET order_no = 0 WHERE owner_id=?1 AND id=?2",
        params![owner.get(), id],
    )?;
    Ok(())
}

fn flip_negated_ranks_tx(tx: &Transaction<'_>, owner: OwnerId) -> Result<(), StoreError> {
    tx.execute(
        "UPDATE items SET order_no = -order_no WHERE owner_id=?1 AND order_no < 0",
        params![owner.get()],
    )?;
    Ok(())
}
