#![forbid(unsafe_code)]

use ol_storage::{ItemRow, OwnerRow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct RequestEnvelope {
    #[serde(default)]
    pub(crate) id: u64,
    pub(crate) op: String,
    #[serde(default)]
    pub(crate) token: Option<String>,
    #[serde(default)]
    pub(crate) params: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterParams {
    pub(crate) username: String,
    pub(crate) email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueParams {
    pub(crate) username: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemIdParams {
    pub(crate) id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateItemParams {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) completed: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateItemParams {
    pub(crate) id: i64,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) completed: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoveItemParams {
    pub(crate) id: i64,
    pub(crate) to: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ItemDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) completed: bool,
    pub(crate) order_no: i64,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ItemDto {
    pub(crate) fn from_row(row: ItemRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            order_no: row.order_no,
            created_at: crate::support::ts_ms_to_rfc3339(row.created_at_ms),
            updated_at: crate::support::ts_ms_to_rfc3339(row.updated_at_ms),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OwnerDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl OwnerDto {
    pub(crate) fn from_row(row: OwnerRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: crate::support::ts_ms_to_rfc3339(row.created_at_ms),
            updated_at: crate::support::ts_ms_to_rfc3339(row.updated_at_ms),
        }
    }
}
