#![forbid(unsafe_code)]

use crate::auth::{AuthContext, mint_token_text};
use crate::dto::{
    CreateItemParams, IssueParams, ItemDto, ItemIdParams, MoveItemParams, OwnerDto, RegisterParams,
    RequestEnvelope, UpdateItemParams,
};
use crate::errors::ApiError;
use crate::support::{SessionLog, ts_ms_to_rfc3339};
use ol_core::ids::{ItemId, OwnerId};
use ol_storage::{CreateItemRequest, CreateOwnerRequest, SqliteStore, UpdateItemRequest};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Write};

pub(crate) struct ApiServer {
    store: SqliteStore,
    token_ttl_ms: i64,
}

pub(crate) struct HandledLine {
    pub(crate) op: Option<String>,
    pub(crate) error_kind: Option<&'static str>,
    pub(crate) response: Value,
}

impl ApiServer {
    pub(crate) fn new(store: SqliteStore, token_ttl_ms: i64) -> Self {
        Self {
            store,
            token_ttl_ms,
        }
    }

    /// One request line in, one response envelope out. A line that does not
    /// parse yields an `id: 0` bad_request instead of killing the loop.
    pub(crate) fn handle_line(&mut self, raw: &str) -> HandledLine {
        let envelope: RequestEnvelope = match serde_json::from_str(raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                let error = ApiError::BadRequest(format!("unparseable request: {err}"));
                return HandledLine {
                    op: None,
                    error_kind: Some(error.kind()),
                    response: error_envelope(0, &error),
                };
            }
        };

        match self.dispatch(&envelope) {
            Ok(result) => HandledLine {
                op: Some(envelope.op),
                error_kind: None,
                response: json!({"id": envelope.id, "ok": true, "result": result}),
            },
            Err(error) => HandledLine {
                op: Some(envelope.op),
                error_kind: Some(error.kind()),
                response: error_envelope(envelope.id, &error),
            },
        }
    }

    fn dispatch(&mut self, envelope: &RequestEnvelope) -> Result<Value, ApiError> {
        match envelope.op.as_str() {
            "owners.register" => {
                let params: RegisterParams = parse_params(&envelope.params)?;
                let owner_row = self.store.create_owner(CreateOwnerRequest {
                    username: params.username,
                    email: params.email,
                })?;
                let owner = owner_id(owner_row.id)?;
                let token_row =
                    self.store
                        .issue_token(owner, mint_token_text(owner), self.token_ttl_ms)?;
                Ok(json!({
                    "owner": OwnerDto::from_row(owner_row),
                    "token": token_row.token,
                    "expires_at": ts_ms_to_rfc3339(token_row.expires_at_ms),
                }))
            }
            "owners.me" => {
                let owner = self.authed(envelope)?;
                let row = self.store.get_owner(owner)?.ok_or(ApiError::UnknownOwner)?;
                Ok(json!({"owner": OwnerDto::from_row(row)}))
            }
            "owners.delete" => {
                let owner = self.authed(envelope)?;
                self.store.delete_owner(owner)?;
                Ok(json!({"deleted": true}))
            }
            "auth.issue" => {
                let params: IssueParams = parse_params(&envelope.params)?;
                let row = self
                    .store
                    .find_owner_by_username(&params.username)?
                    .ok_or(ApiError::UnknownOwner)?;
                let owner = owner_id(row.id)?;
                let token_row =
                    self.store
                        .issue_token(owner, mint_token_text(owner), self.token_ttl_ms)?;
                Ok(json!({
                    "token": token_row.token,
                    "expires_at": ts_ms_to_rfc3339(token_row.expires_at_ms),
                }))
            }
            "auth.revoke" => {
                let credential = envelope.token.as_deref().unwrap_or("");
                let token = credential
                    .strip_prefix("Bearer ")
                    .unwrap_or(credential)
                    .trim();
                if token.is_empty() {
                    return Err(ApiError::Unauthorized("missing credential"));
                }
                let revoked = self.store.revoke_token(token)?;
                Ok(json!({"revoked": revoked}))
            }
            "items.list" => {
                let owner = self.authed(envelope)?;
                let items: Vec<ItemDto> = self
                    .store
                    .list_items(owner)?
                    .into_iter()
                    .map(ItemDto::from_row)
                    .collect();
                Ok(json!(items))
            }
            "items.get" => {
                let owner = self.authed(envelope)?;
                let params: ItemIdParams = parse_params(&envelope.params)?;
                let row = self.store.get_item(owner, item_id(params.id)?)?;
                Ok(json!(ItemDto::from_row(row)))
            }
            "items.create" => {
                let owner = self.authed(envelope)?;
                let params: CreateItemParams = parse_params(&envelope.params)?;
                let row = self.store.create_item(
                    owner,
                    CreateItemRequest {
                        title: params.title,
                        description: params.description,
                        completed: params.completed,
                    },
                )?;
                Ok(json!(ItemDto::from_row(row)))
            }
            "items.update" => {
                let owner = self.authed(envelope)?;
                let params: UpdateItemParams = parse_params(&envelope.params)?;
                let row = self.store.update_item(
                    owner,
                    item_id(params.id)?,
                    UpdateItemRequest {
                        title: params.title,
                        description: params.description,
                        completed: params.completed,
                    },
                )?;
                Ok(json!(ItemDto::from_row(row)))
            }
            "items.delete" => {
                let owner = self.authed(envelope)?;
                let params: ItemIdParams = parse_params(&envelope.params)?;
                self.store.delete_item(owner, item_id(params.id)?)?;
                Ok(json!({"deleted": true}))
            }
            "items.move" => {
                let owner = self.authed(envelope)?;
                let params: MoveItemParams = parse_params(&envelope.params)?;
                self.store.move_item(owner, item_id(params.id)?, params.to)?;
                Ok(json!({"moved": true}))
            }
            other => Err(ApiError::BadRequest(format!("unknown op: {other}"))),
        }
    }

    fn authed(&self, envelope: &RequestEnvelope) -> Result<OwnerId, ApiError> {
        let credential = envelope.token.as_deref().unwrap_or("");
        Ok(self.store.resolve_owner(credential)?)
    }
}

pub(crate) fn run_stdio(
    server: &mut ApiServer,
    session_log: &mut SessionLog,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }

        let handled = server.handle_line(raw);
        if let Some(op) = &handled.op {
            session_log.note_op(op);
        }
        if let Some(kind) = handled.error_kind {
            session_log.note_error(kind);
        }

        writeln!(stdout, "{}", serde_json::to_string(&handled.response)?)?;
        stdout.flush()?;
    }

    Ok(())
}

fn error_envelope(id: u64, error: &ApiError) -> Value {
    json!({"id": id, "ok": false, "error": error.to_value()})
}

fn parse_params<T: DeserializeOwned>(params: &Value) -> Result<T, ApiError> {
    serde_json::from_value(params.clone())
        .map_err(|err| ApiError::BadRequest(format!("invalid params: {err}")))
}

fn owner_id(raw: i64) -> Result<OwnerId, ApiError> {
    OwnerId::try_new(raw).map_err(|err| ApiError::BadRequest(err.message().to_string()))
}

fn item_id(raw: i64) -> Result<ItemId, ApiError> {
    ItemId::try_new(raw).map_err(|err| ApiError::BadRequest(err.message().to_string()))
}
