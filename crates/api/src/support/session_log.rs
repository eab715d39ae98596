#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

/// Best-effort, bounded session record written next to the database.
/// Stdout/stderr belong to the line protocol, so diagnostics go here.
#[derive(Clone, Debug)]
pub(crate) struct SessionLog {
    path: PathBuf,
    start_rfc3339: String,
    pid: u32,
    args: Vec<String>,
    last_op: Option<String>,
    last_error: Option<String>,
    exit: Option<String>,
}

impl SessionLog {
    pub(crate) fn new(db_path: &Path) -> Self {
        let dir = match db_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let this = Self {
            path: dir.join("orderly_last_session.txt"),
            start_rfc3339: crate::support::ts_ms_to_rfc3339(crate::support::now_ms_i64()),
            pid: std::process::id(),
            args: std::env::args().collect(),
            last_op: None,
            last_error: None,
            exit: None,
        };
        this.flush();
        this
    }

    pub(crate) fn note_op(&mut self, op: &str) {
        let op = op.trim();
        if op.is_empty() {
            return;
        }
        self.last_op = Some(truncate(op, 96));
        self.flush();
    }

    pub(crate) fn note_error(&mut self, error: &str) {
        let error = error.trim();
        if error.is_empty() {
            return;
        }
        self.last_error = Some(truncate(error, 300));
        self.flush();
    }

    pub(crate) fn note_exit(&mut self, reason: &str) {
        self.exit = Some(truncate(reason.trim(), 120));
        self.flush();
    }

    fn flush(&self) {
        let Some(dir) = self.path.parent() else {
            return;
        };
        let _ = std::fs::create_dir_all(dir);

        let mut out = String::new();
        push_kv(&mut out, "ts_start", &self.start_rfc3339);
        push_kv(&mut out, "pid", &self.pid.to_string());
        push_kv(&mut out, "args", &format!("{:?}", self.args));
        if let Some(op) = &self.last_op {
            push_kv(&mut out, "last_op", op);
        }
        if let Some(err) = &self.last_error {
            push_kv(&mut out, "last_error", err);
        }
        if let Some(exit) = &self.exit {
            push_kv(&mut out, "exit", exit);
        }

        let _ = std::fs::write(&self.path, out);
    }
}

fn push_kv(out: &mut String, key: &str, value: &str) {
    use std::fmt::Write as _;
    let _ = writeln!(out, "{key}={value}");
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut out = String::new();
    for (idx, ch) in value.chars().enumerate() {
        if idx >= max_chars {
            break;
        }
        out.push(ch);
    }
    out
}
