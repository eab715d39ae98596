#![forbid(unsafe_code)]

use std::path::PathBuf;

pub(crate) const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_DB_FILE: &str = "orderly.db";
const DEFAULT_TOKEN_TTL_MS: i64 = 24 * 60 * 60 * 1000;

pub(crate) fn usage() -> &'static str {
    "ol_api — Orderly line-protocol server (stdio)\n\n\
USAGE:\n\
  ol_api [--db PATH] [--token-ttl-ms N]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version and exit\n\
\n\
NOTES:\n\
  - One JSON request object per stdin line; one JSON response per stdout line\n\
  - Env fallbacks: ORDERLY_DB, ORDERLY_TOKEN_TTL_MS\n"
}

pub(crate) fn version_line() -> String {
    format!("ol_api {SERVER_VERSION}")
}

pub(crate) fn parse_db_path() -> PathBuf {
    let mut args = std::env::args().skip(1);
    let mut db_path: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        if arg.as_str() == "--db"
            && let Some(value) = args.next()
        {
            db_path = Some(PathBuf::from(value));
        }
    }
    if let Some(path) = db_path {
        return path;
    }
    std::env::var_os("ORDERLY_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

pub(crate) fn parse_token_ttl_ms() -> i64 {
    let mut args = std::env::args().skip(1);
    let mut cli: Option<String> = None;
    while let Some(arg) = args.next() {
        if arg.as_str() == "--token-ttl-ms"
            && let Some(value) = args.next()
        {
            cli = Some(value);
            break;
        }
    }

    let value = cli.or_else(|| std::env::var("ORDERLY_TOKEN_TTL_MS").ok());
    value
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|ttl| *ttl > 0)
        .unwrap_or(DEFAULT_TOKEN_TTL_MS)
}
