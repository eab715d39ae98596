#![forbid(unsafe_code)]

mod auth;
mod config;
mod dto;
mod errors;
mod server;
mod support;

use ol_storage::SqliteStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", config::usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{}", config::version_line());
        return Ok(());
    }

    let db_path = config::parse_db_path();
    let token_ttl_ms = config::parse_token_ttl_ms();
    let mut session_log = support::SessionLog::new(&db_path);

    let store = match SqliteStore::open(&db_path) {
        Ok(store) => store,
        Err(err) => {
            session_log.note_error(&err.to_string());
            session_log.note_exit("open_failed");
            return Err(Box::new(err));
        }
    };

    let mut server = server::ApiServer::new(store, token_ttl_ms);
    let result = server::run_stdio(&mut server, &mut session_log);
    match &result {
        Ok(()) => session_log.note_exit("eof"),
        Err(err) => {
            session_log.note_error(&err.to_string());
            session_log.note_exit("error");
        }
    }
    result
}
