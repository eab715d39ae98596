#![forbid(unsafe_code)]

mod session_log;
mod time;

pub(crate) use session_log::*;
pub(crate) use time::*;
