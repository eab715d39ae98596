#![forbid(unsafe_code)]

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    NotFound,
    Validation(&'static str),
    InvalidPosition { requested: i64, max: i64 },
    UnknownOwner,
    OwnerExists,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::NotFound => write!(f, "item not found"),
            Self::Validation(message) => write!(f, "validation: {message}"),
            Self::InvalidPosition { requested, max } => {
                write!(f, "invalid position (requested={requested}, max={max})")
            }
            Self::UnknownOwner => write!(f, "unknown owner"),
            Self::OwnerExists => write!(f, "owner already exists"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}
