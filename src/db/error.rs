use thiserror::Error;
use uuid::Uuid;

/// Failures surfaced by the store. Nothing here is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("{entity} {id} already exists")]
    Constraint { entity: &'static str, id: Uuid },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
}

impl StoreError {
    /// I/O, engine, or decoding failure, as opposed to a logical error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_) | Self::Encoding(_))
    }

    pub(crate) fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// Map a failed INSERT, turning primary key collisions into `Constraint`
    pub(crate) fn on_insert(err: rusqlite::Error, entity: &'static str, id: Uuid) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Constraint { entity, id }
            }
            other => Self::Storage(other),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
