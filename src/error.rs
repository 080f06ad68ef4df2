use rusqlite::ffi;
use thiserror::Error;

/// Failure of a single persistence call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} '{id}' already exists ({detail})")]
    Duplicate {
        entity: &'static str,
        id: String,
        detail: String,
    },

    #[error("{entity} '{id}' references a record that does not exist ({detail})")]
    MissingReference {
        entity: &'static str,
        id: String,
        detail: String,
    },

    #[error("Database not initialized. Run 'journey init' first.")]
    NotInitialized,

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("cannot prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Sorts constraint failures from an insert into duplicate-key and
    /// missing-reference errors; anything else is passed through.
    pub fn classify(err: rusqlite::Error, entity: &'static str, id: &str) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &err {
            let detail = message.clone().unwrap_or_else(|| failure.to_string());
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    return StoreError::Duplicate {
                        entity,
                        id: id.to_string(),
                        detail,
                    };
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return StoreError::MissingReference {
                        entity,
                        id: id.to_string(),
                        detail,
                    };
                }
                _ => {}
            }
        }
        StoreError::Sqlite(err)
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }

    pub fn is_missing_reference(&self) -> bool {
        matches!(self, StoreError::MissingReference { .. })
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
