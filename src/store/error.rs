//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `AppError`.
//! Key violations become `Conflict`; everything else is a store failure.

use crate::error::AppError;

/// Maps a rusqlite error to an AppError.
///
/// # Error Mapping
///
/// - `SQLITE_CONSTRAINT_UNIQUE` / `SQLITE_CONSTRAINT_PRIMARYKEY` → `AppError::Conflict`
/// - Cannot open → `AppError::Store` with a connection message
/// - All other errors → `AppError::Store`
pub(crate) fn map_rusqlite_error(err: &rusqlite::Error) -> AppError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            AppError::Conflict(format!("Duplicate key: {err}"))
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            AppError::Store(format!("Cannot open database: {err}"))
        }

        _ => AppError::Store(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to an AppError.
///
/// Extracts the inner `rusqlite::Error` when there is one.
pub(crate) fn map_tokio_rusqlite_error(err: tokio_rusqlite::Error) -> AppError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(rusqlite_err),
        tokio_rusqlite::Error::Close(_) => {
            AppError::Store("Connection closed unexpectedly".to_string())
        }
        _ => AppError::Store(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_failure(code: std::ffi::c_int) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn test_primary_key_violation_maps_to_conflict() {
        let err = sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY);
        assert!(matches!(map_rusqlite_error(&err), AppError::Conflict(_)));
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE);
        assert!(matches!(map_rusqlite_error(&err), AppError::Conflict(_)));
    }

    #[test]
    fn test_other_errors_map_to_store() {
        let err = rusqlite::Error::InvalidQuery;
        assert!(matches!(map_rusqlite_error(&err), AppError::Store(_)));

        let err = tokio_rusqlite::Error::Rusqlite(sqlite_failure(rusqlite::ffi::SQLITE_CANTOPEN));
        match map_tokio_rusqlite_error(err) {
            AppError::Store(msg) => assert!(msg.contains("Cannot open")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
