use clipper_core::StorageError;

/// Wraps an io failure with the operation that was attempted.
pub(crate) fn map_io_error(context: &str, err: std::io::Error) -> StorageError {
    StorageError::Io(format!("{context}: {err}"))
}

pub(crate) fn map_migrate_error(err: sqlx::migrate::MigrateError) -> StorageError {
    StorageError::Migration(err.to_string())
}

/// Maps a sqlx error onto the storage taxonomy, prefixed with `context`.
pub(crate) fn map_sqlx_error(context: &str, err: sqlx::Error) -> StorageError {
    let message = format!("{context}: {err}");

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed => StorageError::Closed,
        sqlx::Error::WorkerCrashed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            StorageError::Unavailable(message)
        }
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        sqlx::Error::Migrate(err) => map_migrate_error(*err),
        _ => StorageError::Query(message),
    }
}
