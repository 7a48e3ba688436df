// sqlx::Error -> AppError mapping

use studentqueue_core::error::AppError;

/// Convert sqlx::Error to AppError with structured information
///
/// Unique / primary-key violations become `Conflict`; everything else is
/// passed through as `Database` with the driver's message.
pub fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // 2067 = SQLITE_CONSTRAINT_UNIQUE, 1555 = SQLITE_CONSTRAINT_PRIMARYKEY
            let unique_code = matches!(db_err.code().as_deref(), Some("2067") | Some("1555"));
            if db_err.is_unique_violation() || unique_code {
                return AppError::Conflict(format!(
                    "Unique constraint violation: {}",
                    db_err.message()
                ));
            }

            // SQLite error codes: https://www.sqlite.org/rescode.html
            match db_err.code().as_deref() {
                Some("5") => AppError::Database(format!(
                    "Database locked (SQLITE_BUSY): {}",
                    db_err.message()
                )),
                Some(code) => {
                    AppError::Database(format!("Database error [{}]: {}", code, db_err.message()))
                }
                None => AppError::Database(format!("Database error: {}", db_err.message())),
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}
