//! Mapping of database failures onto API errors.

use aula_core::AppError;

/// Translates constraint violations into client errors; everything else is an
/// opaque `DATABASE_ERROR`.
///
/// `conflict` is the message used for unique violations.
pub fn map_db_error(err: sqlx::Error, conflict: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::conflict(conflict);
        }
        if db_err.is_foreign_key_violation() {
            return AppError::bad_request(match db_err.constraint() {
                Some(constraint) => format!("Referenced record does not exist ({})", constraint),
                None => "Referenced record does not exist".to_string(),
            });
        }
        if db_err.is_check_violation() {
            return AppError::bad_request("Value violates a data constraint");
        }
    }

    AppError::database(err)
}

/// `DATABASE_ERROR` with the failed operation recorded as context.
pub fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| AppError::database(anyhow::Error::new(err).context(context))
}
