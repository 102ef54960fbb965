pub mod email_log;
pub mod expenses;
pub mod leases;
pub mod payments;
pub mod properties;
pub mod settings;
pub mod tenants;
pub mod users;

/// True when the driver reports a SQLite UNIQUE constraint violation.
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => {
            matches!(db_error.code().as_deref(), Some("1555") | Some("2067"))
                || db_error.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}
