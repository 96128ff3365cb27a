//! Unit of work around a store operation.

use rusqlite::Connection;
use tracing::warn;

use crate::error::StoreError;

/// Runs `work` inside a transaction: commits when it returns `Ok`,
/// rolls back when it returns `Err`.
///
/// Dropping an uncommitted transaction also rolls it back, so an early
/// return or a panic inside `work` never leaves a half-applied write.
/// Must not be nested: SQLite refuses a second `BEGIN`.
pub fn with_transaction<T, F>(conn: &Connection, operation: &str, work: F) -> Result<T, StoreError>
where
    F: FnOnce(&Connection) -> Result<T, StoreError>,
{
    let tx = conn.unchecked_transaction()?;

    match work(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(operation, error = %rollback_err, "rollback failed");
            }
            Err(e)
        }
    }
}
