use rusqlite::Connection;
use tracing::debug;

use super::YodaDb;
use crate::error::YodaDbError;
use crate::params::Params;
use crate::request::{DeleteRow, InsertRow, QueryAndParams, UpdateRow};
use crate::types::RowValues;

impl YodaDb {
    /// Insert one row and commit.
    ///
    /// # Errors
    /// Returns `YodaDbError::ArgumentsError` for an empty or mismatched value list, and
    /// `YodaDbError::StatementError` if `SQLite` rejects the insert.
    pub fn insert_row(&self, request: InsertRow) -> Result<usize, YodaDbError> {
        let statement = request.build(&self.tablename, self.identifier_policy)?;
        self.execute_statement(&statement)
    }

    /// Set one column on every matching row and commit. Returns the number of rows changed.
    ///
    /// # Errors
    /// Returns `YodaDbError::StatementError` if `SQLite` rejects the update.
    pub fn update_row(&self, request: UpdateRow) -> Result<usize, YodaDbError> {
        let statement = request.build(&self.tablename, self.identifier_policy)?;
        self.execute_statement(&statement)
    }

    /// Delete every matching row and commit. Returns the number of rows removed.
    ///
    /// # Errors
    /// Returns `YodaDbError::StatementError` if `SQLite` rejects the delete.
    pub fn delete_row(&self, request: DeleteRow) -> Result<usize, YodaDbError> {
        let statement = request.build(&self.tablename, self.identifier_policy)?;
        self.execute_statement(&statement)
    }

    /// Run one raw statement with positional `?` parameters and commit.
    ///
    /// Statements that produce rows belong in [`YodaDb::query`].
    ///
    /// # Errors
    /// Returns `YodaDbError::StatementError` if preparing or executing the statement fails.
    pub fn execute(&self, command: &str, params: &[RowValues]) -> Result<usize, YodaDbError> {
        self.execute_statement(&QueryAndParams::new(command, params.to_vec()))
    }

    /// Run several raw statements, without parameters, in a single transaction.
    ///
    /// # Errors
    /// Returns `YodaDbError::StatementError` if any statement fails; nothing is committed then.
    pub fn execute_batch(&self, sql: &str) -> Result<(), YodaDbError> {
        let conn = self.conn()?;
        debug!(table = %self.tablename, sql, "execute batch");
        if conn.is_autocommit() {
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(sql)?;
            tx.commit()?;
        } else {
            conn.execute_batch(sql)?;
            commit_pending(conn)?;
        }
        Ok(())
    }

    fn execute_statement(&self, statement: &QueryAndParams) -> Result<usize, YodaDbError> {
        let conn = self.conn()?;
        debug!(
            table = %self.tablename,
            sql = %statement.query,
            params = statement.params.len(),
            "execute"
        );
        let params = Params::convert(&statement.params);
        let affected = {
            let mut stmt = conn.prepare_cached(&statement.query)?;
            stmt.execute(&params.as_refs()[..])?
        };
        commit_pending(conn)?;
        Ok(affected)
    }
}

/// Commit a transaction left open by a raw `BEGIN`, so every call ends committed.
fn commit_pending(conn: &Connection) -> Result<(), YodaDbError> {
    if !conn.is_autocommit() {
        conn.execute_batch("COMMIT")?;
    }
    Ok(())
}
