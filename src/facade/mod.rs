//! The single-table facade.

mod ddl;
mod dml;
mod select;

use std::fmt;
use std::time::Duration;

use rusqlite::Connection;
use tracing::{info, warn};

use crate::config::{DEFAULT_FILENAME, DEFAULT_TABLENAME, TableOptions};
use crate::error::YodaDbError;
use crate::identifier::IdentifierPolicy;
use crate::results::RowFormat;

pub use ddl::{CreateFailure, TableCreation};

/// Convenience access to one table of one `SQLite` file.
///
/// The facade owns its connection. Every mutating call runs in its own implicit transaction and
/// is committed before the call returns. Reads hand back a [`RowCursor`](crate::results::RowCursor)
/// that borrows the facade.
///
/// ```rust
/// use yoda_db::prelude::*;
///
/// let mut db = YodaDb::open(":memory:", "students")?;
/// let created = db.create_table(&["Name", "ID", "Grade"], false)?;
/// assert!(created.is_created());
///
/// db.insert_row(InsertRow::values(["Leia", "1", "A"]))?;
/// db.update_row(UpdateRow::new("Name", "Leia", "Grade", "F"))?;
///
/// let mut cursor = db.read_row(ReadRow::filter("Name", "Leia"))?;
/// for row in cursor.rows()? {
///     assert_eq!(row?.values()[2], RowValues::Text("F".into()));
/// }
/// # drop(cursor);
/// db.close()?;
/// # Ok::<(), YodaDbError>(())
/// ```
pub struct YodaDb {
    conn: Option<Connection>,
    filename: String,
    tablename: String,
    row_format: RowFormat,
    identifier_policy: IdentifierPolicy,
    busy_timeout: Option<Duration>,
    last_create_failure: Option<CreateFailure>,
}

impl YodaDb {
    /// Open `yodadb.db` and address `yodatable`.
    ///
    /// # Errors
    /// Returns `YodaDbError::ConnectionError` if the backing store cannot be opened.
    pub fn open_default() -> Result<Self, YodaDbError> {
        Self::open(DEFAULT_FILENAME, DEFAULT_TABLENAME)
    }

    /// Open `filename` (created if absent) and address `tablename`.
    ///
    /// # Errors
    /// Returns `YodaDbError::ConnectionError` if the backing store cannot be opened, or
    /// `YodaDbError::IdentifierError` if the table name is not a plain identifier.
    pub fn open(
        filename: impl Into<String>,
        tablename: impl Into<String>,
    ) -> Result<Self, YodaDbError> {
        Self::with_options(TableOptions::new(filename, tablename))
    }

    /// Open with explicit options.
    ///
    /// # Errors
    /// Returns `YodaDbError::ConnectionError` if the backing store cannot be opened, or
    /// `YodaDbError::IdentifierError` if the table name violates the identifier policy.
    pub fn with_options(opts: TableOptions) -> Result<Self, YodaDbError> {
        opts.identifier_policy.check(&opts.tablename)?;
        let busy_timeout = opts.busy_timeout();
        let conn = open_connection(&opts.filename, busy_timeout)?;
        info!(filename = %opts.filename, tablename = %opts.tablename, "opened database");
        Ok(Self {
            conn: Some(conn),
            filename: opts.filename,
            tablename: opts.tablename,
            row_format: opts.row_format,
            identifier_policy: opts.identifier_policy,
            busy_timeout,
            last_create_failure: None,
        })
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn tablename(&self) -> &str {
        &self.tablename
    }

    #[must_use]
    pub fn row_format(&self) -> RowFormat {
        self.row_format
    }

    #[must_use]
    pub fn identifier_policy(&self) -> IdentifierPolicy {
        self.identifier_policy
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Format of rows produced by cursors created after this call.
    pub fn set_row_format(&mut self, row_format: RowFormat) {
        self.row_format = row_format;
    }

    /// Point later statements at another table of the same file.
    ///
    /// # Errors
    /// Returns `YodaDbError::IdentifierError` if the name violates the identifier policy.
    pub fn set_tablename(&mut self, tablename: impl Into<String>) -> Result<(), YodaDbError> {
        let tablename = tablename.into();
        self.identifier_policy.check(&tablename)?;
        self.tablename = tablename;
        Ok(())
    }

    /// Switch to another backing store. The new file is opened before the old connection is
    /// released, so a failed switch leaves the facade on its previous file.
    ///
    /// # Errors
    /// Returns `YodaDbError::ClosedError` if the facade was closed, or
    /// `YodaDbError::ConnectionError` if the new store cannot be opened.
    pub fn set_filename(&mut self, filename: impl Into<String>) -> Result<(), YodaDbError> {
        self.conn()?;
        let filename = filename.into();
        let conn = open_connection(&filename, self.busy_timeout)?;
        if let Some(old) = self.conn.replace(conn) {
            if let Err((_, err)) = old.close() {
                warn!(filename = %self.filename, error = %err, "failed to close previous database");
            }
        }
        info!(from = %self.filename, to = %filename, "reconnected");
        self.filename = filename;
        Ok(())
    }

    /// Release the connection. Every later operation fails with `YodaDbError::ClosedError`;
    /// closing again is a no-op.
    ///
    /// # Errors
    /// Returns `YodaDbError::StatementError` if `SQLite` refuses to close; the connection is
    /// kept open in that case.
    pub fn close(&mut self) -> Result<(), YodaDbError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        match conn.close() {
            Ok(()) => {
                info!(filename = %self.filename, "closed database");
                Ok(())
            }
            Err((conn, err)) => {
                self.conn = Some(conn);
                Err(YodaDbError::StatementError(err))
            }
        }
    }

    pub(crate) fn conn(&self) -> Result<&Connection, YodaDbError> {
        self.conn.as_ref().ok_or(YodaDbError::ClosedError)
    }

    /// The last failure reported by `create_table`, cleared by the next successful creation.
    #[must_use]
    pub fn last_create_failure(&self) -> Option<&CreateFailure> {
        self.last_create_failure.as_ref()
    }
}

impl fmt::Debug for YodaDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YodaDb")
            .field("filename", &self.filename)
            .field("tablename", &self.tablename)
            .field("open", &self.is_open())
            .field("row_format", &self.row_format)
            .field("identifier_policy", &self.identifier_policy)
            .finish_non_exhaustive()
    }
}

fn open_connection(
    filename: &str,
    busy_timeout: Option<Duration>,
) -> Result<Connection, YodaDbError> {
    let conn = Connection::open(filename).map_err(|e| {
        YodaDbError::ConnectionError(format!("Failed to open SQLite database {filename}: {e}"))
    })?;
    if let Some(timeout) = busy_timeout {
        conn.busy_timeout(timeout).map_err(|e| {
            YodaDbError::ConnectionError(format!("Failed to set busy timeout on {filename}: {e}"))
        })?;
    }
    Ok(conn)
}
