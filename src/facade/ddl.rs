use rusqlite::{Connection, ErrorCode};
use tracing::{debug, info, warn};

use super::YodaDb;
use crate::error::YodaDbError;

/// Why `create_table` did not create the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateFailure {
    /// The table is already there and `drop_existing` was false.
    AlreadyExists { table: String },
    /// The engine rejected the statement.
    Rejected { message: String },
}

impl std::fmt::Display for CreateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateFailure::AlreadyExists { table } => write!(f, "table {table} already exists"),
            CreateFailure::Rejected { message } => f.write_str(message),
        }
    }
}

/// Outcome of `create_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum TableCreation {
    Created,
    /// An existing table was dropped and created again.
    Recreated,
    Failed(CreateFailure),
}

impl TableCreation {
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, TableCreation::Created | TableCreation::Recreated)
    }

    #[must_use]
    pub fn failure(&self) -> Option<&CreateFailure> {
        match self {
            TableCreation::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Turn a failed outcome into an error for callers that want to stop on it.
    ///
    /// # Errors
    /// Returns `YodaDbError::AlreadyExistsError` or `YodaDbError::ExecutionError`.
    pub fn into_result(self) -> Result<(), YodaDbError> {
        match self {
            TableCreation::Created | TableCreation::Recreated => Ok(()),
            TableCreation::Failed(CreateFailure::AlreadyExists { table }) => {
                Err(YodaDbError::AlreadyExistsError(table))
            }
            TableCreation::Failed(CreateFailure::Rejected { message }) => {
                Err(YodaDbError::ExecutionError(message))
            }
        }
    }
}

impl YodaDb {
    /// Create the facade's table from raw column definitions such as `"Grade TEXT"`.
    ///
    /// Creation problems do not abort the caller: they are logged, returned as
    /// [`TableCreation::Failed`] and kept in [`YodaDb::last_create_failure`]. With
    /// `drop_existing`, an existing table is dropped and created again in one transaction.
    ///
    /// # Errors
    /// Returns `YodaDbError::ClosedError` on a closed facade, `YodaDbError::ArgumentsError` for an
    /// empty column list and `YodaDbError::IdentifierError` for a rejected column definition.
    pub fn create_table<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        drop_existing: bool,
    ) -> Result<TableCreation, YodaDbError> {
        if columns.is_empty() {
            return Err(YodaDbError::arguments(
                "create_table: columns must contain at least one column definition",
            ));
        }
        for column in columns {
            self.identifier_policy.check_column_definition(column.as_ref())?;
        }
        let table = self.tablename.clone();
        let definitions: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
        let create_sql = format!("CREATE TABLE {table} ({})", definitions.join(", "));

        let conn = self.conn()?;
        debug!(table = %table, sql = %create_sql, "create table");
        let outcome = match conn.execute(&create_sql, []) {
            Ok(_) => TableCreation::Created,
            Err(err) if drop_existing => match recreate(conn, &table, &create_sql) {
                Ok(()) => {
                    info!(table = %table, "recreated table");
                    TableCreation::Recreated
                }
                // the table was not there to drop, so the first error stands
                Err(Recreate::Drop) => rejected(&err),
                Err(Recreate::Create(err)) => rejected(&err),
            },
            Err(err) if already_exists(&err) => {
                TableCreation::Failed(CreateFailure::AlreadyExists { table })
            }
            Err(err) => rejected(&err),
        };

        match &outcome {
            TableCreation::Failed(failure) => {
                warn!(
                    table = %self.tablename,
                    error = %failure,
                    drop_existing,
                    "failed to create table"
                );
                self.last_create_failure = Some(failure.clone());
            }
            _ => self.last_create_failure = None,
        }
        Ok(outcome)
    }
}

fn rejected(err: &rusqlite::Error) -> TableCreation {
    TableCreation::Failed(CreateFailure::Rejected {
        message: err.to_string(),
    })
}

/// `SQLite` reports a duplicate table as a plain `SQLITE_ERROR`; only the message tells it apart.
fn already_exists(err: &rusqlite::Error) -> bool {
    err.sqlite_error_code() == Some(ErrorCode::Unknown)
        && err.to_string().contains("already exists")
}

enum Recreate {
    Drop,
    Create(rusqlite::Error),
}

/// Drop and create in one transaction; a rejected definition rolls the drop back.
fn recreate(conn: &Connection, table: &str, create_sql: &str) -> Result<(), Recreate> {
    let tx = conn.unchecked_transaction().map_err(|_| Recreate::Drop)?;
    tx.execute(&format!("DROP TABLE {table}"), []).map_err(|_| Recreate::Drop)?;
    tx.execute(create_sql, []).map_err(Recreate::Create)?;
    tx.commit().map_err(Recreate::Create)
}
