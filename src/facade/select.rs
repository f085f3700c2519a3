use std::io::Write;

use tracing::debug;

use super::YodaDb;
use crate::error::YodaDbError;
use crate::params::Params;
use crate::request::{QueryAndParams, ReadRow};
use crate::results::{ResultSet, Row, RowCursor, RowFormat};
use crate::types::RowValues;

impl YodaDb {
    /// Prepare a read of the facade's table. Rows are pulled lazily from the returned cursor.
    ///
    /// # Errors
    /// Returns `YodaDbError::ArgumentsError` or `YodaDbError::IdentifierError` for a bad request,
    /// and `YodaDbError::StatementError` if `SQLite` cannot prepare the select.
    pub fn read_row(&self, request: ReadRow) -> Result<RowCursor<'_>, YodaDbError> {
        let statement = request.build(&self.tablename, self.identifier_policy)?;
        self.prepare_cursor(&statement, self.row_format)
    }

    /// Prepare a raw query with positional `?` parameters. Nothing is committed.
    ///
    /// # Errors
    /// Returns `YodaDbError::StatementError` if `SQLite` cannot prepare the query.
    pub fn query(&self, query: &str, params: &[RowValues]) -> Result<RowCursor<'_>, YodaDbError> {
        self.prepare_cursor(&QueryAndParams::new(query, params.to_vec()), self.row_format)
    }

    /// Read and materialize every matching row.
    ///
    /// # Errors
    /// Returns the errors of [`YodaDb::read_row`] and any error raised while stepping the rows.
    pub fn fetch_all(&self, request: ReadRow) -> Result<ResultSet, YodaDbError> {
        self.read_row(request)?.into_result_set()
    }

    /// Write the whole table to `out`: a header of column names, then one line per row.
    /// Returns the number of rows written.
    ///
    /// # Errors
    /// Returns `YodaDbError::StatementError` for a failed select and `YodaDbError::IoError`
    /// if writing fails.
    pub fn write_table<W: Write>(&self, out: &mut W) -> Result<usize, YodaDbError> {
        let statement = ReadRow::All.build(&self.tablename, self.identifier_policy)?;
        let mut cursor = self.prepare_cursor(&statement, RowFormat::Tuple)?;
        writeln!(out, "({})", cursor.column_names().join(", "))?;
        let mut written = 0;
        for row in cursor.rows()? {
            writeln!(out, "{}", render_tuple(&row?))?;
            written += 1;
        }
        Ok(written)
    }

    fn prepare_cursor(
        &self,
        statement: &QueryAndParams,
        format: RowFormat,
    ) -> Result<RowCursor<'_>, YodaDbError> {
        let conn = self.conn()?;
        debug!(
            table = %self.tablename,
            sql = %statement.query,
            params = statement.params.len(),
            "query"
        );
        let stmt = conn.prepare(&statement.query)?;
        Ok(RowCursor::new(stmt, Params::convert(&statement.params), format))
    }
}

fn render_tuple(row: &Row) -> String {
    let values: Vec<String> = row.values().iter().map(ToString::to_string).collect();
    format!("({})", values.join(", "))
}
