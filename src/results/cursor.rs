use std::collections::HashMap;
use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::Value;

use super::RowFormat;
use super::result_set::ResultSet;
use super::row::{Record, Row, column_index};
use crate::error::YodaDbError;
use crate::params::{Params, sqlite_value_to_row_value};

/// A prepared read that has not produced any rows yet.
///
/// The cursor is single-pass: the first call to [`RowCursor::rows`] runs the query and the
/// returned iterator pulls rows from the engine one at a time. Any later call yields an empty
/// iterator. Issue the read again on the facade for a fresh pass.
///
/// The cursor borrows the facade, so the connection cannot be closed or replaced while it lives.
pub struct RowCursor<'conn> {
    stmt: Statement<'conn>,
    params: Params,
    format: RowFormat,
    column_names: Arc<Vec<String>>,
    column_index_cache: Arc<HashMap<String, usize>>,
    started: bool,
}

impl<'conn> RowCursor<'conn> {
    pub(crate) fn new(stmt: Statement<'conn>, params: Params, format: RowFormat) -> Self {
        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect();
        let column_index_cache = Arc::new(column_index(&column_names));
        Self {
            stmt,
            params,
            format,
            column_names: Arc::new(column_names),
            column_index_cache,
            started: false,
        }
    }

    /// Column names of the result, in select order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Whether [`RowCursor::rows`] has been called. Says nothing about rows still pending.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Run the query and iterate its rows lazily.
    ///
    /// Only the first call runs the query. Rows the first iterator does not consume are
    /// discarded when it is dropped, and every later call yields nothing.
    ///
    /// # Errors
    /// Returns `YodaDbError::StatementError` if binding the parameters fails.
    pub fn rows(&mut self) -> Result<RowIter<'_>, YodaDbError> {
        let column_names = Arc::clone(&self.column_names);
        let column_index_cache = Arc::clone(&self.column_index_cache);
        if self.started {
            return Ok(RowIter {
                rows: None,
                format: self.format,
                column_names,
                column_index_cache,
            });
        }
        self.started = true;

        let refs = self.params.as_refs();
        let rows = self.stmt.query(&refs[..])?;
        Ok(RowIter {
            rows: Some(rows),
            format: self.format,
            column_names,
            column_index_cache,
        })
    }

    /// Drain the cursor into a vector.
    ///
    /// # Errors
    /// Returns the first error raised while stepping through the rows.
    pub fn collect_rows(mut self) -> Result<Vec<Row>, YodaDbError> {
        let rows = self.rows()?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Drain the cursor into a [`ResultSet`] that keeps the column names.
    ///
    /// # Errors
    /// Returns the first error raised while stepping through the rows.
    pub fn into_result_set(mut self) -> Result<ResultSet, YodaDbError> {
        let column_names = Arc::clone(&self.column_names);
        let rows = self.rows()?.collect::<Result<Vec<_>, _>>()?;
        Ok(ResultSet::new(column_names, rows))
    }
}

/// Iterator over the rows of a started [`RowCursor`].
pub struct RowIter<'stmt> {
    rows: Option<rusqlite::Rows<'stmt>>,
    format: RowFormat,
    column_names: Arc<Vec<String>>,
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl Iterator for RowIter<'_> {
    type Item = Result<Row, YodaDbError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rows = self.rows.as_mut()?;
        let step = match rows.next() {
            Ok(Some(row)) => Some(build_row(
                row,
                self.format,
                &self.column_names,
                &self.column_index_cache,
            )),
            Ok(None) => None,
            Err(err) => Some(Err(YodaDbError::StatementError(err))),
        };
        // a finished or failed statement is never stepped again
        if !matches!(step, Some(Ok(_))) {
            self.rows = None;
        }
        step
    }
}

fn build_row(
    row: &rusqlite::Row<'_>,
    format: RowFormat,
    column_names: &Arc<Vec<String>>,
    column_index_cache: &Arc<HashMap<String, usize>>,
) -> Result<Row, YodaDbError> {
    let mut values = Vec::with_capacity(column_names.len());
    for idx in 0..column_names.len() {
        let value: Value = row.get(idx)?;
        values.push(sqlite_value_to_row_value(value));
    }
    Ok(match format {
        RowFormat::Tuple => Row::Tuple(values),
        RowFormat::Record => Row::Record(Record::with_cache(
            Arc::clone(column_names),
            Arc::clone(column_index_cache),
            values,
        )),
    })
}
