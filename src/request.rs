//! Request shapes for the convenience methods.
//!
//! Each method takes a typed request, so the set of arguments is fixed by the type. Callers
//! that collect arguments by name at runtime can build a [`NamedArgs`] and convert it with
//! `TryFrom`; names are matched exactly and anything unknown, missing or of the wrong shape is
//! an `ArgumentsError` raised before any SQL is issued.

use std::collections::BTreeMap;

use crate::error::YodaDbError;
use crate::identifier::IdentifierPolicy;
use crate::params::placeholders;
use crate::types::RowValues;

/// A SQL string and the values bound to its `?` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    pub query: String,
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    pub fn new_without_params(query: impl Into<String>) -> Self {
        Self::new(query, Vec::new())
    }
}

/// Which rows (and columns) `read_row` returns.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadRow {
    /// Every column of every row.
    All,
    /// Rows where `column = equals`, optionally projected onto `return_columns` in that order.
    Where {
        column: String,
        equals: RowValues,
        return_columns: Option<Vec<String>>,
    },
}

impl ReadRow {
    #[must_use]
    pub fn all() -> Self {
        ReadRow::All
    }

    pub fn filter(column: impl Into<String>, equals: impl Into<RowValues>) -> Self {
        ReadRow::Where {
            column: column.into(),
            equals: equals.into(),
            return_columns: None,
        }
    }

    /// Restrict a filtered read to the given columns. Has no effect on [`ReadRow::All`].
    #[must_use]
    pub fn returning<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            ReadRow::Where { column, equals, .. } => ReadRow::Where {
                column,
                equals,
                return_columns: Some(columns.into_iter().map(Into::into).collect()),
            },
            ReadRow::All => ReadRow::All,
        }
    }

    pub(crate) fn build(
        &self,
        table: &str,
        policy: IdentifierPolicy,
    ) -> Result<QueryAndParams, YodaDbError> {
        match self {
            ReadRow::All => Ok(QueryAndParams::new_without_params(format!(
                "SELECT * FROM {table}"
            ))),
            ReadRow::Where {
                column,
                equals,
                return_columns,
            } => {
                policy.check(column)?;
                let projection = match return_columns {
                    None => "*".to_string(),
                    Some(cols) if cols.is_empty() => {
                        return Err(YodaDbError::arguments(
                            "read_row: return_columns must name at least one column",
                        ));
                    }
                    Some(cols) => {
                        policy.check_all(&cols[..])?;
                        cols.join(", ")
                    }
                };
                Ok(QueryAndParams::new(
                    format!("SELECT {projection} FROM {table} WHERE {column} = ?"),
                    vec![equals.clone()],
                ))
            }
        }
    }
}

/// A single-row insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertRow {
    /// One value for every column of the table, in table order.
    Full { values: Vec<RowValues> },
    /// Values for the named columns only; the rest take their defaults.
    Columns {
        columns: Vec<String>,
        values: Vec<RowValues>,
    },
}

impl InsertRow {
    pub fn values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        InsertRow::Full {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn for_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = match self {
            InsertRow::Full { values } | InsertRow::Columns { values, .. } => values,
        };
        InsertRow::Columns {
            columns: columns.into_iter().map(Into::into).collect(),
            values,
        }
    }

    pub(crate) fn build(
        &self,
        table: &str,
        policy: IdentifierPolicy,
    ) -> Result<QueryAndParams, YodaDbError> {
        match self {
            InsertRow::Full { values } => {
                if values.is_empty() {
                    return Err(YodaDbError::arguments(
                        "insert_row: values must contain at least one value",
                    ));
                }
                Ok(QueryAndParams::new(
                    format!("INSERT INTO {table} VALUES ({})", placeholders(values.len())),
                    values.clone(),
                ))
            }
            InsertRow::Columns { columns, values } => {
                if values.is_empty() || columns.len() != values.len() {
                    return Err(YodaDbError::arguments(format!(
                        "insert_row: {} values given for {} columns",
                        values.len(),
                        columns.len()
                    )));
                }
                policy.check_all(&columns[..])?;
                Ok(QueryAndParams::new(
                    format!(
                        "INSERT INTO {table} ({}) VALUES ({})",
                        columns.join(", "),
                        placeholders(values.len())
                    ),
                    values.clone(),
                ))
            }
        }
    }
}

/// Set one column to one value on every row where `where_column = equals`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRow {
    pub where_column: String,
    pub equals: RowValues,
    pub set_column: String,
    pub to_value: RowValues,
}

impl UpdateRow {
    pub fn new(
        where_column: impl Into<String>,
        equals: impl Into<RowValues>,
        set_column: impl Into<String>,
        to_value: impl Into<RowValues>,
    ) -> Self {
        Self {
            where_column: where_column.into(),
            equals: equals.into(),
            set_column: set_column.into(),
            to_value: to_value.into(),
        }
    }

    pub(crate) fn build(
        &self,
        table: &str,
        policy: IdentifierPolicy,
    ) -> Result<QueryAndParams, YodaDbError> {
        policy.check(&self.set_column)?;
        policy.check(&self.where_column)?;
        Ok(QueryAndParams::new(
            format!(
                "UPDATE {table} SET {} = ? WHERE {} = ?",
                self.set_column, self.where_column
            ),
            vec![self.to_value.clone(), self.equals.clone()],
        ))
    }
}

/// Delete every row where `where_column = equals`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRow {
    pub where_column: String,
    pub equals: RowValues,
}

impl DeleteRow {
    pub fn new(where_column: impl Into<String>, equals: impl Into<RowValues>) -> Self {
        Self {
            where_column: where_column.into(),
            equals: equals.into(),
        }
    }

    pub(crate) fn build(
        &self,
        table: &str,
        policy: IdentifierPolicy,
    ) -> Result<QueryAndParams, YodaDbError> {
        policy.check(&self.where_column)?;
        Ok(QueryAndParams::new(
            format!("DELETE FROM {table} WHERE {} = ?", self.where_column),
            vec![self.equals.clone()],
        ))
    }
}

/// A named argument: one value, or an ordered list of values.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Scalar(RowValues),
    List(Vec<RowValues>),
}

/// Arguments collected by name, e.g. from a scripting layer or a config file.
///
/// ```rust
/// use yoda_db::prelude::*;
///
/// let args = NamedArgs::new()
///     .with("where_column", "StudentName")
///     .with("equals", "Han Solo")
///     .with_list("return_columns", ["StudentName", "StudentID"]);
/// let read = ReadRow::try_from(args)?;
/// assert_eq!(
///     read,
///     ReadRow::filter("StudentName", "Han Solo").returning(["StudentName", "StudentID"])
/// );
/// # Ok::<(), YodaDbError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedArgs {
    args: BTreeMap<String, ArgValue>,
}

impl NamedArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.args.insert(name.into(), ArgValue::Scalar(value.into()));
        self
    }

    #[must_use]
    pub fn with_list<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        self.args.insert(
            name.into(),
            ArgValue::List(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    fn reader(self, method: &'static str, usage: &'static str) -> ArgReader {
        ArgReader {
            args: self.args,
            method,
            usage,
        }
    }
}

struct ArgReader {
    args: BTreeMap<String, ArgValue>,
    method: &'static str,
    usage: &'static str,
}

impl ArgReader {
    fn error(&self, problem: impl std::fmt::Display) -> YodaDbError {
        YodaDbError::arguments(format!("{}: {problem}. Use {}", self.method, self.usage))
    }

    fn value(&mut self, name: &str) -> Result<Option<RowValues>, YodaDbError> {
        match self.args.remove(name) {
            None => Ok(None),
            Some(ArgValue::Scalar(value)) => Ok(Some(value)),
            Some(ArgValue::List(_)) => Err(self.error(format!("`{name}` must be a single value"))),
        }
    }

    fn ident(&mut self, name: &str) -> Result<Option<String>, YodaDbError> {
        match self.value(name)? {
            None => Ok(None),
            Some(RowValues::Text(text)) => Ok(Some(text)),
            Some(_) => Err(self.error(format!("`{name}` must be a column name"))),
        }
    }

    fn list(&mut self, name: &str) -> Result<Option<Vec<RowValues>>, YodaDbError> {
        match self.args.remove(name) {
            None => Ok(None),
            Some(ArgValue::List(values)) => Ok(Some(values)),
            Some(ArgValue::Scalar(_)) => Err(self.error(format!("`{name}` must be a list"))),
        }
    }

    fn ident_list(&mut self, name: &str) -> Result<Option<Vec<String>>, YodaDbError> {
        let Some(values) = self.list(name)? else {
            return Ok(None);
        };
        values
            .into_iter()
            .map(|value| match value {
                RowValues::Text(text) => Ok(text),
                _ => Err(self.error(format!("`{name}` must list column names"))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn required<T>(&self, name: &str, value: Option<T>) -> Result<T, YodaDbError> {
        value.ok_or_else(|| self.error(format!("missing `{name}`")))
    }

    fn finish(self) -> Result<(), YodaDbError> {
        if self.args.is_empty() {
            return Ok(());
        }
        let unknown: Vec<&str> = self.args.keys().map(String::as_str).collect();
        Err(self.error(format!("unexpected argument(s) {}", unknown.join(", "))))
    }
}

impl TryFrom<NamedArgs> for ReadRow {
    type Error = YodaDbError;

    fn try_from(args: NamedArgs) -> Result<Self, Self::Error> {
        let mut reader = args.reader(
            "read_row",
            "no arguments, or where_column and equals with optional return_columns",
        );
        let column = reader.ident("where_column")?;
        let equals = reader.value("equals")?;
        let return_columns = reader.ident_list("return_columns")?;
        reader.finish_with(|reader| match (column, equals) {
            (None, None) if return_columns.is_none() => Ok(ReadRow::All),
            (None, None) => Err(reader.error("return_columns requires a where_column filter")),
            (Some(column), Some(equals)) => Ok(ReadRow::Where {
                column,
                equals,
                return_columns,
            }),
            (Some(_), None) => Err(reader.error("missing `equals`")),
            (None, Some(_)) => Err(reader.error("missing `where_column`")),
        })
    }
}

impl TryFrom<NamedArgs> for InsertRow {
    type Error = YodaDbError;

    fn try_from(args: NamedArgs) -> Result<Self, Self::Error> {
        let mut reader = args.reader(
            "insert_row",
            "values (list) with optional for_columns (list)",
        );
        let values = reader.list("values")?;
        let columns = reader.ident_list("for_columns")?;
        reader.finish_with(|reader| {
            let values = reader.required("values", values)?;
            Ok(match columns {
                Some(columns) => InsertRow::Columns { columns, values },
                None => InsertRow::Full { values },
            })
        })
    }
}

impl TryFrom<NamedArgs> for UpdateRow {
    type Error = YodaDbError;

    fn try_from(args: NamedArgs) -> Result<Self, Self::Error> {
        let mut reader = args.reader(
            "update_row",
            "where_column, equals, set_column and to_value",
        );
        let where_column = reader.ident("where_column")?;
        let equals = reader.value("equals")?;
        let set_column = reader.ident("set_column")?;
        let to_value = reader.value("to_value")?;
        reader.finish_with(|reader| {
            Ok(UpdateRow {
                where_column: reader.required("where_column", where_column)?,
                equals: reader.required("equals", equals)?,
                set_column: reader.required("set_column", set_column)?,
                to_value: reader.required("to_value", to_value)?,
            })
        })
    }
}

impl TryFrom<NamedArgs> for DeleteRow {
    type Error = YodaDbError;

    fn try_from(args: NamedArgs) -> Result<Self, Self::Error> {
        let mut reader = args.reader("delete_row", "where_column and equals");
        let where_column = reader.ident("where_column")?;
        let equals = reader.value("equals")?;
        reader.finish_with(|reader| {
            Ok(DeleteRow {
                where_column: reader.required("where_column", where_column)?,
                equals: reader.required("equals", equals)?,
            })
        })
    }
}

impl ArgReader {
    /// Reject leftovers first so an unknown name is reported ahead of a missing one.
    fn finish_with<T>(
        self,
        build: impl FnOnce(&Self) -> Result<T, YodaDbError>,
    ) -> Result<T, YodaDbError> {
        let built = build(&self);
        self.finish()?;
        built
    }
}
