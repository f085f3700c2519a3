use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::YodaDbError;
use crate::facade::YodaDb;
use crate::identifier::IdentifierPolicy;
use crate::results::RowFormat;

/// Backing store used when no filename is given.
pub const DEFAULT_FILENAME: &str = "yodadb.db";
/// Table addressed when no table name is given.
pub const DEFAULT_TABLENAME: &str = "yodatable";

/// Options for opening a [`YodaDb`].
///
/// Options can also be loaded from JSON; missing fields fall back to their defaults:
/// ```rust
/// use yoda_db::prelude::*;
///
/// let opts = TableOptions::from_json_str(r#"{"tablename": "students", "row_format": "record"}"#)?;
/// assert_eq!(opts.filename, "yodadb.db");
/// assert_eq!(opts.row_format, RowFormat::Record);
/// # Ok::<(), YodaDbError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    pub filename: String,
    pub tablename: String,
    pub row_format: RowFormat,
    pub identifier_policy: IdentifierPolicy,
    pub busy_timeout_ms: Option<u64>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            tablename: DEFAULT_TABLENAME.to_string(),
            row_format: RowFormat::Tuple,
            identifier_policy: IdentifierPolicy::Strict,
            busy_timeout_ms: None,
        }
    }
}

impl TableOptions {
    #[must_use]
    pub fn new(filename: impl Into<String>, tablename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            tablename: tablename.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_row_format(mut self, row_format: RowFormat) -> Self {
        self.row_format = row_format;
        self
    }

    /// Parse options from a JSON object.
    ///
    /// # Errors
    /// Returns `YodaDbError::ConfigError` if the JSON is malformed or has mistyped fields.
    pub fn from_json_str(json: &str) -> Result<Self, YodaDbError> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(Duration::from_millis)
    }
}

/// Fluent builder for table options.
#[derive(Debug, Clone, Default)]
pub struct TableOptionsBuilder {
    opts: TableOptions,
}

impl TableOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.opts.filename = filename.into();
        self
    }

    #[must_use]
    pub fn tablename(mut self, tablename: impl Into<String>) -> Self {
        self.opts.tablename = tablename.into();
        self
    }

    #[must_use]
    pub fn row_format(mut self, row_format: RowFormat) -> Self {
        self.opts.row_format = row_format;
        self
    }

    #[must_use]
    pub fn identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.opts.identifier_policy = policy;
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn finish(self) -> TableOptions {
        self.opts
    }

    /// Open a [`YodaDb`] with the collected options.
    ///
    /// # Errors
    ///
    /// Returns `YodaDbError::ConnectionError` if the backing store cannot be opened.
    pub fn open(self) -> Result<YodaDb, YodaDbError> {
        YodaDb::with_options(self.finish())
    }
}
