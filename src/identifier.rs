//! Identifier checks for table and column names spliced into SQL text.
//!
//! Only values are bound as parameters; table and column names are
//! interpolated. Under [`IdentifierPolicy::Strict`] every interpolated name
//! must be a plain identifier, and column definitions handed to
//! `create_table` may carry types and constraints but no statement
//! separators or comments.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::YodaDbError;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"));

static COLUMN_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-Za-z_][A-Za-z0-9_]*(\s+[^;]*)?$").expect("column definition regex")
});

/// How table and column names are checked before they are interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierPolicy {
    /// Names must match `^[A-Za-z_][A-Za-z0-9_]*$`.
    #[default]
    Strict,
    /// Names are interpolated as given.
    Raw,
}

impl IdentifierPolicy {
    /// Check a table or column name.
    ///
    /// # Errors
    /// Returns `YodaDbError::IdentifierError` if the policy is strict and the name is not a
    /// plain identifier.
    pub fn check<'a>(self, name: &'a str) -> Result<&'a str, YodaDbError> {
        match self {
            IdentifierPolicy::Raw => Ok(name),
            IdentifierPolicy::Strict if IDENTIFIER.is_match(name) => Ok(name),
            IdentifierPolicy::Strict => Err(YodaDbError::IdentifierError(format!("{name:?}"))),
        }
    }

    /// Check every name in a list.
    ///
    /// # Errors
    /// Returns the first `YodaDbError::IdentifierError` encountered.
    pub fn check_all<S: AsRef<str>>(self, names: &[S]) -> Result<(), YodaDbError> {
        for name in names {
            self.check(name.as_ref())?;
        }
        Ok(())
    }

    /// Check a raw column definition such as `Grade TEXT NOT NULL`.
    ///
    /// # Errors
    /// Returns `YodaDbError::IdentifierError` if the policy is strict and the definition does not
    /// start with a plain identifier or contains `;`, `--` or `/*`.
    pub fn check_column_definition(self, definition: &str) -> Result<(), YodaDbError> {
        if self == IdentifierPolicy::Raw {
            return Ok(());
        }
        if COLUMN_DEFINITION.is_match(definition)
            && !definition.contains("--")
            && !definition.contains("/*")
        {
            Ok(())
        } else {
            Err(YodaDbError::IdentifierError(format!(
                "column definition {definition:?}"
            )))
        }
    }
}
