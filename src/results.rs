//! Rows, lazy cursors and materialized result sets.

mod cursor;
mod result_set;
mod row;

use serde::{Deserialize, Serialize};

pub use cursor::{RowCursor, RowIter};
pub use result_set::ResultSet;
pub use row::{Record, Row};

/// Shape of the rows produced by reads and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowFormat {
    /// Positional values only.
    #[default]
    Tuple,
    /// Values addressable by column name.
    Record,
}
