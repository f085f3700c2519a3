//! Convenient imports for common functionality.

pub use crate::config::{DEFAULT_FILENAME, DEFAULT_TABLENAME, TableOptions, TableOptionsBuilder};
pub use crate::error::YodaDbError;
pub use crate::facade::{CreateFailure, TableCreation, YodaDb};
pub use crate::identifier::IdentifierPolicy;
pub use crate::request::{
    ArgValue, DeleteRow, InsertRow, NamedArgs, QueryAndParams, ReadRow, UpdateRow,
};
pub use crate::results::{Record, ResultSet, Row, RowCursor, RowFormat, RowIter};
pub use crate::types::RowValues;
