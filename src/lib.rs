//! Keyword-style convenience access to a single `SQLite` table.
//!
//! A [`YodaDb`] binds one database file and one table name to an owned `rusqlite`
//! connection and offers create/insert/read/update/delete shortcuts that build
//! parameterized SQL, plus raw [`YodaDb::execute`] and [`YodaDb::query`] passthroughs.
//! Values are always bound as parameters; table and column names are checked
//! against an [`IdentifierPolicy`] before they are spliced into SQL text.

pub mod config;
pub mod error;
pub mod facade;
pub mod identifier;
pub mod params;
pub mod prelude;
pub mod request;
pub mod results;
pub mod types;

pub use config::{TableOptions, TableOptionsBuilder};
pub use error::YodaDbError;
pub use facade::{CreateFailure, TableCreation, YodaDb};
pub use identifier::IdentifierPolicy;
pub use request::{DeleteRow, InsertRow, NamedArgs, QueryAndParams, ReadRow, UpdateRow};
pub use results::{Record, ResultSet, Row, RowCursor, RowFormat};
pub use types::RowValues;
