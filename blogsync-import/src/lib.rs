//! Import of a flat-file blog export into a hosted blog.
//!
//! - [`parser`] turns the export stream into [`PostRecord`]s.
//! - [`date`] converts export timestamps to UTC.
//! - [`session`] holds the publish client and the remote feed snapshot used
//!   for duplicate detection.
//! - [`driver`] runs the import and writes the [`audit`] log.
//!
//! Every remote call is awaited before the next one starts.
pub mod audit;
pub mod date;
pub mod driver;
pub mod parser;
pub mod record;
pub mod session;

pub use audit::AuditLog;
pub use driver::{ImportReport, PostRef, import_records, run_import};
pub use parser::{RecordParser, parse_records};
pub use record::{CommentRecord, PostRecord};
pub use session::{ImportSession, ImportSettings};
