//! Library root for the `serve_journal` crate
//! Request journal for an HTTP test double: records served interactions and
//! answers verification queries against them

// Core error handling
pub mod errors;

// Served interaction records
pub mod encoding;
pub mod serve_event;

// Matching
pub mod metadata_pattern;
pub mod request_pattern;

// Journal
pub mod journal_mode;
pub mod journal_store;
pub mod request_journal;
pub mod verification;

// Configuration
pub mod config_loader;

// Ingestion from the HTTP layer
pub mod recording;


pub use errors::{JournalError, JournalResult};
pub use journal_mode::JournalMode;
pub use request_journal::RequestJournal;
pub use request_pattern::{RequestPattern, RequestPredicate};
pub use serve_event::{LoggedRequest, LoggedResponse, ServeEvent, StubReference};
