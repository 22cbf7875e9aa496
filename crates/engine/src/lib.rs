//! `clvchat-engine`: record table, cleaning rules and the canned-answer chatbot.
//!
//! Pure engine crate: receives raw CSV cells, returns a cleaned table and
//! answers questions about it. No CLI or IO dependencies.

pub mod answers;
pub mod coerce;
pub mod columns;
pub mod error;
pub mod intents;
pub mod prepare;
pub mod responder;
pub mod summary;
pub mod table;
pub mod transcript;

pub use answers::ResponseTable;
pub use error::IntentError;
pub use intents::IntentTable;
pub use prepare::{prepare, CoercionReport, Prepared};
pub use responder::{ChatSession, Reply, Responder, FALLBACK_ANSWER};
pub use table::{RawTable, RecordTable, Value};
pub use transcript::{Entry, Speaker, Transcript};
