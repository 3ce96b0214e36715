//! Chat session: one in-flight request at a time, replies streamed into a
//! single accumulator and flushed to the transcript when done.

mod machine;
mod types;


pub use machine::ChatSession;
pub use types::{SessionConfig, SessionState, SessionUpdate};
