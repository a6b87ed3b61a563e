//! Incremental reduction of a streamed research response into a reasoning
//! trace and a final answer.

pub mod events;
pub mod fragment;
pub mod reducer;
pub mod trace;

pub use events::{Event, EventList};
pub use fragment::{Fragment, ReasoningDelta, ReasoningStep, StreamEvent, ToolInvocation};
pub use reducer::{reduce_stream, AnswerMode, AnswerView, Notice, ParsePolicy, Snapshot, StreamReducer};
pub use trace::Trace;
