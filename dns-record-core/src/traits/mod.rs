//! Host integration abstract Trait definition

mod progress_sink;

pub use progress_sink::{InMemoryProgressSink, LogProgressSink, ProgressSink};
