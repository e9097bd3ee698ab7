mod console_sink;
mod file_sink;
mod memory_sink;
mod registry;
mod trait_;
mod tracing_sink;

pub use console_sink::{ConsoleSink, ConsoleSinkConfig, Target};
pub use file_sink::{FileSink, FileSinkConfig};
pub use memory_sink::{MemorySink, MemorySinkConfig};
pub use registry::{
    create_sink_from_options, register_fallible_sink, register_sink, register_sink_fn,
    register_sinks,
};
pub use trait_::LogSink;
pub use tracing_sink::{TracingSink, TracingSinkConfig};
