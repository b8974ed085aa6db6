mod init;
mod trace_id;

pub use init::init_logger;
pub use trace_id::TraceId;

use tracing::{Level, Span};

/// Create a root span for one request / decision / refresh cycle.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::span!(Level::INFO, "op", op = name, trace_id = %trace_id)
}
