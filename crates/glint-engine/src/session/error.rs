use thiserror::Error;

/// Fatal session failures.
///
/// Everything recoverable (a lost frame, a shader that fails to compile) is
/// handled inside the session; only conditions that make the session
/// impossible to continue surface here.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No GPU drawing context can be produced for this window, or the
    /// existing one died irrecoverably (e.g. surface out-of-memory).
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),
}
