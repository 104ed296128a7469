/// Errors surfaced by an execution client.
///
/// These are passed through verbatim; the invocation layer only attaches the
/// tool identifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteExecutionError {
    /// The engine could not be reached or the connection failed.
    #[error("transport failed: {0}")]
    Transport(String),
    /// The engine rejected or failed the invocation.
    #[error("engine failed ({status}): {message}")]
    Failed {
        /// Status reported by the engine or transport.
        status: u16,
        /// Engine specific error code, if provided.
        code: Option<String>,
        /// Engine error message.
        message: String,
    },
    /// The engine response could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
