use thiserror::Error;

/// Errors produced by the conversation state holder.
#[derive(Debug, Error)]
pub enum ContextError {
    /// A history turn could not be encoded as JSON.
    #[error("failed to encode conversation context: {0}")]
    Encode(#[from] serde_json::Error),
}
