pub mod cli;
pub mod error;
pub mod reactive;

pub use cli::chat::conversation_state::{ConversationState, CONTEXT_WINDOW};
pub use cli::chat::turn::Turn;
pub use error::ContextError;
pub use reactive::Reactive;
