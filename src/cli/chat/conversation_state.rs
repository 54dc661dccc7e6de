use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::error::ContextError;
use crate::reactive::Reactive;

/// Number of trailing history turns included in the encoded context.
pub const CONTEXT_WINDOW: usize = 2;

/// Reactive state of a single chat view.
///
/// Holds the prompt being typed, the answer currently displayed, the
/// loading flag and the history of turns. Every field can be observed
/// through its `subscribe_*` receiver.
///
/// Mutators take `&mut self`: the owning view is the only caller allowed
/// to change the state. Observers only ever read.
pub struct ConversationState<T> {
    prompt: Reactive<String>,
    answer: Reactive<String>,
    history: Reactive<Vec<T>>,
    loading: Reactive<bool>,
}

impl<T> ConversationState<T> {
    pub fn new() -> Self {
        Self {
            prompt: Reactive::new(String::new()),
            answer: Reactive::new(String::new()),
            history: Reactive::new(Vec::new()),
            loading: Reactive::new(false),
        }
    }

    pub fn prompt(&self) -> watch::Ref<'_, String> {
        self.prompt.get()
    }

    pub fn answer(&self) -> watch::Ref<'_, String> {
        self.answer.get()
    }

    pub fn history(&self) -> watch::Ref<'_, Vec<T>> {
        self.history.get()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.get()
    }

    pub fn len(&self) -> usize {
        self.history.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.get().is_empty()
    }

    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt.set(text.into());
    }

    pub fn reset_prompt(&mut self) {
        self.prompt.set(String::new());
    }

    pub fn set_answer(&mut self, text: impl Into<String>) {
        self.answer.set(text.into());
    }

    /// Extend the in-progress answer with a streamed chunk.
    pub fn append_answer(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        self.answer.update(|answer| answer.push_str(chunk));
    }

    /// Append a turn to the history and clear the displayed answer.
    pub fn add_context_item(&mut self, item: T) {
        self.history.update(|history| history.push(item));
        self.answer.set(String::new());
        debug!(turns = self.len(), "Added turn to conversation history");
    }

    /// Flip the loading flag and return its new value.
    pub fn toggle_loading(&mut self) -> bool {
        let loading = !self.is_loading();
        self.loading.set(loading);
        loading
    }

    /// Clear the history and the prompt.
    ///
    /// `answer` and `loading` are left as they are, so an answer still being
    /// awaited keeps its indicator.
    pub fn reset_all(&mut self) {
        self.history.update(|history| history.clear());
        self.prompt.set(String::new());
        debug!("Conversation history reset");
    }

    pub fn subscribe_prompt(&self) -> watch::Receiver<String> {
        self.prompt.subscribe()
    }

    pub fn subscribe_answer(&self) -> watch::Receiver<String> {
        self.answer.subscribe()
    }

    pub fn subscribe_history(&self) -> watch::Receiver<Vec<T>> {
        self.history.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }
}

impl<T: Serialize> ConversationState<T> {
    /// Encode the last [`CONTEXT_WINDOW`] turns as compact JSON.
    ///
    /// An empty history encodes as `[]`.
    pub fn context_to_string(&self) -> Result<String, ContextError> {
        let history = self.history.get();
        let start = history.len().saturating_sub(CONTEXT_WINDOW);
        Ok(serde_json::to_string(&history[start..])?)
    }
}

impl<T> Default for ConversationState<T> {
    fn default() -> Self {
        Self::new()
    }
}
