use std::fmt;

use serde::Serialize;

/// One question/answer exchange recorded in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

impl Turn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q: {}\nA: {}", self.question, self.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_serializes_with_field_names() {
        let turn = Turn::new("What is Rust?", "A language.");
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"question":"What is Rust?","answer":"A language."}"#);
    }

    #[test]
    fn test_turn_display() {
        let turn = Turn::new("hi", "hello");
        assert_eq!(turn.to_string(), "Q: hi\nA: hello");
    }
}
