use rustyline::{Config, Editor, Result};

const PENDING_PREVIEW_CHARS: usize = 24;

/// Line prompt for the chat view.
///
/// While a question is pending the marker names it, otherwise it shows the
/// number of the next turn.
pub fn generate_prompt(pending: Option<&str>, turns: usize) -> String {
    match pending {
        Some(question) => {
            let mut preview: String = question.chars().take(PENDING_PREVIEW_CHARS).collect();
            if question.chars().count() > PENDING_PREVIEW_CHARS {
                preview.push_str("...");
            }
            format!("answer to \"{}\"> ", preview)
        }
        None => format!("[{}]> ", turns + 1),
    }
}

pub fn rl() -> Result<Editor<()>> {
    let config = Config::builder()
        .auto_add_history(true)
        .history_ignore_dups(true)
        .history_ignore_space(true)
        .build();
    Editor::with_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_shows_next_turn() {
        assert_eq!(generate_prompt(None, 0), "[1]> ");
        assert_eq!(generate_prompt(None, 4), "[5]> ");
    }

    #[test]
    fn test_prompt_names_pending_question() {
        assert_eq!(generate_prompt(Some("What is Rust?"), 2), "answer to \"What is Rust?\"> ");
    }

    #[test]
    fn test_prompt_shortens_long_question() {
        let question = "How do I write a parser combinator library?";
        assert_eq!(
            generate_prompt(Some(question), 0),
            "answer to \"How do I write a parser ...\"> "
        );
    }
}
