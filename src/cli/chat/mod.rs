pub mod conversation_state;
pub mod observer;
pub mod prompt;
pub mod turn;

use std::io::Write;
use std::process::ExitCode;

use color_print::cformat;
use conversation_state::ConversationState;
use eyre::Result;
use observer::watch_field;
use prompt::generate_prompt;
use rustyline::error::ReadlineError;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use turn::Turn;

const WELCOME_TEXT: &str = "
Hi, this is a chat view. Type a question, then paste the reply with /answer.
Ctrl-C stops waiting for an answer, Ctrl-D leaves.

/help         Show the help dialogue
/quit         Quit the application
";

const HELP_TEXT: &str = "
Chat Context

{question}      Ask a question and wait for its answer
/stream {text}  Append a chunk to the answer being received
/answer {text}  Record the answer to the pending question
/answer         Record the streamed answer
/cancel         Stop waiting for an answer
/context        Show the context sent along with the next question
/history        Show the conversation history
/status         Show the current prompt, answer and loading state
/clear          Clear the conversation history
/help           Show this help dialogue
/quit           Quit the application
";

pub struct ChatContext {
    output: Box<dyn Write>,
    script: Vec<String>,
    interactive: bool,
    conversation_state: ConversationState<Turn>,
}

impl ChatContext {
    pub fn new(output: Box<dyn Write>, script: Vec<String>, interactive: bool) -> Self {
        Self {
            output,
            script,
            interactive,
            conversation_state: ConversationState::new(),
        }
    }

    pub fn state(&self) -> &ConversationState<Turn> {
        &self.conversation_state
    }

    /// Start one logging observer per conversation field.
    pub fn observe(&self) -> Vec<JoinHandle<usize>> {
        let state = &self.conversation_state;
        vec![
            watch_field("prompt", state.subscribe_prompt(), |prompt| {
                format!("prompt = {:?}", prompt)
            }),
            watch_field("answer", state.subscribe_answer(), |answer| {
                format!("answer = {:?}", answer)
            }),
            watch_field("history", state.subscribe_history(), |history| {
                format!("history holds {} turn(s)", history.len())
            }),
            watch_field("loading", state.subscribe_loading(), |loading| {
                format!("loading = {}", loading)
            }),
        ]
    }

    pub async fn run(&mut self) -> Result<ExitCode> {
        if self.interactive {
            self.print_welcome()?;
        }

        if !self.script.is_empty() {
            return self.run_script();
        }

        if self.interactive {
            self.run_interactive().await?;
        }

        Ok(ExitCode::SUCCESS)
    }

    fn print_welcome(&mut self) -> Result<()> {
        writeln!(self.output, "{}", WELCOME_TEXT)?;
        Ok(())
    }

    /// Feed scripted lines through the same commands as the interactive view.
    ///
    /// Fails if the script ends while a question is still waiting.
    fn run_script(&mut self) -> Result<ExitCode> {
        for line in std::mem::take(&mut self.script) {
            if line.trim() == "/quit" {
                break;
            }
            self.handle_input(&line)?;
        }

        if self.conversation_state.is_loading() {
            let pending = self.conversation_state.prompt().clone();
            writeln!(self.output, "Question left without an answer: {}", pending)?;
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn run_interactive(&mut self) -> Result<()> {
        let mut rl = prompt::rl()?;

        loop {
            let prompt_text = {
                let state = &self.conversation_state;
                let pending = state.is_loading().then(|| state.prompt().clone());
                generate_prompt(pending.as_deref(), state.len())
            };

            match rl.readline(&prompt_text) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if line.trim() == "/quit" {
                        break;
                    }

                    if let Err(e) = self.handle_input(&line) {
                        writeln!(self.output, "Error: {}", e)?;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    if self.conversation_state.is_loading() {
                        self.cancel()?;
                    }
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    writeln!(self.output, "Error: {}", e)?;
                    break;
                }
            }
        }

        info!("Chat session ended with {} turn(s)", self.conversation_state.len());
        Ok(())
    }

    pub fn handle_input(&mut self, input: &str) -> Result<()> {
        let input = input.trim();
        match input {
            "/help" => {
                writeln!(self.output, "{}", HELP_TEXT)?;
            }
            "/clear" => {
                self.conversation_state.reset_all();
                writeln!(self.output, "Conversation cleared.")?;
            }
            "/context" => {
                let context = self.conversation_state.context_to_string()?;
                writeln!(self.output, "{}", context)?;
            }
            "/history" => self.print_history()?,
            "/status" => self.print_status()?,
            "/cancel" => self.cancel()?,
            _ => {
                if let Some(answer) = command_argument(input, "/answer") {
                    self.receive_answer(answer.trim())?;
                } else if let Some(chunk) = command_argument(input, "/stream") {
                    self.stream_answer(chunk.strip_prefix(' ').unwrap_or(chunk))?;
                } else if input.starts_with('/') {
                    writeln!(self.output, "Unknown command: {}", input)?;
                } else {
                    self.submit_prompt(input)?;
                }
            }
        }

        Ok(())
    }

    fn submit_prompt(&mut self, question: &str) -> Result<()> {
        if self.conversation_state.is_loading() {
            let pending = self.conversation_state.prompt().clone();
            writeln!(
                self.output,
                "Still waiting for an answer to: {}\nUse /answer {{text}} or /cancel.",
                pending
            )?;
            return Ok(());
        }

        self.conversation_state.set_prompt(question);
        self.conversation_state.toggle_loading();

        let context = self.conversation_state.context_to_string()?;
        debug!("Context for question {:?}: {}", question, context);

        writeln!(
            self.output,
            "{}",
            cformat!("<dim>Waiting for an answer. Reply with /answer TEXT.</dim>")
        )?;
        Ok(())
    }

    fn stream_answer(&mut self, chunk: &str) -> Result<()> {
        if !self.conversation_state.is_loading() {
            writeln!(self.output, "No question is waiting for an answer.")?;
            return Ok(());
        }

        self.conversation_state.append_answer(chunk);
        writeln!(self.output, "{}", cformat!("<dim>{}</dim>", *self.conversation_state.answer()))?;
        Ok(())
    }

    /// Record the pending turn. Without `text`, the streamed answer is used.
    fn receive_answer(&mut self, text: &str) -> Result<()> {
        if !self.conversation_state.is_loading() {
            writeln!(self.output, "No question is waiting for an answer.")?;
            return Ok(());
        }
        if !text.is_empty() {
            self.conversation_state.set_answer(text);
        }

        let answer = self.conversation_state.answer().clone();
        if answer.is_empty() {
            writeln!(self.output, "Usage: /answer {{text}}")?;
            return Ok(());
        }
        writeln!(self.output, "{}", cformat!("<green>{}</green>", answer))?;

        let question = self.conversation_state.prompt().clone();
        self.conversation_state
            .add_context_item(Turn::new(question, answer));
        self.conversation_state.toggle_loading();
        self.conversation_state.reset_prompt();
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        if !self.conversation_state.is_loading() {
            writeln!(self.output, "Nothing to cancel.")?;
            return Ok(());
        }

        self.conversation_state.toggle_loading();
        self.conversation_state.reset_prompt();
        writeln!(self.output, "Stopped waiting for an answer.")?;
        Ok(())
    }

    fn print_history(&mut self) -> Result<()> {
        let history = self.conversation_state.history();
        if history.is_empty() {
            writeln!(self.output, "No conversation yet.")?;
            return Ok(());
        }

        for (i, turn) in history.iter().enumerate() {
            writeln!(self.output, "{}", cformat!("<bold>[{}]</bold>", i + 1))?;
            writeln!(self.output, "{}", turn)?;
        }
        Ok(())
    }

    fn print_status(&mut self) -> Result<()> {
        let state = &self.conversation_state;
        writeln!(
            self.output,
            "Prompt:  {:?}\nAnswer:  {:?}\nLoading: {}\nTurns:   {}",
            *state.prompt(),
            *state.answer(),
            state.is_loading(),
            state.len()
        )?;
        Ok(())
    }
}

/// Text after `command` when the input is that command, or `None`.
fn command_argument<'a>(input: &'a str, command: &str) -> Option<&'a str> {
    input
        .strip_prefix(command)
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}
