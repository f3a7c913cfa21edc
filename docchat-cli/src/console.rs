//! Interactive read-answer loop shared by `chat` and `agent`.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use docchat_agent::{RagChain, RetrievalAgent};
use docchat_session::SessionHandle;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::error;

/// Answers one line of user input within a session.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, input: &str) -> Result<String>;
}

pub struct ChainResponder {
    chain: Arc<RagChain>,
    session: SessionHandle,
}

impl ChainResponder {
    pub fn new(chain: Arc<RagChain>, session: SessionHandle) -> Self {
        Self { chain, session }
    }
}

#[async_trait]
impl Responder for ChainResponder {
    async fn respond(&self, input: &str) -> Result<String> {
        let _turn = self.session.lock_turn().await;
        Ok(self.chain.answer(self.session.history(), input).await?)
    }
}

pub struct AgentResponder {
    agent: Arc<RetrievalAgent>,
    session: SessionHandle,
}

impl AgentResponder {
    pub fn new(agent: Arc<RetrievalAgent>, session: SessionHandle) -> Self {
        Self { agent, session }
    }
}

#[async_trait]
impl Responder for AgentResponder {
    async fn respond(&self, input: &str) -> Result<String> {
        let _turn = self.session.lock_turn().await;
        Ok(self.agent.chat(self.session.history(), input).await?)
    }
}

/// What a line typed at the prompt means.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Skip,
    Quit,
    Message(&'a str),
}

pub fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        Input::Skip
    } else if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        Input::Quit
    } else {
        Input::Message(line)
    }
}

/// Prompt until the user quits or closes stdin.
///
/// A failed turn is reported and the loop keeps going.
pub async fn run_console(title: &str, responder: &dyn Responder) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    println!("{title}");
    println!("Type 'exit' to quit.\n");

    loop {
        let line = match editor.readline("You: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let message = match classify(&line) {
            Input::Skip => continue,
            Input::Quit => break,
            Input::Message(message) => message,
        };
        let _ = editor.add_history_entry(message);

        match responder.respond(message).await {
            Ok(answer) => println!("Assistant: {answer}\n"),
            Err(e) => {
                error!(error = %e, "turn failed");
                eprintln!("Error: {e}\n");
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
