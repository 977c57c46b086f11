//! One-shot "say" command: ask a single question and print the answer.

use std::error::Error;

use crate::core::agent::AgentEvent;
use crate::core::config::Config;
use crate::ui::chat_loop::{bootstrap_session, terminal_safe, ChatOptions, ChatSession};

/// What `say` prints for an answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SayFormat {
    Text,
    Html,
}

pub async fn run_say(
    prompt: Vec<String>,
    format: SayFormat,
    options: ChatOptions,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: lumina say <prompt>");
        std::process::exit(1);
    }

    let config = Config::load()?;
    let session = bootstrap_session(&config, options)?;
    let answer = ask(session, &prompt, format).await?;
    println!("{answer}");
    Ok(())
}

/// Run one question through the request lifecycle and return the answer in
/// the requested form, ready for the terminal. A failed request yields the
/// error banner text.
pub async fn ask(
    session: ChatSession,
    prompt: &str,
    format: SayFormat,
) -> Result<String, Box<dyn Error>> {
    let ChatSession {
        mut app,
        agent,
        mut agent_rx,
        ..
    } = session;

    let request = app.submit(prompt)?;
    agent.spawn_request(request);
    let Some(AgentEvent::Completed { generation, result }) = agent_rx.recv().await else {
        return Err("agent task ended without a result".into());
    };
    app.complete(generation, result);

    if let Some(error) = app.request.last_error.take() {
        return Err(terminal_safe(&error).into());
    }
    let turn = app
        .conversation
        .last()
        .filter(|turn| turn.is_assistant())
        .ok_or("no answer was recorded")?;
    let answer = match format {
        SayFormat::Text => turn.content.as_str(),
        SayFormat::Html => turn.rendered_html.as_deref().unwrap_or_default(),
    };
    Ok(terminal_safe(answer))
}
