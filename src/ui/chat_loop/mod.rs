//! Interactive chat loop.
//!
//! Input lines, agent completions and code run results are multiplexed with
//! `tokio::select!`. Everything that changes state is turned into an
//! [`AppAction`] and applied in one place; the resulting [`AppCommand`]s are
//! handed to the services that own the background work.

mod setup;
mod view;

pub use setup::{bootstrap_session, bootstrap_with, ChatOptions, ChatSession};
pub use view::{terminal_safe, TerminalView};

use std::error::Error;
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::commands::{process_input, CommandResult};
use crate::core::agent::AgentEvent;
use crate::core::app::{actions::AppActionDispatcher, apply_actions, App, AppAction, AppCommand};
use crate::core::config::Config;
use crate::core::sandbox::ExecutionEvent;
use crate::ui::transcript::write_transcript;

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let session = bootstrap_session(&config, options)?;
    let input = BufReader::new(tokio::io::stdin());
    let mut view = TerminalView::new(std::io::stdout());
    event_loop(session, input, &mut view).await
}

enum LoopControl {
    Continue,
    Quit,
}

/// Drive `session` until input ends (and the pending answer, if any, has
/// arrived) or the user quits.
pub async fn event_loop<R, W>(
    session: ChatSession,
    input: R,
    view: &mut TerminalView<W>,
) -> Result<(), Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let ChatSession {
        mut app,
        agent,
        mut agent_rx,
        execution,
        mut execution_rx,
    } = session;
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let mut lines = input.lines();
    let mut input_open = true;
    let mut transcript_stamp = None;

    view.welcome()?;
    refresh_transcript(&app, &mut transcript_stamp);

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => {
                    if let LoopControl::Quit = handle_line(&mut app, &line, &dispatcher, view)? {
                        break;
                    }
                }
                None => {
                    debug!("input closed");
                    input_open = false;
                }
            },
            Some(AgentEvent::Completed { generation, result }) = agent_rx.recv() => {
                dispatcher.dispatch(AppAction::AgentCompleted { generation, result });
            }
            Some(ExecutionEvent::Finished { epoch, block_id, language, result }) = execution_rx.recv() => {
                dispatcher.dispatch(AppAction::ExecutionFinished { epoch, block_id, language, result });
            }
            else => break,
        }

        let mut pending = Vec::new();
        while let Ok(action) = action_rx.try_recv() {
            pending.push(action);
        }
        for command in apply_actions(&mut app, pending) {
            match command {
                AppCommand::SendQuestion(request) => agent.spawn_request(request),
                AppCommand::RunCode(job) => execution.spawn_job(job),
            }
        }

        view.sync(&app)?;
        refresh_transcript(&app, &mut transcript_stamp);

        if !input_open && !app.request.busy {
            break;
        }
    }

    Ok(())
}

fn handle_line<W: Write>(
    app: &mut App,
    line: &str,
    dispatcher: &AppActionDispatcher,
    view: &mut TerminalView<W>,
) -> std::io::Result<LoopControl> {
    match process_input(app, line) {
        CommandResult::Continue => {}
        CommandResult::ProcessAsMessage(message) => {
            if !message.trim().is_empty() {
                dispatcher.dispatch(AppAction::SubmitMessage { message });
            }
        }
        CommandResult::Action(action) => dispatcher.dispatch(action),
        CommandResult::Notice(text) => view.notice(&text)?,
        CommandResult::Quit => return Ok(LoopControl::Quit),
    }
    Ok(LoopControl::Continue)
}

/// Rewrite the transcript page when the conversation has changed since the
/// last write.
fn refresh_transcript(app: &App, stamp: &mut Option<(u64, usize)>) {
    let Some(path) = app.transcript.as_deref() else {
        return;
    };
    let current = (app.session.epoch, app.conversation.len());
    if *stamp == Some(current) {
        return;
    }
    match write_transcript(path, &app.conversation) {
        Ok(()) => *stamp = Some(current),
        Err(err) => warn!(error = %err, "transcript not updated"),
    }
}
