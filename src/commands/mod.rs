mod registry;

pub use registry::{all_commands, find_command, CommandInvocation};

use crate::core::app::{App, AppAction};
use crate::core::constants::WELCOME_SUGGESTIONS;

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    /// A state change to route through the action dispatcher.
    Action(AppAction),
    /// Text for the terminal only; it does not enter the conversation.
    Notice(String),
    Quit,
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => {
            let invocation = CommandInvocation {
                input: trimmed,
                args,
            };
            (command.handler)(app, invocation)
        }
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

pub(super) fn handle_help(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mut help = String::from("Commands:\n");
    for command in all_commands() {
        help.push_str(&format!("  {:<16} {}\n", command.usage, command.help));
    }
    help.push_str("Anything else is sent to the agent.");
    CommandResult::Notice(help)
}

pub(super) fn handle_clear(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Action(AppAction::ClearConversation)
}

pub(super) fn handle_copy(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    match single_arg(invocation) {
        Some(id) => CommandResult::Action(AppAction::CopyCode { id: id.to_string() }),
        None => {
            app.set_status("Usage: /copy <id>");
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_run(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    match single_arg(invocation) {
        Some(id) => CommandResult::Action(AppAction::RunCode { id: id.to_string() }),
        None => {
            app.set_status("Usage: /run <id>");
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_blocks(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    if app.code_actions.is_empty() {
        return CommandResult::Notice("No code blocks yet.".to_string());
    }
    let lines: Vec<String> = app
        .code_actions
        .blocks()
        .map(|block| {
            let action = if block.executable { "copy, run" } else { "copy" };
            format!("  {}  {} ({action})", block.id, block.language)
        })
        .collect();
    CommandResult::Notice(lines.join("\n"))
}

pub(super) fn handle_dismiss(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Action(AppAction::DismissError)
}

pub(super) fn handle_suggest(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::Notice(suggestion_list());
    }
    let picked = invocation
        .args
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| WELCOME_SUGGESTIONS.get(idx));
    match picked {
        Some(suggestion) => CommandResult::ProcessAsMessage(suggestion.to_string()),
        None => {
            app.set_status(format!(
                "Pick a suggestion between 1 and {}",
                WELCOME_SUGGESTIONS.len()
            ));
            CommandResult::Continue
        }
    }
}

pub fn suggestion_list() -> String {
    WELCOME_SUGGESTIONS
        .iter()
        .enumerate()
        .map(|(idx, suggestion)| format!("  {}. {suggestion}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.input.split_whitespace().collect();

    match parts.len() {
        1 => match app.logging.toggle_logging() {
            Ok(message) => app.set_status(message),
            Err(e) => app.set_status(format!("Log error: {}", e)),
        },
        2 => match app.logging.set_log_file(parts[1].to_string()) {
            Ok(message) => app.set_status(message),
            Err(e) => app.set_status(format!("Logfile error: {}", e)),
        },
        _ => app.set_status("Usage: /log [filename]"),
    }
    CommandResult::Continue
}

pub(super) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}

fn single_arg<'a>(invocation: CommandInvocation<'a>) -> Option<&'a str> {
    let mut words = invocation.args.split_whitespace();
    match (words.next(), words.next()) {
        (Some(word), None) => Some(word),
        _ => None,
    }
}
