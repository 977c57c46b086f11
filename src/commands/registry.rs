use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Clear the conversation, even while an answer is pending.",
        handler: super::handle_clear,
    },
    Command {
        name: "copy",
        usage: "/copy <id>",
        help: "Copy a code block to the clipboard.",
        handler: super::handle_copy,
    },
    Command {
        name: "run",
        usage: "/run <id>",
        help: "Run a javascript or python block, or preview html/css.",
        handler: super::handle_run,
    },
    Command {
        name: "blocks",
        usage: "/blocks",
        help: "List the code blocks in the conversation.",
        handler: super::handle_blocks,
    },
    Command {
        name: "dismiss",
        usage: "/dismiss",
        help: "Dismiss the error banner.",
        handler: super::handle_dismiss,
    },
    Command {
        name: "suggest",
        usage: "/suggest [n]",
        help: "List the starter questions, or ask number n.",
        handler: super::handle_suggest,
    },
    Command {
        name: "log",
        usage: "/log [filename]",
        help: "Toggle logging or set the log file path.",
        handler: super::handle_log,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the chat.",
        handler: super::handle_quit,
    },
];
