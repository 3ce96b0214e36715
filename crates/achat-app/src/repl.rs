//! Input line handling: prompts and slash commands.

use std::io::{self, Write};

use achat_common::{NoticeKind, SessionError};
use achat_session::{ChatSession, Connector};
use tracing::debug;

use crate::clipboard::Clipboard;
use crate::terminal::TerminalView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Clear,
    Delete,
    Reset,
    Copy,
    Stop,
    Help,
    Quit,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Prompt(String),
    Command(SlashCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn parse(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    let Some(name) = trimmed.strip_prefix('/') else {
        return Input::Prompt(line.trim_end_matches(['\r', '\n']).to_string());
    };
    // `//text` sends `/text` as a prompt.
    if name.starts_with('/') {
        let text = line.trim_start().trim_end_matches(['\r', '\n']);
        return Input::Prompt(text[1..].to_string());
    }
    let command = match name.to_ascii_lowercase().as_str() {
        "clear" => SlashCommand::Clear,
        "delete" | "del" => SlashCommand::Delete,
        "reset" => SlashCommand::Reset,
        "copy" => SlashCommand::Copy,
        "stop" => SlashCommand::Stop,
        "help" | "?" => SlashCommand::Help,
        "quit" | "exit" | "q" => SlashCommand::Quit,
        other => SlashCommand::Unknown(other.to_string()),
    };
    Input::Command(command)
}

/// Apply one input line to the session.
pub fn dispatch<C, W>(
    session: &mut ChatSession<C>,
    view: &mut TerminalView<W>,
    line: &str,
) -> io::Result<Flow>
where
    C: Connector,
    W: Write,
{
    match parse(line) {
        Input::Empty => {}
        Input::Prompt(text) => match session.send_prompt(&text) {
            Ok(()) => {
                if let Some(echo) = session.transcript().last() {
                    view.message(echo)?;
                }
            }
            Err(SessionError::Busy) => view.hint("still answering, /stop to cancel")?,
            Err(e) => debug!(error = %e, "prompt not sent"),
        },
        Input::Command(command) => return run_command(session, view, command),
    }
    Ok(Flow::Continue)
}

fn run_command<C, W>(
    session: &mut ChatSession<C>,
    view: &mut TerminalView<W>,
    command: SlashCommand,
) -> io::Result<Flow>
where
    C: Connector,
    W: Write,
{
    match command {
        SlashCommand::Clear => {
            view.end_line()?;
            session.clear_transcript();
        }
        SlashCommand::Delete => {
            if let Some(removed) = session.delete_last() {
                debug!(text = %removed, "deleted message");
            } else {
                view.hint("nothing to delete")?;
            }
        }
        SlashCommand::Reset => {
            view.end_line()?;
            session.reset();
        }
        SlashCommand::Copy => copy_last_answer(session, view)?,
        SlashCommand::Stop => match session.stop() {
            Ok(_) => view.end_line()?,
            Err(_) => view.hint("nothing to stop")?,
        },
        SlashCommand::Help => view.help()?,
        SlashCommand::Quit => return Ok(Flow::Quit),
        SlashCommand::Unknown(name) => view.hint(&format!("unknown command /{name}, try /help"))?,
    }
    Ok(Flow::Continue)
}

fn copy_last_answer<C, W>(session: &mut ChatSession<C>, view: &mut TerminalView<W>) -> io::Result<()>
where
    C: Connector,
    W: Write,
{
    let Some(answer) = session.transcript().last_answer() else {
        return view.hint("no answer to copy yet");
    };
    let body = answer.body().to_string();

    match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(&body)) {
        Ok(()) => session.notifier_mut().notify_success(NoticeKind::Copied),
        Err(e) => session.notifier_mut().notify_error(&e.to_string()),
    }
    Ok(())
}
