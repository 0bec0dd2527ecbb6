//! Terminal chat shell
//!
//! Reads lines from stdin, hands them to the runtime, and prints the
//! transcript with timestamps. Closing stdin or pressing Ctrl-C closes the chat.

use crate::catalog::BOT_NAME;
use crate::runtime::{ChatHandle, ChatMessage, RuntimeEvent};
use crate::state_machine::Author;
use crossterm::cursor::MoveToPreviousLine;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, IsTerminal, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn speaker(author: Author) -> &'static str {
    match author {
        Author::Bot => BOT_NAME,
        Author::User => "You",
    }
}

/// Plain transcript line: `[2024-01-01 12:00:00] David: text`
pub fn format_line(msg: &ChatMessage) -> String {
    format!(
        "[{}] {}: {}",
        msg.timestamp.format(TIMESTAMP_FORMAT),
        speaker(msg.author),
        msg.text
    )
}

fn render(out: &mut impl Write, msg: &ChatMessage, styled: bool) -> io::Result<()> {
    if !styled {
        writeln!(out, "{}", format_line(msg))?;
        return out.flush();
    }
    let color = match msg.author {
        Author::Bot => Color::Cyan,
        Author::User => Color::Green,
    };
    queue!(
        out,
        Print("\n"),
        SetForegroundColor(Color::DarkGrey),
        Print(format!("[{}] ", msg.timestamp.format(TIMESTAMP_FORMAT))),
        SetForegroundColor(color),
        SetAttribute(Attribute::Bold),
        Print(format!("{}:", speaker(msg.author))),
        SetAttribute(Attribute::Reset),
        ResetColor,
        Print(format!(" {}\n", msg.text)),
    )?;
    out.flush()
}

fn render_notice(out: &mut impl Write, notice: &str, styled: bool) -> io::Result<()> {
    if !styled {
        writeln!(out, "{notice}")?;
        return out.flush();
    }
    queue!(
        out,
        SetForegroundColor(Color::DarkGrey),
        Print(format!("{notice}\n")),
        ResetColor,
    )?;
    out.flush()
}

/// Run the chat until the user leaves or the conversation asks to close
pub async fn run(chat: ChatHandle, mut events: broadcast::Receiver<RuntimeEvent>) -> io::Result<()> {
    let interactive = io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = io::stdout();
    let styled = stdout.is_terminal();
    let mut accepting = true;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(RuntimeEvent::Message(msg)) => render(&mut stdout, &msg, styled)?,
                Ok(RuntimeEvent::InputDisabled) => {
                    accepting = false;
                    render_notice(&mut stdout, "(input disabled, press Ctrl-C or Ctrl-D to close)", styled)?;
                }
                Ok(RuntimeEvent::ShutdownRequested) => {
                    tracing::info!("Closing on request");
                    break;
                }
                Ok(RuntimeEvent::StateChange { state }) => {
                    tracing::debug!(state = %state, "State changed");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Shell fell behind, messages skipped");
                }
                Err(RecvError::Closed) => break,
            },

            line = lines.next_line() => match line? {
                Some(line) if accepting => {
                    if interactive && !line.trim().is_empty() {
                        // The runtime echoes the line with a timestamp
                        queue!(stdout, MoveToPreviousLine(1), Clear(ClearType::CurrentLine))?;
                    }
                    chat.submit(line).await.map_err(io::Error::other)?;
                }
                Some(_) => {}
                None => {
                    tracing::info!("Input closed");
                    break;
                }
            },

            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    chat.shutdown().await;
    Ok(())
}
