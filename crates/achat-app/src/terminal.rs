//! Terminal rendering: transcript on stdout, toasts on stderr.

use std::io::{self, Write};

use achat_common::{Toast, ToastLevel, Toaster};
use achat_session::{Message, SessionUpdate};

pub const HELP: &str = "\
commands:
  /clear   clear the conversation
  /delete  delete the last message
  /reset   drop the connection and the conversation
  /copy    copy the last answer to the clipboard
  /stop    cancel the answer being streamed
  /help    show this list
  /quit    exit

start a question with // to send a literal leading slash";

/// Writes the transcript and streamed deltas.
pub struct TerminalView<W: Write> {
    out: W,
    /// A streamed answer is open on the current line.
    mid_line: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            mid_line: false,
        }
    }

    pub fn banner(&mut self, endpoint: &str) -> io::Result<()> {
        writeln!(self.out, "achat -> {endpoint}")?;
        writeln!(self.out, "type a question, or /help")
    }

    pub fn message(&mut self, message: &Message) -> io::Result<()> {
        self.end_line()?;
        writeln!(self.out, "{message}")
    }

    pub fn hint(&mut self, text: &str) -> io::Result<()> {
        self.end_line()?;
        writeln!(self.out, "· {text}")
    }

    pub fn help(&mut self) -> io::Result<()> {
        self.end_line()?;
        writeln!(self.out, "{HELP}")
    }

    pub fn update(&mut self, update: &SessionUpdate) -> io::Result<()> {
        match update {
            SessionUpdate::Chunk(delta) => {
                write!(self.out, "{delta}")?;
                self.mid_line = true;
                self.out.flush()
            }
            SessionUpdate::Finished { tail, .. } => {
                writeln!(self.out, "{tail}")?;
                self.mid_line = false;
                self.out.flush()
            }
            SessionUpdate::Failed | SessionUpdate::Closed => self.end_line(),
            SessionUpdate::Ignored | SessionUpdate::Connected => Ok(()),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Terminate a half-streamed answer.
    pub fn end_line(&mut self) -> io::Result<()> {
        if self.mid_line {
            self.mid_line = false;
            writeln!(self.out)?;
        }
        Ok(())
    }
}

/// Prints toasts as single marked lines.
pub struct TerminalToaster<W: Write + Send> {
    out: W,
}

impl TerminalToaster<io::Stderr> {
    pub fn stderr() -> Self {
        Self { out: io::stderr() }
    }
}

impl<W: Write + Send> Toaster for TerminalToaster<W> {
    fn show(&mut self, toast: Toast) {
        let mark = match toast.level {
            ToastLevel::Success => "✔",
            ToastLevel::Error => "✖",
        };
        let _ = writeln!(self.out, "{mark} {}", toast.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.out).unwrap()
    }

    #[test]
    fn streamed_answer_renders_on_one_line() {
        let mut view = TerminalView::new(Vec::new());
        view.update(&SessionUpdate::Chunk("答：A".into())).unwrap();
        view.update(&SessionUpdate::Chunk("B".into())).unwrap();
        view.update(&SessionUpdate::Finished {
            tail: String::new(),
            message: Message::problem("unused"),
        })
        .unwrap();
        assert_eq!(output(view), "答：AB\n");
    }

    #[test]
    fn failure_terminates_open_line() {
        let mut view = TerminalView::new(Vec::new());
        view.update(&SessionUpdate::Chunk("答：par".into())).unwrap();
        view.update(&SessionUpdate::Failed).unwrap();
        view.hint("try again").unwrap();
        assert_eq!(output(view), "答：par\n· try again\n");
    }

    #[test]
    fn message_prints_full_text() {
        let mut view = TerminalView::new(Vec::new());
        view.message(&Message::problem("hi")).unwrap();
        view.update(&SessionUpdate::Ignored).unwrap();
        assert_eq!(output(view), "问：hi\n");
    }

    #[test]
    fn toaster_marks_level() {
        let mut toaster = TerminalToaster { out: Vec::new() };
        toaster.show(Toast::success("Copied to clipboard"));
        toaster.show(Toast::error("Network error"));
        let text = String::from_utf8(toaster.out).unwrap();
        assert_eq!(text, "✔ Copied to clipboard\n✖ Network error\n");
    }
}
