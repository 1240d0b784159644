use log::{info, warn};
use std::io::Write;
use termion::color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A short user-facing message, the terminal counterpart of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Collects notices instead of showing them.
impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

pub struct TerminalNotifier<W: Write> {
    out: W,
    colored: bool,
}

impl<W: Write> TerminalNotifier<W> {
    pub fn new(out: W, colored: bool) -> Self {
        TerminalNotifier { out, colored }
    }
}

impl<W: Write> Notifier for TerminalNotifier<W> {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!("notice: {}", notice.message),
            NoticeLevel::Error => warn!("notice: {}", notice.message),
        }

        let written = if !self.colored {
            writeln!(self.out, "{}", notice.message)
        } else if notice.level == NoticeLevel::Error {
            writeln!(
                self.out,
                "{}{}{}",
                color::Fg(color::Red),
                notice.message,
                color::Fg(color::Reset)
            )
        } else {
            writeln!(
                self.out,
                "{}{}{}",
                color::Fg(color::Yellow),
                notice.message,
                color::Fg(color::Reset)
            )
        };
        if let Err(error) = written.and_then(|_| self.out.flush()) {
            warn!("could not show notice: {}", error);
        }
    }
}
