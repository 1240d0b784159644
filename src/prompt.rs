use crate::error::Result;
use log::debug;
use std::io::{BufRead, BufReader, Write};
use termion::cursor;

/// Asks the user for a note name. `Ok(None)` means the prompt was dismissed.
pub trait NamePrompt {
    fn ask(&mut self) -> Result<Option<String>>;
}

/// A prompt whose answer is known up front. `None` behaves like a dismissed
/// prompt.
#[derive(Debug, Clone, Default)]
pub struct FixedPrompt(pub Option<String>);

impl NamePrompt for FixedPrompt {
    fn ask(&mut self) -> Result<Option<String>> {
        Ok(self.0.take())
    }
}

pub fn clear<W: Write>(stdout: &mut W) -> Result<()> {
    write!(
        stdout,
        "{}{}{}",
        termion::clear::CurrentLine,
        cursor::Left(u16::MAX),
        cursor::Show
    )?;

    Ok(())
}

/// Single-field prompt on the controlling terminal. Both the question and the
/// answer go through the tty, so stdin and stdout may be pipes.
pub struct TerminalPrompt {
    prompt_string: String,
}

impl TerminalPrompt {
    pub fn new(prompt_string: impl Into<String>) -> Self {
        TerminalPrompt {
            prompt_string: prompt_string.into(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        TerminalPrompt::new("Enter the name of the new note: ")
    }
}

impl NamePrompt for TerminalPrompt {
    fn ask(&mut self) -> Result<Option<String>> {
        let mut tty = termion::get_tty()?;
        let input = BufReader::new(tty.try_clone()?);
        read_name(&mut tty, input, &self.prompt_string)
    }
}

/// Reads one line in the terminal's normal line mode. An empty line or closed
/// input dismisses the prompt.
fn read_name<W: Write, R: BufRead>(
    stdout: &mut W,
    mut input: R,
    prompt_string: &str,
) -> Result<Option<String>> {
    clear(stdout)?;
    write!(stdout, "{}", prompt_string)?;
    stdout.flush()?;

    let mut buffer = String::new();
    if input.read_line(&mut buffer)? == 0 {
        debug!("name prompt closed before submission");
        return Ok(None);
    }

    let answer = buffer.trim_end_matches(['\n', '\r']);
    if answer.trim().is_empty() {
        debug!("name prompt dismissed");
        return Ok(None);
    }

    Ok(Some(answer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_prompt_answers_once() {
        let mut prompt = FixedPrompt(Some("Second Note".to_string()));
        assert_eq!(prompt.ask().unwrap().as_deref(), Some("Second Note"));
        assert_eq!(prompt.ask().unwrap(), None);
    }

    #[test]
    fn test_read_name_submits_line() {
        let mut out = Vec::new();
        let answer = read_name(&mut out, &b"Second Note\r\n"[..], "Name: ").unwrap();
        assert_eq!(answer.as_deref(), Some("Second Note"));
    }

    #[test]
    fn test_read_name_writes_prompt_to_plain_writer() {
        let mut out = Vec::new();
        read_name(&mut out, &b"Second Note\n"[..], "Name: ").unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with("Name: "));
    }

    #[test]
    fn test_read_name_empty_line_is_cancel() {
        let mut out = Vec::new();
        let answer = read_name(&mut out, &b"  \n"[..], "Name: ").unwrap();
        assert_eq!(answer, None);
    }

    #[test]
    fn test_read_name_closed_input_is_cancel() {
        let mut out = Vec::new();
        let answer = read_name(&mut out, &b""[..], "Name: ").unwrap();
        assert_eq!(answer, None);
    }

    #[test]
    fn test_clear_writes_escape_codes() {
        let mut out = Vec::new();
        clear(&mut out).unwrap();
        assert!(!out.is_empty());
    }
}
