use crate::error::{NoteError, Result};
use std::io::Write;
use std::ops::Range;

/// The editing surface a note command runs against.
pub trait Editor {
    /// Currently selected text, `None` when nothing is selected.
    fn selection(&self) -> Option<&str>;
    fn replace_selection(&mut self, text: &str) -> Result<()>;
    /// Asks the host to show the note at this vault path.
    fn open_note(&mut self, path: &str) -> Result<()>;
}

/// A text buffer with a byte-range selection.
#[derive(Debug, Clone)]
pub struct BufferEditor {
    text: String,
    selection: Range<usize>,
    opened: Option<String>,
}

impl BufferEditor {
    pub fn new(text: impl Into<String>, selection: Range<usize>) -> Result<Self> {
        let text = text.into();
        if selection.start > selection.end
            || selection.end > text.len()
            || !text.is_char_boundary(selection.start)
            || !text.is_char_boundary(selection.end)
        {
            return Err(NoteError::InvalidConfig(format!(
                "selection {}..{} is not a valid range of the document",
                selection.start, selection.end
            )));
        }

        Ok(BufferEditor {
            text,
            selection,
            opened: None,
        })
    }

    /// A buffer with the cursor at the end and nothing selected.
    pub fn without_selection(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        BufferEditor {
            text,
            selection: end..end,
            opened: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn opened(&self) -> Option<&str> {
        self.opened.as_deref()
    }
}

impl Editor for BufferEditor {
    fn selection(&self) -> Option<&str> {
        if self.selection.is_empty() {
            None
        } else {
            Some(&self.text[self.selection.clone()])
        }
    }

    fn replace_selection(&mut self, text: &str) -> Result<()> {
        self.text.replace_range(self.selection.clone(), text);
        // Collapse to a cursor after the inserted text.
        let cursor = self.selection.start + text.len();
        self.selection = cursor..cursor;
        Ok(())
    }

    fn open_note(&mut self, path: &str) -> Result<()> {
        self.opened = Some(path.to_string());
        Ok(())
    }
}

/// Filter-style editor: the selection arrives on stdin and whatever should
/// take its place is written to `out`. An editor piping a selection through
/// the command gets the original text back when nothing replaced it.
pub struct StdioEditor<W: Write> {
    selection: Option<String>,
    out: W,
    replaced: bool,
    opened: Option<String>,
}

impl<W: Write> StdioEditor<W> {
    pub fn new(selection: Option<String>, out: W) -> Self {
        StdioEditor {
            selection: selection.filter(|text| !text.is_empty()),
            out,
            replaced: false,
            opened: None,
        }
    }

    pub fn opened(&self) -> Option<&str> {
        self.opened.as_deref()
    }

    /// Echoes the untouched selection, if any, and hands back the writer.
    pub fn finish(mut self) -> Result<W> {
        if !self.replaced {
            if let Some(selection) = &self.selection {
                self.out.write_all(selection.as_bytes())?;
            }
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> Editor for StdioEditor<W> {
    fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    fn replace_selection(&mut self, text: &str) -> Result<()> {
        let line_ending = match &self.selection {
            Some(selection) if selection.ends_with("\r\n") => "\r\n",
            Some(selection) if selection.ends_with('\n') => "\n",
            _ => "",
        };
        write!(self.out, "{}{}", text, line_ending)?;
        self.replaced = true;
        Ok(())
    }

    fn open_note(&mut self, path: &str) -> Result<()> {
        self.opened = Some(path.to_string());
        Ok(())
    }
}
