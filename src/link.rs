use crate::note::NoteResult;
use std::fmt;

/// A `[[target|label]]` back-reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wikilink {
    pub target: String,
    pub label: Option<String>,
}

impl Wikilink {
    pub fn to_note(result: &NoteResult) -> Self {
        Wikilink {
            target: result.path.clone(),
            label: Some(result.display_name.clone()),
        }
    }

    /// Parses a single link spanning the whole input. The label is split at
    /// the first `|`.
    pub fn parse(text: &str) -> Option<Self> {
        let inner = text.trim().strip_prefix("[[")?.strip_suffix("]]")?;
        if inner.is_empty() || inner.contains("[[") || inner.contains("]]") {
            return None;
        }

        let link = match inner.split_once('|') {
            Some((target, label)) => Wikilink {
                target: target.to_string(),
                label: Some(label.to_string()),
            },
            None => Wikilink {
                target: inner.to_string(),
                label: None,
            },
        };

        if link.target.is_empty() {
            return None;
        }
        Some(link)
    }
}

impl fmt::Display for Wikilink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "[[{}|{}]]", self.target, label),
            None => write!(f, "[[{}]]", self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(path: &str, name: &str) -> NoteResult {
        NoteResult {
            path: path.to_string(),
            display_name: name.to_string(),
            created: true,
        }
    }

    #[test]
    fn test_render_note_link() {
        let link = Wikilink::to_note(&result("Ideas/My Idea.md", "My Idea"));
        assert_eq!(link.to_string(), "[[Ideas/My Idea.md|My Idea]]");
    }

    #[test]
    fn test_rendered_link_resolves_to_created_path() {
        let created = result("Ideas/My Idea.md", "My Idea");
        let parsed = Wikilink::parse(&Wikilink::to_note(&created).to_string()).unwrap();
        assert_eq!(parsed.target, created.path);
        assert_eq!(parsed.label.as_deref(), Some("My Idea"));
    }

    #[test]
    fn test_parse_without_label() {
        let parsed = Wikilink::parse("[[notes/a.md]]").unwrap();
        assert_eq!(parsed.target, "notes/a.md");
        assert_eq!(parsed.label, None);
        assert_eq!(parsed.to_string(), "[[notes/a.md]]");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Wikilink::parse("notes/a.md").is_none());
        assert!(Wikilink::parse("[[]]").is_none());
        assert!(Wikilink::parse("[[|label]]").is_none());
        assert!(Wikilink::parse("[[a]] and [[b]]").is_none());
    }
}
