use crate::error::Error;
use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DescriptionKind {
    Inline,
    Multiline,
}

/// Free-text annotation attached to a die or roll group. Pure metadata;
/// it never affects evaluation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Description {
    text: String,
    kind: DescriptionKind,
}

impl Description {
    pub fn new(text: impl Into<String>, kind: DescriptionKind) -> Result<Self, Error> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::MissingArgument("description text"));
        }
        Ok(Self { text, kind })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> DescriptionKind {
        self.kind
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DescriptionKind::Inline => write!(f, "# {}", self.text),
            DescriptionKind::Multiline => write!(f, "[{}]", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_text() {
        assert_eq!(
            Description::new("  ", DescriptionKind::Inline),
            Err(Error::MissingArgument("description text"))
        );
    }

    #[test]
    fn test_display() {
        let inline = Description::new("to hit", DescriptionKind::Inline).unwrap();
        assert_eq!(inline.to_string(), "# to hit");
        let multi = Description::new("fire damage", DescriptionKind::Multiline).unwrap();
        assert_eq!(multi.to_string(), "[fire damage]");
    }
}
