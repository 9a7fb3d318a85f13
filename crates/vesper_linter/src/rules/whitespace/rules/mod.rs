use crate::registry::Rule;
use crate::violation::Violation;

pub(crate) struct TrailingWhitespace;

impl Violation for TrailingWhitespace {
    const RULE: Rule = Rule::TrailingWhitespace;

    fn message(&self) -> String {
        "remove trailing whitespace".to_string()
    }
}

pub(crate) struct Indentation {
    pub(crate) expected: usize,
    pub(crate) found: usize,
}

impl Violation for Indentation {
    const RULE: Rule = Rule::Indentation;

    fn message(&self) -> String {
        format!(
            "change indentation to {} columns (found {})",
            self.expected, self.found
        )
    }
}

pub(crate) struct Spacing;

impl Violation for Spacing {
    const RULE: Rule = Rule::Spacing;

    fn message(&self) -> String {
        "respace this line to match the formatted layout".to_string()
    }
}

pub(crate) enum BlankLines {
    Excess,
    Missing,
}

impl Violation for BlankLines {
    const RULE: Rule = Rule::BlankLines;

    fn message(&self) -> String {
        match self {
            BlankLines::Excess => "remove this blank line".to_string(),
            BlankLines::Missing => "add a blank line here".to_string(),
        }
    }
}

pub(crate) struct LineTooLong {
    pub(crate) width: usize,
    pub(crate) limit: usize,
}

impl Violation for LineTooLong {
    const RULE: Rule = Rule::LineTooLong;

    fn message(&self) -> String {
        format!("line too long ({} > {} characters)", self.width, self.limit)
    }
}
