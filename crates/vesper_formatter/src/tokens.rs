use std::fmt;

use static_assertions::const_assert;
use vesper_syntax::CommentKind;

/// Wrap policy of a printer group.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// If any break in the group fires, every break fires.
    Consistent,
    /// Each break decides on its own from the remaining room.
    Inconsistent,
}

/// One directive in the linear stream handed to the printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatToken {
    /// A verbatim token text. Trivia has already been translated away.
    Syntax(String),
    /// A soft break: `n` spaces if the group fits, otherwise a line break.
    Break(u16),
    /// A mandatory line break.
    Newline,
    /// `k` mandatory line breaks, used for preserved blank lines.
    Newlines(u16),
    /// Begin a group; `indent` columns are added while the group wraps.
    Open { kind: GroupKind, indent: u16 },
    /// End the innermost open group.
    Close,
    /// A comment emitted verbatim, optionally followed by one space.
    Comment {
        kind: CommentKind,
        text: String,
        trailing_space: bool,
    },
}

// The stream is the largest per-file allocation; keep its elements small.
const_assert!(std::mem::size_of::<FormatToken>() <= 40);

impl fmt::Display for FormatToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatToken::Syntax(text) => write!(f, "syntax({text:?})"),
            FormatToken::Break(n) => write!(f, "break({n})"),
            FormatToken::Newline => write!(f, "newline"),
            FormatToken::Newlines(n) => write!(f, "newlines({n})"),
            FormatToken::Open { kind, indent } => {
                let kind = match kind {
                    GroupKind::Consistent => "consistent",
                    GroupKind::Inconsistent => "inconsistent",
                };
                write!(f, "open({kind}, {indent})")
            }
            FormatToken::Close => write!(f, "close"),
            FormatToken::Comment {
                text,
                trailing_space,
                ..
            } => {
                if *trailing_space {
                    write!(f, "comment({text:?}, space)")
                } else {
                    write!(f, "comment({text:?})")
                }
            }
        }
    }
}

/// Render a stream one directive per line, for `--dump-token-stream`.
pub fn display_token_stream(stream: &[FormatToken]) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for token in stream {
        if matches!(token, FormatToken::Close) {
            depth = depth.saturating_sub(1);
        }
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&token.to_string());
        out.push('\n');
        if matches!(token, FormatToken::Open { .. }) {
            depth += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{display_token_stream, FormatToken, GroupKind};

    #[test]
    fn display_forms() {
        assert_eq!(FormatToken::Break(1).to_string(), "break(1)");
        assert_eq!(
            FormatToken::Open {
                kind: GroupKind::Consistent,
                indent: 2
            }
            .to_string(),
            "open(consistent, 2)"
        );
    }

    #[test]
    fn dump_indents_by_group_depth() {
        let stream = vec![
            FormatToken::Open {
                kind: GroupKind::Inconsistent,
                indent: 2,
            },
            FormatToken::Syntax("let".to_string()),
            FormatToken::Close,
        ];
        assert_eq!(
            display_token_stream(&stream),
            "open(inconsistent, 2)\n  syntax(\"let\")\nclose\n"
        );
    }
}
