use unicode_width::UnicodeWidthStr;

use crate::options::{FormatOptions, IndentStyle};
use crate::tokens::{FormatToken, GroupKind};
use crate::FormatError;

/// Width assigned to content that can never fit on one line.
const INFINITE: u32 = u32::MAX / 2;

/// Render a token stream into text that respects the configured line width.
///
/// The classic two-pass algorithm: first measure the width of every group
/// (a mandatory newline poisons all enclosing groups), then emit tokens
/// left to right, deciding at each break whether to wrap from the group's
/// measured size and the room left on the current line.
pub fn print_token_stream(
    stream: &[FormatToken],
    options: &FormatOptions,
) -> Result<String, FormatError> {
    let sizes = measure(stream)?;
    let chunks = chunk_widths(stream);
    Emitter::new(options).run(stream, &sizes, &chunks)
}

fn token_width(text: &str) -> u32 {
    u32::try_from(text.width()).unwrap_or(INFINITE)
}

/// Width of the first line of a comment; later lines wrap anyway.
fn comment_width(text: &str, trailing_space: bool) -> u32 {
    let first_line = text.split('\n').next().unwrap_or_default();
    token_width(first_line) + u32::from(trailing_space)
}

/// Measure pass: the printable width between every `open` and its matching
/// `close`.
fn measure(stream: &[FormatToken]) -> Result<Vec<u32>, FormatError> {
    let mut sizes = vec![0u32; stream.len()];
    let mut stack: Vec<(usize, u64, bool)> = Vec::new();
    let mut total = 0u64;

    for (index, token) in stream.iter().enumerate() {
        match token {
            FormatToken::Syntax(text) => total += u64::from(token_width(text)),
            FormatToken::Break(n) => total += u64::from(*n),
            FormatToken::Comment {
                text,
                trailing_space,
                ..
            } => {
                if text.contains('\n') {
                    for entry in &mut stack {
                        entry.2 = true;
                    }
                } else {
                    total += u64::from(comment_width(text, *trailing_space));
                }
            }
            FormatToken::Newline | FormatToken::Newlines(_) => {
                for entry in &mut stack {
                    entry.2 = true;
                }
            }
            FormatToken::Open { .. } => stack.push((index, total, false)),
            FormatToken::Close => {
                let Some((open_index, start, poisoned)) = stack.pop() else {
                    return Err(FormatError::UnbalancedGroups);
                };
                sizes[open_index] = if poisoned {
                    INFINITE
                } else {
                    u32::try_from(total - start).unwrap_or(INFINITE)
                };
            }
        }
    }

    if stack.is_empty() {
        Ok(sizes)
    } else {
        Err(FormatError::UnbalancedGroups)
    }
}

/// For every `break`, the width of the content that follows it up to the
/// next break or mandatory newline. An inconsistent break fires only when
/// this chunk would not fit.
fn chunk_widths(stream: &[FormatToken]) -> Vec<u32> {
    let mut chunks = vec![0u32; stream.len()];
    let mut accumulated = 0u32;
    for (index, token) in stream.iter().enumerate().rev() {
        match token {
            FormatToken::Break(_) | FormatToken::Newline | FormatToken::Newlines(_) => {
                chunks[index] = accumulated;
                accumulated = 0;
            }
            FormatToken::Syntax(text) => {
                accumulated = accumulated.saturating_add(token_width(text));
            }
            FormatToken::Comment {
                text,
                trailing_space,
                ..
            } => {
                accumulated = accumulated.saturating_add(comment_width(text, *trailing_space));
            }
            FormatToken::Open { .. } | FormatToken::Close => {}
        }
    }
    chunks
}

#[derive(Debug, Copy, Clone)]
struct GroupState {
    indent: u16,
    fits: bool,
    kind: GroupKind,
}

/// Indentation owed to the current (still empty) line.
///
/// A mandatory newline pins the indentation of the next line to the group
/// in effect when the newline was emitted. A fired break leaves it open,
/// so that a group opened between the break and the next text supplies the
/// indentation; this is what places wrapped argument lists one level in
/// while their closing delimiter returns to the enclosing level.
#[derive(Debug, Copy, Clone)]
enum Pending {
    Eager(u16),
    Lazy,
}

struct Emitter<'a> {
    options: &'a FormatOptions,
    out: String,
    /// Width of the current line so far.
    column: usize,
    /// True while nothing has been written on the current line.
    at_line_start: bool,
    pending: Pending,
    stack: Vec<GroupState>,
}

impl<'a> Emitter<'a> {
    fn new(options: &'a FormatOptions) -> Self {
        Self {
            options,
            out: String::new(),
            column: 0,
            at_line_start: true,
            pending: Pending::Eager(0),
            stack: vec![GroupState {
                indent: 0,
                fits: true,
                kind: GroupKind::Inconsistent,
            }],
        }
    }

    fn run(
        mut self,
        stream: &[FormatToken],
        sizes: &[u32],
        chunks: &[u32],
    ) -> Result<String, FormatError> {
        for (index, token) in stream.iter().enumerate() {
            match token {
                FormatToken::Syntax(text) => self.write_text(text),
                FormatToken::Open { kind, indent } => {
                    let fits = (sizes[index] as usize) <= self.room();
                    let base = self.current().indent;
                    self.stack.push(GroupState {
                        indent: base + indent,
                        fits,
                        kind: *kind,
                    });
                }
                FormatToken::Close => {
                    if self.stack.len() == 1 {
                        return Err(FormatError::UnbalancedGroups);
                    }
                    self.stack.pop();
                    // Content after a close on a fresh line belongs to the
                    // enclosing group; re-pin the owed indentation.
                    if self.at_line_start {
                        if let Pending::Eager(_) = self.pending {
                            self.pending = Pending::Eager(self.current().indent);
                        }
                    }
                }
                FormatToken::Newline => {
                    if self.at_line_start {
                        self.pending = Pending::Eager(self.current().indent);
                    } else {
                        self.new_line();
                    }
                }
                FormatToken::Newlines(count) => {
                    for _ in 0..*count {
                        self.new_line();
                    }
                }
                FormatToken::Break(spaces) => {
                    if self.break_fires(*spaces, chunks[index]) {
                        if !self.at_line_start {
                            self.new_line();
                        }
                        self.pending = Pending::Lazy;
                    } else if !self.at_line_start {
                        self.write_spaces(usize::from(*spaces));
                    }
                }
                FormatToken::Comment {
                    text,
                    trailing_space,
                    ..
                } => {
                    for (line_number, line) in text.split('\n').enumerate() {
                        if line_number > 0 {
                            self.new_line();
                        }
                        self.write_text(line.trim());
                    }
                    if *trailing_space {
                        self.write_spaces(1);
                    }
                }
            }
        }

        // End with exactly one line terminator.
        let trimmed = self.out.trim_end().len();
        self.out.truncate(trimmed);
        if !self.out.is_empty() {
            self.out.push_str(self.options.line_ending.as_str());
        }
        Ok(self.out)
    }

    fn current(&self) -> GroupState {
        *self.stack.last().expect("the root group is never popped")
    }

    fn pending_indent(&self) -> u16 {
        match self.pending {
            Pending::Eager(indent) => indent,
            Pending::Lazy => self.current().indent,
        }
    }

    /// The column the next character would land on.
    fn effective_column(&self) -> usize {
        if self.at_line_start {
            usize::from(self.pending_indent())
        } else {
            self.column
        }
    }

    fn room(&self) -> usize {
        self.options
            .line_width
            .get()
            .saturating_sub(self.effective_column())
    }

    fn break_fires(&self, spaces: u16, chunk: u32) -> bool {
        let group = self.current();
        if group.fits {
            return false;
        }
        match group.kind {
            GroupKind::Consistent => true,
            GroupKind::Inconsistent => {
                (chunk as usize).saturating_add(usize::from(spaces)) > self.room()
            }
        }
    }

    fn write_text(&mut self, text: &str) {
        if self.at_line_start {
            self.write_indent();
        }
        self.out.push_str(text);
        self.column += text.width();
    }

    fn write_spaces(&mut self, count: usize) {
        if self.at_line_start || count == 0 {
            return;
        }
        self.out.extend(std::iter::repeat(' ').take(count));
        self.column += count;
    }

    fn write_indent(&mut self) {
        let columns = usize::from(self.pending_indent());
        match self.options.indent_style {
            IndentStyle::Space(_) => {
                self.out.extend(std::iter::repeat(' ').take(columns));
            }
            IndentStyle::Tab => {
                let width = usize::from(self.options.indent_style.width());
                self.out
                    .extend(std::iter::repeat('\t').take(columns / width));
                self.out
                    .extend(std::iter::repeat(' ').take(columns % width));
            }
        }
        self.column = columns;
        self.at_line_start = false;
    }

    /// Terminate the current line, trimming any trailing whitespace.
    fn new_line(&mut self) {
        let line_start = self.out.rfind('\n').map_or(0, |position| position + 1);
        let trimmed = self.out[line_start..].trim_end().len();
        self.out.truncate(line_start + trimmed);
        self.out.push_str(self.options.line_ending.as_str());
        self.column = 0;
        self.at_line_start = true;
        self.pending = Pending::Eager(self.current().indent);
    }
}

#[cfg(test)]
mod tests {
    use vesper_syntax::CommentKind;

    use super::print_token_stream;
    use crate::options::{FormatOptions, LineWidth};
    use crate::tokens::{FormatToken, GroupKind};

    fn options_with_width(width: u16) -> FormatOptions {
        FormatOptions {
            line_width: LineWidth::new(width),
            ..FormatOptions::default()
        }
    }

    fn syntax(text: &str) -> FormatToken {
        FormatToken::Syntax(text.to_string())
    }

    fn open(kind: GroupKind, indent: u16) -> FormatToken {
        FormatToken::Open { kind, indent }
    }

    #[test]
    fn fitting_group_renders_spaces() {
        let stream = vec![
            open(GroupKind::Consistent, 2),
            syntax("let"),
            FormatToken::Break(1),
            syntax("x"),
            FormatToken::Close,
            FormatToken::Newline,
        ];
        let printed = print_token_stream(&stream, &options_with_width(80)).unwrap();
        assert_eq!(printed, "let x\n");
    }

    #[test]
    fn consistent_group_breaks_every_break() {
        let stream = vec![
            open(GroupKind::Consistent, 2),
            syntax("aaaa"),
            FormatToken::Break(1),
            syntax("bbbb"),
            FormatToken::Break(1),
            syntax("cccc"),
            FormatToken::Close,
            FormatToken::Newline,
        ];
        let printed = print_token_stream(&stream, &options_with_width(8)).unwrap();
        assert_eq!(printed, "aaaa\n  bbbb\n  cccc\n");
    }

    #[test]
    fn inconsistent_group_fills_lines() {
        let stream = vec![
            open(GroupKind::Inconsistent, 2),
            syntax("aaaa"),
            FormatToken::Break(1),
            syntax("bbbb"),
            FormatToken::Break(1),
            syntax("cccc"),
            FormatToken::Close,
            FormatToken::Newline,
        ];
        let printed = print_token_stream(&stream, &options_with_width(10)).unwrap();
        assert_eq!(printed, "aaaa bbbb\n  cccc\n");
    }

    #[test]
    fn mandatory_newline_poisons_enclosing_groups() {
        let stream = vec![
            open(GroupKind::Consistent, 2),
            syntax("a"),
            FormatToken::Break(1),
            FormatToken::Newline,
            syntax("b"),
            FormatToken::Close,
            FormatToken::Newline,
        ];
        // Everything would fit in 80 columns, but the newline forces the
        // group to break.
        let printed = print_token_stream(&stream, &options_with_width(80)).unwrap();
        assert_eq!(printed, "a\n  b\n");
    }

    #[test]
    fn oversized_token_overflows_without_splitting() {
        let stream = vec![syntax("abcdefghij"), FormatToken::Newline];
        let printed = print_token_stream(&stream, &options_with_width(4)).unwrap();
        assert_eq!(printed, "abcdefghij\n");
    }

    #[test]
    fn group_opened_after_break_indents_its_content() {
        // The zero-width break before the group fires lazily; the
        // indentation that materializes is the inner group's, while the
        // closing delimiter returns to the enclosing level.
        let stream = vec![
            open(GroupKind::Consistent, 0),
            syntax("f("),
            FormatToken::Break(0),
            open(GroupKind::Consistent, 2),
            syntax("argument"),
            FormatToken::Close,
            FormatToken::Break(0),
            syntax(")"),
            FormatToken::Close,
            FormatToken::Newline,
        ];
        let printed = print_token_stream(&stream, &options_with_width(6)).unwrap();
        assert_eq!(printed, "f(\n  argument\n)\n");
    }

    #[test]
    fn statement_after_group_open_stays_at_statement_indent() {
        // The group's indentation applies to its wrapped continuations,
        // never to the line the statement starts on.
        let stream = vec![
            syntax("a"),
            FormatToken::Newline,
            open(GroupKind::Inconsistent, 2),
            syntax("let"),
            FormatToken::Break(1),
            syntax("x"),
            FormatToken::Close,
            FormatToken::Newline,
        ];
        let printed = print_token_stream(&stream, &options_with_width(80)).unwrap();
        assert_eq!(printed, "a\nlet x\n");
    }

    #[test]
    fn close_on_fresh_line_dedents() {
        // A statement newline is pinned to the block's indentation, but the
        // brace that closes the block returns to the enclosing level.
        let stream = vec![
            syntax("{"),
            open(GroupKind::Consistent, 2),
            FormatToken::Newline,
            syntax("body"),
            FormatToken::Newline,
            FormatToken::Close,
            syntax("}"),
            FormatToken::Newline,
        ];
        let printed = print_token_stream(&stream, &options_with_width(80)).unwrap();
        assert_eq!(printed, "{\n  body\n}\n");
    }

    #[test]
    fn blank_lines_survive() {
        let stream = vec![
            syntax("a"),
            FormatToken::Newline,
            FormatToken::Newlines(1),
            syntax("b"),
            FormatToken::Newline,
        ];
        let printed = print_token_stream(&stream, &options_with_width(80)).unwrap();
        assert_eq!(printed, "a\n\nb\n");
    }

    #[test]
    fn merged_doc_comment_reindents_each_line() {
        let stream = vec![
            syntax("{"),
            open(GroupKind::Consistent, 2),
            FormatToken::Newline,
            FormatToken::Comment {
                kind: CommentKind::DocLine,
                text: "/// A.\n/// B.".to_string(),
                trailing_space: false,
            },
            FormatToken::Newline,
            syntax("b"),
            FormatToken::Newline,
            FormatToken::Close,
            syntax("}"),
            FormatToken::Newline,
        ];
        let printed = print_token_stream(&stream, &options_with_width(80)).unwrap();
        assert_eq!(printed, "{\n  /// A.\n  /// B.\n  b\n}\n");
    }

    #[test]
    fn unbalanced_close_is_an_error() {
        let stream = vec![FormatToken::Close];
        assert!(print_token_stream(&stream, &FormatOptions::default()).is_err());
    }

    #[test]
    fn trailing_whitespace_is_stripped() {
        let stream = vec![
            syntax("a"),
            FormatToken::Break(1),
            FormatToken::Newline,
            syntax("b"),
            FormatToken::Newline,
        ];
        let printed = print_token_stream(&stream, &options_with_width(80)).unwrap();
        assert_eq!(printed, "a\nb\n");
    }
}
