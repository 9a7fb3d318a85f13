//! The whitespace linter: a line-by-line comparison of the user's text
//! against the pretty-printed output.
//!
//! Every line where the two disagree yields one diagnostic, classified by
//! the kind of disagreement. When the two texts diverge beyond whitespace
//! (the formatter re-wrapped a construct across lines), the comparison
//! stops rather than cascade mismatches down the rest of the file.

use unicode_width::UnicodeWidthStr;

use vesper_diagnostics::Diagnostic;
use vesper_source_file::{OneIndexed, SourceLocation};

use crate::registry::Rule;
use crate::rules::whitespace::rules::{
    BlankLines, Indentation, LineTooLong, Spacing, TrailingWhitespace,
};
use crate::settings::Settings;
use crate::violation::{diagnostic_kind, Violation};

pub(crate) fn check_whitespace(
    source: &str,
    formatted: &str,
    settings: &Settings,
) -> Vec<Diagnostic> {
    let mut checker = WhitespaceChecker {
        settings,
        diagnostics: Vec::new(),
    };
    checker.check(source, formatted);
    checker.diagnostics
}

struct WhitespaceChecker<'a> {
    settings: &'a Settings,
    diagnostics: Vec<Diagnostic>,
}

impl WhitespaceChecker<'_> {
    fn report<V: Violation>(&mut self, violation: &V, row: usize, column: usize) {
        if !self.settings.rules.enabled(V::RULE) {
            return;
        }
        let location = SourceLocation {
            row: OneIndexed::from_zero_indexed(row),
            column: OneIndexed::from_zero_indexed(column),
        };
        self.diagnostics.push(Diagnostic::new(
            diagnostic_kind(violation),
            violation.severity(),
            location,
        ));
    }

    fn check(&mut self, source: &str, formatted: &str) {
        let user_lines: Vec<&str> = source.lines().collect();
        let formatted_lines: Vec<&str> = formatted.lines().collect();

        self.check_line_lengths(&user_lines);

        let mut user = 0;
        let mut fmt = 0;
        while user < user_lines.len() || fmt < formatted_lines.len() {
            match (user_lines.get(user), formatted_lines.get(fmt)) {
                (Some(user_line), Some(formatted_line)) => {
                    if user_line == formatted_line {
                        user += 1;
                        fmt += 1;
                        continue;
                    }
                    let user_blank = user_line.trim().is_empty();
                    let formatted_blank = formatted_line.trim().is_empty();
                    if user_blank && !formatted_blank {
                        self.report(&BlankLines::Excess, user, 0);
                        user += 1;
                        continue;
                    }
                    if formatted_blank && !user_blank {
                        self.report(&BlankLines::Missing, user, 0);
                        fmt += 1;
                        continue;
                    }
                    if !self.classify(user, user_line, formatted_line) {
                        return;
                    }
                    user += 1;
                    fmt += 1;
                }
                (Some(user_line), None) => {
                    if !user_line.trim().is_empty() {
                        return;
                    }
                    self.report(&BlankLines::Excess, user, 0);
                    user += 1;
                }
                (None, Some(formatted_line)) => {
                    if !formatted_line.trim().is_empty() {
                        return;
                    }
                    self.report(&BlankLines::Missing, user_lines.len(), 0);
                    fmt += 1;
                }
                (None, None) => return,
            }
        }
    }

    fn check_line_lengths(&mut self, user_lines: &[&str]) {
        if !self.settings.rules.enabled(Rule::LineTooLong) {
            return;
        }
        let limit = self.settings.format.line_width.get();
        for (row, line) in user_lines.iter().enumerate() {
            let width = line.width();
            if width > limit {
                self.report_spanned(&LineTooLong { width, limit }, row, limit, width);
            }
        }
    }

    /// Report with the offending span of the line highlighted.
    fn report_spanned<V: Violation>(&mut self, violation: &V, row: usize, start: usize, end: usize) {
        if !self.settings.rules.enabled(V::RULE) {
            return;
        }
        let location = SourceLocation {
            row: OneIndexed::from_zero_indexed(row),
            column: OneIndexed::from_zero_indexed(start),
        };
        let until = SourceLocation {
            row: location.row,
            column: OneIndexed::from_zero_indexed(end),
        };
        self.diagnostics.push(
            Diagnostic::new(diagnostic_kind(violation), violation.severity(), location)
                .with_range(location, until),
        );
    }

    /// Classify a whitespace-only difference between two non-blank lines.
    /// Returns false when the lines differ in content, which ends the
    /// comparison.
    fn classify(&mut self, row: usize, user_line: &str, formatted_line: &str) -> bool {
        if user_line.trim_end() == formatted_line {
            self.report(
                &TrailingWhitespace,
                row,
                user_line.trim_end().chars().count(),
            );
            return true;
        }
        if user_line.trim_start() == formatted_line.trim_start() {
            let expected = leading_columns(formatted_line);
            let found = leading_columns(user_line);
            self.report(&Indentation { expected, found }, row, 0);
            return true;
        }
        if user_line.split_whitespace().eq(formatted_line.split_whitespace()) {
            self.report(&Spacing, row, leading_columns(user_line));
            return true;
        }
        false
    }
}

fn leading_columns(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

#[cfg(test)]
mod tests {
    use crate::registry::Rule;
    use crate::settings::Settings;
    use crate::test_helpers::lint;

    fn whitespace_rules() -> Settings {
        Settings::for_rules([
            Rule::TrailingWhitespace,
            Rule::Indentation,
            Rule::Spacing,
            Rule::BlankLines,
            Rule::LineTooLong,
        ])
    }

    fn names(source: &str) -> Vec<&'static str> {
        lint(source, &whitespace_rules())
            .into_iter()
            .map(|diagnostic| diagnostic.kind.name)
            .collect()
    }

    #[test]
    fn clean_files_are_clean() {
        assert!(names("let x = 1\n").is_empty());
    }

    #[test]
    fn trailing_whitespace() {
        assert_eq!(names("let x = 1   \n"), ["trailing-whitespace"]);
    }

    #[test]
    fn wrong_indentation() {
        assert_eq!(names("if a {\n      b()\n}\n"), ["indentation"]);
    }

    #[test]
    fn interior_spacing() {
        assert_eq!(names("let x  =  1\n"), ["spacing"]);
    }

    #[test]
    fn excess_blank_lines() {
        // Two of the three blank lines are over the cap; each gets its own
        // diagnostic.
        assert_eq!(
            names("let x = 1\n\n\n\nlet y = 2\n"),
            ["blank-lines", "blank-lines"]
        );
    }

    #[test]
    fn line_too_long() {
        let source = format!("let aaaa = {}\n", "b".repeat(120));
        let diagnostics = lint(&source, &whitespace_rules());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind.name, "line-too-long");
        assert!(diagnostics[0].kind.body.contains("131 > 100"));
        let (start, end) = diagnostics[0].range.expect("the overlong span is highlighted");
        assert_eq!(start.column.get(), 101);
        assert_eq!(end.column.get(), 132);
    }

    #[test]
    fn disabled_rules_stay_silent() {
        let diagnostics = lint("let x = 1   \n", &Settings::for_rule(Rule::Indentation));
        assert!(diagnostics.is_empty());
    }
}
