//! Configuration as read from `vesper.toml`, before resolution.
//!
//! Every field is optional; [`Options::resolve`] fills in defaults.
//! Unknown keys are worth a warning, while a value of the wrong type is an
//! error; the field then falls back to its default so the run can still
//! proceed.

use vesper_diagnostics::{Diagnostic, DiagnosticKind, Severity};
use vesper_formatter::{FormatOptions, IndentStyle, LineEnding, LineWidth};
use vesper_source_file::SourceLocation;

use crate::registry::{Rule, RuleTable};
use crate::settings::Settings;

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub line_length: Option<u16>,
    pub maximum_blank_lines: Option<u32>,
    pub indentation: Option<IndentStyle>,
    pub line_break_before_each_argument: Option<bool>,
    pub respects_existing_line_breaks: Option<bool>,
    pub line_ending: Option<LineEnding>,
    /// Rule name to enabled flag; unlisted rules keep their default.
    pub rules: Vec<(Rule, bool)>,
}

impl Options {
    /// Parse a configuration document. Problems are reported as
    /// diagnostics rather than failing the run.
    pub fn from_toml(text: &str) -> (Options, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let table = match text.parse::<toml::Table>() {
            Ok(table) => table,
            Err(error) => {
                diagnostics.push(config_error(format!(
                    "invalid configuration file: {error}"
                )));
                return (Options::default(), diagnostics);
            }
        };

        let mut options = Options::default();
        for (key, value) in &table {
            match key.as_str() {
                "line-length" => {
                    options.line_length = expect_integer(key, value, &mut diagnostics)
                        .and_then(|n| match u16::try_from(n) {
                            Ok(n) if n > 0 => Some(n),
                            _ => {
                                diagnostics.push(config_error(format!(
                                    "`{key}` must be a positive integer no larger than {}",
                                    u16::MAX
                                )));
                                None
                            }
                        });
                }
                "maximum-blank-lines" => {
                    options.maximum_blank_lines = expect_integer(key, value, &mut diagnostics)
                        .and_then(|n| match u32::try_from(n) {
                            Ok(n) => Some(n),
                            Err(_) => {
                                diagnostics.push(config_error(format!(
                                    "`{key}` must not be negative"
                                )));
                                None
                            }
                        });
                }
                "indentation" => options.indentation = parse_indentation(value, &mut diagnostics),
                "line-break-before-each-argument" => {
                    options.line_break_before_each_argument =
                        expect_bool(key, value, &mut diagnostics);
                }
                "respects-existing-line-breaks" => {
                    options.respects_existing_line_breaks =
                        expect_bool(key, value, &mut diagnostics);
                }
                "line-ending" => options.line_ending = parse_line_ending(value, &mut diagnostics),
                "rules" => parse_rules(value, &mut options.rules, &mut diagnostics),
                _ => diagnostics.push(config_warning(format!(
                    "unknown configuration key `{key}`"
                ))),
            }
        }
        (options, diagnostics)
    }

    pub fn resolve(&self) -> Settings {
        let defaults = FormatOptions::default();
        let mut rules = RuleTable::default();
        for (rule, enabled) in &self.rules {
            if *enabled {
                rules.enable(*rule);
            } else {
                rules.disable(*rule);
            }
        }
        Settings {
            format: FormatOptions {
                line_width: self.line_length.map_or(defaults.line_width, LineWidth::new),
                indent_style: self.indentation.unwrap_or(defaults.indent_style),
                line_ending: self.line_ending.unwrap_or(defaults.line_ending),
                maximum_blank_lines: self
                    .maximum_blank_lines
                    .unwrap_or(defaults.maximum_blank_lines),
                line_break_before_each_argument: self
                    .line_break_before_each_argument
                    .unwrap_or(defaults.line_break_before_each_argument),
                respects_existing_line_breaks: self
                    .respects_existing_line_breaks
                    .unwrap_or(defaults.respects_existing_line_breaks),
            },
            rules,
        }
    }
}

fn config_warning(body: String) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind {
            name: "configuration",
            body,
        },
        Severity::Warning,
        SourceLocation::default(),
    )
}

fn config_error(body: String) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind {
            name: "configuration",
            body,
        },
        Severity::Error,
        SourceLocation::default(),
    )
}

fn expect_integer(key: &str, value: &toml::Value, diagnostics: &mut Vec<Diagnostic>) -> Option<i64> {
    match value.as_integer() {
        Some(value) => Some(value),
        None => {
            diagnostics.push(config_error(format!("`{key}` expects an integer")));
            None
        }
    }
}

fn expect_bool(key: &str, value: &toml::Value, diagnostics: &mut Vec<Diagnostic>) -> Option<bool> {
    match value.as_bool() {
        Some(value) => Some(value),
        None => {
            diagnostics.push(config_error(format!("`{key}` expects a boolean")));
            None
        }
    }
}

/// `indentation = 4` for spaces, or `indentation = "tab"`.
fn parse_indentation(
    value: &toml::Value,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<IndentStyle> {
    match value {
        toml::Value::Integer(count) => match u8::try_from(*count) {
            Ok(count) if count > 0 => Some(IndentStyle::Space(count)),
            _ => {
                diagnostics.push(config_error(
                    "`indentation` must be a small positive integer".to_string(),
                ));
                None
            }
        },
        toml::Value::String(style) if style == "tab" || style == "tabs" => Some(IndentStyle::Tab),
        _ => {
            diagnostics.push(config_error(
                "`indentation` expects a number of spaces or \"tab\"".to_string(),
            ));
            None
        }
    }
}

fn parse_line_ending(
    value: &toml::Value,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<LineEnding> {
    match value.as_str() {
        Some("lf") => Some(LineEnding::Lf),
        Some("crlf") => Some(LineEnding::Crlf),
        _ => {
            diagnostics.push(config_error(
                "`line-ending` expects \"lf\" or \"crlf\"".to_string(),
            ));
            None
        }
    }
}

fn parse_rules(
    value: &toml::Value,
    rules: &mut Vec<(Rule, bool)>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(table) = value.as_table() else {
        diagnostics.push(config_error(
            "`rules` expects a table of rule names to booleans".to_string(),
        ));
        return;
    };
    for (name, value) in table {
        let Ok(rule) = name.parse::<Rule>() else {
            diagnostics.push(config_warning(format!("unknown rule `{name}`")));
            continue;
        };
        match value.as_bool() {
            Some(enabled) => rules.push((rule, enabled)),
            None => diagnostics.push(config_error(format!(
                "rule `{name}` expects a boolean"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use vesper_diagnostics::Severity;
    use vesper_formatter::{IndentStyle, LineEnding};

    use super::Options;
    use crate::registry::Rule;

    #[test]
    fn full_configuration() {
        let (options, diagnostics) = Options::from_toml(indoc! {r#"
            line-length = 80
            maximum-blank-lines = 2
            indentation = 4
            line-break-before-each-argument = true
            respects-existing-line-breaks = false
            line-ending = "crlf"

            [rules]
            line-too-long = false
        "#});
        assert!(diagnostics.is_empty());

        let settings = options.resolve();
        assert_eq!(settings.format.line_width.get(), 80);
        assert_eq!(settings.format.maximum_blank_lines, 2);
        assert_eq!(settings.format.indent_style, IndentStyle::Space(4));
        assert_eq!(settings.format.line_ending, LineEnding::Crlf);
        assert!(settings.format.line_break_before_each_argument);
        assert!(!settings.format.respects_existing_line_breaks);
        assert!(!settings.rules.enabled(Rule::LineTooLong));
        assert!(settings.rules.enabled(Rule::TrailingWhitespace));
    }

    #[test]
    fn unknown_keys_warn() {
        let (_, diagnostics) = Options::from_toml("lineLength = 80\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert!(diagnostics[0].kind.body.contains("lineLength"));
    }

    #[test]
    fn type_mismatches_error_and_fall_back() {
        let (options, diagnostics) = Options::from_toml("line-length = \"eighty\"\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        let settings = options.resolve();
        assert_eq!(settings.format.line_width.get(), 100);
    }

    #[test]
    fn tab_indentation() {
        let (options, diagnostics) = Options::from_toml("indentation = \"tab\"\n");
        assert!(diagnostics.is_empty());
        assert_eq!(options.indentation, Some(IndentStyle::Tab));
    }

    #[test]
    fn unknown_rule_warns() {
        let (options, diagnostics) = Options::from_toml("[rules]\nno-such-rule = true\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert!(options.rules.is_empty());
    }

    #[test]
    fn invalid_toml_is_a_single_error() {
        let (_, diagnostics) = Options::from_toml("line-length = = 80");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }
}
